//! Rendering of the shell.
//!
//! Screen structure, top to bottom: tabs bar, columns, status line. The
//! tabs bar moves below the columns when the navbar-under setting is on.

use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Widget},
};
use tootshell_engine::{DrawerView, Pane, ShellView, TabsBarPosition};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::app::{App, TAB_ROUTES};
use crate::column::Column;
use crate::theme::Theme;

/// Tab labels, in [`TAB_ROUTES`] order.
const TAB_LABELS: [&str; 5] = ["Home", "Notifications", "Local", "Federated", "Start"];

const MASCOTS: [&str; 4] = ["(o_o)", "(^_^)", "(-_-)", "(>_<)"];

/// Screen regions for one frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShellAreas {
    pub tabs: Rect,
    pub columns: Vec<Rect>,
    pub status: Rect,
}

/// Split `area` for the current view and column count.
pub fn shell_areas(view: &ShellView, column_count: usize, area: Rect) -> ShellAreas {
    let (tabs, body, status) = match view.tabs_bar {
        TabsBarPosition::Top => {
            let [tabs, body, status] = Layout::vertical([
                Constraint::Length(1),
                Constraint::Min(0),
                Constraint::Length(1),
            ])
            .areas(area);
            (tabs, body, status)
        }
        TabsBarPosition::Bottom => {
            let [body, tabs, status] = Layout::vertical([
                Constraint::Min(0),
                Constraint::Length(1),
                Constraint::Length(1),
            ])
            .areas(area);
            (tabs, body, status)
        }
    };

    let count = u32::try_from(column_count.max(1)).unwrap_or(u32::MAX);
    let columns = Layout::horizontal((0..count).map(|_| Constraint::Ratio(1, count)))
        .split(body)
        .iter()
        .copied()
        .take(column_count)
        .collect();

    ShellAreas {
        tabs,
        columns,
        status,
    }
}

/// Index of the column at screen position (`x`, `y`).
pub fn column_at(areas: &ShellAreas, x: u16, y: u16) -> Option<usize> {
    areas.columns.iter().position(|area| {
        x >= area.x && x < area.x + area.width && y >= area.y && y < area.y + area.height
    })
}

/// Render the whole app into `buf`.
pub fn render(app: &App, area: Rect, buf: &mut Buffer) {
    let theme = &app.theme;
    let view = app.view();
    let areas = shell_areas(&view, app.columns.len(), area);

    render_tabs(app, theme, areas.tabs, buf);

    for (index, (column, column_area)) in app.columns.iter().zip(&areas.columns).enumerate() {
        render_column(
            column,
            &view.drawer,
            app.shell.snapshot().is_composing,
            index == app.focused,
            theme,
            *column_area,
            buf,
        );
    }

    render_status(app, &view, theme, areas.status, buf);

    if view.show_drop_overlay {
        render_upload_overlay(theme, area, buf);
    }
    if app.show_settings {
        render_settings_overlay(app, theme, area, buf);
    }
}

fn render_tabs(app: &App, theme: &Theme, area: Rect, buf: &mut Buffer) {
    let path = app.shell.location().path();
    let drawer = app.view().drawer;
    let mut spans = Vec::new();

    for (index, (label, route)) in TAB_LABELS.iter().zip(TAB_ROUTES).enumerate() {
        if index > 0 {
            spans.push(Span::styled(" │ ", Style::default().fg(theme.muted)));
        }

        let style = if path == route {
            Style::default()
                .fg(theme.primary)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(theme.subtext)
        };
        spans.push(Span::styled(format!("{} {label}", index + 1), style));

        if route == "/notifications" {
            if let Some(unread) = drawer.notifications_badge {
                spans.push(Span::styled(
                    format!(" ({unread})"),
                    Style::default().fg(theme.warning),
                ));
            }
        }
    }

    Paragraph::new(Line::from(spans))
        .style(Style::default().bg(theme.surface))
        .render(area, buf);
}

fn render_column(
    column: &Column,
    drawer: &DrawerView,
    is_composing: bool,
    focused: bool,
    theme: &Theme,
    area: Rect,
    buf: &mut Buffer,
) {
    let border = if focused {
        theme.border_focused
    } else {
        theme.border
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border))
        .title(Span::styled(
            format!(" {} ", column.pane().title()),
            Style::default().fg(theme.text),
        ));
    let inner = block.inner(area);
    block.render(area, buf);

    let lines = if column.pane() == Pane::Compose {
        drawer_lines(drawer, is_composing, theme)
    } else {
        timeline_lines(column, inner.height, theme)
    };

    Paragraph::new(lines).render(inner, buf);
}

fn timeline_lines(column: &Column, height: u16, theme: &Theme) -> Vec<Line<'static>> {
    // Truncation is intended: offsets are whole rows once settled.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let first = column.body().offset().round() as usize;

    (first..column.body().rows())
        .take(usize::from(height))
        .map(|row| {
            Line::from(vec![
                Span::styled(format!("#{:<4}", row + 1), Style::default().fg(theme.muted)),
                Span::styled(
                    format!("{} toot", column.pane().title()),
                    Style::default().fg(theme.text),
                ),
            ])
        })
        .collect()
}

fn drawer_lines(drawer: &DrawerView, is_composing: bool, theme: &Theme) -> Vec<Line<'static>> {
    let mut lines = Vec::new();

    if drawer.show_header {
        lines.push(Line::styled(
            "[s] settings",
            Style::default().fg(theme.secondary),
        ));
    }
    if drawer.show_search {
        lines.push(Line::styled("Search…", Style::default().fg(theme.muted)));
    }
    if drawer.show_results && drawer.results_visible {
        lines.push(Line::styled("Results", Style::default().fg(theme.info)));
    }
    if drawer.show_composer {
        let prompt = if is_composing {
            "Composing…"
        } else {
            "What is on your mind?"
        };
        lines.push(Line::default());
        lines.push(Line::styled(prompt, Style::default().fg(theme.text)));
    }
    if let Some(mascot) = drawer.mascot {
        let index = usize::try_from(mascot).unwrap_or_default() % MASCOTS.len();
        lines.push(Line::default());
        lines.push(Line::styled(MASCOTS[index], Style::default().fg(theme.primary)));
    }

    lines
}

fn render_status(app: &App, view: &ShellView, theme: &Theme, area: Rect, buf: &mut Buffer) {
    let mut text = format!("{} │ {}", view.classes, app.shell.location().path());
    if let Some(status) = &app.status {
        text.push_str(" │ ");
        text.push_str(status);
    }

    Paragraph::new(truncate(&text, usize::from(area.width)))
        .style(Style::default().fg(theme.subtext).bg(theme.surface))
        .render(area, buf);
}

fn render_upload_overlay(theme: &Theme, area: Rect, buf: &mut Buffer) {
    let popup = centered(area, 40, 5);
    Clear.render(popup, buf);

    Paragraph::new(vec![
        Line::default(),
        Line::styled(
            "Drag & drop to upload",
            Style::default()
                .fg(theme.primary)
                .add_modifier(Modifier::BOLD),
        )
        .centered(),
    ])
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme.primary))
            .style(Style::default().bg(theme.overlay)),
    )
    .render(popup, buf);
}

fn render_settings_overlay(app: &App, theme: &Theme, area: Rect, buf: &mut Buffer) {
    let popup = centered(area, 44, 10);
    Clear.render(popup, buf);

    let config = &app.config;
    let row = |label: &str, value: String| {
        Line::from(vec![
            Span::styled(format!("{label:<22}"), Style::default().fg(theme.subtext)),
            Span::styled(value, Style::default().fg(theme.text)),
        ])
    };

    Paragraph::new(vec![
        row("Layout", config.layout.to_string()),
        row("Stretch columns", config.stretch.to_string()),
        row("Tabs bar at bottom", config.navbar_under.to_string()),
        row("System font", config.system_font_ui.to_string()),
        row("Notifications badge", config.notifications_badge.to_string()),
        row("Resize debounce (ms)", config.resize_debounce_ms.to_string()),
        Line::default(),
        Line::styled("Esc to close", Style::default().fg(theme.muted)),
    ])
    .block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Settings ")
            .border_style(Style::default().fg(theme.secondary))
            .style(Style::default().bg(theme.overlay)),
    )
    .render(popup, buf);
}

/// A `width` x `height` rectangle centered in `area`, shrunk to fit.
fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    )
}

/// Cut `text` to at most `width` display cells, marking the cut with `…`.
pub fn truncate(text: &str, width: usize) -> String {
    if text.width() <= width {
        return text.to_string();
    }
    if width == 0 {
        return String::new();
    }

    let mut out = String::new();
    let mut used = 0;
    for c in text.chars() {
        let w = c.width().unwrap_or(0);
        if used + w > width - 1 {
            break;
        }
        out.push(c);
        used += w;
    }
    out.push('…');
    out
}
