//! Shared helpers for pane rendering

use crate::memory::globals::Variable;
use crate::memory::value::Value;
use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders},
};

/// Bordered block with the focus-dependent border style every pane uses
pub fn pane_block(title: &str, is_focused: bool) -> Block<'_> {
    let border_style = if is_focused {
        Style::default()
            .fg(DEFAULT_THEME.border_focused)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(DEFAULT_THEME.border_normal)
    };

    Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(border_style)
}

/// Rows available inside a bordered pane, at least 1
pub fn visible_height(area: Rect) -> usize {
    area.height.saturating_sub(2).max(1) as usize
}

/// Clamp a scroll offset so the last page stays full.
///
/// `usize::MAX` is used by callers to mean "follow the bottom".
pub fn clamp_scroll(offset: &mut usize, total_items: usize, visible_height: usize) {
    if total_items > visible_height {
        *offset = (*offset).min(total_items - visible_height);
    } else {
        *offset = 0;
    }
}

/// Value colored by its type, text quoted
pub fn format_value_styled(value: &Value) -> Span<'static> {
    let color = match value {
        Value::Number(_) => DEFAULT_THEME.number,
        Value::String(_) => DEFAULT_THEME.string,
        Value::Boolean(_) => DEFAULT_THEME.keyword,
        Value::Undefined | Value::Null => DEFAULT_THEME.comment,
        Value::Opaque(_) => DEFAULT_THEME.fg,
    };
    Span::styled(value.to_literal(), Style::default().fg(color))
}

/// `name: type = value` with change markers, indented by `indent` spaces
pub fn variable_line(var: &Variable, indent: usize) -> Line<'static> {
    let name_style = if var.is_new {
        Style::default()
            .fg(DEFAULT_THEME.success)
            .add_modifier(Modifier::BOLD)
    } else if var.is_modified {
        Style::default()
            .fg(DEFAULT_THEME.modified)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(DEFAULT_THEME.fg)
    };

    let mut spans = vec![
        Span::raw(" ".repeat(indent)),
        Span::styled(var.name.clone(), name_style),
        Span::styled(": ", Style::default().fg(DEFAULT_THEME.comment)),
        Span::styled(
            var.kind.as_str(),
            Style::default().fg(DEFAULT_THEME.type_name),
        ),
        Span::styled(" = ", Style::default().fg(DEFAULT_THEME.comment)),
        format_value_styled(&var.value),
    ];

    if var.is_new {
        spans.push(Span::styled(
            "  new",
            Style::default().fg(DEFAULT_THEME.success),
        ));
    } else if var.is_modified {
        spans.push(Span::styled(
            "  modified",
            Style::default().fg(DEFAULT_THEME.modified),
        ));
    }

    Line::from(spans)
}
