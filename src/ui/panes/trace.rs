//! Trace pane: the step log up to the current snapshot

use super::utils::{clamp_scroll, pane_block, visible_height};
use crate::snapshot::{Action, TraceEntry};
use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{List, ListItem},
    Frame,
};

fn action_color(action: Action) -> Color {
    match action {
        Action::Assignment => DEFAULT_THEME.success,
        Action::FunctionCall => DEFAULT_THEME.function,
        Action::Condition | Action::Loop => DEFAULT_THEME.keyword,
        Action::ConsoleOutput => DEFAULT_THEME.type_name,
        Action::Expression => DEFAULT_THEME.comment,
    }
}

/// Render the trace log; `error` is appended in red when the run halted here
pub fn render_trace_pane(
    frame: &mut Frame,
    area: Rect,
    trace: &[TraceEntry],
    error: Option<&str>,
    is_focused: bool,
    scroll_offset: &mut usize,
) {
    let block = pane_block(" Trace ", is_focused);

    let mut all_items: Vec<ListItem> = trace
        .iter()
        .map(|entry| {
            ListItem::new(Line::from(vec![
                Span::styled(
                    format!("{:>3} ", entry.step),
                    Style::default().fg(DEFAULT_THEME.comment),
                ),
                Span::styled(
                    format!("L{:<3} ", entry.line),
                    Style::default().fg(DEFAULT_THEME.secondary),
                ),
                Span::styled(
                    format!("{:<14} ", entry.action.label()),
                    Style::default().fg(action_color(entry.action)),
                ),
                Span::styled(entry.details.clone(), Style::default().fg(DEFAULT_THEME.fg)),
            ]))
        })
        .collect();

    if let Some(message) = error {
        all_items.push(
            ListItem::new(format!("  ✗ {}", message))
                .style(Style::default().fg(DEFAULT_THEME.error)),
        );
    }

    if all_items.is_empty() {
        all_items.push(
            ListItem::new("(no steps yet)").style(Style::default().fg(DEFAULT_THEME.comment)),
        );
    }

    let visible_height = visible_height(area);
    clamp_scroll(scroll_offset, all_items.len(), visible_height);

    let visible_items: Vec<ListItem> = all_items
        .into_iter()
        .skip(*scroll_offset)
        .take(visible_height)
        .collect();

    frame.render_widget(List::new(visible_items).block(block), area);
}
