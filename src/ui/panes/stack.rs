//! Stack pane rendering with simulated call frames
//!
//! Frames are pushed on every call and never popped, so the pane shows the full call
//! history of the run up to the current step, oldest first.
//!
//! # Layout
//!
//! Each frame is displayed as:
//! - Frame index and function name
//! - Call site: line number and source text
//! - Bound parameters with change markers

use super::utils::{clamp_scroll, pane_block, variable_line, visible_height};
use crate::memory::stack::CallFrame;
use crate::parser::source::SourceLines;
use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{List, ListItem},
    Frame,
};

/// Scroll state for the stack pane
#[derive(Debug, Default)]
pub struct StackScrollState {
    pub offset: usize,
    pub prev_item_count: usize,
}

/// Data needed to render the stack pane
pub struct StackRenderData<'a> {
    pub frames: &'a [CallFrame],
    pub lines: &'a SourceLines,
}

/// Render the stack pane
pub fn render_stack_pane(
    frame: &mut Frame,
    area: Rect,
    data: StackRenderData,
    is_focused: bool,
    scroll_state: &mut StackScrollState,
) {
    let block = pane_block(" Call Stack ", is_focused);
    let mut all_items = Vec::new();

    if data.frames.is_empty() {
        all_items.push(
            ListItem::new("(global scope)").style(Style::default().fg(DEFAULT_THEME.comment)),
        );
    }

    for (depth, call) in data.frames.iter().enumerate() {
        all_items.push(ListItem::new(Line::from(vec![
            Span::styled("▸ ", Style::default().fg(DEFAULT_THEME.secondary)),
            Span::styled(
                format!("Frame {} ", depth),
                Style::default().fg(DEFAULT_THEME.comment),
            ),
            Span::styled("│ ", Style::default().fg(DEFAULT_THEME.comment)),
            Span::styled(
                format!("{}()", call.function_name),
                Style::default()
                    .fg(DEFAULT_THEME.function)
                    .add_modifier(Modifier::BOLD),
            ),
        ])));

        let call_site = data.lines.get(call.line_number).unwrap_or("???");
        all_items.push(ListItem::new(Line::from(vec![
            Span::styled(
                format!("  ↪ line {} → ", call.line_number),
                Style::default().fg(DEFAULT_THEME.comment),
            ),
            Span::styled(
                call_site.to_string(),
                Style::default().fg(DEFAULT_THEME.muted_function),
            ),
        ])));

        for param in &call.parameters {
            all_items.push(ListItem::new(variable_line(param, 4)));
        }

        if let Some(value) = &call.return_value {
            all_items.push(ListItem::new(Line::from(vec![
                Span::styled("    ↖ return ", Style::default().fg(DEFAULT_THEME.comment)),
                Span::styled(value.to_literal(), Style::default().fg(DEFAULT_THEME.modified)),
            ])));
        }
    }

    // Follow the newest frame when one is added
    let total_items = all_items.len();
    if total_items > scroll_state.prev_item_count {
        scroll_state.offset = usize::MAX;
    }
    scroll_state.prev_item_count = total_items;

    let visible_height = visible_height(area);
    clamp_scroll(&mut scroll_state.offset, total_items, visible_height);

    let visible_items: Vec<ListItem> = all_items
        .into_iter()
        .skip(scroll_state.offset)
        .take(visible_height)
        .collect();

    frame.render_widget(List::new(visible_items).block(block), area);
}
