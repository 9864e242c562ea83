//! Variables pane: the global table after the current step

use super::utils::{clamp_scroll, pane_block, variable_line, visible_height};
use crate::memory::globals::Variable;
use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{List, ListItem},
    Frame,
};

/// Render the variables pane
pub fn render_variables_pane(
    frame: &mut Frame,
    area: Rect,
    variables: &[Variable],
    is_focused: bool,
    scroll_offset: &mut usize,
) {
    let block = pane_block(" Variables ", is_focused);

    if variables.is_empty() {
        let empty = ListItem::new("(none)").style(Style::default().fg(DEFAULT_THEME.comment));
        frame.render_widget(List::new(vec![empty]).block(block), area);
        return;
    }

    let scope = variables.first().map(|v| v.scope.as_str()).unwrap_or("");
    let mut all_items = vec![ListItem::new(Line::from(vec![
        Span::styled("scope ", Style::default().fg(DEFAULT_THEME.comment)),
        Span::styled(scope.to_string(), Style::default().fg(DEFAULT_THEME.function)),
    ]))];
    all_items.extend(variables.iter().map(|var| ListItem::new(variable_line(var, 1))));

    let visible_height = visible_height(area);
    clamp_scroll(scroll_offset, all_items.len(), visible_height);

    let visible_items: Vec<ListItem> = all_items
        .into_iter()
        .skip(*scroll_offset)
        .take(visible_height)
        .collect();

    frame.render_widget(List::new(visible_items).block(block), area);
}
