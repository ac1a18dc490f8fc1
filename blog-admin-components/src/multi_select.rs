//! Checkbox list for picking any number of items

use blog_admin_core::{Component, EventKind};
use crossterm::event::KeyCode;
use ratatui::{
    layout::Rect,
    text::Line,
    widgets::{Block, Borders, List, ListItem, ListState},
    Frame,
};

use crate::select_list::{focus_border, highlight_style, navigate};

/// Props for MultiSelect component
pub struct MultiSelectProps<'a, A> {
    /// Border title
    pub title: &'a str,
    /// Items to display
    pub items: &'a [String],
    /// Which items are checked, parallel to `items`
    pub checked: &'a [bool],
    /// Row under the cursor
    pub cursor: usize,
    /// Whether this component has focus
    pub is_focused: bool,
    /// Callback when the cursor moves
    pub on_move: fn(usize) -> A,
    /// Callback when the item under the cursor is toggled (space or enter)
    pub on_toggle: fn(usize) -> A,
}

/// A list of checkboxes. Navigation matches [`SelectList`](crate::SelectList).
#[derive(Default)]
pub struct MultiSelect {
    scroll_offset: usize,
}

impl MultiSelect {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<A> Component<A> for MultiSelect {
    type Props<'a> = MultiSelectProps<'a, A>;

    fn handle_event(
        &mut self,
        event: &EventKind,
        props: Self::Props<'_>,
    ) -> impl IntoIterator<Item = A> {
        if !props.is_focused || props.items.is_empty() {
            return None;
        }
        let EventKind::Key(key) = event else {
            return None;
        };

        match key.code {
            KeyCode::Char(' ') | KeyCode::Enter => Some((props.on_toggle)(props.cursor)),
            code => navigate(code, props.cursor, props.items.len())
                .filter(|&idx| idx != props.cursor)
                .map(props.on_move),
        }
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, props: Self::Props<'_>) {
        let viewport_height = area.height.saturating_sub(2) as usize;
        if viewport_height > 0 {
            if props.cursor < self.scroll_offset {
                self.scroll_offset = props.cursor;
            } else if props.cursor >= self.scroll_offset + viewport_height {
                self.scroll_offset = props.cursor + 1 - viewport_height;
            }
        }

        let items: Vec<ListItem> = props
            .items
            .iter()
            .enumerate()
            .map(|(i, item)| {
                let mark = if props.checked.get(i).copied().unwrap_or(false) {
                    "[x]"
                } else {
                    "[ ]"
                };
                ListItem::new(Line::raw(format!("{} {}", mark, item)))
            })
            .collect();

        let list = List::new(items)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(focus_border(props.is_focused))
                    .title(props.title),
            )
            .highlight_style(if props.is_focused {
                highlight_style()
            } else {
                Default::default()
            });

        let mut state = ListState::default().with_selected(Some(props.cursor));
        *state.offset_mut() = self.scroll_offset;
        frame.render_stateful_widget(list, area, &mut state);
    }
}
