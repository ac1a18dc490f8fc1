//! Scrollable selection list component

use blog_admin_core::{Component, EventKind};
use crossterm::event::KeyCode;
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::Line,
    widgets::{Block, Borders, List, ListItem, ListState},
    Frame,
};

/// Props for SelectList component
pub struct SelectListProps<'a, A> {
    /// Border title
    pub title: &'a str,
    /// Items to display
    pub items: &'a [String],
    /// Highlighted index
    pub selected: usize,
    /// Whether this component has focus
    pub is_focused: bool,
    /// Callback when the highlighted index changes (or enter re-confirms it)
    pub on_select: fn(usize) -> A,
}

/// A scrollable selection list with keyboard navigation
///
/// j/k/up/down move, g/G/home/end jump, enter re-emits the current index.
#[derive(Default)]
pub struct SelectList {
    scroll_offset: usize,
}

impl SelectList {
    pub fn new() -> Self {
        Self::default()
    }

    fn ensure_visible(&mut self, selected: usize, viewport_height: usize) {
        if viewport_height == 0 {
            return;
        }
        if selected < self.scroll_offset {
            self.scroll_offset = selected;
        } else if selected >= self.scroll_offset + viewport_height {
            self.scroll_offset = selected + 1 - viewport_height;
        }
    }
}

/// Index reached from `selected` by a navigation key in a list of `len`
/// items, `None` when the key is not a navigation key.
pub(crate) fn navigate(code: KeyCode, selected: usize, len: usize) -> Option<usize> {
    let last = len.saturating_sub(1);
    match code {
        KeyCode::Char('j') | KeyCode::Down => Some((selected + 1).min(last)),
        KeyCode::Char('k') | KeyCode::Up => Some(selected.saturating_sub(1)),
        KeyCode::Char('g') | KeyCode::Home => Some(0),
        KeyCode::Char('G') | KeyCode::End => Some(last),
        _ => None,
    }
}

pub(crate) fn highlight_style() -> Style {
    Style::default()
        .fg(Color::Black)
        .bg(Color::White)
        .add_modifier(Modifier::BOLD)
}

pub(crate) fn focus_border(is_focused: bool) -> Style {
    if is_focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default().fg(Color::DarkGray)
    }
}

impl<A> Component<A> for SelectList {
    type Props<'a> = SelectListProps<'a, A>;

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

        if key.code == KeyCode::Enter {
            return Some((props.on_select)(props.selected));
        }
        navigate(key.code, props.selected, props.items.len())
            .filter(|&idx| idx != props.selected)
            .map(props.on_select)
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, props: Self::Props<'_>) {
        let viewport_height = area.height.saturating_sub(2) as usize;
        self.ensure_visible(props.selected, viewport_height);

        let items: Vec<ListItem> = props
            .items
            .iter()
            .map(|item| ListItem::new(Line::raw(item.as_str())))
            .collect();

        let list = List::new(items)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(focus_border(props.is_focused))
                    .title(props.title),
            )
            .highlight_style(highlight_style());

        let mut state = ListState::default().with_selected(Some(props.selected));
        *state.offset_mut() = self.scroll_offset;

        frame.render_stateful_widget(list, area, &mut state);
    }
}
