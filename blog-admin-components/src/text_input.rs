//! Labelled single-line text field

use blog_admin_core::{Component, EventKind};
use crossterm::event::{KeyCode, KeyModifiers};
use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

/// Props for TextInput component
pub struct TextInputProps<'a, A> {
    /// Field label shown in the border
    pub label: &'a str,
    /// Current input value
    pub value: &'a str,
    /// Placeholder text when empty
    pub placeholder: &'a str,
    /// Whether this component has focus
    pub is_focused: bool,
    /// Validation message rendered under the label, in red
    pub error: Option<&'a str>,
    /// Callback when value changes
    pub on_change: fn(String) -> A,
}

/// A single-line text field with a cursor.
///
/// Handles typing, backspace, delete, cursor movement and the readline
/// shortcuts `ctrl+a`, `ctrl+e` and `ctrl+u`. Every edit emits `on_change`
/// with the whole new value; the value itself lives in application state.
#[derive(Default)]
pub struct TextInput {
    /// Cursor position (byte index into the value)
    cursor: usize,
}

impl TextInput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Put the cursor after the last character, e.g. when focusing a
    /// prefilled field.
    pub fn cursor_to_end(&mut self, value: &str) {
        self.cursor = value.len();
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    fn clamp_cursor(&mut self, value: &str) {
        self.cursor = self.cursor.min(value.len());
        while self.cursor > 0 && !value.is_char_boundary(self.cursor) {
            self.cursor -= 1;
        }
    }

    fn prev_boundary(&self, value: &str) -> usize {
        value[..self.cursor]
            .char_indices()
            .last()
            .map(|(i, _)| i)
            .unwrap_or(0)
    }

    fn next_boundary(&self, value: &str) -> usize {
        value[self.cursor..]
            .chars()
            .next()
            .map(|c| self.cursor + c.len_utf8())
            .unwrap_or(value.len())
    }

    fn insert_char(&mut self, value: &str, c: char) -> String {
        let mut new_value = String::with_capacity(value.len() + c.len_utf8());
        new_value.push_str(&value[..self.cursor]);
        new_value.push(c);
        new_value.push_str(&value[self.cursor..]);
        self.cursor += c.len_utf8();
        new_value
    }

    fn backspace(&mut self, value: &str) -> Option<String> {
        if self.cursor == 0 {
            return None;
        }
        let start = self.prev_boundary(value);
        let new_value = format!("{}{}", &value[..start], &value[self.cursor..]);
        self.cursor = start;
        Some(new_value)
    }

    fn delete(&self, value: &str) -> Option<String> {
        if self.cursor >= value.len() {
            return None;
        }
        let end = self.next_boundary(value);
        Some(format!("{}{}", &value[..self.cursor], &value[end..]))
    }
}

impl<A> Component<A> for TextInput {
    type Props<'a> = TextInputProps<'a, A>;

    fn handle_event(
        &mut self,
        event: &EventKind,
        props: Self::Props<'_>,
    ) -> impl IntoIterator<Item = A> {
        let EventKind::Key(key) = event else {
            return None;
        };
        if !props.is_focused {
            return None;
        }
        self.clamp_cursor(props.value);

        if key.modifiers.contains(KeyModifiers::CONTROL) {
            return match key.code {
                KeyCode::Char('a') => {
                    self.cursor = 0;
                    None
                }
                KeyCode::Char('e') => {
                    self.cursor = props.value.len();
                    None
                }
                KeyCode::Char('u') => {
                    self.cursor = 0;
                    Some((props.on_change)(String::new()))
                }
                _ => None,
            };
        }

        match key.code {
            KeyCode::Char(c) => {
                let new_value = self.insert_char(props.value, c);
                Some((props.on_change)(new_value))
            }
            KeyCode::Backspace => self.backspace(props.value).map(props.on_change),
            KeyCode::Delete => self.delete(props.value).map(props.on_change),
            KeyCode::Left => {
                self.cursor = self.prev_boundary(props.value);
                None
            }
            KeyCode::Right => {
                self.cursor = self.next_boundary(props.value);
                None
            }
            KeyCode::Home => {
                self.cursor = 0;
                None
            }
            KeyCode::End => {
                self.cursor = props.value.len();
                None
            }
            _ => None,
        }
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, props: Self::Props<'_>) {
        self.clamp_cursor(props.value);

        let border_style = match (props.error.is_some(), props.is_focused) {
            (true, _) => Style::default().fg(Color::Red),
            (false, true) => Style::default().fg(Color::Cyan),
            (false, false) => Style::default().fg(Color::DarkGray),
        };

        let mut block = Block::default()
            .borders(Borders::ALL)
            .border_style(border_style)
            .title(props.label);
        if let Some(error) = props.error {
            block = block.title_bottom(Line::from(Span::styled(
                error,
                Style::default().fg(Color::Red),
            )));
        }

        let text = if props.value.is_empty() {
            Span::styled(props.placeholder, Style::default().fg(Color::DarkGray))
        } else {
            Span::raw(props.value)
        };

        frame.render_widget(Paragraph::new(Line::from(text)).block(block), area);

        if props.is_focused && area.width > 2 && area.height > 2 {
            let column = props.value[..self.cursor].chars().count() as u16;
            let cursor_x = area.x + 1 + column;
            if cursor_x < area.x + area.width - 1 {
                frame.set_cursor_position((cursor_x, area.y + 1));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use blog_admin_core::testing::{char_key, key, RenderHarness};

    #[derive(Debug, Clone, PartialEq)]
    enum TestAction {
        Title(String),
    }

    fn props(value: &str) -> TextInputProps<'_, TestAction> {
        TextInputProps {
            label: "Title",
            value,
            placeholder: "",
            is_focused: true,
            error: None,
            on_change: TestAction::Title,
        }
    }

    fn press(input: &mut TextInput, value: &str, event: EventKind) -> Vec<TestAction> {
        input.handle_event(&event, props(value)).into_iter().collect()
    }

    #[test]
    fn test_typing_inserts_at_cursor() {
        let mut input = TextInput::new();
        let actions = press(&mut input, "", EventKind::Key(char_key('H')));
        assert_eq!(actions, vec![TestAction::Title("H".into())]);

        input.cursor_to_end("Hllo");
        input.cursor = 1;
        let actions = press(&mut input, "Hllo", EventKind::Key(char_key('e')));
        assert_eq!(actions, vec![TestAction::Title("Hello".into())]);
        assert_eq!(input.cursor(), 2);
    }

    #[test]
    fn test_backspace_and_delete() {
        let mut input = TextInput::new();
        input.cursor_to_end("héllo");

        let actions = press(&mut input, "héllo", EventKind::Key(key("backspace")));
        assert_eq!(actions, vec![TestAction::Title("héll".into())]);

        input.cursor = 1;
        let actions = press(&mut input, "héll", EventKind::Key(key("delete")));
        assert_eq!(actions, vec![TestAction::Title("hll".into())]);
    }

    #[test]
    fn test_backspace_at_start_is_noop() {
        let mut input = TextInput::new();
        assert!(press(&mut input, "hello", EventKind::Key(key("backspace"))).is_empty());
    }

    #[test]
    fn test_ctrl_u_clears() {
        let mut input = TextInput::new();
        input.cursor_to_end("draft");
        let actions = press(&mut input, "draft", EventKind::Key(key("ctrl+u")));
        assert_eq!(actions, vec![TestAction::Title(String::new())]);
        assert_eq!(input.cursor(), 0);
    }

    #[test]
    fn test_unfocused_ignores_typing() {
        let mut input = TextInput::new();
        let mut unfocused = props("");
        unfocused.is_focused = false;
        let actions: Vec<_> = input
            .handle_event(&EventKind::Key(char_key('x')), unfocused)
            .into_iter()
            .collect();
        assert!(actions.is_empty());
    }

    #[test]
    fn test_render_label_value_and_error() {
        let mut harness = RenderHarness::new(30, 3);
        let mut input = TextInput::new();

        let output = harness.render_to_string_plain(|frame| {
            let mut p = props("My post");
            p.error = Some("required");
            input.render(frame, frame.area(), p);
        });

        assert!(output.contains("Title"));
        assert!(output.contains("My post"));
        assert!(output.contains("required"));
    }
}
