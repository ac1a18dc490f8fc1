//! Create / edit form
//!
//! Form-level commands (save, cancel, focus cycling, image attach) are looked
//! up first; any other key goes to the focused field's widget.

use blog_admin_components::{
    MultiSelect, MultiSelectProps, SelectList, SelectListProps, TextInput, TextInputProps,
};
use blog_admin_core::{Component, EventKind, Keybindings};
use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Color, Style},
    text::Line,
    widgets::Paragraph,
    Frame,
};

use crate::action::Action;
use crate::form::Field;
use crate::keys::{command_for, Command, RouteContext};
use crate::state::AppState;

pub struct EntryUpdateProps<'a> {
    pub state: &'a AppState,
    pub bindings: &'a Keybindings<RouteContext>,
    pub is_focused: bool,
}

#[derive(Default)]
pub struct EntryUpdate {
    title: TextInput,
    content: TextInput,
    date: TextInput,
    image_path: TextInput,
    blog: SelectList,
    tags: MultiSelect,
}

impl EntryUpdate {
    pub fn new() -> Self {
        Self::default()
    }

    fn command_action(command: Command) -> Option<Action> {
        match command {
            Command::FormSave => Some(Action::FormSave),
            Command::FormCancel => Some(Action::RouteBack),
            Command::FormNext => Some(Action::FormFocusNext),
            Command::FormPrev => Some(Action::FormFocusPrev),
            Command::FormAttach => Some(Action::FormImageAttach),
            Command::FormClearImage => Some(Action::FormImageClear),
            Command::Quit => Some(Action::Quit),
            _ => None,
        }
    }

    fn text_props<'a>(
        state: &'a AppState,
        field: Field,
        is_focused: bool,
    ) -> TextInputProps<'a, Action> {
        let form = &state.form;
        let (value, placeholder, on_change): (&str, &str, fn(String) -> Action) = match field {
            Field::Content => (form.content.as_str(), "", Action::FormContent),
            Field::Date => (form.date.as_str(), "YYYY-MM-DD HH:mm", Action::FormDate),
            Field::Image => (
                form.image_path.as_str(),
                "path to an image file",
                Action::FormImagePath,
            ),
            _ => (form.title.as_str(), "", Action::FormTitle),
        };
        TextInputProps {
            label: field.label(),
            value,
            placeholder,
            is_focused: is_focused && form.focus == field,
            error: form.error_for(field),
            on_change,
        }
    }

    fn image_line(state: &AppState) -> Line<'static> {
        let entry = &state.entries.entity;
        if let Some(status) = &state.form.status {
            return Line::styled(status.clone(), Style::default().fg(Color::Yellow));
        }
        match (&entry.image_content_type, entry.image_size()) {
            (Some(content_type), Some(size)) => Line::raw(format!(
                "Image: {}, {} bytes",
                content_type, size
            )),
            _ => Line::styled("No image", Style::default().fg(Color::DarkGray)),
        }
    }

    fn footer_line(state: &AppState) -> Line<'static> {
        let entries = &state.entries;
        if entries.updating {
            Line::styled("Saving...", Style::default().fg(Color::Yellow))
        } else if entries.loading {
            Line::styled("Loading...", Style::default().fg(Color::Yellow))
        } else if let Some(error) = &entries.error_message {
            Line::styled(error.to_string(), Style::default().fg(Color::Red))
        } else {
            Line::default()
        }
    }
}

impl Component<Action> for EntryUpdate {
    type Props<'a> = EntryUpdateProps<'a>;

    fn handle_event(
        &mut self,
        event: &EventKind,
        props: Self::Props<'_>,
    ) -> impl IntoIterator<Item = Action> {
        if !props.is_focused {
            return None;
        }
        let EventKind::Key(key) = event else {
            return None;
        };
        if let Some(command) = command_for(props.bindings, key, RouteContext::Form) {
            return Self::command_action(command);
        }

        let state = props.state;
        let focus = state.form.focus;
        match focus {
            Field::Title | Field::Content | Field::Date | Field::Image => {
                let input = match focus {
                    Field::Content => &mut self.content,
                    Field::Date => &mut self.date,
                    Field::Image => &mut self.image_path,
                    _ => &mut self.title,
                };
                let action = input
                    .handle_event(event, Self::text_props(state, focus, true))
                    .into_iter()
                    .next();
                action
            }
            Field::Blog => {
                let items = state.blog_options();
                let action = self
                    .blog
                    .handle_event(
                        event,
                        SelectListProps {
                            title: "Blog",
                            items: &items,
                            selected: state.blog_option_index(),
                            is_focused: true,
                            on_select: Action::FormBlogSelect,
                        },
                    )
                    .into_iter()
                    .next();
                action
            }
            Field::Tags => {
                let items = state.tag_options();
                let checked = state.tag_checks();
                let action = self
                    .tags
                    .handle_event(
                        event,
                        MultiSelectProps {
                            title: "Tags",
                            items: &items,
                            checked: &checked,
                            cursor: state.form.tag_cursor,
                            is_focused: true,
                            on_move: Action::FormTagCursor,
                            on_toggle: Action::FormTagToggle,
                        },
                    )
                    .into_iter()
                    .next();
                action
            }
        }
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, props: Self::Props<'_>) {
        let state = props.state;
        let focused = props.is_focused;

        let rows = Layout::vertical([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Min(4),
            Constraint::Length(3),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .split(area);

        self.title
            .render(frame, rows[0], Self::text_props(state, Field::Title, focused));
        self.content
            .render(frame, rows[1], Self::text_props(state, Field::Content, focused));
        self.date
            .render(frame, rows[2], Self::text_props(state, Field::Date, focused));

        let refs = Layout::horizontal([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(rows[3]);
        let blog_items = state.blog_options();
        self.blog.render(
            frame,
            refs[0],
            SelectListProps {
                title: "Blog",
                items: &blog_items,
                selected: state.blog_option_index(),
                is_focused: focused && state.form.focus == Field::Blog,
                on_select: Action::FormBlogSelect,
            },
        );
        let tag_items = state.tag_options();
        let checked = state.tag_checks();
        self.tags.render(
            frame,
            refs[1],
            MultiSelectProps {
                title: "Tags",
                items: &tag_items,
                checked: &checked,
                cursor: state.form.tag_cursor,
                is_focused: focused && state.form.focus == Field::Tags,
                on_move: Action::FormTagCursor,
                on_toggle: Action::FormTagToggle,
            },
        );

        self.image_path
            .render(frame, rows[4], Self::text_props(state, Field::Image, focused));
        frame.render_widget(Paragraph::new(Self::image_line(state)), rows[5]);
        frame.render_widget(Paragraph::new(Self::footer_line(state)), rows[6]);
    }
}
