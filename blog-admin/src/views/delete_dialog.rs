use blog_admin_components::{centered_rect, render_modal, ModalStyle};
use blog_admin_core::{Component, EventKind, Keybindings};
use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Style, Stylize},
    text::Line,
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use crate::action::Action;
use crate::keys::{command_for, Command, RouteContext};
use crate::state::AppState;

const DIALOG_WIDTH: u16 = 56;
const DIALOG_HEIGHT: u16 = 8;

pub struct DeleteDialogProps<'a> {
    pub state: &'a AppState,
    pub id: i64,
    pub bindings: &'a Keybindings<RouteContext>,
}

/// Confirmation modal drawn over the entry list.
#[derive(Default)]
pub struct DeleteDialog;

impl Component<Action> for DeleteDialog {
    type Props<'a> = DeleteDialogProps<'a>;

    fn handle_event(
        &mut self,
        event: &EventKind,
        props: Self::Props<'_>,
    ) -> impl IntoIterator<Item = Action> {
        let command = match event {
            EventKind::Key(key) => command_for(props.bindings, key, RouteContext::DeleteDialog),
            _ => None,
        };
        match command {
            Some(Command::DeleteConfirm) if !props.state.entries.updating => {
                Some(Action::DeleteConfirm)
            }
            Some(Command::DeleteCancel) => Some(Action::RouteBack),
            Some(Command::Quit) => Some(Action::Quit),
            _ => None,
        }
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, props: Self::Props<'_>) {
        let entries = &props.state.entries;
        let modal_area = centered_rect(DIALOG_WIDTH, DIALOG_HEIGHT, area);
        render_modal(frame, modal_area, &ModalStyle::default());

        let mut lines = vec![Line::from(format!(
            "Are you sure you want to delete Blog Entry {}?",
            props.id
        ))];
        if entries.entity.id == Some(props.id) && !entries.entity.title.is_empty() {
            lines.push(Line::from(format!("\"{}\"", entries.entity.title)).italic());
        }
        lines.push(Line::default());
        if entries.updating {
            lines.push(Line::styled("Deleting...", Style::default().fg(Color::Yellow)));
        } else if let Some(error) = &entries.error_message {
            lines.push(Line::styled(error.to_string(), Style::default().fg(Color::Red)));
        }

        let dialog = Paragraph::new(lines)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::Red))
                    .title(" Confirm delete operation "),
            );
        frame.render_widget(dialog, modal_area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keys::default_keybindings;
    use crate::model::BlogEntry;
    use blog_admin_core::testing::{key_event, RenderHarness};

    #[test]
    fn test_confirm_and_cancel() {
        let kb = default_keybindings();
        let mut state = AppState::default();
        let press = |state: &AppState, k: &str| {
            DeleteDialog.handle_event(
                &key_event(k),
                DeleteDialogProps {
                    state,
                    id: 2,
                    bindings: &kb,
                },
            )
            .into_iter()
            .next()
        };
        assert_eq!(press(&state, "y"), Some(Action::DeleteConfirm));
        assert_eq!(press(&state, "enter"), Some(Action::DeleteConfirm));
        assert_eq!(press(&state, "n"), Some(Action::RouteBack));
        assert_eq!(press(&state, "esc"), Some(Action::RouteBack));

        state.entries.updating = true;
        assert_eq!(press(&state, "y"), None);
    }

    #[test]
    fn test_render_shows_entry_title() {
        let kb = default_keybindings();
        let mut state = AppState::default();
        state.entries.entity = BlogEntry {
            id: Some(2),
            title: "Old news".into(),
            ..Default::default()
        };

        let mut render = RenderHarness::new(80, 20);
        let output = render.render_to_string_plain(|frame| {
            DeleteDialog.render(
                frame,
                frame.area(),
                DeleteDialogProps {
                    state: &state,
                    id: 2,
                    bindings: &kb,
                },
            )
        });
        assert!(output.contains("Confirm delete operation"));
        assert!(output.contains("Blog Entry 2?"));
        assert!(output.contains("\"Old news\""));
    }
}
