//! Screens of the admin and the shell that picks one per route
//!
//! [`AdminUi`] owns the view components (and with them any view-local state
//! such as text cursors) plus the active keybindings. It renders the screen
//! for the current route and routes terminal events to it.

mod delete_dialog;
mod detail;
mod help_bar;
mod list;
mod update;

pub use delete_dialog::{DeleteDialog, DeleteDialogProps};
pub use detail::{EntryDetail, EntryDetailProps};
pub use help_bar::{HelpBar, HelpBarProps};
pub use list::{EntryList, EntryListProps};
pub use update::{EntryUpdate, EntryUpdateProps};

use blog_admin_core::{Component, EventKind, EventOutcome, Keybindings};
use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Color, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::action::Action;
use crate::keys::{command_for, Command, RouteContext};
use crate::routes::Route;
use crate::state::AppState;

pub struct AdminUi {
    list: EntryList,
    detail: EntryDetail,
    update: EntryUpdate,
    delete: DeleteDialog,
    help: HelpBar,
    bindings: Keybindings<RouteContext>,
}

impl AdminUi {
    pub fn new(bindings: Keybindings<RouteContext>) -> Self {
        Self {
            list: EntryList,
            detail: EntryDetail,
            update: EntryUpdate::new(),
            delete: DeleteDialog,
            help: HelpBar,
            bindings,
        }
    }

    pub fn render(&mut self, frame: &mut Frame, area: Rect, state: &AppState) {
        let route = state.route();
        let chunks = Layout::vertical([
            Constraint::Length(1),
            Constraint::Min(1),
            Constraint::Length(1),
        ])
        .split(area);

        frame.render_widget(Paragraph::new(header_line(state)), chunks[0]);

        let body = chunks[1];
        match route {
            Route::List => self.list.render(
                frame,
                body,
                EntryListProps {
                    state,
                    bindings: &self.bindings,
                    is_focused: true,
                },
            ),
            Route::Detail(id) => self.detail.render(
                frame,
                body,
                EntryDetailProps {
                    state,
                    id: *id,
                    bindings: &self.bindings,
                    is_focused: true,
                },
            ),
            Route::New | Route::Edit(_) => self.update.render(
                frame,
                body,
                EntryUpdateProps {
                    state,
                    bindings: &self.bindings,
                    is_focused: true,
                },
            ),
            Route::Delete(id) => {
                self.list.render(
                    frame,
                    body,
                    EntryListProps {
                        state,
                        bindings: &self.bindings,
                        is_focused: false,
                    },
                );
                self.delete.render(
                    frame,
                    body,
                    DeleteDialogProps {
                        state,
                        id: *id,
                        bindings: &self.bindings,
                    },
                );
            }
            Route::NotFound(path) => {
                let text = vec![
                    Line::styled("Page not found", Style::default().fg(Color::Red).bold()),
                    Line::raw(format!("No screen matches {}", path)),
                ];
                frame.render_widget(
                    Paragraph::new(text).block(Block::default().borders(Borders::ALL)),
                    body,
                );
            }
        }

        self.help.render(
            frame,
            chunks[2],
            HelpBarProps {
                bindings: &self.bindings,
                context: RouteContext::from(route),
            },
        );
    }

    pub fn map_event(&mut self, event: &EventKind, state: &AppState) -> EventOutcome<Action> {
        if let EventKind::Resize(width, height) = event {
            return EventOutcome::action(Action::UiTerminalResize(*width, *height)).with_render();
        }

        match state.route() {
            Route::List => EventOutcome::from_actions(self.list.handle_event(
                event,
                EntryListProps {
                    state,
                    bindings: &self.bindings,
                    is_focused: true,
                },
            )),
            Route::Detail(id) => EventOutcome::from_actions(self.detail.handle_event(
                event,
                EntryDetailProps {
                    state,
                    id: *id,
                    bindings: &self.bindings,
                    is_focused: true,
                },
            )),
            Route::New | Route::Edit(_) => {
                let outcome = EventOutcome::from_actions(self.update.handle_event(
                    event,
                    EntryUpdateProps {
                        state,
                        bindings: &self.bindings,
                        is_focused: true,
                    },
                ));
                if outcome.is_ignored() && event.key().is_some() {
                    // cursor moves inside a text field change nothing in state
                    return EventOutcome::needs_render();
                }
                outcome
            }
            Route::Delete(id) => EventOutcome::from_actions(self.delete.handle_event(
                event,
                DeleteDialogProps {
                    state,
                    id: *id,
                    bindings: &self.bindings,
                },
            )),
            Route::NotFound(_) => {
                let command = event
                    .key()
                    .and_then(|key| command_for(&self.bindings, key, RouteContext::NotFound));
                match command {
                    Some(Command::Quit) => EventOutcome::action(Action::Quit),
                    Some(Command::Back) => EventOutcome::action(Action::RouteBack),
                    _ => EventOutcome::ignored(),
                }
            }
        }
    }
}

fn header_line(state: &AppState) -> Line<'static> {
    let route = state.route();
    let mut spans = vec![
        Span::styled(" Blog Admin ", Style::default().fg(Color::Black).bg(Color::Cyan).bold()),
        Span::raw(" "),
        Span::styled(route.title(), Style::default().bold()),
        Span::styled(format!("  {}", route.path()), Style::default().fg(Color::DarkGray)),
    ];
    if state.entries.is_busy() || state.blogs.is_busy() || state.tags.is_busy() {
        spans.push(Span::styled("  ◐", Style::default().fg(Color::Yellow)));
    }
    Line::from(spans)
}
