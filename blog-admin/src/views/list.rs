//! Entry list: table with infinite scroll

use blog_admin_core::{Component, EventKind, Keybindings};
use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style, Stylize},
    text::Line,
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState},
    Frame,
};

use crate::action::Action;
use crate::dates;
use crate::keys::{command_for, Command, RouteContext};
use crate::model::{BlogEntry, Tag};
use crate::routes::Route;
use crate::state::AppState;

const CONTENT_PREVIEW: usize = 40;

pub struct EntryListProps<'a> {
    pub state: &'a AppState,
    pub bindings: &'a Keybindings<RouteContext>,
    pub is_focused: bool,
}

#[derive(Default)]
pub struct EntryList;

impl EntryList {
    fn command_action(command: Command, state: &AppState) -> Option<Action> {
        let selected = state.selected_id();
        match command {
            Command::Quit => Some(Action::Quit),
            Command::EntryNew => Some(Action::RouteNavigate(Route::New)),
            Command::EntryView => selected.map(|id| Action::RouteNavigate(Route::Detail(id))),
            Command::EntryEdit => selected.map(|id| Action::RouteNavigate(Route::Edit(id))),
            Command::EntryDelete => selected.map(|id| Action::RouteNavigate(Route::Delete(id))),
            Command::ListDown => {
                let next = state.selected + 1;
                if next < state.entries.entities.len() {
                    Some(Action::ListSelect(next))
                } else if state.can_load_more() {
                    // scrolled past the last row
                    Some(Action::ListLoadMore)
                } else {
                    None
                }
            }
            Command::ListUp if state.selected > 0 => Some(Action::ListSelect(state.selected - 1)),
            Command::ListMore => Some(Action::ListLoadMore),
            Command::ListSort => Some(Action::ListSortToggle),
            Command::ListRefresh => Some(Action::ListRefresh),
            _ => None,
        }
    }

    fn row(entry: &BlogEntry) -> Row<'_> {
        Row::new(vec![
            Cell::from(entry.id.map(|id| id.to_string()).unwrap_or_default()),
            Cell::from(entry.title.as_str()),
            Cell::from(preview(&entry.content)),
            Cell::from(dates::from_server(entry.date)),
            Cell::from(entry.blog.as_ref().map(|b| b.label()).unwrap_or_default()),
            Cell::from(
                entry
                    .tags
                    .iter()
                    .map(Tag::label)
                    .collect::<Vec<_>>()
                    .join(", "),
            ),
        ])
    }

    fn status_line(state: &AppState) -> Line<'static> {
        let entries = &state.entries;
        if entries.loading {
            return Line::styled("Loading...", Style::default().fg(Color::Yellow));
        }
        if let Some(error) = &entries.error_message {
            return Line::styled(error.to_string(), Style::default().fg(Color::Red));
        }
        if entries.entities.is_empty() {
            return Line::styled("No Blog Entries found", Style::default().fg(Color::DarkGray));
        }
        let more = if state.can_load_more() { ", more available" } else { "" };
        Line::styled(
            format!(
                "Showing {} of {} entries, sorted by {}{}",
                entries.entities.len(),
                entries.total_items,
                state.sort,
                more
            ),
            Style::default().fg(Color::DarkGray),
        )
    }
}

/// First line of `content`, cut to a preview length.
fn preview(content: &str) -> String {
    let line = content.lines().next().unwrap_or("");
    let mut out: String = line.chars().take(CONTENT_PREVIEW).collect();
    if line.chars().count() > CONTENT_PREVIEW || content.lines().nth(1).is_some() {
        out.push('…');
    }
    out
}

impl Component<Action> for EntryList {
    type Props<'a> = EntryListProps<'a>;

    fn handle_event(
        &mut self,
        event: &EventKind,
        props: Self::Props<'_>,
    ) -> impl IntoIterator<Item = Action> {
        let command = match event {
            EventKind::Key(key) if props.is_focused => {
                command_for(props.bindings, key, RouteContext::List)
            }
            _ => None,
        };
        command.and_then(|command| Self::command_action(command, props.state))
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, props: Self::Props<'_>) {
        let state = props.state;
        let chunks = Layout::vertical([Constraint::Min(3), Constraint::Length(1)]).split(area);

        let header = Row::new(vec!["ID", "Title", "Content", "Date", "Blog", "Tags"])
            .style(Style::default().fg(Color::Cyan).bold());
        let rows: Vec<Row> = state.entries.entities.iter().map(Self::row).collect();
        let widths = [
            Constraint::Length(6),
            Constraint::Percentage(20),
            Constraint::Percentage(30),
            Constraint::Length(16),
            Constraint::Percentage(15),
            Constraint::Percentage(20),
        ];

        let table = Table::new(rows, widths)
            .header(header)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::Rgb(80, 80, 100)))
                    .title(format!(" Blog Entries ({}) ", state.entries.total_items)),
            )
            .row_highlight_style(
                Style::default()
                    .fg(Color::Black)
                    .bg(Color::White)
                    .add_modifier(Modifier::BOLD),
            );

        let selected = (!state.entries.entities.is_empty()).then_some(state.selected);
        let mut table_state = TableState::default().with_selected(selected);
        frame.render_stateful_widget(table, chunks[0], &mut table_state);

        frame.render_widget(Paragraph::new(Self::status_line(state)), chunks[1]);
    }
}
