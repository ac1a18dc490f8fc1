use blog_admin_core::{Component, EventKind, Keybindings};
use ratatui::{
    layout::Rect,
    style::{Color, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use crate::action::Action;
use crate::dates;
use crate::keys::{command_for, Command, RouteContext};
use crate::model::{BlogEntry, Tag};
use crate::routes::Route;
use crate::state::AppState;

pub struct EntryDetailProps<'a> {
    pub state: &'a AppState,
    pub id: i64,
    pub bindings: &'a Keybindings<RouteContext>,
    pub is_focused: bool,
}

#[derive(Default)]
pub struct EntryDetail;

fn field<'a>(label: &'a str, value: String) -> Line<'a> {
    Line::from(vec![
        Span::styled(format!("{:<14}", label), Style::default().fg(Color::Cyan).bold()),
        Span::raw(value),
    ])
}

fn image_summary(entry: &BlogEntry) -> String {
    match (&entry.image_content_type, entry.image_size()) {
        (Some(content_type), Some(size)) => format!("{}, {} bytes", content_type, size),
        (None, Some(size)) => format!("{} bytes", size),
        _ => String::new(),
    }
}

impl Component<Action> for EntryDetail {
    type Props<'a> = EntryDetailProps<'a>;

    fn handle_event(
        &mut self,
        event: &EventKind,
        props: Self::Props<'_>,
    ) -> impl IntoIterator<Item = Action> {
        let command = match event {
            EventKind::Key(key) if props.is_focused => {
                command_for(props.bindings, key, RouteContext::Detail)
            }
            _ => None,
        };
        match command {
            Some(Command::Quit) => Some(Action::Quit),
            Some(Command::Back) => Some(Action::RouteBack),
            Some(Command::EntryEdit) => Some(Action::RouteNavigate(Route::Edit(props.id))),
            _ => None,
        }
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, props: Self::Props<'_>) {
        let entries = &props.state.entries;
        let entry = &entries.entity;

        let mut lines = Vec::new();
        if entries.loading {
            lines.push(Line::styled("Loading...", Style::default().fg(Color::Yellow)));
        } else if let Some(error) = &entries.error_message {
            lines.push(Line::styled(error.to_string(), Style::default().fg(Color::Red)));
        } else if entry.id == Some(props.id) {
            lines.push(field("ID", props.id.to_string()));
            lines.push(field("Title", entry.title.clone()));
            lines.push(field("Date", dates::from_server(entry.date)));
            lines.push(field("Blog", entry.blog.as_ref().map(|b| b.label()).unwrap_or_default()));
            lines.push(field(
                "Tags",
                entry.tags.iter().map(Tag::label).collect::<Vec<_>>().join(", "),
            ));
            lines.push(field("Image", image_summary(entry)));
            lines.push(Line::raw(""));
            lines.push(Line::styled("Content", Style::default().fg(Color::Cyan).bold()));
            lines.extend(entry.content.lines().map(|l| Line::raw(l.to_string())));
        }

        let paragraph = Paragraph::new(lines).wrap(Wrap { trim: false }).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Rgb(80, 80, 100)))
                .title(format!(" Blog Entry {} ", props.id)),
        );
        frame.render_widget(paragraph, area);
    }
}
