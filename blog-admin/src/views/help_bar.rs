use blog_admin_core::{format_key_for_display, Component, Keybindings};
use ratatui::{
    layout::Rect,
    style::{Color, Style, Stylize},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::action::Action;
use crate::keys::{Command, RouteContext};

pub struct HelpBar;

pub struct HelpBarProps<'a> {
    pub bindings: &'a Keybindings<RouteContext>,
    pub context: RouteContext,
}

impl HelpBar {
    /// `(key, label)` pairs for the hints of `context`. Commands without a
    /// bound key are left out.
    pub fn hints(
        bindings: &Keybindings<RouteContext>,
        context: RouteContext,
    ) -> Vec<(String, &'static str)> {
        Command::hints(context)
            .iter()
            .filter_map(|command| {
                bindings
                    .first_key(command.name(), context)
                    .map(|key| (format_key_for_display(key), command.label()))
            })
            .collect()
    }
}

impl Component<Action> for HelpBar {
    type Props<'a> = HelpBarProps<'a>;

    fn render(&mut self, frame: &mut Frame, area: Rect, props: Self::Props<'_>) {
        let mut spans = vec![Span::raw(" ")];
        for (key, label) in Self::hints(props.bindings, props.context) {
            spans.push(Span::styled(key, Style::default().fg(Color::Cyan).bold()));
            spans.push(Span::styled(
                format!(" {}  ", label),
                Style::default().fg(Color::DarkGray),
            ));
        }
        frame.render_widget(Paragraph::new(Line::from(spans)), area);
    }
}
