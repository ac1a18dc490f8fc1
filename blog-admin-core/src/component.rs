//! Component trait for pure UI elements

use ratatui::{layout::Rect, Frame};

use crate::event::EventKind;

/// A pure UI component that renders based on props and emits actions
///
/// Props carry everything read-only the component needs (usually borrowed
/// straight out of the application state). `handle_event` translates a
/// terminal event into actions and never touches application state itself.
/// View-local bookkeeping such as a scroll offset or cursor position may live
/// in `&mut self`.
///
/// ```ignore
/// impl Component<Action> for EntryDetail {
///     type Props<'a> = EntryDetailProps<'a>;
///
///     fn handle_event(&mut self, event: &EventKind, props: Self::Props<'_>) -> impl IntoIterator<Item = Action> {
///         match event {
///             EventKind::Key(key) if key.code == KeyCode::Char('e') => {
///                 props.entry.id.map(|id| Action::RouteNavigate(Route::Edit(id)))
///             }
///             _ => None,
///         }
///     }
///
///     fn render(&mut self, frame: &mut Frame, area: Rect, props: Self::Props<'_>) {
///         frame.render_widget(Paragraph::new(props.entry.title.as_str()), area);
///     }
/// }
/// ```
pub trait Component<A> {
    /// Data required to render the component (read-only)
    type Props<'a>;

    /// Handle an event and return actions to dispatch
    ///
    /// Return `None`, `Some(action)` or a `Vec` of actions. Render-only
    /// components keep the default, which emits nothing.
    #[allow(unused_variables)]
    fn handle_event(
        &mut self,
        event: &EventKind,
        props: Self::Props<'_>,
    ) -> impl IntoIterator<Item = A> {
        None::<A>
    }

    /// Render the component to the frame
    fn render(&mut self, frame: &mut Frame, area: Rect, props: Self::Props<'_>);
}
