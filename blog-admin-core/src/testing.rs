//! Test utilities for blog-admin
//!
//! - [`key`] / [`key_event`]: build key events from strings (`"ctrl+s"`)
//! - [`TestHarness`]: drive a reducer and collect the effects it declares
//! - [`RenderHarness`]: render into a [`TestBackend`] and read the buffer back
//!   as plain text
//! - `assert_emitted!` and friends for checking emitted actions or effects
//!
//! ```ignore
//! use blog_admin_core::testing::{key_event, TestHarness};
//!
//! let mut harness = TestHarness::new(AppState::default(), reducer);
//! harness.dispatch(Action::ListFetch);
//! let effects = harness.drain_effects();
//! assert_emitted!(effects, Effect::Remote(_));
//! ```

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyEventState, KeyModifiers};
use ratatui::backend::TestBackend;
use ratatui::buffer::Buffer;
use ratatui::{Frame, Terminal};
use tokio::sync::mpsc;

use crate::action::Action;
use crate::event::EventKind;
use crate::keybindings::parse_key_string;
use crate::store::{DispatchResult, EffectReducer};

/// Create a `KeyEvent` from a key string.
///
/// # Panics
///
/// Panics if the key string cannot be parsed.
pub fn key(s: &str) -> KeyEvent {
    parse_key_string(s).unwrap_or_else(|| panic!("Invalid key string: {:?}", s))
}

/// Create a `KeyEvent` for a character with no modifiers.
///
/// Unlike [`key`], case is preserved, which matters for text inputs.
pub fn char_key(c: char) -> KeyEvent {
    KeyEvent {
        code: KeyCode::Char(c),
        modifiers: KeyModifiers::empty(),
        kind: KeyEventKind::Press,
        state: KeyEventState::empty(),
    }
}

/// Create a `KeyEvent` for a character with Ctrl modifier.
pub fn ctrl_key(c: char) -> KeyEvent {
    KeyEvent {
        code: KeyCode::Char(c),
        modifiers: KeyModifiers::CONTROL,
        kind: KeyEventKind::Press,
        state: KeyEventState::empty(),
    }
}

/// Wrap a key string as an [`EventKind`] for `Component::handle_event`.
pub fn key_event(s: &str) -> EventKind {
    EventKind::Key(key(s))
}

/// Type each character of `text` as its own key event.
pub fn type_text(text: &str) -> Vec<EventKind> {
    text.chars().map(|c| EventKind::Key(char_key(c))).collect()
}

/// Reducer-level harness: applies actions to a state and keeps the effects
/// they declare so tests can inspect them without a runtime.
pub struct TestHarness<S, A: Action, E> {
    /// The application state under test
    pub state: S,
    reducer: EffectReducer<S, A, E>,
    effects: Vec<E>,
    tx: mpsc::UnboundedSender<A>,
    rx: mpsc::UnboundedReceiver<A>,
}

impl<S, A: Action, E> TestHarness<S, A, E> {
    pub fn new(state: S, reducer: EffectReducer<S, A, E>) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            state,
            reducer,
            effects: Vec::new(),
            tx,
            rx,
        }
    }

    /// Apply one action. Effects are stored for [`drain_effects`](Self::drain_effects).
    pub fn dispatch(&mut self, action: A) -> bool {
        let DispatchResult { changed, effects } = (self.reducer)(&mut self.state, action);
        self.effects.extend(effects);
        changed
    }

    /// Apply several actions in order, returning whether any changed state.
    pub fn dispatch_all(&mut self, actions: impl IntoIterator<Item = A>) -> bool {
        actions
            .into_iter()
            .fold(false, |changed, action| self.dispatch(action) || changed)
    }

    /// Take all effects declared since the last drain.
    pub fn drain_effects(&mut self) -> Vec<E> {
        std::mem::take(&mut self.effects)
    }

    /// Sender standing in for the runtime's action channel.
    pub fn sender(&self) -> mpsc::UnboundedSender<A> {
        self.tx.clone()
    }

    /// Emit an action (simulates what a completed task would do).
    pub fn emit(&self, action: A) {
        let _ = self.tx.send(action);
    }

    /// Drain all emitted actions from the channel.
    pub fn drain_emitted(&mut self) -> Vec<A> {
        let mut actions = Vec::new();
        while let Ok(action) = self.rx.try_recv() {
            actions.push(action);
        }
        actions
    }

    /// Dispatch every emitted action, as the runtime loop would.
    pub fn process_emitted(&mut self) -> usize {
        let actions = self.drain_emitted();
        let count = actions.len();
        for action in actions {
            self.dispatch(action);
        }
        count
    }
}

/// Renders into an in-memory terminal.
pub struct RenderHarness {
    terminal: Terminal<TestBackend>,
}

impl RenderHarness {
    pub fn new(width: u16, height: u16) -> Self {
        let backend = TestBackend::new(width, height);
        // TestBackend never fails to construct a terminal
        let terminal = Terminal::new(backend).unwrap_or_else(|e| panic!("test terminal: {e}"));
        Self { terminal }
    }

    /// Render one frame and return the buffer.
    pub fn render<F: FnOnce(&mut Frame)>(&mut self, draw: F) -> &Buffer {
        self.terminal
            .draw(draw)
            .unwrap_or_else(|e| panic!("test draw failed: {e}"));
        self.terminal.backend().buffer()
    }

    /// Render one frame and return its text, one line per row, with
    /// trailing spaces trimmed.
    pub fn render_to_string_plain<F: FnOnce(&mut Frame)>(&mut self, draw: F) -> String {
        let buffer = self.render(draw);
        buffer_to_string_plain(buffer)
    }
}

/// Plain text of a buffer, styles dropped, trailing spaces trimmed per row.
pub fn buffer_to_string_plain(buffer: &Buffer) -> String {
    let area = buffer.area;
    let mut out = String::new();
    for y in area.top()..area.bottom() {
        let mut line = String::new();
        for x in area.left()..area.right() {
            if let Some(cell) = buffer.cell((x, y)) {
                line.push_str(cell.symbol());
            }
        }
        out.push_str(line.trim_end());
        out.push('\n');
    }
    out
}

/// Assert that an item matching a pattern was emitted.
///
/// ```ignore
/// let actions = harness.drain_emitted();
/// assert_emitted!(actions, Action::RouteNavigate(Route::List));
/// ```
#[macro_export]
macro_rules! assert_emitted {
    ($actions:expr, $pattern:pat $(if $guard:expr)?) => {
        assert!(
            $actions.iter().any(|a| matches!(a, $pattern $(if $guard)?)),
            "Expected action matching `{}` to be emitted, but got: {:?}",
            stringify!($pattern),
            $actions
        );
    };
}

/// Assert that nothing matching a pattern was emitted.
#[macro_export]
macro_rules! assert_not_emitted {
    ($actions:expr, $pattern:pat $(if $guard:expr)?) => {
        assert!(
            !$actions.iter().any(|a| matches!(a, $pattern $(if $guard)?)),
            "Expected action matching `{}` NOT to be emitted, but it was: {:?}",
            stringify!($pattern),
            $actions
        );
    };
}

/// Find the first item matching a pattern.
#[macro_export]
macro_rules! find_emitted {
    ($actions:expr, $pattern:pat $(if $guard:expr)?) => {
        $actions.iter().find(|a| matches!(a, $pattern $(if $guard)?))
    };
}
