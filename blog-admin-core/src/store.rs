//! Effect-aware state store
//!
//! The reducer mutates state and returns a [`DispatchResult`] describing
//! whether a re-render is needed and which side effects to run. Effects are
//! plain data (for example "issue `GET /api/tags`"); the runtime hands them to
//! an effect handler after the reducer returns, which keeps the reducer pure.
//!
//! ```ignore
//! fn reducer(state: &mut AppState, action: AppAction) -> DispatchResult<Effect> {
//!     match action {
//!         AppAction::TagsFetch => {
//!             state.loading = true;
//!             DispatchResult::changed_with(Effect::FetchTags)
//!         }
//!         AppAction::TagsDidLoad(tags) => {
//!             state.loading = false;
//!             state.tags = tags;
//!             DispatchResult::changed()
//!         }
//!     }
//! }
//!
//! let mut store = EffectStore::new(AppState::default(), reducer)
//!     .with_middleware(LoggingMiddleware::new());
//! let result = store.dispatch(AppAction::TagsFetch);
//! for effect in result.effects { /* spawn */ }
//! ```

use std::marker::PhantomData;

use crate::action::{Action, ActionSummary};

/// Result of dispatching an action: change flag plus declared effects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchResult<E> {
    /// Whether the state was modified by this action.
    pub changed: bool,
    /// Effects to be processed after dispatch.
    pub effects: Vec<E>,
}

impl<E> Default for DispatchResult<E> {
    fn default() -> Self {
        Self::unchanged()
    }
}

impl<E> DispatchResult<E> {
    /// No state change and no effects.
    #[inline]
    pub fn unchanged() -> Self {
        Self {
            changed: false,
            effects: Vec::new(),
        }
    }

    /// State changed, no effects.
    #[inline]
    pub fn changed() -> Self {
        Self {
            changed: true,
            effects: Vec::new(),
        }
    }

    /// Build from a plain reducer change flag.
    #[inline]
    pub fn from_changed(changed: bool) -> Self {
        Self {
            changed,
            effects: Vec::new(),
        }
    }

    /// State changed with a single effect.
    #[inline]
    pub fn changed_with(effect: E) -> Self {
        Self {
            changed: true,
            effects: vec![effect],
        }
    }

    /// State changed with several effects.
    #[inline]
    pub fn changed_with_many(effects: Vec<E>) -> Self {
        Self {
            changed: true,
            effects,
        }
    }

    /// Append an effect.
    #[inline]
    pub fn with(mut self, effect: E) -> Self {
        self.effects.push(effect);
        self
    }

    /// Append an effect when present.
    #[inline]
    pub fn with_opt(mut self, effect: Option<E>) -> Self {
        self.effects.extend(effect);
        self
    }

    /// Fold another result into this one.
    #[inline]
    pub fn merge(mut self, other: DispatchResult<E>) -> Self {
        self.changed |= other.changed;
        self.effects.extend(other.effects);
        self
    }

    /// Set the changed flag to true.
    #[inline]
    pub fn mark_changed(mut self) -> Self {
        self.changed = true;
        self
    }

    /// Returns true if there are any effects to process.
    #[inline]
    pub fn has_effects(&self) -> bool {
        !self.effects.is_empty()
    }
}

/// A reducer function that can emit effects.
pub type EffectReducer<S, A, E> = fn(&mut S, A) -> DispatchResult<E>;

/// Middleware trait for intercepting actions
///
/// Middleware sees every action before and after the reducer runs, but not
/// the effects.
pub trait Middleware<A: Action> {
    /// Called before the action is dispatched to the reducer
    fn before(&mut self, action: &A);

    /// Called after the action is processed by the reducer
    fn after(&mut self, action: &A, state_changed: bool);
}

/// A no-op middleware that does nothing
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopMiddleware;

impl<A: Action> Middleware<A> for NoopMiddleware {
    fn before(&mut self, _action: &A) {}
    fn after(&mut self, _action: &A, _state_changed: bool) {}
}

/// Middleware that logs every processed action through `tracing`.
#[derive(Debug, Clone, Default)]
pub struct LoggingMiddleware {
    /// Also log the action summary at trace level before dispatch
    pub log_summary: bool,
}

impl LoggingMiddleware {
    /// Log action names after dispatch only
    pub fn new() -> Self {
        Self { log_summary: false }
    }

    /// Log action names and full summaries
    pub fn verbose() -> Self {
        Self { log_summary: true }
    }
}

impl<A: ActionSummary> Middleware<A> for LoggingMiddleware {
    fn before(&mut self, action: &A) {
        if self.log_summary {
            tracing::trace!(action = %action.name(), summary = %action.summary(), "dispatching");
        }
    }

    fn after(&mut self, action: &A, state_changed: bool) {
        tracing::debug!(
            action = %action.name(),
            state_changed = state_changed,
            "action processed"
        );
    }
}

/// State container whose reducer declares effects.
///
/// Holds the state, the reducer and a middleware (defaults to
/// [`NoopMiddleware`]).
pub struct EffectStore<S, A, E, M = NoopMiddleware> {
    state: S,
    reducer: EffectReducer<S, A, E>,
    middleware: M,
    _marker: PhantomData<fn(A) -> E>,
}

impl<S, A: Action, E> EffectStore<S, A, E, NoopMiddleware> {
    /// Create a store with initial state and reducer
    pub fn new(state: S, reducer: EffectReducer<S, A, E>) -> Self {
        Self {
            state,
            reducer,
            middleware: NoopMiddleware,
            _marker: PhantomData,
        }
    }
}

impl<S, A: Action, E, M: Middleware<A>> EffectStore<S, A, E, M> {
    /// Replace the middleware.
    pub fn with_middleware<M2: Middleware<A>>(self, middleware: M2) -> EffectStore<S, A, E, M2> {
        EffectStore {
            state: self.state,
            reducer: self.reducer,
            middleware,
            _marker: PhantomData,
        }
    }

    /// Get a reference to the current state.
    #[inline]
    pub fn state(&self) -> &S {
        &self.state
    }

    /// Get a mutable reference to the state.
    ///
    /// Only meant for initialization; everything else goes through `dispatch`.
    #[inline]
    pub fn state_mut(&mut self) -> &mut S {
        &mut self.state
    }

    /// Get a reference to the middleware.
    #[inline]
    pub fn middleware(&self) -> &M {
        &self.middleware
    }

    /// Dispatch an action through middleware and reducer.
    pub fn dispatch(&mut self, action: A) -> DispatchResult<E> {
        self.middleware.before(&action);
        let result = (self.reducer)(&mut self.state, action.clone());
        self.middleware.after(&action, result.changed);
        result
    }
}
