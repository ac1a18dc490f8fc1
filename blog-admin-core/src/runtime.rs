//! Terminal event/action/effect loop
//!
//! [`EffectRuntime`] owns an [`EffectStore`], polls the terminal, feeds mapped
//! events and completed remote calls back through one action channel, and
//! redraws whenever a dispatch reports a change.

use std::future::Future;
use std::io;
use std::time::Duration;

use ratatui::backend::Backend;
use ratatui::layout::Rect;
use ratatui::{Frame, Terminal};
use tokio::sync::mpsc;
use tokio::task::AbortHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::action::Action;
use crate::event::{process_raw_event, spawn_event_poller, EventKind, RawEvent};
use crate::store::{EffectStore, Middleware, NoopMiddleware};

/// Configuration for the event poller.
#[derive(Debug, Clone, Copy)]
pub struct PollerConfig {
    /// Timeout passed to each `crossterm::event::poll` call.
    pub poll_timeout: Duration,
    /// Sleep between poll cycles.
    pub loop_sleep: Duration,
}

impl Default for PollerConfig {
    fn default() -> Self {
        Self {
            poll_timeout: Duration::from_millis(10),
            loop_sleep: Duration::from_millis(16),
        }
    }
}

/// Result of mapping an event into actions plus an optional render hint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventOutcome<A> {
    /// Actions to enqueue.
    pub actions: Vec<A>,
    /// Whether to force a re-render.
    pub needs_render: bool,
}

impl<A> EventOutcome<A> {
    /// No actions and no render.
    pub fn ignored() -> Self {
        Self {
            actions: Vec::new(),
            needs_render: false,
        }
    }

    /// No actions, but request a render.
    pub fn needs_render() -> Self {
        Self {
            actions: Vec::new(),
            needs_render: true,
        }
    }

    /// Wrap a single action.
    pub fn action(action: A) -> Self {
        Self {
            actions: vec![action],
            needs_render: false,
        }
    }

    /// Collect any iterator of actions, typically a `Component::handle_event` result.
    pub fn from_actions(iter: impl IntoIterator<Item = A>) -> Self {
        Self {
            actions: iter.into_iter().collect(),
            needs_render: false,
        }
    }

    /// Mark that a render is needed.
    pub fn with_render(mut self) -> Self {
        self.needs_render = true;
        self
    }

    pub fn is_ignored(&self) -> bool {
        self.actions.is_empty() && !self.needs_render
    }
}

impl<A> Default for EventOutcome<A> {
    fn default() -> Self {
        Self::ignored()
    }
}

impl<A> From<A> for EventOutcome<A> {
    fn from(action: A) -> Self {
        Self::action(action)
    }
}

impl<A> From<Vec<A>> for EventOutcome<A> {
    fn from(actions: Vec<A>) -> Self {
        Self::from_actions(actions)
    }
}

impl<A> From<Option<A>> for EventOutcome<A> {
    fn from(action: Option<A>) -> Self {
        Self::from_actions(action)
    }
}

/// Remote calls that have been spawned and not yet finished.
///
/// Calls are never cancelled individually: a result that arrives after the
/// user navigated away still lands in its container. Everything still running
/// is aborted when the runtime shuts down.
#[derive(Debug, Default)]
pub struct InFlight {
    handles: Vec<(&'static str, AbortHandle)>,
}

impl InFlight {
    pub fn new() -> Self {
        Self::default()
    }

    fn track(&mut self, name: &'static str, handle: AbortHandle) {
        self.prune();
        self.handles.push((name, handle));
    }

    /// Forget tasks that already completed.
    pub fn prune(&mut self) {
        self.handles.retain(|(_, handle)| !handle.is_finished());
    }

    /// Number of tasks still running.
    pub fn len(&mut self) -> usize {
        self.prune();
        self.handles.len()
    }

    pub fn is_empty(&mut self) -> bool {
        self.len() == 0
    }

    /// Abort every running task.
    pub fn abort_all(&mut self) {
        for (name, handle) in self.handles.drain(..) {
            if !handle.is_finished() {
                debug!(task = name, "aborting in-flight task");
                handle.abort();
            }
        }
    }
}

/// Context passed to effect handlers.
pub struct EffectContext<'a, A: Action> {
    action_tx: &'a mpsc::UnboundedSender<A>,
    in_flight: &'a mut InFlight,
}

impl<'a, A: Action> EffectContext<'a, A> {
    /// Build a context over an existing sender, for driving effect handlers
    /// outside of [`EffectRuntime::run`].
    pub fn new(action_tx: &'a mpsc::UnboundedSender<A>, in_flight: &'a mut InFlight) -> Self {
        Self {
            action_tx,
            in_flight,
        }
    }

    /// Send an action directly.
    pub fn emit(&self, action: A) {
        let _ = self.action_tx.send(action);
    }

    /// Access the action sender.
    pub fn action_tx(&self) -> &mpsc::UnboundedSender<A> {
        self.action_tx
    }

    /// Run `future` in the background and dispatch the action it resolves to.
    pub fn spawn<F>(&mut self, name: &'static str, future: F)
    where
        F: Future<Output = A> + Send + 'static,
    {
        let tx = self.action_tx.clone();
        let handle = tokio::spawn(async move {
            let action = future.await;
            let _ = tx.send(action);
        });
        debug!(task = name, "spawned");
        self.in_flight.track(name, handle.abort_handle());
    }
}

/// Runtime helper for effect-based stores.
pub struct EffectRuntime<S, A: Action, E, M: Middleware<A> = NoopMiddleware> {
    store: EffectStore<S, A, E, M>,
    action_tx: mpsc::UnboundedSender<A>,
    action_rx: mpsc::UnboundedReceiver<A>,
    poller_config: PollerConfig,
    in_flight: InFlight,
    should_render: bool,
}

impl<S: 'static, A: Action, E, M: Middleware<A>> EffectRuntime<S, A, E, M> {
    /// Create a runtime from an existing effect store.
    pub fn from_store(store: EffectStore<S, A, E, M>) -> Self {
        let (action_tx, action_rx) = mpsc::unbounded_channel();
        Self {
            store,
            action_tx,
            action_rx,
            poller_config: PollerConfig::default(),
            in_flight: InFlight::new(),
            should_render: true,
        }
    }

    /// Configure event polling behavior.
    pub fn with_event_poller(mut self, config: PollerConfig) -> Self {
        self.poller_config = config;
        self
    }

    /// Send an action into the runtime queue.
    pub fn enqueue(&self, action: A) {
        let _ = self.action_tx.send(action);
    }

    /// Clone the action sender.
    pub fn action_tx(&self) -> mpsc::UnboundedSender<A> {
        self.action_tx.clone()
    }

    /// Access the current state.
    pub fn state(&self) -> &S {
        self.store.state()
    }

    /// Run the event/action loop until `should_quit` accepts an action.
    pub async fn run<B, FRender, FEvent, FQuit, FEffect, R>(
        &mut self,
        terminal: &mut Terminal<B>,
        mut render: FRender,
        mut map_event: FEvent,
        mut should_quit: FQuit,
        mut handle_effect: FEffect,
    ) -> io::Result<()>
    where
        B: Backend,
        FRender: FnMut(&mut Frame, Rect, &S),
        FEvent: FnMut(&EventKind, &S) -> R,
        R: Into<EventOutcome<A>>,
        FQuit: FnMut(&A) -> bool,
        FEffect: FnMut(E, &mut EffectContext<A>),
    {
        let (event_tx, mut event_rx) = mpsc::unbounded_channel::<RawEvent>();
        let cancel_token = CancellationToken::new();
        let _poller = spawn_event_poller(
            event_tx,
            self.poller_config.poll_timeout,
            self.poller_config.loop_sleep,
            cancel_token.clone(),
        );

        loop {
            if self.should_render {
                let state = self.store.state();
                terminal.draw(|frame| render(frame, frame.area(), state))?;
                self.should_render = false;
            }

            tokio::select! {
                Some(raw_event) = event_rx.recv() => {
                    let event = process_raw_event(raw_event);
                    let outcome: EventOutcome<A> = map_event(&event, self.store.state()).into();
                    if outcome.needs_render {
                        self.should_render = true;
                    }
                    for action in outcome.actions {
                        let _ = self.action_tx.send(action);
                    }
                }

                Some(action) = self.action_rx.recv() => {
                    if should_quit(&action) {
                        info!("quit requested");
                        break;
                    }

                    let result = self.store.dispatch(action);
                    if result.has_effects() {
                        let mut ctx = EffectContext::new(&self.action_tx, &mut self.in_flight);
                        for effect in result.effects {
                            handle_effect(effect, &mut ctx);
                        }
                    }
                    self.should_render |= result.changed;
                }

                else => {
                    break;
                }
            }
        }

        cancel_token.cancel();
        self.in_flight.abort_all();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, Debug, PartialEq)]
    enum Ping {
        Pong(u32),
    }

    impl Action for Ping {
        fn name(&self) -> &'static str {
            "Pong"
        }
    }

    #[test]
    fn test_event_outcome_conversions() {
        let single: EventOutcome<Ping> = Ping::Pong(1).into();
        assert_eq!(single.actions, vec![Ping::Pong(1)]);

        let none: EventOutcome<Ping> = None.into();
        assert!(none.is_ignored());

        let render = EventOutcome::<Ping>::needs_render();
        assert!(!render.is_ignored());

        let many = EventOutcome::from_actions([Ping::Pong(1), Ping::Pong(2)]).with_render();
        assert_eq!(many.actions.len(), 2);
        assert!(many.needs_render);
    }

    #[tokio::test]
    async fn test_spawned_task_result_is_dispatched() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut in_flight = InFlight::new();
        let mut ctx = EffectContext::new(&tx, &mut in_flight);

        ctx.spawn("pong", async { Ping::Pong(7) });

        assert_eq!(rx.recv().await, Some(Ping::Pong(7)));
    }

    #[tokio::test]
    async fn test_abort_all_stops_pending_tasks() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut in_flight = InFlight::new();
        {
            let mut ctx = EffectContext::new(&tx, &mut in_flight);
            ctx.spawn("slow", async {
                tokio::time::sleep(Duration::from_secs(3600)).await;
                Ping::Pong(0)
            });
        }
        assert_eq!(in_flight.len(), 1);

        in_flight.abort_all();
        drop(tx);
        assert_eq!(rx.recv().await, None);
    }
}
