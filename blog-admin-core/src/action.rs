//! Action trait for type-safe state mutations

use std::fmt::Debug;

/// Marker trait for actions that can be dispatched to the store
///
/// Actions are cloned into logs and sent across the action channel from
/// spawned remote calls, hence `Clone + Send + 'static`.
pub trait Action: Clone + Debug + Send + 'static {
    /// Short action name used in logs
    fn name(&self) -> &'static str;
}

/// Concise one-line description of an action for logging.
///
/// The default is the `Debug` output. Override it for actions carrying large
/// payloads (page data, base64 attachments).
pub trait ActionSummary: Action {
    fn summary(&self) -> String {
        format!("{:?}", self)
    }
}
