//! Core traits and types for blog-admin
//!
//! This crate holds the parts of the admin client that do not know about any
//! particular entity: the effect-aware store, the generic entity CRUD
//! container and its lifecycle actions, Link-header pagination, and the
//! terminal runtime that ties events, actions and effects together.
//!
//! # Core Concepts
//!
//! - **Action**: Events that describe state changes
//! - **EffectStore**: State container whose reducer declares side effects
//! - **EntityState**: Per-resource container driven by request lifecycle actions
//! - **Component**: Pure UI elements that render from props and emit actions
//! - **Keybindings**: Context-aware key mapping loaded from config
//!
//! # Lifecycle Pattern
//!
//! Every remote operation is a pair of actions:
//!
//! 1. An **intent** (`ListFetch`, `Create`, ...) flips the container's
//!    `loading`/`updating` flag and maps to a [`RemoteCall`] effect
//! 2. A **result** (`ListDidLoad`, `CreateDidError`, ...) carries the outcome
//!    back through the action channel once the call completes
//!
//! ```ignore
//! use blog_admin_core::prelude::*;
//!
//! let mut posts: EntityState<Post> = EntityState::initial();
//! posts.reduce(EntityAction::GetFetch(1));
//! assert!(posts.loading);
//! posts.reduce(EntityAction::GetDidLoad(post));
//! assert!(!posts.loading);
//! ```

pub mod action;
pub mod component;
pub mod entity;
pub mod event;
pub mod keybindings;
pub mod pagination;
pub mod runtime;
pub mod store;
pub mod testing;

pub use action::{Action, ActionSummary};
pub use component::Component;
pub use entity::{
    Entity, EntityAction, EntityState, ErrorPayload, ListQuery, Page, PageHeaders, RemoteCall,
};
pub use event::{process_raw_event, spawn_event_poller, EventKind, RawEvent};
pub use keybindings::{format_key_for_display, parse_key_string, BindingContext, Keybindings};
pub use pagination::{merge_page, parse_link_header, parse_total_count, PageLinks};
pub use runtime::{EffectContext, EffectRuntime, EventOutcome, InFlight, PollerConfig};
pub use store::{
    DispatchResult, EffectReducer, EffectStore, LoggingMiddleware, Middleware, NoopMiddleware,
};

pub use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    Frame,
};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::action::{Action, ActionSummary};
    pub use crate::component::Component;
    pub use crate::entity::{
        Entity, EntityAction, EntityState, ErrorPayload, ListQuery, Page, PageHeaders, RemoteCall,
    };
    pub use crate::event::EventKind;
    pub use crate::keybindings::{BindingContext, Keybindings};
    pub use crate::pagination::PageLinks;
    pub use crate::runtime::{EffectContext, EffectRuntime, EventOutcome};
    pub use crate::store::{DispatchResult, EffectStore, LoggingMiddleware, Middleware};

    pub use ratatui::{
        layout::Rect,
        style::{Color, Modifier, Style},
        text::{Line, Span, Text},
        Frame,
    };
}
