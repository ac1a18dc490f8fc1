//! Terminal admin for blog entries
//!
//! Browses, creates, edits and deletes blog entries held by a REST backend.
//! Blogs and tags are fetched as reference lists for the entry form.
//!
//! The pieces follow one loop:
//!
//! 1. A key press reaches the view for the current [`Route`] and becomes an
//!    [`Action`]
//! 2. The [`reducer`](reducer::reducer) updates [`AppState`] and declares
//!    [`Effect`]s, remote calls included
//! 3. [`handle_effect`](effect::handle_effect) spawns the work; its result
//!    comes back as another action

pub mod action;
pub mod api;
pub mod config;
pub mod dates;
pub mod effect;
pub mod form;
pub mod keys;
pub mod logging;
pub mod model;
pub mod reducer;
pub mod routes;
pub mod state;
pub mod views;

pub use action::Action;
pub use api::{ApiError, BlogApi, ResourceClient};
pub use config::{AdminConfig, Cli, ConfigError};
pub use effect::Effect;
pub use model::{Blog, BlogEntry, Tag};
pub use routes::Route;
pub use state::AppState;
