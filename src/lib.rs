//! # Session Agent Library
//!
//! Keeps a single identity-provider session's access token fresh and
//! publishes the resulting profile state to subscribers.
//!
//! Modules:
//! - `config` — service configuration
//! - `provider` — identity-provider REST client
//! - `session` — session accessor contract over the provider client
//! - `store` — shared profile state and its action surface
//! - `refresh` — trigger-driven refresh coordinator, latest trigger wins
//! - `countdown` — expiration countdown formatting and ticker

pub mod config;
pub mod provider;
pub mod session;
pub mod store;
pub mod refresh;
pub mod countdown;
pub mod observability;
pub mod helpers;
pub mod utils;
pub mod tests;

pub use crate::config::settings::ServiceConfig;
pub use crate::session::user::UserSession;
pub use crate::store::profile::{ProfileState, ProfileStore};
