//! JSON REST API for the MeetChain roster.
//!
//! Exposes an axum [`Router`] backed by the in-memory roster and any
//! [`meetchain_core::store::RosterStore`] as its durable mirror. Every
//! mutation persists the complete roster before responding. Auth, TLS,
//! and transport concerns are the caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", meetchain_api::api_router(state))
//! ```

pub mod error;
pub mod people;

use std::{path::PathBuf, sync::Arc};

use axum::{
  Router,
  routing::{get, post},
};
use meetchain_core::{roster::SharedRoster, store::RosterStore};
use serde::Deserialize;

pub use error::ApiError;

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml`.
#[derive(Deserialize, Clone)]
pub struct ServerConfig {
  pub host:       String,
  pub port:       u16,
  pub store_path: PathBuf,
}

// ─── Application state ────────────────────────────────────────────────────────

/// Shared state threaded through all axum handlers.
pub struct ApiState<S> {
  pub roster: SharedRoster,
  pub store:  Arc<S>,
}

impl<S> Clone for ApiState<S> {
  fn clone(&self) -> Self {
    Self {
      roster: Arc::clone(&self.roster),
      store:  Arc::clone(&self.store),
    }
  }
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build a fully-materialised API router for `state`.
///
/// The returned `Router<()>` can be nested into any parent router
/// regardless of its own state type.
pub fn api_router<S>(state: ApiState<S>) -> Router<()>
where
  S: RosterStore + 'static,
{
  Router::new()
    .route(
      "/people",
      get(people::list::<S>).post(people::create::<S>),
    )
    .route(
      "/people/{id}",
      get(people::get_one::<S>).put(people::update_one::<S>),
    )
    .route("/people/{id}/meet", post(people::meet_one::<S>))
    .route("/people/by-tag/{tag_id}", get(people::by_tag::<S>))
    .with_state(state)
}
