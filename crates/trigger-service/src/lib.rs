//! Job Trigger Service
//!
//! Accepts "trigger job by name" requests over HTTP and forwards them to a
//! Dagster webserver through the GraphQL `launchRun` mutation, returning the
//! new run id or a normalized error.
//!
//! ## Modules
//!
//! - [`config`]: Settings from environment variables and the job catalog file
//! - [`auth`]: API key check and its route middleware
//! - [`graphql`]: Transport-only GraphQL client
//! - [`launch`]: Mutation construction and result-union interpretation
//! - [`error`]: Error taxonomy and the external error body
//! - [`handlers`]: HTTP route handlers
//! - [`router`]: Route table
//! - [`state`]: Shared application state
//!
//! ## Example
//!
//! ```ignore
//! use trigger_service::{config::Settings, router::build_router, state::AppState};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let settings = Settings::from_env()?;
//!     let state = AppState::from_settings(&settings)?;
//!     let app = build_router(state, settings.server.cors_origins());
//!     let listener = tokio::net::TcpListener::bind(settings.server.bind_address()).await?;
//!     axum::serve(listener, app).await?;
//!     Ok(())
//! }
//! ```

pub mod auth;
pub mod config;
pub mod error;
pub mod graphql;
pub mod handlers;
pub mod launch;
pub mod router;
pub mod state;

pub use error::{TriggerError, TriggerFailure};
