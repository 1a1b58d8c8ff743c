//! ShareIt
//!
//! A peer-to-peer item sharing service: users list things they are willing
//! to lend, book other people's things for a period of time, comment on
//! finished rentals and post requests for things nobody offers yet.
//!
//! The crate builds two binaries: the server (business rules over
//! PostgreSQL) and a gateway that validates requests before forwarding them
//! to the server.

use std::sync::Arc;

pub mod api;
pub mod config;
pub mod error;
pub mod gateway;
pub mod models;
pub mod repository;
pub mod services;
pub mod telemetry;

pub use config::AppConfig;
pub use error::{AppError, AppResult};

/// Application state shared across all server handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub services: Arc<services::Services>,
}
