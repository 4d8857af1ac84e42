//! Podcheck HTTP API Service.
//!
//! This crate provides the HTTP API for the podcheck vote and karma service,
//! including:
//!
//! - Item submission and lookup
//! - Vote submission with atomic counter updates
//! - Karma totals and ledger history
//! - Moderation (validation status, deletion)
//!
//! # Authentication
//!
//! The service supports two authentication methods:
//!
//! 1. **User JWT tokens** - For end-user requests (voting, karma, etc.)
//! 2. **Moderator API key** - For moderation endpoints

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
// Allow some pedantic lints that are noisy for Axum handler functions
#![allow(clippy::missing_errors_doc)] // Axum handlers all return Result
#![allow(clippy::unused_async)] // Handlers need async for the router signature

pub mod auth;
pub mod awards;
pub mod config;
pub mod error;
pub mod handlers;
pub mod routes;
pub mod state;

pub use config::ServiceConfig;
pub use error::ApiError;
pub use routes::create_router;
pub use state::AppState;
