//! Podcheck Client SDK.
//!
//! This crate provides a client library for services and frontends to
//! interact with the podcheck vote and karma API.
//!
//! # Example
//!
//! ```no_run
//! use podcheck_client::PodcheckClient;
//!
//! # async fn example() -> Result<(), podcheck_client::ClientError> {
//! let client = PodcheckClient::new("http://podcheck.svc:8080");
//!
//! // Upvote a fact check as the authenticated user
//! let response = client
//!     .submit_vote("user-jwt", "01ARZ3NDEKTSV4RRFFQ69G5FAV", 1)
//!     .await?;
//!
//! println!("{} up / {} down", response.upvotes, response.downvotes);
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

mod client;
mod error;
mod types;

pub use client::{ClientOptions, PodcheckClient};
pub use error::ClientError;
pub use types::*;
