//! API: HTTP access to the assignment backend.
//!
//! DESIGN
//! ======
//! Configuration comes from environment variables (`config`), the request
//! helper and endpoint calls live in `client`, and transport-neutral payload
//! and error types in `types`. Callers receive raw `Payload`s; reconciling
//! their inconsistent shapes is the job of `crate::normalize`.

pub mod client;
pub mod config;
pub mod types;

pub use client::{ApiClient, RequestOptions};
pub use types::{ApiError, Credentials, Payload};
