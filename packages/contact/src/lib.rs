#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Contact form validation, submission and server-side intake.
//!
//! Validation runs synchronously and completely before anything touches
//! the network: an invalid form never produces a request.

pub mod client;
pub mod service;
pub mod transport;
pub mod validate;

pub use client::{ContactClient, SubmitOutcome};
pub use service::{ContactService, LogNotifier, Notifier};
pub use transport::{ContactTransport, HttpTransport};
pub use validate::{ValidatedSubmission, validate};

use thiserror::Error;

/// Errors that can occur while delivering a contact request.
#[derive(Debug, Error)]
pub enum ContactError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The endpoint answered with a non-success status.
    #[error("Contact endpoint returned status {status}: {body}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Response body, for logging.
        body: String,
    },

    /// The endpoint answered 2xx but reported a failure.
    #[error("Contact request rejected: {message}")]
    Rejected {
        /// Message from the endpoint.
        message: String,
    },

    /// A notification could not be delivered.
    #[error("Notification failed: {message}")]
    Notify {
        /// Description of what went wrong.
        message: String,
    },

    /// JSON serialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
