//! Error types for the PushBots client.
//!
//! # Design
//! Errors raised locally (`InvalidArgument`, `Unauthenticated`) are returned
//! before any request leaves the process. Everything after the transport is
//! classified from the HTTP status and the response envelope's `message`
//! field. Nothing is retried here.

use thiserror::Error;

use crate::endpoint::Operation;

/// Boxed error returned by a [`Transport`](crate::Transport) implementation.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors returned by `PushBots` operations.
#[derive(Debug, Error)]
pub enum ApiError {
    /// A caller-supplied argument failed validation. No request was sent.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The app id and/or secret is empty. No request was sent.
    #[error("app id and/or secret not set")]
    Unauthenticated,

    /// The operation has no entry in the endpoint table.
    #[error("could not find endpoint for {0}")]
    UnknownEndpoint(Operation),

    /// The transport failed before a response was received.
    #[error("transport error: {0}")]
    Transport(#[source] BoxError),

    /// The server answered with a status other than 200 or 201.
    #[error("{}", unexpected_status(*status, message.as_deref(), body))]
    UnexpectedStatus {
        status: u16,
        message: Option<String>,
        body: String,
    },

    /// The response envelope carried an error message.
    #[error("{0}")]
    Application(String),

    /// The response body was present but could not be interpreted.
    #[error("malformed response: {0}")]
    MalformedResponse(String),

    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    SerializationError(String),
}

impl ApiError {
    pub(crate) fn invalid(message: impl Into<String>) -> Self {
        ApiError::InvalidArgument(message.into())
    }
}

fn unexpected_status(status: u16, message: Option<&str>, body: &str) -> String {
    match message {
        Some(message) => format!("HTTP {status}: {message}"),
        None if body.trim().is_empty() => format!("HTTP {status}"),
        None => format!("HTTP {status}: {body}"),
    }
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, ApiError>;
