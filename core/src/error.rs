//! Error types for the Hydros client.
//!
//! # Design
//! A single `Error` enum covers construction, mock registration, and request
//! failures so that backing functions (real or mocked) share one return type.
//! Non-success HTTP responses are carried as `RemoteError`, which keeps the
//! server-supplied message when the error payload decodes and the raw status
//! and body when it does not.

use std::fmt;

use thiserror::Error;

use crate::mock::Signature;

/// Errors returned by the client, its services, and the mock registry.
#[derive(Debug, Error)]
pub enum Error {
    /// A construction-time option was rejected (e.g. a host without scheme).
    #[error("{0}")]
    InvalidConfiguration(String),

    /// A mock target was not of the form `Service.Method`.
    #[error("mock target should be of format Service.Method (e.g. 'Well.Get'): got '{0}'")]
    InvalidMockTarget(String),

    #[error("could not find service '{0}'")]
    ServiceNotFound(String),

    #[error("could not find method '{method}' in service '{service}'")]
    MethodNotFound { service: String, method: String },

    /// The method exists but has no swappable backing function.
    #[error("could not find backing function '{method}Func' for {service} service")]
    NoBackingFunction { service: String, method: String },

    #[error("mock function is wrong type: expected: {expected} but got: {actual}")]
    SignatureMismatch { expected: Signature, actual: Signature },

    /// The server answered with a non-success status.
    #[error("{0}")]
    Remote(RemoteError),

    /// The operation has no real implementation wired to it.
    #[error("not implemented")]
    NotImplemented,

    /// A model method was called before `init` bound the model to a spec.
    #[error("{0} called on a model that has not been initialized")]
    Uninitialized(&'static str),

    /// The service spec a model was bound to has been dropped.
    #[error("service spec '{0}' is no longer available")]
    SpecReleased(String),

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The request never produced a response (connect, timeout, I/O).
    #[error("transport error: {0}")]
    Transport(String),

    #[error("serialization failed: {0}")]
    Serialization(String),

    #[error("deserialization failed: {0}")]
    Deserialization(String),
}

pub type Result<T> = std::result::Result<T, Error>;

/// A non-success response from the API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoteError {
    /// The body decoded as `{ "message", "description" }`.
    Api {
        status: u16,
        message: String,
        description: String,
    },
    /// The body was not a recognizable error payload.
    Raw { status: u16, body: String },
}

impl RemoteError {
    pub fn status(&self) -> u16 {
        match self {
            RemoteError::Api { status, .. } | RemoteError::Raw { status, .. } => *status,
        }
    }
}

impl fmt::Display for RemoteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RemoteError::Api {
                message,
                description,
                ..
            } => write!(f, "{message}: {description}"),
            RemoteError::Raw { status, body } => write!(f, "{status} error: {body}"),
        }
    }
}

impl From<RemoteError> for Error {
    fn from(err: RemoteError) -> Self {
        Error::Remote(err)
    }
}
