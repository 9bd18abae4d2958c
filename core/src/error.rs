//! Error types for the resource client.
//!
//! # Design
//! `NotFound` is raised locally when a by-key lookup yields nothing and is
//! kept apart from `Http`, which covers every non-2xx response the server
//! sends. `Transport` carries the network-level failure message when no
//! response arrived at all.

use thiserror::Error;

use crate::resource::PrimaryKey;

pub type Result<T> = std::result::Result<T, ResourceError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResourceError {
    /// The request never produced a response (connection refused, DNS, TLS).
    #[error("{0}")]
    Transport(String),

    /// The server answered with a non-2xx status.
    #[error("Error Code: {status}\nMessage: {message}")]
    Http { status: u16, message: String },

    /// No item with this primary key exists in the cache or on the server.
    #[error("Could not find item with PK of {pk}!")]
    NotFound { pk: PrimaryKey },

    /// The server accepted an update for an item the collection cache does
    /// not hold.
    #[error("item with PK of {pk} is not in the cached collection")]
    NotInCollection { pk: PrimaryKey },

    #[error("serialization failed: {0}")]
    Serialization(String),

    #[error("deserialization failed: {0}")]
    Deserialization(String),
}

/// Failure reported by a `Transport` before any HTTP status was received.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct TransportError(pub String);

impl From<TransportError> for ResourceError {
    fn from(err: TransportError) -> Self {
        ResourceError::Transport(err.0)
    }
}

/// Errors raised while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_yaml::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn http_error_uses_code_and_message_format() {
        let err = ResourceError::Http {
            status: 500,
            message: "boom".to_string(),
        };
        assert_eq!(err.to_string(), "Error Code: 500\nMessage: boom");
    }

    #[test]
    fn not_found_names_the_key() {
        let err = ResourceError::NotFound { pk: 3.into() };
        assert_eq!(err.to_string(), "Could not find item with PK of 3!");
    }

    #[test]
    fn transport_error_keeps_event_message() {
        let err: ResourceError = TransportError("connection refused".to_string()).into();
        assert_eq!(err, ResourceError::Transport("connection refused".to_string()));
        assert_eq!(err.to_string(), "connection refused");
    }
}
