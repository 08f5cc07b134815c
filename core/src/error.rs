//! Error types for the Hyper API client.
//!
//! # Design
//! `NotFound` gets a dedicated variant because the API answers every unknown
//! identifier with a bare 404 whose body carries nothing useful. All other
//! rejected responses land in `Api` with the message the server put under
//! `error.message`. An error body that does not have that shape is reported
//! as `UnexpectedErrorBody` with the raw body for debugging.

use crate::config::ConfigError;

/// Convenience alias used by every fallible client operation.
pub type Result<T, E = HyperError> = std::result::Result<T, E>;

/// Errors returned by the Hyper client.
#[derive(Debug, thiserror::Error)]
pub enum HyperError {
    /// The server returned 404.
    #[error("Not found")]
    NotFound,

    /// The server returned a status other than 200, 202 or 404.
    #[error("{message}")]
    Api { status: u16, message: String },

    /// The server rejected the request but the body had no `error.message`.
    #[error("HTTP {status}: {body}")]
    UnexpectedErrorBody { status: u16, body: String },

    /// The request never produced a response.
    #[error("transport failed: {0}")]
    Transport(String),

    /// A successful response body could not be parsed as JSON.
    #[error("deserialization failed: {0}")]
    Deserialization(String),

    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    Serialization(String),

    /// No usable network adapter address was found on this machine.
    #[error("hardware id unavailable: {0}")]
    HardwareId(String),

    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
}

impl HyperError {
    /// HTTP status of a rejected response, if the error came from one.
    pub fn status(&self) -> Option<u16> {
        match self {
            HyperError::NotFound => Some(404),
            HyperError::Api { status, .. } | HyperError::UnexpectedErrorBody { status, .. } => {
                Some(*status)
            }
            _ => None,
        }
    }
}

/// Returned when a string is not a member of one of the closed wire enums.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind} value: {value:?}")]
pub struct ParseEnumError {
    pub kind: &'static str,
    pub value: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_displays_fixed_message() {
        assert_eq!(HyperError::NotFound.to_string(), "Not found");
        assert_eq!(HyperError::NotFound.status(), Some(404));
    }

    #[test]
    fn api_error_displays_server_message_verbatim() {
        let err = HyperError::Api {
            status: 400,
            message: "email is required".to_string(),
        };
        assert_eq!(err.to_string(), "email is required");
        assert_eq!(err.status(), Some(400));
    }

    #[test]
    fn local_failures_have_no_status() {
        assert_eq!(HyperError::Transport("reset".into()).status(), None);
        assert_eq!(HyperError::HardwareId("none".into()).status(), None);
    }

    #[test]
    fn parse_enum_error_names_the_kind() {
        let err = ParseEnumError {
            kind: "product type",
            value: "weekly".to_string(),
        };
        assert_eq!(err.to_string(), "unknown product type value: \"weekly\"");
    }
}
