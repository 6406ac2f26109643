//! Error taxonomy for client, transport, and configuration failures.

use std::fmt;

/// Errors surfaced by the client and its transport layer.
///
/// All variants propagate unmodified to the caller: there is no internal
/// recovery, no retry, and no silent default substitution. A failed fetch or
/// mutation leaves any previously cached resource data untouched.
#[derive(Debug, Clone)]
pub enum Error {
    /// A scenario-scoped accessor was invoked with no scenario id bound.
    ///
    /// Raised before any network I/O. Recoverable by calling
    /// [`crate::Client::set_scenario_id`] and retrying.
    NoScenarioId,
    /// The service answered with a non-success HTTP status.
    Http {
        /// Original response status code.
        status: u16,
        /// Raw response body, useful for service-side validation messages.
        body: String,
    },
    /// The request failed below the HTTP layer (DNS, connect, TLS, read).
    Network(String),
    /// A response body or header field could not be parsed into its
    /// expected shape.
    Decode(String),
    /// An invalid value was supplied for a configuration field.
    Config {
        /// Dotted field path (e.g., `"proxies.http"`).
        field: String,
        /// Human-readable constraint description.
        message: String,
    },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoScenarioId => {
                write!(f, "no scenario id set: bind one with set_scenario_id first")
            }
            Self::Http { status, body } => write!(f, "HTTP error {status}: {body}"),
            Self::Network(detail) => write!(f, "network error: {detail}"),
            Self::Decode(detail) => write!(f, "decode error: {detail}"),
            Self::Config { field, message } => {
                write!(f, "config error: {field}: {message}")
            }
        }
    }
}

impl std::error::Error for Error {}
