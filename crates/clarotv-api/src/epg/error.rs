//! Typed errors for timestamp conversion and EPG requests.

use thiserror::Error;

/// Timestamp conversion failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TimeError {
    /// Input does not match `YYYY-MM-DD HH:MM:SS`.
    #[error("invalid datetime '{input}' (expected YYYY-MM-DD HH:MM:SS)")]
    Parse {
        /// Rejected input.
        input: String,
    },
    /// The zone identifier is not in the IANA database.
    #[error("unknown timezone '{0}'")]
    UnknownTimezone(String),
}

/// Classified EPG request failure.
///
/// Each variant carries a rendered message rather than the transport error
/// so that callers can clone, compare, and display it freely.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    /// The server answered with a non-2xx status.
    #[error("HTTP {status} from {url}")]
    HttpStatus {
        /// HTTP status code.
        status: u16,
        /// Requested URL.
        url: String,
    },
    /// The server could not be reached (DNS, refused, reset).
    #[error("connection failed: {0}")]
    Connection(String),
    /// The request exceeded its time budget.
    #[error("request timed out: {0}")]
    Timeout(String),
    /// Any other transport fault.
    #[error("unexpected request error: {0}")]
    Unexpected(String),
    /// 2xx response whose body does not match the expected JSON shape.
    #[error("failed to decode EPG response: {0}")]
    Decode(String),
}

impl FetchError {
    /// Stable label used as the `kind` field in diagnostics.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::HttpStatus { .. } => "http_status",
            Self::Connection(_) => "connection",
            Self::Timeout(_) => "timeout",
            Self::Unexpected(_) => "unexpected",
            Self::Decode(_) => "decode",
        }
    }

    /// Classifies a `reqwest` error.
    ///
    /// Connect failures win over timeouts so that a connect timeout is
    /// reported as a connection problem.
    pub(crate) fn from_reqwest(err: &reqwest::Error) -> Self {
        if let Some(status) = err.status() {
            return Self::HttpStatus {
                status: status.as_u16(),
                url: err.url().map_or_else(String::new, ToString::to_string),
            };
        }

        let message = error_chain(err);
        if err.is_connect() {
            Self::Connection(message)
        } else if err.is_timeout() {
            Self::Timeout(message)
        } else if err.is_decode() {
            Self::Decode(message)
        } else {
            Self::Unexpected(message)
        }
    }
}

/// Renders an error with its `source()` chain, joined by `": "`.
fn error_chain(err: &(dyn std::error::Error + 'static)) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}
