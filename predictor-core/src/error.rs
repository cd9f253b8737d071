//! Failure kinds of a prediction request.

use thiserror::Error;

/// The only message a user ever sees for a transport failure.
pub const TRANSPORT_FAILURE_MESSAGE: &str = "Failed to connect to the server";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PredictError {
    /// The service answered with `success: false`.
    #[error("{0}")]
    ServerReported(String),

    /// Anything that kept us from getting a well-formed answer. The detail is
    /// for logs only.
    #[error("transport failure: {0}")]
    Transport(String),
}

impl PredictError {
    /// Text shown to the user for this error.
    pub fn user_message(&self) -> &str {
        match self {
            PredictError::ServerReported(msg) => msg,
            PredictError::Transport(_) => TRANSPORT_FAILURE_MESSAGE,
        }
    }
}

impl From<reqwest::Error> for PredictError {
    fn from(err: reqwest::Error) -> Self {
        PredictError::Transport(err.to_string())
    }
}

impl From<serde_json::Error> for PredictError {
    fn from(err: serde_json::Error) -> Self {
        PredictError::Transport(format!("invalid response body: {err}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transport_detail_is_hidden_from_users() {
        let err = PredictError::Transport("connection refused (os error 111)".into());
        assert_eq!(err.user_message(), "Failed to connect to the server");
        assert!(err.to_string().contains("connection refused"));
    }

    #[test]
    fn server_message_is_verbatim() {
        let err = PredictError::ServerReported("bad input".into());
        assert_eq!(err.user_message(), "bad input");
        assert_eq!(err.to_string(), "bad input");
    }

    #[test]
    fn json_errors_become_transport_errors() {
        let err: PredictError = serde_json::from_str::<serde_json::Value>("<html>")
            .unwrap_err()
            .into();
        assert!(matches!(err, PredictError::Transport(_)));
    }
}
