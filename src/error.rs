use std::fmt;

use thiserror::Error;

/// Errors produced by the Graph client, the auth flow, and the local
/// callback listener.
///
/// Every variant is fatal for the operation that produced it and is
/// propagated verbatim to the command layer; there is no retry anywhere.
/// User cancellation of the login flow is not an error and is reported as
/// `Ok(None)` by [`crate::graph::auth::AuthFlow::login`].
#[derive(Debug, Error)]
pub enum GraphError {
    /// The local redirect listener could not be started. Raised before the
    /// authorization URL is printed so the user is never stranded on a
    /// dialog whose redirect has nowhere to land.
    #[error("cannot listen on {addr}: {source}")]
    Bind {
        addr: String,
        source: std::io::Error,
    },

    /// The callback server failed after binding.
    #[error("callback server failed: {0}")]
    Listener(#[from] std::io::Error),

    /// Network-level failure reaching Facebook.
    #[error("network error reaching Facebook: {0}")]
    Transport(#[from] reqwest::Error),

    /// The provider rejected the code/credential exchange. Carries the raw
    /// response body for diagnostics; authorization codes are single-use,
    /// so the attempt is terminal.
    #[error("token exchange failed: {0}")]
    TokenExchange(String),

    /// Structured provider-side error from a Graph data call.
    #[error("{0}")]
    RemoteApi(RemoteApiError),

    /// No access token in the configuration.
    #[error("you must first acquire an access token; run: fbcli login")]
    MissingToken,
}

pub type GraphResult<T> = std::result::Result<T, GraphError>;

/// Provider error payload from a Graph API response.
///
/// Carries every field Facebook reports so nothing is swallowed between the
/// wire and the diagnostic the user sees.
#[derive(Debug)]
pub struct RemoteApiError {
    /// Error type, e.g. "OAuthException".
    pub kind: String,
    pub code: Option<i64>,
    pub subcode: Option<i64>,
    pub http_status: u16,
    pub message: String,
    pub trace_id: Option<String>,
}

impl fmt::Display for RemoteApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Graph API {}", self.kind)?;
        if let Some(code) = self.code {
            write!(f, " (code {}", code)?;
            if let Some(subcode) = self.subcode {
                write!(f, ", subcode: {}", subcode)?;
            }
            write!(f, ")")?;
        }
        write!(f, " HTTP status: {}", self.http_status)?;
        write!(f, "\n  {}", self.message)?;
        if let Some(trace_id) = &self.trace_id {
            write!(f, " (FB trace id: {})", trace_id)?;
        }
        Ok(())
    }
}

impl From<RemoteApiError> for GraphError {
    fn from(err: RemoteApiError) -> Self {
        GraphError::RemoteApi(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn remote_api_error_display_carries_all_fields() {
        let err = RemoteApiError {
            kind: "OAuthException".to_string(),
            code: Some(190),
            subcode: Some(463),
            http_status: 400,
            message: "Error validating access token".to_string(),
            trace_id: Some("AbCdEf123".to_string()),
        };

        let rendered = err.to_string();
        assert_eq!(
            rendered,
            "Graph API OAuthException (code 190, subcode: 463) HTTP status: 400\n  \
             Error validating access token (FB trace id: AbCdEf123)"
        );
    }

    #[test]
    fn remote_api_error_display_skips_absent_fields() {
        let err = RemoteApiError {
            kind: "GraphMethodException".to_string(),
            code: None,
            subcode: None,
            http_status: 500,
            message: "Unknown error".to_string(),
            trace_id: None,
        };

        let rendered = err.to_string();
        assert_eq!(
            rendered,
            "Graph API GraphMethodException HTTP status: 500\n  Unknown error"
        );
    }

    #[test]
    fn missing_token_points_at_login() {
        assert!(GraphError::MissingToken.to_string().contains("fbcli login"));
    }
}
