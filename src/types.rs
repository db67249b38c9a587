use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::GraphError;

/// One element of a paginated Graph connection. The schema is defined by
/// the remote API; formatters read the keys they care about and ignore the
/// rest.
pub type Item = serde_json::Map<String, Value>;

/// An access token as returned by the token endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessToken {
    pub value: String,
    /// Lifetime in seconds, when the provider reports one.
    pub expires_in: Option<u64>,
}

/// Token metadata from the introspection endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenInfo {
    pub issued_at: Option<i64>,
    pub expires_at: Option<i64>,
    #[serde(default)]
    pub scopes: Vec<String>,
}

/// State of the single login attempt. Exactly one session exists per
/// `login` invocation; it is created when the listener starts and discarded
/// when it shuts down.
#[derive(Debug)]
pub struct AuthSession {
    pub app_id: u64,
    pub app_secret: String,
    pub redirect_uri: String,
    pub state: AuthState,
}

/// Progress of the authorization-code exchange.
///
/// `Pending` at shutdown means no code was ever captured: the user
/// interrupted the wait or denied consent. Both are clean, non-erroring
/// outcomes.
#[derive(Debug)]
pub enum AuthState {
    Pending,
    CodeReceived(String),
    Exchanged(AccessToken),
    Failed(GraphError),
}

/// One page of a Graph connection.
///
/// `next` is the opaque cursor for the following page (Facebook hands back
/// a complete URL). `None` means the collection is exhausted, which is
/// distinct from a page whose `items` happen to be empty.
#[derive(Debug, Clone)]
pub struct Page {
    pub items: Vec<Item>,
    pub next: Option<String>,
}

/// Wire shape of a Graph connection response.
#[derive(Debug, Clone, Deserialize)]
pub struct ConnectionResponse {
    #[serde(default)]
    pub data: Vec<Item>,
    pub paging: Option<Paging>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Paging {
    pub next: Option<String>,
    pub cursors: Option<Cursors>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Cursors {
    pub before: Option<String>,
    pub after: Option<String>,
}

impl From<ConnectionResponse> for Page {
    fn from(res: ConnectionResponse) -> Self {
        let next = res.paging.and_then(|p| p.next);
        Page {
            items: res.data,
            next,
        }
    }
}

/// Wire shape of a Graph error response body.
#[derive(Debug, Clone, Deserialize)]
pub struct ErrorEnvelope {
    pub error: ErrorPayload,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ErrorPayload {
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub code: Option<i64>,
    pub error_subcode: Option<i64>,
    pub message: Option<String>,
    pub error_user_msg: Option<String>,
    pub fbtrace_id: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn connection_response_into_page_keeps_cursor() {
        let json = r#"{
            "data": [{"id": "1", "name": "first"}],
            "paging": {
                "cursors": {"before": "B", "after": "A"},
                "next": "https://graph.facebook.com/v2.10/me/likes?after=A"
            }
        }"#;

        let res: ConnectionResponse = serde_json::from_str(json).unwrap();
        let page: Page = res.into();
        assert_eq!(page.items.len(), 1);
        assert_eq!(
            page.next.as_deref(),
            Some("https://graph.facebook.com/v2.10/me/likes?after=A")
        );
    }

    #[test]
    fn last_page_has_no_cursor() {
        let json = r#"{"data": [{"id": "9"}], "paging": {"cursors": {"before": "B", "after": "A"}}}"#;
        let res: ConnectionResponse = serde_json::from_str(json).unwrap();
        let page: Page = res.into();
        assert!(page.next.is_none());
    }

    #[test]
    fn empty_body_is_an_empty_exhausted_page() {
        let res: ConnectionResponse = serde_json::from_str(r#"{"data": []}"#).unwrap();
        let page: Page = res.into();
        assert!(page.items.is_empty());
        assert!(page.next.is_none());
    }
}
