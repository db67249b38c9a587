use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;

use crate::{
    config::Config,
    error::{GraphResult, RemoteApiError},
    graph::{API_VERSION, GRAPH_BASE, http_client},
    types::{ConnectionResponse, ErrorEnvelope, Item, Page},
};

use super::pager::PageSource;

/// Authenticated Graph API client. Performs exactly one call per method
/// invocation with the bearer token taken from the configuration.
pub struct GraphClient {
    http: Client,
    token: String,
    base: String,
}

impl GraphClient {
    /// Fails with `MissingToken` when the configuration holds no access
    /// token, pointing the user at `fbcli login`.
    pub fn new(config: &Config) -> GraphResult<Self> {
        let token = config.require_token()?.to_string();
        Ok(GraphClient {
            http: http_client()?,
            token,
            base: GRAPH_BASE.to_string(),
        })
    }

    pub fn with_base(mut self, base: impl Into<String>) -> Self {
        self.base = base.into();
        self
    }

    fn url(&self, path: &str) -> String {
        format!("{}/v{}/{}", self.base, API_VERSION, path)
    }

    /// Fetches a single object, optionally restricted to `fields`.
    pub async fn get_object(&self, id: &str, fields: Option<&str>) -> GraphResult<Item> {
        let mut request = self.http.get(self.url(id)).bearer_auth(&self.token);
        if let Some(fields) = fields {
            request = request.query(&[("fields", fields)]);
        }
        decode(request.send().await?).await
    }

    /// Fetches the first page of a connection hanging off `object_id`.
    pub async fn get_connection(
        &self,
        object_id: &str,
        connection: &str,
        params: &[(String, String)],
    ) -> GraphResult<Page> {
        let request = self
            .http
            .get(self.url(&format!("{}/{}", object_id, connection)))
            .query(params)
            .bearer_auth(&self.token);
        let res: ConnectionResponse = decode(request.send().await?).await?;
        Ok(res.into())
    }

    /// Follows an opaque page cursor. Facebook's cursor is a complete URL,
    /// so it is fetched as-is (re-authenticated, in case the provider
    /// stripped the token).
    pub async fn get_next_page(&self, cursor: &str) -> GraphResult<Page> {
        let request = self.http.get(cursor).bearer_auth(&self.token);
        let res: ConnectionResponse = decode(request.send().await?).await?;
        Ok(res.into())
    }

    /// Publishes to a Graph edge, e.g. `me/feed`. Attempted exactly once;
    /// blindly retrying a publish could double-post.
    pub async fn publish(&self, path: &str, params: &[(String, String)]) -> GraphResult<Item> {
        let request = self
            .http
            .post(self.url(path))
            .form(params)
            .bearer_auth(&self.token);
        decode(request.send().await?).await
    }

    /// Deletes a Graph object or edge, e.g. `me/permissions` to revoke the
    /// token's authorization.
    pub async fn delete(&self, path: &str) -> GraphResult<()> {
        let request = self.http.delete(self.url(path)).bearer_auth(&self.token);
        let _: serde_json::Value = decode(request.send().await?).await?;
        Ok(())
    }
}

/// A connection endpoint bound to its client, ready to be walked.
pub struct ConnectionQuery<'a> {
    client: &'a GraphClient,
    object_id: String,
    connection: String,
    params: Vec<(String, String)>,
}

impl<'a> ConnectionQuery<'a> {
    pub fn new(
        client: &'a GraphClient,
        object_id: impl Into<String>,
        connection: impl Into<String>,
        params: Vec<(String, String)>,
    ) -> Self {
        ConnectionQuery {
            client,
            object_id: object_id.into(),
            connection: connection.into(),
            params,
        }
    }
}

#[async_trait]
impl PageSource for ConnectionQuery<'_> {
    async fn first_page(&self) -> GraphResult<Page> {
        self.client
            .get_connection(&self.object_id, &self.connection, &self.params)
            .await
    }

    async fn next_page(&self, cursor: &str) -> GraphResult<Page> {
        self.client.get_next_page(cursor).await
    }
}

/// Decodes a Graph response, translating non-2xx payloads into
/// [`RemoteApiError`] with every provider-side detail preserved.
pub(crate) async fn decode<T: DeserializeOwned>(res: reqwest::Response) -> GraphResult<T> {
    let status = res.status();
    let body = res.text().await?;
    if !status.is_success() {
        return Err(parse_error_body(status.as_u16(), &body).into());
    }

    serde_json::from_str(&body).map_err(|e| {
        RemoteApiError {
            kind: "UnexpectedResponse".to_string(),
            code: None,
            subcode: None,
            http_status: status.as_u16(),
            message: format!("{}: {}", e, body),
            trace_id: None,
        }
        .into()
    })
}

/// Translates a provider error body. An unparseable body still produces a
/// structured error carrying the raw text.
pub(crate) fn parse_error_body(http_status: u16, body: &str) -> RemoteApiError {
    match serde_json::from_str::<ErrorEnvelope>(body) {
        Ok(envelope) => {
            let e = envelope.error;
            RemoteApiError {
                kind: e.kind.unwrap_or_else(|| "UnknownError".to_string()),
                code: e.code,
                subcode: e.error_subcode,
                http_status,
                // Prefer the user-facing message the way the original did.
                message: e
                    .error_user_msg
                    .or(e.message)
                    .unwrap_or_else(|| "no message".to_string()),
                trace_id: e.fbtrace_id,
            }
        }
        Err(_) => RemoteApiError {
            kind: "UnknownError".to_string(),
            code: None,
            subcode: None,
            http_status,
            message: body.to_string(),
            trace_id: None,
        },
    }
}
