use std::sync::Arc;
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;

use crate::{
    error::{GraphError, GraphResult},
    graph::{API_VERSION, DIALOG_BASE, GRAPH_BASE, LOGIN_SCOPES, client, http_client},
    server::{self, CallbackContext},
    types::{AccessToken, AuthSession, AuthState, TokenInfo},
    warning,
};

/// Orchestrates one login: local listener, authorization dialog, token
/// exchange. One instance serves one invocation; nothing is shared across
/// commands.
pub struct AuthFlow {
    app_id: u64,
    app_secret: String,
    graph_base: String,
    dialog_base: String,
}

impl AuthFlow {
    pub fn new(app_id: u64, app_secret: impl Into<String>) -> Self {
        AuthFlow {
            app_id,
            app_secret: app_secret.into(),
            graph_base: GRAPH_BASE.to_string(),
            dialog_base: DIALOG_BASE.to_string(),
        }
    }

    pub fn with_graph_base(mut self, base: impl Into<String>) -> Self {
        self.graph_base = base.into();
        self
    }

    pub fn with_dialog_base(mut self, base: impl Into<String>) -> Self {
        self.dialog_base = base.into();
        self
    }

    /// The authorization-dialog URL the user must visit.
    pub fn authorize_url(&self, redirect_uri: &str) -> String {
        format!(
            "{dialog_base}/dialog/oauth?client_id={client_id}&redirect_uri={redirect_uri}&scope={scope}",
            dialog_base = self.dialog_base,
            client_id = self.app_id,
            redirect_uri = redirect_uri,
            scope = LOGIN_SCOPES.join(",")
        )
    }

    /// Runs the complete authorization-code flow.
    ///
    /// Binds the local listener first so a dead port fails before the
    /// authorization URL is printed, then blocks until the single redirect
    /// arrives or the user interrupts the wait. Returns `Ok(None)` when no
    /// code was captured (interrupt, or the user denied consent): a clean
    /// cancellation, not a fault. The listening socket is released on
    /// every exit path.
    pub async fn login(&self, host: &str, port: u16) -> GraphResult<Option<AccessToken>> {
        let listener = server::bind(host, port).await?;
        let redirect_uri = format!("http://{}:{}/", host, port);

        let ctx = Arc::new(CallbackContext::new(
            AuthSession {
                app_id: self.app_id,
                app_secret: self.app_secret.clone(),
                redirect_uri: redirect_uri.clone(),
                state: AuthState::Pending,
            },
            self.graph_base.clone(),
        )?);

        let auth_url = self.authorize_url(&redirect_uri);
        println!(
            "Open this URL in a web browser and allow access to the Facebook Graph on behalf \
             of your user account:\n\n{}\n",
            auth_url
        );
        if webbrowser::open(&auth_url).is_err() {
            warning!("Failed to open browser; please navigate to the URL manually.");
        }

        let pb = ProgressBar::new_spinner();
        pb.set_message(format!(
            "Waiting to receive authorization code on port {}...",
            port
        ));
        pb.enable_steady_tick(Duration::from_millis(100));
        pb.set_style(
            ProgressStyle::with_template("{spinner:.blue} {msg}")
                .unwrap()
                .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"),
        );

        let served = server::serve_once(listener, Arc::clone(&ctx), async {
            let _ = tokio::signal::ctrl_c().await;
        })
        .await;
        pb.finish_and_clear();
        served?;

        let mut session = ctx.session.lock().await;
        match std::mem::replace(&mut session.state, AuthState::Pending) {
            AuthState::Exchanged(token) => Ok(Some(token)),
            AuthState::Failed(e) => Err(e),
            // The handler stores a terminal state before signalling, so a
            // lone CodeReceived means the exchange never finished.
            AuthState::CodeReceived(_) => Err(GraphError::TokenExchange(
                "exchange did not complete".to_string(),
            )),
            AuthState::Pending => Ok(None),
        }
    }

    /// Introspects an access token via the debug endpoint, authenticated
    /// with the app credentials.
    pub async fn token_info(&self, token: &str) -> GraphResult<TokenInfo> {
        let http = http_client()?;
        let app_token = format!("{}|{}", self.app_id, self.app_secret);
        let res = http
            .get(format!("{}/v{}/debug_token", self.graph_base, API_VERSION))
            .query(&[("input_token", token), ("access_token", &app_token)])
            .send()
            .await?;

        let envelope: DebugTokenEnvelope = client::decode(res).await?;
        Ok(envelope.data)
    }
}

#[derive(Debug, Deserialize)]
struct DebugTokenEnvelope {
    data: TokenInfo,
}

/// Exchanges an authorization code for an access token.
///
/// One GET against the token endpoint with the same `redirect_uri` string
/// used during authorization; the provider validates equality and this
/// function forwards whatever it is given. No retries: the code is
/// single-use, so a failed exchange is terminal for the login attempt.
pub async fn exchange_code(
    http: &Client,
    graph_base: &str,
    app_id: u64,
    app_secret: &str,
    redirect_uri: &str,
    code: &str,
) -> GraphResult<AccessToken> {
    let res = http
        .get(format!("{}/v{}/oauth/access_token", graph_base, API_VERSION))
        .query(&[
            ("client_id", app_id.to_string().as_str()),
            ("redirect_uri", redirect_uri),
            ("client_secret", app_secret),
            ("code", code),
        ])
        .send()
        .await?;

    let status = res.status();
    let body = res.text().await?;
    if !status.is_success() {
        return Err(GraphError::TokenExchange(format!(
            "HTTP {}: {}",
            status.as_u16(),
            body
        )));
    }

    let json: Value = serde_json::from_str(&body)
        .map_err(|_| GraphError::TokenExchange(format!("malformed response: {}", body)))?;
    let value = json
        .get("access_token")
        .and_then(|v| v.as_str())
        .ok_or_else(|| {
            GraphError::TokenExchange(format!("response missing access_token: {}", body))
        })?;

    Ok(AccessToken {
        value: value.to_string(),
        expires_in: json.get("expires_in").and_then(|v| v.as_u64()),
    })
}
