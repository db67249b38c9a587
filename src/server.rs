//! Single-use local HTTP server for the OAuth redirect.
//!
//! Modeled as a scoped resource: [`bind`] acquires the socket (failing fast
//! before the authorization URL reaches the user), [`serve_once`] waits for
//! exactly one terminal event (the callback handler finishing, or the
//! caller's shutdown future resolving) and tears the acceptor down
//! unconditionally on every exit path.

use std::{future::Future, sync::Arc};

use axum::{Extension, Router, routing::get};
use reqwest::Client;
use tokio::net::TcpListener;
use tokio::sync::{Mutex, Notify};

use crate::{
    api,
    error::{GraphError, GraphResult},
    graph::http_client,
    types::AuthSession,
};

/// Shared state between the login flow and the callback handler.
pub struct CallbackContext {
    pub http: Client,
    pub graph_base: String,
    pub session: Mutex<AuthSession>,
    pub done: Notify,
}

impl CallbackContext {
    pub fn new(session: AuthSession, graph_base: String) -> GraphResult<Self> {
        Ok(CallbackContext {
            http: http_client()?,
            graph_base,
            session: Mutex::new(session),
            done: Notify::new(),
        })
    }
}

pub async fn bind(host: &str, port: u16) -> GraphResult<TcpListener> {
    let addr = format!("{}:{}", host, port);
    TcpListener::bind(&addr)
        .await
        .map_err(|source| GraphError::Bind { addr, source })
}

/// Serves `GET /` until the callback handler signals completion or
/// `shutdown` resolves, whichever comes first. Graceful shutdown lets the
/// in-flight response finish, so the browser always sees the confirmation
/// body; a second request can never be accepted afterwards.
pub async fn serve_once(
    listener: TcpListener,
    ctx: Arc<CallbackContext>,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> GraphResult<()> {
    let app = Router::new()
        .route("/", get(api::callback))
        .layer(Extension(Arc::clone(&ctx)));

    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            tokio::select! {
                _ = ctx.done.notified() => {}
                _ = shutdown => {}
            }
        })
        .await?;

    Ok(())
}
