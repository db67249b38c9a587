use std::{collections::HashMap, sync::Arc};

use axum::{
    Extension,
    extract::{Query, RawQuery},
    response::Html,
};

use crate::{graph, server::CallbackContext, types::AuthState, warning};

/// Body shown to the user's browser regardless of outcome.
pub const CONFIRMATION: &str = "You may now close this window.";

/// Handles the one authorization redirect.
///
/// The exchange runs before the response is written, so the server cannot
/// shut down with the exchange still in flight. The session moves to a
/// terminal state under a single lock together with the pending-state
/// check, which keeps the listener single-use even if the browser replays
/// the redirect.
pub async fn callback(
    Query(params): Query<HashMap<String, String>>,
    RawQuery(raw_query): RawQuery,
    Extension(ctx): Extension<Arc<CallbackContext>>,
) -> Html<&'static str> {
    let exchange = {
        let mut session = ctx.session.lock().await;
        match (&session.state, params.get("code")) {
            (AuthState::Pending, Some(code)) => {
                session.state = AuthState::CodeReceived(code.clone());
                Some((
                    session.app_id,
                    session.app_secret.clone(),
                    session.redirect_uri.clone(),
                    code.clone(),
                ))
            }
            (AuthState::Pending, None) => {
                warning!(
                    "Received unexpected request: {}",
                    raw_query.unwrap_or_default()
                );
                None
            }
            // Already terminal: a stray second request changes nothing.
            _ => return Html(CONFIRMATION),
        }
    };

    if let Some((app_id, app_secret, redirect_uri, code)) = exchange {
        let result = graph::auth::exchange_code(
            &ctx.http,
            &ctx.graph_base,
            app_id,
            &app_secret,
            &redirect_uri,
            &code,
        )
        .await;

        let mut session = ctx.session.lock().await;
        session.state = match result {
            Ok(token) => AuthState::Exchanged(token),
            Err(e) => AuthState::Failed(e),
        };
    }

    ctx.done.notify_one();
    Html(CONFIRMATION)
}
