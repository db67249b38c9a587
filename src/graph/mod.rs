//! # Facebook Graph Integration Module
//!
//! This module implements everything that talks to Facebook: the OAuth2
//! authorization-code login flow, the authenticated Graph API client, and
//! the pagination engine that walks connection endpoints.
//!
//! ## Architecture
//!
//! ```text
//! CLI commands
//!      ↓
//! Graph integration layer
//!     ├── Auth flow (authorization dialog, one-shot callback, token exchange)
//!     ├── Client (bearer-authenticated calls, error translation)
//!     └── Pager (cursor traversal, filtering, page limits)
//!      ↓
//! HTTP layer (reqwest, JSON)
//!      ↓
//! Facebook Graph API
//! ```
//!
//! ## Authentication
//!
//! [`auth`] implements the classic authorization-code flow: the user visits
//! the printed dialog URL, Facebook redirects the browser to a single-use
//! local HTTP listener, and the received code is exchanged (together with
//! the app secret) for an access token. Authorization codes are single-use,
//! so nothing in the flow retries.
//!
//! ## Data access
//!
//! [`client`] wraps one authenticated call per invocation and translates
//! provider error payloads into [`crate::error::RemoteApiError`] without
//! dropping detail. [`pager`] turns the cursor-bearing pages the client
//! returns into a pull-based lazy sequence bounded by a page limit.

pub mod auth;
pub mod client;
pub mod pager;

use std::time::Duration;

use reqwest::Client;

/// Graph API version all endpoint paths are pinned to.
pub const API_VERSION: &str = "2.10";

/// Host for API and token-exchange calls.
pub const GRAPH_BASE: &str = "https://graph.facebook.com";

/// Host for the user-facing authorization dialog.
pub const DIALOG_BASE: &str = "https://www.facebook.com";

/// Permissions requested during login. Fixed set, versioned with the API.
pub const LOGIN_SCOPES: &[&str] = &[
    "user_likes",
    "user_friends",
    "user_posts",
    "user_photos",
    "user_videos",
    "user_events",
    "publish_actions",
];

const HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// Outbound HTTP client with the crate-wide bounded timeout, so an
/// unresponsive provider cannot hang a command forever.
pub(crate) fn http_client() -> Result<Client, reqwest::Error> {
    Client::builder().timeout(HTTP_TIMEOUT).build()
}
