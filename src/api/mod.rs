//! # API Module
//!
//! HTTP handler for the single-use local callback endpoint that completes
//! the OAuth2 authorization-code flow.
//!
//! ## Endpoint
//!
//! - [`callback`] - `GET /`, the redirect target the authorization dialog
//!   sends the browser to. Captures the `code` query parameter, performs
//!   the token exchange before responding, and signals the server to shut
//!   down. A request without a code (denied consent, provider error) gets
//!   the same confirmation body and captures nothing.
//!
//! Built on [Axum](https://docs.rs/axum); the handler shares state with the
//! auth flow through an `Extension`-injected [`crate::server::CallbackContext`].

mod callback;

pub use callback::{CONFIRMATION, callback};
