//! # CLI Module
//!
//! User-facing command implementations. Each command is a thin async
//! function that loads what it needs, delegates to the Graph layer, and
//! reports through the status macros; fatal errors exit with a single-line
//! diagnostic via `error!`.
//!
//! ## Command Categories
//!
//! ### Authentication
//!
//! - [`save_app`] - persist the Facebook application ID and secret
//! - [`login`] - run the OAuth flow, or introspect the current token
//! - [`logout`] - deauthorize the access token
//!
//! ### Profile
//!
//! - [`me`] - show the user's name and profile ID
//!
//! ### Connection listings
//!
//! All driven by the pagination engine with the global `--pages`,
//! `--format` and `--show-empty` flags: [`likes`], [`friends`], [`feed`],
//! [`photos`], [`videos`], [`events`], plus [`event_details`] for
//! individual events.
//!
//! ### Publishing
//!
//! - [`post`] - post a message to the timeline
//! - [`postlink`] - post a link with optional metadata

mod auth;
mod connections;
mod profile;
mod publish;

use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

pub use auth::{login, logout, save_app};
pub use connections::{PageOptions, event_details, events, feed, friends, likes, photos, videos};
pub use profile::me;
pub use publish::{PostlinkOptions, post, postlink};

pub(crate) fn spinner(msg: String) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_message(msg);
    pb.enable_steady_tick(Duration::from_millis(100));
    pb.set_style(
        ProgressStyle::with_template("{spinner:.blue} {msg}")
            .unwrap()
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"),
    );
    pb
}
