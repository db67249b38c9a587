use crate::{
    config::Config,
    error,
    format::{Renderer, post_path},
    graph::client::GraphClient,
    success,
    types::Item,
};

use super::spinner;

/// Link metadata for `postlink`.
#[derive(Debug, Clone, Default)]
pub struct PostlinkOptions {
    pub message: Option<String>,
    pub name: Option<String>,
    pub caption: Option<String>,
    pub description: Option<String>,
    pub image: Option<String>,
}

/// Posts a plain message to the user's timeline.
pub async fn post(config: &Config, message: &str, fmt: &Renderer) {
    let params = vec![("message".to_string(), message.to_string())];
    publish_to_feed(config, params, fmt).await;
}

/// Posts a link with optional metadata to the user's timeline.
pub async fn postlink(config: &Config, url: &str, opts: PostlinkOptions, fmt: &Renderer) {
    let mut params = vec![("link".to_string(), url.to_string())];
    for (key, value) in [
        ("message", opts.message),
        ("name", opts.name),
        ("caption", opts.caption),
        ("description", opts.description),
        ("picture", opts.image),
    ] {
        if let Some(value) = value {
            params.push((key.to_string(), value));
        }
    }

    publish_to_feed(config, params, fmt).await;
}

async fn publish_to_feed(config: &Config, params: Vec<(String, String)>, fmt: &Renderer) {
    let client = match GraphClient::new(config) {
        Ok(c) => c,
        Err(e) => error!("{}", e),
    };

    let pb = spinner("Publishing...".to_string());
    match client.publish("me/feed", &params).await {
        Ok(item) => {
            pb.finish_and_clear();
            match full_post_id(&item) {
                Some(id) => success!("Your post: {}", fmt.link(&post_path(id))),
                None => success!("Posted."),
            }
        }
        Err(e) => {
            pb.finish_and_clear();
            error!("{}", e);
        }
    }
}

fn full_post_id(item: &Item) -> Option<&str> {
    item.get("id").and_then(|v| v.as_str())
}
