use crate::{config::Config, error, graph::client::GraphClient};

use super::spinner;

/// Shows the authenticated user's name and profile ID.
pub async fn me(config: &Config) {
    let client = match GraphClient::new(config) {
        Ok(c) => c,
        Err(e) => error!("{}", e),
    };

    let pb = spinner("Fetching profile...".to_string());
    match client.get_object("me", None).await {
        Ok(item) => {
            pb.finish_and_clear();
            if let Some(name) = item.get("name").and_then(|v| v.as_str()) {
                println!("Name: {}", name);
            }
            if let Some(id) = item.get("id").and_then(|v| v.as_str()) {
                println!("ID: {}", id);
            }
        }
        Err(e) => {
            pb.finish_and_clear();
            error!("{}", e);
        }
    }
}
