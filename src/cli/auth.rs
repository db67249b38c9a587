use serde_json::json;

use crate::{
    config::Config,
    error, format,
    graph::{auth::AuthFlow, client::GraphClient},
    info, success,
};

/// Saves the application credentials, replacing any previous record. The
/// user re-runs `login` afterwards to attach a token.
pub async fn save_app(app_id: u64, app_secret: String) {
    let config = Config {
        app_id,
        app_secret,
        access_token: None,
    };

    if let Err(e) = config.save().await {
        error!("Failed to save configuration: {}", e);
    }

    success!("Configuration saved to {}", Config::path().display());
    info!("To acquire a Facebook access token, run: fbcli login");
}

/// Runs the login flow and persists the received token, or with `info`
/// introspects the token currently on file.
pub async fn login(mut config: Config, host: String, port: u16, info: bool) {
    if info {
        return token_info(&config).await;
    }

    let flow = AuthFlow::new(config.app_id, config.app_secret.clone());
    match flow.login(&host, port).await {
        Ok(Some(token)) => {
            config.access_token = Some(token.value.clone());
            if let Err(e) = config.save().await {
                error!("Failed to save configuration: {}", e);
            }

            success!("Your access token: {}", token.value);
            println!();
            println!("To find out when it is scheduled to expire, run: fbcli login --info");
            println!();
            println!("Have fun!");
        }
        Ok(None) => {
            info!("No authorization code received; no token was saved.");
        }
        Err(e) => error!("{}", e),
    }
}

async fn token_info(config: &Config) {
    let token = match config.require_token() {
        Ok(t) => t.to_string(),
        Err(e) => error!("{}", e),
    };

    let flow = AuthFlow::new(config.app_id, config.app_secret.clone());
    match flow.token_info(&token).await {
        Ok(data) => {
            if let Some(issued_at) = data.issued_at {
                info!(
                    "Your access token was issued on: {}",
                    format::date_str(&json!(issued_at))
                );
            }
            if let Some(expires_at) = data.expires_at {
                info!("It is valid until: {}", format::date_str(&json!(expires_at)));
            }
            if !data.scopes.is_empty() {
                println!("Permissions:");
                for scope in &data.scopes {
                    println!("  - {}", scope);
                }
            }
        }
        Err(_) => {
            error!("Your access token does not appear to be valid for this application.");
        }
    }
}

/// Deauthorizes the access token by deleting the user's app permissions.
pub async fn logout(config: &Config) {
    let client = match GraphClient::new(config) {
        Ok(c) => c,
        Err(e) => error!("{}", e),
    };

    match client.delete("me/permissions").await {
        Ok(()) => success!("You are now logged out."),
        Err(e) => error!("{}", e),
    }
}
