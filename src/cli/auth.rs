use super::spotify_client;
use crate::{config::Config, error, info, spotify, success, warning};

pub async fn auth_url(config: &Config) {
    let url = match spotify::authorize_url(config) {
        Ok(url) => url,
        Err(e) => error!("Cannot build authorization URL: {}", e),
    };

    if webbrowser::open(&url).is_err() {
        warning!("Failed to open browser. Please navigate to the following URL manually:");
    }
    info!("{}", url);
    info!("Then run `spotinline login <redirect url>` with the URL you were sent to.");
}

pub async fn login(config: &Config, redirect_url: &str) {
    let client = match spotify_client(config).await {
        Ok(client) => client,
        Err(e) => error!("Cannot load Spotify state: {}", e),
    };

    match client.refresher().process_redirect(redirect_url).await {
        Ok(()) => success!("Authentication successful!"),
        Err(e) => error!("Authentication failed: {}", e),
    }
}
