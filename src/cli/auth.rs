use crate::{error, info, management::TokenManager, spotify, success};

pub async fn auth() {
    info!("Opening Spotify login in your browser...");

    let token = match spotify::auth::authorize().await {
        Ok(token) => token,
        Err(e) => error!("{}", e),
    };

    if let Err(e) = TokenManager::new(token).persist().await {
        error!("Failed to save token to cache: {}", e);
    }

    success!("Authentication successful!");
}
