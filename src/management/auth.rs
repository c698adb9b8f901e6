use std::path::PathBuf;

use chrono::Utc;

use crate::{
    config,
    error::{Result, TuneCraftError},
    spotify,
    types::Token,
};

/// Seconds before expiry at which the access token is refreshed.
const REFRESH_MARGIN_SECS: u64 = 240;

/// Owns the OAuth token and keeps it fresh.
///
/// Persisted as `<data_dir>/cache/token.json`.
pub struct TokenManager {
    token: Token,
    path: PathBuf,
}

impl TokenManager {
    pub fn new(token: Token) -> Self {
        TokenManager {
            token,
            path: Self::token_path(),
        }
    }

    pub fn with_path(token: Token, path: PathBuf) -> Self {
        TokenManager { token, path }
    }

    pub async fn load() -> Result<Self> {
        Self::load_from(Self::token_path()).await
    }

    pub async fn load_from(path: PathBuf) -> Result<Self> {
        let content = async_fs::read_to_string(&path).await?;
        let token: Token = serde_json::from_str(&content)?;
        Ok(Self { token, path })
    }

    pub async fn persist(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            async_fs::create_dir_all(parent).await?;
        }

        let json = serde_json::to_string_pretty(&self.token)?;
        async_fs::write(&self.path, json).await?;
        Ok(())
    }

    /// Returns an access token, refreshing and persisting it first when it
    /// is about to expire.
    pub async fn get_valid_token(&mut self) -> Result<String> {
        if self.is_expired() {
            if self.token.refresh_token.is_empty() {
                return Err(TuneCraftError::Auth(
                    "Token expired and no refresh token is stored. Please run tunecraft auth"
                        .to_string(),
                ));
            }

            let fresh = spotify::auth::refresh_token(&self.token.refresh_token).await?;
            self.token = Token {
                // Spotify may omit the refresh token when it is not rotated
                refresh_token: if fresh.refresh_token.is_empty() {
                    self.token.refresh_token.clone()
                } else {
                    fresh.refresh_token
                },
                ..fresh
            };
            self.persist().await?;
        }

        Ok(self.token.access_token.clone())
    }

    pub fn is_expired(&self) -> bool {
        let now = Utc::now().timestamp() as u64;
        now + REFRESH_MARGIN_SECS >= self.token.obtained_at + self.token.expires_in
    }

    pub fn current_token(&self) -> &Token {
        &self.token
    }

    fn token_path() -> PathBuf {
        config::data_dir().join("cache/token.json")
    }
}
