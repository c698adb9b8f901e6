//! Configuration management for TuneCraft.
//!
//! Values come from environment variables, optionally seeded from a `.env`
//! file in the local data directory:
//! 1. Environment variables (highest priority)
//! 2. `.env` file in `<data_local_dir>/tunecraft/`
//! 3. Application defaults (where applicable)

use std::{env, path::PathBuf};

use crate::{
    engine::{ExpandOptions, LikedPolicy},
    error::{Result, TuneCraftError},
};

const DEFAULT_API_URL: &str = "https://api.spotify.com/v1";
const DEFAULT_AUTH_URL: &str = "https://accounts.spotify.com/authorize";
const DEFAULT_TOKEN_URL: &str = "https://accounts.spotify.com/api/token";
const DEFAULT_SCOPE: &str = "playlist-modify-public playlist-read-private user-library-read";
const DEFAULT_SERVER_ADDRESS: &str = "127.0.0.1:8888";

/// Returns the TuneCraft directory inside the platform's local data dir.
///
/// Both the `.env` file and, unless overridden, the mirror database and
/// the token cache live below this directory.
///
/// # Directory Structure
///
/// - Linux: `~/.local/share/tunecraft`
/// - macOS: `~/Library/Application Support/tunecraft`
/// - Windows: `%LOCALAPPDATA%/tunecraft`
///
/// Falls back to `./tunecraft` when the platform reports no data dir.
pub fn data_dir() -> PathBuf {
    let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push("tunecraft");
    path
}

/// Loads environment variables from `<data_dir>/.env`.
///
/// Creates the data directory if needed. Variables already present in the
/// process environment win over the file.
///
/// # Returns
///
/// Returns `Ok(())` when the file was loaded or does not exist.
///
/// # Errors
///
/// - [`TuneCraftError::Io`] if the data directory cannot be created
/// - [`TuneCraftError::Config`] if the `.env` file cannot be read or parsed
///
/// # Example
///
/// ```ignore
/// if let Err(e) = config::load_env().await {
///     error!("Cannot load environment. Err: {}", e);
/// }
/// ```
pub async fn load_env() -> Result<()> {
    let dir = data_dir();
    async_fs::create_dir_all(&dir).await?;

    let path = dir.join(".env");
    if path.is_file() {
        dotenv::from_path(&path)
            .map_err(|e| TuneCraftError::Config(format!("{}: {}", path.display(), e)))?;
    }
    Ok(())
}

fn required(key: &str) -> Result<String> {
    env::var(key).map_err(|_| TuneCraftError::Config(format!("{} must be set", key)))
}

fn or_default(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Returns the Spotify user whose playlists are mirrored.
///
/// Reads `SPOTIFY_USER_ID`. Generated playlists are created for this user
/// and every mirror query is scoped to it.
///
/// # Errors
///
/// Returns [`TuneCraftError::Config`] if `SPOTIFY_USER_ID` is not set.
///
/// # Example
///
/// ```ignore
/// let user_id = config::spotify_user()?; // e.g., "username"
/// ```
pub fn spotify_user() -> Result<String> {
    required("SPOTIFY_USER_ID")
}

/// Returns the client ID of the registered Spotify application.
///
/// Reads `SPOTIFY_API_AUTH_CLIENT_ID`, the ID shown in the Spotify developer
/// dashboard. The PKCE flow needs no client secret.
///
/// # Errors
///
/// Returns [`TuneCraftError::Config`] if the variable is not set.
pub fn spotify_client_id() -> Result<String> {
    required("SPOTIFY_API_AUTH_CLIENT_ID")
}

/// Returns the OAuth redirect URI.
///
/// Reads `SPOTIFY_API_REDIRECT_URI`. It must match a redirect URI registered
/// for the application and point at the local callback server, e.g.
/// `http://127.0.0.1:8888/callback`.
///
/// # Errors
///
/// Returns [`TuneCraftError::Config`] if the variable is not set.
pub fn spotify_redirect_uri() -> Result<String> {
    required("SPOTIFY_API_REDIRECT_URI")
}

/// Returns the OAuth scopes requested at login.
///
/// Reads `SPOTIFY_API_AUTH_SCOPE`, defaulting to
/// `playlist-modify-public playlist-read-private user-library-read`, which
/// covers reading playlists and likes and creating public playlists.
pub fn spotify_scope() -> String {
    or_default("SPOTIFY_API_AUTH_SCOPE", DEFAULT_SCOPE)
}

/// Returns the base URL of the Spotify Web API.
///
/// Reads `SPOTIFY_API_URL`, defaulting to `https://api.spotify.com/v1`.
pub fn spotify_apiurl() -> String {
    or_default("SPOTIFY_API_URL", DEFAULT_API_URL)
}

/// Returns the authorization endpoint the browser is sent to.
///
/// Reads `SPOTIFY_API_AUTH_URL`, defaulting to
/// `https://accounts.spotify.com/authorize`.
pub fn spotify_apiauth_url() -> String {
    or_default("SPOTIFY_API_AUTH_URL", DEFAULT_AUTH_URL)
}

/// Returns the token endpoint used for code exchange and refresh.
///
/// Reads `SPOTIFY_API_TOKEN_URL`, defaulting to
/// `https://accounts.spotify.com/api/token`.
pub fn spotify_apitoken_url() -> String {
    or_default("SPOTIFY_API_TOKEN_URL", DEFAULT_TOKEN_URL)
}

/// Returns the bind address of the local OAuth callback server.
///
/// Reads `SERVER_ADDRESS`, defaulting to `127.0.0.1:8888`. The host and
/// port must agree with [`spotify_redirect_uri`].
///
/// # Example
///
/// ```ignore
/// let addr = config::server_addr(); // e.g., "127.0.0.1:8888"
/// ```
pub fn server_addr() -> String {
    or_default("SERVER_ADDRESS", DEFAULT_SERVER_ADDRESS)
}

/// Returns the location of the SQLite mirror.
///
/// Reads `TUNECRAFT_DB_PATH`, defaulting to `<data_dir>/mirror.db3`.
pub fn db_path() -> PathBuf {
    match env::var("TUNECRAFT_DB_PATH") {
        Ok(path) => PathBuf::from(path),
        Err(_) => data_dir().join("mirror.db3"),
    }
}

/// Returns how liked tracks are written on refresh.
///
/// Reads `TUNECRAFT_LIKED_POLICY` (`replace` or `diff`), defaulting to
/// [`LikedPolicy::Replace`].
///
/// # Errors
///
/// Returns [`TuneCraftError::Config`] for any other value.
pub fn liked_policy() -> Result<LikedPolicy> {
    match env::var("TUNECRAFT_LIKED_POLICY") {
        Ok(value) => value.parse(),
        Err(_) => Ok(LikedPolicy::default()),
    }
}

/// Returns the expander tuning.
///
/// Starts from [`ExpandOptions::default`] and applies
/// `TUNECRAFT_MAX_STALLED_ATTEMPTS` (see [`parse_stalled_attempts`]) and
/// `TUNECRAFT_DEDUPE_ACCEPTED` (see [`parse_flag`]) when they are set.
///
/// # Errors
///
/// Returns [`TuneCraftError::Config`] if either variable holds an invalid
/// value.
pub fn expand_options() -> Result<ExpandOptions> {
    let mut options = ExpandOptions::default();

    if let Ok(value) = env::var("TUNECRAFT_MAX_STALLED_ATTEMPTS") {
        options.max_stalled_attempts = parse_stalled_attempts(&value)?;
    }

    if let Ok(value) = env::var("TUNECRAFT_DEDUPE_ACCEPTED") {
        options.dedupe_accepted = parse_flag("TUNECRAFT_DEDUPE_ACCEPTED", &value)?;
    }

    Ok(options)
}

/// Parses the stalled-query ceiling. Zero is rejected, a chunk always gets
/// at least one query.
pub fn parse_stalled_attempts(value: &str) -> Result<u32> {
    match value.trim().parse::<u32>() {
        Ok(attempts) if attempts > 0 => Ok(attempts),
        _ => Err(TuneCraftError::Config(format!(
            "TUNECRAFT_MAX_STALLED_ATTEMPTS must be a positive number, got '{}'",
            value
        ))),
    }
}

/// Parses a boolean switch (`1/0`, `true/false`, `yes/no`, `on/off`).
pub fn parse_flag(key: &str, value: &str) -> Result<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(TuneCraftError::Config(format!(
            "{} must be true or false, got '{}'",
            key, value
        ))),
    }
}
