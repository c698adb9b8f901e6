use std::{net::SocketAddr, str::FromStr, time::Duration};

use chrono::Utc;
use reqwest::{Client, Url};
use tokio::{net::TcpListener, sync::oneshot, time::timeout};

use crate::{
    config,
    error::{Result, TuneCraftError},
    server::{self, CallbackState},
    types::{Token, TokenResponse},
    utils, warning,
};

const CALLBACK_TIMEOUT: Duration = Duration::from_secs(60);

/// Runs the OAuth 2.0 PKCE flow and returns the obtained token.
///
/// # Authentication Flow
///
/// 1. **PKCE Setup**: generates a code verifier and its SHA256 challenge
/// 2. **Server Start**: binds the local callback server on `SERVER_ADDRESS`
/// 3. **Browser Launch**: opens the authorization URL in the default browser
/// 4. **Callback Handling**: the `/callback` handler exchanges the code and
///    hands the token back through a oneshot channel
/// 5. **Shutdown**: the server task is aborted once a result (or the
///    timeout) arrives
///
/// The token is returned, not persisted; the caller stores it with
/// [`TokenManager`](crate::management::TokenManager).
///
/// # Returns
///
/// The freshly issued [`Token`].
///
/// # Errors
///
/// - [`TuneCraftError::Config`] if `SERVER_ADDRESS` or the auth settings are invalid
/// - [`TuneCraftError::Io`] if the callback server cannot bind
/// - [`TuneCraftError::Auth`] if the user denies access, the exchange fails
///   or no callback arrives within 60 seconds
///
/// A browser that cannot be opened only produces a warning with the URL to
/// open manually.
///
/// # Example
///
/// ```ignore
/// let token = spotify::auth::authorize().await?;
/// TokenManager::new(token).persist().await?;
/// ```
pub async fn authorize() -> Result<Token> {
    let code_verifier = utils::generate_code_verifier();
    let code_challenge = utils::generate_code_challenge(&code_verifier);

    let addr = SocketAddr::from_str(&config::server_addr()).map_err(|e| {
        TuneCraftError::Config(format!("Failed to parse server address: {}", e))
    })?;
    let listener = TcpListener::bind(addr).await?;

    let (sender, receiver) = oneshot::channel();
    let state = CallbackState::new(code_verifier, sender);
    let server = tokio::spawn(server::serve(listener, state));

    let auth_url = authorize_url(&code_challenge)?;
    if webbrowser::open(&auth_url).is_err() {
        warning!(
            "Failed to open browser. Please navigate to the following URL manually:\n{}",
            auth_url
        )
    }

    let outcome = timeout(CALLBACK_TIMEOUT, receiver).await;
    server.abort();

    match outcome {
        Ok(Ok(Ok(token))) => Ok(token),
        Ok(Ok(Err(msg))) => Err(TuneCraftError::Auth(msg)),
        Ok(Err(_)) => Err(TuneCraftError::Auth(
            "Callback server stopped before a token was received".to_string(),
        )),
        Err(_) => Err(TuneCraftError::Auth("Authentication timed out".to_string())),
    }
}

/// Builds the authorization URL the user is sent to.
///
/// # Arguments
///
/// * `code_challenge` - URL-safe base64 SHA256 digest of the code verifier
///
/// # Returns
///
/// The `SPOTIFY_API_AUTH_URL` endpoint with client ID, redirect URI,
/// challenge (`S256`) and scope as query parameters.
///
/// # Errors
///
/// Returns [`TuneCraftError::Config`] if the client ID or redirect URI is
/// missing, or the auth URL does not parse.
pub fn authorize_url(code_challenge: &str) -> Result<String> {
    let url = Url::parse_with_params(
        &config::spotify_apiauth_url(),
        &[
            ("client_id", config::spotify_client_id()?),
            ("response_type", "code".to_string()),
            ("redirect_uri", config::spotify_redirect_uri()?),
            ("code_challenge", code_challenge.to_string()),
            ("code_challenge_method", "S256".to_string()),
            ("scope", config::spotify_scope()),
        ],
    )
    .map_err(|e| TuneCraftError::Config(format!("Invalid SPOTIFY_API_AUTH_URL: {}", e)))?;

    Ok(url.to_string())
}

/// Exchanges an authorization code for a token using the PKCE verifier.
///
/// # Arguments
///
/// * `code` - Authorization code received on `/callback`
/// * `verifier` - The code verifier whose challenge was sent with the
///   authorization request
///
/// # Returns
///
/// A [`Token`] stamped with the current time as `obtained_at`.
///
/// # Errors
///
/// - [`TuneCraftError::Config`] if client ID or redirect URI are missing
/// - [`TuneCraftError::Http`] on transport failures
/// - [`TuneCraftError::Auth`] if the token endpoint rejects the exchange
pub async fn exchange_code_pkce(code: &str, verifier: &str) -> Result<Token> {
    let client_id = config::spotify_client_id()?;
    let redirect_uri = config::spotify_redirect_uri()?;

    request_token(&[
        ("grant_type", "authorization_code"),
        ("client_id", &client_id),
        ("code", code),
        ("code_verifier", verifier),
        ("redirect_uri", &redirect_uri),
    ])
    .await
}

/// Trades a refresh token for a fresh access token.
///
/// # Arguments
///
/// * `refresh_token` - The refresh token stored with the current token
///
/// # Returns
///
/// The new [`Token`]. Its `refresh_token` is empty when Spotify did not
/// rotate it; [`TokenManager`](crate::management::TokenManager) keeps the
/// previous one in that case.
///
/// # Errors
///
/// - [`TuneCraftError::Config`] if the client ID is missing
/// - [`TuneCraftError::Http`] on transport failures
/// - [`TuneCraftError::Auth`] if the token endpoint rejects the refresh
pub async fn refresh_token(refresh_token: &str) -> Result<Token> {
    let client_id = config::spotify_client_id()?;

    request_token(&[
        ("grant_type", "refresh_token"),
        ("refresh_token", refresh_token),
        ("client_id", &client_id),
    ])
    .await
}

async fn request_token(form: &[(&str, &str)]) -> Result<Token> {
    let response = Client::new()
        .post(config::spotify_apitoken_url())
        .form(form)
        .send()
        .await?;

    let status = response.status();
    if !status.is_success() {
        let text = response.text().await.unwrap_or_default();
        return Err(TuneCraftError::Auth(format!(
            "Token endpoint returned {}: {}",
            status, text
        )));
    }

    let body: TokenResponse = response.json().await?;
    Ok(Token {
        access_token: body.access_token,
        refresh_token: body.refresh_token.unwrap_or_default(),
        scope: body.scope,
        expires_in: body.expires_in,
        obtained_at: Utc::now().timestamp() as u64,
    })
}
