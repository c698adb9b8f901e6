use std::time::Duration;

use reqwest::{Client, Method, Response, StatusCode};
use serde::{Serialize, de::DeserializeOwned};
use tokio::{sync::Mutex, time::sleep};

use crate::{
    config,
    error::{Result, TuneCraftError},
    management::TokenManager,
    spotify::{Catalog, MAX_TRACKS_PER_ADD, PAGE_LIMIT, PLAYLIST_TRACKS_LIMIT},
    types::{
        AddTrackToPlaylistRequest, AddTrackToPlaylistResponse, CreatePlaylistRequest,
        CreatePlaylistResponse, Page, Playlist, PlaylistObject, RecommendationsResponse, Track,
        TrackItem, track_uri,
    },
    warning,
};

const MAX_ATTEMPTS: u32 = 5;
const BAD_GATEWAY_DELAY: Duration = Duration::from_secs(10);
const MAX_RETRY_AFTER_SECS: u64 = 120;

/// [`Catalog`] backed by the Spotify Web API.
///
/// Requests are authorized with the cached OAuth token, which is refreshed
/// transparently shortly before it expires. `502 Bad Gateway` is retried
/// after 10 seconds and `429 Too Many Requests` after the delay announced in
/// `Retry-After` (when it is at most 120 seconds). Any other error status
/// is returned as [`TuneCraftError::Remote`].
pub struct SpotifyClient {
    http: Client,
    api_url: String,
    tokens: Mutex<TokenManager>,
}

impl SpotifyClient {
    /// Creates a client against `SPOTIFY_API_URL`.
    ///
    /// # Arguments
    ///
    /// * `tokens` - Token manager used to authorize and refresh requests
    pub fn new(tokens: TokenManager) -> Self {
        Self::with_api_url(tokens, config::spotify_apiurl())
    }

    /// Creates a client against an explicit API base URL. A trailing `/` is
    /// ignored.
    pub fn with_api_url(tokens: TokenManager, api_url: String) -> Self {
        Self {
            http: Client::new(),
            api_url: api_url.trim_end_matches('/').to_string(),
            tokens: Mutex::new(tokens),
        }
    }

    /// Builds a client from the token stored by `tunecraft auth`.
    ///
    /// # Errors
    ///
    /// Returns [`TuneCraftError::Auth`] when no cached token can be read,
    /// asking the user to log in first.
    pub async fn from_cache() -> Result<Self> {
        let tokens = TokenManager::load().await.map_err(|e| {
            TuneCraftError::Auth(format!(
                "Failed to load token. Please run tunecraft auth\n Error: {}",
                e
            ))
        })?;
        Ok(Self::new(tokens))
    }

    /// Sends one API request, retrying transient failures.
    ///
    /// # Arguments
    ///
    /// * `method` - HTTP method
    /// * `path` - Path below the API base URL, e.g. `/me/tracks`
    /// * `query` - Query parameters
    /// * `body` - Optional JSON body
    ///
    /// # Retry Behavior
    ///
    /// - `502 Bad Gateway`: wait 10 seconds and retry
    /// - `429 Too Many Requests`: wait `Retry-After` seconds (1 if absent)
    ///   when it is at most 120, otherwise give up
    /// - at most 5 attempts in total
    ///
    /// # Errors
    ///
    /// - [`TuneCraftError::Remote`] with method, path, status and body for
    ///   any other error status or once retries are used up
    /// - [`TuneCraftError::Http`] on transport failures
    /// - token refresh errors from [`TokenManager::get_valid_token`]
    async fn execute(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, String)],
        body: Option<&serde_json::Value>,
    ) -> Result<Response> {
        let url = format!("{}{}", self.api_url, path);
        let mut attempt = 0;

        loop {
            attempt += 1;
            let token = self.tokens.lock().await.get_valid_token().await?;

            let mut request = self
                .http
                .request(method.clone(), &url)
                .bearer_auth(token)
                .query(query);
            if let Some(body) = body {
                request = request.json(body);
            }

            let response = request.send().await?;
            let status = response.status();
            if status.is_success() {
                return Ok(response);
            }

            if attempt < MAX_ATTEMPTS {
                if status == StatusCode::BAD_GATEWAY {
                    sleep(BAD_GATEWAY_DELAY).await;
                    continue; // retry
                }

                if status == StatusCode::TOO_MANY_REQUESTS {
                    let retry_after = response
                        .headers()
                        .get("retry-after")
                        .and_then(|v| v.to_str().ok())
                        .and_then(|v| v.parse::<u64>().ok())
                        .unwrap_or(1);

                    if retry_after <= MAX_RETRY_AFTER_SECS {
                        warning!("Rate limited by Spotify, retrying in {}s", retry_after);
                        sleep(Duration::from_secs(retry_after)).await;
                        continue;
                    }

                    warning!(
                        "Retry after has reached an abnormal high of {} seconds. Try again later.",
                        retry_after
                    );
                }
            }

            let text = response.text().await.unwrap_or_default();
            return Err(TuneCraftError::Remote(format!(
                "{} {} returned {}: {}",
                method, path, status, text
            )));
        }
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str, query: &[(&str, String)]) -> Result<T> {
        let response = self.execute(Method::GET, path, query, None).await?;
        Ok(response.json::<T>().await?)
    }

    async fn post_json<B: Serialize, T: DeserializeOwned>(&self, path: &str, body: &B) -> Result<T> {
        let body = serde_json::to_value(body)?;
        let response = self.execute(Method::POST, path, &[], Some(&body)).await?;
        Ok(response.json::<T>().await?)
    }
}

impl Catalog for SpotifyClient {
    async fn user_playlists(&self, user_id: &str, offset: u32) -> Result<Page<Option<Playlist>>> {
        let page: Page<Option<PlaylistObject>> = self
            .get_json(
                &format!("/users/{}/playlists", user_id),
                &[
                    ("offset", offset.to_string()),
                    ("limit", PAGE_LIMIT.to_string()),
                ],
            )
            .await?;

        Ok(Page {
            items: page
                .items
                .into_iter()
                .map(|item| item.map(Playlist::from))
                .collect(),
            next: page.next,
            total: page.total,
        })
    }

    async fn playlist_tracks(&self, playlist_id: &str, offset: u32) -> Result<Page<TrackItem>> {
        self.get_json(
            &format!("/playlists/{}/tracks", playlist_id),
            &[
                ("offset", offset.to_string()),
                ("limit", PLAYLIST_TRACKS_LIMIT.to_string()),
                ("fields", "items(track(id)),next,total".to_string()),
            ],
        )
        .await
    }

    async fn liked_tracks(&self, offset: u32, limit: u32) -> Result<Page<TrackItem>> {
        self.get_json(
            "/me/tracks",
            &[("offset", offset.to_string()), ("limit", limit.to_string())],
        )
        .await
    }

    async fn track(&self, track_id: &str) -> Result<Track> {
        self.get_json(&format!("/tracks/{}", track_id), &[]).await
    }

    async fn playlist(&self, playlist_id: &str) -> Result<Playlist> {
        let playlist: PlaylistObject = self
            .get_json(
                &format!("/playlists/{}", playlist_id),
                &[("fields", "id,name,owner(id,display_name)".to_string())],
            )
            .await?;
        Ok(playlist.into())
    }

    async fn recommendations(&self, seed_track_ids: &[String], limit: u32) -> Result<Vec<Track>> {
        let response: RecommendationsResponse = self
            .get_json(
                "/recommendations",
                &[
                    ("seed_tracks", seed_track_ids.join(",")),
                    ("limit", limit.to_string()),
                ],
            )
            .await?;
        Ok(response.tracks)
    }

    async fn create_playlist(&self, user_id: &str, name: &str, description: &str) -> Result<String> {
        let request = CreatePlaylistRequest {
            name: name.to_string(),
            description: description.to_string(),
            public: true,
        };
        let response: CreatePlaylistResponse = self
            .post_json(&format!("/users/{}/playlists", user_id), &request)
            .await?;
        Ok(response.id)
    }

    async fn add_tracks(&self, playlist_id: &str, track_ids: &[String]) -> Result<()> {
        let path = format!("/playlists/{}/tracks", playlist_id);
        for chunk in track_ids.chunks(MAX_TRACKS_PER_ADD) {
            let request = AddTrackToPlaylistRequest {
                uris: chunk.iter().map(|id| track_uri(id)).collect(),
            };
            let _: AddTrackToPlaylistResponse = self.post_json(&path, &request).await?;
        }
        Ok(())
    }
}
