use serde::{Deserialize, Serialize};
use tabled::Tabled;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Token {
    pub access_token: String,
    pub refresh_token: String,
    pub scope: String,
    pub expires_in: u64,
    pub obtained_at: u64,
}

/// Body of the token endpoint for both code exchange and refresh.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub scope: String,
    pub expires_in: u64,
}

/// One page of an offset-paginated Spotify listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    #[serde(default)]
    pub next: Option<String>,
    #[serde(default)]
    pub total: Option<u64>,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>) -> Self {
        Self {
            items,
            next: None,
            total: None,
        }
    }
}

/// A playlist as the mirror knows it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Playlist {
    pub id: String,
    pub name: String,
    pub owner_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaylistOwner {
    pub id: String,
    #[serde(default)]
    pub display_name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaylistObject {
    pub id: String,
    pub name: String,
    pub owner: PlaylistOwner,
}

impl From<PlaylistObject> for Playlist {
    fn from(obj: PlaylistObject) -> Self {
        Playlist {
            id: obj.id,
            name: obj.name,
            owner_id: obj.owner.id,
        }
    }
}

/// Entry of a playlist track listing or of the liked-tracks library.
///
/// `track` is null for unavailable items, `track.id` is null for local files.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TrackItem {
    pub track: Option<TrackLink>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TrackLink {
    pub id: Option<String>,
}

impl TrackItem {
    pub fn with_id(id: &str) -> Self {
        Self {
            track: Some(TrackLink {
                id: Some(id.to_string()),
            }),
        }
    }

    pub fn track_id(&self) -> Option<&str> {
        self.track.as_ref().and_then(|t| t.id.as_deref())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtistRef {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Track {
    pub id: String,
    pub name: String,
    pub artists: Vec<ArtistRef>,
}

impl Track {
    pub fn primary_artist_id(&self) -> Option<&str> {
        self.artists.first().map(|a| a.id.as_str())
    }

    pub fn primary_artist_name(&self) -> &str {
        self.artists.first().map_or("Unknown", |a| a.name.as_str())
    }
}

pub fn track_uri(track_id: &str) -> String {
    format!("spotify:track:{}", track_id)
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecommendationsResponse {
    pub tracks: Vec<Track>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePlaylistRequest {
    pub name: String,
    pub description: String,
    pub public: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePlaylistResponse {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddTrackToPlaylistRequest {
    pub uris: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddTrackToPlaylistResponse {
    pub snapshot_id: String,
}

/// Membership changes for one playlist, applied to the mirror as a unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaylistDiff {
    pub playlist: Playlist,
    pub removed: Vec<String>,
    pub added: Vec<String>,
}

impl PlaylistDiff {
    pub fn is_empty(&self) -> bool {
        self.removed.is_empty() && self.added.is_empty()
    }
}

/// Output of a generation run, written back to Spotify once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedPlaylist {
    pub name: String,
    pub description: String,
    pub track_ids: Vec<String>,
}

#[derive(Tabled)]
pub struct PlaylistTableRow {
    pub id: String,
    pub name: String,
    pub tracks: usize,
}
