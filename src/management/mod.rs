//! Local persistence: the playlist mirror and the OAuth token cache.

mod auth;
mod mirror;

pub use auth::TokenManager;
pub use mirror::SqliteMirror;

use crate::{
    error::Result,
    types::{Playlist, PlaylistDiff},
};

/// Durable copy of a user's playlists, their membership and liked tracks.
///
/// All writes are idempotent. `apply_playlist_diff` is the unit of work of
/// a reconciliation: the playlist row and its membership changes are
/// committed together or not at all.
pub trait MirrorStore {
    fn playlists(&self, user_id: &str) -> Result<Vec<Playlist>>;

    fn playlist(&self, user_id: &str, playlist_id: &str) -> Result<Option<Playlist>>;

    fn has_playlist(&self, user_id: &str, playlist_id: &str) -> Result<bool> {
        Ok(self.playlist(user_id, playlist_id)?.is_some())
    }

    fn playlist_tracks(&self, playlist_id: &str) -> Result<Vec<String>>;

    fn liked_tracks(&self, user_id: &str) -> Result<Vec<String>>;

    fn upsert_playlist(&mut self, user_id: &str, playlist: &Playlist) -> Result<()>;

    /// Removes the playlist together with its membership rows.
    fn delete_playlist(&mut self, playlist_id: &str) -> Result<()>;

    fn apply_playlist_diff(&mut self, user_id: &str, diff: &PlaylistDiff) -> Result<()>;

    /// Replaces the user's liked tracks wholesale.
    fn replace_liked(&mut self, user_id: &str, track_ids: &[String]) -> Result<()>;

    fn apply_liked_diff(&mut self, user_id: &str, removed: &[String], added: &[String]) -> Result<()>;
}
