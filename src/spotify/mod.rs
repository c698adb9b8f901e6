//! # Spotify Integration Module
//!
//! The remote side of TuneCraft. [`Catalog`] is the capability the mirror
//! reconciler and the generation pipeline consume; [`SpotifyClient`] is the
//! Web API implementation used by the binary. Tests substitute their own
//! in-memory catalog.
//!
//! ## Submodules
//!
//! - [`auth`] - OAuth 2.0 PKCE login flow and token exchange
//! - [`client`] - `reqwest` based [`Catalog`] implementation
//!
//! ## API Coverage
//!
//! - `GET /users/{user_id}/playlists` - playlists of the mirrored user
//! - `GET /playlists/{playlist_id}/tracks` - playlist membership
//! - `GET /me/tracks` - liked tracks
//! - `GET /tracks/{id}` and `GET /playlists/{id}` - single lookups
//! - `GET /recommendations` - seed based recommendations
//! - `POST /users/{user_id}/playlists` - create playlists
//! - `POST /playlists/{playlist_id}/tracks` - append tracks
//!
//! Every call is awaited before the next one is issued; the client never
//! fans requests out.

use std::future::Future;

use crate::{
    error::Result,
    types::{Page, Playlist, Track, TrackItem},
};

pub mod auth;
pub mod client;

pub use client::SpotifyClient;

/// Page size for playlist listings and the liked-tracks library.
pub const PAGE_LIMIT: u32 = 50;
/// Page size for playlist track listings.
pub const PLAYLIST_TRACKS_LIMIT: u32 = 100;
/// Largest `limit` the recommendations endpoint accepts.
pub const MAX_RECOMMENDATIONS: u32 = 100;
/// Largest number of URIs one append call accepts.
pub const MAX_TRACKS_PER_ADD: usize = 100;

/// Read and write access to the remote music catalog.
///
/// Listings are offset paginated; callers keep requesting pages until an
/// empty one comes back.
pub trait Catalog {
    /// One page of the user's playlists. Entries the catalog reports as
    /// null stay in the page as `None` so the page length still advances
    /// the offset.
    fn user_playlists(
        &self,
        user_id: &str,
        offset: u32,
    ) -> impl Future<Output = Result<Page<Option<Playlist>>>> + Send;

    fn playlist_tracks(
        &self,
        playlist_id: &str,
        offset: u32,
    ) -> impl Future<Output = Result<Page<TrackItem>>> + Send;

    /// Liked tracks of the user the client is authorized for.
    fn liked_tracks(
        &self,
        offset: u32,
        limit: u32,
    ) -> impl Future<Output = Result<Page<TrackItem>>> + Send;

    fn track(&self, track_id: &str) -> impl Future<Output = Result<Track>> + Send;

    fn playlist(&self, playlist_id: &str) -> impl Future<Output = Result<Playlist>> + Send;

    fn recommendations(
        &self,
        seed_track_ids: &[String],
        limit: u32,
    ) -> impl Future<Output = Result<Vec<Track>>> + Send;

    /// Creates a playlist and returns its id.
    fn create_playlist(
        &self,
        user_id: &str,
        name: &str,
        description: &str,
    ) -> impl Future<Output = Result<String>> + Send;

    /// Appends tracks in the given order. Implementations split the list to
    /// respect the per-call ceiling.
    fn add_tracks(
        &self,
        playlist_id: &str,
        track_ids: &[String],
    ) -> impl Future<Output = Result<()>> + Send;
}
