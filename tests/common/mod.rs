#![allow(dead_code)]

use std::{collections::HashMap, sync::Mutex};

use tunecraft::{
    Result, TuneCraftError,
    management::MirrorStore,
    spotify::Catalog,
    types::{ArtistRef, Page, Playlist, PlaylistDiff, Track, TrackItem},
};

pub type RecommendFn = Box<dyn Fn(&[String], u32, usize) -> Vec<Track> + Send + Sync>;

pub fn track(id: &str, artist_id: &str) -> Track {
    Track {
        id: id.to_string(),
        name: format!("Song {}", id),
        artists: vec![ArtistRef {
            id: artist_id.to_string(),
            name: format!("Artist {}", artist_id),
        }],
    }
}

pub fn playlist(id: &str, name: &str) -> Playlist {
    Playlist {
        id: id.to_string(),
        name: name.to_string(),
        owner_id: "alice".to_string(),
    }
}

pub fn ids(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}

#[derive(Debug, Default, Clone)]
pub struct Calls {
    pub recommendation_queries: Vec<(Vec<String>, u32)>,
    pub track_lookups: Vec<String>,
    pub created: Vec<(String, String, String)>,
    pub added: Vec<(String, Vec<String>)>,
    pub playlist_track_pages: usize,
}

/// In-memory catalog with offset pagination and scripted recommendations.
pub struct StubCatalog {
    pub page_size: usize,
    pub playlists: Mutex<Vec<Playlist>>,
    /// Null entries listed ahead of the real playlists.
    pub null_playlists: Mutex<usize>,
    /// `None` entries behave like local files or unavailable tracks.
    pub playlist_tracks: Mutex<HashMap<String, Vec<Option<String>>>>,
    pub liked: Mutex<Vec<String>>,
    pub tracks: Mutex<HashMap<String, Track>>,
    pub recommend: RecommendFn,
    pub fail_playlists: Mutex<bool>,
    pub fail_tracks_of: Mutex<Option<String>>,
    pub calls: Mutex<Calls>,
}

impl StubCatalog {
    pub fn new() -> Self {
        Self {
            page_size: 2,
            playlists: Mutex::new(Vec::new()),
            null_playlists: Mutex::new(0),
            playlist_tracks: Mutex::new(HashMap::new()),
            liked: Mutex::new(Vec::new()),
            tracks: Mutex::new(HashMap::new()),
            recommend: Box::new(|_: &[String], _: u32, _: usize| Vec::new()),
            fail_playlists: Mutex::new(false),
            fail_tracks_of: Mutex::new(None),
            calls: Mutex::new(Calls::default()),
        }
    }

    pub fn with_recommendations(
        mut self,
        recommend: impl Fn(&[String], u32, usize) -> Vec<Track> + Send + Sync + 'static,
    ) -> Self {
        self.recommend = Box::new(recommend);
        self
    }

    pub fn set_playlist(&self, playlist: Playlist, track_ids: &[&str]) {
        let mut playlists = self.playlists.lock().unwrap();
        playlists.retain(|p| p.id != playlist.id);
        self.playlist_tracks.lock().unwrap().insert(
            playlist.id.clone(),
            track_ids.iter().map(|t| Some(t.to_string())).collect(),
        );
        playlists.push(playlist);
    }

    pub fn set_playlist_items(&self, playlist: Playlist, items: Vec<Option<String>>) {
        let mut playlists = self.playlists.lock().unwrap();
        playlists.retain(|p| p.id != playlist.id);
        self.playlist_tracks
            .lock()
            .unwrap()
            .insert(playlist.id.clone(), items);
        playlists.push(playlist);
    }

    pub fn remove_playlist(&self, playlist_id: &str) {
        self.playlists.lock().unwrap().retain(|p| p.id != playlist_id);
        self.playlist_tracks.lock().unwrap().remove(playlist_id);
    }

    pub fn set_liked(&self, track_ids: &[&str]) {
        *self.liked.lock().unwrap() = ids(track_ids);
    }

    pub fn add_track(&self, track: Track) {
        self.tracks.lock().unwrap().insert(track.id.clone(), track);
    }

    pub fn calls(&self) -> Calls {
        self.calls.lock().unwrap().clone()
    }

    fn page<T: Clone>(&self, items: &[T], offset: u32) -> Page<T> {
        let start = (offset as usize).min(items.len());
        let end = (start + self.page_size).min(items.len());
        Page::new(items[start..end].to_vec())
    }
}

impl Catalog for StubCatalog {
    async fn user_playlists(&self, _user_id: &str, offset: u32) -> Result<Page<Option<Playlist>>> {
        if *self.fail_playlists.lock().unwrap() {
            return Err(TuneCraftError::Remote("playlists unavailable".to_string()));
        }
        let nulls = *self.null_playlists.lock().unwrap();
        let listing: Vec<Option<Playlist>> = std::iter::repeat_n(None, nulls)
            .chain(self.playlists.lock().unwrap().iter().cloned().map(Some))
            .collect();
        Ok(self.page(&listing, offset))
    }

    async fn playlist_tracks(&self, playlist_id: &str, offset: u32) -> Result<Page<TrackItem>> {
        if self.fail_tracks_of.lock().unwrap().as_deref() == Some(playlist_id) {
            return Err(TuneCraftError::Remote(format!("{} unavailable", playlist_id)));
        }
        self.calls.lock().unwrap().playlist_track_pages += 1;

        let items: Vec<TrackItem> = self
            .playlist_tracks
            .lock()
            .unwrap()
            .get(playlist_id)
            .cloned()
            .unwrap_or_default()
            .into_iter()
            .map(|id| match id {
                Some(id) => TrackItem::with_id(&id),
                None => TrackItem::default(),
            })
            .collect();
        Ok(self.page(&items, offset))
    }

    async fn liked_tracks(&self, offset: u32, _limit: u32) -> Result<Page<TrackItem>> {
        let items: Vec<TrackItem> = self
            .liked
            .lock()
            .unwrap()
            .iter()
            .map(|id| TrackItem::with_id(id))
            .collect();
        Ok(self.page(&items, offset))
    }

    async fn track(&self, track_id: &str) -> Result<Track> {
        self.calls
            .lock()
            .unwrap()
            .track_lookups
            .push(track_id.to_string());
        self.tracks
            .lock()
            .unwrap()
            .get(track_id)
            .cloned()
            .ok_or_else(|| TuneCraftError::Remote(format!("unknown track {}", track_id)))
    }

    async fn playlist(&self, playlist_id: &str) -> Result<Playlist> {
        self.playlists
            .lock()
            .unwrap()
            .iter()
            .find(|p| p.id == playlist_id)
            .cloned()
            .ok_or_else(|| TuneCraftError::Remote(format!("unknown playlist {}", playlist_id)))
    }

    async fn recommendations(&self, seed_track_ids: &[String], limit: u32) -> Result<Vec<Track>> {
        let call = {
            let mut calls = self.calls.lock().unwrap();
            calls
                .recommendation_queries
                .push((seed_track_ids.to_vec(), limit));
            calls.recommendation_queries.len() - 1
        };
        Ok((self.recommend)(seed_track_ids, limit, call))
    }

    async fn create_playlist(&self, user_id: &str, name: &str, description: &str) -> Result<String> {
        let mut calls = self.calls.lock().unwrap();
        calls.created.push((
            user_id.to_string(),
            name.to_string(),
            description.to_string(),
        ));
        Ok(format!("generated-{}", calls.created.len()))
    }

    async fn add_tracks(&self, playlist_id: &str, track_ids: &[String]) -> Result<()> {
        self.calls
            .lock()
            .unwrap()
            .added
            .push((playlist_id.to_string(), track_ids.to_vec()));
        Ok(())
    }
}

/// Store wrapper counting every write that reaches the inner store.
pub struct CountingStore<S> {
    pub inner: S,
    pub writes: usize,
}

impl<S> CountingStore<S> {
    pub fn new(inner: S) -> Self {
        Self { inner, writes: 0 }
    }
}

impl<S: MirrorStore> MirrorStore for CountingStore<S> {
    fn playlists(&self, user_id: &str) -> Result<Vec<Playlist>> {
        self.inner.playlists(user_id)
    }

    fn playlist(&self, user_id: &str, playlist_id: &str) -> Result<Option<Playlist>> {
        self.inner.playlist(user_id, playlist_id)
    }

    fn playlist_tracks(&self, playlist_id: &str) -> Result<Vec<String>> {
        self.inner.playlist_tracks(playlist_id)
    }

    fn liked_tracks(&self, user_id: &str) -> Result<Vec<String>> {
        self.inner.liked_tracks(user_id)
    }

    fn upsert_playlist(&mut self, user_id: &str, playlist: &Playlist) -> Result<()> {
        self.writes += 1;
        self.inner.upsert_playlist(user_id, playlist)
    }

    fn delete_playlist(&mut self, playlist_id: &str) -> Result<()> {
        self.writes += 1;
        self.inner.delete_playlist(playlist_id)
    }

    fn apply_playlist_diff(&mut self, user_id: &str, diff: &PlaylistDiff) -> Result<()> {
        self.writes += 1;
        self.inner.apply_playlist_diff(user_id, diff)
    }

    fn replace_liked(&mut self, user_id: &str, track_ids: &[String]) -> Result<()> {
        self.writes += 1;
        self.inner.replace_liked(user_id, track_ids)
    }

    fn apply_liked_diff(&mut self, user_id: &str, removed: &[String], added: &[String]) -> Result<()> {
        self.writes += 1;
        self.inner.apply_liked_diff(user_id, removed, added)
    }
}
