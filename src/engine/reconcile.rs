use std::{
    collections::{HashMap, HashSet},
    future::Future,
    str::FromStr,
};

use crate::{
    error::{Result, TuneCraftError},
    management::MirrorStore,
    spotify::{Catalog, PAGE_LIMIT},
    types::{Page, Playlist, PlaylistDiff, TrackItem},
};

/// How liked tracks are written to the mirror on refresh.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LikedPolicy {
    /// Delete the user's liked rows and insert the live set.
    #[default]
    Replace,
    /// Delete only unliked tracks and insert only newly liked ones.
    Diff,
}

impl FromStr for LikedPolicy {
    type Err = TuneCraftError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "replace" => Ok(LikedPolicy::Replace),
            "diff" => Ok(LikedPolicy::Diff),
            other => Err(TuneCraftError::Config(format!(
                "Unknown liked-track policy '{}', expected 'replace' or 'diff'",
                other
            ))),
        }
    }
}

/// What a reconciliation changed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconcileReport {
    pub playlists_seen: usize,
    pub playlists_removed: usize,
    pub playlists_updated: usize,
    pub tracks_added: usize,
    pub tracks_removed: usize,
    pub liked_tracks: usize,
}

impl ReconcileReport {
    pub fn has_changes(&self) -> bool {
        self.playlists_removed > 0
            || self.playlists_updated > 0
            || self.tracks_added > 0
            || self.tracks_removed > 0
    }
}

/// Requests pages starting at offset 0 until the catalog returns an empty
/// page, advancing the offset by the size of each page.
pub async fn fetch_all<T, F, Fut>(mut fetch: F) -> Result<Vec<T>>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<Page<T>>>,
{
    let mut items = Vec::new();
    let mut offset: u32 = 0;

    loop {
        let page = fetch(offset).await?;
        if page.items.is_empty() {
            break;
        }

        offset += page.items.len() as u32;
        items.extend(page.items);
    }

    Ok(items)
}

/// Track ids of `items` in order, skipping local/unavailable entries and
/// repeated tracks.
pub fn unique_track_ids(items: &[TrackItem]) -> Vec<String> {
    let mut seen = HashSet::new();
    items
        .iter()
        .filter_map(|item| item.track_id())
        .filter(|id| seen.insert(*id))
        .map(str::to_string)
        .collect()
}

/// Returns `(removed, added)`: ids only in `mirrored`, ids only in `live`.
pub fn diff_ids(mirrored: &[String], live: &[String]) -> (Vec<String>, Vec<String>) {
    let mirrored_set: HashSet<&str> = mirrored.iter().map(String::as_str).collect();
    let live_set: HashSet<&str> = live.iter().map(String::as_str).collect();

    let removed = mirrored
        .iter()
        .filter(|id| !live_set.contains(id.as_str()))
        .cloned()
        .collect();
    let added = live
        .iter()
        .filter(|id| !mirrored_set.contains(id.as_str()))
        .cloned()
        .collect();

    (removed, added)
}

/// Converges the mirror of `user_id` to the live state of the catalog.
///
/// The live playlist list is fetched in full before anything is written.
/// Mirrored playlists that disappeared upstream are deleted, then every
/// live playlist is fetched and its diff (metadata plus membership) is
/// committed as one unit. Liked tracks are written last according to
/// `liked_policy`.
///
/// Null entries in the playlist listing are skipped. Liked tracks are only
/// written when the live set differs from the mirrored one, under either
/// policy.
///
/// A catalog or store failure aborts the run; playlists committed before
/// the failure stay converged. Running it twice without upstream changes
/// writes nothing the second time.
pub async fn reconcile<C: Catalog, S: MirrorStore>(
    catalog: &C,
    store: &mut S,
    user_id: &str,
    liked_policy: LikedPolicy,
) -> Result<ReconcileReport> {
    let mut report = ReconcileReport::default();

    let mut seen = HashSet::new();
    let live: Vec<Playlist> = fetch_all(move |offset| catalog.user_playlists(user_id, offset))
        .await?
        .into_iter()
        .flatten()
        .filter(|p| seen.insert(p.id.clone()))
        .collect();
    report.playlists_seen = live.len();

    let live_ids: HashSet<&str> = live.iter().map(|p| p.id.as_str()).collect();
    let mirrored: HashMap<String, Playlist> = store
        .playlists(user_id)?
        .into_iter()
        .map(|p| (p.id.clone(), p))
        .collect();

    for id in mirrored.keys() {
        if !live_ids.contains(id.as_str()) {
            store.delete_playlist(id)?;
            report.playlists_removed += 1;
        }
    }

    for playlist in &live {
        let playlist_id = playlist.id.as_str();
        let items = fetch_all(move |offset| catalog.playlist_tracks(playlist_id, offset)).await?;
        let live_tracks = unique_track_ids(&items);

        let mirrored_tracks = store.playlist_tracks(playlist_id)?;
        let (removed, added) = diff_ids(&mirrored_tracks, &live_tracks);
        let diff = PlaylistDiff {
            playlist: playlist.clone(),
            removed,
            added,
        };

        let metadata_unchanged = mirrored.get(playlist_id) == Some(playlist);
        if diff.is_empty() && metadata_unchanged {
            continue;
        }

        store.apply_playlist_diff(user_id, &diff)?;
        report.playlists_updated += 1;
        report.tracks_added += diff.added.len();
        report.tracks_removed += diff.removed.len();
    }

    let liked_items = fetch_all(move |offset| catalog.liked_tracks(offset, PAGE_LIMIT)).await?;
    let liked = unique_track_ids(&liked_items);
    report.liked_tracks = liked.len();

    let (removed, added) = diff_ids(&store.liked_tracks(user_id)?, &liked);
    if removed.is_empty() && added.is_empty() {
        return Ok(report);
    }

    match liked_policy {
        LikedPolicy::Replace => store.replace_liked(user_id, &liked)?,
        LikedPolicy::Diff => store.apply_liked_diff(user_id, &removed, &added)?,
    }

    Ok(report)
}
