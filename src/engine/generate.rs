use std::collections::HashSet;

use crate::{
    engine::{
        expander::{ExpandOptions, ExpandRequest, expand},
        materializer::{materialize, playlist_description, playlist_name},
    },
    error::{Result, TuneCraftError},
    management::MirrorStore,
    spotify::Catalog,
    types::{GeneratedPlaylist, Playlist, Track},
};

/// A mirrored playlist chosen as the source of seed tracks.
#[derive(Debug, Clone)]
pub struct SeedPlaylist {
    pub playlist: Playlist,
    pub track_ids: Vec<String>,
    pub liked: HashSet<String>,
}

impl SeedPlaylist {
    pub fn is_liked(&self, track_id: &str) -> bool {
        self.liked.contains(track_id)
    }
}

#[derive(Debug, Clone)]
pub struct GenerateRequest<'a> {
    pub user_id: &'a str,
    pub seed: &'a SeedPlaylist,
    /// Indices into `seed.track_ids`, as returned by the seed selector.
    pub seed_indices: &'a [usize],
    pub new_artists: bool,
    pub target: usize,
}

#[derive(Debug, Clone)]
pub struct GenerateOutcome {
    pub playlist_id: String,
    pub playlist: GeneratedPlaylist,
    pub tracks: Vec<Track>,
}

/// Loads the seed playlist from the mirror.
///
/// Fails with [`TuneCraftError::InvalidSeed`] when the playlist is not
/// mirrored for `user_id` and with [`TuneCraftError::EmptySeed`] when it
/// has no tracks. Nothing remote is touched.
pub fn prepare_seed<S: MirrorStore>(store: &S, user_id: &str, playlist_id: &str) -> Result<SeedPlaylist> {
    let playlist = store
        .playlist(user_id, playlist_id)?
        .ok_or_else(|| TuneCraftError::InvalidSeed(playlist_id.to_string()))?;

    let track_ids = store.playlist_tracks(playlist_id)?;
    if track_ids.is_empty() {
        return Err(TuneCraftError::EmptySeed(playlist_id.to_string()));
    }

    let liked = store.liked_tracks(user_id)?.into_iter().collect();

    Ok(SeedPlaylist {
        playlist,
        track_ids,
        liked,
    })
}

/// Every track the user already has: members of any mirrored playlist plus
/// liked tracks.
pub fn exclusion_set<S: MirrorStore>(store: &S, user_id: &str) -> Result<HashSet<String>> {
    let mut exclude: HashSet<String> = HashSet::new();
    for playlist in store.playlists(user_id)? {
        exclude.extend(store.playlist_tracks(&playlist.id)?);
    }
    exclude.extend(store.liked_tracks(user_id)?);
    Ok(exclude)
}

/// Expands the selected seeds into new tracks and writes them to a new
/// remote playlist named after the seed playlist.
pub async fn run<C: Catalog, S: MirrorStore>(
    catalog: &C,
    store: &S,
    request: &GenerateRequest<'_>,
    options: &ExpandOptions,
) -> Result<GenerateOutcome> {
    let seed_track_ids: Vec<String> = request
        .seed_indices
        .iter()
        .filter_map(|&i| request.seed.track_ids.get(i).cloned())
        .collect();

    let exclude = exclusion_set(store, request.user_id)?;

    let tracks = expand(
        catalog,
        &ExpandRequest {
            seed_track_ids: &seed_track_ids,
            exclude: &exclude,
            new_artists: request.new_artists,
            target: request.target,
        },
        options,
    )
    .await?;

    let seed_name = catalog.playlist(&request.seed.playlist.id).await?.name;
    let playlist = GeneratedPlaylist {
        name: playlist_name(&seed_name),
        description: playlist_description(
            &seed_name,
            seed_track_ids.len(),
            request.new_artists,
            request.target,
        ),
        track_ids: tracks.iter().map(|t| t.id.clone()).collect(),
    };

    let playlist_id = materialize(catalog, request.user_id, &playlist).await?;

    Ok(GenerateOutcome {
        playlist_id,
        playlist,
        tracks,
    })
}
