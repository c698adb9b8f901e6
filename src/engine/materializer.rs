use crate::{error::Result, spotify::Catalog, types::GeneratedPlaylist};

pub const PLAYLIST_PREFIX: &str = "[TuneCraft]";

pub fn playlist_name(seed_playlist_name: &str) -> String {
    format!("{} {}", PLAYLIST_PREFIX, seed_playlist_name)
}

/// Description recording the parameters a playlist was generated with.
pub fn playlist_description(
    seed_playlist_name: &str,
    seed_count: usize,
    new_artists: bool,
    target: usize,
) -> String {
    format!(
        "Generated by TuneCraft from '{}' using {} seed tracks, new artists only: {}, {} tracks.",
        seed_playlist_name,
        seed_count,
        if new_artists { "yes" } else { "no" },
        target
    )
}

/// Creates `playlist` for `user_id` and appends its tracks in order.
/// Returns the id of the new remote playlist.
pub async fn materialize<C: Catalog>(
    catalog: &C,
    user_id: &str,
    playlist: &GeneratedPlaylist,
) -> Result<String> {
    let playlist_id = catalog
        .create_playlist(user_id, &playlist.name, &playlist.description)
        .await?;

    if !playlist.track_ids.is_empty() {
        catalog.add_tracks(&playlist_id, &playlist.track_ids).await?;
    }

    Ok(playlist_id)
}
