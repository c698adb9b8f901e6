use crate::{
    config, engine, error,
    management::MirrorStore,
    spotify::Catalog,
    success, utils,
};

pub async fn refresh() {
    let user_id = super::user_id();
    let mut store = super::open_mirror();
    let client = super::connect().await;

    refresh_mirror(&client, &mut store, &user_id).await;
}

/// Reconciles the mirror with a spinner and prints the summary.
pub(crate) async fn refresh_mirror<C: Catalog, S: MirrorStore>(catalog: &C, store: &mut S, user_id: &str) {
    let policy = match config::liked_policy() {
        Ok(policy) => policy,
        Err(e) => error!("{}", e),
    };

    let pb = utils::spinner("Refreshing playlists from Spotify...");
    let result = engine::reconcile(catalog, store, user_id, policy).await;
    pb.finish_and_clear();

    match result {
        Ok(report) if report.has_changes() => success!(
            "Mirrored {} playlists: {} updated, {} removed, +{}/-{} tracks, {} liked tracks.",
            report.playlists_seen,
            report.playlists_updated,
            report.playlists_removed,
            report.tracks_added,
            report.tracks_removed,
            report.liked_tracks
        ),
        Ok(report) => success!(
            "Mirror is up to date ({} playlists, {} liked tracks).",
            report.playlists_seen,
            report.liked_tracks
        ),
        Err(e) => error!("Failed to refresh playlists: {}", e),
    }
}
