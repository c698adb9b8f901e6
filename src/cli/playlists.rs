use tabled::Table;

use crate::{
    error, info,
    management::{MirrorStore, SqliteMirror},
    types::PlaylistTableRow,
    warning,
};

pub async fn playlists(refresh: bool) {
    let user_id = super::user_id();
    let mut store = super::open_mirror();

    if refresh {
        let client = super::connect().await;
        super::refresh::refresh_mirror(&client, &mut store, &user_id).await;
    }

    let rows = match playlist_rows(&store, &user_id) {
        Ok(rows) => rows,
        Err(e) => error!("Failed to load playlists. Err: {}", e),
    };

    if rows.is_empty() {
        warning!("No playlists mirrored yet. Run tunecraft refresh.");
        return;
    }

    info!("Your playlists:");
    println!("{}", Table::new(rows));
}

fn playlist_rows(store: &SqliteMirror, user_id: &str) -> crate::Result<Vec<PlaylistTableRow>> {
    let mut rows = Vec::new();
    for playlist in store.playlists(user_id)? {
        let tracks = store.playlist_tracks(&playlist.id)?.len();
        rows.push(PlaylistTableRow {
            id: playlist.id,
            name: playlist.name,
            tracks,
        });
    }
    Ok(rows)
}
