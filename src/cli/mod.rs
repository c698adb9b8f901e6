//! # CLI Module
//!
//! User-facing commands. Each function owns its console output (spinners,
//! tables, coloured status lines) and terminates the process with the
//! `error!` macro when the underlying operation fails; the engine itself
//! never prints progress.
//!
//! - [`auth`] - OAuth 2.0 PKCE login, token stored in the local data dir
//! - [`refresh`] - reconcile the local mirror with Spotify
//! - [`playlists`] - list mirrored playlists
//! - [`generate`] - craft a new playlist from a seed playlist
//!
//! ## Typical session
//!
//! ```bash
//! tunecraft auth
//! tunecraft refresh
//! tunecraft playlists
//! tunecraft generate --seed-playlist 37i9dQZF1DXcBWIGoYBM5M -n 30 --new-artists
//! ```

mod auth;
mod generate;
mod playlists;
mod refresh;

pub use auth::auth;
pub use generate::{GenerateArgs, generate};
pub use playlists::playlists;
pub use refresh::refresh;

use crate::{config, error, management::SqliteMirror, spotify::SpotifyClient};

fn user_id() -> String {
    match config::spotify_user() {
        Ok(user) => user,
        Err(e) => error!("{}", e),
    }
}

fn open_mirror() -> SqliteMirror {
    let path = config::db_path();
    match SqliteMirror::open(&path) {
        Ok(store) => store,
        Err(e) => error!("Cannot open mirror at {}. Err: {}", path.display(), e),
    }
}

async fn connect() -> SpotifyClient {
    match SpotifyClient::from_cache().await {
        Ok(client) => client,
        Err(e) => error!("{}", e),
    }
}
