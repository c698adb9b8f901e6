use std::path::Path;

use rusqlite::{Connection, OptionalExtension, params};

use crate::{
    error::Result,
    management::MirrorStore,
    types::{Playlist, PlaylistDiff},
};

const SCHEMA: &str = "
    CREATE TABLE IF NOT EXISTS playlists (
        id       TEXT PRIMARY KEY,
        name     TEXT NOT NULL,
        user_id  TEXT NOT NULL,
        owner_id TEXT NOT NULL
    );
    CREATE INDEX IF NOT EXISTS playlists_user ON playlists (user_id);
    CREATE TABLE IF NOT EXISTS playlist_tracks (
        playlist_id TEXT NOT NULL,
        track_id    TEXT NOT NULL,
        PRIMARY KEY (playlist_id, track_id)
    );
    CREATE TABLE IF NOT EXISTS liked_tracks (
        user_id  TEXT NOT NULL,
        track_id TEXT NOT NULL,
        PRIMARY KEY (user_id, track_id)
    );
";

/// SQLite backed [`MirrorStore`].
///
/// Membership rows are returned in insertion order, which keeps seed
/// tracks close to the remote playlist order.
pub struct SqliteMirror {
    conn: Connection,
}

impl SqliteMirror {
    /// Opens (and creates, if needed) the mirror database at `path`.
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        Self::init(Connection::open(path)?)
    }

    pub fn open_in_memory() -> Result<Self> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> Result<Self> {
        conn.execute_batch(SCHEMA)?;
        Ok(Self { conn })
    }

    fn query_ids(&self, sql: &str, key: &str) -> Result<Vec<String>> {
        let mut stmt = self.conn.prepare(sql)?;
        let rows = stmt.query_map([key], |row| row.get::<_, String>(0))?;

        let mut ids = Vec::new();
        for id in rows {
            ids.push(id?);
        }
        Ok(ids)
    }
}

impl MirrorStore for SqliteMirror {
    fn playlists(&self, user_id: &str) -> Result<Vec<Playlist>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, name, owner_id FROM playlists WHERE user_id = ?1 ORDER BY name COLLATE NOCASE, id",
        )?;
        let rows = stmt.query_map([user_id], |row| {
            Ok(Playlist {
                id: row.get(0)?,
                name: row.get(1)?,
                owner_id: row.get(2)?,
            })
        })?;

        let mut playlists = Vec::new();
        for playlist in rows {
            playlists.push(playlist?);
        }
        Ok(playlists)
    }

    fn playlist(&self, user_id: &str, playlist_id: &str) -> Result<Option<Playlist>> {
        let playlist = self
            .conn
            .query_row(
                "SELECT id, name, owner_id FROM playlists WHERE user_id = ?1 AND id = ?2",
                params![user_id, playlist_id],
                |row| {
                    Ok(Playlist {
                        id: row.get(0)?,
                        name: row.get(1)?,
                        owner_id: row.get(2)?,
                    })
                },
            )
            .optional()?;
        Ok(playlist)
    }

    fn playlist_tracks(&self, playlist_id: &str) -> Result<Vec<String>> {
        self.query_ids(
            "SELECT track_id FROM playlist_tracks WHERE playlist_id = ?1 ORDER BY rowid",
            playlist_id,
        )
    }

    fn liked_tracks(&self, user_id: &str) -> Result<Vec<String>> {
        self.query_ids(
            "SELECT track_id FROM liked_tracks WHERE user_id = ?1 ORDER BY rowid",
            user_id,
        )
    }

    fn upsert_playlist(&mut self, user_id: &str, playlist: &Playlist) -> Result<()> {
        self.conn.execute(
            "INSERT INTO playlists (id, name, user_id, owner_id) VALUES (?1, ?2, ?3, ?4)
             ON CONFLICT(id) DO UPDATE SET name = excluded.name, user_id = excluded.user_id, owner_id = excluded.owner_id",
            params![playlist.id, playlist.name, user_id, playlist.owner_id],
        )?;
        Ok(())
    }

    fn delete_playlist(&mut self, playlist_id: &str) -> Result<()> {
        let tx = self.conn.transaction()?;
        tx.execute(
            "DELETE FROM playlist_tracks WHERE playlist_id = ?1",
            [playlist_id],
        )?;
        tx.execute("DELETE FROM playlists WHERE id = ?1", [playlist_id])?;
        tx.commit()?;
        Ok(())
    }

    fn apply_playlist_diff(&mut self, user_id: &str, diff: &PlaylistDiff) -> Result<()> {
        let tx = self.conn.transaction()?;

        tx.execute(
            "INSERT INTO playlists (id, name, user_id, owner_id) VALUES (?1, ?2, ?3, ?4)
             ON CONFLICT(id) DO UPDATE SET name = excluded.name, user_id = excluded.user_id, owner_id = excluded.owner_id",
            params![diff.playlist.id, diff.playlist.name, user_id, diff.playlist.owner_id],
        )?;

        {
            let mut delete = tx.prepare(
                "DELETE FROM playlist_tracks WHERE playlist_id = ?1 AND track_id = ?2",
            )?;
            for track_id in &diff.removed {
                delete.execute(params![diff.playlist.id, track_id])?;
            }

            let mut insert = tx.prepare(
                "INSERT OR IGNORE INTO playlist_tracks (playlist_id, track_id) VALUES (?1, ?2)",
            )?;
            for track_id in &diff.added {
                insert.execute(params![diff.playlist.id, track_id])?;
            }
        }

        tx.commit()?;
        Ok(())
    }

    fn replace_liked(&mut self, user_id: &str, track_ids: &[String]) -> Result<()> {
        let tx = self.conn.transaction()?;
        tx.execute("DELETE FROM liked_tracks WHERE user_id = ?1", [user_id])?;

        {
            let mut insert = tx.prepare(
                "INSERT OR IGNORE INTO liked_tracks (user_id, track_id) VALUES (?1, ?2)",
            )?;
            for track_id in track_ids {
                insert.execute(params![user_id, track_id])?;
            }
        }

        tx.commit()?;
        Ok(())
    }

    fn apply_liked_diff(&mut self, user_id: &str, removed: &[String], added: &[String]) -> Result<()> {
        let tx = self.conn.transaction()?;

        {
            let mut delete =
                tx.prepare("DELETE FROM liked_tracks WHERE user_id = ?1 AND track_id = ?2")?;
            for track_id in removed {
                delete.execute(params![user_id, track_id])?;
            }

            let mut insert = tx.prepare(
                "INSERT OR IGNORE INTO liked_tracks (user_id, track_id) VALUES (?1, ?2)",
            )?;
            for track_id in added {
                insert.execute(params![user_id, track_id])?;
            }
        }

        tx.commit()?;
        Ok(())
    }
}
