//! # Engine
//!
//! The mirror reconciliation and playlist generation logic. Everything in
//! here is written against the [`Catalog`](crate::spotify::Catalog) and
//! [`MirrorStore`](crate::management::MirrorStore) traits, so it runs the
//! same against Spotify and SQLite as against in-memory test doubles.
//!
//! ```text
//! reconcile ──> mirror ──> prepare_seed ──> select_seeds
//!                                               │
//!                 materialize <── expand <── generate::run
//! ```
//!
//! - [`reconcile`] - converge the mirror to the live playlists and likes
//! - [`seeds`] - choose seed tracks (all, typed positions, random sample)
//! - [`expander`] - chunked, deduplicated, bounded recommendation expansion
//! - [`materializer`] - create the generated playlist remotely
//! - [`generate`] - the pipeline tying the above together

pub mod expander;
pub mod generate;
pub mod materializer;
pub mod reconcile;
pub mod seeds;

pub use expander::{ExpandOptions, ExpandRequest, SEED_CHUNK_SIZE, expand};
pub use generate::{GenerateOutcome, GenerateRequest, SeedPlaylist, exclusion_set, prepare_seed};
pub use materializer::{materialize, playlist_description, playlist_name};
pub use reconcile::{LikedPolicy, ReconcileReport, reconcile};
pub use seeds::{SeedMode, Selection, parse_selection, select_seeds};
