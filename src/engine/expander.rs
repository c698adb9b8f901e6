use std::collections::HashSet;

use crate::{
    error::{Result, TuneCraftError},
    spotify::{Catalog, MAX_RECOMMENDATIONS},
    types::Track,
    warning,
};

/// Seeds per recommendation query.
pub const SEED_CHUNK_SIZE: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpandOptions {
    /// Consecutive queries without a single accepted track after which a
    /// chunk is abandoned. Zero behaves like one.
    pub max_stalled_attempts: u32,
    /// Treat already accepted tracks as excluded.
    pub dedupe_accepted: bool,
}

impl Default for ExpandOptions {
    fn default() -> Self {
        Self {
            max_stalled_attempts: 10,
            dedupe_accepted: true,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ExpandRequest<'a> {
    pub seed_track_ids: &'a [String],
    /// Tracks that must never be returned, fixed for the whole run.
    pub exclude: &'a HashSet<String>,
    /// Reject candidates whose primary artist also leads a seed track of
    /// the chunk being queried.
    pub new_artists: bool,
    pub target: usize,
}

/// Recommendation `limit` for a given target: twice the target, capped by
/// the catalog ceiling.
pub fn request_limit(target: usize) -> u32 {
    target.saturating_mul(2).min(MAX_RECOMMENDATIONS as usize) as u32
}

fn is_eligible(candidate: &Track, exclude: &HashSet<String>, seed_artists: &HashSet<String>) -> bool {
    if exclude.contains(&candidate.id) {
        return false;
    }

    match candidate.primary_artist_id() {
        Some(artist_id) => !seed_artists.contains(artist_id),
        None => true,
    }
}

async fn chunk_artists<C: Catalog>(catalog: &C, chunk: &[String]) -> Result<HashSet<String>> {
    let mut artists = HashSet::new();
    for track_id in chunk {
        let track = catalog.track(track_id).await?;
        if let Some(artist_id) = track.primary_artist_id() {
            artists.insert(artist_id.to_string());
        }
    }
    Ok(artists)
}

/// Collects `target` new tracks from recommendations seeded by chunks of
/// [`SEED_CHUNK_SIZE`] seed tracks.
///
/// Chunks are processed in order and a chunk keeps being queried until the
/// target is met or it stalls for `max_stalled_attempts` queries in a row,
/// in which case the next chunk takes over. Chunks after the target is met
/// issue no requests.
///
/// Returns [`TuneCraftError::RecommendationExhausted`] when every chunk
/// stalled before the target was reached.
pub async fn expand<C: Catalog>(
    catalog: &C,
    request: &ExpandRequest<'_>,
    options: &ExpandOptions,
) -> Result<Vec<Track>> {
    let target = request.target;
    let mut accepted: Vec<Track> = Vec::new();
    let mut accepted_ids: HashSet<String> = HashSet::new();

    if target == 0 {
        return Ok(accepted);
    }

    let limit = request_limit(target);
    let max_stalled = options.max_stalled_attempts.max(1);

    for chunk in request.seed_track_ids.chunks(SEED_CHUNK_SIZE) {
        if accepted.len() >= target {
            break;
        }

        let seed_artists = if request.new_artists {
            chunk_artists(catalog, chunk).await?
        } else {
            HashSet::new()
        };

        let mut stalled = 0;
        while accepted.len() < target {
            if stalled >= max_stalled {
                warning!(
                    "No new recommendations after {} attempts, moving to the next seeds",
                    stalled
                );
                break;
            }

            let candidates = catalog.recommendations(chunk, limit).await?;
            let before = accepted.len();

            for candidate in candidates {
                if accepted.len() >= target {
                    break;
                }
                if !is_eligible(&candidate, request.exclude, &seed_artists) {
                    continue;
                }
                if options.dedupe_accepted && !accepted_ids.insert(candidate.id.clone()) {
                    continue;
                }
                accepted.push(candidate);
            }

            if accepted.len() == before {
                stalled += 1;
            } else {
                stalled = 0;
            }
        }
    }

    if accepted.len() < target {
        return Err(TuneCraftError::RecommendationExhausted {
            accepted: accepted.len(),
            target,
        });
    }

    Ok(accepted)
}
