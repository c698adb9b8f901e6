mod common;

use std::collections::HashSet;

use common::{StubCatalog, ids, track};
use tunecraft::{
    TuneCraftError,
    engine::{ExpandOptions, ExpandRequest, expand, expander::request_limit},
    types::Track,
};

fn fresh_tracks(call: usize, count: usize) -> Vec<Track> {
    (0..count)
        .map(|i| track(&format!("r{}-{}", call, i), &format!("a{}-{}", call, i)))
        .collect()
}

fn options(max_stalled_attempts: u32) -> ExpandOptions {
    ExpandOptions {
        max_stalled_attempts,
        ..ExpandOptions::default()
    }
}

fn accepted_ids(tracks: &[Track]) -> Vec<String> {
    tracks.iter().map(|t| t.id.clone()).collect()
}

#[test]
fn test_request_limit() {
    assert_eq!(request_limit(1), 2);
    assert_eq!(request_limit(20), 40);
    assert_eq!(request_limit(50), 100);
    assert_eq!(request_limit(80), 100);
}

#[test]
fn test_expand_options_default() {
    let options = ExpandOptions::default();
    assert_eq!(options.max_stalled_attempts, 10);
    assert!(options.dedupe_accepted);
}

#[tokio::test]
async fn test_expand_returns_exactly_target() {
    let catalog =
        StubCatalog::new().with_recommendations(|_, limit, call| fresh_tracks(call, limit as usize));
    let seeds = ids(&["s1", "s2", "s3"]);
    let exclude = HashSet::new();

    let tracks = expand(
        &catalog,
        &ExpandRequest {
            seed_track_ids: &seeds,
            exclude: &exclude,
            new_artists: false,
            target: 4,
        },
        &ExpandOptions::default(),
    )
    .await
    .unwrap();

    assert_eq!(accepted_ids(&tracks), ids(&["r0-0", "r0-1", "r0-2", "r0-3"]));
    let calls = catalog.calls();
    assert_eq!(calls.recommendation_queries, vec![(seeds.clone(), 8)]);
    assert!(calls.track_lookups.is_empty());
}

#[tokio::test]
async fn test_expand_skips_excluded_and_known_artists() {
    let catalog = StubCatalog::new().with_recommendations(|_, _, _| {
        vec![
            track("owned", "c"),
            track("same-artist", "A"),
            track("fresh-1", "C"),
            track("fresh-2", "D"),
        ]
    });
    catalog.add_track(track("s1", "A"));
    catalog.add_track(track("s2", "B"));
    let seeds = ids(&["s1", "s2"]);
    let exclude: HashSet<String> = ids(&["owned", "s1", "s2"]).into_iter().collect();

    let tracks = expand(
        &catalog,
        &ExpandRequest {
            seed_track_ids: &seeds,
            exclude: &exclude,
            new_artists: true,
            target: 2,
        },
        &ExpandOptions::default(),
    )
    .await
    .unwrap();

    assert_eq!(accepted_ids(&tracks), ids(&["fresh-1", "fresh-2"]));
    assert_eq!(catalog.calls().track_lookups, seeds);

    let tracks = expand(
        &catalog,
        &ExpandRequest {
            seed_track_ids: &seeds,
            exclude: &exclude,
            new_artists: false,
            target: 2,
        },
        &ExpandOptions::default(),
    )
    .await
    .unwrap();

    assert_eq!(accepted_ids(&tracks), ids(&["same-artist", "fresh-1"]));
}

#[tokio::test]
async fn test_expand_moves_to_next_chunk_after_stalling() {
    let catalog = StubCatalog::new().with_recommendations(|seeds, _, call| {
        if seeds.len() == 5 {
            Vec::new()
        } else {
            fresh_tracks(call, 3)
        }
    });
    let seeds = ids(&["s1", "s2", "s3", "s4", "s5", "s6"]);
    let exclude = HashSet::new();

    let tracks = expand(
        &catalog,
        &ExpandRequest {
            seed_track_ids: &seeds,
            exclude: &exclude,
            new_artists: false,
            target: 2,
        },
        &options(3),
    )
    .await
    .unwrap();

    assert_eq!(accepted_ids(&tracks), ids(&["r3-0", "r3-1"]));

    let queried: Vec<Vec<String>> = catalog
        .calls()
        .recommendation_queries
        .into_iter()
        .map(|(seeds, _)| seeds)
        .collect();
    let first_chunk = ids(&["s1", "s2", "s3", "s4", "s5"]);
    assert_eq!(
        queried,
        vec![first_chunk.clone(), first_chunk.clone(), first_chunk, ids(&["s6"])]
    );
}

#[tokio::test]
async fn test_expand_stall_counter_resets_on_progress() {
    // every other query yields one new track
    let catalog = StubCatalog::new().with_recommendations(|_, _, call| {
        if call % 2 == 0 {
            Vec::new()
        } else {
            fresh_tracks(call, 1)
        }
    });
    let seeds = ids(&["s1"]);
    let exclude = HashSet::new();

    let tracks = expand(
        &catalog,
        &ExpandRequest {
            seed_track_ids: &seeds,
            exclude: &exclude,
            new_artists: false,
            target: 3,
        },
        &options(2),
    )
    .await
    .unwrap();

    assert_eq!(accepted_ids(&tracks), ids(&["r1-0", "r3-0", "r5-0"]));
    assert_eq!(catalog.calls().recommendation_queries.len(), 6);
}

#[tokio::test]
async fn test_expand_exhausted_after_bounded_queries() {
    let catalog = StubCatalog::new();
    let seeds = ids(&["s1", "s2", "s3", "s4", "s5", "s6", "s7"]);
    let exclude = HashSet::new();

    let result = expand(
        &catalog,
        &ExpandRequest {
            seed_track_ids: &seeds,
            exclude: &exclude,
            new_artists: false,
            target: 5,
        },
        &options(4),
    )
    .await;

    assert!(matches!(
        result,
        Err(TuneCraftError::RecommendationExhausted {
            accepted: 0,
            target: 5
        })
    ));
    // two chunks, four stalled queries each
    assert_eq!(catalog.calls().recommendation_queries.len(), 8);
}

#[tokio::test]
async fn test_expand_dedupes_accepted_tracks() {
    let catalog = StubCatalog::new()
        .with_recommendations(|_, _, _| vec![track("a", "x"), track("b", "y")]);
    let seeds = ids(&["s1"]);
    let exclude = HashSet::new();
    let request = ExpandRequest {
        seed_track_ids: &seeds,
        exclude: &exclude,
        new_artists: false,
        target: 4,
    };

    let result = expand(&catalog, &request, &options(3)).await;
    assert!(matches!(
        result,
        Err(TuneCraftError::RecommendationExhausted {
            accepted: 2,
            target: 4
        })
    ));
    // one productive query followed by three stalled ones
    assert_eq!(catalog.calls().recommendation_queries.len(), 4);

    let tracks = expand(
        &catalog,
        &request,
        &ExpandOptions {
            max_stalled_attempts: 3,
            dedupe_accepted: false,
        },
    )
    .await
    .unwrap();
    assert_eq!(accepted_ids(&tracks), ids(&["a", "b", "a", "b"]));
}

#[tokio::test]
async fn test_expand_zero_target_makes_no_requests() {
    let catalog =
        StubCatalog::new().with_recommendations(|_, limit, call| fresh_tracks(call, limit as usize));
    let seeds = ids(&["s1", "s2"]);
    let exclude = HashSet::new();

    let tracks = expand(
        &catalog,
        &ExpandRequest {
            seed_track_ids: &seeds,
            exclude: &exclude,
            new_artists: true,
            target: 0,
        },
        &ExpandOptions::default(),
    )
    .await
    .unwrap();

    assert!(tracks.is_empty());
    let calls = catalog.calls();
    assert!(calls.recommendation_queries.is_empty());
    assert!(calls.track_lookups.is_empty());
}

#[tokio::test]
async fn test_expand_leaves_later_chunks_untouched_once_target_met() {
    let catalog = StubCatalog::new()
        .with_recommendations(|_, limit, call| fresh_tracks(call, limit as usize));
    let seeds: Vec<String> = (1..=10).map(|i| format!("s{}", i)).collect();
    for id in &seeds {
        catalog.add_track(track(id, &format!("artist-{}", id)));
    }
    let exclude = HashSet::new();

    let tracks = expand(
        &catalog,
        &ExpandRequest {
            seed_track_ids: &seeds,
            exclude: &exclude,
            new_artists: true,
            target: 2,
        },
        &ExpandOptions::default(),
    )
    .await
    .unwrap();

    assert_eq!(tracks.len(), 2);
    let calls = catalog.calls();
    assert_eq!(calls.recommendation_queries.len(), 1);
    assert_eq!(calls.track_lookups, seeds[..5].to_vec());
}
