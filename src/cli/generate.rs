use tokio::io::{AsyncBufReadExt, BufReader};

use crate::{
    config,
    engine::{self, GenerateRequest, SeedMode, SeedPlaylist, Selection},
    error, info,
    spotify::{Catalog, SpotifyClient},
    success, utils, warning,
};

#[derive(Debug, Clone)]
pub struct GenerateArgs {
    pub seed_playlist: String,
    pub number_tracks: usize,
    pub new_artists: bool,
    pub all_seeds: bool,
    pub random_seeds: bool,
    pub refresh: bool,
}

pub async fn generate(args: GenerateArgs) {
    let user_id = super::user_id();
    let mut store = super::open_mirror();
    let client = super::connect().await;

    if args.refresh {
        super::refresh::refresh_mirror(&client, &mut store, &user_id).await;
    }

    let options = match config::expand_options() {
        Ok(options) => options,
        Err(e) => error!("{}", e),
    };

    let seed = match engine::prepare_seed(&store, &user_id, &args.seed_playlist) {
        Ok(seed) => seed,
        Err(e) => error!("{}", e),
    };

    info!(
        "Generating a new playlist based on {} ({} tracks)...",
        seed.playlist.name,
        seed.track_ids.len()
    );

    let mode = if args.all_seeds {
        SeedMode::All
    } else if args.random_seeds {
        SeedMode::Random
    } else {
        SeedMode::Interactive(prompt_positions(&client, &seed).await)
    };

    if let SeedMode::Interactive(input) = &mode {
        if engine::parse_selection(input.as_deref(), seed.track_ids.len()) == Selection::Invalid {
            warning!("No valid selection, picking random seed tracks.");
        }
    }

    let seed_indices = engine::select_seeds(seed.track_ids.len(), &mode, &mut rand::rng());
    info!("Using {} seed tracks.", seed_indices.len());

    let request = GenerateRequest {
        user_id: &user_id,
        seed: &seed,
        seed_indices: &seed_indices,
        new_artists: args.new_artists,
        target: args.number_tracks,
    };

    let pb = utils::spinner("Exploring recommendations...");
    let result = engine::generate::run(&client, &store, &request, &options).await;
    pb.finish_and_clear();

    match result {
        Ok(outcome) => {
            for (i, track) in outcome.tracks.iter().enumerate() {
                println!("{}", utils::format_seed_line(i + 1, track, false));
            }
            success!(
                "Created playlist '{}' ({}) with {} tracks.",
                outcome.playlist.name,
                outcome.playlist_id,
                outcome.tracks.len()
            );
        }
        Err(e) => error!("Failed to generate playlist: {}", e),
    }
}

/// Prints the numbered seed playlist and reads the chosen positions.
async fn prompt_positions(client: &SpotifyClient, seed: &SeedPlaylist) -> Option<String> {
    let pb = utils::spinner("Loading seed tracks...");
    let mut tracks = Vec::with_capacity(seed.track_ids.len());
    for track_id in &seed.track_ids {
        match client.track(track_id).await {
            Ok(track) => tracks.push(track),
            Err(e) => {
                pb.finish_and_clear();
                error!("Failed to load track {}: {}", track_id, e);
            }
        }
    }
    pb.finish_and_clear();

    for (i, track) in tracks.iter().enumerate() {
        println!(
            "{}",
            utils::format_seed_line(i + 1, track, seed.is_liked(&track.id))
        );
    }
    info!("Enter seed track numbers separated by spaces (leave empty for a random pick):");

    let mut line = String::new();
    match BufReader::new(tokio::io::stdin()).read_line(&mut line).await {
        Ok(0) | Err(_) => None,
        Ok(_) => Some(line),
    }
}
