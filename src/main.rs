use clap::{
    CommandFactory, Parser, Subcommand,
    builder::{
        Styles,
        styling::{AnsiColor, Effects},
    },
};
use clap_complete::{Shell, generate};

use tunecraft::{cli, config, error};

fn styles() -> Styles {
    Styles::styled()
        .header(AnsiColor::White.on_default() | Effects::BOLD)
        .usage(AnsiColor::White.on_default() | Effects::BOLD)
        .literal(AnsiColor::BrightBlue.on_default())
        .placeholder(AnsiColor::BrightGreen.on_default())
}

#[derive(Parser, Debug, Clone)]
#[clap(
  version = env!("CARGO_PKG_VERSION"),
  name=env!("CARGO_PKG_NAME"),
  bin_name=env!("CARGO_PKG_NAME"),
  author=env!("CARGO_PKG_AUTHORS"),
  about=env!("CARGO_PKG_DESCRIPTION"),
  styles=styles(),
)]
struct Cli {
    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Authorize with Spotify API
    Auth,

    /// Refresh the local playlist mirror from Spotify
    Refresh,

    /// List your mirrored playlists
    Playlists(PlaylistsOptions),

    /// Generate a new playlist from a seed playlist
    Generate(GenerateOptions),

    /// Get shell completions
    Completions(CompletionsOption),
}

#[derive(Parser, Debug, Clone)]
pub struct PlaylistsOptions {
    /// Refresh the mirror before listing
    #[clap(long)]
    pub refresh: bool,
}

#[derive(Parser, Debug, Clone)]
pub struct GenerateOptions {
    /// The seed playlist ID to generate a new playlist from
    #[clap(short = 's', long)]
    pub seed_playlist: String,

    /// Number of tracks in the generated playlist
    #[clap(
        short = 'n',
        long,
        default_value_t = 20,
        value_parser = clap::value_parser!(u32).range(1..)
    )]
    pub number_tracks: u32,

    /// Include only artists that do not lead any seed track
    #[clap(long)]
    pub new_artists: bool,

    /// Use every track of the seed playlist as a seed
    #[clap(long, conflicts_with = "random_seeds")]
    pub all_seeds: bool,

    /// Pick five random seed tracks without asking
    #[clap(long)]
    pub random_seeds: bool,

    /// Refresh the mirror before generating
    #[clap(long)]
    pub refresh: bool,
}

#[derive(Parser, Debug, Clone)]
pub struct CompletionsOption {
    shell: Shell,
}

#[tokio::main]
async fn main() {
    if let Err(e) = config::load_env().await {
        error!("Cannot load environment. Err: {}", e);
    }

    let cli = Cli::parse();

    match cli.command {
        Command::Auth => cli::auth().await,
        Command::Refresh => cli::refresh().await,
        Command::Playlists(opt) => cli::playlists(opt.refresh).await,
        Command::Generate(opt) => {
            cli::generate(cli::GenerateArgs {
                seed_playlist: opt.seed_playlist,
                number_tracks: opt.number_tracks as usize,
                new_artists: opt.new_artists,
                all_seeds: opt.all_seeds,
                random_seeds: opt.random_seeds,
                refresh: opt.refresh,
            })
            .await
        }
        Command::Completions(opt) => {
            let mut cmd = Cli::command();
            let name = cmd.get_name().to_string();
            generate(opt.shell, &mut cmd, name, &mut std::io::stdout())
        }
    }
}
