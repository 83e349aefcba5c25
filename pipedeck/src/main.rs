use anyhow::Result;
use clap::{Parser, Subcommand};
use pipedeck_core::sort::StreamOrder;
use std::path::PathBuf;
use tracing::info;

mod app;

#[derive(Parser, Debug)]
#[command(author, version, about = "pipedeck - browse, tag and reorder NewPipe playlists", long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(short, long)]
    config: Option<String>,

    /// JSON library file (defaults to `general.library_file` from the config)
    #[arg(short, long)]
    items: Option<PathBuf>,

    /// Playlist id the items belong to
    #[arg(short, long)]
    playlist: Option<String>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print the playlist in stored order
    Show,

    /// Sort the playlist and store the new order
    Sort {
        /// Sort key (title, uploader, duration, upload-date, view-count)
        #[arg(long, value_parser = parse_order)]
        by: Option<StreamOrder>,

        #[arg(long)]
        descending: bool,
    },

    /// Move the given streams, as one block, in front of a target stream
    Move {
        /// Streams to move, in any order
        #[arg(long = "select", required = true, num_args = 1..)]
        select: Vec<String>,

        /// Stream the block is dropped on
        #[arg(long)]
        onto: String,
    },

    /// Tag a stream, or the whole selection when the stream is part of it
    Tag {
        #[arg(long)]
        uid: String,

        /// Tag name; omit both name and colour to remove the tag
        #[arg(long, requires = "color")]
        name: Option<String>,

        /// Tag colour as #rgb or #rrggbb
        #[arg(long, requires = "name")]
        color: Option<String>,

        /// Streams selected alongside `uid`
        #[arg(long = "select", num_args = 1..)]
        select: Vec<String>,
    },
}

fn parse_order(value: &str) -> std::result::Result<StreamOrder, String> {
    StreamOrder::parse(value).ok_or_else(|| format!("unknown sort order: {value}"))
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Load configuration
    let config = if let Some(config_path) = &args.config {
        pipedeck_core::config::Config::load_from_path(config_path)?
    } else {
        pipedeck_core::config::Config::load_or_default()
    };

    // Initialize logging
    let log_level = if args.verbose {
        "debug"
    } else {
        config.general.log_level.as_str()
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    info!("Starting pipedeck v{}", env!("CARGO_PKG_VERSION"));

    let playlist = args
        .playlist
        .or_else(|| config.library.default_playlist.clone())
        .unwrap_or_else(|| app::DEFAULT_PLAYLIST.to_owned());

    let items = app::items_path(args.items, &config);
    info!("Items: {}", items.display());
    info!("Playlist: {}", playlist);

    let output = app::run(&items, &playlist, args.command, &config)?;
    print!("{output}");

    Ok(())
}
