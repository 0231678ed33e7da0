//! CLI entry point for the `smedia` command-line tool.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

use shared_media::cli::commands;
use shared_media::{MediaConfig, MediaError, SharedMediaType, SharedMediaTypesMask};

#[derive(Parser)]
#[command(
    name = "smedia",
    about = "Shared media index CLI — replay ingestion scripts and query the partial index"
)]
struct Cli {
    /// Output format: "text" (default) or "json"
    #[arg(long, default_value = "text")]
    format: String,

    /// Enable debug logging
    #[arg(long)]
    verbose: bool,

    /// TOML configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Replay a JSON-lines script and print notifications and query results
    Replay {
        /// Path to the script
        script: PathBuf,
    },
    /// Replay a script, then answer one window query
    Query {
        /// Path to the script
        script: PathBuf,
        /// Conversation id
        #[arg(long)]
        peer: u64,
        /// Media type: photo, video, music_file, file, voice_file, link,
        /// chat_photo, round_voice_file, gif, round_file
        #[arg(long = "type")]
        media_type: String,
        /// Message id to center the window on
        #[arg(long)]
        anchor: i64,
        /// Ids to return before the anchor
        #[arg(long)]
        before: Option<usize>,
        /// Ids to return after the anchor
        #[arg(long)]
        after: Option<usize>,
    },
    /// Replay a script, then print per-list statistics
    Stats {
        /// Path to the script
        script: PathBuf,
        /// Comma-separated media types to report (default: all)
        #[arg(long)]
        types: Option<String>,
    },
}

fn main() {
    let cli = Cli::parse();
    let json = cli.format == "json";

    if cli.verbose {
        env_logger::Builder::new()
            .filter_level(log::LevelFilter::Debug)
            .init();
    } else {
        env_logger::init();
    }

    let config = match cli.config.as_deref().map(MediaConfig::load).transpose() {
        Ok(config) => config.unwrap_or_default(),
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(2);
        }
    };

    let result = match cli.command {
        Commands::Replay { script } => commands::cmd_replay(&script, config, json),
        Commands::Query {
            script,
            peer,
            media_type,
            anchor,
            before,
            after,
        } => {
            let media_type = match SharedMediaType::from_name(&media_type) {
                Some(t) => t,
                None => {
                    eprintln!("Invalid media type: {}", media_type);
                    process::exit(3);
                }
            };
            commands::cmd_query(&script, config, peer, media_type, anchor, before, after, json)
        }
        Commands::Stats { script, types } => {
            let types = match types.as_deref().map(SharedMediaTypesMask::parse) {
                None => SharedMediaTypesMask::all(),
                Some(Ok(mask)) => mask,
                Some(Err(e)) => {
                    eprintln!("Error: {}", e);
                    process::exit(3);
                }
            };
            commands::cmd_stats(&script, config, types, json)
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        let code = match &e {
            MediaError::Io(_) => 1,
            MediaError::Config(_) | MediaError::ConfigWrite(_) => 2,
            MediaError::UnknownType(_) | MediaError::InvalidTypeIndex(_) => 3,
            MediaError::Script { .. }
            | MediaError::InvalidRange { .. }
            | MediaError::InvalidMessageId { .. } => 4,
        };
        process::exit(code);
    }
}
