use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use log::info;

use crate::{config::Config, launcher, player};

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Configuration file to use instead of the default location.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Working directory for the player process.
    #[arg(long, value_name = "DIR")]
    workdir: Option<PathBuf>,

    /// Enable debug logging.
    #[arg(short, long)]
    verbose: bool,

    /// Arguments passed to the player instead of the configured ones.
    ///
    /// Example: fuo-launch -- -nw --log-to-file
    #[arg(last = true, value_name = "ARGS")]
    player_args: Vec<String>,
}

pub(crate) fn run() -> Result<()> {
    let args = Args::parse();

    let log_level = if args.verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };
    env_logger::Builder::from_default_env()
        .filter_level(log_level)
        .init();

    info!("starting {} v{}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));

    let config = Config::load(args.config.as_deref());

    let mut player_cmd = config.player;
    if let Some(dir) = args.workdir {
        player_cmd.workdir = Some(dir);
    }
    if !args.player_args.is_empty() {
        player_cmd.args = args.player_args;
    }

    // Any failure below has already been written to the crash file; returning
    // it here is what makes the process exit abnormally.
    launcher::launch(move || player::run(&player_cmd))
}
