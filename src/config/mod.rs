use std::{env, fs, path::{Path, PathBuf}};

use anyhow::{Context, Result};
use log::warn;
use serde::Deserialize;

use crate::player::PlayerCommand;

#[derive(Debug, Clone, Default)]
pub(crate) struct Config {
    pub(crate) player: PlayerCommand,
}

impl Config {
    /// Loads the config, falling back to defaults if the file is missing or
    /// broken. A broken config should never keep the player from starting.
    ///
    /// A missing file is only silent for the implicit XDG location; a path
    /// the user named with `--config` gets a warning when it is absent.
    pub(crate) fn load(explicit: Option<&Path>) -> Self {
        if let Some(path) = explicit {
            return match load_explicit(path) {
                Ok(cfg) => cfg,
                Err(err) => {
                    warn!("config load failed ({}): {err:#}", path.display());
                    Self::default()
                }
            };
        }

        let Some(path) = config_path() else {
            return Self::default();
        };

        match load_from_path(&path) {
            Ok(cfg) => cfg,
            Err(err) => {
                warn!("config load failed ({}): {err:#}", path.display());
                Self::default()
            }
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct RawConfig {
    player: Option<RawPlayer>,
}

#[derive(Debug, Default, Deserialize)]
struct RawPlayer {
    command: Option<String>,
    args: Option<Vec<String>>,
    workdir: Option<PathBuf>,
}

fn load_from_path(path: &Path) -> Result<Config> {
    let data = match fs::read_to_string(path) {
        Ok(s) => s,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Config::default()),
        Err(e) => return Err(e).with_context(|| format!("read {}", path.display())),
    };

    parse(&data)
}

// Unlike the implicit location, an explicitly named file that is missing is
// an error, so the caller can tell the user about it.
fn load_explicit(path: &Path) -> Result<Config> {
    let data =
        fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    parse(&data)
}

fn parse(data: &str) -> Result<Config> {
    let raw: RawConfig = toml::from_str(data).context("parse TOML")?;

    let mut cfg = Config::default();
    if let Some(player) = raw.player {
        apply_player(&mut cfg.player, player);
    }

    Ok(cfg)
}

fn apply_player(out: &mut PlayerCommand, raw: RawPlayer) {
    if let Some(command) = raw.command {
        out.command = command;
    }
    if let Some(args) = raw.args {
        out.args = args;
    }
    if let Some(workdir) = raw.workdir {
        out.workdir = Some(workdir);
    }
}

fn config_path() -> Option<PathBuf> {
    let base = env::var_os("XDG_CONFIG_HOME").map(PathBuf::from).or_else(|| {
        env::var_os("HOME").map(|h| PathBuf::from(h).join(".config"))
    })?;

    Some(base.join("fuo-launch").join("config.toml"))
}
