use std::{
    path::PathBuf,
    process::Command,
    thread,
};

use anyhow::{bail, Context, Result};
use log::{debug, info};
use signal_hook::{consts::signal::*, iterator::Signals};

pub(crate) const DEFAULT_COMMAND: &str = "fuo";

/// `-nw`: no window; the player runs headless and is remote-controlled from
/// the Android UI.
pub(crate) const DEFAULT_ARGS: &[&str] = &["-nw"];

/// How to start the player process.
#[derive(Debug, Clone)]
pub(crate) struct PlayerCommand {
    pub(crate) command: String,
    pub(crate) args: Vec<String>,
    pub(crate) workdir: Option<PathBuf>,
}

impl Default for PlayerCommand {
    fn default() -> Self {
        Self {
            command: DEFAULT_COMMAND.to_string(),
            args: DEFAULT_ARGS.iter().map(|s| s.to_string()).collect(),
            workdir: None,
        }
    }
}

/// Runs the player and blocks until it exits.
///
/// The child inherits our environment, which is how it picks up
/// `MPV_DYLIB_PATH`. Spawn failures and abnormal exits surface as errors;
/// a zero exit status is the only success.
pub(crate) fn run(cmd: &PlayerCommand) -> Result<()> {
    let mut command = Command::new(&cmd.command);
    command.args(&cmd.args);
    if let Some(dir) = &cmd.workdir {
        command.current_dir(dir);
    }

    info!("starting {} {}", cmd.command, cmd.args.join(" "));
    let mut child = command
        .spawn()
        .with_context(|| format!("spawn {}", cmd.command))?;

    // Relay termination signals so closing the launcher closes the player too.
    let pid = child.id();
    let mut signals =
        Signals::new([SIGINT, SIGTERM, SIGHUP]).context("create signal watcher")?;
    let handle = signals.handle();
    let relay = thread::spawn(move || {
        for sig in signals.forever() {
            debug!("forwarding signal {sig} to player (pid {pid})");
            if let Ok(sig) = nix::sys::signal::Signal::try_from(sig) {
                // The child may already be gone; nothing to do then.
                let _ = nix::sys::signal::kill(nix::unistd::Pid::from_raw(pid as i32), sig);
            }
        }
    });

    let status = child
        .wait()
        .with_context(|| format!("wait for {}", cmd.command));

    handle.close();
    let _ = relay.join();

    let status = status?;
    if !status.success() {
        bail!("{} exited abnormally ({status})", cmd.command);
    }

    debug!("{} exited cleanly", cmd.command);
    Ok(())
}
