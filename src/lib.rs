#[cfg(not(unix))]
compile_error!("fuo-launch targets Unix hosts (Termux/Android or desktop Linux).");

mod app;
mod config;
mod crash;
mod dylib;
mod launcher;
mod player;
#[cfg(test)]
mod testutil;

/// Runs the FeelUOwn launcher.
///
/// The binary entrypoint (`src/main.rs`) delegates to this so the codebase can be
/// structured like a normal Rust library.
pub fn run() -> anyhow::Result<()> {
    app::run()
}
