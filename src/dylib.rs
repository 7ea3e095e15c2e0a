use std::env;

use anyhow::{Context, Result};

/// Set by the host launch environment (the Android app exports it into the
/// Termux session before starting us).
pub(crate) const NATIVE_LIBRARY_DIR_VAR: &str = "ANDROID_NATIVE_LIBRARY_DIR";

/// Read by the player's mpv bindings to locate the shared library.
pub(crate) const MPV_DYLIB_PATH_VAR: &str = "MPV_DYLIB_PATH";

const MPV_DYLIB_NAME: &str = "libmpv.so";

pub(crate) fn mpv_dylib_path(native_dir: &str) -> String {
    format!("{native_dir}/{MPV_DYLIB_NAME}")
}

/// Derives `MPV_DYLIB_PATH` from the native library directory and publishes it
/// in the process environment, so both this process and any child it spawns
/// can see it.
///
/// The directory variable is required; without it there is no point starting
/// the player, so the error propagates to the caller untouched.
pub(crate) fn export_mpv_dylib_path() -> Result<String> {
    let native_dir = env::var(NATIVE_LIBRARY_DIR_VAR)
        .with_context(|| format!("read ${NATIVE_LIBRARY_DIR_VAR}"))?;

    let dylib_path = mpv_dylib_path(&native_dir);
    env::set_var(MPV_DYLIB_PATH_VAR, &dylib_path);
    Ok(dylib_path)
}
