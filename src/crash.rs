use std::{
    fs::File,
    io::Write,
    path::Path,
};

use anyhow::{Context, Result};

/// Fixed crash-trace location, relative to the directory the launcher was
/// started from. Tooling on the Android side picks this file up after an
/// abnormal exit.
pub(crate) const CRASH_FILE: &str = "feeluown_err.stack";

/// Writes `trace` to the report file, replacing whatever a previous run left
/// there. The handle is scoped to this function, so it is closed on every
/// exit path, including a failed write.
pub(crate) fn write_report(path: &Path, trace: &str) -> Result<()> {
    let mut file =
        File::create(path).with_context(|| format!("create {}", path.display()))?;

    writeln!(
        file,
        "{} v{} crash report",
        env!("CARGO_PKG_NAME"),
        env!("CARGO_PKG_VERSION")
    )?;
    writeln!(file)?;
    file.write_all(trace.as_bytes())?;
    if !trace.ends_with('\n') {
        writeln!(file)?;
    }

    Ok(())
}
