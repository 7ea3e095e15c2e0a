use std::{
    any::Any,
    panic::{self, AssertUnwindSafe},
    path::Path,
};

use anyhow::Result;
use log::{debug, warn};

use crate::{crash, dylib};

/// Runs `entry` with the mpv library path exported, persisting a crash trace
/// to [`crash::CRASH_FILE`] if it fails.
///
/// Failure handling is deliberately minimal: the trace write is a side
/// effect, and the original failure always reaches the caller unchanged —
/// an `Err` is returned as-is, a panic is resumed after the report is
/// written. Nothing is retried.
pub(crate) fn launch<F>(entry: F) -> Result<()>
where
    F: FnOnce() -> Result<()>,
{
    launch_with(Path::new(crash::CRASH_FILE), entry)
}

pub(crate) fn launch_with<F>(crash_path: &Path, entry: F) -> Result<()>
where
    F: FnOnce() -> Result<()>,
{
    // Must happen before the entry point runs: the player resolves
    // MPV_DYLIB_PATH during startup.
    let dylib_path = dylib::export_mpv_dylib_path()?;
    debug!("exported {}={dylib_path}", dylib::MPV_DYLIB_PATH_VAR);

    match panic::catch_unwind(AssertUnwindSafe(entry)) {
        Ok(Ok(())) => Ok(()),
        Ok(Err(err)) => {
            // {:?} on anyhow::Error renders the whole context chain (and a
            // backtrace when one was captured).
            persist(crash_path, &format!("{err:?}"));
            Err(err)
        }
        Err(payload) => {
            persist(crash_path, &format!("panic: {}", panic_message(&payload)));
            panic::resume_unwind(payload)
        }
    }
}

fn persist(path: &Path, trace: &str) {
    if let Err(err) = crash::write_report(path, trace) {
        // The original failure must win; losing the report only rates a warning.
        warn!("could not write crash report {}: {err:#}", path.display());
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s
    } else {
        "non-string panic payload"
    }
}

#[cfg(test)]
mod tests {
    use std::env;

    use super::*;
    use crate::{dylib, testutil::lock_env};

    #[test]
    fn test_dylib_path_exported_before_entry() {
        let _guard = lock_env();
        env::set_var(dylib::NATIVE_LIBRARY_DIR_VAR, "/native/lib");
        let dir = tempfile::tempdir().unwrap();
        let crash_path = dir.path().join(crash::CRASH_FILE);

        launch_with(&crash_path, || {
            assert_eq!(
                env::var(dylib::MPV_DYLIB_PATH_VAR).unwrap(),
                "/native/lib/libmpv.so"
            );
            Ok(())
        })
        .unwrap();
    }

    #[test]
    fn test_missing_native_dir_fails_before_entry() {
        let _guard = lock_env();
        env::remove_var(dylib::NATIVE_LIBRARY_DIR_VAR);
        let dir = tempfile::tempdir().unwrap();
        let crash_path = dir.path().join(crash::CRASH_FILE);

        let mut entered = false;
        let result = launch_with(&crash_path, || {
            entered = true;
            Ok(())
        });

        assert!(result.is_err());
        assert!(!entered);
    }

    #[test]
    fn test_success_leaves_no_crash_file() {
        let _guard = lock_env();
        env::set_var(dylib::NATIVE_LIBRARY_DIR_VAR, "/native/lib");
        let dir = tempfile::tempdir().unwrap();
        let crash_path = dir.path().join(crash::CRASH_FILE);

        launch_with(&crash_path, || Ok(())).unwrap();

        assert!(!crash_path.exists());
    }

    #[test]
    fn test_error_is_persisted_and_returned() {
        let _guard = lock_env();
        env::set_var(dylib::NATIVE_LIBRARY_DIR_VAR, "/native/lib");
        let dir = tempfile::tempdir().unwrap();
        let crash_path = dir.path().join(crash::CRASH_FILE);

        let result = launch_with(&crash_path, || {
            Err(anyhow::anyhow!("player blew up"))
        });

        let err = result.unwrap_err();
        assert_eq!(err.to_string(), "player blew up");

        let report = std::fs::read_to_string(&crash_path).unwrap();
        assert!(report.contains("player blew up"));
    }

    #[test]
    fn test_second_failure_overwrites_report() {
        let _guard = lock_env();
        env::set_var(dylib::NATIVE_LIBRARY_DIR_VAR, "/native/lib");
        let dir = tempfile::tempdir().unwrap();
        let crash_path = dir.path().join(crash::CRASH_FILE);

        launch_with(&crash_path, || Err(anyhow::anyhow!("first failure"))).unwrap_err();
        launch_with(&crash_path, || Err(anyhow::anyhow!("second failure"))).unwrap_err();

        let report = std::fs::read_to_string(&crash_path).unwrap();
        assert!(report.contains("second failure"));
        assert!(!report.contains("first failure"));
    }

    #[test]
    fn test_report_write_failure_does_not_mask_error() {
        let _guard = lock_env();
        env::set_var(dylib::NATIVE_LIBRARY_DIR_VAR, "/native/lib");
        let dir = tempfile::tempdir().unwrap();
        // An unwritable report location: the parent directory does not exist.
        let crash_path = dir.path().join("no-such-dir").join(crash::CRASH_FILE);

        let err = launch_with(&crash_path, || Err(anyhow::anyhow!("original failure")))
            .unwrap_err();

        assert_eq!(err.to_string(), "original failure");
        assert!(!crash_path.exists());
    }

    #[test]
    fn test_panic_is_persisted_and_resumed() {
        let _guard = lock_env();
        env::set_var(dylib::NATIVE_LIBRARY_DIR_VAR, "/native/lib");
        let dir = tempfile::tempdir().unwrap();
        let crash_path = dir.path().join(crash::CRASH_FILE);

        let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
            let _ = launch_with(&crash_path, || panic!("entry point panicked"));
        }));

        assert!(outcome.is_err());
        let report = std::fs::read_to_string(&crash_path).unwrap();
        assert!(report.contains("entry point panicked"));
    }
}
