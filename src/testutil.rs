use std::sync::{Mutex, MutexGuard};

// Environment variables are process-global; tests that touch them must hold
// this lock so parallel test threads don't race.
static ENV_LOCK: Mutex<()> = Mutex::new(());

pub(crate) fn lock_env() -> MutexGuard<'static, ()> {
    ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner())
}
