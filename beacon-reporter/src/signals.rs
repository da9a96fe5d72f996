//! Opt-out and debug gates.
//!
//! Telemetry is disabled when either of two independent signals is present:
//! a process environment variable, or an in-memory flag settable by embedding
//! code. Both are re-read live on every check, so a runtime toggle takes
//! effect for all subsequent actions. Debug mode follows the same two-signal
//! pattern and only governs diagnostic verbosity plus the fast first report.

use std::env;
use std::sync::atomic::{AtomicBool, Ordering};

/// Set non-empty (and not "0") to disable all telemetry for the process.
pub const OPT_OUT_ENV: &str = "BEACON_STATS_OPT_OUT";
/// Set non-empty (and not "0") to enable diagnostic output and the fast
/// first-report timer.
pub const DEBUG_ENV: &str = "BEACON_STATS_DEBUG";

static OPT_OUT_FLAG: AtomicBool = AtomicBool::new(false);
static DEBUG_FLAG: AtomicBool = AtomicBool::new(false);

/// Programmatic opt-out override for embedding code. Takes effect on the
/// next gate check; in-flight deliveries are not interrupted.
pub fn set_opt_out(enabled: bool) {
    OPT_OUT_FLAG.store(enabled, Ordering::Relaxed);
}

/// Programmatic debug-mode override for embedding code.
pub fn set_debug(enabled: bool) {
    DEBUG_FLAG.store(enabled, Ordering::Relaxed);
}

/// Configuration-check abstraction consulted before every observable action.
/// Injectable so tests can substitute deterministic values instead of
/// mutating real process environment or global state.
pub trait Signals: Send + Sync {
    fn opted_out(&self) -> bool;
    fn debugging(&self) -> bool;
}

/// Production signals: environment variables plus the process-wide flags.
#[derive(Debug, Clone, Copy, Default)]
pub struct EnvSignals;

impl Signals for EnvSignals {
    fn opted_out(&self) -> bool {
        env_truthy(OPT_OUT_ENV) || OPT_OUT_FLAG.load(Ordering::Relaxed)
    }

    fn debugging(&self) -> bool {
        env_truthy(DEBUG_ENV) || DEBUG_FLAG.load(Ordering::Relaxed)
    }
}

fn env_truthy(name: &str) -> bool {
    match env::var(name) {
        Ok(value) => !value.is_empty() && value != "0",
        Err(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn env_truthy_treats_empty_and_zero_as_unset() {
        const VAR: &str = "BEACON_TEST_TRUTHY";
        env::remove_var(VAR);
        assert!(!env_truthy(VAR));

        env::set_var(VAR, "");
        assert!(!env_truthy(VAR));

        env::set_var(VAR, "0");
        assert!(!env_truthy(VAR));

        env::set_var(VAR, "1");
        assert!(env_truthy(VAR));

        env::set_var(VAR, "yes");
        assert!(env_truthy(VAR));

        env::remove_var(VAR);
    }
}
