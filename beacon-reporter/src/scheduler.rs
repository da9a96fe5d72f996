//! Report scheduling.
//!
//! Armed at most once per process, when the registry first becomes
//! non-empty. All timers run on a dedicated current-thread runtime so the
//! reporter never depends on, or blocks, the embedding application's own
//! executor. There is no cancellation, retry, jitter or backoff: firings
//! follow the wall-clock schedule for the life of the process, and the only
//! way to stop emissions is the opt-out gate, re-checked on every firing
//! inside `emit_all`.

use std::thread;
use tokio::time::{interval_at, sleep, Instant};
use tracing::debug;

use crate::Reporter;

/// Start the report timers. Callers must ensure single invocation; the
/// registry's first-insertion check is that guard.
pub(crate) fn arm(reporter: Reporter) {
    if reporter.signals().opted_out() {
        return;
    }
    let debugging = reporter.signals().debugging();

    let spawned = thread::Builder::new()
        .name("beacon-reporter".to_string())
        .spawn(move || run_timers(reporter, debugging));

    if let Err(err) = spawned {
        // The host process must never be affected; reporting is simply lost.
        debug!("failed to start reporting thread: {}", err);
    }
}

fn run_timers(reporter: Reporter, debugging: bool) {
    let runtime = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(err) => {
            debug!("failed to start reporting runtime: {}", err);
            return;
        }
    };

    let period = reporter.config().report_interval;
    let initial_delay = reporter.config().initial_report_delay;
    let debug_delay = reporter.config().debug_report_delay;

    runtime.block_on(async move {
        // One-shot first report, well before the first full period elapses.
        let first = reporter.clone();
        tokio::spawn(async move {
            sleep(initial_delay).await;
            first.emit_all().await;
        });

        // Extra fast report for development feedback.
        if debugging {
            let fast = reporter.clone();
            tokio::spawn(async move {
                sleep(debug_delay).await;
                fast.emit_all().await;
            });
        }

        // Repeating timer, first firing one full period after arming. Each
        // firing runs as its own task: a slow emission never delays the next
        // firing, and overlapping emissions are allowed.
        let mut ticker = interval_at(Instant::now() + period, period);
        loop {
            ticker.tick().await;
            let emitter = reporter.clone();
            tokio::spawn(async move {
                emitter.emit_all().await;
            });
        }
    });
}
