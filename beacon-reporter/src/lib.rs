//! Beacon Reporter - Opt-out anonymous usage statistics for embedded packages
//!
//! Host packages call [`setup`] once at startup with their own identity
//! metadata. The library deduplicates registrations, derives a stable
//! anonymous machine identifier, and periodically POSTs one small usage
//! report per registered package to a fixed collection endpoint:
//! - Registration is fire-and-forget: it never blocks, never fails and
//!   never panics the embedding application
//! - Telemetry is disabled entirely via `BEACON_STATS_OPT_OUT` or
//!   [`set_opt_out`]; both are re-checked live before every action
//! - `BEACON_STATS_DEBUG` or [`set_debug`] enable diagnostic output and a
//!   fast first report for development
//!
//! ```no_run
//! beacon_reporter::setup(beacon_reporter::ModuleDescriptor {
//!     name: env!("CARGO_PKG_NAME").to_string(),
//!     version: env!("CARGO_PKG_VERSION").to_string(),
//! });
//! ```

mod config;
mod identity;
mod metrics;
mod registry;
mod report;
mod scheduler;
mod signals;
mod state;

pub use config::{ReporterConfig, DEFAULT_ENDPOINT};
pub use metrics::SystemSample;
pub use registry::ModuleDescriptor;
pub use report::{ReportError, UsageReport};
pub use signals::{set_debug, set_opt_out, EnvSignals, Signals, DEBUG_ENV, OPT_OUT_ENV};

use chrono::Utc;
use once_cell::sync::Lazy;
use std::sync::Arc;
use tracing::debug;

use registry::ModuleRegistry;

static GLOBAL: Lazy<Reporter> =
    Lazy::new(|| Reporter::new(ReporterConfig::default(), Arc::new(EnvSignals)));

/// Register a host package for periodic usage reporting.
///
/// The first successful registration in the process starts the report
/// schedule; re-registering the same name is a no-op. Never raises: opt-out,
/// duplicate names and delivery failures are all absorbed internally.
pub fn setup(descriptor: ModuleDescriptor) {
    GLOBAL.register(descriptor);
}

#[cfg(test)]
pub(crate) fn global_reporter() -> &'static Reporter {
    &GLOBAL
}

/// Reporting context: registry, cached machine identity, schedule and HTTP
/// client. [`setup`] drives a process-wide instance; embedders that want an
/// explicit lifecycle (or tests) can own one directly.
#[derive(Clone)]
pub struct Reporter {
    inner: Arc<Inner>,
}

struct Inner {
    config: ReporterConfig,
    signals: Arc<dyn Signals>,
    machine_id: String,
    started_at: i64,
    registry: ModuleRegistry,
    http: Option<reqwest::Client>,
}

impl Reporter {
    /// Build a reporter. The machine identity is derived eagerly here and
    /// cached for the reporter's lifetime, so no emission ever pays that
    /// cost.
    pub fn new(config: ReporterConfig, signals: Arc<dyn Signals>) -> Self {
        let http = match reqwest::Client::builder()
            .user_agent(concat!("beacon-reporter/", env!("CARGO_PKG_VERSION")))
            .build()
        {
            Ok(client) => Some(client),
            Err(err) => {
                debug!("failed to build http client, reporting disabled: {}", err);
                None
            }
        };

        Reporter {
            inner: Arc::new(Inner {
                config,
                signals,
                machine_id: identity::compute_machine_id(),
                started_at: Utc::now().timestamp(),
                registry: ModuleRegistry::new(),
                http,
            }),
        }
    }

    /// Register one host package. First registration wins; the 0→1 registry
    /// transition arms the schedule exactly once.
    pub fn register(&self, descriptor: ModuleDescriptor) {
        if self.inner.signals.opted_out() {
            return;
        }
        if self.inner.registry.insert(descriptor) {
            scheduler::arm(self.clone());
        }
    }

    /// Emit one report per currently registered module. System metrics are
    /// sampled once and shared across all modules in this call; each
    /// module's POST is fully independent, so one transport failure cannot
    /// prevent the others from being sent.
    pub async fn emit_all(&self) {
        if self.inner.signals.opted_out() {
            return;
        }
        let Some(client) = self.inner.http.as_ref() else {
            return;
        };
        if self.inner.registry.is_empty() {
            return;
        }

        let sample = SystemSample::collect();
        let app_uptime_seconds = (Utc::now().timestamp() - self.inner.started_at).max(0) as u64;
        let debugging = self.inner.signals.debugging();

        let sends: Vec<_> = self
            .inner
            .registry
            .snapshot()
            .into_iter()
            .map(|module| {
                let payload =
                    UsageReport::build(&module, &self.inner.machine_id, &sample, app_uptime_seconds);
                report::submit(client, &self.inner.config.endpoint, payload, debugging)
            })
            .collect();

        futures::future::join_all(sends).await;
    }

    /// Cached anonymous machine identifier.
    pub fn machine_id(&self) -> &str {
        &self.inner.machine_id
    }

    /// Number of registered modules.
    pub fn module_count(&self) -> usize {
        self.inner.registry.len()
    }

    pub(crate) fn signals(&self) -> &Arc<dyn Signals> {
        &self.inner.signals
    }

    pub(crate) fn config(&self) -> &ReporterConfig {
        &self.inner.config
    }
}
