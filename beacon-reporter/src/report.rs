//! Report construction and delivery.
//!
//! One report describes one registered module's usage snapshot. Reports are
//! submitted as independent form-encoded POSTs to the collector; transport
//! failures are recovered locally and never surfaced to the host package.

use reqwest::Client;
use serde::Serialize;
use thiserror::Error;
use tracing::debug;

use crate::metrics::SystemSample;
use crate::registry::ModuleDescriptor;

/// This library's own version, reported alongside every module.
pub(crate) const REPORTER_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Toolchain version stamped at build time (see build.rs).
pub(crate) const RUNTIME_VERSION: &str = env!("BEACON_RUSTC_VERSION");

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("collector returned status {0}")]
    Status(u16),
}

/// Wire payload. Field names and count are fixed by the collector contract;
/// serialized as `application/x-www-form-urlencoded`.
#[derive(Debug, Clone, Serialize)]
pub struct UsageReport {
    pub module: String,
    pub runtime_version: String,
    pub module_version: String,
    pub reporter_version: String,
    pub machine_id: String,
    pub arch: String,
    pub cpu_speed_mhz: u64,
    pub cpu_count: u64,
    pub os_platform: String,
    pub os_release: String,
    pub used_memory: u64,
    pub total_memory: u64,
    pub os_uptime_seconds: u64,
    pub app_uptime_seconds: u64,
}

impl UsageReport {
    pub(crate) fn build(
        module: &ModuleDescriptor,
        machine_id: &str,
        sample: &SystemSample,
        app_uptime_seconds: u64,
    ) -> Self {
        UsageReport {
            module: module.name.clone(),
            runtime_version: RUNTIME_VERSION.to_string(),
            module_version: module.version.clone(),
            reporter_version: REPORTER_VERSION.to_string(),
            machine_id: machine_id.to_string(),
            arch: sample.arch.clone(),
            cpu_speed_mhz: sample.cpu_speed_mhz,
            cpu_count: sample.cpu_count as u64,
            os_platform: sample.os_platform.clone(),
            os_release: sample.os_release.clone(),
            used_memory: sample.used_memory,
            total_memory: sample.total_memory,
            os_uptime_seconds: sample.os_uptime_seconds,
            app_uptime_seconds,
        }
    }
}

/// Submit one report. Fire-and-forget: every failure is swallowed here, at
/// most logged when debug mode is active.
pub(crate) async fn submit(client: &Client, endpoint: &str, report: UsageReport, debugging: bool) {
    match send(client, endpoint, &report, debugging).await {
        Ok(status) => {
            if debugging {
                debug!(
                    "stats reported for {}@{}: {}",
                    report.module, report.module_version, status
                );
                debug!(
                    "payload: {}",
                    serde_json::to_string(&report).unwrap_or_default()
                );
            }
        }
        Err(err) => {
            if debugging {
                debug!(
                    "stats delivery failed for {}@{}: {}",
                    report.module, report.module_version, err
                );
            }
        }
    }
}

async fn send(
    client: &Client,
    endpoint: &str,
    report: &UsageReport,
    debugging: bool,
) -> Result<u16, ReportError> {
    let response = client.post(endpoint).form(report).send().await?;
    let status = response.status();

    // Read the body to completion; the collector's reply only matters for
    // human inspection in debug mode.
    let body = response.text().await.unwrap_or_default();
    if debugging && !body.is_empty() {
        debug!("collector response: {}", body);
    }

    if !status.is_success() {
        return Err(ReportError::Status(status.as_u16()));
    }
    Ok(status.as_u16())
}
