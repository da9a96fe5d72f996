//! System metrics sampling for usage reports.
//!
//! Provides the one-shot snapshot attached to every report:
//! - CPU architecture, logical core count and peak per-core clock speed
//! - OS platform and kernel release identifiers
//! - Total and used physical memory
//! - OS uptime in whole seconds
//!
//! Sampling is best-effort: the OS provider is treated as a black box and
//! its output is neither retried nor validated.

use serde::Serialize;
use sysinfo::System;

/// One snapshot of host characteristics, shared by every module's report
/// within a single emission.
#[derive(Debug, Clone, Serialize)]
pub struct SystemSample {
    pub arch: String,
    pub cpu_speed_mhz: u64,
    pub cpu_count: usize,
    pub os_platform: String,
    pub os_release: String,
    pub total_memory: u64,
    pub used_memory: u64,
    pub os_uptime_seconds: u64,
}

impl SystemSample {
    /// Sample current system metrics once.
    pub fn collect() -> Self {
        let mut sys = System::new_all();
        sys.refresh_all();

        let cpus = sys.cpus();
        let total_memory = sys.total_memory();
        let free_memory = sys.free_memory();

        SystemSample {
            arch: std::env::consts::ARCH.to_string(),
            cpu_speed_mhz: peak_mhz(cpus.iter().map(|cpu| cpu.frequency())),
            cpu_count: cpus.len(),
            os_platform: std::env::consts::OS.to_string(),
            os_release: System::kernel_version().unwrap_or_default(),
            total_memory,
            used_memory: total_memory.saturating_sub(free_memory),
            os_uptime_seconds: System::uptime(),
        }
    }
}

/// Fastest sampled per-core clock speed. Reports carry the maximum, not a
/// sum or average.
fn peak_mhz<I>(frequencies: I) -> u64
where
    I: IntoIterator<Item = u64>,
{
    frequencies.into_iter().max().unwrap_or(0)
}
