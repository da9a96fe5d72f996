//! Build script for beacon-reporter.
//!
//! Embeds the toolchain version string at compile time so reports can carry
//! the runtime version alongside the reporter's own crate version.

use std::process::Command;

fn main() {
    let rustc = std::env::var("RUSTC").unwrap_or_else(|_| "rustc".to_string());

    let version = Command::new(rustc)
        .arg("--version")
        .output()
        .ok()
        .and_then(|output| {
            if output.status.success() {
                String::from_utf8(output.stdout).ok()
            } else {
                None
            }
        })
        .map(|s| s.trim().to_string())
        .unwrap_or_else(|| "unknown".to_string());

    println!("cargo:rustc-env=BEACON_RUSTC_VERSION={}", version);
    println!("cargo:rerun-if-changed=build.rs");
}
