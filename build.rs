// SPDX-License-Identifier: GPL-3.0-only

use std::process::Command;

fn main() {
    println!("cargo::rerun-if-changed=.git/HEAD");
    println!("cargo::rerun-if-changed=.git/refs/tags");
    println!("cargo::rerun-if-changed=i18n");

    // Packagers (flatpak, distro builds) pin the version without a git checkout
    let version = std::env::var("SHUTTER_VERSION").unwrap_or_else(|_| describe_version());

    println!("cargo::rustc-env=GIT_VERSION={}", version);
}

/// Version string from `git describe`, falling back to the crate version.
///
/// - "v0.1.0" (exact tag) becomes "0.1.0-abcdef1"
/// - "v0.1.0-5-gabcdef1" becomes "0.1.0-dirty-abcdef1"
fn describe_version() -> String {
    let described = git(&["describe", "--tags", "--always", "--match", "v*"]);
    let commit = git(&["rev-parse", "--short", "HEAD"]).unwrap_or_else(|| "unknown".to_string());

    let Some(described) = described else {
        return format!("{}-{}", env!("CARGO_PKG_VERSION"), commit);
    };

    let described = described.strip_prefix('v').unwrap_or(&described);
    let parts: Vec<&str> = described.rsplitn(3, '-').collect();
    if parts.len() == 3 {
        let hash = parts[0].strip_prefix('g').unwrap_or(parts[0]);
        format!("{}-dirty-{}", parts[2], hash)
    } else if described.contains('.') {
        format!("{}-{}", described, commit)
    } else {
        // No tag yet, describe only returned the hash
        format!("{}-{}", env!("CARGO_PKG_VERSION"), described)
    }
}

fn git(args: &[&str]) -> Option<String> {
    let output = Command::new("git").args(args).output().ok()?;
    if output.status.success() {
        Some(String::from_utf8_lossy(&output.stdout).trim().to_string())
    } else {
        None
    }
}
