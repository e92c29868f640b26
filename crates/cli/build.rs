//! Build script for the dentascan CLI
//!
//! Writes `built.rs` (target, profile, rustc version) and exports the
//! commit and build time used by `dentascan --version`.

use std::env;

fn main() {
    built::write_built_file().expect("Failed to acquire build-time information");

    let commit = env::var("GIT_COMMIT_HASH").unwrap_or_else(|_| "unknown".to_string());
    println!("cargo:rustc-env=DENTASCAN_COMMIT={commit}");
    println!(
        "cargo:rustc-env=DENTASCAN_BUILT_AT={}",
        chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ")
    );
    println!("cargo:rerun-if-env-changed=GIT_COMMIT_HASH");
}
