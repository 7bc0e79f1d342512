//! Build script for milkstd
//!
//! Increments build number on each recompilation and embeds build metadata.

use std::fs;
use std::path::Path;

fn main() {
    // Only rerun when src/ files change (not on every cargo build)
    println!("cargo:rerun-if-changed=src");

    // Counter lives next to Cargo.toml, outside target/
    let build_number_path = Path::new("build_number.txt");

    let current_build: u64 = if build_number_path.exists() {
        fs::read_to_string(build_number_path)
            .unwrap_or_else(|_| "0".to_string())
            .trim()
            .parse()
            .unwrap_or(0)
    } else {
        0
    };

    let new_build = current_build + 1;

    // Write new build number back to file

    fs::write(build_number_path, new_build.to_string())
        .expect("Failed to write build number file");

    let timestamp = chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ").to_string();

    // Read back by src/build_info.rs via option_env!
    println!("cargo:rustc-env=MILKSTD_BUILD_NUMBER={}", new_build);
    println!("cargo:rustc-env=MILKSTD_BUILD_TIMESTAMP={}", timestamp);
}
