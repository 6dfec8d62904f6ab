use std::process::Command;

use anyhow::{Context, Result};

const PACKAGE: &str = "calsync-common";

/// `platform` pulls in the OS keychain; `test-utils` exposes the in-memory
/// doubles other crates test against.
const FEATURE_COMBINATIONS: &[&[&str]] = &[
    &[], // default
    &["platform"],
    &["test-utils"],
    &["platform", "test-utils"],
];

/// Check that every feature combination of `calsync-common` compiles.
pub fn test_feature_matrix() -> Result<()> {
    let total = FEATURE_COMBINATIONS.len();
    println!("Testing {total} {PACKAGE} feature combinations...");

    for (index, features) in FEATURE_COMBINATIONS.iter().enumerate() {
        let label = if features.is_empty() { "default".to_string() } else { features.join(",") };
        println!("\n[{}/{total}] cargo check -p {PACKAGE} --features '{label}'", index + 1);

        let mut command = Command::new("cargo");
        command.args(["check", "-p", PACKAGE, "--no-default-features"]);
        if !features.is_empty() {
            command.arg("--features").arg(features.join(","));
        }

        let status =
            command.status().with_context(|| format!("Failed to run cargo check for '{label}'"))?;
        if !status.success() {
            anyhow::bail!("Feature combination '{label}' failed to compile");
        }

        println!("✅ Features '{label}' compiled successfully");
    }

    println!("\n✅ All {total} feature combinations compile successfully!");
    Ok(())
}
