use std::process::Command;

use anyhow::{Context, Result};

/// `(package, features)` pairs that must compile
const FEATURE_COMBINATIONS: &[(&str, &[&str])] = &[
    ("tickbook-domain", &[]),
    ("tickbook-domain", &["ts-gen"]),
    ("tickbook-app", &[]),
    ("tickbook-app", &["ts-gen"]),
];

/// Check that every feature combination compiles
pub fn test_feature_matrix() -> Result<()> {
    println!("Testing {} feature combinations...", FEATURE_COMBINATIONS.len());

    for (index, (package, features)) in FEATURE_COMBINATIONS.iter().enumerate() {
        let joined = features.join(",");
        let label = if features.is_empty() {
            format!("{package} (default)")
        } else {
            format!("{package} --features {joined}")
        };
        println!("\n[{}/{}] cargo check -p {label}", index + 1, FEATURE_COMBINATIONS.len());

        let mut command = Command::new("cargo");
        command.args(["check", "-p", package]);
        if !features.is_empty() {
            command.args(["--features", joined.as_str()]);
        }

        let status =
            command.status().with_context(|| format!("Failed to run cargo check for '{label}'"))?;
        if !status.success() {
            anyhow::bail!("Feature combination '{label}' failed to compile");
        }

        println!("✅ {label} compiled successfully");
    }

    println!("\n✅ All {} feature combinations compile successfully!", FEATURE_COMBINATIONS.len());
    Ok(())
}
