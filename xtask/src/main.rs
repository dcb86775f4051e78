//! Development automation tasks for the `tickbook` workspace.
//!
//! Run with: `cargo xtask <command>`
//!
//! This is a CLI tool for developers, so `println!` and `eprintln!` are
//! intentionally used for user-facing output rather than structured logging.

#![allow(clippy::print_stdout, clippy::print_stderr)]

use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitCode};
use std::{env, fs};

use anyhow::{anyhow, Context};

mod features;

/// Crates whose `ts-gen` feature exports TypeScript bindings
const BINDING_CRATES: [(&str, &str); 2] =
    [("tickbook-domain", "crates/domain/bindings"), ("tickbook-app", "crates/api/bindings")];

fn main() -> ExitCode {
    let task = env::args().nth(1);

    let result = match task.as_deref() {
        Some("ci") => run_ci(),
        Some("fmt") => run_fmt(),
        Some("clippy") => run_clippy(),
        Some("test") => run_test(),
        Some("deny") => run_deny(),
        Some("audit") => run_audit(),
        Some("codegen") => run_codegen(),
        Some("test-features") => features::test_feature_matrix(),
        Some("help") | None => {
            print_help();
            Ok(())
        }
        Some(unknown) => {
            eprintln!("Unknown task: {unknown}");
            eprintln!();
            print_help();
            Err(anyhow!("Unknown task"))
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Task failed: {e}");
            ExitCode::FAILURE
        }
    }
}

fn print_help() {
    println!("Tickbook Development Tasks");
    println!();
    println!("USAGE:");
    println!("    cargo xtask <TASK>");
    println!();
    println!("TASKS:");
    println!("    ci             Run all CI checks (fmt, clippy, features, test, deny, audit)");
    println!("    fmt            Check Rust code formatting");
    println!("    clippy         Run Clippy lints");
    println!("    test           Run all tests");
    println!("    codegen        Generate TypeScript types for the view models");
    println!("    test-features  Verify the ts-gen feature matrix compiles");
    println!("    deny           Check dependencies with cargo-deny");
    println!("    audit          Audit dependencies for security vulnerabilities");
    println!("    help           Show this help message");
}

/// Run all CI checks in sequence
fn run_ci() -> anyhow::Result<()> {
    let steps: [(&str, fn() -> anyhow::Result<()>); 6] = [
        ("Checking Rust format", run_fmt),
        ("Running Clippy", run_clippy),
        ("Checking feature matrix", features::test_feature_matrix),
        ("Running tests", run_test),
        ("Checking dependencies", run_deny),
        ("Auditing dependencies", run_audit),
    ];

    println!("==> Running CI checks...");
    for (index, (label, step)) in steps.iter().enumerate() {
        println!("\n==> Step {}/{}: {label}...", index + 1, steps.len());
        step()?;
    }

    println!("\n✓ All CI checks passed!");
    Ok(())
}

/// Run `cargo <args>` and fail with `failure` on a non-zero exit
fn cargo(args: &[&str], failure: &str) -> anyhow::Result<()> {
    let status = Command::new("cargo")
        .args(args)
        .status()
        .with_context(|| format!("Failed to run cargo {}", args.join(" ")))?;

    if !status.success() {
        anyhow::bail!("{failure}");
    }
    Ok(())
}

/// Fail unless `cargo <subcommand> --version` works
fn require_cargo_tool(subcommand: &str) -> anyhow::Result<()> {
    let installed = Command::new("cargo")
        .args([subcommand, "--version"])
        .output()
        .is_ok_and(|output| output.status.success());

    if !installed {
        eprintln!("cargo-{subcommand} is not installed.");
        eprintln!("Install it with: cargo install cargo-{subcommand}");
        anyhow::bail!("cargo-{subcommand} not found");
    }
    Ok(())
}

/// Check Rust code formatting
fn run_fmt() -> anyhow::Result<()> {
    cargo(&["fmt", "--all", "--", "--check"], "Format check failed. Run 'cargo fmt --all' to fix.")
}

/// Run Clippy lints
fn run_clippy() -> anyhow::Result<()> {
    cargo(&["clippy", "--workspace", "--all-targets", "--all-features"], "Clippy found issues")
}

/// Run all workspace tests
fn run_test() -> anyhow::Result<()> {
    cargo(&["test", "--workspace", "--all-features"], "Tests failed")
}

/// Check dependencies with cargo-deny
fn run_deny() -> anyhow::Result<()> {
    require_cargo_tool("deny")?;
    cargo(&["deny", "check"], "cargo-deny found issues")
}

/// Audit dependencies for security vulnerabilities
fn run_audit() -> anyhow::Result<()> {
    require_cargo_tool("audit")?;
    cargo(&["audit"], "cargo-audit found vulnerabilities")
}

/// Generate TypeScript types and collect them in one directory
fn run_codegen() -> anyhow::Result<()> {
    println!("==> Generating TypeScript types from Rust...\n");

    let output_dir = PathBuf::from("bindings");
    for (index, (package, bindings)) in BINDING_CRATES.iter().enumerate() {
        println!("Step {}/{}: exporting {package}...", index + 1, BINDING_CRATES.len() + 1);
        cargo(
            &["test", "-p", package, "--features", "ts-gen", "--lib"],
            "TypeScript generation tests failed",
        )?;

        let bindings_dir = Path::new(bindings);
        if !bindings_dir.exists() {
            anyhow::bail!(
                "Bindings directory not found at {}. TypeScript generation may have failed.",
                bindings_dir.display()
            );
        }
        sync_bindings(bindings_dir, &output_dir)?;
    }

    println!("\nStep {0}/{0}: Generating index.ts...", BINDING_CRATES.len() + 1);
    generate_index_ts(&output_dir)?;

    println!("\n✓ TypeScript type generation complete!");
    println!("  Generated files: {}", output_dir.display());
    Ok(())
}

fn is_ts_file(path: &Path) -> bool {
    path.extension().and_then(std::ffi::OsStr::to_str) == Some("ts")
}

/// Copy the `.ts` files of `src` into `dest`
fn sync_bindings(src: &Path, dest: &Path) -> anyhow::Result<()> {
    fs::create_dir_all(dest).context("Failed to create bindings output directory")?;
    let entries = fs::read_dir(src).context("Failed to read bindings directory")?;

    let mut synced = 0;
    for path in entries.filter_map(Result::ok).map(|entry| entry.path()) {
        if !is_ts_file(&path) {
            continue;
        }
        let file_name = path.file_name().ok_or_else(|| anyhow!("Invalid file name"))?;
        let dest_path = dest.join(file_name);
        fs::copy(&path, &dest_path).with_context(|| {
            format!("Failed to copy {} to {}", path.display(), dest_path.display())
        })?;
        synced += 1;
    }

    println!("  Synced {synced} files from {}", src.display());
    Ok(())
}

/// Write an index.ts re-exporting every generated type
fn generate_index_ts(types_dir: &Path) -> anyhow::Result<()> {
    let entries = fs::read_dir(types_dir).context("Failed to read types directory")?;

    let mut type_names: Vec<String> = entries
        .filter_map(Result::ok)
        .map(|entry| entry.path())
        .filter(|path| is_ts_file(path))
        .filter_map(|path| path.file_stem()?.to_str().map(str::to_string))
        .filter(|stem| stem != "index")
        .collect();
    type_names.sort();

    let mut content = String::from(
        "// Generated by ts-rs via: cargo xtask codegen\n\
         // DO NOT EDIT MANUALLY - changes will be overwritten\n\n",
    );
    for name in &type_names {
        let _ = writeln!(content, "export type {{ {name} }} from './{name}';");
    }

    let index_path = types_dir.join("index.ts");
    fs::write(&index_path, content)
        .with_context(|| format!("Failed to write {}", index_path.display()))?;

    println!("  Generated index.ts with {} exports", type_names.len());
    Ok(())
}
