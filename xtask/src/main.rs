//! Custom cargo commands for chronicle.
//!
//! Usage:
//!   cargo xtask verify    - Run full verification suite
//!   cargo xtask test      - Run all tests, with and without rayon
//!   cargo xtask wasm      - Build the Web Worker module
//!   cargo xtask fuzz <t>  - Run one fuzz target (needs nightly + cargo-fuzz)
//!   cargo xtask check     - Quick check

use anyhow::{bail, Context, Result};
use std::env;
use std::path::PathBuf;
use std::process::Command;

const WASM_TARGET: &str = "wasm32-unknown-unknown";

const FUZZ_TARGETS: &[&str] = &["normalize_text", "tsv_parsing", "snippet_clipping", "query_search"];

fn main() -> Result<()> {
    let mut args = env::args().skip(1);
    let task = args.next();
    match task.as_deref() {
        Some("verify") => verify()?,
        Some("test") => test()?,
        Some("wasm") => wasm()?,
        Some("fuzz") => fuzz(args.next().as_deref())?,
        Some("check") => check()?,
        Some("bench") => bench()?,
        _ => print_help(),
    }
    Ok(())
}

fn print_help() {
    eprintln!(
        r#"
cargo xtask <COMMAND>

Commands:
  verify         Run full verification suite (fmt, clippy, tests, wasm build)
  test           Run all Rust tests, default features and single-threaded
  wasm           Build the Web Worker module for {WASM_TARGET}
  fuzz <TARGET>  Run a fuzz target for 60s ({targets})
  check          Quick check (cargo test + clippy)
  bench          Run benchmarks
"#,
        targets = FUZZ_TARGETS.join(", ")
    );
}

/// Full verification suite
fn verify() -> Result<()> {
    println!("==========================================");
    println!("chronicle verification suite");
    println!("==========================================\n");

    println!("[1/5] Checking formatting...");
    run_cargo(&["fmt", "--all", "--check"])?;
    println!("✓ Formatting clean\n");

    println!("[2/5] Running clippy...");
    run_cargo(&["clippy", "--quiet", "--all-targets", "--", "-D", "warnings"])?;
    println!("✓ No clippy warnings\n");

    println!("[3/5] Running Rust tests (parallel)...");
    run_cargo(&["test", "--quiet"])?;
    println!("✓ All tests passed\n");

    println!("[4/5] Running Rust tests (single-threaded index)...");
    run_cargo(&["test", "--quiet", "--no-default-features"])?;
    println!("✓ All tests passed without rayon\n");

    println!("[5/5] Building WASM worker...");
    wasm()?;
    println!("✓ WASM worker builds\n");

    println!("==========================================");
    println!("All checks passed");
    println!("==========================================");
    Ok(())
}

fn test() -> Result<()> {
    run_cargo(&["test"])?;
    run_cargo(&["test", "--no-default-features"])
}

/// The browser build has no threads: rayon and indicatif stay off.
fn wasm() -> Result<()> {
    run_cargo(&[
        "build",
        "--lib",
        "--release",
        "--target",
        WASM_TARGET,
        "--no-default-features",
        "--features",
        "wasm",
    ])
}

fn fuzz(target: Option<&str>) -> Result<()> {
    let Some(target) = target else {
        bail!("missing fuzz target, expected one of: {}", FUZZ_TARGETS.join(", "));
    };
    if !FUZZ_TARGETS.contains(&target) {
        bail!(
            "unknown fuzz target `{}`, expected one of: {}",
            target,
            FUZZ_TARGETS.join(", ")
        );
    }
    run_cargo(&["+nightly", "fuzz", "run", target, "--", "-max_total_time=60"])
}

fn check() -> Result<()> {
    println!("Running quick checks...\n");

    println!("[1/2] cargo test...");
    run_cargo(&["test", "--quiet"])?;

    println!("[2/2] cargo clippy...");
    run_cargo(&["clippy", "--quiet", "--", "-D", "warnings"])?;

    println!("\n✓ Quick checks passed");
    Ok(())
}

fn bench() -> Result<()> {
    run_cargo(&["bench"])
}

// ============================================================================
// Helper functions
// ============================================================================

fn project_root() -> Result<PathBuf> {
    let manifest_dir = match env::var("CARGO_MANIFEST_DIR") {
        Ok(dir) => PathBuf::from(dir),
        Err(_) => env::current_dir().context("no CARGO_MANIFEST_DIR and no current dir")?,
    };

    // xtask is in project_root/xtask, so go up one level
    let root = manifest_dir.parent().unwrap_or(&manifest_dir);
    Ok(root.to_path_buf())
}

fn run_cargo(args: &[&str]) -> Result<()> {
    let root = project_root()?;

    let status = Command::new("cargo")
        .args(args)
        .current_dir(&root)
        .status()
        .with_context(|| format!("Failed to run cargo {:?}", args))?;

    if !status.success() {
        bail!("cargo {:?} failed", args);
    }

    Ok(())
}
