//! Development tasks for the mtxcalc-rs workspace.
//!
//! Usage: `cargo xtask <command>`

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::Path;
use std::process::Command;

#[derive(Parser)]
#[command(name = "xtask", about = "Development tasks for mtxcalc-rs")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run all CI checks (fmt, clippy, test, doc)
    Ci,
    /// Run the multiplication and solver benchmarks
    Bench {
        /// Only run benchmarks whose name contains this filter
        filter: Option<String>,
    },
    /// Run the exponential/solver demo with debug logging
    Demo,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Ci => cmd_ci(),
        Commands::Bench { filter } => cmd_bench(filter.as_deref()),
        Commands::Demo => cmd_demo(),
    }
}

fn project_root() -> Result<&'static Path> {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .context("xtask must live inside the workspace")
}

fn cmd_ci() -> Result<()> {
    let root = project_root()?;

    println!("Running cargo fmt...");
    run_cargo(root, &["fmt", "--all", "--", "--check"], &[])?;

    println!("Running cargo clippy...");
    run_cargo(
        root,
        &["clippy", "--workspace", "--all-targets", "--", "-D", "warnings"],
        &[],
    )?;

    println!("Running cargo test...");
    run_cargo(root, &["test", "--workspace"], &[])?;

    println!("Checking documentation...");
    run_cargo(root, &["doc", "--workspace", "--no-deps"], &[])?;

    println!("All CI checks passed");
    Ok(())
}

fn cmd_bench(filter: Option<&str>) -> Result<()> {
    let root = project_root()?;
    let mut args = vec!["bench", "-p", "mtxcalc", "--bench", "multiply_bench"];
    if let Some(filter) = filter {
        args.extend(["--", filter]);
    }
    run_cargo(root, &args, &[])
}

fn cmd_demo() -> Result<()> {
    let root = project_root()?;
    run_cargo(
        root,
        &["run", "-p", "mtxcalc", "--example", "exp_and_solve"],
        &[("RUST_LOG", "mtxcalc=debug")],
    )
}

fn run_cargo(dir: &Path, args: &[&str], envs: &[(&str, &str)]) -> Result<()> {
    let status = Command::new("cargo")
        .args(args)
        .envs(envs.iter().copied())
        .current_dir(dir)
        .status()
        .with_context(|| format!("Failed to run cargo {}", args.join(" ")))?;

    if !status.success() {
        anyhow::bail!("cargo {} failed", args.join(" "));
    }
    Ok(())
}
