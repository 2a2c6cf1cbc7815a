//! Fee Reconcile CLI
//!
//! Reconciles a fee confirmation export against a policy roster export and
//! writes the corrected table, the pivot summary and the per-branch archive.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use fee_reconcile::{pipeline, ReconcileConfig, Upload};
use log::info;

#[derive(Debug, Parser)]
#[command(name = "fee_reconcile", version, about = "Fee confirmation vs. policy roster reconciliation")]
struct Cli {
    /// Fee confirmation export (费用查询表), .xlsx/.xls/.csv
    #[arg(long)]
    confirm: PathBuf,

    /// Policy roster export (保费清单表), .xlsx/.xls/.csv
    #[arg(long)]
    roster: PathBuf,

    /// Directory receiving the output files
    #[arg(long, default_value = ".")]
    out_dir: PathBuf,

    /// JSON file overriding run settings
    #[arg(long)]
    config: Option<PathBuf>,

    /// Also write the warning list as JSON to this file
    #[arg(long)]
    warnings_json: Option<PathBuf>,
}

fn write_output(dir: &Path, name: &str, bytes: &[u8]) -> Result<()> {
    let path = dir.join(name);
    fs::write(&path, bytes).with_context(|| format!("Cannot write {}", path.display()))?;
    println!("  {} ({} bytes)", path.display(), bytes.len());
    Ok(())
}

fn run(cli: &Cli) -> Result<()> {
    let config = match &cli.config {
        Some(path) => ReconcileConfig::from_json_path(path)
            .with_context(|| format!("Cannot load config {}", path.display()))?,
        None => ReconcileConfig::default(),
    };

    let confirm = Upload::from_path(&cli.confirm)?;
    let roster = Upload::from_path(&cli.roster)?;
    info!("Reconciling {} against {}", confirm.file_name, roster.file_name);

    let output = pipeline::run(&confirm, &roster, &config)
        .context("Reconciliation failed, please check the uploaded files")?;
    let reconciliation = &output.reconciliation;

    println!("Fee lines: {}", reconciliation.lines.len());
    println!("Pivot groups: {}", reconciliation.pivot.len());
    println!("Branches: {}", reconciliation.pivot.branches().len());

    if !reconciliation.warnings.is_empty() {
        println!("\nWarnings ({}):", reconciliation.warnings.len());
        for warning in &reconciliation.warnings {
            println!("  {}", warning);
        }
    }

    fs::create_dir_all(&cli.out_dir)
        .with_context(|| format!("Cannot create {}", cli.out_dir.display()))?;

    println!("\nOutputs:");
    let artifacts = &output.artifacts;
    write_output(&cli.out_dir, &config.corrected_file_name, &artifacts.corrected_xlsx)?;
    write_output(&cli.out_dir, &config.pivot_file_name, &artifacts.pivot_xlsx)?;
    write_output(&cli.out_dir, &config.archive_file_name, &artifacts.archive_zip)?;

    if let Some(path) = &cli.warnings_json {
        let json = serde_json::to_string_pretty(&reconciliation.warnings)?;
        fs::write(path, json).with_context(|| format!("Cannot write {}", path.display()))?;
        println!("  {}", path.display());
    }

    Ok(())
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {:#}", err);
            ExitCode::FAILURE
        }
    }
}
