//! `convert` command: ParseHub export in, catalog import document out.
//!
//! Per-product failures are logged and listed in the summary rather than
//! aborting the run; the document contains every product that converted.

use std::path::{Path, PathBuf};

use anyhow::Context;
use chrono::{DateTime, Local};
use gearcat_core::{AppConfig, Currency};
use gearcat_import::{convert_products, parse_export, ImportReport};
use rust_decimal::Decimal;

use crate::provider::{build_calculator, build_provider};

pub(crate) struct ConvertArgs {
    pub input: PathBuf,
    pub output: Option<PathBuf>,
    pub target: Option<Currency>,
    pub rate: Option<Decimal>,
    pub dry_run: bool,
}

/// Default output file name for a run started at `now`.
pub(crate) fn default_output_path(now: DateTime<Local>) -> PathBuf {
    PathBuf::from(format!("shopify_{}.json", now.format("%Y-%m-%d_%H%M%S")))
}

/// Runs a full conversion.
///
/// # Errors
///
/// Returns an error if the input cannot be read or parsed, the catalog rules
/// or rate source cannot be set up, or the output cannot be written.
/// Individual product failures are reported, not returned.
pub(crate) async fn run_convert(config: &AppConfig, args: ConvertArgs) -> anyhow::Result<()> {
    let started = Local::now();
    let target = args
        .target
        .unwrap_or_else(|| config.target_currency.clone());

    let raw = std::fs::read_to_string(&args.input)
        .with_context(|| format!("failed to read {}", args.input.display()))?;
    let products = parse_export(&raw)?;
    let rules = gearcat_core::load_catalog_rules(config.rules_path.as_deref())?;

    let provider = build_provider(config, &target, args.rate)?;
    let calculator = build_calculator(config, provider)?;

    tracing::info!(
        input = %args.input.display(),
        products = products.len(),
        target = %target,
        "converting export"
    );

    let report = convert_products(
        products,
        &calculator,
        &rules,
        &target,
        config.max_concurrent_products,
    )
    .await;

    print_failures(&report);

    if args.dry_run {
        println!(
            "dry-run: {} products converted, {} failed; no file written",
            report.products.len(),
            report.failures.len()
        );
        return Ok(());
    }

    let output = args
        .output
        .unwrap_or_else(|| default_output_path(started));
    write_document(&report, &output)?;

    let elapsed_ms = (Local::now() - started).num_milliseconds();
    tracing::info!(
        output = %output.display(),
        converted = report.products.len(),
        failed = report.failures.len(),
        elapsed_ms,
        "conversion complete"
    );
    println!(
        "wrote {} products to {} ({} failed)",
        report.products.len(),
        output.display(),
        report.failures.len()
    );

    Ok(())
}

pub(crate) fn write_document(report: &ImportReport, output: &Path) -> anyhow::Result<()> {
    let document = report.to_document()?;
    std::fs::write(output, document)
        .with_context(|| format!("failed to write {}", output.display()))
}

fn print_failures(report: &ImportReport) {
    for failure in &report.failures {
        eprintln!("failed: {}: {}", failure.product, failure.error);
    }
}
