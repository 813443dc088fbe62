use std::path::PathBuf;
use std::sync::Arc;

use crate::cli::{Cli, Commands};
use indicatif::{ProgressBar, ProgressStyle};
use tokio_util::sync::CancellationToken;
use websweep::config::ScanConfig;
use websweep::extract::extract_from_fetch;
use websweep::report::{writers::write_reports, Aggregator};
use websweep::{fetch, probe, utils};

pub async fn run_from_cli(cli: Cli) -> anyhow::Result<()> {
    // Configure logging based on global flags. Keep external crates
    // (reqwest/hyper) at INFO to avoid flooding the CLI.
    use tracing_subscriber::EnvFilter;
    let crate_level = if cli.debug {
        "debug"
    } else if cli.verbose {
        "info"
    } else {
        "warn"
    };
    let filter_str =
        format!("websweep={crate_level},reqwest=info,hyper=info,h2=info");
    let env_filter =
        EnvFilter::try_new(&filter_str).unwrap_or_else(|_| EnvFilter::new(crate_level));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_ansi(true)
        .with_target(false)
        .init();

    match cli.command {
        Commands::Scan { target, out, concurrency, timeout, checks, rate_limit_requests } => {
            let cfg = ScanConfig {
                concurrency,
                timeout_secs: timeout,
                run_checks: checks,
                rate_limit_requests,
                ..ScanConfig::default()
            };
            run_scan(target, out, cfg).await
        }
    }
}

async fn run_scan(target: String, out: String, cfg: ScanConfig) -> anyhow::Result<()> {
    // Empty input is a fatal precondition failure, checked before any
    // output is touched.
    let targets = utils::read_targets(&target)?;

    let out_dir = PathBuf::from(&out);
    utils::ensure_dir(&out_dir)?;

    tracing::info!(input = %target, targets = targets.len(), concurrency = cfg.concurrency, checks = cfg.run_checks, "Starting scan");
    println!("[>] Targets: {}", targets.len());
    println!("[~] Concurrency: {}, timeout: {}s", cfg.concurrency, cfg.timeout_secs);
    if cfg.run_checks {
        println!("[·] Active probe checks enabled");
    }

    let client = fetch::build_client(cfg.timeout_secs);
    let cancel = CancellationToken::new();
    {
        // ctrl-c stops submitting new work; in-flight requests drain
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                eprintln!("\n[!] Interrupt received, draining in-flight requests...");
                cancel.cancel();
            }
        });
    }

    let mut aggregator = Aggregator::new();

    // Phase 1: fetch + passive extraction. Workers hand completed
    // FetchResults back over the channel; only this task folds.
    let progress = ProgressBar::new(targets.len() as u64);
    progress.set_style(
        ProgressStyle::with_template("{spinner} [{bar:40}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar()),
    );
    progress.set_message("fetching");

    let mut fetched = fetch::spawn_batch(
        client.clone(),
        targets.clone(),
        cfg.concurrency,
        cfg.request_timeout(),
        cancel.clone(),
    );
    while let Some(result) = fetched.recv().await {
        if let Some(error) = &result.error {
            tracing::debug!(url = %result.url, %error, "fetch failed");
        }
        aggregator.fold_extraction(extract_from_fetch(&result));
        progress.inc(1);
    }
    progress.finish_and_clear();

    // Phase 2: active probe checks, same pool discipline.
    if cfg.run_checks && !cancel.is_cancelled() {
        let progress = ProgressBar::new(targets.len() as u64);
        progress.set_style(
            ProgressStyle::with_template("{spinner} [{bar:40}] {pos}/{len} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar()),
        );
        progress.set_message("probing");

        let mut probed = probe::spawn_checks(
            client.clone(),
            targets.clone(),
            Arc::new(cfg.clone()),
            cancel.clone(),
        );
        while let Some(findings) = probed.recv().await {
            aggregator.fold_findings(findings);
            progress.inc(1);
        }
        progress.finish_and_clear();
    }

    let report = aggregator.finalize();
    write_reports(&report, &out_dir)?;

    println!("\n[*] Scan complete: {} units processed, {} findings", report.units_scanned, report.findings_total);
    for (severity, count) in report.summary_counters() {
        if severity != "total" {
            println!("    {severity:<8} {count}");
        }
    }
    println!("[*] Unique endpoints: {}", report.endpoints.len());
    println!("[*] Results written to {}", out_dir.display());
    tracing::info!(findings = report.findings_total, endpoints = report.endpoints.len(), "Scan finished");

    Ok(())
}
