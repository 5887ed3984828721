//! `skillsync check`: probe every URL the document lists.
//!
//! Each URL is tried as `{url}.md` first and as the bare URL second. The command
//! fails (exit code 1) when any URL answers neither way.
//!
//! ```bash
//! skillsync check
//! skillsync check -f json | jq '.results[] | select(.md_status != 200)'
//! ```

use anyhow::{Result, anyhow};
use clap::Args;
use colored::Colorize;
use skillsync_core::{
    CheckReport, DocumentStore, FileDocumentStore, LinkChecker, SkillConfig, UrlCheck, Verdict,
    extract_document_urls,
};
use tracing::info;

use crate::error::CliError;
use crate::output::{OutputFormat, ProgressDisplay, print_json};
use crate::utils::cli_args::FormatArg;

/// Arguments for `skillsync check`.
#[derive(Args, Clone, Debug)]
pub struct CheckArgs {
    /// Output format
    #[command(flatten)]
    pub format: FormatArg,
}

/// Check the document's links and report.
pub async fn execute(args: &CheckArgs, config: &SkillConfig) -> Result<()> {
    let store = FileDocumentStore::new(&config.document);
    let document = store.read().map_err(CliError::from)?.ok_or_else(|| {
        CliError::not_found(anyhow!(
            "Document '{}' does not exist; run `skillsync sync` first",
            config.document.display()
        ))
    })?;

    let urls = extract_document_urls(&document, &config.base_url, &config.list_tag());
    info!(urls = urls.len(), "Checking document links");

    let checker = LinkChecker::new(&config.check).map_err(CliError::from)?;
    let format = args.format.resolve();

    let report = if format == OutputFormat::Text {
        let pb = ProgressDisplay::bar(urls.len() as u64, "Checking");
        let report = checker
            .check_all_with(&urls, |check| {
                if check.verdict() == Verdict::Broken {
                    pb.suspend(|| print_broken(check));
                }
                pb.inc(1);
            })
            .await;
        pb.finish_and_clear();
        report
    } else {
        checker.check_all(&urls).await
    };

    match format {
        OutputFormat::Json => print_json(&report)?,
        OutputFormat::Text => print_summary(&report, &config.base_url),
    }

    let broken = report.broken();
    if broken > 0 {
        return Err(CliError::internal(anyhow!(
            "{broken} of {} URLs are broken",
            report.total()
        ))
        .into());
    }
    Ok(())
}

fn print_broken(check: &UrlCheck) {
    println!(
        "{} {} (md: {}, plain: {})",
        "BROKEN:".red().bold(),
        check.url,
        check.md_status,
        check
            .plain_status
            .map_or_else(|| "-".to_string(), |s| s.to_string())
    );
}

fn print_summary(report: &CheckReport, base_url: &str) {
    let base = format!("{}/", base_url.trim_end_matches('/'));
    let short = |url: &str| url.strip_prefix(&base).unwrap_or(url).to_string();

    println!();
    println!("{}", "=== SUMMARY ===".bold());
    println!("Total URLs: {}", report.total());
    println!("Working with .md: {}", report.markdown().to_string().green());
    println!("Working without .md only: {}", report.plain_only().to_string().yellow());
    println!("Completely broken: {}", report.broken().to_string().red());

    if report.plain_only() > 0 {
        println!();
        println!("{}", "=== URLs that only work without .md ===".bold());
        for check in report.with_verdict(Verdict::PlainOnly) {
            println!("  {}", short(&check.url));
        }
    }

    if report.broken() > 0 {
        println!();
        println!("{}", "=== BROKEN URLs (neither .md nor plain works) ===".bold());
        for check in report.with_verdict(Verdict::Broken) {
            println!(
                "  {} (md: {}, plain: {})",
                short(&check.url),
                check.md_status,
                check
                    .plain_status
                    .map_or_else(|| "-".to_string(), |s| s.to_string())
            );
        }
    }
}
