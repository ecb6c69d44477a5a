//! gem2site - gemtext to static HTML site generator
//!
//! A CLI tool that mirrors a directory of gemtext documents as HTML pages.

#![deny(unsafe_code)]
#![cfg_attr(all(not(debug_assertions), not(test)), deny(clippy::all))]

use anyhow::{bail, Context, Result};
use clap::Parser;
use gem2site::cli::Cli;
use gem2site::site_config::{RenderConfig, SiteConfig};
use gem2site::{templates, CancellationToken, ConversionReport, SiteBuilder};

/// Main entry point for the gem2site CLI application
fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {:?}", e);
        std::process::exit(1);
    }
}

/// Run the CLI application
fn run() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if cli.dump {
        println!("{}", templates::dump_defaults());
        return Ok(());
    }

    let (Some(source), Some(dest)) = (cli.source.as_ref(), cli.dest.as_ref()) else {
        bail!("Usage: gem2site [OPTIONS] <SOURCE> <DEST>");
    };

    let file_config = match &cli.config {
        Some(path) => SiteConfig::load(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => SiteConfig::default(),
    };
    let config = RenderConfig::resolve(file_config, cli.overrides())
        .context("Failed to resolve site configuration")?;

    let builder = SiteBuilder::new(config).context("Failed to prepare page template")?;
    warn_on_unknown_style(&builder);

    println!("Building site...");
    println!("Source: {}", source.display());
    println!("Destination: {}", dest.display());

    let report = builder
        .convert_tree(source, dest, &CancellationToken::new())
        .with_context(|| format!("Failed to convert {}", source.display()))?;

    print_report(&report, cli.verbose);

    if !report.is_success() {
        bail!("{} files failed to convert", report.failed.len());
    }

    println!("\n✓ Build completed successfully!");
    Ok(())
}

/// Initialize logging: warnings by default, info with --verbose, RUST_LOG wins
fn init_logging(verbose: bool) {
    let level = if verbose {
        log::LevelFilter::Info
    } else {
        log::LevelFilter::Warn
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();
}

/// Warn when the requested highlight style will fall back to the default theme
fn warn_on_unknown_style(builder: &SiteBuilder) {
    let (Some(highlighter), Some(style)) = (
        builder.highlighter(),
        builder.config().highlight_style.as_deref(),
    ) else {
        return;
    };

    if !highlighter.theme_names().any(|name| name == style) {
        let known: Vec<&str> = highlighter.theme_names().collect();
        log::warn!(
            "Unknown highlight style '{}', falling back to {}. Available: {}",
            style,
            gem2site::highlight::FALLBACK_THEME,
            known.join(", ")
        );
    }
}

/// Print the per-run summary
fn print_report(report: &ConversionReport, verbose: bool) {
    if verbose {
        for path in &report.skipped {
            println!("  skipped {}", path.display());
        }
    }

    for failure in &report.failed {
        eprintln!("✗ {}: {}", failure.source.display(), failure.error);
    }

    println!("\n{}", report.summary());
}
