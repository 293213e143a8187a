// src/main.rs
// =============================================================================
// This is the entry point of our CLI application.
//
// What happens here:
// 1. Set up logging (tracing, filtered by RUST_LOG, default "info")
// 2. Parse command-line arguments using clap
// 3. Dispatch to the appropriate subcommand handler
// 4. Print the results
// 5. Exit with proper code (0 = success, 1 = finished with faults, 2 = error)
//
// Progress ("finish with 3", saved image paths, warnings) goes to stderr
// through tracing; results go to stdout so they can be piped.
// =============================================================================

// Module declarations - tells Rust about our other source files
mod analytics;     // src/analytics.rs - price summaries
mod catalog;       // src/catalog/ - Item and HTML extraction
mod cli;           // src/cli.rs - command-line parsing
mod config;        // src/config.rs - validated crawl settings
mod crawl;         // src/crawl/ - fetching, batching, crawl orchestration
mod error;         // src/error.rs - CrawlError
mod saver;         // src/saver/ - dry-run and on-disk image savers

#[cfg(test)]
mod testing;

use anyhow::Result;
use clap::Parser;
use serde::Serialize;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

use analytics::Summary;
use catalog::Item;
use cli::{CatalogArgs, Cli, Commands, ImageArgs};
use crawl::{Catalog, CatalogCrawler, Fault, HttpFetcher, PageFetcher, SaveReport};
use saver::{DiskSaver, ImageSaver, LogSaver};

#[tokio::main]
async fn main() {
    init_logging();

    let exit_code = match run().await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            2
        }
    };

    std::process::exit(exit_code);
}

fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
}

// Returns:
//   Ok(0) = everything crawled (and saved) cleanly
//   Ok(1) = finished, but some pages, products or images failed
//   Err   = the crawl could not run at all
async fn run() -> Result<i32> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Crawl { catalog, json } => handle_crawl(&catalog, json).await,
        Commands::Stats { catalog, json } => handle_stats(&catalog, json).await,
        Commands::Images { catalog, images } => handle_images(&catalog, &images).await,
        Commands::Run { catalog, images } => handle_run(&catalog, &images).await,
    }
}

// Builds the crawler and the fetcher it uses (the disk saver shares it)
fn build_crawler(args: &CatalogArgs) -> Result<(CatalogCrawler, Arc<dyn PageFetcher>)> {
    let config = args.to_config()?;
    let fetcher: Arc<dyn PageFetcher> = Arc::new(HttpFetcher::new(config.unit_timeout)?);

    println!("🔍 Crawling catalog: {}", config.page_url(0));
    println!("📦 Batch size: {}", config.batch_size);

    Ok((CatalogCrawler::new(config, Arc::clone(&fetcher)), fetcher))
}

fn build_saver(args: &ImageArgs, fetcher: Arc<dyn PageFetcher>) -> Arc<dyn ImageSaver> {
    if args.dry_run {
        Arc::new(LogSaver::new(&args.dir))
    } else {
        Arc::new(DiskSaver::new(&args.dir, fetcher))
    }
}

// Handles the 'crawl' subcommand
async fn handle_crawl(args: &CatalogArgs, json: bool) -> Result<i32> {
    let (crawler, _) = build_crawler(args)?;
    let catalog = crawler.start().await?;

    if json {
        let output = CrawlOutput {
            items: &catalog.items,
            faults: catalog.faults.iter().map(describe_fault).collect(),
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        print_items(&catalog.items);
        print_faults(&catalog.faults);
    }

    Ok(exit_code(catalog, None))
}

// Handles the 'stats' subcommand
async fn handle_stats(args: &CatalogArgs, json: bool) -> Result<i32> {
    let (crawler, _) = build_crawler(args)?;
    let summary = crawler.summary().await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        print_summary(&summary);
    }

    Ok(exit_code(crawler.start().await?, None))
}

// Handles the 'images' subcommand
async fn handle_images(args: &CatalogArgs, images: &ImageArgs) -> Result<i32> {
    let (crawler, fetcher) = build_crawler(args)?;
    let report = crawler.save_images(build_saver(images, fetcher)).await?;

    print_save_report(&report, images);

    Ok(exit_code(crawler.start().await?, Some(&report)))
}

// Handles the 'run' subcommand: crawl, save images, then the summary
async fn handle_run(args: &CatalogArgs, images: &ImageArgs) -> Result<i32> {
    let (crawler, fetcher) = build_crawler(args)?;

    let catalog = crawler.start().await?;
    println!("📄 Crawled {} item(s)", catalog.items.len());
    print_faults(&catalog.faults);

    let report = crawler.save_images(build_saver(images, fetcher)).await?;
    print_save_report(&report, images);

    println!("Overall mid price: {}", crawler.overall_mid_price().await?);
    let most_expensive = crawler.most_expensive().await?;
    println!(
        "Most expensive: {}, av_price: {}",
        most_expensive.display_name(),
        most_expensive.mid_price
    );
    let cheapest = crawler.cheapest().await?;
    println!("Cheapest: {}, av_price: {}", cheapest.display_name(), cheapest.mid_price);
    println!("Done");

    Ok(exit_code(catalog, Some(&report)))
}

fn exit_code(catalog: &Catalog, report: Option<&SaveReport>) -> i32 {
    let save_failed = report.map_or(false, |r| !r.failures.is_empty());
    if catalog.faults.is_empty() && !save_failed {
        0
    } else {
        1
    }
}

#[derive(Serialize)]
struct CrawlOutput<'a> {
    items: &'a [Item],
    faults: Vec<String>,
}

fn describe_fault(fault: &Fault) -> String {
    match fault.position {
        Some(position) => format!("page {}, product {}: {}", fault.page, position, fault.error),
        None => format!("page {}: {}", fault.page, fault.error),
    }
}

// Prints items as a human-readable table
fn print_items(items: &[Item]) {
    println!("{:<50} {:<30} {:>8} {:>8} {:>8}", "NAME", "FILE", "MIN", "MID", "MAX");
    println!("{}", "=".repeat(108));

    for item in items {
        // Truncate long names so the columns line up
        let name: String = if item.display_name().chars().count() > 47 {
            format!("{}...", item.display_name().chars().take(47).collect::<String>())
        } else {
            item.display_name().to_string()
        };

        println!(
            "{:<50} {:<30} {:>8} {:>8} {:>8}",
            name, item.filename, item.min_price, item.mid_price, item.max_price
        );
    }

    println!();
    println!("📊 Total: {} item(s)", items.len());
}

fn print_faults(faults: &[Fault]) {
    if faults.is_empty() {
        return;
    }

    println!("⚠️  {} fault(s):", faults.len());
    for fault in faults {
        println!("   {}", describe_fault(fault));
    }
}

fn print_summary(summary: &Summary) {
    println!(
        "Cheapest: {}, av_price: {}",
        summary.cheapest.display_name(),
        summary.cheapest.mid_price
    );
    println!(
        "Most expensive: {}, av_price: {}",
        summary.most_expensive.display_name(),
        summary.most_expensive.mid_price
    );
    println!("Overall mid price: {}", summary.overall_mid_price);
}

fn print_save_report(report: &SaveReport, images: &ImageArgs) {
    let verb = if images.dry_run { "Listed" } else { "Saved" };
    println!("💾 {} {} image(s) in {}", verb, report.saved, images.dir.display());

    for failure in &report.failures {
        println!("   ❌ item {}: {}", failure.item, failure.error);
    }
}
