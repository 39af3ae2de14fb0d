//! File logging example
//!
//! Demonstrates a size-rotated JSON file mirrored to the console.
//!
//! Run with: cargo run --example file_logging

use rust_structured_logger::prelude::*;

fn main() -> Result<()> {
    println!("=== Rust Structured Logger - File Logging Example ===\n");

    let config = Config::production()
        .with_output_path("demo-logs/application.log")
        .with_level(LogLevel::Debug)
        .with_max_size_mb(1)
        .with_max_backups(3)
        .with_multi_output(true);
    let logger = Logger::from_config(config)?;

    println!("1. Logging to both console and file:");
    logger.info().msg("Application started");
    logger.debug().str("source", "env").msg("Loading configuration");
    logger.warn().msg("Using default settings for some options");
    logger.error().str("plugin", "geoip").msg("Failed to load optional plugin");

    println!("\n2. Performing some operations:");
    let worker = logger.with(vec![Field::string("component", "worker")]);
    for i in 1..=5 {
        worker.info().int("item", i).int("total", 5).msg("Processing item");
        if i == 3 {
            worker.warn().int("item", i).msg("Item took longer than expected");
        }
    }

    logger.close()?;

    println!("\n=== Example completed successfully! ===");
    println!("Check demo-logs/application.log for the JSON output.");

    Ok(())
}
