//! Daily rotation example
//!
//! Demonstrates one file per calendar day with retention cleanup. A fixed
//! clock is advanced past midnight to show the switch to a new file.
//!
//! Run with: cargo run --example daily_rotation

use chrono::{Duration, Local, TimeZone};
use rust_structured_logger::prelude::*;
use rust_structured_logger::FixedClock;
use std::sync::Arc;

fn main() -> Result<()> {
    println!("=== Rust Structured Logger - Daily Rotation Example ===\n");

    let start = Local
        .with_ymd_and_hms(2025, 11, 17, 23, 59, 0)
        .single()
        .ok_or_else(|| LoggerError::config("clock", "ambiguous local time"))?;
    let clock = Arc::new(FixedClock::new(start));

    let handler = DailyFileHandler::builder("demo-logs/daily")
        .prefix("myservice")
        .retention_days(7)
        .clock(clock.clone())
        .build()?;
    println!("Writing to {:?}", handler.current_path());

    let logger = Logger::from_handler(handler);
    logger.info().msg("last entry of the day");

    clock.advance(Duration::minutes(2));
    logger.info().msg("first entry of the next day");

    logger.close()?;

    println!("\n=== Example completed successfully! ===");
    println!("Check demo-logs/daily for myservice-2025-11-17.log and myservice-2025-11-18.log.");

    Ok(())
}
