//! Basic logger usage example
//!
//! Demonstrates fluent events, context loggers, the macros and the global logger.
//!
//! Run with: cargo run --example basic_usage

use rust_structured_logger::prelude::*;
use rust_structured_logger::{info, warn};
use std::time::Duration;

fn main() -> Result<()> {
    println!("=== Rust Structured Logger - Basic Usage Example ===\n");

    let logger = Logger::from_config(Config::development())?;

    println!("1. Logging at different levels:");
    logger.debug().msg("This is a debug message");
    logger.info().msg("This is an info message");
    logger.warn().msg("This is a warning message");
    logger.error().msg("This is an error message");

    println!("\n2. Typed fields:");
    logger
        .info()
        .str("user", "alice")
        .int("attempt", 2)
        .bool("mfa", true)
        .dur("elapsed", Duration::from_millis(42))
        .msg("user logged in");

    let err = std::io::Error::new(std::io::ErrorKind::NotFound, "config.toml missing");
    logger.error().err(&err).msg("falling back to defaults");

    println!("\n3. Context loggers:");
    let request = logger.with(vec![
        Field::string("request_id", "req-7f3a"),
        Field::string("service", "billing"),
    ]);
    request.info().int("status", 200).msg("request served");
    request.with(vec![Field::int("retry", 1)]).warn().msg("upstream slow");

    println!("\n4. Macros:");
    let port = 8080;
    info!(logger, "Server listening on port {}", port);
    warn!(logger, "{} connections pending", 3);

    println!("\n5. Global logger:");
    set_global(Logger::new(StreamHandler::console(LogLevel::Warn).into_arc()));
    global().info().msg("hidden below WARN");
    global().warn().msg("visible through the global logger");

    println!("\n=== Example completed successfully! ===");

    Ok(())
}
