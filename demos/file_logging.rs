//! File logging example
//!
//! Demonstrates logging to the console and a rotating JSON file at once.
//!
//! Run with: cargo run --example file_logging

use teelog::prelude::*;

fn main() -> Result<()> {
    println!("=== teelog - File Logging Example ===\n");

    let options = Options::default()
        .with_console_level("info")
        .with_file("logs")
        .with_file_level("debug")
        .with_rotation(10, 7, 3)
        .with_compress(true);

    let errs = options.validate();
    if !errs.is_empty() {
        eprintln!("invalid options: {}", errs);
        return Err(LoggerError::Multiple(errs));
    }

    let logger = Logger::try_new(options)?;

    println!("1. Logging to both console and file:");
    logger.info("Application started");
    logger.debug("Loading configuration...");
    logger.info("Configuration loaded successfully");
    logger.warn("Using default settings for some options");
    logger.error_fields(
        "Failed to load optional plugin",
        [Field::string("plugin", "metrics")],
    );

    println!("\n2. Performing some operations:");
    for i in 1..=5 {
        logger.info_fields("Processing item", [Field::int("item", i), Field::int("of", 5)]);
        if i == 3 {
            logger.warn("Item 3 took longer than expected");
        }
    }

    logger.info("All operations completed");

    let path = logger
        .encoded_filename()
        .map(|p| p.display().to_string())
        .unwrap_or_default();
    logger.close()?;

    println!("\n=== Example completed successfully! ===");
    println!("Check '{}' for the full log output", path);

    Ok(())
}
