//! Basic logger usage example
//!
//! Demonstrates console logging at every level and the three call styles.
//!
//! Run with: cargo run --example basic_usage

use teelog::prelude::*;

fn main() -> Result<()> {
    println!("=== teelog - Basic Usage Example ===\n");

    let logger = Logger::try_new(
        Options::default()
            .with_console_level("debug")
            .with_console_caller(true),
    )?;

    println!("1. Logging at different levels:");
    logger.debug("This is a debug message");
    logger.info("This is an info message");
    logger.warn("This is a warning message");
    logger.error("This is an error message");

    println!("\n2. Three call styles:");
    logger.info_fields(
        "request served",
        [Field::int("status", 200), Field::string("path", "/api/users")],
    );
    logger.info_fmt(format_args!("processed {} items in {} ms", 128, 42));
    logger.info_kv("user logged in", kv!["user", "alice", "attempts", 1]);

    println!("\n3. Child loggers:");
    let db = logger.named("db").with_values([Field::string("pool", "primary")]);
    db.info("connection established");
    db.warn_fmt(format_args!("query took {} ms", 1200));

    println!("\n4. The global logger:");
    teelog::configure(Options::default().with_console_level("info"));
    teelog::info("via the global logger");
    infof!("formatted {} via macro", "message");
    teelog::debug("hidden at info level");

    println!("\n=== Example completed successfully! ===");

    logger.close()
}
