//! Basic usage: install the file adapter, log at several levels, shut down.

use logpipe::prelude::*;
use logpipe::{informational, warning};

fn main() {
    let logger = Logger::new(1000);
    logger
        .set_logger("file", r#"{"filename":"demo.log"}"#)
        .expect("failed to install file adapter");

    logger.set_level(Level::Informational);
    logger.mark_caller(true);

    informational!(logger, "service started on port {}", 8080);
    warning!(logger, "cache miss rate at {:.1}%", 12.5);
    logger.debug("this one is below the threshold and never rendered");

    logger.close();
    println!("wrote demo.log");
}
