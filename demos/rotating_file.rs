//! Async dispatch into a size-rotating file.
//!
//! The tiny maxsize forces a rotation mid-run; the archive appears next to
//! the active file as `rotating-<yesterday>.log`.

use logpipe::prelude::*;

fn main() {
    let logger = Logger::new(64);
    logger
        .set_logger(
            "file",
            r#"{"filename":"rotating.log","maxsize":512,"daily":false}"#,
        )
        .expect("failed to install file adapter");
    logger.async_mode();

    for i in 0..50 {
        logger.informational(&format!("async message {i} heading for the queue"));
    }

    // Drains the queue, flushes and destroys the adapter.
    logger.close();
    println!("wrote rotating.log (plus an archive once 512 bytes were crossed)");
}
