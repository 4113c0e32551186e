extern crate anyhow;
extern crate signal_hook;

use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use anyhow::Context;
use signal_hook::consts::signal::{SIGINT, SIGTERM};

/// Sets the returned flag on SIGINT or SIGTERM so the frame loop can
/// finish its current tick and return.
pub fn install_shutdown_handler() -> anyhow::Result<Arc<AtomicBool>> {
    let shutdown = Arc::new(AtomicBool::new(false));

    for signal in &[SIGINT, SIGTERM] {
        signal_hook::flag::register(*signal, Arc::clone(&shutdown))
            .with_context(|| format!("installing handler for signal {}", signal))?;
    }

    return Ok(shutdown);
}
