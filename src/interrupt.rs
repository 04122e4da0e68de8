//! SIGINT/SIGTERM handling.
//!
//! The first signal raises a shared flag that the player polls; the run then
//! stops the current track and unwinds normally so the device is released.
//! A second signal exits the process immediately.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::{PlayerError, Result};

/// Exit status used when a second signal forces termination
const FORCED_EXIT_CODE: i32 = 130;

/// Shared cancellation flag
#[derive(Clone, Debug, Default)]
pub struct InterruptFlag(Arc<AtomicBool>);

impl InterruptFlag {
    /// Create a lowered flag
    pub fn new() -> Self {
        Self::default()
    }

    /// Raise the flag. Returns whether it was already raised.
    pub fn raise(&self) -> bool {
        self.0.swap(true, Ordering::SeqCst)
    }

    /// Check whether the flag has been raised
    pub fn is_raised(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Register the process-wide signal handler and return its flag.
///
/// Can only be called once per process.
pub fn install_handler() -> Result<InterruptFlag> {
    let flag = InterruptFlag::new();
    let handler_flag = flag.clone();

    ctrlc::set_handler(move || {
        if handler_flag.raise() {
            eprintln!("\nForced exit.");
            std::process::exit(FORCED_EXIT_CODE);
        }
        eprintln!("\nExiting gracefully...");
    })
    .map_err(|e| PlayerError::InterruptHandler(e.to_string()))?;

    Ok(flag)
}
