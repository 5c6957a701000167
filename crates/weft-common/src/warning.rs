//! Layout warnings with colored terminal output.
//!
//! Recoverable conditions (an unsupported property value, a clipped line,
//! a hyphenation candidate that does not match its word) are reported here
//! instead of failing layout. Each unique message is printed once per
//! process, and every emitted message is also recorded so callers can
//! inspect what happened during a layout pass.

use std::collections::HashSet;
use std::sync::{Mutex, MutexGuard};

/// ANSI color codes for terminal output
const YELLOW: &str = "\x1b[33m";
const RESET: &str = "\x1b[0m";

#[derive(Default)]
struct WarningLog {
    /// Keys of warnings already printed.
    seen: HashSet<String>,
    /// Printed warnings in emission order.
    emitted: Vec<String>,
}

static WARNINGS: Mutex<Option<WarningLog>> = Mutex::new(None);

/// Lock the global log. A poisoned lock only means another thread panicked
/// while holding it; the log itself is still usable.
fn lock() -> MutexGuard<'static, Option<WarningLog>> {
    WARNINGS
        .lock()
        .unwrap_or_else(std::sync::PoisonError::into_inner)
}

/// Warn about a recoverable condition (prints once per unique message).
///
/// # Example
/// ```ignore
/// warn_once("Layout", "percentage font-size is not supported; property ignored");
/// ```
pub fn warn_once(component: &str, message: &str) {
    let key = format!("[{component}] {message}");
    let mut guard = lock();
    let log = guard.get_or_insert_with(WarningLog::default);
    if log.seen.insert(key.clone()) {
        eprintln!("{YELLOW}[Weft {component}] ⚠ {message}{RESET}");
        log.emitted.push(key);
    }
}

/// Return every warning emitted since the last [`clear_warnings`], formatted
/// as `[component] message`.
#[must_use]
pub fn emitted_warnings() -> Vec<String> {
    lock()
        .as_ref()
        .map(|log| log.emitted.clone())
        .unwrap_or_default()
}

/// Clear all recorded warnings (call when starting a new document).
pub fn clear_warnings() {
    if let Some(log) = lock().as_mut() {
        log.seen.clear();
        log.emitted.clear();
    }
}
