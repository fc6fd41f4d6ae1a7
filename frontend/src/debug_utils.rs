// Console logging helpers
//
// Pointer handlers fire on every mouse move; anything logged from there goes
// through `debug_throttled` so the console stays readable.

use std::sync::atomic::{AtomicUsize, Ordering};

static LOG_COUNT: AtomicUsize = AtomicUsize::new(0);
const MAX_LOGS_PER_WINDOW: usize = 5;
const WINDOW_SIZE: usize = 100;

// ===== DEBUG FLAGS =====
pub const DEBUG_DASHBOARD: bool = false; // Shell events and rebuilds
pub const DEBUG_ROUTING: bool = false; // Route changes and guard decisions
pub const DEBUG_HOVER: bool = false; // Pointer hit testing

/// Logs only while `flag` is set.
pub fn debug_flagged(flag: bool, message: &str) {
    if flag {
        zoon::println!("[DEBUG] {}", message);
    }
}

/// Throttled logging: the first 5 out of every 100 calls are printed.
pub fn debug_throttled(message: &str) {
    let count = LOG_COUNT.fetch_add(1, Ordering::Relaxed) % WINDOW_SIZE;

    if count < MAX_LOGS_PER_WINDOW {
        zoon::println!("[THROTTLED] {}", message);
    } else if count == MAX_LOGS_PER_WINDOW {
        zoon::println!("[THROTTLED] Log rate limit reached, suppressing further messages...");
    }
}

/// Always printed; for errors and important state changes only.
pub fn debug_critical(message: &str) {
    zoon::println!("[CRITICAL] {}", message);
}
