//! TUI module for the interactive schedule browser.
//!
//! Uses `ratatui` + `crossterm` for rendering.

use std::sync::atomic::{AtomicBool, Ordering};

mod browser;
/// Browser state types.
pub mod state;
mod ui;

pub use browser::run_browser;

/// Set while the browser owns the terminal.
static SCREEN_ACTIVE: AtomicBool = AtomicBool::new(false);

/// Whether the browser currently owns the terminal.
///
/// Console log output is muted while this is `true`.
pub fn screen_active() -> bool {
    SCREEN_ACTIVE.load(Ordering::Relaxed)
}

/// Marks the terminal as owned by the browser until dropped.
#[derive(Debug)]
struct ScreenGuard;

impl ScreenGuard {
    fn acquire() -> Self {
        SCREEN_ACTIVE.store(true, Ordering::Relaxed);
        Self
    }
}

impl Drop for ScreenGuard {
    fn drop(&mut self) {
        SCREEN_ACTIVE.store(false, Ordering::Relaxed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_screen_guard_mutes_console_while_held() {
        // Arrange
        assert!(!screen_active());

        // Act
        let guard = ScreenGuard::acquire();
        let while_held = screen_active();
        drop(guard);

        // Assert
        assert!(while_held);
        assert!(!screen_active());
    }
}
