//! Klipboard - types the clipboard into the focused window on a hotkey
//!
//! This library exports the platform-neutral core for testing; the Win32
//! glue lives under `platform`.

/// Configuration file and hotkey persistence
pub mod config;
/// Keyboard interception, hotkey capture and clipboard injection
pub mod input;
/// Notification seam towards the tray
pub mod notify;
/// OS-specific glue
#[allow(unsafe_code)]
pub mod platform;
/// Logging setup
pub mod telemetry;
