/// Process-wide context binding for OS callbacks
pub mod context;
/// Win32 keyboard hook, clipboard, `SendInput`, fallback hotkey and tray
#[cfg(windows)]
pub mod win32;
