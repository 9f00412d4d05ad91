/// Hotkey capture state machine
pub mod capture;
/// Fallback hotkey registration
pub mod fallback;
/// Clipboard-to-keystroke injection
pub mod injector;
/// Keyboard event interception
pub mod interceptor;
/// Virtual-key codes
pub mod keys;
