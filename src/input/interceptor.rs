use tracing::{debug, info, warn};

use crate::input::capture::{CaptureState, HotkeyCapture, InterceptionMode, CAPTURE_TITLE};
use crate::input::fallback::FallbackRegistrar;
use crate::input::injector::Paste;
use crate::input::keys::VirtualKey;

/// Keyboard message identifiers delivered to a `WH_KEYBOARD_LL` hook
pub mod message {
    /// `WM_KEYDOWN`
    pub const KEYDOWN: u32 = 0x0100;
    /// `WM_KEYUP`
    pub const KEYUP: u32 = 0x0101;
    /// `WM_SYSKEYDOWN` (F10, or any key while Alt is held)
    pub const SYSKEYDOWN: u32 = 0x0104;
    /// `WM_SYSKEYUP`
    pub const SYSKEYUP: u32 = 0x0105;
}

/// Key transition reported by the OS
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyEventKind {
    /// Key pressed (including system key-downs such as F10)
    Down,
    /// Key released
    Up,
}

/// One system-wide keyboard event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    /// Virtual-key code of the key
    pub key: VirtualKey,
    /// Press or release
    pub kind: KeyEventKind,
}

impl KeyEvent {
    /// Key-down of `key`
    #[must_use]
    pub const fn down(key: VirtualKey) -> Self {
        Self {
            key,
            kind: KeyEventKind::Down,
        }
    }

    /// Key-up of `key`
    #[must_use]
    pub const fn up(key: VirtualKey) -> Self {
        Self {
            key,
            kind: KeyEventKind::Up,
        }
    }

    /// Map a hook message and virtual-key code to an event.
    ///
    /// Unknown messages and the reserved codes 0 and 255 yield `None`.
    #[must_use]
    pub fn from_hook(msg: u32, vk_code: u32) -> Option<Self> {
        let kind = match msg {
            message::KEYDOWN | message::SYSKEYDOWN => KeyEventKind::Down,
            message::KEYUP | message::SYSKEYUP => KeyEventKind::Up,
            _ => return None,
        };
        Some(Self {
            key: VirtualKey::new(vk_code)?,
            kind,
        })
    }
}

/// What the interceptor wants done with an event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// Adopt the key as the new hotkey
    Capture(VirtualKey),
    /// Type the clipboard
    Paste,
    /// Leave the event alone
    PassThrough,
}

/// Whether the event continues down the hook chain
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    /// Swallow the event; no other application sees it
    Consume,
    /// Hand the event to the next hook unchanged
    PassThrough,
}

/// Pure interception rule.
///
/// While capturing every key-down is captured. While idle only a key-down
/// of the bound key pastes. Everything else passes through.
#[must_use]
pub fn decide(state: CaptureState, binding: VirtualKey, event: KeyEvent) -> Decision {
    match (state, event.kind) {
        (CaptureState::Capturing, KeyEventKind::Down) => Decision::Capture(event.key),
        (CaptureState::Idle, KeyEventKind::Down) if event.key == binding => Decision::Paste,
        _ => Decision::PassThrough,
    }
}

/// Process-wide context: capture state machine, binding and injector.
///
/// Everything the keyboard hook, fallback trigger and tray commands touch
/// lives here and is only used from the dispatch thread.
pub struct Klipboard {
    capture: HotkeyCapture,
    injector: Box<dyn Paste>,
}

impl Klipboard {
    /// Bundle the state machine with the injector it drives
    pub fn new(capture: HotkeyCapture, injector: Box<dyn Paste>) -> Self {
        info!(
            hotkey = %capture.binding(),
            mode = ?capture.mode(),
            "klipboard context ready"
        );
        Self { capture, injector }
    }

    /// Capture state machine
    #[must_use]
    pub const fn capture(&self) -> &HotkeyCapture {
        &self.capture
    }

    /// Interception mode fixed at startup
    #[must_use]
    pub const fn mode(&self) -> InterceptionMode {
        self.capture.mode()
    }

    /// Handle one raw key event from the keyboard hook.
    ///
    /// Runs synchronously on the dispatch thread; a paste types the whole
    /// clipboard before returning.
    pub fn on_key_event(&mut self, event: KeyEvent) -> Disposition {
        match decide(self.capture.state(), self.capture.binding(), event) {
            Decision::Capture(key) => {
                self.capture.on_key_captured(key);
                Disposition::Consume
            }
            Decision::Paste => {
                debug!(hotkey = %event.key, "hotkey pressed");
                self.injector.paste();
                Disposition::Consume
            }
            Decision::PassThrough => Disposition::PassThrough,
        }
    }

    /// Handle a fallback trigger notification carrying `id`.
    ///
    /// Only the paste branch applies: the fallback has no raw key stream.
    pub fn on_fallback_trigger(&mut self, id: u32) {
        let ours = self
            .capture
            .fallback()
            .is_some_and(|fallback| fallback.is_trigger(id));
        if !ours {
            debug!(id, "foreign hotkey trigger (ignored)");
            return;
        }

        if self.capture.state() == CaptureState::Idle {
            debug!(hotkey = %self.capture.binding(), "fallback hotkey triggered");
            self.injector.paste();
        }
    }

    /// "Change Hotkey" command.
    ///
    /// Refused in `PolledFallback` mode, where no key stream exists to capture
    /// from. Returns whether capture mode is now pending.
    pub fn begin_capture(&mut self) -> bool {
        match self.capture.mode() {
            InterceptionMode::PrivilegedHook => {
                self.capture.begin_capture();
                self.capture.state() == CaptureState::Capturing
            }
            InterceptionMode::PolledFallback => {
                warn!("hotkey capture unavailable without the keyboard hook");
                self.capture.notify(
                    CAPTURE_TITLE,
                    "Changing the hotkey needs the keyboard hook, which is unavailable",
                );
                false
            }
        }
    }

    /// Startup confirmation naming the active hotkey.
    ///
    /// In fallback mode without a working registration the user is told
    /// that the hotkey is dead instead.
    pub fn announce(&self) {
        let binding = self.capture.binding();
        let message = match self.capture.mode() {
            InterceptionMode::PrivilegedHook => {
                format!("Klipboard is running. Press {binding} to type the clipboard.")
            }
            InterceptionMode::PolledFallback => {
                if self.capture.fallback().and_then(FallbackRegistrar::active).is_some() {
                    format!(
                        "Klipboard is running in fallback mode. Press {binding} to type the clipboard."
                    )
                } else {
                    warn!(hotkey = %binding, "no hotkey is active");
                    format!(
                        "Klipboard could not register {binding} as a hotkey. \
                         Run it with keyboard hook access to use or change the hotkey."
                    )
                }
            }
        };
        self.capture.notify("Klipboard", &message);
    }
}
