use thiserror::Error;
use tracing::{debug, info, warn};

/// Why the clipboard could not provide text
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ClipboardError {
    /// Another process holds the clipboard open
    #[error("clipboard is held by another process")]
    Busy,

    /// The clipboard has no Unicode text payload
    #[error("clipboard holds no text")]
    NoText,
}

/// Direction of a synthetic keystroke
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyDirection {
    /// Key pressed
    Down,
    /// Key released
    Up,
}

/// One injected event carrying a UTF-16 code unit as its Unicode payload
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyntheticKey {
    /// UTF-16 code unit typed by this event
    pub unit: u16,
    /// Press or release
    pub direction: KeyDirection,
}

impl SyntheticKey {
    /// Key-down carrying `unit`
    #[must_use]
    pub const fn down(unit: u16) -> Self {
        Self {
            unit,
            direction: KeyDirection::Down,
        }
    }

    /// Key-up carrying `unit`
    #[must_use]
    pub const fn up(unit: u16) -> Self {
        Self {
            unit,
            direction: KeyDirection::Up,
        }
    }
}

/// Scoped, exclusive access to the system clipboard's text
pub trait ClipboardSource {
    /// Acquire the clipboard, hand its text to `read`, release it.
    ///
    /// The text slice is only valid during `read`. Implementations must
    /// release the clipboard on every path, including errors.
    ///
    /// # Errors
    /// Returns error if the clipboard is busy or holds no text
    fn with_text(&mut self, read: &mut dyn FnMut(&[u16])) -> Result<(), ClipboardError>;
}

/// Text in a raw `CF_UNICODETEXT` block: up to the first NUL, or the
/// whole block when the terminator is missing
#[must_use]
pub fn until_nul(block: &[u16]) -> &[u16] {
    let len = block.iter().position(|&unit| unit == 0).unwrap_or(block.len());
    &block[..len]
}

/// Destination for synthetic keystrokes (the system input stream)
pub trait KeystrokeSink {
    /// Inject one event; returns whether the OS accepted it
    fn send(&mut self, key: SyntheticKey) -> bool;
}

/// Anything that can perform the paste action
#[cfg_attr(test, mockall::automock)]
pub trait Paste {
    /// Type the clipboard text; returns the number of events injected
    fn paste(&mut self) -> usize;
}

/// Types the clipboard text as Unicode keystrokes
pub struct ClipboardTextInjector<C, K> {
    clipboard: C,
    sink: K,
}

impl<C: ClipboardSource, K: KeystrokeSink> ClipboardTextInjector<C, K> {
    /// Pair a clipboard with a keystroke sink
    pub const fn new(clipboard: C, sink: K) -> Self {
        Self { clipboard, sink }
    }

    /// Keystroke sink, for inspection
    pub const fn sink(&self) -> &K {
        &self.sink
    }

    /// Type the clipboard text into the focused window.
    ///
    /// Each UTF-16 code unit becomes a key-down followed by a key-up, in
    /// source order, so N units produce exactly 2N events. Busy or empty
    /// clipboards are a silent no-op. Rejected events are not retried.
    pub fn type_clipboard(&mut self) -> usize {
        let sink = &mut self.sink;
        let mut sent = 0_usize;
        let mut rejected = 0_usize;

        let outcome = self.clipboard.with_text(&mut |text| {
            debug!(units = text.len(), "clipboard text acquired");
            for &unit in text {
                for key in [SyntheticKey::down(unit), SyntheticKey::up(unit)] {
                    if !sink.send(key) {
                        rejected += 1;
                    }
                    sent += 1;
                }
            }
        });

        match outcome {
            Ok(()) => {
                if rejected > 0 {
                    warn!(rejected, sent, "OS rejected some synthetic keystrokes");
                }
                info!(events = sent, "clipboard typed");
            }
            Err(e) => debug!(reason = %e, "nothing to type"),
        }
        sent
    }
}

impl<C: ClipboardSource, K: KeystrokeSink> Paste for ClipboardTextInjector<C, K> {
    fn paste(&mut self) -> usize {
        self.type_clipboard()
    }
}
