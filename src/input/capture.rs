use tracing::{debug, error, info, warn};

use crate::config::HotkeyStore;
use crate::input::fallback::FallbackRegistrar;
use crate::input::keys::VirtualKey;
use crate::notify::Notifier;

/// Notification title used for every capture-related message
pub const CAPTURE_TITLE: &str = "Change Hotkey";

/// Hotkey capture state machine states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CaptureState {
    /// Key-downs are matched against the binding
    #[default]
    Idle,
    /// The next key-down becomes the new binding
    Capturing,
}

/// How key events reach the process; fixed at startup
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InterceptionMode {
    /// Low-level keyboard hook sees the raw key stream
    PrivilegedHook,
    /// Only a registered hotkey trigger is delivered
    PolledFallback,
}

/// Where key events come from; decided once at startup
pub enum InputSource {
    /// The low-level keyboard hook is installed
    Hook,
    /// Only a registered hotkey is available; `None` when even the
    /// registration API could not be set up
    Fallback(Option<FallbackRegistrar>),
}

/// Owns the hotkey binding and decides when it may change.
///
/// Cycles `Idle` ⇄ `Capturing` for the lifetime of the process. All calls
/// happen on the dispatch thread, so no locking is involved.
pub struct HotkeyCapture {
    state: CaptureState,
    binding: VirtualKey,
    store: Box<dyn HotkeyStore>,
    notifier: Box<dyn Notifier>,
    mode: InterceptionMode,
    fallback: Option<FallbackRegistrar>,
}

impl HotkeyCapture {
    /// Create the machine in `Idle` with the binding loaded from `store`.
    ///
    /// `source` fixes the interception mode for the life of the machine.
    pub fn new(
        store: Box<dyn HotkeyStore>,
        notifier: Box<dyn Notifier>,
        source: InputSource,
    ) -> Self {
        let binding = store.load();
        info!(hotkey = %binding, "hotkey binding loaded");
        let (mode, fallback) = match source {
            InputSource::Hook => (InterceptionMode::PrivilegedHook, None),
            InputSource::Fallback(fallback) => (InterceptionMode::PolledFallback, fallback),
        };
        Self {
            state: CaptureState::Idle,
            binding,
            store,
            notifier,
            mode,
            fallback,
        }
    }

    /// Current state
    #[must_use]
    pub const fn state(&self) -> CaptureState {
        self.state
    }

    /// Currently bound trigger key
    #[must_use]
    pub const fn binding(&self) -> VirtualKey {
        self.binding
    }

    /// Interception mode chosen at construction
    #[must_use]
    pub const fn mode(&self) -> InterceptionMode {
        self.mode
    }

    /// Fallback registrar; only ever present in `PolledFallback` mode
    #[must_use]
    pub const fn fallback(&self) -> Option<&FallbackRegistrar> {
        self.fallback.as_ref()
    }

    /// Forward a notification to the UI collaborator
    pub fn notify(&self, title: &str, message: &str) {
        self.notifier.notify(title, message);
    }

    /// Start waiting for the next key-down to become the hotkey.
    ///
    /// Returns `false` when a capture was already pending; the pending
    /// capture and the existing binding are left untouched.
    pub fn begin_capture(&mut self) -> bool {
        match self.state {
            CaptureState::Idle => {
                info!("capture requested: Idle → Capturing");
                self.state = CaptureState::Capturing;
                self.notifier.notify(CAPTURE_TITLE, "Press new hotkey");
                true
            }
            CaptureState::Capturing => {
                debug!("capture requested while capturing (ignored)");
                false
            }
        }
    }

    /// Adopt `key` as the new binding and return to `Idle`.
    ///
    /// Ignored unless capturing. Persistence and fallback re-registration
    /// failures are logged and absorbed; the in-memory binding still changes.
    pub fn on_key_captured(&mut self, key: VirtualKey) {
        if self.state != CaptureState::Capturing {
            debug!(key = %key, "key captured while idle (ignored)");
            return;
        }

        let previous = self.binding;
        self.binding = key;
        info!(from = %previous, to = %key, "hotkey captured: Capturing → Idle");

        if let Err(e) = self.store.save(key) {
            warn!(error = %e, "failed to persist hotkey, keeping it for this session");
        }

        self.state = CaptureState::Idle;
        self.notifier
            .notify(CAPTURE_TITLE, &format!("Hotkey changed to {key}"));

        if let Some(fallback) = self.fallback.as_mut() {
            if let Err(e) = fallback.rebind(previous, key) {
                error!(error = %e, hotkey = %key, "fallback hotkey re-registration failed");
            }
        }
    }
}
