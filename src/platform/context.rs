//! The one process-wide binding of the `Klipboard` context.
//!
//! `WH_KEYBOARD_LL` callbacks carry no user data, so the hook reaches the
//! context through this accessor. The hook runs on the thread that installed
//! it, which is also the message-loop thread, hence a thread-local.

use std::cell::RefCell;

use crate::input::interceptor::Klipboard;

thread_local! {
    static CONTEXT: RefCell<Option<Klipboard>> = const { RefCell::new(None) };
}

/// Make `klipboard` reachable from callbacks on this thread
pub fn bind(klipboard: Klipboard) {
    CONTEXT.with(|cell| *cell.borrow_mut() = Some(klipboard));
}

/// Take the context back, e.g. to drop it before shutdown
pub fn unbind() -> Option<Klipboard> {
    CONTEXT.with(|cell| cell.borrow_mut().take())
}

/// Run `f` against the bound context.
///
/// Returns `None` when nothing is bound or the context is already in use
/// further up the stack (a nested callback); callers treat that as
/// "not handled".
pub fn with<R>(f: impl FnOnce(&mut Klipboard) -> R) -> Option<R> {
    CONTEXT.with(|cell| {
        let mut guard = cell.try_borrow_mut().ok()?;
        guard.as_mut().map(f)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MockHotkeyStore;
    use crate::input::capture::{CaptureState, HotkeyCapture, InputSource};
    use crate::input::injector::MockPaste;
    use crate::input::keys::VirtualKey;
    use crate::notify::LogNotifier;

    fn klipboard() -> Klipboard {
        let mut store = MockHotkeyStore::new();
        store.expect_load().return_const(VirtualKey::F8);
        let capture = HotkeyCapture::new(Box::new(store), Box::new(LogNotifier), InputSource::Hook);
        Klipboard::new(capture, Box::new(MockPaste::new()))
    }

    // Each #[test] runs on its own thread, so every test starts unbound

    #[test]
    fn test_with_nothing_bound_is_none() {
        assert_eq!(with(|klipboard| klipboard.capture().binding()), None);
    }

    #[test]
    fn test_bind_then_unbind() {
        bind(klipboard());
        assert_eq!(with(|klipboard| klipboard.capture().binding()), Some(VirtualKey::F8));
        assert!(unbind().is_some());
        assert!(unbind().is_none());
        assert_eq!(with(|klipboard| klipboard.capture().binding()), None);
    }

    #[test]
    fn test_nested_with_is_refused() {
        bind(klipboard());
        let nested = with(|outer| {
            outer.begin_capture();
            with(|inner| inner.capture().state())
        });
        assert_eq!(nested, Some(None));

        // The outer call still completed and released the borrow
        assert_eq!(with(|klipboard| klipboard.capture().state()), Some(CaptureState::Capturing));
        drop(unbind());
    }
}
