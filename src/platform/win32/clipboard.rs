use std::slice;

use windows::Win32::Foundation::{HGLOBAL, HWND};
use windows::Win32::System::DataExchange::{CloseClipboard, GetClipboardData, OpenClipboard};
use windows::Win32::System::Memory::{GlobalLock, GlobalSize, GlobalUnlock};
use windows::Win32::System::Ole::CF_UNICODETEXT;

use crate::input::injector::{until_nul, ClipboardError, ClipboardSource};

/// The system clipboard's `CF_UNICODETEXT` payload
#[derive(Debug, Default, Clone, Copy)]
pub struct Win32Clipboard;

/// Open clipboard; closed on drop
struct OpenedClipboard;

impl OpenedClipboard {
    fn open() -> Result<Self, ClipboardError> {
        unsafe { OpenClipboard(HWND::default()) }.map_err(|_| ClipboardError::Busy)?;
        Ok(Self)
    }
}

impl Drop for OpenedClipboard {
    fn drop(&mut self) {
        if let Err(e) = unsafe { CloseClipboard() } {
            tracing::warn!("failed to close clipboard: {}", e);
        }
    }
}

/// Locked global memory block; unlocked on drop
struct LockedText {
    handle: HGLOBAL,
    units: *const u16,
    capacity: usize,
}

impl LockedText {
    fn lock(handle: HGLOBAL) -> Option<Self> {
        let units = unsafe { GlobalLock(handle) }.cast::<u16>().cast_const();
        if units.is_null() {
            return None;
        }
        let capacity = unsafe { GlobalSize(handle) } / 2;
        Some(Self {
            handle,
            units,
            capacity,
        })
    }

    /// Text up to the NUL terminator, never past the block size
    fn text(&self) -> &[u16] {
        // SAFETY: the block stays locked, and therefore valid, while self lives
        until_nul(unsafe { slice::from_raw_parts(self.units, self.capacity) })
    }
}

impl Drop for LockedText {
    fn drop(&mut self) {
        // GlobalUnlock reports an "error" once the lock count reaches zero
        let _ = unsafe { GlobalUnlock(self.handle) };
    }
}

impl ClipboardSource for Win32Clipboard {
    fn with_text(&mut self, read: &mut dyn FnMut(&[u16])) -> Result<(), ClipboardError> {
        let _opened = OpenedClipboard::open()?;

        let handle = unsafe { GetClipboardData(u32::from(CF_UNICODETEXT.0)) }
            .map_err(|_| ClipboardError::NoText)?;
        let locked = LockedText::lock(HGLOBAL(handle.0)).ok_or(ClipboardError::NoText)?;

        read(locked.text());
        Ok(())
    }
}
