use windows::Win32::Foundation::{HINSTANCE, LPARAM, LRESULT, WPARAM};
use windows::Win32::System::LibraryLoader::GetModuleHandleW;
use windows::Win32::UI::WindowsAndMessaging::{
    CallNextHookEx, SetWindowsHookExW, UnhookWindowsHookEx, HC_ACTION, HHOOK, KBDLLHOOKSTRUCT,
    WH_KEYBOARD_LL,
};

use crate::input::interceptor::{Disposition, KeyEvent};
use crate::platform::context;

/// Installed `WH_KEYBOARD_LL` hook; unhooked on drop
pub struct KeyboardHook(HHOOK);

impl KeyboardHook {
    /// Install the system-wide low-level keyboard hook on this thread.
    ///
    /// The calling thread must run the message loop, or Windows will time
    /// the hook out.
    ///
    /// # Errors
    /// Returns error if Windows refuses the hook (e.g. insufficient privilege)
    pub fn install() -> windows::core::Result<Self> {
        let module = unsafe { GetModuleHandleW(None) }?;
        let hook = unsafe {
            SetWindowsHookExW(WH_KEYBOARD_LL, Some(keyboard_proc), HINSTANCE::from(module), 0)
        }?;
        tracing::info!("keyboard hook installed");
        Ok(Self(hook))
    }
}

impl Drop for KeyboardHook {
    fn drop(&mut self) {
        if let Err(e) = unsafe { UnhookWindowsHookEx(self.0) } {
            tracing::error!("failed to remove keyboard hook: {}", e);
        }
    }
}

/// Thin shim: decide via the context, map `PassThrough` to `CallNextHookEx`
unsafe extern "system" fn keyboard_proc(code: i32, wparam: WPARAM, lparam: LPARAM) -> LRESULT {
    #[allow(clippy::cast_possible_wrap)]
    let action = HC_ACTION as i32;
    if code == action {
        // SAFETY: for HC_ACTION, lparam points to a KBDLLHOOKSTRUCT valid for this call
        let data = unsafe { &*(lparam.0 as *const KBDLLHOOKSTRUCT) };
        #[allow(clippy::cast_possible_truncation)]
        let message = wparam.0 as u32;

        if let Some(event) = KeyEvent::from_hook(message, data.vkCode) {
            if context::with(|klipboard| klipboard.on_key_event(event)) == Some(Disposition::Consume) {
                return LRESULT(1);
            }
        }
    }
    unsafe { CallNextHookEx(HHOOK::default(), code, wparam, lparam) }
}
