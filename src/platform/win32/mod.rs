//! Win32 glue around the platform-neutral core.
//!
//! Everything here runs on the one thread that owns the message loop.

/// Clipboard access
pub mod clipboard;
/// Low-level keyboard hook
pub mod hook;
/// `RegisterHotKey` fallback via `global-hotkey`
pub mod hotkey;
/// Unicode keystroke injection
pub mod sendinput;
/// Tray icon, menu and notifications
pub mod tray;

use global_hotkey::{GlobalHotKeyEvent, HotKeyState};
use tray_icon::menu::MenuEvent;
use windows::Win32::UI::WindowsAndMessaging::{
    DispatchMessageW, GetMessageW, PostQuitMessage, TranslateMessage, MSG,
};

use crate::input::interceptor::Klipboard;
use crate::platform::context;
use tray::{TrayCommand, TrayManager};

/// Pump the thread's message queue until "Exit" posts `WM_QUIT`.
///
/// Hook callbacks, tray menu events and fallback hotkey triggers are all
/// handled here, one at a time, each to completion.
pub fn run_message_loop(tray: Option<&TrayManager>) {
    let mut msg = MSG::default();
    // GetMessageW: 0 on WM_QUIT, -1 on error
    while unsafe { GetMessageW(&mut msg, None, 0, 0) }.0 > 0 {
        unsafe {
            let _ = TranslateMessage(&msg);
            DispatchMessageW(&msg);
        }
        drain_menu_events(tray);
        drain_hotkey_events();
    }
    tracing::info!("message loop finished");
}

fn drain_menu_events(tray: Option<&TrayManager>) {
    while let Ok(event) = MenuEvent::receiver().try_recv() {
        match tray.and_then(|tray| tray.command_for(&event)) {
            Some(TrayCommand::ChangeHotkey) => {
                context::with(Klipboard::begin_capture);
            }
            Some(TrayCommand::Exit) => {
                tracing::info!("exit requested from tray");
                unsafe { PostQuitMessage(0) };
            }
            None => {}
        }
    }
}

fn drain_hotkey_events() {
    while let Ok(event) = GlobalHotKeyEvent::receiver().try_recv() {
        if matches!(event.state, HotKeyState::Pressed) {
            context::with(|klipboard| klipboard.on_fallback_trigger(event.id));
        }
    }
}
