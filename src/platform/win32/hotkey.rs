use anyhow::{Context, Result};
use global_hotkey::{
    hotkey::{Code, HotKey},
    GlobalHotKeyManager,
};
use tracing::debug;

use crate::input::fallback::{HotkeyRegistrar, RegistrationError};
use crate::input::keys::VirtualKey;

/// `HotkeyRegistrar` over `global-hotkey` (`RegisterHotKey` on Windows).
///
/// Trigger notifications arrive on `GlobalHotKeyEvent::receiver()` while the
/// creating thread pumps messages.
pub struct GlobalHotkeyRegistrar {
    manager: GlobalHotKeyManager,
    registered: Option<HotKey>,
}

impl GlobalHotkeyRegistrar {
    /// Create the hotkey manager on the message-loop thread
    ///
    /// # Errors
    /// Returns error if the manager's hidden window cannot be created
    pub fn new() -> Result<Self> {
        let manager = GlobalHotKeyManager::new().context("failed to create hotkey manager")?;
        Ok(Self {
            manager,
            registered: None,
        })
    }
}

impl HotkeyRegistrar for GlobalHotkeyRegistrar {
    fn register(&mut self, key: VirtualKey) -> Result<(), RegistrationError> {
        let code = code_for(key).ok_or(RegistrationError::UnsupportedKey(key))?;
        let hotkey = HotKey::new(None, code);
        self.manager
            .register(hotkey)
            .map_err(|e| RegistrationError::Rejected {
                key,
                reason: e.to_string(),
            })?;
        debug!(hotkey = %key, id = hotkey.id(), "hotkey registered");
        self.registered = Some(hotkey);
        Ok(())
    }

    fn unregister(&mut self, key: VirtualKey) -> Result<(), RegistrationError> {
        if let Some(hotkey) = self.registered.take() {
            self.manager
                .unregister(hotkey)
                .map_err(|e| RegistrationError::Unregister {
                    key,
                    reason: e.to_string(),
                })?;
        }
        Ok(())
    }

    fn trigger_id(&self) -> Option<u32> {
        self.registered.map(|hotkey| hotkey.id())
    }
}

/// Physical key code for a virtual-key code, where one exists
#[allow(clippy::too_many_lines)]
const fn code_for(key: VirtualKey) -> Option<Code> {
    Some(match key.code() {
        0x08 => Code::Backspace,
        0x09 => Code::Tab,
        0x0D => Code::Enter,
        0x10 => Code::ShiftLeft,
        0x11 => Code::ControlLeft,
        0x12 => Code::AltLeft,
        0x13 => Code::Pause,
        0x14 => Code::CapsLock,
        0x15 => Code::KanaMode,
        0x1B => Code::Escape,
        0x1C => Code::Convert,
        0x1D => Code::NonConvert,
        0x20 => Code::Space,
        0x21 => Code::PageUp,
        0x22 => Code::PageDown,
        0x23 => Code::End,
        0x24 => Code::Home,
        0x25 => Code::ArrowLeft,
        0x26 => Code::ArrowUp,
        0x27 => Code::ArrowRight,
        0x28 => Code::ArrowDown,
        0x2C => Code::PrintScreen,
        0x2D => Code::Insert,
        0x2E => Code::Delete,
        0x2F => Code::Help,
        0x30 => Code::Digit0,
        0x31 => Code::Digit1,
        0x32 => Code::Digit2,
        0x33 => Code::Digit3,
        0x34 => Code::Digit4,
        0x35 => Code::Digit5,
        0x36 => Code::Digit6,
        0x37 => Code::Digit7,
        0x38 => Code::Digit8,
        0x39 => Code::Digit9,
        0x41 => Code::KeyA,
        0x42 => Code::KeyB,
        0x43 => Code::KeyC,
        0x44 => Code::KeyD,
        0x45 => Code::KeyE,
        0x46 => Code::KeyF,
        0x47 => Code::KeyG,
        0x48 => Code::KeyH,
        0x49 => Code::KeyI,
        0x4A => Code::KeyJ,
        0x4B => Code::KeyK,
        0x4C => Code::KeyL,
        0x4D => Code::KeyM,
        0x4E => Code::KeyN,
        0x4F => Code::KeyO,
        0x50 => Code::KeyP,
        0x51 => Code::KeyQ,
        0x52 => Code::KeyR,
        0x53 => Code::KeyS,
        0x54 => Code::KeyT,
        0x55 => Code::KeyU,
        0x56 => Code::KeyV,
        0x57 => Code::KeyW,
        0x58 => Code::KeyX,
        0x59 => Code::KeyY,
        0x5A => Code::KeyZ,
        0x5B => Code::MetaLeft,
        0x5C => Code::MetaRight,
        0x5D => Code::ContextMenu,
        0x5F => Code::Sleep,
        0x60 => Code::Numpad0,
        0x61 => Code::Numpad1,
        0x62 => Code::Numpad2,
        0x63 => Code::Numpad3,
        0x64 => Code::Numpad4,
        0x65 => Code::Numpad5,
        0x66 => Code::Numpad6,
        0x67 => Code::Numpad7,
        0x68 => Code::Numpad8,
        0x69 => Code::Numpad9,
        0x6A => Code::NumpadMultiply,
        0x6B => Code::NumpadAdd,
        0x6D => Code::NumpadSubtract,
        0x6E => Code::NumpadDecimal,
        0x6F => Code::NumpadDivide,
        0x70 => Code::F1,
        0x71 => Code::F2,
        0x72 => Code::F3,
        0x73 => Code::F4,
        0x74 => Code::F5,
        0x75 => Code::F6,
        0x76 => Code::F7,
        0x77 => Code::F8,
        0x78 => Code::F9,
        0x79 => Code::F10,
        0x7A => Code::F11,
        0x7B => Code::F12,
        0x7C => Code::F13,
        0x7D => Code::F14,
        0x7E => Code::F15,
        0x7F => Code::F16,
        0x80 => Code::F17,
        0x81 => Code::F18,
        0x82 => Code::F19,
        0x83 => Code::F20,
        0x84 => Code::F21,
        0x85 => Code::F22,
        0x86 => Code::F23,
        0x87 => Code::F24,
        0x90 => Code::NumLock,
        0x91 => Code::ScrollLock,
        0xA0 => Code::ShiftLeft,
        0xA1 => Code::ShiftRight,
        0xA2 => Code::ControlLeft,
        0xA3 => Code::ControlRight,
        0xA4 => Code::AltLeft,
        0xA5 => Code::AltRight,
        0xA6 => Code::BrowserBack,
        0xA7 => Code::BrowserForward,
        0xA8 => Code::BrowserRefresh,
        0xA9 => Code::BrowserStop,
        0xAA => Code::BrowserSearch,
        0xAB => Code::BrowserFavorites,
        0xAC => Code::BrowserHome,
        0xAD => Code::AudioVolumeMute,
        0xAE => Code::AudioVolumeDown,
        0xAF => Code::AudioVolumeUp,
        0xB0 => Code::MediaTrackNext,
        0xB1 => Code::MediaTrackPrevious,
        0xB2 => Code::MediaStop,
        0xB3 => Code::MediaPlayPause,
        0xB4 => Code::LaunchMail,
        0xB5 => Code::MediaSelect,
        0xB6 => Code::LaunchApp1,
        0xB7 => Code::LaunchApp2,
        0xBA => Code::Semicolon,
        0xBB => Code::Equal,
        0xBC => Code::Comma,
        0xBD => Code::Minus,
        0xBE => Code::Period,
        0xBF => Code::Slash,
        0xC0 => Code::Backquote,
        0xDB => Code::BracketLeft,
        0xDC => Code::Backslash,
        0xDD => Code::BracketRight,
        0xDE => Code::Quote,
        0xE2 => Code::IntlBackslash,
        _ => return None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_for_common_keys() {
        assert_eq!(code_for(VirtualKey::F8), Some(Code::F8));
        assert_eq!(code_for(VirtualKey::F6), Some(Code::F6));
        assert_eq!(VirtualKey::new(0x41).and_then(code_for), Some(Code::KeyA));
    }

    fn code(vk: u32) -> Option<Code> {
        VirtualKey::new(vk).and_then(code_for)
    }

    #[test]
    fn test_code_for_modifier_keys() {
        assert_eq!(code(0x10), Some(Code::ShiftLeft));
        assert_eq!(code(0x11), Some(Code::ControlLeft));
        assert_eq!(code(0x12), Some(Code::AltLeft));
        assert_eq!(code(0xA1), Some(Code::ShiftRight));
        assert_eq!(code(0xA3), Some(Code::ControlRight));
        assert_eq!(code(0xA5), Some(Code::AltRight));
        assert_eq!(code(0x5B), Some(Code::MetaLeft));
        assert_eq!(code(0x5C), Some(Code::MetaRight));
        assert_eq!(code(0x5D), Some(Code::ContextMenu));
    }

    #[test]
    fn test_code_for_browser_and_media_keys() {
        assert_eq!(code(0xA6), Some(Code::BrowserBack));
        assert_eq!(code(0xAC), Some(Code::BrowserHome));
        assert_eq!(code(0xAD), Some(Code::AudioVolumeMute));
        assert_eq!(code(0xAF), Some(Code::AudioVolumeUp));
        assert_eq!(code(0xB3), Some(Code::MediaPlayPause));
        assert_eq!(code(0xB7), Some(Code::LaunchApp2));
        assert!((0xA6..=0xB7).all(|vk| code(vk).is_some()));
    }

    #[test]
    fn test_code_for_ime_and_intl_keys() {
        assert_eq!(code(0x15), Some(Code::KanaMode));
        assert_eq!(code(0x1C), Some(Code::Convert));
        assert_eq!(code(0x1D), Some(Code::NonConvert));
        assert_eq!(code(0xE2), Some(Code::IntlBackslash));
    }

    #[test]
    fn test_code_for_unmappable_key() {
        assert_eq!(code_for(VirtualKey::PACKET), None);
        // VK_LBUTTON and the gaps around it
        assert_eq!(code(0x01), None);
        assert_eq!(code(0x5E), None);
    }

    #[test]
    #[ignore = "registers a real system hotkey"]
    fn test_register_and_unregister_f8() {
        let mut registrar = GlobalHotkeyRegistrar::new().unwrap();
        assert!(registrar.register(VirtualKey::F8).is_ok());
        assert!(registrar.trigger_id().is_some());
        assert!(registrar.unregister(VirtualKey::F8).is_ok());
        assert_eq!(registrar.trigger_id(), None);
    }
}
