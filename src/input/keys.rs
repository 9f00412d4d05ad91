use std::fmt;

/// Windows virtual-key code of the configured trigger key.
///
/// Valid codes are 1..=254; 0 and 255 are reserved by the OS.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VirtualKey(u8);

impl VirtualKey {
    /// `VK_F6`
    pub const F6: Self = Self(0x75);
    /// `VK_F8`, the default hotkey
    pub const F8: Self = Self(0x77);
    /// `VK_PACKET`, carried by injected Unicode keystrokes
    pub const PACKET: Self = Self(0xE7);

    /// Wrap a raw virtual-key code, rejecting reserved values
    #[must_use]
    pub fn new(code: u32) -> Option<Self> {
        match u8::try_from(code) {
            Ok(code @ 1..=254) => Some(Self(code)),
            _ => None,
        }
    }

    /// Raw code as stored in the config file
    #[must_use]
    pub const fn code(self) -> u32 {
        self.0 as u32
    }

    /// Human-readable label for notifications and the tray status line
    #[must_use]
    pub fn name(self) -> String {
        let code = self.0;
        match code {
            b'0'..=b'9' | b'A'..=b'Z' => char::from(code).to_string(),
            0x70..=0x87 => format!("F{}", code - 0x6F),
            0x60..=0x69 => format!("Numpad {}", code - 0x60),
            _ => Self::named(code).map_or_else(|| format!("VK 0x{code:02X}"), str::to_owned),
        }
    }

    const fn named(code: u8) -> Option<&'static str> {
        Some(match code {
            0x08 => "Backspace",
            0x09 => "Tab",
            0x0D => "Enter",
            0x10 => "Shift",
            0x11 => "Ctrl",
            0x12 => "Alt",
            0x13 => "Pause",
            0x14 => "Caps Lock",
            0x1B => "Esc",
            0x20 => "Space",
            0x21 => "Page Up",
            0x22 => "Page Down",
            0x23 => "End",
            0x24 => "Home",
            0x25 => "Left",
            0x26 => "Up",
            0x27 => "Right",
            0x28 => "Down",
            0x2C => "Print Screen",
            0x2D => "Insert",
            0x2E => "Delete",
            0x5B => "Left Win",
            0x5C => "Right Win",
            0x5D => "Menu",
            0x90 => "Num Lock",
            0x91 => "Scroll Lock",
            0xA0 => "Left Shift",
            0xA1 => "Right Shift",
            0xA2 => "Left Ctrl",
            0xA3 => "Right Ctrl",
            0xA4 => "Left Alt",
            0xA5 => "Right Alt",
            _ => return None,
        })
    }
}

impl Default for VirtualKey {
    fn default() -> Self {
        Self::F8
    }
}

impl fmt::Display for VirtualKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name())
    }
}
