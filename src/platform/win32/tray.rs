use anyhow::{Context, Result};
use std::rc::Rc;
use tray_icon::menu::{Menu, MenuEvent, MenuItem, PredefinedMenuItem};
use tray_icon::{Icon, TrayIcon, TrayIconBuilder};

use crate::input::capture::InterceptionMode;
use crate::input::keys::VirtualKey;
use crate::notify::{notification_text, Notifier};

const TOOLTIP: &str = "Klipboard";
// NOTIFYICONDATAW::szTip holds 128 UTF-16 units including the NUL
const TOOLTIP_CHARS: usize = 127;
const STATUS_CHARS: usize = 80;
const ICON_SIZE: u32 = 32;

/// Commands the tray menu sends to the core
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrayCommand {
    /// Start capturing a new hotkey
    ChangeHotkey,
    /// Leave the message loop
    Exit,
}

/// Tray icon with a status line, "Change Hotkey" and "Exit"
pub struct TrayManager {
    tray: Rc<TrayIcon>,
    status: MenuItem,
    change_hotkey: MenuItem,
    exit: MenuItem,
}

impl TrayManager {
    /// Build the tray icon and menu.
    ///
    /// "Change Hotkey" is disabled in `PolledFallback` mode, which cannot
    /// observe arbitrary keys.
    ///
    /// # Errors
    /// Returns error if the menu or icon cannot be created
    pub fn new(hotkey: VirtualKey, mode: InterceptionMode) -> Result<Self> {
        let menu = Menu::new();

        // Status item showing the last notification (non-clickable)
        let status = MenuItem::new(format!("Hotkey: {hotkey}"), false, None);
        let change_hotkey = MenuItem::new(
            "Change Hotkey",
            mode == InterceptionMode::PrivilegedHook,
            None,
        );
        let exit = MenuItem::new("Exit", true, None);

        menu.append(&status).context("failed to append status item")?;
        menu.append(&PredefinedMenuItem::separator())
            .context("failed to append separator")?;
        menu.append(&change_hotkey)
            .context("failed to append change hotkey item")?;
        menu.append(&exit).context("failed to append exit item")?;

        let tray = TrayIconBuilder::new()
            .with_menu(Box::new(menu))
            .with_tooltip(TOOLTIP)
            .with_icon(clipboard_icon()?)
            .build()
            .context("failed to build tray icon")?;

        Ok(Self {
            tray: Rc::new(tray),
            status,
            change_hotkey,
            exit,
        })
    }

    /// Map a menu event to a command, if it came from our menu
    #[must_use]
    pub fn command_for(&self, event: &MenuEvent) -> Option<TrayCommand> {
        if event.id() == self.change_hotkey.id() {
            Some(TrayCommand::ChangeHotkey)
        } else if event.id() == self.exit.id() {
            Some(TrayCommand::Exit)
        } else {
            None
        }
    }

    /// Notifier that writes into this tray's status line and tooltip
    #[must_use]
    pub fn notifier(&self) -> TrayNotifier {
        TrayNotifier {
            tray: Rc::clone(&self.tray),
            status: self.status.clone(),
        }
    }
}

/// Shows notifications in the tray status line and tooltip.
///
/// `tray-icon` keeps the icon's window and id private, so there is no
/// balloon; the latest notification stays visible on hover and in the menu.
pub struct TrayNotifier {
    tray: Rc<TrayIcon>,
    status: MenuItem,
}

impl Notifier for TrayNotifier {
    fn notify(&self, title: &str, message: &str) {
        tracing::info!(title, message, "notification");
        self.status
            .set_text(notification_text(title, message, STATUS_CHARS));
        let tooltip = notification_text(title, message, TOOLTIP_CHARS);
        if let Err(e) = self.tray.set_tooltip(Some(tooltip)) {
            tracing::warn!("failed to update tray tooltip: {}", e);
        }
    }
}

/// Small clipboard glyph: brown board, white sheet, dark clip
fn clipboard_icon() -> Result<Icon> {
    let mut rgba = Vec::with_capacity((ICON_SIZE * ICON_SIZE * 4) as usize);
    for y in 0..ICON_SIZE {
        for x in 0..ICON_SIZE {
            let pixel: [u8; 4] = match (x, y) {
                (12..=19, 2..=6) => [0x40, 0x40, 0x40, 0xFF],
                (8..=23, 7..=27) => [0xFA, 0xFA, 0xFA, 0xFF],
                (5..=26, 4..=30) => [0xA0, 0x6A, 0x3C, 0xFF],
                _ => [0, 0, 0, 0],
            };
            rgba.extend_from_slice(&pixel);
        }
    }
    Icon::from_rgba(rgba, ICON_SIZE, ICON_SIZE).context("failed to create icon from RGBA data")
}
