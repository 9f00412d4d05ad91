#![cfg_attr(windows, windows_subsystem = "windows")]
//! Klipboard entry point

#[cfg(windows)]
fn main() -> anyhow::Result<()> {
    use klipboard::config::{executable_dir, HotkeyStore, IniConfigStore, CONFIG_FILE_NAME};
    use klipboard::input::capture::{HotkeyCapture, InputSource, InterceptionMode};
    use klipboard::input::fallback::FallbackRegistrar;
    use klipboard::input::injector::ClipboardTextInjector;
    use klipboard::input::interceptor::Klipboard;
    use klipboard::notify::{LogNotifier, Notifier};
    use klipboard::platform::context;
    use klipboard::platform::win32::{
        clipboard::Win32Clipboard, hook::KeyboardHook, hotkey::GlobalHotkeyRegistrar,
        run_message_loop, sendinput::SendInputSink, tray::TrayManager,
    };
    use klipboard::telemetry;
    use std::path::PathBuf;

    // Load configuration (failures fall back to defaults)
    let base_dir = executable_dir().unwrap_or_else(|_| PathBuf::from("."));
    let (store, config_error) = IniConfigStore::open(base_dir.join(CONFIG_FILE_NAME));

    // Logging is best effort: without a log file, fall back to stdout
    let logging = store.config().telemetry();
    if let Err(e) = telemetry::init(logging.enabled, &logging.log_path, &base_dir) {
        let retried = telemetry::init(false, &logging.log_path, &base_dir);
        tracing::warn!(error = %e, stdout = retried.is_ok(), "log file unavailable");
    }
    tracing::info!(config = %store.path().display(), "klipboard starting");
    if let Some(e) = config_error {
        tracing::warn!(error = %e, "config unreadable, using defaults");
    }

    // Prefer the low-level hook; fall back to a registered hotkey
    let hook = KeyboardHook::install()
        .map_err(|e| tracing::warn!(error = %e, "keyboard hook unavailable, using RegisterHotKey"))
        .ok();
    let mode = if hook.is_some() {
        InterceptionMode::PrivilegedHook
    } else {
        InterceptionMode::PolledFallback
    };

    let hotkey = store.load();
    let tray = TrayManager::new(hotkey, mode)
        .map_err(|e| tracing::error!(error = %e, "tray unavailable"))
        .ok();
    let notifier: Box<dyn Notifier> = match &tray {
        Some(tray) => Box::new(tray.notifier()),
        None => Box::new(LogNotifier),
    };

    // Without a hotkey manager the app stays up; announce() tells the user
    let source = match mode {
        InterceptionMode::PrivilegedHook => InputSource::Hook,
        InterceptionMode::PolledFallback => match GlobalHotkeyRegistrar::new() {
            Ok(registrar) => {
                InputSource::Fallback(Some(FallbackRegistrar::install(Box::new(registrar), hotkey)))
            }
            Err(e) => {
                tracing::error!(error = %e, "hotkey registration unavailable");
                InputSource::Fallback(None)
            }
        },
    };

    let capture = HotkeyCapture::new(Box::new(store), notifier, source);
    let injector = ClipboardTextInjector::new(Win32Clipboard, SendInputSink);
    let klipboard = Klipboard::new(capture, Box::new(injector));
    klipboard.announce();
    context::bind(klipboard);

    // Main event loop
    run_message_loop(tray.as_ref());

    // Release the fallback registration before the hook and tray go away
    drop(context::unbind());
    drop(hook);
    drop(tray);
    tracing::info!("klipboard stopped");
    Ok(())
}

#[cfg(not(windows))]
fn main() -> anyhow::Result<()> {
    anyhow::bail!("klipboard needs the Windows keyboard hook, clipboard and SendInput APIs")
}
