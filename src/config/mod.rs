use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;

use crate::input::keys::VirtualKey;

/// Line-preserving INI reader/writer
pub mod ini;

use ini::IniDocument;

/// Config file name, kept beside the executable
pub const CONFIG_FILE_NAME: &str = "klipboard_config.ini";

const SETTINGS: &str = "Settings";
const HOTKEY_VK: &str = "HotkeyVK";
const TELEMETRY: &str = "Telemetry";

/// On-disk configuration: a flat INI file.
///
/// `[Settings] HotkeyVK` holds the hotkey as a decimal virtual-key code.
/// `[Telemetry]` is optional. Lines this app does not own survive a save.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Config {
    document: IniDocument,
}

/// `[Telemetry]` section
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TelemetryConfig {
    /// Write logs to `log_path` instead of stdout
    pub enabled: bool,
    /// Log file; relative paths resolve against the executable directory
    pub log_path: String,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            log_path: "klipboard.log".to_owned(),
        }
    }
}

impl Config {
    /// Parse INI text; unreadable lines are ignored
    #[must_use]
    pub fn parse(text: &str) -> Self {
        Self {
            document: IniDocument::parse(text),
        }
    }

    /// Load config from `path`; a missing file yields the defaults
    ///
    /// # Errors
    /// Returns error if the file exists but cannot be read
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let bytes = fs::read(path).context("failed to read config file")?;
        Ok(Self::parse(&String::from_utf8_lossy(&bytes)))
    }

    /// Write config to `path`
    ///
    /// # Errors
    /// Returns error if the write fails
    pub fn save(&self, path: &Path) -> Result<()> {
        fs::write(path, self.document.render()).context("failed to write config file")?;
        Ok(())
    }

    /// Configured hotkey; missing, unreadable or out-of-range codes give F8
    #[must_use]
    pub fn hotkey(&self) -> VirtualKey {
        let Some(raw) = self.document.get(SETTINGS, HOTKEY_VK) else {
            return VirtualKey::F8;
        };
        ini::leading_int(raw)
            .and_then(VirtualKey::new)
            .unwrap_or_else(|| {
                warn!(value = raw, "invalid HotkeyVK, using F8");
                VirtualKey::F8
            })
    }

    /// Record `key` as the hotkey
    pub fn set_hotkey(&mut self, key: VirtualKey) {
        self.document
            .set(SETTINGS, HOTKEY_VK, &key.code().to_string());
    }

    /// Logging settings, defaults for anything missing
    #[must_use]
    pub fn telemetry(&self) -> TelemetryConfig {
        let defaults = TelemetryConfig::default();
        TelemetryConfig {
            enabled: self
                .document
                .get(TELEMETRY, "enabled")
                .and_then(ini::parse_bool)
                .unwrap_or(defaults.enabled),
            log_path: self
                .document
                .get(TELEMETRY, "log_path")
                .filter(|path| !path.is_empty())
                .map_or(defaults.log_path, str::to_owned),
        }
    }

    /// `<exe dir>/klipboard_config.ini`
    ///
    /// # Errors
    /// Returns error if the executable path is unknown
    pub fn default_path() -> Result<PathBuf> {
        Ok(executable_dir()?.join(CONFIG_FILE_NAME))
    }
}

/// Directory holding the running executable
///
/// # Errors
/// Returns error if the executable path is unknown
pub fn executable_dir() -> Result<PathBuf> {
    let exe = std::env::current_exe().context("failed to locate executable")?;
    exe.parent()
        .map(Path::to_path_buf)
        .context("executable has no parent directory")
}

/// Persistence of the hotkey binding
#[cfg_attr(test, mockall::automock)]
pub trait HotkeyStore {
    /// Stored hotkey, or F8 when nothing usable is stored
    fn load(&self) -> VirtualKey;

    /// Persist `key`
    ///
    /// # Errors
    /// Returns error if the backing file cannot be written
    fn save(&mut self, key: VirtualKey) -> Result<()>;
}

/// `HotkeyStore` backed by the config file.
///
/// Keeps the whole document so saving the hotkey preserves every other line.
#[derive(Debug, Clone)]
pub struct IniConfigStore {
    path: PathBuf,
    config: Config,
}

impl IniConfigStore {
    /// Store over an already-loaded config
    #[must_use]
    pub const fn new(path: PathBuf, config: Config) -> Self {
        Self { path, config }
    }

    /// Load `path`, falling back to defaults when it cannot be read.
    ///
    /// The read error is handed back so it can be logged once logging is up.
    #[must_use]
    pub fn open(path: PathBuf) -> (Self, Option<anyhow::Error>) {
        match Config::load(&path) {
            Ok(config) => (Self::new(path, config), None),
            Err(e) => (Self::new(path, Config::default()), Some(e)),
        }
    }

    /// Loaded configuration
    #[must_use]
    pub const fn config(&self) -> &Config {
        &self.config
    }

    /// Backing file
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl HotkeyStore for IniConfigStore {
    fn load(&self) -> VirtualKey {
        self.config.hotkey()
    }

    fn save(&mut self, key: VirtualKey) -> Result<()> {
        self.config.set_hotkey(key);
        self.config
            .save(&self.path)
            .with_context(|| format!("failed to save hotkey to {}", self.path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_config_path(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("klipboard-test-{}-{name}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        dir.join(CONFIG_FILE_NAME)
    }

    fn open_file(name: &str, contents: &str) -> IniConfigStore {
        let path = temp_config_path(name);
        fs::write(&path, contents).unwrap();
        let (store, error) = IniConfigStore::open(path);
        assert!(error.is_none());
        store
    }

    #[test]
    fn test_missing_file_defaults_to_f8() {
        let path = temp_config_path("missing");
        let _ = fs::remove_file(&path);
        let (store, error) = IniConfigStore::open(path);
        assert!(error.is_none());
        assert_eq!(store.load(), VirtualKey::F8);
        assert_eq!(store.config().telemetry(), TelemetryConfig::default());
    }

    #[test]
    fn test_unreadable_path_reports_error_and_defaults() {
        // A directory exists at the path but cannot be read as a file
        let path = temp_config_path("is-a-dir");
        fs::create_dir_all(&path).unwrap();
        let (store, error) = IniConfigStore::open(path);
        assert!(error.is_some());
        assert_eq!(store.load(), VirtualKey::F8);
    }

    #[test]
    fn test_extra_unquoted_values_do_not_reset_hotkey() {
        let store = open_file("extra", "[Settings]\r\nHotkeyVK=117\r\nNote=hello world\r\n");
        assert_eq!(store.load(), VirtualKey::F6);
    }

    #[test]
    fn test_lowercase_names_are_accepted() {
        let store = open_file("lowercase", "[settings]\r\nhotkeyvk=117\r\n");
        assert_eq!(store.load(), VirtualKey::F6);
    }

    #[test]
    fn test_semicolon_comments_are_accepted() {
        let store = open_file("comment", "; klipboard\r\n[Settings]\r\nHotkeyVK=117\r\n");
        assert_eq!(store.load(), VirtualKey::F6);
    }

    #[test]
    fn test_parses_telemetry_section() {
        let config = Config::parse(
            "[Settings]\nHotkeyVK = 65\n\n[Telemetry]\nenabled = false\nlog_path = \"C:/logs/klip.log\"\n",
        );
        assert_eq!(config.hotkey().name(), "A");
        let telemetry = config.telemetry();
        assert!(!telemetry.enabled);
        assert_eq!(telemetry.log_path, "C:/logs/klip.log");
    }

    #[test]
    fn test_out_of_range_or_garbage_code_falls_back_to_f8() {
        for raw in [
            "[Settings]\nHotkeyVK=0\n",
            "[Settings]\nHotkeyVK=4096\n",
            "[Settings]\nHotkeyVK=F6\n",
            "HotkeyVK = [not a number",
        ] {
            assert_eq!(Config::parse(raw).hotkey(), VirtualKey::F8);
        }
    }

    #[test]
    fn test_save_keeps_other_lines() {
        let mut store = open_file(
            "keep-lines",
            "; klipboard\r\n[settings]\r\nNote=hello world\r\nhotkeyvk=119\r\n",
        );
        store.save(VirtualKey::F6).unwrap();

        let written = fs::read_to_string(store.path()).unwrap();
        assert_eq!(
            written,
            "; klipboard\r\n[settings]\r\nNote=hello world\r\nhotkeyvk=117\r\n"
        );
        let (reopened, _) = IniConfigStore::open(store.path().to_path_buf());
        assert_eq!(reopened.load(), VirtualKey::F6);
        let _ = fs::remove_file(store.path());
    }

    #[test]
    fn test_save_into_missing_file_writes_settings_section() {
        let path = temp_config_path("fresh");
        let _ = fs::remove_file(&path);
        let (mut store, _) = IniConfigStore::open(path.clone());

        store.save(VirtualKey::F6).unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "[Settings]\r\nHotkeyVK=117\r\n");
        let _ = fs::remove_file(path);
    }

    #[test]
    fn test_save_to_missing_directory_fails() {
        let path = std::env::temp_dir()
            .join("klipboard-test-no-such-dir")
            .join("nested")
            .join(CONFIG_FILE_NAME);
        let mut store = IniConfigStore::new(path, Config::default());
        assert!(store.save(VirtualKey::F6).is_err());
    }
}
