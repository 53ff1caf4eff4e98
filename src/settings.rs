use crate::core::event::{Key, KeyCode, KeyModifiers};
use crate::ui::invoke::DEFAULT_INVOKE_CAPACITY;
use crate::ui::menu::hotkey::DEFAULT_HOTKEY_SPECIFIER;
use serde::{Deserialize, Serialize};
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

const SETTINGS_DIR: &str = "termstack";
const SETTINGS_FILE: &str = "settings.json";

pub const DEFAULT_POLL_INTERVAL_MS: u64 = 50;
pub const DEFAULT_LOG_FILTER: &str = "termstack=info";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub menu: MenuSettings,
    pub invoke_queue_capacity: usize,
    /// Upper bound on one wait of the terminal driver when nothing is pending.
    pub poll_interval_ms: u64,
    pub mouse: bool,
    pub log_filter: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            menu: MenuSettings::default(),
            invoke_queue_capacity: DEFAULT_INVOKE_CAPACITY,
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
            mouse: true,
            log_filter: DEFAULT_LOG_FILTER.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MenuSettings {
    pub single_frame_submenus: bool,
    pub up_down_as_left_right: bool,
    pub activation_key: String,
    pub hotkey_specifier: char,
}

impl Default for MenuSettings {
    fn default() -> Self {
        Self {
            single_frame_submenus: false,
            up_down_as_left_right: false,
            activation_key: "F9".to_string(),
            hotkey_specifier: DEFAULT_HOTKEY_SPECIFIER,
        }
    }
}

impl Settings {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    /// Replaces values the runtime cannot use.
    pub fn normalized(mut self) -> Self {
        if self.invoke_queue_capacity == 0 {
            tracing::warn!(
                "invoke_queue_capacity must be positive, using {}",
                DEFAULT_INVOKE_CAPACITY
            );
            self.invoke_queue_capacity = DEFAULT_INVOKE_CAPACITY;
        }
        if self.poll_interval_ms == 0 {
            tracing::warn!(
                "poll_interval_ms must be positive, using {}",
                DEFAULT_POLL_INTERVAL_MS
            );
            self.poll_interval_ms = DEFAULT_POLL_INTERVAL_MS;
        }
        if self.menu.single_frame_submenus && self.menu.up_down_as_left_right {
            tracing::warn!(
                "menu.single_frame_submenus and menu.up_down_as_left_right exclude each other; \
                 keeping single_frame_submenus"
            );
            self.menu.up_down_as_left_right = false;
        }
        if self.menu.hotkey_specifier.is_whitespace() {
            tracing::warn!(
                "menu.hotkey_specifier cannot be whitespace, using '{}'",
                DEFAULT_HOTKEY_SPECIFIER
            );
            self.menu.hotkey_specifier = DEFAULT_HOTKEY_SPECIFIER;
        }
        self
    }
}

pub fn get_settings_path() -> Option<PathBuf> {
    get_config_dir().map(|dir| dir.join(SETTINGS_DIR).join(SETTINGS_FILE))
}

/// Writes the default settings to `path` unless a file is already there.
pub fn ensure_settings_file(path: &Path) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.exists() {
            std::fs::create_dir_all(parent)?;
        }
    }
    if !path.exists() {
        let content = serde_json::to_string_pretty(&Settings::default())?;
        std::fs::write(path, content)?;
    }
    Ok(())
}

pub fn load_settings(path: &Path) -> io::Result<Settings> {
    let data = std::fs::read_to_string(path)?;
    let settings: Settings = serde_json::from_str(&data)?;
    Ok(settings.normalized())
}

/// Loads `path`, or the default location when `None`. Missing, unreadable or invalid files
/// yield the defaults.
pub fn load_or_default(path: Option<&Path>) -> Settings {
    let path = match path {
        Some(path) => path.to_path_buf(),
        None => match get_settings_path() {
            Some(path) => path,
            None => return Settings::default(),
        },
    };
    match load_settings(&path) {
        Ok(settings) => settings,
        Err(err) if err.kind() == io::ErrorKind::NotFound => Settings::default(),
        Err(err) => {
            tracing::warn!(path = %path.display(), error = %err, "invalid settings, using defaults");
            Settings::default()
        }
    }
}

/// Parses a chord such as `ctrl+shift+s` or `F9`.
pub fn parse_keybinding(value: &str) -> Option<Key> {
    let mut modifiers = KeyModifiers::NONE;
    let mut key_part: Option<&str> = None;
    for part in value.split('+').map(str::trim).filter(|p| !p.is_empty()) {
        match part.to_ascii_lowercase().as_str() {
            "ctrl" | "control" => modifiers |= KeyModifiers::CONTROL,
            "shift" => modifiers |= KeyModifiers::SHIFT,
            "alt" | "option" => modifiers |= KeyModifiers::ALT,
            "super" | "meta" | "cmd" | "command" => modifiers |= KeyModifiers::SUPER,
            _ if key_part.is_some() => return None,
            _ => key_part = Some(part),
        }
    }
    let code = parse_key_code(key_part?)?;
    Some(Key::new(code, modifiers).normalized())
}

fn parse_key_code(value: &str) -> Option<KeyCode> {
    let v = value.trim();
    if v.is_empty() {
        return None;
    }

    let v_lc = v.to_ascii_lowercase();
    let code = match v_lc.as_str() {
        "enter" | "return" => KeyCode::Enter,
        "tab" => KeyCode::Tab,
        "backtab" => KeyCode::BackTab,
        "esc" | "escape" => KeyCode::Esc,
        "backspace" => KeyCode::Backspace,
        "delete" | "del" => KeyCode::Delete,
        "up" => KeyCode::Up,
        "down" => KeyCode::Down,
        "left" => KeyCode::Left,
        "right" => KeyCode::Right,
        "home" => KeyCode::Home,
        "end" => KeyCode::End,
        "pageup" | "pgup" => KeyCode::PageUp,
        "pagedown" | "pgdn" => KeyCode::PageDown,
        "space" => KeyCode::Char(' '),
        _ if v_lc.len() > 1 && v_lc.starts_with('f') => {
            let n = v_lc[1..].parse::<u8>().ok()?;
            if n == 0 {
                return None;
            }
            KeyCode::F(n)
        }
        _ => {
            let mut chars = v.chars();
            let ch = chars.next()?;
            if chars.next().is_some() {
                return None;
            }
            KeyCode::Char(ch)
        }
    };

    Some(code)
}

fn get_config_dir() -> Option<PathBuf> {
    #[cfg(target_os = "macos")]
    {
        return std::env::var("HOME")
            .ok()
            .map(|home| PathBuf::from(home).join("Library/Application Support"));
    }

    #[cfg(target_os = "linux")]
    {
        if let Ok(xdg) = std::env::var("XDG_CONFIG_HOME") {
            if !xdg.is_empty() {
                return Some(PathBuf::from(xdg));
            }
        }
        return std::env::var("HOME")
            .ok()
            .map(|home| PathBuf::from(home).join(".config"));
    }

    #[cfg(target_os = "windows")]
    {
        return std::env::var("APPDATA").ok().map(PathBuf::from);
    }

    #[cfg(not(any(target_os = "macos", target_os = "linux", target_os = "windows")))]
    {
        None
    }
}

#[cfg(test)]
#[path = "../tests/unit/settings.rs"]
mod tests;
