use super::*;
use crate::core::event::KeyEvent;
use tempfile::tempdir;

#[test]
fn defaults() {
    let settings = Settings::default();
    assert_eq!(settings.invoke_queue_capacity, DEFAULT_INVOKE_CAPACITY);
    assert_eq!(settings.poll_interval(), Duration::from_millis(50));
    assert!(settings.mouse);
    assert_eq!(settings.log_filter, DEFAULT_LOG_FILTER);
    assert_eq!(settings.menu.activation_key, "F9");
    assert_eq!(settings.menu.hotkey_specifier, '_');
    assert!(!settings.menu.single_frame_submenus);
}

#[test]
fn partial_files_keep_defaults_for_missing_fields() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("settings.json");
    std::fs::write(
        &path,
        r#"{ "mouse": false, "menu": { "activation_key": "ctrl+m" } }"#,
    )
    .unwrap();
    let settings = load_settings(&path).unwrap();
    assert!(!settings.mouse);
    assert_eq!(settings.menu.activation_key, "ctrl+m");
    assert_eq!(settings.menu.hotkey_specifier, '_');
    assert_eq!(settings.poll_interval_ms, DEFAULT_POLL_INTERVAL_MS);
}

#[test]
fn normalized_replaces_unusable_values() {
    let mut settings = Settings {
        invoke_queue_capacity: 0,
        poll_interval_ms: 0,
        ..Settings::default()
    };
    settings.menu.single_frame_submenus = true;
    settings.menu.up_down_as_left_right = true;
    settings.menu.hotkey_specifier = ' ';

    let settings = settings.normalized();
    assert_eq!(settings.invoke_queue_capacity, DEFAULT_INVOKE_CAPACITY);
    assert_eq!(settings.poll_interval_ms, DEFAULT_POLL_INTERVAL_MS);
    assert!(settings.menu.single_frame_submenus);
    assert!(!settings.menu.up_down_as_left_right);
    assert_eq!(settings.menu.hotkey_specifier, DEFAULT_HOTKEY_SPECIFIER);
}

#[test]
fn load_or_default_tolerates_missing_and_broken_files() {
    let dir = tempdir().unwrap();
    let missing = dir.path().join("missing.json");
    assert_eq!(load_or_default(Some(&missing)), Settings::default());

    let broken = dir.path().join("broken.json");
    std::fs::write(&broken, "{ not json").unwrap();
    assert!(load_settings(&broken).is_err());
    assert_eq!(load_or_default(Some(&broken)), Settings::default());
}

#[test]
fn ensure_settings_file_writes_defaults_once() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("nested").join("settings.json");
    ensure_settings_file(&path).unwrap();
    assert_eq!(load_settings(&path).unwrap(), Settings::default());

    std::fs::write(&path, r#"{ "mouse": false }"#).unwrap();
    ensure_settings_file(&path).unwrap();
    assert!(!load_settings(&path).unwrap().mouse);
}

#[test]
fn settings_round_trip_through_json() {
    let mut settings = Settings::default();
    settings.menu.single_frame_submenus = true;
    settings.log_filter = "termstack=trace".to_string();
    let json = serde_json::to_string(&settings).unwrap();
    let back: Settings = serde_json::from_str(&json).unwrap();
    assert_eq!(back, settings);
}

#[test]
fn settings_path_is_under_the_config_dir() {
    if let Some(path) = get_settings_path() {
        assert!(path.ends_with("termstack/settings.json"));
    }
}

#[test]
fn parse_keybinding_accepts_chords() {
    assert_eq!(parse_keybinding("F9"), Some(Key::simple(KeyCode::F(9))));
    assert_eq!(parse_keybinding("ctrl+q"), Some(Key::ctrl('q')));
    assert_eq!(parse_keybinding("Ctrl + Shift + S"), Some(Key::ctrl_shift('s')));
    assert_eq!(parse_keybinding("alt+x"), Some(Key::alt('x')));
    assert_eq!(
        parse_keybinding("shift+tab"),
        Some(Key::new(KeyCode::Tab, KeyModifiers::SHIFT))
    );
    assert_eq!(parse_keybinding("space"), Some(Key::simple(KeyCode::Char(' '))));
    assert_eq!(
        parse_keybinding("Q"),
        Some(Key::new(KeyCode::Char('q'), KeyModifiers::SHIFT))
    );
}

#[test]
fn parsed_punctuation_matches_what_terminals_send() {
    let help = parse_keybinding("?").unwrap();
    assert!(help.matches(&KeyEvent::new(KeyCode::Char('?'), KeyModifiers::SHIFT)));
    assert_eq!(parse_keybinding("shift+?"), Some(help));
}

#[test]
fn parse_keybinding_rejects_garbage() {
    assert_eq!(parse_keybinding(""), None);
    assert_eq!(parse_keybinding("ctrl"), None);
    assert_eq!(parse_keybinding("ctrl+a+b"), None);
    assert_eq!(parse_keybinding("F0"), None);
    assert_eq!(parse_keybinding("foo"), None);
}
