use key_overlay::keymap::EdgePolicy;
use key_overlay::settings::Settings;
use tempfile::tempdir;

#[test]
fn missing_file_yields_defaults() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("settings.json");
    let settings = Settings::load(path.to_str().unwrap()).unwrap();
    assert_eq!(settings, Settings::default());
}

#[test]
fn save_then_load_preserves_fields() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("settings.json");
    let path = path.to_str().unwrap();

    let settings = Settings {
        sample_interval_ms: 25,
        display_width: Some(1024),
        window_pos: Some((0, 1040)),
        separator: "·".into(),
        edge_policy: EdgePolicy::LowestPerByte,
        headless: true,
        ..Settings::default()
    };
    settings.save(path).unwrap();

    assert_eq!(Settings::load(path).unwrap(), settings);
}

#[test]
fn malformed_file_is_an_error() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("settings.json");
    std::fs::write(&path, "{ not json").unwrap();
    assert!(Settings::load(path.to_str().unwrap()).is_err());
}
