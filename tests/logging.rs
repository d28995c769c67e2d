use key_overlay::logging;
use tempfile::tempdir;

#[test]
fn file_log_is_flushed_when_guard_drops() {
    let dir = tempdir().unwrap();
    let guard = logging::init(false, Some(dir.path()));
    assert!(guard.is_some());

    tracing::info!("first key rendered");
    tracing::warn!("display lost");
    drop(guard);

    let mut content = String::new();
    for entry in std::fs::read_dir(dir.path()).unwrap() {
        let path = entry.unwrap().path();
        if path
            .file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|n| n.starts_with("key_overlay.log"))
        {
            content.push_str(&std::fs::read_to_string(path).unwrap());
        }
    }
    assert!(content.contains("first key rendered"));
    assert!(content.contains("display lost"));
}
