use super::*;

#[test]
fn removes_files_and_tolerates_missing_ones() {
    let dir = std::env::temp_dir().join(format!(
        "boiler_cleanup_{}_{}",
        std::process::id(),
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos()
    ));
    std::fs::create_dir_all(&dir).unwrap();
    let present = dir.join("a.png");
    std::fs::write(&present, b"x").unwrap();
    let missing = dir.join("b.png");

    let results = cleanup(&[&present, &missing]);
    assert_eq!(results.len(), 2);
    assert!(results.iter().all(|(_, r)| r.is_ok()));
    assert!(!present.exists());

    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn directories_are_reported_not_raised() {
    let dir = std::env::temp_dir().join(format!("boiler_cleanup_dir_{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();

    let results = cleanup(&[&dir]);
    assert_eq!(results[0].0, dir);
    assert!(results[0].1.is_err());

    std::fs::remove_dir_all(&dir).ok();
}
