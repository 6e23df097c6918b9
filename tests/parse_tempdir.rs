use std::fs;

use desktop_entries::{DesktopFile, Error, desktop::DESKTOP_ENTRY};
use tempfile::TempDir;

#[test]
fn test_parses_file_on_disk() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("app.desktop");
    fs::write(
        &path,
        "[Desktop Entry]\nName=Test App\nExec=testapp\n# comment line\nType=Application\n",
    )
    .unwrap();

    let file = DesktopFile::new(&path);
    let sections = file.entries().unwrap();

    assert_eq!(sections.len(), 1);
    let entry = &sections[DESKTOP_ENTRY];
    assert_eq!(entry.len(), 3);
    assert_eq!(entry["Name"], "Test App");
    assert_eq!(entry["Exec"], "testapp");
    assert_eq!(entry["Type"], "Application");
}

#[test]
fn test_cached_mapping_survives_file_changes() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("app.desktop");
    fs::write(&path, "[Desktop Entry]\nName=Before\n").unwrap();

    let file = DesktopFile::new(&path);
    assert_eq!(file.get(DESKTOP_ENTRY, "Name").unwrap(), Some("Before"));

    fs::write(&path, "[Desktop Entry]\nName=After\n").unwrap();
    assert_eq!(file.get(DESKTOP_ENTRY, "Name").unwrap(), Some("Before"));

    fs::remove_file(&path).unwrap();
    assert!(file.entries().is_ok());
}

#[test]
fn test_missing_and_non_utf8_files_fail_to_read() {
    let dir = TempDir::new().unwrap();

    let missing = DesktopFile::new(dir.path().join("missing.desktop"));
    assert!(matches!(missing.entries(), Err(Error::Read { .. })));

    let binary = dir.path().join("binary.desktop");
    fs::write(&binary, [0xff, 0xfe, b'[', 0x80]).unwrap();
    let binary = DesktopFile::new(binary);
    assert!(matches!(binary.entries(), Err(Error::Read { .. })));
}
