//! Zero-length lumps (map and namespace markers)

use std::fs;
use wadutil_rs::{Direction, WadReader, WadSession};

#[test]
fn test_markers_written_with_zero_offset() {
    let dir = tempfile::tempdir().unwrap();
    let start = dir.path().join("f_start");
    let flat = dir.path().join("floor0_1");
    let end = dir.path().join("f_end");
    fs::write(&start, b"").unwrap();
    fs::write(&flat, vec![0x60u8; 4096]).unwrap();
    fs::write(&end, b"").unwrap();

    let mut session = WadSession::new();
    session.add_lump(&start).unwrap();
    session.add_lump(&flat).unwrap();
    session.add_lump(&end).unwrap();

    let out = dir.path().join("flats.wad");
    let header = session.save(&out).unwrap();
    assert_eq!(header.directory_offset, 12 + 4096);

    let mut reader = WadReader::open(&out).unwrap();
    let directory = reader.read_directory().unwrap();

    let names: Vec<String> = directory.iter().map(|e| e.name.to_string()).collect();
    assert_eq!(names, ["F_START", "FLOOR0_1", "F_END"]);

    assert_eq!((directory[0].offset, directory[0].size), (0, 0));
    assert_eq!((directory[1].offset, directory[1].size), (12, 4096));
    assert_eq!((directory[2].offset, directory[2].size), (0, 0));

    assert!(reader.read_lump(&directory[0]).unwrap().is_empty());
    assert_eq!(reader.read_lump(&directory[1]).unwrap().len(), 4096);
}

#[test]
fn test_marker_after_moves_keeps_zero_offset() {
    let dir = tempfile::tempdir().unwrap();
    let marker = dir.path().join("map01");
    let things = dir.path().join("things");
    fs::write(&marker, b"").unwrap();
    fs::write(&things, b"tttt").unwrap();

    let mut session = WadSession::new();
    session.add_lump(&things).unwrap();
    session.add_lump(&marker).unwrap();
    let first = dir.path().join("first.wad");
    session.save(&first).unwrap();

    // Reload and put the marker in front
    let mut session = WadSession::new();
    session.open(&first).unwrap();
    session.move_lump(1, Direction::Up).unwrap();
    let second = dir.path().join("second.wad");
    session.save(&second).unwrap();

    let listing = session.list_lumps();
    assert_eq!(listing[0].name, "MAP01");
    assert_eq!(listing[0].offset, 0);
    assert_eq!(listing[1].offset, 12);

    let mut reader = WadReader::open(&second).unwrap();
    let directory = reader.read_directory().unwrap();
    assert_eq!(reader.read_lump(&directory[1]).unwrap(), b"tttt");
}

#[test]
fn test_only_markers() {
    let dir = tempfile::tempdir().unwrap();
    let mut session = WadSession::new();
    for name in ["s_start", "s_end"] {
        let path = dir.path().join(name);
        fs::write(&path, b"").unwrap();
        session.add_lump(&path).unwrap();
    }

    let out = dir.path().join("markers.wad");
    let header = session.save(&out).unwrap();

    assert_eq!(header.directory_offset, 12);
    assert_eq!(fs::metadata(&out).unwrap().len(), 12 + 2 * 16);
}
