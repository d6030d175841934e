use super::*;

#[test]
fn test_from_io_maps_kinds() {
    let path = Path::new("/w/a.md");

    let err = FileError::from_io(path, io::Error::from(io::ErrorKind::NotFound));
    assert_eq!(err, FileError::NotFound(PathBuf::from("/w/a.md")));
    assert!(err.is_not_found());

    let err = FileError::from_io(path, io::Error::from(io::ErrorKind::PermissionDenied));
    assert_eq!(err, FileError::PermissionDenied(PathBuf::from("/w/a.md")));
    assert!(!err.is_not_found());

    let err = FileError::from_io(path, io::Error::new(io::ErrorKind::Other, "disk on fire"));
    assert!(matches!(&err, FileError::Io { message, .. } if message.contains("disk on fire")));
    assert_eq!(err.path(), path);
}

#[test]
fn test_file_error_display() {
    let err = FileError::NotFound(PathBuf::from("/test"));
    assert!(err.to_string().contains("/test"));
}
