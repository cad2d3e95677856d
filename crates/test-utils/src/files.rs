//! Temporary file helpers.

use std::io::Write;

use tempfile::NamedTempFile;

/// Write `contents` to a fresh temporary file with the given suffix.
///
/// The file is removed when the returned handle is dropped.
pub fn temp_file_with(contents: &str, suffix: &str) -> NamedTempFile {
    let mut file = tempfile::Builder::new()
        .prefix("tilecache-test-")
        .suffix(suffix)
        .tempfile()
        .expect("failed to create temp file");
    file.write_all(contents.as_bytes())
        .expect("failed to write temp file");
    file.flush().expect("failed to flush temp file");
    file
}

/// Write an XML configuration document to a temporary file.
pub fn temp_config(xml: &str) -> NamedTempFile {
    temp_file_with(xml, ".xml")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_temp_config_roundtrip() {
        let file = temp_config("<tilecache/>");
        let read = std::fs::read_to_string(file.path()).unwrap();
        assert_eq!(read, "<tilecache/>");
        assert!(file.path().extension().is_some_and(|e| e == "xml"));
    }
}
