//! Bounded file reading
//!
//! Provides consistent handling for:
//! - Non-UTF-8 files (lossy conversion, never fatal)
//! - Reads capped at a byte ceiling

use std::fs;
use std::io::Read;
use std::path::Path;

/// Result of reading a file up to a byte ceiling
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoundedRead {
    /// Decoded content (invalid sequences replaced)
    pub content: String,

    /// Raw bytes consumed from the file
    pub bytes_read: usize,

    /// Whether the read stopped at the ceiling
    pub hit_limit: bool,

    /// Whether lossy conversion replaced any bytes
    pub lossy_conversion: bool,
}

/// Read at most `max_bytes` bytes of a file as text
///
/// Invalid UTF-8 is replaced rather than rejected. Only I/O failures (missing
/// file, permission denied) are reported as errors.
pub fn read_bounded(path: &Path, max_bytes: u64) -> std::io::Result<BoundedRead> {
    let file = fs::File::open(path)?;
    let mut reader = std::io::BufReader::new(file).take(max_bytes);
    let mut buffer = Vec::new();
    reader.read_to_end(&mut buffer)?;

    let bytes_read = buffer.len();
    let hit_limit = bytes_read as u64 >= max_bytes;

    let (content, lossy_conversion) = match String::from_utf8(buffer) {
        Ok(content) => (content, false),
        Err(err) => (
            String::from_utf8_lossy(err.as_bytes()).into_owned(),
            true,
        ),
    };

    Ok(BoundedRead {
        content,
        bytes_read,
        hit_limit,
        lossy_conversion,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    #[test]
    fn test_read_small_file() {
        let dir = TempDir::new().unwrap();
        let file_path = dir.path().join("test.txt");
        fs::write(&file_path, "Hello, World!").unwrap();

        let result = read_bounded(&file_path, 100).unwrap();
        assert_eq!(result.content, "Hello, World!");
        assert_eq!(result.bytes_read, 13);
        assert!(!result.hit_limit);
        assert!(!result.lossy_conversion);
    }

    #[test]
    fn test_read_stops_at_limit() {
        let dir = TempDir::new().unwrap();
        let file_path = dir.path().join("large.txt");
        fs::write(&file_path, "x".repeat(500)).unwrap();

        let result = read_bounded(&file_path, 100).unwrap();
        assert_eq!(result.bytes_read, 100);
        assert_eq!(result.content.len(), 100);
        assert!(result.hit_limit);
    }

    #[test]
    fn test_read_exactly_at_limit_counts_as_hit() {
        let dir = TempDir::new().unwrap();
        let file_path = dir.path().join("exact.txt");
        fs::write(&file_path, "x".repeat(100)).unwrap();

        let result = read_bounded(&file_path, 100).unwrap();
        assert!(result.hit_limit);
    }

    #[test]
    fn test_read_lossy_conversion() {
        let dir = TempDir::new().unwrap();
        let file_path = dir.path().join("invalid_utf8.txt");

        let mut file = fs::File::create(&file_path).unwrap();
        file.write_all(&[0xFF, 0xFE, 0x48, 0x65, 0x6C, 0x6C, 0x6F])
            .unwrap();

        let result = read_bounded(&file_path, 100).unwrap();
        assert!(result.lossy_conversion);
        assert!(result.content.ends_with("Hello"));
    }

    #[test]
    fn test_read_nonexistent_file() {
        let result = read_bounded(Path::new("/nonexistent/file.txt"), 100);
        assert!(result.is_err());
    }
}
