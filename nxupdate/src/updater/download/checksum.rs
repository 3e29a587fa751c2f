//! SHA-256 digests of downloaded archives.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use sha2::{Digest, Sha256};

use crate::updater::error::{UpdateError, UpdateResult};

/// Read buffer used while hashing (64KB).
const BUFFER_SIZE: usize = 64 * 1024;

/// Lowercase hex SHA-256 of a file's contents.
pub fn sha256_file(path: &Path) -> UpdateResult<String> {
    let read_err = |e| UpdateError::ReadFailed {
        path: path.to_path_buf(),
        source: e,
    };

    let mut reader = BufReader::new(File::open(path).map_err(read_err)?);
    let mut hasher = Sha256::new();
    let mut buffer = vec![0u8; BUFFER_SIZE];

    loop {
        let bytes_read = reader.read(&mut buffer).map_err(read_err)?;
        if bytes_read == 0 {
            break;
        }
        hasher.update(&buffer[..bytes_read]);
    }

    Ok(format!("{:x}", hasher.finalize()))
}

/// Check a file against an expected SHA-256 (hex, case-insensitive).
///
/// # Returns
///
/// The computed digest when it matches.
pub fn verify_sha256(path: &Path, expected: &str) -> UpdateResult<String> {
    let actual = sha256_file(path)?;
    if !actual.eq_ignore_ascii_case(expected.trim()) {
        return Err(UpdateError::ChecksumMismatch {
            filename: path
                .file_name()
                .unwrap_or_default()
                .to_string_lossy()
                .to_string(),
            expected: expected.trim().to_lowercase(),
            actual,
        });
    }
    Ok(actual)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    // sha256("abc")
    const ABC_SHA256: &str = "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad";

    #[test]
    fn test_sha256_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("abc.bin");
        std::fs::write(&path, b"abc").unwrap();

        assert_eq!(sha256_file(&path).unwrap(), ABC_SHA256);
    }

    #[test]
    fn test_verify_sha256_ignores_case() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("abc.bin");
        std::fs::write(&path, b"abc").unwrap();

        let digest = verify_sha256(&path, &ABC_SHA256.to_uppercase()).unwrap();
        assert_eq!(digest, ABC_SHA256);
    }

    #[test]
    fn test_verify_sha256_mismatch() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("all_patches.zip");
        std::fs::write(&path, b"abd").unwrap();

        let err = verify_sha256(&path, ABC_SHA256).unwrap_err();
        match err {
            UpdateError::ChecksumMismatch {
                filename, expected, ..
            } => {
                assert_eq!(filename, "all_patches.zip");
                assert_eq!(expected, ABC_SHA256);
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_sha256_missing_file() {
        let result = sha256_file(Path::new("/nonexistent/all_patches.zip"));
        assert!(matches!(result, Err(UpdateError::ReadFailed { .. })));
    }
}
