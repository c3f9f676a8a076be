//! API key loading
//!
//! The key lives in a local file with the key on its first line. There is no
//! environment variable fallback.

use std::fs;
use std::path::Path;

use crate::core::error::{PilotError, Result};

/// Read and trim the API key stored at `path`
pub fn load_api_key(path: &Path) -> Result<String> {
    if !path.exists() {
        return Err(PilotError::MissingCredential(path.to_path_buf()));
    }

    let key = fs::read_to_string(path)?.trim().to_string();
    if key.is_empty() {
        return Err(PilotError::EmptyCredential(path.to_path_buf()));
    }

    Ok(key)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn scratch_file(name: &str, content: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!(
            "browser-pilot-{}-{}",
            std::process::id(),
            name
        ));
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_key_is_trimmed() {
        let path = scratch_file("key-trimmed", "  abc123 \n");
        assert_eq!(load_api_key(&path).unwrap(), "abc123");
        let _ = fs::remove_file(path);
    }

    #[test]
    fn test_empty_key_is_fatal() {
        let path = scratch_file("key-empty", "\n  \n");
        assert!(matches!(load_api_key(&path), Err(PilotError::EmptyCredential(_))));
        let _ = fs::remove_file(path);
    }

    #[test]
    fn test_missing_key_is_fatal() {
        let path = std::env::temp_dir().join("browser-pilot-no-such-key-file");
        assert!(matches!(load_api_key(&path), Err(PilotError::MissingCredential(_))));
    }
}
