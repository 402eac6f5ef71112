//! JSON export of credentials and the snapshot log.
//!
//! Exported files are write-once artifacts for sharing; nothing here reads
//! them back.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use educrypt_core::SignedCredential;
use tracing::info;

use crate::error::ExportError;

/// Pretty-printed (2-space) JSON of a signed credential.
pub fn credential_json(credential: &SignedCredential) -> Result<String, ExportError> {
    Ok(serde_json::to_string_pretty(credential)?)
}

/// Write `credential` to `dir/credential_<hash>.json`.
pub fn export_credential(dir: &Path, credential: &SignedCredential) -> Result<PathBuf, ExportError> {
    let path = dir.join(format!("credential_{}.json", credential.hash));
    write_file(&path, &credential_json(credential)?)?;
    info!(path = %path.display(), hash = %credential.hash, "credential exported");
    Ok(path)
}

/// Write the snapshot hashes to `dir/snapshot_<unix_millis>.json`.
pub fn export_snapshot(dir: &Path, hashes: &[String]) -> Result<PathBuf, ExportError> {
    if hashes.is_empty() {
        return Err(ExportError::Empty);
    }

    let path = dir.join(format!("snapshot_{}.json", unix_millis()));
    write_file(&path, &serde_json::to_string_pretty(hashes)?)?;
    info!(path = %path.display(), count = hashes.len(), "snapshot exported");
    Ok(path)
}

fn write_file(path: &Path, contents: &str) -> Result<(), ExportError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, contents)?;
    Ok(())
}

fn unix_millis() -> u128 {
    // A clock before the epoch only affects the file name.
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use educrypt_testkit::fixtures::unsigned_credential;
    use tempfile::TempDir;

    #[test]
    fn test_export_credential_file() {
        let dir = TempDir::new().unwrap();
        let credential = unsigned_credential(7);

        let path = export_credential(dir.path(), &credential).unwrap();
        assert_eq!(
            path.file_name().unwrap().to_str().unwrap(),
            format!("credential_{}.json", credential.hash)
        );

        let contents = fs::read_to_string(&path).unwrap();
        assert!(contents.starts_with("{\n  \"name\": "));
        let parsed: SignedCredential = serde_json::from_str(&contents).unwrap();
        assert_eq!(parsed, credential);
    }

    #[test]
    fn test_export_snapshot_file() {
        let dir = TempDir::new().unwrap();
        let hashes = vec!["aa".to_string(), "bb".to_string()];

        let path = export_snapshot(&dir.path().join("nested"), &hashes).unwrap();
        let name = path.file_name().unwrap().to_str().unwrap();
        assert!(name.starts_with("snapshot_") && name.ends_with(".json"));
        assert!(name["snapshot_".len()..name.len() - ".json".len()]
            .chars()
            .all(|c| c.is_ascii_digit()));

        let contents = fs::read_to_string(&path).unwrap();
        assert_eq!(contents, "[\n  \"aa\",\n  \"bb\"\n]");
    }

    #[test]
    fn test_empty_snapshot_is_refused() {
        let dir = TempDir::new().unwrap();
        assert!(matches!(export_snapshot(dir.path(), &[]), Err(ExportError::Empty)));
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
    }
}
