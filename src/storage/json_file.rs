//! JSON file medium
//!
//! Atomic replace:
//! 1. Write the encoded collection to `<file>.tmp`
//! 2. fsync the temp file
//! 3. Rename it over the target (atomic on POSIX)
//! 4. fsync the parent directory so the rename survives a crash

use std::ffi::OsString;
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use super::codec;
use super::errors::{StorageError, StorageResult};
use super::Storage;
use crate::record::Collection;

pub struct JsonFileStorage {
    path: PathBuf,
    temp_path: PathBuf,
}

impl JsonFileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let mut temp_name: OsString = path
            .file_name()
            .map(|name| name.to_os_string())
            .unwrap_or_else(|| OsString::from("collection"));
        temp_name.push(".tmp");
        let temp_path = path.with_file_name(temp_name);
        Self { path, temp_path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Creates an empty collection document if none exists yet.
    ///
    /// Returns `true` if a new document was written.
    pub fn ensure_exists(&self) -> StorageResult<bool> {
        if self.path.exists() {
            return Ok(false);
        }
        self.save(&Collection::new())?;
        Ok(true)
    }

    fn location(&self) -> String {
        self.path.display().to_string()
    }

    fn write_temp(&self, bytes: &[u8]) -> io::Result<()> {
        let mut file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&self.temp_path)?;
        file.write_all(bytes)?;
        file.sync_all()
    }

    fn replace_with(&self, bytes: &[u8]) -> io::Result<()> {
        if let Some(parent) = self.parent_dir() {
            fs::create_dir_all(parent)?;
        }

        self.write_temp(bytes)?;
        fs::rename(&self.temp_path, &self.path)?;

        if let Some(parent) = self.parent_dir() {
            if let Ok(dir) = File::open(parent) {
                let _ = dir.sync_all();
            }
        }
        Ok(())
    }

    fn parent_dir(&self) -> Option<&Path> {
        self.path.parent().filter(|p| !p.as_os_str().is_empty())
    }
}

impl Storage for JsonFileStorage {
    fn load(&self) -> StorageResult<Collection> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "collection file absent, starting empty");
                return Ok(Collection::new());
            }
            Err(e) => return Err(StorageError::read(self.location(), e)),
        };

        let collection =
            codec::decode(&content).map_err(|e| StorageError::malformed(self.location(), e))?;
        debug!(path = %self.path.display(), records = collection.len(), "loaded collection");
        Ok(collection)
    }

    fn save(&self, collection: &Collection) -> StorageResult<()> {
        let bytes = codec::encode(collection).map_err(StorageError::Encode)?;

        if let Err(e) = self.replace_with(&bytes) {
            if self.temp_path.exists() {
                if let Err(cleanup) = fs::remove_file(&self.temp_path) {
                    warn!(path = %self.temp_path.display(), error = %cleanup, "failed to remove temp file");
                }
            }
            return Err(StorageError::write(self.location(), e));
        }

        debug!(path = %self.path.display(), records = collection.len(), bytes = bytes.len(), "saved collection");
        Ok(())
    }

    fn describe(&self) -> String {
        format!("json file {}", self.path.display())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::StorageErrorKind;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_loads_empty() {
        let tmp = TempDir::new().unwrap();
        let storage = JsonFileStorage::new(tmp.path().join("data.json"));
        assert!(storage.load().unwrap().is_empty());
        assert!(!storage.path().exists());
    }

    #[test]
    fn test_empty_file_loads_empty() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("data.json");
        fs::write(&path, "").unwrap();
        assert!(JsonFileStorage::new(&path).load().unwrap().is_empty());
    }

    #[test]
    fn test_malformed_file_is_read_error() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("data.json");
        fs::write(&path, r#"[{"id": "satu", "nama": "Ana"}]"#).unwrap();

        let err = JsonFileStorage::new(&path).load().unwrap_err();
        assert_eq!(err.kind(), StorageErrorKind::Read);
        assert_eq!(err.code(), "CRUD_STORAGE_MALFORMED");
    }

    #[test]
    fn test_save_creates_parent_dirs_and_leaves_no_temp() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("nested/dir/data.json");
        let storage = JsonFileStorage::new(&path);

        let collection = codec::decode(r#"[{"id": 1, "nama": "Ana"}]"#).unwrap();
        storage.save(&collection).unwrap();

        assert!(path.exists());
        assert!(!tmp.path().join("nested/dir/data.json.tmp").exists());
        assert_eq!(storage.load().unwrap(), collection);
    }

    #[test]
    fn test_ensure_exists_is_idempotent() {
        let tmp = TempDir::new().unwrap();
        let storage = JsonFileStorage::new(tmp.path().join("data.json"));
        assert!(storage.ensure_exists().unwrap());
        assert!(!storage.ensure_exists().unwrap());
        assert_eq!(fs::read_to_string(storage.path()).unwrap(), "[]");
    }
}
