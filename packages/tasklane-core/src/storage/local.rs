/// Local filesystem slot storage.
///
/// Each slot is a `<key>.json` file inside the data directory, with:
/// - Atomic writes (write to .tmp, fsync, rename, fsync directory)
/// - SHA-256 fingerprint of the last read/written content per slot, so a
///   save that would write identical bytes is skipped
/// - Mutex-guarded writes per slot

use std::collections::HashMap;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use super::fingerprint::ContentFingerprint;
use super::{SlotStore, StorageError};

pub struct FileStore {
    dir: PathBuf,
    /// key -> fingerprint of what is currently on disk (as far as we know)
    fingerprints: Mutex<HashMap<String, ContentFingerprint>>,
    /// Per-slot write mutex
    write_locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl FileStore {
    /// Open a store rooted at `dir`, creating the directory if needed.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self {
            dir,
            fingerprints: Mutex::new(HashMap::new()),
            write_locks: Mutex::new(HashMap::new()),
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the file backing a slot. Rejects keys that could escape the
    /// data directory.
    pub fn slot_path(&self, key: &str) -> Result<PathBuf, StorageError> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !valid {
            return Err(StorageError::InvalidKey(key.to_string()));
        }
        Ok(self.dir.join(format!("{}.json", key)))
    }

    fn get_write_lock(&self, key: &str) -> Arc<Mutex<()>> {
        let mut locks = self.write_locks.lock().unwrap();
        locks
            .entry(key.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    /// Atomic write with fsync: write to .tmp, fsync, rename, fsync directory.
    fn atomic_write(path: &Path, content: &str) -> Result<(), io::Error> {
        let tmp_path = path.with_extension("json.tmp");
        let mut file = fs::File::create(&tmp_path)?;
        file.write_all(content.as_bytes())?;
        file.sync_all()?;
        fs::rename(&tmp_path, path)?;

        // fsync directory for rename durability
        if let Some(dir) = path.parent() {
            if let Ok(d) = fs::File::open(dir) {
                let _ = d.sync_all();
            }
        }
        Ok(())
    }
}

impl SlotStore for FileStore {
    fn read_slot(&self, key: &str) -> Result<Option<String>, StorageError> {
        let path = self.slot_path(key)?;
        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        self.fingerprints
            .lock()
            .unwrap()
            .insert(key.to_string(), ContentFingerprint::from_content(&content));
        Ok(Some(content))
    }

    fn write_slot(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let path = self.slot_path(key)?;
        let lock = self.get_write_lock(key);
        let _guard = lock.lock().unwrap();

        let fingerprint = ContentFingerprint::from_content(value);
        if self.fingerprints.lock().unwrap().get(key) == Some(&fingerprint) {
            log::debug!("[tasklane.store] Slot {:?} unchanged, skipping write", key);
            return Ok(());
        }

        Self::atomic_write(&path, value)?;
        self.fingerprints
            .lock()
            .unwrap()
            .insert(key.to_string(), fingerprint);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_write_and_read_slot() {
        let tmp = TempDir::new().unwrap();
        let store = FileStore::open(tmp.path()).unwrap();

        store.write_slot("lists", r#"[{"id":"A","title":"Todo"}]"#).unwrap();

        let on_disk = fs::read_to_string(tmp.path().join("lists.json")).unwrap();
        assert_eq!(on_disk, r#"[{"id":"A","title":"Todo"}]"#);
        assert_eq!(
            store.read_slot("lists").unwrap().as_deref(),
            Some(r#"[{"id":"A","title":"Todo"}]"#)
        );
    }

    #[test]
    fn test_missing_slot_reads_none() {
        let tmp = TempDir::new().unwrap();
        let store = FileStore::open(tmp.path()).unwrap();
        assert!(store.read_slot("tasks").unwrap().is_none());
    }

    #[test]
    fn test_open_creates_directory() {
        let tmp = TempDir::new().unwrap();
        let nested = tmp.path().join("a").join("b");
        let store = FileStore::open(&nested).unwrap();
        assert!(nested.is_dir());
        assert_eq!(store.dir(), nested.as_path());
    }

    #[test]
    fn test_identical_write_is_skipped() {
        let tmp = TempDir::new().unwrap();
        let store = FileStore::open(tmp.path()).unwrap();
        let path = tmp.path().join("tasks.json");

        store.write_slot("tasks", "[]").unwrap();
        fs::remove_file(&path).unwrap();

        // Same bytes as the last write: nothing touches the disk.
        store.write_slot("tasks", "[]").unwrap();
        assert!(!path.exists());

        // Different bytes are written.
        store.write_slot("tasks", "[1]").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "[1]");
    }

    #[test]
    fn test_read_seeds_fingerprint() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("lists.json");
        fs::write(&path, "[]").unwrap();

        let store = FileStore::open(tmp.path()).unwrap();
        store.read_slot("lists").unwrap();
        fs::remove_file(&path).unwrap();

        store.write_slot("lists", "[]").unwrap();
        assert!(!path.exists());
    }

    #[test]
    fn test_rejects_path_like_keys() {
        let tmp = TempDir::new().unwrap();
        let store = FileStore::open(tmp.path()).unwrap();

        for key in ["", "../escape", "a/b", "slot.json"] {
            assert!(matches!(
                store.write_slot(key, "[]"),
                Err(StorageError::InvalidKey(_))
            ));
        }
        assert!(store.slot_path("board-lists_v2").is_ok());
    }

    #[test]
    fn test_no_temp_file_left_behind() {
        let tmp = TempDir::new().unwrap();
        let store = FileStore::open(tmp.path()).unwrap();
        store.write_slot("lists", "[]").unwrap();

        let names: Vec<String> = fs::read_dir(tmp.path())
            .unwrap()
            .flatten()
            .map(|e| e.file_name().to_string_lossy().to_string())
            .collect();
        assert_eq!(names, vec!["lists.json".to_string()]);
    }
}
