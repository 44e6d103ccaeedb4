//! Filesystem key-value store
//!
//! One JSON file per key inside a profile directory (`<dir>/<key>.json`).
//! Writers serialize on an advisory lock file and replace entries by
//! renaming a fully written temp file into place, so readers never see a
//! partially written value.

use std::fs::{self, File, OpenOptions};
use std::io::{self, ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::thread;
use std::time::{Duration, Instant};

use fs2::FileExt;
use tempfile::NamedTempFile;
use tracing::{debug, warn};

use crate::domain::result::{Error, Result};
use crate::ports::KeyValueStore;

/// Lock file guarding writes to the profile directory
const LOCK_FILE: &str = ".store.lock";

/// Interval between attempts to take the write lock
const LOCK_POLL_INTERVAL_MS: u64 = 10;

/// Total time to wait for the write lock before giving up
const LOCK_TIMEOUT_MS: u64 = 10_000;

/// Keys map directly to file names, so only a safe alphabet is accepted
fn validate_key(key: &str) -> Result<()> {
    let valid = !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
    if valid {
        Ok(())
    } else {
        Err(Error::storage(format!("Invalid storage key: {:?}", key)))
    }
}

/// Whether a failed `try_lock_exclusive` means another holder has the lock
fn is_contended(err: &io::Error) -> bool {
    err.kind() == ErrorKind::WouldBlock
        || err.raw_os_error() == fs2::lock_contended_error().raw_os_error()
}

/// Held write lock; released on drop
struct WriteLock {
    file: File,
}

impl Drop for WriteLock {
    fn drop(&mut self) {
        let _ = FileExt::unlock(&self.file);
    }
}

/// Durable store backed by a directory of JSON files
#[derive(Debug)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Open (and create if needed) a store rooted at `dir`
    pub fn open(dir: &Path) -> Result<Self> {
        fs::create_dir_all(dir)?;
        Ok(Self {
            dir: dir.to_path_buf(),
        })
    }

    /// The profile directory this store writes to
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn entry_path(&self, key: &str) -> Result<PathBuf> {
        validate_key(key)?;
        Ok(self.dir.join(format!("{}.json", key)))
    }

    /// Take the exclusive write lock, polling until the deadline
    ///
    /// Writers hold the lock for a single entry rewrite.
    fn lock(&self) -> Result<WriteLock> {
        let file = OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(self.dir.join(LOCK_FILE))?;

        let deadline = Instant::now() + Duration::from_millis(LOCK_TIMEOUT_MS);
        let mut attempts: u32 = 0;
        loop {
            attempts += 1;
            match FileExt::try_lock_exclusive(&file) {
                Ok(()) => {
                    if attempts > 1 {
                        debug!(attempts, "profile store lock acquired after waiting");
                    }
                    return Ok(WriteLock { file });
                }
                Err(e) if !is_contended(&e) => return Err(Error::Io(e)),
                Err(e) if Instant::now() >= deadline => {
                    warn!(attempts, error = %e, "giving up on profile store lock");
                    return Err(Error::storage(format!(
                        "Profile storage is locked by another process: {}",
                        e
                    )));
                }
                Err(_) => thread::sleep(Duration::from_millis(LOCK_POLL_INTERVAL_MS)),
            }
        }
    }
}

impl KeyValueStore for FileStore {
    fn name(&self) -> &str {
        "file"
    }

    fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.entry_path(key)?;
        match fs::read_to_string(&path) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let path = self.entry_path(key)?;
        let _lock = self.lock()?;

        let mut tmp = NamedTempFile::new_in(&self.dir)?;
        tmp.write_all(value.as_bytes())?;
        tmp.as_file().sync_all()?;
        tmp.persist(&path).map_err(|e| Error::Io(e.error))?;

        debug!(key, bytes = value.len(), "stored entry");
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        let path = self.entry_path(key)?;
        let _lock = self.lock()?;

        match fs::remove_file(&path) {
            Ok(()) => {
                debug!(key, "removed entry");
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_set_and_get() {
        let dir = tempdir().unwrap();
        let store = FileStore::open(dir.path()).unwrap();

        assert_eq!(store.get("smarthome_users").unwrap(), None);
        store.set("smarthome_users", "[]").unwrap();
        assert_eq!(store.get("smarthome_users").unwrap(), Some("[]".to_string()));
        assert!(dir.path().join("smarthome_users.json").exists());
    }

    #[test]
    fn test_values_survive_reopen() {
        let dir = tempdir().unwrap();
        {
            let store = FileStore::open(dir.path()).unwrap();
            store.set("k", "{\"a\":1}").unwrap();
        }
        let store = FileStore::open(dir.path()).unwrap();
        assert_eq!(store.get("k").unwrap(), Some("{\"a\":1}".to_string()));
    }

    #[test]
    fn test_remove_is_idempotent() {
        let dir = tempdir().unwrap();
        let store = FileStore::open(dir.path()).unwrap();

        store.set("k", "v").unwrap();
        store.remove("k").unwrap();
        store.remove("k").unwrap();
        assert_eq!(store.get("k").unwrap(), None);
    }

    #[test]
    fn test_rejects_path_like_keys() {
        let dir = tempdir().unwrap();
        let store = FileStore::open(dir.path()).unwrap();

        for key in ["", "../escape", "a/b", "dot.json"] {
            assert!(matches!(store.set(key, "x"), Err(Error::Storage(_))), "key {:?}", key);
            assert!(store.get(key).is_err());
        }
    }

    #[test]
    fn test_no_temp_files_left_behind() {
        let dir = tempdir().unwrap();
        let store = FileStore::open(dir.path()).unwrap();
        for i in 0..5 {
            store.set("k", &i.to_string()).unwrap();
        }

        let names: Vec<String> = fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names.len(), 2, "unexpected files: {:?}", names);
        assert!(names.contains(&"k.json".to_string()));
        assert!(names.contains(&LOCK_FILE.to_string()));
    }

    #[test]
    fn test_creates_missing_directory() {
        let dir = tempdir().unwrap();
        let nested = dir.path().join("profiles").join("default");
        let store = FileStore::open(&nested).unwrap();
        store.set("k", "v").unwrap();
        assert_eq!(store.dir(), nested.as_path());
    }

    #[test]
    fn test_set_waits_for_held_lock() {
        let dir = tempdir().unwrap();
        let store = FileStore::open(dir.path()).unwrap();

        let holder = OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(dir.path().join(LOCK_FILE))
            .unwrap();
        FileExt::try_lock_exclusive(&holder).unwrap();

        let releaser = thread::spawn(move || {
            thread::sleep(Duration::from_millis(300));
            FileExt::unlock(&holder).unwrap();
        });

        store.set("k", "v").unwrap();
        releaser.join().unwrap();
        assert_eq!(store.get("k").unwrap(), Some("v".to_string()));
    }
}
