//! Durable page cache keyed by logical request identity
//!
//! One file per logical key, named by a one-way hash of the key. This is a
//! memoization cache: the key is the request identity (e.g. `PLAYER::Faker`),
//! not the payload, and entries are never expired or rewritten — a hit always
//! returns the original capture.

use sha2::{Digest, Sha256};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// File extension for cache entries
const CACHE_EXT: &str = "html";

/// Filesystem-backed content cache
///
/// Holds no in-memory state; every call goes to the filesystem, so a process
/// restart sees exactly what the previous run left behind.
pub struct ContentCache {
    dir: PathBuf,
}

impl ContentCache {
    /// Creates a cache rooted at the given directory
    ///
    /// The directory is created lazily on the first `put`.
    pub fn new<P: AsRef<Path>>(dir: P) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    /// Returns the cached payload for a key, or `None` on a miss
    pub fn get(&self, key: &str) -> io::Result<Option<String>> {
        match fs::read_to_string(self.entry_path(key)) {
            Ok(payload) => Ok(Some(payload)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Stores a payload under a key
    ///
    /// Writing the same key again replaces the file with identical content in
    /// practice; this system never calls `put` with a new payload for an
    /// existing key.
    pub fn put(&self, key: &str, payload: &str) -> io::Result<()> {
        fs::create_dir_all(&self.dir)?;
        fs::write(self.entry_path(key), payload)
    }

    fn entry_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.{}", fingerprint(key), CACHE_EXT))
    }
}

/// Deterministic file-safe fingerprint of a logical key
pub fn fingerprint(key: &str) -> String {
    hex::encode(Sha256::digest(key.as_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_get_miss_returns_none() {
        let dir = tempdir().unwrap();
        let cache = ContentCache::new(dir.path());

        assert_eq!(cache.get("PLAYER::Faker").unwrap(), None);
    }

    #[test]
    fn test_put_then_get_round_trips() {
        let dir = tempdir().unwrap();
        let cache = ContentCache::new(dir.path());

        cache.put("PLAYER::Faker", "<html>body</html>").unwrap();
        assert_eq!(
            cache.get("PLAYER::Faker").unwrap(),
            Some("<html>body</html>".to_string())
        );
    }

    #[test]
    fn test_keys_do_not_collide() {
        let dir = tempdir().unwrap();
        let cache = ContentCache::new(dir.path());

        cache.put("PLAYER::A", "first").unwrap();
        cache.put("PLAYER::B", "second").unwrap();

        assert_eq!(cache.get("PLAYER::A").unwrap(), Some("first".to_string()));
        assert_eq!(cache.get("PLAYER::B").unwrap(), Some("second".to_string()));
    }

    #[test]
    fn test_missing_directory_is_a_miss() {
        let dir = tempdir().unwrap();
        let cache = ContentCache::new(dir.path().join("never_created"));

        assert_eq!(cache.get("anything").unwrap(), None);
    }

    #[test]
    fn test_fingerprint_is_deterministic_and_file_safe() {
        let a = fingerprint("INDEX::Portal:Players");
        let b = fingerprint("INDEX::Portal:Players");

        assert_eq!(a, b);
        assert_eq!(a.len(), 64);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_fingerprint_differs_per_key() {
        assert_ne!(fingerprint("PLAYER::A"), fingerprint("PLAYER::B"));
    }
}
