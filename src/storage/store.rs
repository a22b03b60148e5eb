use std::collections::HashSet;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tracing::{debug, info, warn};

use crate::error::{Error, Result};
use crate::feed::Entry;
use crate::storage::format::StoreDocument;

/// Flat, ordered list of every entry reported so far, kept in one file.
///
/// The whole file is read at the start of a cycle and rewritten whenever new
/// entries are added. There is no locking: two overlapping runs against the
/// same path can lose each other's additions.
#[derive(Debug, Clone)]
pub struct RecordStore {
    path: PathBuf,
}

impl RecordStore {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load every stored entry. A missing file is the normal first-run state
    /// and yields an empty list; a file that exists but cannot be decoded is
    /// fatal.
    pub fn load(&self) -> Result<Vec<Entry>> {
        if !self.path.exists() {
            warn!("Database file \"{}\" was not found", self.path.display());
            return Ok(Vec::new());
        }

        let content = fs::read_to_string(&self.path).map_err(|e| {
            Error::CorruptStore(format!("Failed to read '{}': {}", self.path.display(), e))
        })?;

        let document = StoreDocument::decode(&content)?;
        debug!("Loaded {} entries from {}", document.entries.len(), self.path.display());
        Ok(document.entries)
    }

    /// Replace the file contents with `entries`. Written to a sibling temp
    /// file first and renamed into place, so a failed write leaves the
    /// previous store intact.
    ///
    /// On Unix the replacement keeps the mode of the file it replaces; a new
    /// store is created `0644` rather than the temp file's `0600`.
    pub fn save(&self, entries: &[Entry]) -> Result<()> {
        let content = StoreDocument::new(entries.to_vec()).encode()?;

        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        if !dir.exists() {
            fs::create_dir_all(&dir).map_err(|e| {
                Error::Storage(format!("Failed to create directory '{}': {}", dir.display(), e))
            })?;
        }

        let mut temp = NamedTempFile::new_in(&dir).map_err(|e| {
            Error::Storage(format!("Failed to create temp file in '{}': {}", dir.display(), e))
        })?;
        temp.write_all(content.as_bytes())
            .and_then(|_| temp.as_file().sync_all())
            .map_err(|e| Error::Storage(format!("Failed to write store: {}", e)))?;
        #[cfg(unix)]
        fs::set_permissions(temp.path(), self.file_permissions())
            .map_err(|e| Error::Storage(format!("Failed to set store permissions: {}", e)))?;
        temp.persist(&self.path).map_err(|e| {
            Error::Storage(format!("Failed to replace '{}': {}", self.path.display(), e.error))
        })?;

        info!("Saved {} entries to {}", entries.len(), self.path.display());
        Ok(())
    }

    #[cfg(unix)]
    fn file_permissions(&self) -> fs::Permissions {
        use std::os::unix::fs::PermissionsExt;

        match fs::metadata(&self.path) {
            Ok(meta) => meta.permissions(),
            Err(_) => fs::Permissions::from_mode(0o644),
        }
    }

    pub fn contains(&self, title: &str) -> Result<bool> {
        Ok(self.load()?.iter().any(|e| e.title == title))
    }
}

/// Entries from `incoming` whose title does not appear in `existing`, in
/// incoming order. Titles are compared exactly.
pub fn novel(existing: &[Entry], incoming: &[Entry]) -> Vec<Entry> {
    let known = titles(existing);
    incoming
        .iter()
        .filter(|e| !known.contains(e.title.as_str()))
        .cloned()
        .collect()
}

pub fn titles(entries: &[Entry]) -> HashSet<&str> {
    entries.iter().map(|e| e.title.as_str()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use tempfile::TempDir;

    fn entry(title: &str) -> Entry {
        Entry::new(title, format!("https://distrowatch.com/{}", title.len()), format!("About {}", title))
    }

    #[test]
    fn test_load_missing_file_is_empty() {
        let temp_dir = TempDir::new().unwrap();
        let store = RecordStore::new(temp_dir.path().join("distro_data.json"));

        assert!(store.load().unwrap().is_empty());
        assert!(!store.path().exists());
    }

    #[test]
    fn test_save_load_round_trip() {
        let temp_dir = TempDir::new().unwrap();
        let store = RecordStore::new(temp_dir.path().join("distro_data.json"));
        let entries = vec![
            entry("Ubuntu 22.04 released"),
            Entry::new("Arch Linux 2024.01.01 ISO", "https://archlinux.org", "ünïcödé \"quoted\"\nnewline"),
        ];

        store.save(&entries).unwrap();
        assert_eq!(store.load().unwrap(), entries);
    }

    #[test]
    fn test_save_overwrites_and_creates_parent() {
        let temp_dir = TempDir::new().unwrap();
        let store = RecordStore::new(temp_dir.path().join("nested/dir/store.json"));

        store.save(&[entry("one"), entry("two")]).unwrap();
        store.save(&[entry("three")]).unwrap();

        assert_eq!(store.load().unwrap(), vec![entry("three")]);
    }

    #[cfg(unix)]
    #[test]
    fn test_save_file_mode() {
        use std::os::unix::fs::PermissionsExt;

        let temp_dir = TempDir::new().unwrap();
        let store = RecordStore::new(temp_dir.path().join("distro_data.json"));
        let mode = |p: &Path| fs::metadata(p).unwrap().permissions().mode() & 0o777;

        store.save(&[entry("one")]).unwrap();
        assert_eq!(mode(store.path()), 0o644);

        // A mode chosen by the user survives the rewrite
        fs::set_permissions(store.path(), fs::Permissions::from_mode(0o640)).unwrap();
        store.save(&[entry("one"), entry("two")]).unwrap();
        assert_eq!(mode(store.path()), 0o640);
    }

    #[test]
    fn test_corrupt_file_is_fatal() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("distro_data.json");
        fs::write(&path, b"\x80\x03]q\x00(}q\x01").unwrap();

        let store = RecordStore::new(&path);
        assert!(matches!(store.load(), Err(Error::CorruptStore(_))));
    }

    #[test]
    fn test_save_into_unwritable_destination_fails() {
        let temp_dir = TempDir::new().unwrap();
        let blocker = temp_dir.path().join("not-a-dir");
        fs::write(&blocker, "file").unwrap();

        let store = RecordStore::new(blocker.join("store.json"));
        assert!(matches!(store.save(&[entry("x")]), Err(Error::Storage(_))));
    }

    #[test]
    fn test_contains() {
        let temp_dir = TempDir::new().unwrap();
        let store = RecordStore::new(temp_dir.path().join("store.json"));
        store.save(&[entry("Ubuntu 22.04 released")]).unwrap();

        assert!(store.contains("Ubuntu 22.04 released").unwrap());
        assert!(!store.contains("ubuntu 22.04 released").unwrap());
    }

    #[test]
    fn test_novel_uses_exact_titles() {
        let existing = vec![entry("Ubuntu 22.04 released")];
        let incoming = vec![
            entry("Ubuntu 22.04 released"),
            entry("Arch Linux 2024.01.01 ISO"),
            entry("UBUNTU 22.04 RELEASED"),
        ];

        let fresh = novel(&existing, &incoming);
        assert_eq!(fresh, vec![entry("Arch Linux 2024.01.01 ISO"), entry("UBUNTU 22.04 RELEASED")]);
    }

    #[test]
    fn test_novel_against_empty_store() {
        let incoming = vec![entry("a"), entry("b")];
        assert_eq!(novel(&[], &incoming), incoming);
        assert!(novel(&incoming, &incoming).is_empty());
    }

    proptest! {
        #[test]
        fn prop_novel_is_incoming_minus_stored_titles(
            stored in proptest::collection::vec("[a-d]{1,2}", 0..8),
            incoming in proptest::collection::vec("[a-d]{1,2}", 0..8),
        ) {
            let stored: Vec<Entry> = stored.iter().map(|t| entry(t)).collect();
            let incoming: Vec<Entry> = incoming.iter().map(|t| entry(t)).collect();

            let fresh = novel(&stored, &incoming);
            let expected: Vec<Entry> = incoming
                .iter()
                .filter(|i| stored.iter().all(|s| s.title != i.title))
                .cloned()
                .collect();
            prop_assert_eq!(fresh, expected);
        }
    }
}
