//! File-backed mirror.
//!
//! Storage layout:
//! ```text
//! ~/.local/share/prepdesk/
//! ├── dashboard-state.json
//! ├── practice-state.json
//! ├── advocacy-documents.json
//! └── advocacy-active-document.json
//! ```

use std::fs;
use std::io;
use std::path::PathBuf;

use super::LocalMirror;

/// File extension for mirror entries.
const ENTRY_EXTENSION: &str = "json";

/// Mirror that keeps one file per key in a data directory.
#[derive(Clone, Debug)]
pub struct FileMirror {
    data_dir: PathBuf,
}

impl FileMirror {
    /// Creates a mirror rooted at `data_dir`. The directory is created lazily.
    pub fn new(data_dir: PathBuf) -> Self {
        Self { data_dir }
    }

    /// Returns the data directory path.
    pub fn data_dir(&self) -> &PathBuf {
        &self.data_dir
    }

    /// Returns the full path for a key.
    pub fn entry_path(&self, key: &str) -> PathBuf {
        let name: String = key
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                    c
                } else {
                    '_'
                }
            })
            .collect();
        self.data_dir.join(format!("{}.{}", name, ENTRY_EXTENSION))
    }
}

impl LocalMirror for FileMirror {
    fn read_raw(&self, key: &str) -> Option<String> {
        let path = self.entry_path(key);

        match fs::read_to_string(&path) {
            Ok(contents) => Some(contents),
            Err(e) if e.kind() == io::ErrorKind::NotFound => None,
            Err(e) => {
                tracing::warn!("Failed to read mirror entry {}: {}", path.display(), e);
                None
            }
        }
    }

    fn write_raw(&self, key: &str, value: &str) {
        if let Err(e) = fs::create_dir_all(&self.data_dir) {
            tracing::warn!(
                "Failed to create mirror directory {}: {}",
                self.data_dir.display(),
                e
            );
            return;
        }

        let path = self.entry_path(key);
        if let Err(e) = fs::write(&path, value) {
            tracing::warn!("Failed to write mirror entry {}: {}", path.display(), e);
        }
    }

    fn remove(&self, key: &str) {
        let path = self.entry_path(key);

        match fs::remove_file(&path) {
            Ok(()) => {}
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => tracing::warn!("Failed to remove mirror entry {}: {}", path.display(), e),
        }
    }
}
