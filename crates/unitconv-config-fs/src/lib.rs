// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Filesystem-backed `KvStore` for unitconv (uses the platform data dir).

use directories::ProjectDirs;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use unitconv_core::store::{KvStore, StoreError};

/// Store each key as a JSON file under a base directory.
pub struct FsKvStore {
    base: PathBuf,
}

impl FsKvStore {
    /// Create a store rooted at the user data directory (e.g., `~/.local/share/unitconverter`).
    pub fn new() -> Result<Self, StoreError> {
        let proj = ProjectDirs::from("dev", "unitconv", "UnitConverter")
            .ok_or_else(|| StoreError::Unavailable("could not resolve data dir".into()))?;
        Self::at(proj.data_dir())
    }

    /// Create a store rooted at `base`, creating the directory if needed.
    pub fn at(base: impl AsRef<Path>) -> Result<Self, StoreError> {
        let base = base.as_ref().to_path_buf();
        fs::create_dir_all(&base)?;
        Ok(Self { base })
    }

    /// Directory holding the JSON files.
    pub fn base(&self) -> &Path {
        &self.base
    }

    fn path_for(&self, key: &str) -> PathBuf {
        let filename = format!("{key}.json");
        self.base.join(filename)
    }
}

impl KvStore for FsKvStore {
    fn load_raw(&self, key: &str) -> Result<Vec<u8>, StoreError> {
        let path = self.path_for(key);
        match fs::read(path) {
            Ok(bytes) => Ok(bytes),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Err(StoreError::NotFound),
            Err(err) => Err(StoreError::Io(err)),
        }
    }

    fn save_raw(&self, key: &str, data: &[u8]) -> Result<(), StoreError> {
        let path = self.path_for(key);
        let dir = path.parent().unwrap_or(&self.base);
        fs::create_dir_all(dir)?;
        // Write beside the target and rename so readers never see a partial file.
        let mut tmp = NamedTempFile::new_in(dir)?;
        tmp.write_all(data)?;
        tmp.as_file().sync_all()?;
        tmp.persist(&path).map_err(|e| StoreError::Io(e.error))?;
        Ok(())
    }

    fn remove_raw(&self, key: &str) -> Result<(), StoreError> {
        match fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(StoreError::Io(err)),
        }
    }
}
