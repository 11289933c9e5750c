//! Persisted selection marker.
//!
//! A one-line text file in the catalog directory holding the link path of
//! the last launched entry. Read once per process and cached.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::Result;

pub struct PersistedSelection {
    path: PathBuf,
    cached: Option<Option<PathBuf>>,
}

impl PersistedSelection {
    pub fn new(path: PathBuf) -> Self {
        Self { path, cached: None }
    }

    /// Marker named `file_name` inside `dir`.
    pub fn in_dir(dir: &Path, file_name: &str) -> Self {
        Self::new(dir.join(file_name))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Last recorded link path, or `None` if nothing was ever recorded.
    ///
    /// The first call creates an empty marker file when none exists. Later
    /// calls return the cached value without touching the disk.
    pub fn read(&mut self) -> Result<Option<PathBuf>> {
        if let Some(cached) = &self.cached {
            return Ok(cached.clone());
        }
        let value = if self.path.exists() {
            let text = fs::read_to_string(&self.path)?;
            text.lines()
                .next()
                .map(str::trim)
                .filter(|line| !line.is_empty())
                .map(PathBuf::from)
        } else {
            fs::File::create(&self.path)?;
            log::debug!("created selection marker {}", self.path.display());
            None
        };
        self.cached = Some(value.clone());
        Ok(value)
    }

    /// Overwrite the marker with `link`.
    pub fn write(&mut self, link: &Path) -> Result<()> {
        fs::write(&self.path, format!("{}\n", link.display()))?;
        self.cached = Some(Some(link.to_path_buf()));
        Ok(())
    }
}
