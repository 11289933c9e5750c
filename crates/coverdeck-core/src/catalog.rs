//! Catalog entries and directory scanning.

use std::cell::OnceCell;
use std::ffi::OsStr;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use log::Level;

use crate::diag::SinkHandle;
use crate::error::{CoverdeckError, Result};
use crate::selection::PersistedSelection;

const COMPONENT: &str = "catalog";

/// One launchable item: a link file plus, once resolved, its artwork.
///
/// Entries compare equal by name only.
#[derive(Debug, Clone)]
pub struct CatalogEntry {
    name: String,
    link: PathBuf,
    image: OnceCell<PathBuf>,
}

impl CatalogEntry {
    pub fn new(name: impl Into<String>, link: PathBuf) -> Self {
        Self {
            name: name.into(),
            link,
            image: OnceCell::new(),
        }
    }

    /// Entry named after the link's base file name.
    pub fn from_link(link: PathBuf) -> Option<Self> {
        let name = link.file_stem()?.to_str()?.to_string();
        Some(Self::new(name, link))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn link(&self) -> &Path {
        &self.link
    }

    /// Resolved artwork, if resolution already ran.
    pub fn image(&self) -> Option<&Path> {
        self.image.get().map(PathBuf::as_path)
    }

    /// Record the resolved artwork. The first value sticks.
    pub fn set_image(&self, path: PathBuf) -> &Path {
        self.image.get_or_init(|| path)
    }

    /// Conventional cache location: the link path with `extension`.
    pub fn cache_path(&self, extension: &str) -> PathBuf {
        self.link.with_extension(extension)
    }
}

impl PartialEq for CatalogEntry {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for CatalogEntry {}

/// Enumerates link files in a catalog directory.
pub struct CatalogScanner {
    link_extension: String,
    sink: SinkHandle,
}

impl CatalogScanner {
    pub fn new(link_extension: impl Into<String>, sink: SinkHandle) -> Self {
        Self {
            link_extension: link_extension.into(),
            sink,
        }
    }

    /// Scan `dir` (non-recursive) for link files.
    ///
    /// Entries come back sorted by file name with duplicate names dropped,
    /// except that the entry whose link equals the persisted selection is
    /// moved to the front. A missing directory and an empty one are
    /// distinct errors; both are fatal to the application.
    pub fn scan(&self, dir: &Path, selection: &mut PersistedSelection) -> Result<Vec<CatalogEntry>> {
        let read = match fs::read_dir(dir) {
            Ok(read) => read,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(CoverdeckError::CatalogMissing(dir.to_path_buf()));
            },
            Err(e) => return Err(e.into()),
        };

        let mut links = Vec::new();
        for item in read {
            let path = item?.path();
            // Follows symlinks, so a linked link file still counts.
            if path.is_file() && self.is_link(&path) {
                links.push(path);
            }
        }
        links.sort_by(|a, b| a.file_name().cmp(&b.file_name()));

        let mut entries: Vec<CatalogEntry> = Vec::with_capacity(links.len());
        for link in links {
            let Some(entry) = CatalogEntry::from_link(link.clone()) else {
                self.sink.record(
                    Level::Warn,
                    COMPONENT,
                    &format!("skipping {}: name is not valid UTF-8", link.display()),
                );
                continue;
            };
            if entries.contains(&entry) {
                self.sink.record(
                    Level::Debug,
                    COMPONENT,
                    &format!("skipping duplicate entry {:?}", entry.name()),
                );
                continue;
            }
            entries.push(entry);
        }

        if entries.is_empty() {
            return Err(CoverdeckError::CatalogEmpty(dir.to_path_buf()));
        }

        if let Some(last) = selection.read()? {
            if let Some(pos) = entries.iter().position(|e| e.link() == last) {
                let entry = entries.remove(pos);
                entries.insert(0, entry);
            }
        }

        self.sink.record(
            Level::Info,
            COMPONENT,
            &format!("{} entries in {}", entries.len(), dir.display()),
        );
        Ok(entries)
    }

    fn is_link(&self, path: &Path) -> bool {
        path.extension()
            .and_then(OsStr::to_str)
            .is_some_and(|ext| ext.eq_ignore_ascii_case(&self.link_extension))
    }
}
