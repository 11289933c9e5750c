//! Artwork resolution.
//!
//! Turns a catalog entry into a readable image path: the cached cover if
//! one sits next to the link, otherwise a freshly downloaded one, otherwise
//! the default artwork. Failures are reported to the diagnostic sink and
//! never reach the caller.

use std::fs;
use std::path::{Path, PathBuf};

use log::Level;

use coverdeck_metadata::{MetadataClient, Node, choose_best_match, extract_boxart};

use crate::catalog::CatalogEntry;
use crate::diag::SinkHandle;
use crate::error::{CoverdeckError, Result};

const COMPONENT: &str = "resolver";

pub struct ArtworkResolver {
    client: MetadataClient,
    image_extension: String,
    default_image: PathBuf,
    sink: SinkHandle,
}

impl ArtworkResolver {
    pub fn new(
        client: MetadataClient,
        image_extension: impl Into<String>,
        default_image: PathBuf,
        sink: SinkHandle,
    ) -> Self {
        Self {
            client,
            image_extension: image_extension.into(),
            default_image,
            sink,
        }
    }

    pub fn default_image(&self) -> &Path {
        &self.default_image
    }

    /// Image path for `entry`. Always returns some path; the result is
    /// memoized on the entry.
    pub fn resolve(&self, entry: &CatalogEntry) -> PathBuf {
        if let Some(image) = entry.image() {
            return image.to_path_buf();
        }
        let cache = entry.cache_path(&self.image_extension);
        if cache.is_file() {
            return entry.set_image(cache).to_path_buf();
        }
        let resolved = match self.fetch(entry.name(), &cache) {
            Ok(()) => {
                self.sink.record(
                    Level::Info,
                    COMPONENT,
                    &format!("cached cover for {:?} at {}", entry.name(), cache.display()),
                );
                cache
            },
            Err(e) => {
                self.sink.record(
                    Level::Warn,
                    COMPONENT,
                    &format!("no cover for {:?} ({e}), using default artwork", entry.name()),
                );
                self.default_image.clone()
            },
        };
        entry.set_image(resolved).to_path_buf()
    }

    fn fetch(&self, name: &str, target: &Path) -> Result<()> {
        let results = self.client.search_by_name(name)?;
        let chosen = choose_best_match(&results, name)
            .ok_or_else(|| CoverdeckError::NoResults(name.to_string()))?;
        let id = chosen
            .get("id")
            .and_then(Node::as_integer)
            .ok_or(CoverdeckError::MissingField("id"))?;
        log::debug!("{name:?} matched game id {id}");

        let detail = self.client.get_by_id(id)?;
        let art = extract_boxart(&detail)?;
        let bytes = self.client.download(&art.url)?;
        write_atomically(target, &bytes)
    }
}

/// Write via a sibling temporary file so a failed write never leaves a
/// truncated cache file behind.
fn write_atomically(target: &Path, bytes: &[u8]) -> Result<()> {
    let mut tmp = target.as_os_str().to_owned();
    tmp.push(".part");
    let tmp = PathBuf::from(tmp);
    fs::write(&tmp, bytes)?;
    if let Err(e) = fs::rename(&tmp, target) {
        let _ = fs::remove_file(&tmp);
        return Err(e.into());
    }
    Ok(())
}
