//! Front cover extraction from a game detail document.

use coverdeck_types::error::{CoverdeckError, Result};

use crate::record::{Node, TEXT_KEY};

const FRONT: &str = "front";

/// One box-art image: absolute URL plus its `side` attribute, if any.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtworkReference {
    pub url: String,
    pub side: Option<String>,
}

impl ArtworkReference {
    pub fn is_front(&self) -> bool {
        self.side.as_deref() == Some(FRONT)
    }
}

/// Extract the front cover reference from a detail document root.
///
/// A single boxart entry is used as-is regardless of its side. Several are
/// filtered to `side="front"` entries that carry a path, and the first in
/// document order is taken.
pub fn extract_boxart(detail: &Node) -> Result<ArtworkReference> {
    let base = detail
        .get("baseImgUrl")
        .and_then(Node::as_text)
        .ok_or(CoverdeckError::MissingField("baseImgUrl"))?;
    let boxart = detail
        .at("Game/Images/boxart")
        .ok_or(CoverdeckError::NoBoxart)?;

    let chosen = match boxart {
        Node::List(items) => items
            .iter()
            .filter(|item| side_of(item) == Some(FRONT))
            .find_map(|item| item.get(TEXT_KEY).and_then(Node::as_text).map(|p| (item, p))),
        single => single.text_content().map(|p| (single, p)),
    };

    let (node, path) = chosen.ok_or(CoverdeckError::NoBoxart)?;
    if path.is_empty() {
        return Err(CoverdeckError::NoBoxart);
    }
    Ok(ArtworkReference {
        url: format!("{base}{path}"),
        side: side_of(node).map(str::to_string),
    })
}

fn side_of(node: &Node) -> Option<&str> {
    node.get("side").and_then(Node::as_text)
}
