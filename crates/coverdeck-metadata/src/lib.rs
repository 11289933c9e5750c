//! Client for the remote game metadata service.
//!
//! Responses are XML. They are normalized into a generic [`Node`] tree
//! ([`xml::parse_document`]), searched with a best-effort title heuristic
//! ([`search::choose_best_match`]) and mined for front cover art
//! ([`boxart::extract_boxart`]).

pub mod boxart;
pub mod client;
pub mod record;
pub mod search;
pub mod transport;
pub mod xml;

#[cfg(test)]
pub(crate) mod test_utils;

pub use boxart::{ArtworkReference, extract_boxart};
pub use client::{MetadataClient, MetadataConfig};
pub use record::{Mapping, Node};
pub use search::choose_best_match;
pub use transport::{HttpTransport, UreqTransport};
