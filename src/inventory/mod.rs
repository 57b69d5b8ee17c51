//! Fetching and parsing of Sphinx object inventories.
//!
//! The source side ([`source`]) only moves bytes; the parser ([`parse`])
//! turns those bytes into a [`CorpusIndex`](crate::index::CorpusIndex).

pub mod parse;
pub mod source;

pub use parse::{DecodeStrategy, ObjectRecord, ParseOptions, Section, parse_inventory};
pub use source::{CommandSource, FileSource, InventorySource};
