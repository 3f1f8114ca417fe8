//! Collection document encoding
//!
//! The document is a JSON array of record objects, pretty-printed with a
//! four space indent. Empty or whitespace-only content decodes to an empty
//! collection.

use serde::Serialize;
use serde_json::ser::PrettyFormatter;

use crate::record::Collection;

const INDENT: &[u8] = b"    ";

pub fn decode(content: &str) -> Result<Collection, serde_json::Error> {
    if content.trim().is_empty() {
        return Ok(Collection::new());
    }
    serde_json::from_str(content)
}

pub fn encode(collection: &Collection) -> Result<Vec<u8>, serde_json::Error> {
    let mut out = Vec::with_capacity(64 * (collection.len() + 1));
    let mut serializer =
        serde_json::Serializer::with_formatter(&mut out, PrettyFormatter::with_indent(INDENT));
    collection.serialize(&mut serializer)?;
    Ok(out)
}
