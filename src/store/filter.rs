//! Name predicates used by search and bulk deletion

use crate::record::Record;

/// Case-insensitive match on the `nama` field.
///
/// Records without a textual `nama` never match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NameFilter {
    /// `nama` contains the needle
    Containing(String),
    /// `nama` equals the needle
    Exact(String),
}

impl NameFilter {
    pub fn containing(needle: &str) -> Self {
        NameFilter::Containing(needle.to_lowercase())
    }

    pub fn exact(needle: &str) -> Self {
        NameFilter::Exact(needle.to_lowercase())
    }

    pub fn matches(&self, record: &Record) -> bool {
        let Some(name) = record.name() else {
            return false;
        };
        let name = name.to_lowercase();
        match self {
            NameFilter::Containing(needle) => name.contains(needle.as_str()),
            NameFilter::Exact(needle) => name == *needle,
        }
    }
}
