//! Person records
//!
//! A record is a JSON object with a positive integer `id`, the `nama` and
//! `alamat` text fields, and any number of additional free-form fields.
//! Key order is preserved exactly as loaded or supplied.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Field name of the record identifier
pub const ID_FIELD: &str = "id";

/// Field name of the person's name
pub const NAME_FIELD: &str = "nama";

/// Field name of the person's address
pub const ADDRESS_FIELD: &str = "alamat";

/// Free-form field map supplied by callers on create and update
pub type Fields = Map<String, Value>;

/// The complete ordered set of records at a point in time
pub type Collection = Vec<Record>;

/// A single person record.
///
/// Invariant: `fields["id"]` is always a positive JSON integer matching `id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(into = "Map<String, Value>", try_from = "Map<String, Value>")]
pub struct Record {
    id: u64,
    fields: Fields,
}

impl Record {
    /// Build a new record with the given id.
    ///
    /// `id` is placed first; any `id` key present in `fields` is discarded.
    pub fn new(id: u64, fields: Fields) -> Self {
        let mut all = Map::with_capacity(fields.len() + 1);
        all.insert(ID_FIELD.to_string(), Value::from(id));
        all.extend(fields.into_iter().filter(|(key, _)| key != ID_FIELD));
        Self { id, fields: all }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    /// The `nama` field, if present and textual
    pub fn name(&self) -> Option<&str> {
        self.fields.get(NAME_FIELD).and_then(Value::as_str)
    }

    /// The `alamat` field, if present and textual
    pub fn address(&self) -> Option<&str> {
        self.fields.get(ADDRESS_FIELD).and_then(Value::as_str)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// All fields including `id`, in stored order
    pub fn fields(&self) -> &Fields {
        &self.fields
    }

    /// Shallow merge: every supplied key overwrites the existing value,
    /// keys not supplied stay untouched. `id` is never overwritten.
    pub fn merge(&mut self, fields: Fields) {
        for (key, value) in fields {
            if key == ID_FIELD {
                continue;
            }
            self.fields.insert(key, value);
        }
    }
}

/// Reasons a JSON object cannot be accepted as a record
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvalidRecord {
    MissingId,
    NonIntegerId(String),
    NonPositiveId,
}

impl fmt::Display for InvalidRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InvalidRecord::MissingId => write!(f, "record has no `id` field"),
            InvalidRecord::NonIntegerId(raw) => {
                write!(f, "record `id` is not an integer: {}", raw)
            }
            InvalidRecord::NonPositiveId => write!(f, "record `id` must be positive"),
        }
    }
}

impl std::error::Error for InvalidRecord {}

/// Parses an id value. Integer-valued strings are accepted and
/// normalized, matching documents written by older tooling.
fn parse_id(value: &Value) -> Result<u64, InvalidRecord> {
    let parsed = match value {
        Value::Number(n) => match (n.as_u64(), n.as_i64()) {
            (Some(id), _) => Some(id),
            (None, Some(_)) => return Err(InvalidRecord::NonPositiveId),
            _ => None,
        },
        Value::String(s) => match s.trim().parse::<i64>() {
            Ok(id) if id <= 0 => return Err(InvalidRecord::NonPositiveId),
            Ok(id) => Some(id as u64),
            Err(_) => None,
        },
        _ => None,
    };

    match parsed {
        Some(0) => Err(InvalidRecord::NonPositiveId),
        Some(id) => Ok(id),
        None => Err(InvalidRecord::NonIntegerId(value.to_string())),
    }
}

impl TryFrom<Map<String, Value>> for Record {
    type Error = InvalidRecord;

    fn try_from(mut fields: Map<String, Value>) -> Result<Self, Self::Error> {
        let id = fields
            .get(ID_FIELD)
            .ok_or(InvalidRecord::MissingId)
            .and_then(parse_id)?;
        // Keeps the key in place under preserve_order.
        if let Some(slot) = fields.get_mut(ID_FIELD) {
            *slot = Value::from(id);
        }
        Ok(Self { id, fields })
    }
}

impl From<Record> for Map<String, Value> {
    fn from(record: Record) -> Self {
        record.fields
    }
}

impl From<Record> for Value {
    fn from(record: Record) -> Self {
        Value::Object(record.fields)
    }
}
