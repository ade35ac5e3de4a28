use crate::{Error, FeatureVector, Result};
use ahash::AHashMap;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identifier of a record in the record store
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecordId {
    Integer(u64),
    Uuid(Uuid),
    String(String),
}

impl std::fmt::Display for RecordId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RecordId::Integer(i) => write!(f, "{}", i),
            RecordId::Uuid(u) => write!(f, "{}", u),
            RecordId::String(s) => write!(f, "{}", s),
        }
    }
}

impl From<u64> for RecordId {
    fn from(i: u64) -> Self {
        RecordId::Integer(i)
    }
}

impl From<String> for RecordId {
    fn from(s: String) -> Self {
        RecordId::String(s)
    }
}

impl From<&str> for RecordId {
    fn from(s: &str) -> Self {
        RecordId::String(s.to_string())
    }
}

impl From<Uuid> for RecordId {
    fn from(u: Uuid) -> Self {
        RecordId::Uuid(u)
    }
}

/// A record: identity, feature vector and optional JSON payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Record {
    pub id: RecordId,
    #[serde(default)]
    pub features: FeatureVector,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload: Option<serde_json::Value>,
}

impl Record {
    #[inline]
    #[must_use]
    pub fn new(id: impl Into<RecordId>, features: FeatureVector) -> Self {
        Self {
            id: id.into(),
            features,
            payload: None,
        }
    }

    #[must_use]
    pub fn with_payload(mut self, payload: serde_json::Value) -> Self {
        self.payload = Some(payload);
        self
    }
}

/// Read-only lookup of records by identifier.
///
/// The estimator only needs to materialise record pairs for the match
/// function, so this is the whole surface it requires from a database.
pub trait RecordStore {
    fn record(&self, id: &RecordId) -> Option<&Record>;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Lookup that fails with [`Error::UnknownRecord`] instead of returning `None`
    fn require(&self, id: &RecordId) -> Result<&Record> {
        self.record(id)
            .ok_or_else(|| Error::UnknownRecord(id.to_string()))
    }
}

/// In-memory record store
#[derive(Debug, Clone, Default)]
pub struct Database {
    records: AHashMap<RecordId, Record>,
}

impl Database {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a database, rejecting duplicate identifiers
    pub fn from_records(records: impl IntoIterator<Item = Record>) -> Result<Self> {
        let mut db = Self::new();
        for record in records {
            db.insert(record)?;
        }
        Ok(db)
    }

    pub fn insert(&mut self, record: Record) -> Result<()> {
        if self.records.contains_key(&record.id) {
            return Err(Error::DuplicateRecord(record.id.to_string()));
        }
        self.records.insert(record.id.clone(), record);
        Ok(())
    }
}

impl RecordStore for Database {
    fn record(&self, id: &RecordId) -> Option<&Record> {
        self.records.get(id)
    }

    fn len(&self) -> usize {
        self.records.len()
    }
}
