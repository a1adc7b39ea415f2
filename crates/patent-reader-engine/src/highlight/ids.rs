use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique, stable identifier of a stored highlight range
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RangeId(String);

impl RangeId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RangeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RangeId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for RangeId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Key of one open document (one workspace tab)
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentId(String);

impl DocumentId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for DocumentId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for DocumentId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Source of fresh, collision-resistant range ids.
///
/// Split and merge never reuse an id: every produced range gets a new one.
pub trait IdGenerator {
    fn next_id(&mut self) -> RangeId;
}

impl<G: IdGenerator + ?Sized> IdGenerator for &mut G {
    fn next_id(&mut self) -> RangeId {
        (**self).next_id()
    }
}

/// Random v4 UUIDs, the default generator for live sessions
#[derive(Debug, Default, Clone, Copy)]
pub struct UuidIdGenerator;

impl IdGenerator for UuidIdGenerator {
    fn next_id(&mut self) -> RangeId {
        RangeId(Uuid::new_v4().to_string())
    }
}

/// Deterministic `prefix1`, `prefix2`, ... ids
#[derive(Debug, Clone)]
pub struct SequentialIdGenerator {
    prefix: String,
    issued: u64,
}

impl SequentialIdGenerator {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            issued: 0,
        }
    }

    /// Number of ids handed out so far
    pub fn issued(&self) -> u64 {
        self.issued
    }
}

impl Default for SequentialIdGenerator {
    fn default() -> Self {
        Self::new("h")
    }
}

impl IdGenerator for SequentialIdGenerator {
    fn next_id(&mut self) -> RangeId {
        self.issued += 1;
        RangeId(format!("{}{}", self.prefix, self.issued))
    }
}
