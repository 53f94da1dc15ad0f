//! Data sources attached to a request, and the model identifier.
//!
//! Both are opaque to selection beyond their identifying fields: the
//! caller owns them and assistants' capability predicates inspect them.

use serde::{Deserialize, Serialize};

/// A data source attached to a conversational request (a file, a database...).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DataSource {
    /// Caller-assigned identifier.
    pub id: String,

    /// Kind of source, e.g. `"csv"` or `"sql"`.
    #[serde(rename = "type")]
    pub kind: String,
}

impl DataSource {
    pub fn new(id: impl Into<String>, kind: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind: kind.into(),
        }
    }

    /// Whether this source's type matches `kind`, ignoring ASCII case.
    pub fn is_kind(&self, kind: &str) -> bool {
        self.kind.eq_ignore_ascii_case(kind)
    }
}

impl std::fmt::Display for DataSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: ({})", self.id, self.kind)
    }
}

impl std::str::FromStr for DataSource {
    type Err = String;

    /// Parses `id:type`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.rsplit_once(':') {
            Some((id, kind)) if !id.trim().is_empty() && !kind.trim().is_empty() => {
                Ok(Self::new(id.trim(), kind.trim()))
            }
            _ => Err(format!("expected 'id:type', got '{s}'")),
        }
    }
}

/// Opaque token naming the active language model.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ModelId(pub String);

impl ModelId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ModelId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl std::fmt::Display for ModelId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
