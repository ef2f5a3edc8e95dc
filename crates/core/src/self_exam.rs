use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Whether an entry originated from a self-exam.
///
/// Unlike the ABCDE flags this field has no canonical form: callers may hand
/// in a real boolean or any text, and whatever text was stored comes back as
/// `Raw` on read. `Raw` values are never interpreted as booleans.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SelfExamFlag {
    Bool(bool),
    Raw(String),
}

impl SelfExamFlag {
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            SelfExamFlag::Bool(b) => Some(*b),
            SelfExamFlag::Raw(_) => None,
        }
    }

    pub fn as_raw(&self) -> Option<&str> {
        match self {
            SelfExamFlag::Raw(s) => Some(s),
            SelfExamFlag::Bool(_) => None,
        }
    }
}

impl Default for SelfExamFlag {
    fn default() -> Self {
        SelfExamFlag::Raw("1".to_string())
    }
}

impl From<bool> for SelfExamFlag {
    fn from(value: bool) -> Self {
        SelfExamFlag::Bool(value)
    }
}

impl From<i64> for SelfExamFlag {
    fn from(value: i64) -> Self {
        SelfExamFlag::Raw(value.to_string())
    }
}

impl From<&str> for SelfExamFlag {
    fn from(value: &str) -> Self {
        SelfExamFlag::Raw(value.to_string())
    }
}

impl From<String> for SelfExamFlag {
    fn from(value: String) -> Self {
        SelfExamFlag::Raw(value)
    }
}

impl fmt::Display for SelfExamFlag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SelfExamFlag::Bool(b) => write!(f, "{b}"),
            SelfExamFlag::Raw(s) => write!(f, "{s}"),
        }
    }
}

impl Serialize for SelfExamFlag {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            SelfExamFlag::Bool(b) => serializer.serialize_bool(*b),
            SelfExamFlag::Raw(s) => serializer.serialize_str(s),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum WireFlag {
    Bool(bool),
    Integer(i64),
    Text(String),
}

impl<'de> Deserialize<'de> for SelfExamFlag {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(match WireFlag::deserialize(deserializer)? {
            WireFlag::Bool(b) => SelfExamFlag::Bool(b),
            WireFlag::Integer(n) => SelfExamFlag::from(n),
            WireFlag::Text(s) => SelfExamFlag::Raw(s),
        })
    }
}
