//! Source position identity (interned by path + line)

use once_cell::sync::Lazy;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use super::interning::Registry;

type PositionKey = (Option<String>, i32);

static POSITION_REGISTRY: Lazy<Registry<PositionKey, PositionData>> = Lazy::new(Registry::new);

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PositionData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    pub line: i32,
}

/// Interned position handle
#[derive(Clone)]
pub struct Position(Arc<PositionData>);

impl Position {
    pub fn new(path: Option<&str>, line: i32) -> Self {
        let key: PositionKey = (path.map(str::to_string), line);
        Position(POSITION_REGISTRY.intern(&key, || {
            let data = PositionData {
                path: key.0.clone(),
                line,
            };
            (key.clone(), Arc::new(data))
        }))
    }

    pub fn path(&self) -> Option<&str> {
        self.0.path.as_deref()
    }

    pub fn line(&self) -> i32 {
        self.0.line
    }
}

impl PartialEq for Position {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl Eq for Position {}

impl Hash for Position {
    fn hash<H: Hasher>(&self, state: &mut H) {
        (Arc::as_ptr(&self.0) as usize).hash(state);
    }
}

impl PartialOrd for Position {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Position {
    fn cmp(&self, other: &Self) -> Ordering {
        if self == other {
            Ordering::Equal
        } else {
            self.0.as_ref().cmp(other.0.as_ref())
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.path().unwrap_or("unknown"), self.line())
    }
}

impl fmt::Debug for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Position({})", self)
    }
}

impl Serialize for Position {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.0.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Position {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let data = PositionData::deserialize(deserializer)?;
        Ok(Position::new(data.path.as_deref(), data.line))
    }
}
