//! Access paths: abstract parameter/return positions plus a field path
//!
//! Text form: `Argument(1).field.sub`, `Return`, `Leaf`, `Anchor.Argument(-1)`.
//! Elements that are empty or contain `.`, `"` or `\` are written quoted,
//! with `"` and `\` escaped: `Return."a.b"`, `Return.""`.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use super::interning::interned_name;
use super::method::Method;
use crate::errors::{Result, TaintError};

interned_name!(
    /// One field segment of an access path
    PathElement,
    PATH_ELEMENT_REGISTRY
);

impl PathElement {
    pub fn field(name: &str) -> Self {
        Self::named(name)
    }
}

/// Root of an access path
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Root {
    /// Parameter `i` (`this` is argument 0 for instance methods)
    Argument(u32),
    Return,
    /// Port of a declared source/sink (no callee)
    Leaf,
    /// Cross-artifact port (canonicalized CRTEX ports)
    Anchor,
    Producer,
}

impl Root {
    pub fn is_argument(&self) -> bool {
        matches!(self, Root::Argument(_))
    }

    pub fn parameter_position(&self) -> Option<u32> {
        match self {
            Root::Argument(position) => Some(*position),
            _ => None,
        }
    }

    pub fn is_anchor(&self) -> bool {
        matches!(self, Root::Anchor)
    }
}

impl fmt::Display for Root {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Root::Argument(position) => write!(f, "Argument({})", position),
            Root::Return => f.write_str("Return"),
            Root::Leaf => f.write_str("Leaf"),
            Root::Anchor => f.write_str("Anchor"),
            Root::Producer => f.write_str("Producer"),
        }
    }
}

impl FromStr for Root {
    type Err = TaintError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "Return" => Ok(Root::Return),
            "Leaf" => Ok(Root::Leaf),
            "Anchor" => Ok(Root::Anchor),
            "Producer" => Ok(Root::Producer),
            _ => s
                .strip_prefix("Argument(")
                .and_then(|rest| rest.strip_suffix(')'))
                .and_then(|index| index.parse::<u32>().ok())
                .map(Root::Argument)
                .ok_or_else(|| TaintError::invalid_access_path(s)),
        }
    }
}

impl Serialize for Root {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Root {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(serde::de::Error::custom)
    }
}

/// Root plus field path
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AccessPath {
    root: Root,
    path: Vec<PathElement>,
}

impl AccessPath {
    /// Paths deeper than this are truncated on `append`, which keeps the
    /// set of callee ports (and so the frame lattice) finite.
    pub const MAX_PATH_DEPTH: usize = 4;

    pub fn new(root: Root) -> Self {
        Self {
            root,
            path: Vec::new(),
        }
    }

    pub fn with_path(root: Root, path: Vec<PathElement>) -> Self {
        Self { root, path }
    }

    pub fn root(&self) -> Root {
        self.root
    }

    pub fn path(&self) -> &[PathElement] {
        &self.path
    }

    /// Append one field. Taint on a prefix covers its extensions, so a path
    /// already at `MAX_PATH_DEPTH` is left unchanged.
    pub fn append(&mut self, element: PathElement) {
        if self.path.len() < Self::MAX_PATH_DEPTH {
            self.path.push(element);
        }
    }

    /// Normalize the port for cross-artifact (CRTEX) traceability.
    ///
    /// Argument ports are renumbered relative to the declared parameters, so
    /// `this` of an instance method becomes `Argument(-1)`; every port is
    /// re-rooted at `Anchor`.
    pub fn canonicalize_for_method(&self, method: &Method) -> AccessPath {
        let canonical_root = match self.root {
            Root::Anchor | Root::Producer => return self.clone(),
            Root::Argument(position) => {
                let shift = if method.is_static() { 0 } else { 1 };
                format!("Argument({})", i64::from(position) - shift)
            }
            other => other.to_string(),
        };

        let mut path = Vec::with_capacity(self.path.len() + 1);
        path.push(PathElement::field(&canonical_root));
        path.extend(self.path.iter().cloned());
        AccessPath::with_path(Root::Anchor, path)
    }
}

impl From<Root> for AccessPath {
    fn from(root: Root) -> Self {
        AccessPath::new(root)
    }
}

fn needs_quotes(element: &str) -> bool {
    element.is_empty() || element.contains(['.', '"', '\\'])
}

impl fmt::Display for AccessPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.root)?;
        for element in &self.path {
            let name = element.as_str();
            if !needs_quotes(name) {
                write!(f, ".{}", name)?;
                continue;
            }
            f.write_str(".\"")?;
            for c in name.chars() {
                if c == '"' || c == '\\' {
                    f.write_str("\\")?;
                }
                write!(f, "{}", c)?;
            }
            f.write_str("\"")?;
        }
        Ok(())
    }
}

/// Parse the `.element` sequence following the root
fn parse_path(text: &str) -> Option<Vec<PathElement>> {
    let mut path = Vec::new();
    let mut chars = text.chars().peekable();

    while let Some(separator) = chars.next() {
        if separator != '.' {
            return None;
        }
        let mut name = String::new();
        if chars.peek() == Some(&'"') {
            chars.next();
            loop {
                match chars.next()? {
                    '"' => break,
                    '\\' => match chars.next()? {
                        escaped @ ('"' | '\\') => name.push(escaped),
                        _ => return None,
                    },
                    c => name.push(c),
                }
            }
            if chars.peek().is_some_and(|&c| c != '.') {
                return None;
            }
        } else {
            while let Some(&c) = chars.peek() {
                if c == '.' {
                    break;
                }
                name.push(c);
                chars.next();
            }
            if needs_quotes(&name) {
                return None;
            }
        }
        path.push(PathElement::field(&name));
    }
    Some(path)
}

impl FromStr for AccessPath {
    type Err = TaintError;

    fn from_str(s: &str) -> Result<Self> {
        let (root_text, rest) = match s.find('.') {
            Some(index) => s.split_at(index),
            None => (s, ""),
        };
        if root_text.is_empty() {
            return Err(TaintError::invalid_access_path(s));
        }
        let root = root_text.parse::<Root>()?;
        let path = parse_path(rest).ok_or_else(|| TaintError::invalid_access_path(s))?;
        Ok(AccessPath { root, path })
    }
}

impl Serialize for AccessPath {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for AccessPath {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(serde::de::Error::custom)
    }
}
