//! Canonical names for cross-artifact (CRTEX) frames
//!
//! A template such as `%programmatic_leaf_name%` or `Lcom/Foo;.%via_type_of%`
//! is resolved against the callee of the call edge the frame crosses.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::features::FeatureFactory;
use super::identities::Feature;
use super::method::Method;

const PROGRAMMATIC_LEAF_NAME: &str = "%programmatic_leaf_name%";
const VIA_TYPE_OF: &str = "%via_type_of%";

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CanonicalName {
    Template(String),
    Instantiated(String),
}

impl CanonicalName {
    pub fn template(value: impl Into<String>) -> Self {
        CanonicalName::Template(value.into())
    }

    pub fn instantiated(value: impl Into<String>) -> Self {
        CanonicalName::Instantiated(value.into())
    }

    pub fn as_str(&self) -> &str {
        match self {
            CanonicalName::Template(value) | CanonicalName::Instantiated(value) => value,
        }
    }

    pub fn is_template(&self) -> bool {
        matches!(self, CanonicalName::Template(_))
    }

    /// Resolve a template against `callee`.
    ///
    /// `via_type_of_features` are the via-type-of features `factory`
    /// materialized for this frame at the call site. Returns `None` when the
    /// name is already instantiated or some placeholder cannot be resolved.
    pub fn instantiate(
        &self,
        callee: &Method,
        via_type_of_features: &[Feature],
        factory: &FeatureFactory,
    ) -> Option<CanonicalName> {
        let CanonicalName::Template(template) = self else {
            return None;
        };

        let mut value = template.replace(PROGRAMMATIC_LEAF_NAME, callee.signature());

        if value.contains(VIA_TYPE_OF) {
            let [feature] = via_type_of_features else {
                return None;
            };
            let type_name = factory.via_type_of_type_name(feature)?;
            value = value.replace(VIA_TYPE_OF, type_name);
        }

        if has_placeholder(&value) {
            return None;
        }
        Some(CanonicalName::Instantiated(value))
    }
}

const PLACEHOLDER_PATTERN: &str = r"%[a-z_]+%";

/// Unresolved `%placeholder%`
// SAFETY: constant pattern, covered by `test_placeholder_pattern_compiles`
static PLACEHOLDER: Lazy<Regex> =
    Lazy::new(|| Regex::new(PLACEHOLDER_PATTERN).expect("valid placeholder pattern"));

fn has_placeholder(value: &str) -> bool {
    PLACEHOLDER.is_match(value)
}

impl fmt::Display for CanonicalName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
