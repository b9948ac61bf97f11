//! Method identity
//!
//! Methods are interned by signature (`LClass;.name:(Args)Ret`). The first
//! registration of a signature decides whether it is static.

use once_cell::sync::Lazy;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use super::interning::Registry;

static METHOD_REGISTRY: Lazy<Registry<String, MethodData>> = Lazy::new(Registry::new);

#[derive(Debug)]
struct MethodData {
    signature: String,
    class: String,
    name: String,
    is_static: bool,
}

/// Interned method handle
#[derive(Clone)]
pub struct Method(Arc<MethodData>);

impl Method {
    /// Intern a method. If the signature is already known, the existing
    /// handle is returned and `is_static` is ignored.
    pub fn new(signature: &str, is_static: bool) -> Self {
        Method(METHOD_REGISTRY.intern(signature, || {
            let (class, name) = split_signature(signature);
            let data = MethodData {
                signature: signature.to_string(),
                class,
                name,
                is_static,
            };
            (signature.to_string(), Arc::new(data))
        }))
    }

    /// Intern an instance method (or return the known one)
    pub fn named(signature: &str) -> Self {
        Self::new(signature, false)
    }

    pub fn get(signature: &str) -> Option<Self> {
        METHOD_REGISTRY.get(signature).map(Method)
    }

    pub fn signature(&self) -> &str {
        &self.0.signature
    }

    /// Declaring class descriptor, e.g. `LFoo;`
    pub fn class(&self) -> &str {
        &self.0.class
    }

    pub fn name(&self) -> &str {
        &self.0.name
    }

    pub fn is_static(&self) -> bool {
        self.0.is_static
    }
}

/// `LFoo;.bar:(I)V` -> (`LFoo;`, `bar`)
fn split_signature(signature: &str) -> (String, String) {
    let without_proto = signature.split(':').next().unwrap_or(signature);
    match without_proto.rsplit_once(";.") {
        Some((class, name)) => (format!("{};", class), name.to_string()),
        None => (String::new(), without_proto.to_string()),
    }
}

impl PartialEq for Method {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl Eq for Method {}

impl Hash for Method {
    fn hash<H: Hasher>(&self, state: &mut H) {
        (Arc::as_ptr(&self.0) as usize).hash(state);
    }
}

impl PartialOrd for Method {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Method {
    fn cmp(&self, other: &Self) -> Ordering {
        if self == other {
            Ordering::Equal
        } else {
            self.signature().cmp(other.signature())
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.signature())
    }
}

impl fmt::Debug for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Method({})", self.signature())
    }
}

impl Serialize for Method {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.signature())
    }
}

impl<'de> Deserialize<'de> for Method {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let signature = String::deserialize(deserializer)?;
        Ok(Method::named(&signature))
    }
}
