//! Process-wide interning registries
//!
//! Every identity handle (`Kind`, `Method`, `Position`, ...) is an `Arc` into
//! one of these registries. Interning guarantees one allocation per distinct
//! value, so handles compare and hash by pointer while still ordering by
//! value. Registries are `DashMap`s: many analysis workers may intern and
//! read concurrently.

use dashmap::DashMap;
use std::borrow::Borrow;
use std::hash::Hash;
use std::sync::Arc;

/// Concurrent intern pool mapping a key to its single shared value
pub(crate) struct Registry<K, V: ?Sized> {
    pool: DashMap<K, Arc<V>>,
}

impl<K: Eq + Hash, V: ?Sized> Registry<K, V> {
    pub(crate) fn new() -> Self {
        Self {
            pool: DashMap::new(),
        }
    }

    /// Return the interned value for `key`, creating it with `make` on miss.
    ///
    /// `make` may run on two threads racing for the same key; only one result
    /// is ever stored and returned to both.
    pub(crate) fn intern<Q>(&self, key: &Q, make: impl FnOnce() -> (K, Arc<V>)) -> Arc<V>
    where
        K: Borrow<Q>,
        Q: Eq + Hash + ?Sized,
    {
        if let Some(existing) = self.pool.get(key) {
            return existing.value().clone();
        }
        let (owned_key, value) = make();
        self.pool.entry(owned_key).or_insert(value).value().clone()
    }

    /// Look up an interned value without creating it
    pub(crate) fn get<Q>(&self, key: &Q) -> Option<Arc<V>>
    where
        K: Borrow<Q>,
        Q: Eq + Hash + ?Sized,
    {
        self.pool.get(key).map(|entry| entry.value().clone())
    }

    pub(crate) fn len(&self) -> usize {
        self.pool.len()
    }
}

/// Define a string-valued interned identity.
///
/// Generates the handle type, its registry, identity equality/hashing,
/// value ordering, `Display`/`Debug` and string (de)serialization.
macro_rules! interned_name {
    ($(#[$meta:meta])* $name:ident, $registry:ident) => {
        $(#[$meta])*
        #[derive(Clone)]
        pub struct $name(std::sync::Arc<str>);

        static $registry: once_cell::sync::Lazy<
            $crate::shared::models::interning::Registry<String, str>,
        > = once_cell::sync::Lazy::new($crate::shared::models::interning::Registry::new);

        impl $name {
            /// Intern `name`, returning the shared handle
            pub fn named(name: &str) -> Self {
                $name($registry.intern(name, || {
                    (name.to_string(), std::sync::Arc::<str>::from(name))
                }))
            }

            /// Look up an already-interned handle
            pub fn get(name: &str) -> Option<Self> {
                $registry.get(name).map($name)
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Number of distinct values interned so far (process-wide)
            pub fn registry_size() -> usize {
                $registry.len()
            }
        }

        impl PartialEq for $name {
            fn eq(&self, other: &Self) -> bool {
                std::sync::Arc::ptr_eq(&self.0, &other.0)
            }
        }

        impl Eq for $name {}

        impl std::hash::Hash for $name {
            fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
                (std::sync::Arc::as_ptr(&self.0) as *const u8 as usize).hash(state);
            }
        }

        impl PartialOrd for $name {
            fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
                Some(self.cmp(other))
            }
        }

        impl Ord for $name {
            fn cmp(&self, other: &Self) -> std::cmp::Ordering {
                if self == other {
                    std::cmp::Ordering::Equal
                } else {
                    self.as_str().cmp(other.as_str())
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::fmt::Debug for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}({})", stringify!($name), self.as_str())
            }
        }

        impl serde::Serialize for $name {
            fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
                serializer.serialize_str(self.as_str())
            }
        }

        impl<'de> serde::Deserialize<'de> for $name {
            fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
                let name = <std::borrow::Cow<'de, str>>::deserialize(deserializer)?;
                Ok($name::named(&name))
            }
        }
    };
}

pub(crate) use interned_name;
