//! Keyed repository interface with automatic JSON serialization.

use std::cell::RefCell;
use std::collections::BTreeMap;

use serde::{de::DeserializeOwned, Serialize};

use crate::StoreError;

/// CRUD by key over raw bytes.
///
/// Backends only move bytes; [`RepositoryExt`] layers JSON on top.
pub trait Repository {
    /// Get the bytes stored under `key`, if any.
    fn get_raw(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError>;

    /// Store bytes under `key`, replacing any previous value.
    fn put_raw(&self, key: &str, bytes: &[u8]) -> Result<(), StoreError>;

    /// Delete `key`. Returns whether it existed.
    fn delete(&self, key: &str) -> Result<bool, StoreError>;

    /// Check if a key exists.
    fn exists(&self, key: &str) -> Result<bool, StoreError> {
        Ok(self.get_raw(key)?.is_some())
    }

    /// All keys, sorted.
    fn keys(&self) -> Result<Vec<String>, StoreError>;
}

/// Typed access for any [`Repository`].
///
/// # Example
///
/// ```rust,ignore
/// repo.put("cart:default", &cart)?;
/// let cart: Option<Cart> = repo.get("cart:default")?;
/// ```
pub trait RepositoryExt: Repository {
    /// Get a value, returning `None` if the key doesn't exist.
    fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, StoreError> {
        match self.get_raw(key)? {
            Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            None => Ok(None),
        }
    }

    /// Get a value that must exist.
    fn require<T: DeserializeOwned>(&self, key: &str) -> Result<T, StoreError> {
        self.get(key)?
            .ok_or_else(|| StoreError::NotFound(key.to_string()))
    }

    /// Set a value.
    fn put<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<(), StoreError> {
        let bytes = serde_json::to_vec_pretty(value)?;
        self.put_raw(key, &bytes)
    }

    /// Keys under a namespace prefix, e.g. every `order:*` key.
    fn keys_in(&self, namespace: &str) -> Result<Vec<String>, StoreError> {
        let prefix = format!("{}:", namespace);
        Ok(self
            .keys()?
            .into_iter()
            .filter(|k| k.starts_with(&prefix))
            .collect())
    }
}

impl<R: Repository + ?Sized> RepositoryExt for R {}

impl<R: Repository + ?Sized> Repository for &R {
    fn get_raw(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        (**self).get_raw(key)
    }

    fn put_raw(&self, key: &str, bytes: &[u8]) -> Result<(), StoreError> {
        (**self).put_raw(key, bytes)
    }

    fn delete(&self, key: &str) -> Result<bool, StoreError> {
        (**self).delete(key)
    }

    fn exists(&self, key: &str) -> Result<bool, StoreError> {
        (**self).exists(key)
    }

    fn keys(&self) -> Result<Vec<String>, StoreError> {
        (**self).keys()
    }
}

/// Check that a key is non-empty and made of `[A-Za-z0-9_-]` segments
/// separated by `:`.
pub fn validate_key(key: &str) -> Result<(), StoreError> {
    let valid = !key.is_empty()
        && key.split(':').all(|segment| {
            !segment.is_empty()
                && segment
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        });
    if valid {
        Ok(())
    } else {
        Err(StoreError::InvalidKey(key.to_string()))
    }
}

/// In-memory repository for a single session.
#[derive(Debug, Default)]
pub struct MemoryRepository {
    entries: RefCell<BTreeMap<String, Vec<u8>>>,
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }
}

impl Repository for MemoryRepository {
    fn get_raw(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        validate_key(key)?;
        Ok(self.entries.borrow().get(key).cloned())
    }

    fn put_raw(&self, key: &str, bytes: &[u8]) -> Result<(), StoreError> {
        validate_key(key)?;
        self.entries
            .borrow_mut()
            .insert(key.to_string(), bytes.to_vec());
        Ok(())
    }

    fn delete(&self, key: &str) -> Result<bool, StoreError> {
        validate_key(key)?;
        Ok(self.entries.borrow_mut().remove(key).is_some())
    }

    fn exists(&self, key: &str) -> Result<bool, StoreError> {
        validate_key(key)?;
        Ok(self.entries.borrow().contains_key(key))
    }

    fn keys(&self) -> Result<Vec<String>, StoreError> {
        Ok(self.entries.borrow().keys().cloned().collect())
    }
}

/// Helper to build repository keys with namespacing.
///
/// # Example
///
/// ```rust,ignore
/// let key = repo_key!("cart", user_id);
/// // Returns "cart:user123"
/// ```
#[macro_export]
macro_rules! repo_key {
    ($prefix:expr, $($part:expr),+) => {{
        let mut key = String::from($prefix);
        $(
            key.push(':');
            key.push_str(&$part.to_string());
        )+
        key
    }};
}
