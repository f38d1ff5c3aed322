//! Versioned records: read-modify-write by key.

use std::marker::PhantomData;

use chrono::{DateTime, Utc};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use tracing::debug;

use crate::repository::{Repository, RepositoryExt};
use crate::StoreError;

/// A stored value with its write version.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Versioned<T> {
    /// User-defined record data.
    pub data: T,
    /// Incremented on every write, starting at 1.
    pub version: u64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Typed records of one kind stored under a namespace.
///
/// # Example
///
/// ```rust,ignore
/// let carts = Records::<_, Cart>::new(&repo, "cart");
///
/// let cart = carts.get_or_default("default")?;
/// carts.update("default", |cart| cart.cleared())?;
/// ```
pub struct Records<R, T> {
    repo: R,
    namespace: &'static str,
    _phantom: PhantomData<T>,
}

impl<R, T> Records<R, T>
where
    R: Repository,
    T: Serialize + DeserializeOwned,
{
    pub fn new(repo: R, namespace: &'static str) -> Self {
        Self {
            repo,
            namespace,
            _phantom: PhantomData,
        }
    }

    /// Get record data if it exists.
    pub fn get(&self, id: &str) -> Result<Option<T>, StoreError> {
        Ok(self.get_versioned(id)?.map(|r| r.data))
    }

    /// Get full record including version.
    pub fn get_versioned(&self, id: &str) -> Result<Option<Versioned<T>>, StoreError> {
        self.repo.get(&self.key(id))
    }

    /// Write record data (unconditional).
    pub fn save(&self, id: &str, data: T) -> Result<Versioned<T>, StoreError> {
        let current = self.get_versioned(id)?;
        self.write(id, data, current.as_ref())
    }

    /// Write record data only if the stored version is still `expected`
    /// (0 meaning absent).
    pub fn save_if_version(&self, id: &str, data: T, expected: u64) -> Result<Versioned<T>, StoreError> {
        let current = self.get_versioned(id)?;
        let found = current.as_ref().map_or(0, |r| r.version);
        if found != expected {
            return Err(StoreError::VersionConflict {
                key: self.key(id),
                expected,
                found,
            });
        }
        self.write(id, data, current.as_ref())
    }

    /// Delete a record.
    pub fn delete(&self, id: &str) -> Result<bool, StoreError> {
        self.repo.delete(&self.key(id))
    }

    pub fn exists(&self, id: &str) -> Result<bool, StoreError> {
        self.repo.exists(&self.key(id))
    }

    /// Ids of every record in this namespace.
    pub fn ids(&self) -> Result<Vec<String>, StoreError> {
        let prefix_len = self.namespace.len() + 1;
        Ok(self
            .repo
            .keys_in(self.namespace)?
            .into_iter()
            .map(|k| k[prefix_len..].to_string())
            .collect())
    }

    fn write(&self, id: &str, data: T, current: Option<&Versioned<T>>) -> Result<Versioned<T>, StoreError> {
        let now = Utc::now();
        let record = Versioned {
            data,
            version: current.map_or(1, |r| r.version + 1),
            created_at: current.map_or(now, |r| r.created_at),
            updated_at: now,
        };
        let key = self.key(id);
        self.repo.put(&key, &record)?;
        debug!(key = %key, version = record.version, "saved record");
        Ok(record)
    }

    fn key(&self, id: &str) -> String {
        crate::repo_key!(self.namespace, id)
    }
}

impl<R, T> Records<R, T>
where
    R: Repository,
    T: Serialize + DeserializeOwned + Default,
{
    /// Get record data, or the default value if it doesn't exist.
    pub fn get_or_default(&self, id: &str) -> Result<T, StoreError> {
        Ok(self.get(id)?.unwrap_or_default())
    }

    /// Read, transform and write back a record.
    pub fn update<F>(&self, id: &str, f: F) -> Result<T, StoreError>
    where
        F: FnOnce(T) -> T,
    {
        self.try_update(id, |data| Ok::<_, StoreError>(f(data)))
    }

    /// Like [`update`](Self::update), for transformations that can fail.
    ///
    /// Nothing is written when `f` fails.
    pub fn try_update<F, E>(&self, id: &str, f: F) -> Result<T, E>
    where
        F: FnOnce(T) -> Result<T, E>,
        E: From<StoreError>,
    {
        let (data, version) = match self.get_versioned(id)? {
            Some(record) => (record.data, record.version),
            None => (T::default(), 0),
        };

        let updated = f(data)?;
        let written = self.save_if_version(id, updated, version)?;
        Ok(written.data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MemoryRepository;

    #[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
    struct Cart {
        lines: Vec<String>,
    }

    #[test]
    fn test_get_or_default_does_not_write() {
        let repo = MemoryRepository::new();
        let carts = Records::<_, Cart>::new(&repo, "cart");
        assert_eq!(carts.get_or_default("default").unwrap(), Cart::default());
        assert!(!carts.exists("default").unwrap());
    }

    #[test]
    fn test_save_increments_version() {
        let repo = MemoryRepository::new();
        let carts = Records::<_, Cart>::new(&repo, "cart");

        let first = carts.save("default", Cart::default()).unwrap();
        let second = carts
            .save("default", Cart { lines: vec!["6".into()] })
            .unwrap();

        assert_eq!(first.version, 1);
        assert_eq!(second.version, 2);
        assert_eq!(second.created_at, first.created_at);
    }

    #[test]
    fn test_update_round_trip() {
        let repo = MemoryRepository::new();
        let carts = Records::<_, Cart>::new(&repo, "cart");

        carts
            .update("default", |mut c| {
                c.lines.push("1".into());
                c
            })
            .unwrap();
        let cart = carts
            .update("default", |mut c| {
                c.lines.push("6".into());
                c
            })
            .unwrap();

        assert_eq!(cart.lines, vec!["1", "6"]);
        assert_eq!(carts.get_versioned("default").unwrap().unwrap().version, 2);
    }

    #[test]
    fn test_failed_update_writes_nothing() {
        let repo = MemoryRepository::new();
        let carts = Records::<_, Cart>::new(&repo, "cart");

        let result: Result<Cart, StoreError> = carts.try_update("default", |_| {
            Err(StoreError::NotFound("line".into()))
        });
        assert!(result.is_err());
        assert!(!carts.exists("default").unwrap());
    }

    #[test]
    fn test_stale_version_conflicts() {
        let repo = MemoryRepository::new();
        let carts = Records::<_, Cart>::new(&repo, "cart");
        carts.save("default", Cart::default()).unwrap();

        let result = carts.save_if_version("default", Cart::default(), 0);
        assert!(matches!(
            result,
            Err(StoreError::VersionConflict {
                expected: 0,
                found: 1,
                ..
            })
        ));
    }

    #[test]
    fn test_ids_strip_namespace() {
        let repo = MemoryRepository::new();
        Records::<_, Cart>::new(&repo, "cart")
            .save("default", Cart::default())
            .unwrap();
        let orders = Records::<_, Cart>::new(&repo, "order");
        orders.save("ROF-1", Cart::default()).unwrap();
        orders.save("ROF-2", Cart::default()).unwrap();

        assert_eq!(orders.ids().unwrap(), vec!["ROF-1", "ROF-2"]);
    }
}
