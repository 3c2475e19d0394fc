//! Versioned JSON records
//!
//! Records are saved as `{"version": N, "data": ...}`. Anything else found
//! under the key (or under a record's legacy key) is treated as version 0 and
//! run through the record's migration before decoding.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::KeyValueStore;
use crate::error::StorageError;

/// On-disk wrapper around a record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub version: u32,
    pub data: T,
}

/// A record with a storage key and a layout version.
pub trait Versioned: Serialize + DeserializeOwned + Default {
    const KEY: &'static str;
    const VERSION: u32;
    /// Key an older build stored this record under, if it moved
    const LEGACY_KEY: Option<&'static str> = None;

    /// Upgrade `data` saved at `version` to the current layout.
    fn migrate(version: u32, data: Value) -> Result<Value, StorageError> {
        if version == Self::VERSION {
            Ok(data)
        } else {
            Err(StorageError::UnsupportedVersion {
                found: version,
                latest: Self::VERSION,
            })
        }
    }
}

/// Split raw JSON into (version, payload); bare values are version 0.
fn unwrap_envelope(raw: Value) -> Result<(u32, Value), StorageError> {
    match raw {
        Value::Object(mut map) if map.contains_key("version") && map.contains_key("data") => {
            let version = map
                .get("version")
                .and_then(Value::as_u64)
                .and_then(|v| u32::try_from(v).ok())
                .ok_or_else(|| StorageError::Backend("record version is not a number".into()))?;
            let data = map.remove("data").unwrap_or(Value::Null);
            Ok((version, data))
        }
        other => Ok((0, other)),
    }
}

fn decode<T: Versioned>(raw: &str) -> Result<T, StorageError> {
    let (version, data) = unwrap_envelope(serde_json::from_str(raw)?)?;
    if version > T::VERSION {
        return Err(StorageError::UnsupportedVersion {
            found: version,
            latest: T::VERSION,
        });
    }
    let data = T::migrate(version, data)?;
    Ok(serde_json::from_value(data)?)
}

/// Load a record, migrating it if needed. `Ok(None)` when nothing is stored.
///
/// A record found only under its legacy key is re-saved under the current
/// key and the legacy entry is removed.
pub fn load_versioned<T: Versioned>(store: &dyn KeyValueStore) -> Result<Option<T>, StorageError> {
    if let Some(raw) = store.get(T::KEY)? {
        return decode(&raw).map(Some);
    }
    let Some(legacy) = T::LEGACY_KEY else {
        return Ok(None);
    };
    let Some(raw) = store.get(legacy)? else {
        return Ok(None);
    };
    let record: T = decode(&raw)?;
    save_versioned(store, &record)?;
    store.remove(legacy)?;
    log::info!("Migrated {legacy} to {}", T::KEY);
    Ok(Some(record))
}

/// Save a record at the current version.
pub fn save_versioned<T: Versioned>(store: &dyn KeyValueStore, record: &T) -> Result<(), StorageError> {
    let json = serde_json::to_string(&Envelope {
        version: T::VERSION,
        data: record,
    })?;
    store.set(T::KEY, &json)
}

/// Load a record, falling back to its default when absent or unreadable.
pub fn load_or_default<T: Versioned>(store: &dyn KeyValueStore) -> T {
    match load_versioned(store) {
        Ok(Some(record)) => record,
        Ok(None) => T::default(),
        Err(e) => {
            log::warn!("Discarding saved {}: {e}", T::KEY);
            T::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryStore;

    #[derive(Debug, Default, PartialEq, Serialize, Deserialize)]
    struct Counter {
        count: u32,
    }

    impl Versioned for Counter {
        const KEY: &'static str = "counter";
        const VERSION: u32 = 2;
        const LEGACY_KEY: Option<&'static str> = Some("old_counter");

        fn migrate(version: u32, data: Value) -> Result<Value, StorageError> {
            match version {
                // Bare number
                0 => Ok(serde_json::json!({ "count": data })),
                1 => Ok(serde_json::json!({ "count": data["n"] })),
                _ => Ok(data),
            }
        }
    }

    #[test]
    fn test_save_then_load() {
        let store = MemoryStore::new();
        save_versioned(&store, &Counter { count: 4 }).unwrap();
        assert_eq!(
            store.get("counter").unwrap().as_deref(),
            Some(r#"{"version":2,"data":{"count":4}}"#)
        );
        assert_eq!(load_versioned::<Counter>(&store).unwrap(), Some(Counter { count: 4 }));
    }

    #[test]
    fn test_older_versions_migrate() {
        let store = MemoryStore::new();
        store.set("counter", r#"{"version":1,"data":{"n":9}}"#).unwrap();
        assert_eq!(load_or_default::<Counter>(&store), Counter { count: 9 });
        store.set("counter", "3").unwrap();
        assert_eq!(load_or_default::<Counter>(&store), Counter { count: 3 });
    }

    #[test]
    fn test_legacy_key_moves() {
        let store = MemoryStore::new();
        store.set("old_counter", "7").unwrap();
        assert_eq!(load_versioned::<Counter>(&store).unwrap(), Some(Counter { count: 7 }));
        assert_eq!(store.get("old_counter").unwrap(), None);
        assert!(store.get("counter").unwrap().is_some());
    }

    #[test]
    fn test_newer_version_rejected() {
        let store = MemoryStore::new();
        store.set("counter", r#"{"version":5,"data":{}}"#).unwrap();
        assert!(matches!(
            load_versioned::<Counter>(&store),
            Err(StorageError::UnsupportedVersion { found: 5, latest: 2 })
        ));
        assert_eq!(load_or_default::<Counter>(&store), Counter::default());
    }

    #[test]
    fn test_corrupt_record_defaults() {
        let store = MemoryStore::new();
        store.set("counter", "{oops").unwrap();
        assert_eq!(load_or_default::<Counter>(&store), Counter::default());
        assert!(load_versioned::<Counter>(&store).is_err());
    }
}
