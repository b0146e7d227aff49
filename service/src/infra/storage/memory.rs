//! In-memory [`Storage`].

use std::{collections::HashMap, sync::Arc};

use common::operations::{By, Delete, Select, Update};
use tokio::sync::RwLock;
use tracerr::Traced;

use crate::infra::{
    storage::{self, Entry, Key},
    Storage,
};

/// [`Storage`] keeping its slots in memory for the lifetime of the process.
///
/// Clones share the same slots.
#[derive(Clone, Debug, Default)]
pub struct Memory(Arc<RwLock<HashMap<Key, String>>>);

impl Memory {
    /// Creates a new empty [`Memory`] storage.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl Storage<Select<By<Option<String>, Key>>> for Memory {
    type Ok = Option<String>;
    type Err = Traced<storage::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<String>, Key>>,
    ) -> Result<Self::Ok, Self::Err> {
        Ok(self.0.read().await.get(by.inner()).cloned())
    }
}

impl Storage<Update<Entry>> for Memory {
    type Ok = ();
    type Err = Traced<storage::Error>;

    async fn execute(
        &self,
        Update(entry): Update<Entry>,
    ) -> Result<Self::Ok, Self::Err> {
        drop(self.0.write().await.insert(entry.key, entry.value));
        Ok(())
    }
}

impl Storage<Delete<By<String, Key>>> for Memory {
    type Ok = ();
    type Err = Traced<storage::Error>;

    async fn execute(
        &self,
        Delete(by): Delete<By<String, Key>>,
    ) -> Result<Self::Ok, Self::Err> {
        drop(self.0.write().await.remove(by.inner()));
        Ok(())
    }
}

#[cfg(test)]
mod spec {
    use common::operations::{By, Delete, Select, Update};

    use crate::infra::{
        storage::{Entry, Key},
        Storage as _,
    };

    use super::Memory;

    const KEY: Key = Key::new("slot");

    #[tokio::test]
    async fn overwrites_and_deletes_slot() {
        let storage = Memory::new();

        let empty = storage.execute(Select(By::new(KEY))).await.unwrap();
        assert_eq!(empty, None);

        for value in ["first", "second"] {
            storage
                .execute(Update(Entry {
                    key: KEY,
                    value: value.into(),
                }))
                .await
                .unwrap();
        }
        let stored = storage.execute(Select(By::new(KEY))).await.unwrap();
        assert_eq!(stored.as_deref(), Some("second"));

        storage.execute(Delete(By::new(KEY))).await.unwrap();
        storage.execute(Delete(By::new(KEY))).await.unwrap();
        let deleted = storage.execute(Select(By::new(KEY))).await.unwrap();
        assert_eq!(deleted, None);
    }

    #[tokio::test]
    async fn clones_share_slots() {
        let storage = Memory::new();
        let clone = storage.clone();

        storage
            .execute(Update(Entry {
                key: KEY,
                value: "shared".into(),
            }))
            .await
            .unwrap();

        let stored = clone.execute(Select(By::new(KEY))).await.unwrap();
        assert_eq!(stored.as_deref(), Some("shared"));
    }
}
