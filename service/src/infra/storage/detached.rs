//! [`Storage`] of a context without any client.

use common::operations::{By, Delete, Select, Update};
use tracerr::Traced;

use crate::infra::{
    storage::{self, Entry, Key},
    Storage,
};

/// [`Storage`] used where no client context exists (on a server, for
/// example).
///
/// Reads always find nothing, while writes and deletions are discarded.
#[derive(Clone, Copy, Debug, Default)]
pub struct Detached;

impl Storage<Select<By<Option<String>, Key>>> for Detached {
    type Ok = Option<String>;
    type Err = Traced<storage::Error>;

    async fn execute(
        &self,
        _: Select<By<Option<String>, Key>>,
    ) -> Result<Self::Ok, Self::Err> {
        Ok(None)
    }
}

impl Storage<Update<Entry>> for Detached {
    type Ok = ();
    type Err = Traced<storage::Error>;

    async fn execute(&self, _: Update<Entry>) -> Result<Self::Ok, Self::Err> {
        Ok(())
    }
}

impl Storage<Delete<By<String, Key>>> for Detached {
    type Ok = ();
    type Err = Traced<storage::Error>;

    async fn execute(
        &self,
        _: Delete<By<String, Key>>,
    ) -> Result<Self::Ok, Self::Err> {
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

    use super::Detached;

    const KEY: Key = Key::new("slot");

    #[tokio::test]
    async fn discards_writes_and_finds_nothing() {
        let storage = Detached;

        storage
            .execute(Update(Entry {
                key: KEY,
                value: "lost".into(),
            }))
            .await
            .unwrap();
        let stored = storage.execute(Select(By::new(KEY))).await.unwrap();
        assert_eq!(stored, None);

        storage.execute(Delete(By::new(KEY))).await.unwrap();
    }
}
