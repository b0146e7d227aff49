//! Filesystem-backed [`Storage`].
//!
//! Every slot is kept as a separate file inside a base directory:
//!
//! ```text
//! <base_dir>/
//! └── <key>.json
//! ```

use std::{
    io,
    path::{Path, PathBuf},
};

use common::operations::{By, Delete, Select, Update};
use tokio::fs;
use tracerr::Traced;

use crate::infra::{
    storage::{self, Entry, Key},
    Storage,
};

/// [`Storage`] persisting its slots to the local filesystem, so they survive
/// process restarts.
#[derive(Clone, Debug)]
pub struct File {
    /// Directory the slot files are kept in.
    base: PathBuf,
}

impl File {
    /// Creates a new [`File`] storage keeping its slots in the provided
    /// directory.
    ///
    /// The directory is created lazily on the first write.
    #[must_use]
    pub fn new(base: impl Into<PathBuf>) -> Self {
        Self { base: base.into() }
    }

    /// Returns the directory this [`File`] storage keeps its slots in.
    #[must_use]
    pub fn base(&self) -> &Path {
        &self.base
    }

    /// Returns path of the file backing the slot with the provided [`Key`].
    fn path(&self, key: Key) -> PathBuf {
        self.base.join(format!("{key}.json"))
    }
}

impl Storage<Select<By<Option<String>, Key>>> for File {
    type Ok = Option<String>;
    type Err = Traced<storage::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<String>, Key>>,
    ) -> Result<Self::Ok, Self::Err> {
        match fs::read_to_string(self.path(by.into_inner())).await {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(tracerr::new!(storage::Error::from(e))),
        }
    }
}

impl Storage<Update<Entry>> for File {
    type Ok = ();
    type Err = Traced<storage::Error>;

    async fn execute(
        &self,
        Update(entry): Update<Entry>,
    ) -> Result<Self::Ok, Self::Err> {
        fs::create_dir_all(&self.base)
            .await
            .map_err(tracerr::from_and_wrap!(=> storage::Error))?;
        fs::write(self.path(entry.key), entry.value)
            .await
            .map_err(tracerr::from_and_wrap!(=> storage::Error))
    }
}

impl Storage<Delete<By<String, Key>>> for File {
    type Ok = ();
    type Err = Traced<storage::Error>;

    async fn execute(
        &self,
        Delete(by): Delete<By<String, Key>>,
    ) -> Result<Self::Ok, Self::Err> {
        match fs::remove_file(self.path(by.into_inner())).await {
            Err(e) if e.kind() != io::ErrorKind::NotFound => {
                Err(tracerr::new!(storage::Error::from(e)))
            }
            Ok(()) | Err(_) => Ok(()),
        }
    }
}
