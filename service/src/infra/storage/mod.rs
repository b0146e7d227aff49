//! [`Storage`]-related implementations.
//!
//! A [`Storage`] keeps named text blobs on the client side, like a
//! browser's local storage does.

pub mod detached;
pub mod file;
pub mod memory;

use std::io;

use derive_more::{Display, Error as StdError, From};

pub use self::{detached::Detached, file::File, memory::Memory};

/// Local storage operation.
pub use common::Handler as Storage;

/// Name of a slot in a [`Storage`].
#[derive(Clone, Copy, Debug, Display, Eq, Hash, PartialEq)]
pub struct Key(&'static str);

impl Key {
    /// Creates a new [`Key`] out of the provided slot `name`.
    #[must_use]
    pub const fn new(name: &'static str) -> Self {
        Self(name)
    }
}

/// Value to be written into a [`Storage`] slot.
#[derive(Clone, Debug)]
pub struct Entry {
    /// [`Key`] of the slot.
    pub key: Key,

    /// Value to write, replacing the existing one.
    pub value: String,
}

/// [`Storage`] error.
#[derive(Debug, Display, From, StdError)]
pub enum Error {
    /// I/O error of a [`File`] storage.
    #[display("I/O operation failed: {_0}")]
    Io(io::Error),
}
