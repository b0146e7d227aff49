//! Service contains the business logic of the application.
//!
//! List of available Cargo features:
#![doc = document_features::document_features!()]
#![deny(
    nonstandard_style,
    rust_2018_idioms,
    rustdoc::all,
    trivial_casts,
    trivial_numeric_casts,
    unsafe_code
)]
#![forbid(non_ascii_idents)]
#![warn(
    clippy::allow_attributes,
    clippy::allow_attributes_without_reason,
    clippy::pedantic,
    clippy::wildcard_enum_match_arm,
    deprecated_in_future,
    missing_copy_implementations,
    missing_debug_implementations,
    missing_docs,
    unreachable_pub,
    unused_crate_dependencies,
    unused_import_braces,
    unused_labels,
    unused_lifetimes,
    unused_qualifications,
    unused_results
)]

pub mod command;
pub mod domain;
#[cfg(test)]
mod fixture;
pub mod infra;
pub mod query;

use std::time::Duration;

use smart_default::SmartDefault;

#[cfg(doc)]
use self::{
    domain::user::Session,
    infra::{Database, Storage},
};

pub use self::{command::Command, query::Query};

/// [`Service`] configuration.
#[derive(Clone, Copy, Debug, SmartDefault)]
pub struct Config {
    /// [`Duration`] a newly issued [`Session`] stays valid for.
    #[default(Duration::from_secs(7 * 24 * 60 * 60))]
    pub session_ttl: Duration,
}

/// Domain service.
#[derive(Clone, Debug)]
pub struct Service<Db, St = infra::storage::Detached> {
    /// Configuration of this [`Service`].
    config: Config,

    /// [`Database`] of this [`Service`].
    database: Db,

    /// Local [`Storage`] of this [`Service`].
    storage: St,
}

impl<Db> Service<Db> {
    /// Creates a new [`Service`] without any client context, so its local
    /// [`Storage`] is [`infra::storage::Detached`].
    #[must_use]
    pub fn new(config: Config, database: Db) -> Self {
        Self::with_storage(config, database, infra::storage::Detached)
    }
}

impl<Db, St> Service<Db, St> {
    /// Creates a new [`Service`] keeping its client-side state in the
    /// provided [`Storage`].
    #[must_use]
    pub fn with_storage(config: Config, database: Db, storage: St) -> Self {
        Self {
            config,
            database,
            storage,
        }
    }

    /// Returns [`Config`] of this [`Service`].
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Returns [`Database`] of this [`Service`].
    #[must_use]
    pub fn database(&self) -> &Db {
        &self.database
    }

    /// Returns local [`Storage`] of this [`Service`].
    #[must_use]
    pub fn storage(&self) -> &St {
        &self.storage
    }
}

#[cfg(test)]
mod spec {
    use std::time::Duration;

    use super::Config;

    #[test]
    fn sessions_last_a_week_by_default() {
        assert_eq!(
            Config::default().session_ttl,
            Duration::from_secs(7 * 24 * 3600),
        );
    }
}
