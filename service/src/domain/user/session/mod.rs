//! [`Session`] definitions.

pub mod record;

use common::{unit::Expiration, DateTimeOf};
#[cfg(doc)]
use common::DateTime;
use derive_more::{AsRef, Display, From};
#[cfg(feature = "postgres")]
use postgres_types::{FromSql, ToSql};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::User;

pub use self::record::Record;

/// Authenticated session of an agency [`User`].
///
/// A [`Session`] is either trusted as a whole or not at all: it is only ever
/// constructed from a complete, parsed snapshot.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    /// [`Token`] presented by the client on each request.
    pub token: Token,

    /// Snapshot of the [`User`] taken at issuance or last refresh.
    pub user: User,

    /// [`DateTime`] after which this [`Session`] is no longer valid.
    #[serde(with = "common::datetime::serde::rfc3339")]
    pub expires_at: ExpirationDateTime,
}

impl Session {
    /// Name under which a [`Session`] is cached in a local storage.
    pub const CACHE_KEY: &'static str = "agencySession";

    /// Indicates whether this [`Session`] has expired already.
    #[must_use]
    pub fn is_expired(&self) -> bool {
        self.expires_at.has_elapsed()
    }

    /// Checks whether the [`User`] of this [`Session`] is granted the
    /// permission at the provided dot-separated `path`.
    #[must_use]
    pub fn has_permission(&self, path: &str) -> bool {
        self.user.has_permission(path)
    }

    /// Checks whether the [`User`] of this [`Session`] belongs to the agency
    /// with the provided ID.
    #[must_use]
    pub fn can_access_agency(&self, agency_id: &str) -> bool {
        self.user.belongs_to(agency_id)
    }
}

/// Checks whether the provided [`Session`] (if any) grants the permission at
/// the provided dot-separated `path`.
#[must_use]
pub fn has_permission(session: Option<&Session>, path: &str) -> bool {
    session.is_some_and(|s| s.has_permission(path))
}

/// Checks whether the provided [`Session`] (if any) may access the agency
/// with the provided ID.
#[must_use]
pub fn can_access_agency(session: Option<&Session>, agency_id: &str) -> bool {
    session.is_some_and(|s| s.can_access_agency(agency_id))
}

/// Access token of a [`Session`].
#[derive(
    AsRef,
    Clone,
    Debug,
    Deserialize,
    Display,
    Eq,
    From,
    Hash,
    PartialEq,
    Serialize,
)]
#[as_ref(str)]
#[from(&str, String)]
#[serde(transparent)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
pub struct Token(String);

impl Token {
    /// Generates a new random unique [`Token`].
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }
}

/// [`DateTime`] of a [`Session`] expiration.
pub type ExpirationDateTime = DateTimeOf<(Session, Expiration)>;
