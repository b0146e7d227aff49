//! Authorization [`Record`] of a [`Session`].

use common::{
    unit::{Creation, Expiration},
    DateTimeOf,
};
#[cfg(doc)]
use common::DateTime;
use derive_more::{AsRef, Display, From, Into};
#[cfg(feature = "postgres")]
use postgres_types::{FromSql, ToSql};
use uuid::Uuid;

#[cfg(doc)]
use crate::domain::User;
use crate::domain::user::{self, session::Token};

#[cfg(doc)]
use super::Session;

/// Server-side record deciding whether a [`Session`] [`Token`] is usable.
///
/// Unlike a locally cached [`Session`], this [`Record`] is the source of truth
/// for revocation and expiration.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Record {
    /// ID of this [`Record`].
    pub id: Id,

    /// [`Token`] this [`Record`] authorizes.
    pub token: Token,

    /// ID of the [`User`] owning the [`Token`].
    pub user_id: user::Id,

    /// Indicator whether the [`Token`] has not been revoked.
    pub is_active: bool,

    /// [`DateTime`] after which the [`Token`] is no longer usable.
    pub expires_at: ExpirationDateTime,

    /// [`ClientAddress`] the [`Session`] was issued to.
    pub client_address: ClientAddress,

    /// [`UserAgent`] the [`Session`] was issued to.
    pub user_agent: UserAgent,

    /// [`DateTime`] when this [`Record`] was created.
    pub created_at: CreationDateTime,
}

/// ID of a [`Record`].
#[derive(Clone, Copy, Debug, Display, Eq, From, Hash, Into, PartialEq)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
pub struct Id(Uuid);

impl Id {
    /// Creates a new random [`Id`].
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

/// Network address of a client a [`Session`] was issued to.
#[derive(AsRef, Clone, Debug, Display, Eq, From, PartialEq)]
#[as_ref(str)]
#[from(&str, String)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
pub struct ClientAddress(String);

impl Default for ClientAddress {
    fn default() -> Self {
        Self("127.0.0.1".to_owned())
    }
}

/// User agent of a client a [`Session`] was issued to.
#[derive(AsRef, Clone, Debug, Display, Eq, From, PartialEq)]
#[as_ref(str)]
#[from(&str, String)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
pub struct UserAgent(String);

impl Default for UserAgent {
    fn default() -> Self {
        Self("Unknown".to_owned())
    }
}

/// Revocation of a [`Record`], making its [`Token`] unusable.
#[derive(Clone, Copy, Debug)]
pub struct Revocation;

/// [`DateTime`] of a [`Record`] expiration.
pub type ExpirationDateTime = DateTimeOf<(Record, Expiration)>;

/// [`DateTime`] of a [`Record`] creation.
pub type CreationDateTime = DateTimeOf<(Record, Creation)>;
