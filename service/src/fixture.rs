//! Shared test fixtures.

use std::time::Duration;

use common::{
    operations::{By, Select, Update},
    DateTime,
};
use serde_json::Value;

use crate::{
    domain::{
        role::PermissionSet,
        user::{
            self,
            session::{record, Record, Token},
            Session,
        },
        User,
    },
    infra::{
        database::mock::Mock,
        storage::{Entry, Key, Memory},
        Storage as _,
    },
    Config, Service,
};

/// [`Key`] the [`Session`] is cached under.
pub(crate) const CACHE: Key = Key::new(Session::CACHE_KEY);

/// Creates a new [`User`] of the provided agency with the provided
/// permissions.
pub(crate) fn user(agency_id: &str, permissions: Option<Value>) -> User {
    User {
        id: user::Id::new(),
        email: user::Email::new("recruiter@agency.example").unwrap(),
        first_name: "Ada".into(),
        last_name: "Lovelace".into(),
        agency_id: agency_id.into(),
        agency_name: Some("Analytical Staffing".into()),
        role: Some("recruiter".into()),
        permissions: permissions.map(|p| PermissionSet::from_json(p).unwrap()),
    }
}

/// Creates a new [`Session`] of the provided [`User`] expiring in an hour.
pub(crate) fn session(user: User) -> Session {
    Session {
        token: Token::generate(),
        user,
        expires_at: (DateTime::now() + Duration::from_secs(3600)).coerce(),
    }
}

/// Creates an active [`Record`] authorizing the provided [`Session`] until
/// the provided [`DateTime`].
pub(crate) fn record(session: &Session, expires_at: DateTime) -> Record {
    Record {
        id: record::Id::new(),
        token: session.token.clone(),
        user_id: session.user.id,
        is_active: true,
        expires_at: expires_at.coerce(),
        client_address: record::ClientAddress::default(),
        user_agent: record::UserAgent::default(),
        created_at: DateTime::now().coerce(),
    }
}

/// Creates a new [`Service`] over the provided [`Mock`] with an empty
/// [`Memory`] storage.
pub(crate) fn service(db: Mock) -> Service<Mock, Memory> {
    Service::with_storage(Config::default(), db, Memory::new())
}

/// Returns the raw value cached under the [`CACHE`] key.
pub(crate) async fn cached(storage: &Memory) -> Option<String> {
    storage.execute(Select(By::new(CACHE))).await.unwrap()
}

/// Caches the provided raw value under the [`CACHE`] key.
pub(crate) async fn cache(storage: &Memory, value: impl Into<String>) {
    storage
        .execute(Update(Entry {
            key: CACHE,
            value: value.into(),
        }))
        .await
        .unwrap();
}
