//! [`Command`] for refreshing a [`Session`] with the current [`User`] data.

use std::convert::Infallible;

use common::operations::{By, Select, Update};
use tracerr::Traced;
use tracing as log;

use crate::{
    domain::{
        user::{
            self,
            session::{
                record::{self, Revocation},
                Record, Token,
            },
            Session,
        },
        User,
    },
    infra::{
        database,
        storage::{self, Entry},
        Database, Storage,
    },
    Service,
};

use super::{cache_session, Command, ValidateAgencySession};

/// [`Command`] for re-reading the [`User`] snapshot of a [`Session`].
///
/// Only a [`Session`] still authorized by its [`Record`] is refreshed. The
/// refreshed [`Session`] keeps its token and expiration, and replaces the
/// locally cached one. If the [`User`] cannot be read (being deactivated, for
/// example), the local cache is left as is.
#[derive(Clone, Debug)]
pub struct RefreshAgencySession {
    /// [`Session`] to refresh.
    pub session: Session,
}

impl From<Session> for RefreshAgencySession {
    fn from(session: Session) -> Self {
        Self { session }
    }
}

impl<Db, St> Command<RefreshAgencySession> for Service<Db, St>
where
    Db: Database<
            Select<By<Option<User>, user::Id>>,
            Ok = Option<User>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Option<Record>, (Token, user::Id)>>,
            Ok = Option<Record>,
            Err = Traced<database::Error>,
        > + Database<
            Update<By<Revocation, record::Id>>,
            Ok = (),
            Err = Traced<database::Error>,
        >,
    St: Storage<Update<Entry>, Ok = (), Err = Traced<storage::Error>>,
{
    /// [`None`] if the [`Session`] is not authorized, or its [`User`] is not
    /// active anymore or cannot be read.
    type Ok = Option<Session>;
    type Err = Infallible;

    async fn execute(
        &self,
        cmd: RefreshAgencySession,
    ) -> Result<Self::Ok, Self::Err> {
        let RefreshAgencySession { session } = cmd;

        if !self.execute(ValidateAgencySession::from(&session)).await? {
            return Ok(None);
        }

        let user = match self
            .database()
            .execute(Select(By::new(session.user.id)))
            .await
        {
            Ok(Some(u)) => u,
            Ok(None) => return Ok(None),
            Err(e) => {
                log::error!("failed to refresh agency session: {e}");
                return Ok(None);
            }
        };

        let session = Session { user, ..session };
        cache_session(self.storage(), &session).await;

        Ok(Some(session))
    }
}

#[cfg(test)]
mod spec {
    use std::time::Duration;

    use common::DateTime;
    use serde_json::json;

    use crate::{
        domain::{role::PermissionSet, user::Session},
        fixture,
        infra::database::mock::Mock,
        Command as _,
    };

    use super::RefreshAgencySession;

    fn recorded(db: Mock, session: &Session) -> Mock {
        db.state().records.push(fixture::record(
            session,
            DateTime::now() + Duration::from_secs(60),
        ));
        db
    }

    #[tokio::test]
    async fn takes_fresh_user_snapshot() {
        let stale = fixture::user("agency-1", None);
        let mut fresh = stale.clone();
        fresh.last_name = "King".into();
        fresh.permissions =
            PermissionSet::from_json(json!({"reports": {"view": true}}));
        let session = fixture::session(stale);
        let db = recorded(Mock::new().with_user(fresh.clone()), &session);
        let svc = fixture::service(db);

        let refreshed = svc
            .execute(RefreshAgencySession::from(session.clone()))
            .await
            .unwrap()
            .expect("user is active");

        assert_eq!(refreshed.token, session.token);
        assert_eq!(refreshed.expires_at, session.expires_at);
        assert_eq!(refreshed.user, fresh);
        assert!(refreshed.has_permission("reports.view"));

        let cached = fixture::cached(svc.storage()).await.unwrap();
        assert_eq!(
            serde_json::from_str::<Session>(&cached).unwrap(),
            refreshed,
        );
    }

    #[tokio::test]
    async fn reveals_nothing_for_unauthorized_token() {
        let user = fixture::user("agency-9", None);
        let session = fixture::session(user.clone());
        let made_up = fixture::session(user.clone());
        let db = recorded(Mock::new().with_user(user), &session);
        let svc = fixture::service(db);

        let refreshed = svc
            .execute(RefreshAgencySession::from(made_up))
            .await
            .unwrap();

        assert!(refreshed.is_none());
        assert_eq!(fixture::cached(svc.storage()).await, None);
    }

    #[tokio::test]
    async fn keeps_cache_for_inactive_user() {
        let user = fixture::user("agency-1", None);
        let session = fixture::session(user.clone());
        let db = recorded(Mock::new().with_inactive_user(user), &session);
        let svc = fixture::service(db);
        let blob = serde_json::to_string(&session).unwrap();
        fixture::cache(svc.storage(), blob.clone()).await;

        let refreshed = svc
            .execute(RefreshAgencySession::from(session))
            .await
            .unwrap();

        assert!(refreshed.is_none());
        assert_eq!(fixture::cached(svc.storage()).await, Some(blob));
    }

    #[tokio::test]
    async fn keeps_cache_on_database_error() {
        let user = fixture::user("agency-1", None);
        let session = fixture::session(user.clone());
        let db = recorded(Mock::new().with_user(user), &session);
        db.state().failing = true;
        let svc = fixture::service(db);
        let blob = serde_json::to_string(&session).unwrap();
        fixture::cache(svc.storage(), blob.clone()).await;

        let refreshed = svc
            .execute(RefreshAgencySession::from(session))
            .await
            .unwrap();

        assert!(refreshed.is_none());
        assert_eq!(fixture::cached(svc.storage()).await, Some(blob));
    }
}
