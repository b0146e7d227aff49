//! [`Command`] for clearing a [`Session`] on logout.

use std::convert::Infallible;

use common::operations::{By, Delete, Update};
use tracerr::Traced;
use tracing as log;

use crate::{
    domain::user::{
        session::{record::Revocation, Token},
        Session,
    },
    infra::{
        database,
        storage::{self, Key},
        Database, Storage,
    },
    Service,
};

use super::Command;

/// [`Command`] for revoking a [`Session`] and removing its locally cached
/// copy.
///
/// Both steps are best-effort, so clearing the same [`Session`] repeatedly
/// is harmless. The local copy is removed even if the revocation fails.
#[derive(Clone, Debug)]
pub struct ClearAgencySession {
    /// [`Token`] of the [`Session`] to clear.
    pub token: Token,
}

impl From<&Session> for ClearAgencySession {
    fn from(session: &Session) -> Self {
        Self {
            token: session.token.clone(),
        }
    }
}

impl<Db, St> Command<ClearAgencySession> for Service<Db, St>
where
    Db: Database<
        Update<By<Revocation, Token>>,
        Ok = (),
        Err = Traced<database::Error>,
    >,
    St: Storage<
        Delete<By<String, Key>>,
        Ok = (),
        Err = Traced<storage::Error>,
    >,
{
    type Ok = ();
    type Err = Infallible;

    async fn execute(
        &self,
        cmd: ClearAgencySession,
    ) -> Result<Self::Ok, Self::Err> {
        let ClearAgencySession { token } = cmd;

        if let Err(e) = self
            .database()
            .execute(Update(By::<Revocation, _>::new(token)))
            .await
        {
            log::error!("failed to revoke agency session: {e}");
        }

        if let Err(e) = self
            .storage()
            .execute(Delete(By::new(Key::new(Session::CACHE_KEY))))
            .await
        {
            log::error!("failed to remove cached agency session: {e}");
        }

        Ok(())
    }
}

#[cfg(test)]
mod spec {
    use std::time::Duration;

    use common::DateTime;

    use crate::{fixture, infra::database::mock::Mock, Command as _};

    use super::ClearAgencySession;

    #[tokio::test]
    async fn revokes_record_and_removes_cache() {
        let session = fixture::session(fixture::user("agency-1", None));
        let db = Mock::new();
        db.state().records.push(fixture::record(
            &session,
            DateTime::now() + Duration::from_secs(60),
        ));
        let svc = fixture::service(db.clone());
        fixture::cache(svc.storage(), serde_json::to_string(&session).unwrap())
            .await;

        svc.execute(ClearAgencySession::from(&session))
            .await
            .unwrap();

        assert!(!db.state().records[0].is_active);
        assert_eq!(fixture::cached(svc.storage()).await, None);
    }

    #[tokio::test]
    async fn is_idempotent() {
        let session = fixture::session(fixture::user("agency-1", None));
        let db = Mock::new();
        db.state().records.push(fixture::record(
            &session,
            DateTime::now() + Duration::from_secs(60),
        ));
        let svc = fixture::service(db.clone());
        fixture::cache(svc.storage(), serde_json::to_string(&session).unwrap())
            .await;

        for _ in 0..2 {
            svc.execute(ClearAgencySession::from(&session))
                .await
                .unwrap();
        }

        assert!(!db.state().records[0].is_active);
        assert_eq!(fixture::cached(svc.storage()).await, None);
    }

    #[tokio::test]
    async fn removes_cache_even_if_revocation_fails() {
        let session = fixture::session(fixture::user("agency-1", None));
        let db = Mock::new();
        db.state().failing = true;
        let svc = fixture::service(db);
        fixture::cache(svc.storage(), serde_json::to_string(&session).unwrap())
            .await;

        svc.execute(ClearAgencySession::from(&session))
            .await
            .unwrap();

        assert_eq!(fixture::cached(svc.storage()).await, None);
    }
}
