//! [`Command`] for signing in an agency [`User`].

use std::convert::Infallible;

use common::operations::{By, Insert, Select, Update};
use tracerr::Traced;
use tracing as log;

use crate::{
    domain::{
        user::{
            self,
            session::{
                record::{ClientAddress, UserAgent},
                Record,
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

use super::{
    cache_session, create_agency_session, Command, CreateAgencySession,
};

/// [`Command`] for starting a new [`Session`] of an already authenticated
/// agency [`User`].
///
/// The started [`Session`] is cached locally.
#[derive(Clone, Debug)]
pub struct SignInAgencyUser {
    /// ID of the [`User`] to sign in.
    pub user_id: user::Id,

    /// [`UserAgent`] of the client, if known.
    pub user_agent: Option<UserAgent>,

    /// [`ClientAddress`] of the client, if known.
    pub client_address: Option<ClientAddress>,
}

impl From<user::Id> for SignInAgencyUser {
    fn from(user_id: user::Id) -> Self {
        Self {
            user_id,
            user_agent: None,
            client_address: None,
        }
    }
}

impl<Db, St> Command<SignInAgencyUser> for Service<Db, St>
where
    Db: Database<
            Select<By<Option<User>, user::Id>>,
            Ok = Option<User>,
            Err = Traced<database::Error>,
        > + Database<Insert<Record>, Ok = (), Err = Traced<database::Error>>,
    St: Storage<Update<Entry>, Ok = (), Err = Traced<storage::Error>>,
{
    /// [`None`] if the [`User`] is not active or the [`Session`] cannot be
    /// started.
    type Ok = Option<Session>;
    type Err = Infallible;

    async fn execute(
        &self,
        cmd: SignInAgencyUser,
    ) -> Result<Self::Ok, Self::Err> {
        let SignInAgencyUser {
            user_id,
            user_agent,
            client_address,
        } = cmd;

        let user = match self.database().execute(Select(By::new(user_id))).await
        {
            Ok(Some(u)) => u,
            Ok(None) => return Ok(None),
            Err(e) => {
                log::error!("failed to read agency user `{user_id}`: {e}");
                return Ok(None);
            }
        };

        let created = self
            .execute(CreateAgencySession {
                user_id,
                user_agent,
                client_address,
            })
            .await?;
        let Some(create_agency_session::Output { token, expires_at }) = created
        else {
            return Ok(None);
        };

        let session = Session {
            token,
            user,
            expires_at,
        };
        cache_session(self.storage(), &session).await;

        Ok(Some(session))
    }
}

#[cfg(test)]
mod spec {
    use crate::{
        domain::user::{self, Session},
        fixture,
        infra::database::mock::Mock,
        query::CurrentAgencySession,
        Command as _, Config, Service,
    };

    use super::SignInAgencyUser;

    #[tokio::test]
    async fn starts_and_caches_session() {
        let user = fixture::user("agency-1", None);
        let db = Mock::new().with_user(user.clone());
        let svc = fixture::service(db.clone());

        let session = svc
            .execute(SignInAgencyUser::from(user.id))
            .await
            .unwrap()
            .expect("user is active");

        assert_eq!(session.user, user);
        assert!(!session.is_expired());
        assert_eq!(db.state().records[0].token, session.token);

        let cached = fixture::cached(svc.storage()).await.unwrap();
        assert_eq!(serde_json::from_str::<Session>(&cached).unwrap(), session);
    }

    #[tokio::test]
    async fn refuses_inactive_user() {
        let user = fixture::user("agency-1", None);
        let db = Mock::new().with_inactive_user(user.clone());
        let svc = fixture::service(db.clone());

        let session = svc.execute(SignInAgencyUser::from(user.id)).await;

        assert!(session.unwrap().is_none());
        assert!(db.state().records.is_empty());
        assert_eq!(fixture::cached(svc.storage()).await, None);
    }

    #[tokio::test]
    async fn refuses_unknown_user() {
        let svc = fixture::service(Mock::new());

        let session =
            svc.execute(SignInAgencyUser::from(user::Id::new())).await;

        assert!(session.unwrap().is_none());
    }

    #[tokio::test]
    async fn caches_nothing_if_record_is_not_stored() {
        let user = fixture::user("agency-1", None);
        let db = Mock::new().with_user(user.clone());
        db.state().failing_writes = true;
        let svc = fixture::service(db);

        let session = svc.execute(SignInAgencyUser::from(user.id)).await;

        assert!(session.unwrap().is_none());
        assert_eq!(fixture::cached(svc.storage()).await, None);
    }

    #[tokio::test]
    async fn starts_session_without_client_context() {
        let user = fixture::user("agency-1", None);
        let db = Mock::new().with_user(user.clone());
        let svc = Service::new(Config::default(), db.clone());

        let session = svc
            .execute(SignInAgencyUser::from(user.id))
            .await
            .unwrap()
            .expect("user is active");

        assert_eq!(session.user, user);
        assert_eq!(db.state().records[0].token, session.token);
        assert_eq!(svc.execute(CurrentAgencySession).await.unwrap(), None);
    }
}
