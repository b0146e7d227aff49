//! [`Command`] for authorizing a [`Session`] to access an agency.

use common::operations::{By, Select, Update};
use derive_more::{Display, Error, From};
use tracerr::Traced;

#[cfg(doc)]
use crate::domain::user::Session;
use crate::{
    domain::{
        agency,
        user::{
            self,
            session::{
                record::{self, Revocation},
                Record, Token,
            },
        },
        User,
    },
    infra::{database, Database},
    Service,
};

use super::{Command, ValidateAgencySession};

/// [`Command`] for guarding an agency page.
///
/// Only the [`Token`] and [`user::Id`] of the presented [`Session`] are
/// trusted. Agency membership and permissions are checked against the
/// [`User`] as currently stored.
#[derive(Clone, Debug)]
pub struct AuthorizeAgencySession {
    /// [`Token`] of the presented [`Session`].
    pub token: Token,

    /// ID of the [`User`] the presented [`Session`] claims to belong to.
    pub user_id: user::Id,

    /// ID of the agency being accessed.
    pub agency_id: agency::Id,

    /// Dot-separated permission required, if any.
    pub permission: Option<String>,
}

impl<Db, St> Command<AuthorizeAgencySession> for Service<Db, St>
where
    Db: Database<
            Select<By<Option<Record>, (Token, user::Id)>>,
            Ok = Option<Record>,
            Err = Traced<database::Error>,
        > + Database<
            Update<By<Revocation, record::Id>>,
            Ok = (),
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Option<User>, user::Id>>,
            Ok = Option<User>,
            Err = Traced<database::Error>,
        >,
{
    /// [`User`] as currently stored.
    type Ok = User;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: AuthorizeAgencySession,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let AuthorizeAgencySession {
            token,
            user_id,
            agency_id,
            permission,
        } = cmd;

        let valid = self
            .execute(ValidateAgencySession {
                token: token.clone(),
                user_id,
            })
            .await
            .unwrap_or_else(|e| match e {});
        if !valid {
            return Err(tracerr::new!(E::InvalidSession(token)));
        }

        let Some(user) = self
            .database()
            .execute(Select(By::new(user_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
        else {
            return Err(tracerr::new!(E::InvalidSession(token)));
        };

        if !user.belongs_to(AsRef::<str>::as_ref(&agency_id)) {
            return Err(tracerr::new!(E::OtherAgency(agency_id)));
        }
        if let Some(p) = permission {
            if !user.has_permission(&p) {
                return Err(tracerr::new!(E::PermissionDenied(p)));
            }
        }

        Ok(user)
    }
}

/// Error of [`AuthorizeAgencySession`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    Db(database::Error),

    /// [`Session`] is revoked, expired, or its [`User`] is not active.
    #[display("`Session(token: {_0})` is not authorized")]
    #[from(ignore)]
    InvalidSession(#[error(not(source))] Token),

    /// [`User`] belongs to another agency.
    #[display("Access to agency `{_0}` is forbidden")]
    #[from(ignore)]
    OtherAgency(#[error(not(source))] agency::Id),

    /// Required permission is not granted.
    #[display("Permission `{_0}` is not granted")]
    #[from(ignore)]
    PermissionDenied(#[error(not(source))] String),
}

#[cfg(test)]
mod spec {
    use std::time::Duration;

    use common::DateTime;
    use serde_json::json;

    use crate::{
        domain::{role::PermissionSet, user::Session},
        fixture,
        infra::{database::mock::Mock, storage::Memory},
        Command as _, Service,
    };

    use super::{AuthorizeAgencySession, ExecutionError};

    fn authorize(
        session: &Session,
        agency_id: &str,
        permission: Option<&str>,
    ) -> AuthorizeAgencySession {
        AuthorizeAgencySession {
            token: session.token.clone(),
            user_id: session.user.id,
            agency_id: agency_id.into(),
            permission: permission.map(Into::into),
        }
    }

    fn service_with(session: &Session) -> Service<Mock, Memory> {
        let db = Mock::new().with_user(session.user.clone());
        db.state().records.push(fixture::record(
            session,
            DateTime::now() + Duration::from_secs(60),
        ));
        fixture::service(db)
    }

    #[tokio::test]
    async fn grants_stored_permissions() {
        let session = fixture::session(fixture::user(
            "agency-1",
            Some(json!({"reports": {"view": true, "edit": false}})),
        ));
        let svc = service_with(&session);

        let authorized = svc
            .execute(authorize(&session, "agency-1", Some("reports.view")))
            .await
            .unwrap();
        assert_eq!(authorized, session.user);

        let err = svc
            .execute(authorize(&session, "agency-1", Some("reports.edit")))
            .await
            .unwrap_err();
        assert!(matches!(
            err.as_ref(),
            ExecutionError::PermissionDenied(_),
        ));
    }

    #[tokio::test]
    async fn ignores_presented_agency_and_permissions() {
        let session = fixture::session(fixture::user("agency-1", None));
        let svc = service_with(&session);
        let mut forged = session.clone();
        forged.user.agency_id = "agency-2".into();
        forged.user.permissions =
            PermissionSet::from_json(json!({"all": true}));

        let err = svc
            .execute(authorize(&forged, "agency-2", None))
            .await
            .unwrap_err();
        assert!(matches!(err.as_ref(), ExecutionError::OtherAgency(_)));

        let err = svc
            .execute(authorize(&forged, "agency-1", Some("admin.delete")))
            .await
            .unwrap_err();
        assert!(matches!(
            err.as_ref(),
            ExecutionError::PermissionDenied(_),
        ));
    }

    #[tokio::test]
    async fn rejects_unrecorded_session() {
        let session = fixture::session(fixture::user("agency-1", None));
        let db = Mock::new().with_user(session.user.clone());
        let svc = fixture::service(db);

        let err = svc
            .execute(authorize(&session, "agency-1", None))
            .await
            .unwrap_err();

        assert!(matches!(err.as_ref(), ExecutionError::InvalidSession(_)));
    }

    #[tokio::test]
    async fn rejects_deactivated_user() {
        let session = fixture::session(fixture::user("agency-1", None));
        let db = Mock::new().with_inactive_user(session.user.clone());
        db.state().records.push(fixture::record(
            &session,
            DateTime::now() + Duration::from_secs(60),
        ));
        let svc = fixture::service(db);

        let err = svc
            .execute(authorize(&session, "agency-1", None))
            .await
            .unwrap_err();

        assert!(matches!(err.as_ref(), ExecutionError::InvalidSession(_)));
    }
}
