//! [`Command`] for validating a [`Session`] against its authorization
//! [`Record`].

use std::convert::Infallible;

use common::operations::{By, Select, Update};
use tracerr::Traced;
use tracing as log;

#[cfg(doc)]
use crate::domain::User;
use crate::{
    domain::user::{
        self,
        session::{
            record::{self, Revocation},
            Record, Token,
        },
        Session,
    },
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for checking whether a [`Session`] is still authorized.
///
/// Fails closed: any doubt (missing, revoked or expired [`Record`], or a
/// [`Database`] failure) results in `false`. The [`Session`] itself is never
/// modified.
#[derive(Clone, Debug)]
pub struct ValidateAgencySession {
    /// [`Token`] of the [`Session`] to validate.
    pub token: Token,

    /// ID of the [`User`] owning the [`Session`].
    pub user_id: user::Id,
}

impl From<&Session> for ValidateAgencySession {
    fn from(session: &Session) -> Self {
        Self {
            token: session.token.clone(),
            user_id: session.user.id,
        }
    }
}

impl<Db, St> Command<ValidateAgencySession> for Service<Db, St>
where
    Db: Database<
            Select<By<Option<Record>, (Token, user::Id)>>,
            Ok = Option<Record>,
            Err = Traced<database::Error>,
        > + Database<
            Update<By<Revocation, record::Id>>,
            Ok = (),
            Err = Traced<database::Error>,
        >,
{
    type Ok = bool;
    type Err = Infallible;

    async fn execute(
        &self,
        cmd: ValidateAgencySession,
    ) -> Result<Self::Ok, Self::Err> {
        let ValidateAgencySession { token, user_id } = cmd;

        let record = match self
            .database()
            .execute(Select(By::new((token, user_id))))
            .await
        {
            Ok(Some(r)) => r,
            Ok(None) => return Ok(false),
            Err(e) => {
                log::error!("failed to validate agency session: {e}");
                return Ok(false);
            }
        };

        if record.expires_at.has_elapsed() {
            if let Err(e) = self
                .database()
                .execute(Update(By::<Revocation, _>::new(record.id)))
                .await
            {
                log::warn!(
                    "failed to deactivate expired agency session \
                     `Record(id: {})`: {e}",
                    record.id,
                );
            }
            return Ok(false);
        }

        Ok(true)
    }
}
