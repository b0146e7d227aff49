//! [`Command`] for creating a [`Session`] of an agency [`User`].

use std::convert::Infallible;

use common::{operations::Insert, DateTime};
use tracerr::Traced;
use tracing as log;

#[cfg(doc)]
use crate::domain::{user::Session, User};
use crate::{
    domain::user::{
        self,
        session::{
            self,
            record::{self, ClientAddress, UserAgent},
            Record,
        },
    },
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for issuing a new [`Session`] [`session::Token`] to an agency
/// [`User`].
///
/// Only the authorization [`Record`] is created, without touching any local
/// state.
#[derive(Clone, Debug)]
pub struct CreateAgencySession {
    /// ID of the [`User`] to issue the [`Session`] to.
    pub user_id: user::Id,

    /// [`UserAgent`] of the client, if known.
    pub user_agent: Option<UserAgent>,

    /// [`ClientAddress`] of the client, if known.
    pub client_address: Option<ClientAddress>,
}

impl From<user::Id> for CreateAgencySession {
    fn from(user_id: user::Id) -> Self {
        Self {
            user_id,
            user_agent: None,
            client_address: None,
        }
    }
}

/// Output of [`CreateAgencySession`] [`Command`].
#[derive(Clone, Debug)]
pub struct Output {
    /// [`session::Token`] of the created [`Session`].
    pub token: session::Token,

    /// [`DateTime`] when the created [`Session`] expires.
    pub expires_at: session::ExpirationDateTime,
}

impl<Db, St> Command<CreateAgencySession> for Service<Db, St>
where
    Db: Database<Insert<Record>, Ok = (), Err = Traced<database::Error>>,
{
    /// [`None`] if the [`Record`] cannot be stored.
    type Ok = Option<Output>;
    type Err = Infallible;

    async fn execute(
        &self,
        cmd: CreateAgencySession,
    ) -> Result<Self::Ok, Self::Err> {
        let CreateAgencySession {
            user_id,
            user_agent,
            client_address,
        } = cmd;

        let now = DateTime::now();
        let expires_at = now + self.config().session_ttl;
        let record = Record {
            id: record::Id::new(),
            token: session::Token::generate(),
            user_id,
            is_active: true,
            expires_at: expires_at.coerce(),
            client_address: client_address.unwrap_or_default(),
            user_agent: user_agent.unwrap_or_default(),
            created_at: now.coerce(),
        };
        let output = Output {
            token: record.token.clone(),
            expires_at: expires_at.coerce(),
        };

        if let Err(e) = self.database().execute(Insert(record)).await {
            log::error!("failed to create agency session: {e}");
            return Ok(None);
        }
        Ok(Some(output))
    }
}
