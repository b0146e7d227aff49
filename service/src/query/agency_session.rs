//! [`Query`] of the locally cached [`Session`].

use std::convert::Infallible;

use common::operations::{By, Delete, Select};
use tracerr::Traced;
use tracing as log;

use crate::{
    domain::user::Session,
    infra::{
        storage::{self, Key},
        Storage,
    },
    Service,
};

use super::Query;

/// [`Query`] of the [`Session`] cached in the local [`Storage`], without
/// contacting the [`Database`].
///
/// A cached [`Session`] which cannot be parsed or has expired is removed from
/// the local [`Storage`], and reported as absent.
///
/// [`Database`]: crate::infra::Database
#[derive(Clone, Copy, Debug, Default)]
pub struct CurrentAgencySession;

impl<Db, St> Query<CurrentAgencySession> for Service<Db, St>
where
    St: Storage<
            Select<By<Option<String>, Key>>,
            Ok = Option<String>,
            Err = Traced<storage::Error>,
        > + Storage<
            Delete<By<String, Key>>,
            Ok = (),
            Err = Traced<storage::Error>,
        >,
{
    type Ok = Option<Session>;
    type Err = Infallible;

    async fn execute(
        &self,
        _: CurrentAgencySession,
    ) -> Result<Self::Ok, Self::Err> {
        let key = Key::new(Session::CACHE_KEY);

        let blob = match self.storage().execute(Select(By::new(key))).await {
            Ok(Some(b)) => b,
            Ok(None) => return Ok(None),
            Err(e) => {
                log::error!("failed to read cached agency session: {e}");
                return Ok(None);
            }
        };

        let session = match serde_json::from_str::<Session>(&blob) {
            Ok(s) if !s.is_expired() => return Ok(Some(s)),
            Ok(_) => None,
            Err(e) => {
                log::warn!("discarding malformed cached agency session: {e}");
                None
            }
        };

        if let Err(e) = self.storage().execute(Delete(By::new(key))).await {
            log::error!("failed to remove cached agency session: {e}");
        }
        Ok(session)
    }
}
