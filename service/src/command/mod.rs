//! [`Command`] definition.

pub mod authorize_agency_session;
pub mod clear_agency_session;
pub mod create_agency_session;
pub mod delete_signup_code;
pub mod generate_signup_codes;
pub mod give_out_signup_code;
pub mod redeem_signup_code;
pub mod refresh_agency_session;
pub mod sign_in_agency_user;
pub mod validate_agency_session;

use common::operations::Update;
use tracerr::Traced;
use tracing as log;

use crate::{
    domain::user::Session,
    infra::{
        storage::{self, Entry, Key},
        Storage,
    },
};

/// [`Command`] of the [`Service`].
///
/// [`Service`]: crate::Service
pub use common::Handler as Command;

pub use self::{
    authorize_agency_session::AuthorizeAgencySession,
    clear_agency_session::ClearAgencySession,
    create_agency_session::CreateAgencySession,
    delete_signup_code::DeleteSignupCode,
    generate_signup_codes::GenerateSignupCodes,
    give_out_signup_code::GiveOutSignupCode,
    redeem_signup_code::RedeemSignupCode,
    refresh_agency_session::RefreshAgencySession,
    sign_in_agency_user::SignInAgencyUser,
    validate_agency_session::ValidateAgencySession,
};

/// Writes the provided [`Session`] into the local [`Storage`], replacing the
/// cached one.
///
/// Failures are only logged, as the [`Session`] stays usable without being
/// cached.
async fn cache_session<St>(storage: &St, session: &Session)
where
    St: Storage<Update<Entry>, Ok = (), Err = Traced<storage::Error>>,
{
    let value = match serde_json::to_string(session) {
        Ok(v) => v,
        Err(e) => {
            log::error!("failed to serialize agency session: {e}");
            return;
        }
    };
    if let Err(e) = storage
        .execute(Update(Entry {
            key: Key::new(Session::CACHE_KEY),
            value,
        }))
        .await
    {
        log::error!("failed to cache agency session: {e}");
    }
}
