//! [`Command`] for redeeming a [`SignupCode`].

use common::{operations::Update, DateTime};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{
        signup_code::{self, Redemption},
        user, SignupCode,
    },
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for redeeming an unused [`SignupCode`] on sign up.
///
/// A [`SignupCode`] is redeemed at most once, even under concurrent
/// redemptions.
#[derive(Clone, Debug)]
pub struct RedeemSignupCode {
    /// [`signup_code::Code`] to redeem.
    pub code: signup_code::Code,

    /// [`user::Email`] of whoever signs up.
    pub email: user::Email,
}

impl<Db, St> Command<RedeemSignupCode> for Service<Db, St>
where
    Db: Database<
        Update<Redemption>,
        Ok = Option<SignupCode>,
        Err = Traced<database::Error>,
    >,
{
    type Ok = SignupCode;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: RedeemSignupCode,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let RedeemSignupCode { code, email } = cmd;

        self.database()
            .execute(Update(Redemption {
                code: code.clone(),
                used_by: email,
                used_at: DateTime::now().coerce(),
            }))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or_else(|| E::InvalidOrUsed(code))
            .map_err(tracerr::wrap!())
    }
}

/// Error of [`RedeemSignupCode`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    Db(database::Error),

    /// [`SignupCode`] does not exist or has been redeemed already.
    #[display("`SignupCode(code: {_0})` is invalid or already used")]
    #[from(ignore)]
    InvalidOrUsed(#[error(not(source))] signup_code::Code),
}
