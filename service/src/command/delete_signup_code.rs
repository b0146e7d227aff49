//! [`Command`] for deleting a [`SignupCode`].

use common::operations::{By, Delete};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{signup_code, SignupCode},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for deleting a [`SignupCode`].
#[derive(Clone, Debug, From)]
pub struct DeleteSignupCode {
    /// [`signup_code::Code`] to delete.
    pub code: signup_code::Code,
}

impl<Db, St> Command<DeleteSignupCode> for Service<Db, St>
where
    Db: Database<
        Delete<By<SignupCode, signup_code::Code>>,
        Ok = bool,
        Err = Traced<database::Error>,
    >,
{
    type Ok = ();
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: DeleteSignupCode,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let DeleteSignupCode { code } = cmd;

        let deleted = self
            .database()
            .execute(Delete(By::new(code.clone())))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;
        if !deleted {
            return Err(tracerr::new!(E::SignupCodeNotExists(code)));
        }

        Ok(())
    }
}

/// Error of [`DeleteSignupCode`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    Db(database::Error),

    /// [`SignupCode`] with the provided [`signup_code::Code`] does not exist.
    #[display("`SignupCode(code: {_0})` does not exist")]
    #[from(ignore)]
    SignupCodeNotExists(#[error(not(source))] signup_code::Code),
}

#[cfg(test)]
mod spec {
    use crate::{
        domain::SignupCode, fixture, infra::database::mock::Mock,
        Command as _,
    };

    use super::{DeleteSignupCode, ExecutionError};

    #[tokio::test]
    async fn deletes_code() {
        let kept = SignupCode::generate();
        let deleted = SignupCode::generate();
        let db = Mock::new();
        db.state().codes.extend([kept.clone(), deleted.clone()]);
        let svc = fixture::service(db.clone());

        svc.execute(DeleteSignupCode::from(deleted.code.clone()))
            .await
            .unwrap();

        assert_eq!(db.state().codes, [kept]);

        let err = svc
            .execute(DeleteSignupCode::from(deleted.code))
            .await
            .unwrap_err();
        assert!(matches!(
            err.as_ref(),
            ExecutionError::SignupCodeNotExists(_),
        ));
    }
}
