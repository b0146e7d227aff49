//! [`Command`] for handing out a [`SignupCode`].

use common::operations::Update;
use derive_more::{Display, Error, From};
use tracerr::Traced;

#[cfg(doc)]
use crate::domain::SignupCode;
use crate::{
    domain::signup_code::{self, Handout},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for marking a [`SignupCode`] as (not) given out.
#[derive(Clone, Debug)]
pub struct GiveOutSignupCode {
    /// [`signup_code::Code`] to hand out.
    pub code: signup_code::Code,

    /// Indicator whether the [`SignupCode`] is given out.
    pub given_out: bool,

    /// Who hands out the [`SignupCode`].
    ///
    /// Kept as is if [`None`].
    pub given_by: Option<String>,

    /// Comment on the [`SignupCode`].
    ///
    /// Kept as is if [`None`].
    pub comment: Option<String>,
}

impl<Db, St> Command<GiveOutSignupCode> for Service<Db, St>
where
    Db: Database<Update<Handout>, Ok = bool, Err = Traced<database::Error>>,
{
    type Ok = ();
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: GiveOutSignupCode,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let GiveOutSignupCode {
            code,
            given_out,
            given_by,
            comment,
        } = cmd;

        let updated = self
            .database()
            .execute(Update(Handout {
                code: code.clone(),
                given_out,
                given_by,
                comment,
            }))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;
        if !updated {
            return Err(tracerr::new!(E::SignupCodeNotExists(code)));
        }

        Ok(())
    }
}

/// Error of [`GiveOutSignupCode`] [`Command`] execution.
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
        domain::{signup_code::Code, SignupCode},
        fixture,
        infra::database::mock::Mock,
        Command as _,
    };

    use super::{ExecutionError, GiveOutSignupCode};

    #[tokio::test]
    async fn marks_code_given_out() {
        let code = SignupCode::generate();
        let db = Mock::new();
        db.state().codes.push(code.clone());
        let svc = fixture::service(db.clone());

        svc.execute(GiveOutSignupCode {
            code: code.code.clone(),
            given_out: true,
            given_by: Some("Grace".into()),
            comment: Some("career fair".into()),
        })
        .await
        .unwrap();

        let state = db.state();
        assert!(state.codes[0].given_out);
        assert_eq!(state.codes[0].given_by.as_deref(), Some("Grace"));
        assert_eq!(state.codes[0].comment.as_deref(), Some("career fair"));
    }

    #[tokio::test]
    async fn keeps_omitted_fields() {
        let mut code = SignupCode::generate();
        code.given_by = Some("Grace".into());
        code.comment = Some("career fair".into());
        let db = Mock::new();
        db.state().codes.push(code.clone());
        let svc = fixture::service(db.clone());

        svc.execute(GiveOutSignupCode {
            code: code.code.clone(),
            given_out: false,
            given_by: None,
            comment: None,
        })
        .await
        .unwrap();

        let state = db.state();
        assert!(!state.codes[0].given_out);
        assert_eq!(state.codes[0].given_by.as_deref(), Some("Grace"));
        assert_eq!(state.codes[0].comment.as_deref(), Some("career fair"));
    }

    #[tokio::test]
    async fn fails_on_unknown_code() {
        let svc = fixture::service(Mock::new());

        let err = svc
            .execute(GiveOutSignupCode {
                code: Code::new("NOSUCH01").unwrap(),
                given_out: true,
                given_by: None,
                comment: None,
            })
            .await
            .unwrap_err();

        assert!(matches!(
            err.as_ref(),
            ExecutionError::SignupCodeNotExists(c) if c.as_ref() == "NOSUCH01",
        ));
    }
}
