//! [`Command`] for generating new [`SignupCode`]s.

use std::collections::HashSet;

use common::operations::Insert;
use derive_more::{Display, Error, From};
use smart_default::SmartDefault;
use tracerr::Traced;

use crate::{
    domain::{signup_code, SignupCode},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for generating a batch of new unused [`SignupCode`]s.
#[derive(Clone, Copy, Debug, SmartDefault)]
pub struct GenerateSignupCodes {
    /// Number of [`SignupCode`]s to generate.
    #[default(1)]
    pub count: usize,
}

impl GenerateSignupCodes {
    /// Maximum number of [`SignupCode`]s generated at once.
    pub const MAX_COUNT: usize = 1000;
}

impl<Db, St> Command<GenerateSignupCodes> for Service<Db, St>
where
    Db: Database<
        Insert<Vec<SignupCode>>,
        Ok = (),
        Err = Traced<database::Error>,
    >,
{
    type Ok = Vec<signup_code::Code>;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: GenerateSignupCodes,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let GenerateSignupCodes { count } = cmd;
        if !(1..=GenerateSignupCodes::MAX_COUNT).contains(&count) {
            return Err(tracerr::new!(E::InvalidCount(count)));
        }

        let mut seen = HashSet::with_capacity(count);
        let mut codes = Vec::with_capacity(count);
        while codes.len() < count {
            let code = SignupCode::generate();
            if seen.insert(code.code.clone()) {
                codes.push(code);
            }
        }

        let generated = codes.iter().map(|c| c.code.clone()).collect();
        self.database()
            .execute(Insert(codes))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        Ok(generated)
    }
}

/// Error of [`GenerateSignupCodes`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    Db(database::Error),

    /// Requested number of [`SignupCode`]s is out of the allowed range.
    #[display(
        "Cannot generate {_0} `SignupCode`s, allowed from 1 to {}",
        GenerateSignupCodes::MAX_COUNT
    )]
    #[from(ignore)]
    InvalidCount(#[error(not(source))] usize),
}
