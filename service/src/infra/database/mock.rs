//! In-memory [`Database`] double for tests.

use std::sync::{Arc, Mutex, MutexGuard};

use common::operations::{By, Delete, Insert, Select, Update};
use derive_more::{Display, Error as StdError};
use tracerr::Traced;

use crate::{
    domain::{
        signup_code::{Code, Handout, Redemption},
        user::{
            self,
            session::{
                record::{self, Revocation},
                Record, Token,
            },
        },
        SignupCode, User,
    },
    infra::{database, Database},
};

/// In-memory [`Database`] with switchable failures.
#[derive(Clone, Debug, Default)]
pub struct Mock(Arc<Mutex<State>>);

/// Contents of a [`Mock`].
#[derive(Debug, Default)]
pub struct State {
    /// [`User`]s along with their activity flags.
    pub users: Vec<(User, bool)>,

    /// Stored session [`Record`]s.
    pub records: Vec<Record>,

    /// Stored [`SignupCode`]s.
    pub codes: Vec<SignupCode>,

    /// Makes every operation fail.
    pub failing: bool,

    /// Makes every writing operation fail.
    pub failing_writes: bool,

    /// Number of performed [`Revocation`]s.
    pub revocations: usize,
}

/// Failure simulated by a [`Mock`].
#[derive(Clone, Copy, Debug, Display, StdError)]
#[display("simulated database failure")]
pub struct Failure;

impl Mock {
    /// Creates a new empty [`Mock`].
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds the provided active [`User`] to this [`Mock`].
    pub fn with_user(self, user: User) -> Self {
        self.state().users.push((user, true));
        self
    }

    /// Adds the provided deactivated [`User`] to this [`Mock`].
    pub fn with_inactive_user(self, user: User) -> Self {
        self.state().users.push((user, false));
        self
    }

    /// Gives direct access to the [`State`] of this [`Mock`].
    pub fn state(&self) -> MutexGuard<'_, State> {
        self.0.lock().unwrap()
    }

    /// Locks the [`State`] for reading, unless failures are switched on.
    fn read(&self) -> Result<MutexGuard<'_, State>, Traced<database::Error>> {
        let state = self.state();
        if state.failing {
            return Err(tracerr::new!(database::Error::Mock(Failure)));
        }
        Ok(state)
    }

    /// Locks the [`State`] for writing, unless failures are switched on.
    fn write(&self) -> Result<MutexGuard<'_, State>, Traced<database::Error>> {
        let state = self.read().map_err(tracerr::wrap!())?;
        if state.failing_writes {
            return Err(tracerr::new!(database::Error::Mock(Failure)));
        }
        Ok(state)
    }
}

impl Database<Select<By<Option<Record>, (Token, user::Id)>>> for Mock {
    type Ok = Option<Record>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Record>, (Token, user::Id)>>,
    ) -> Result<Self::Ok, Self::Err> {
        let (token, user_id) = by.into_inner();
        Ok(self
            .read()?
            .records
            .iter()
            .find(|r| r.token == token && r.user_id == user_id && r.is_active)
            .cloned())
    }
}

impl Database<Insert<Record>> for Mock {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(record): Insert<Record>,
    ) -> Result<Self::Ok, Self::Err> {
        self.write()?.records.push(record);
        Ok(())
    }
}

impl Database<Update<By<Revocation, record::Id>>> for Mock {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Update(by): Update<By<Revocation, record::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();
        let mut state = self.write()?;
        state.revocations += 1;
        for r in state.records.iter_mut().filter(|r| r.id == id) {
            r.is_active = false;
        }
        Ok(())
    }
}

impl Database<Update<By<Revocation, Token>>> for Mock {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Update(by): Update<By<Revocation, Token>>,
    ) -> Result<Self::Ok, Self::Err> {
        let token = by.into_inner();
        let mut state = self.write()?;
        state.revocations += 1;
        for r in state.records.iter_mut().filter(|r| r.token == token) {
            r.is_active = false;
        }
        Ok(())
    }
}

impl Database<Select<By<Option<User>, user::Id>>> for Mock {
    type Ok = Option<User>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<User>, user::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();
        Ok(self
            .read()?
            .users
            .iter()
            .find(|(u, active)| u.id == id && *active)
            .map(|(u, _)| u.clone()))
    }
}

impl Database<Insert<Vec<SignupCode>>> for Mock {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(codes): Insert<Vec<SignupCode>>,
    ) -> Result<Self::Ok, Self::Err> {
        self.write()?.codes.extend(codes);
        Ok(())
    }
}

impl Database<Select<By<Vec<SignupCode>, ()>>> for Mock {
    type Ok = Vec<SignupCode>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        _: Select<By<Vec<SignupCode>, ()>>,
    ) -> Result<Self::Ok, Self::Err> {
        let mut codes = self.read()?.codes.clone();
        codes.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(codes)
    }
}

impl Database<Update<Handout>> for Mock {
    type Ok = bool;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Update(handout): Update<Handout>,
    ) -> Result<Self::Ok, Self::Err> {
        let mut state = self.write()?;
        let Some(code) =
            state.codes.iter_mut().find(|c| c.code == handout.code)
        else {
            return Ok(false);
        };
        code.given_out = handout.given_out;
        if handout.given_by.is_some() {
            code.given_by = handout.given_by;
        }
        if handout.comment.is_some() {
            code.comment = handout.comment;
        }
        Ok(true)
    }
}

impl Database<Delete<By<SignupCode, Code>>> for Mock {
    type Ok = bool;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Delete(by): Delete<By<SignupCode, Code>>,
    ) -> Result<Self::Ok, Self::Err> {
        let code = by.into_inner();
        let mut state = self.write()?;
        let before = state.codes.len();
        state.codes.retain(|c| c.code != code);
        Ok(state.codes.len() < before)
    }
}

impl Database<Update<Redemption>> for Mock {
    type Ok = Option<SignupCode>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Update(redemption): Update<Redemption>,
    ) -> Result<Self::Ok, Self::Err> {
        let mut state = self.write()?;
        Ok(state
            .codes
            .iter_mut()
            .find(|c| c.code == redemption.code && !c.used)
            .map(|c| {
                c.used = true;
                c.used_by = Some(redemption.used_by);
                c.used_at = Some(redemption.used_at);
                c.clone()
            }))
    }
}
