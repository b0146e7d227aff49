//! [`Query`] collection related to a single agency [`User`].

use common::operations::By;

use crate::domain::{user, User};
#[cfg(doc)]
use crate::Query;

use super::DatabaseQuery;

/// Queries an active [`User`] by its [`user::Id`], along with its agency and
/// role.
pub type ActiveById = DatabaseQuery<By<Option<User>, user::Id>>;
