//! [`Query`] collection related to multiple [`SignupCode`]s.

use common::operations::By;

use crate::domain::SignupCode;
#[cfg(doc)]
use crate::Query;

use super::DatabaseQuery;

/// Queries all [`SignupCode`]s, the most recently created first.
pub type All = DatabaseQuery<By<Vec<SignupCode>, ()>>;
