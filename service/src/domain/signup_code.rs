//! [`SignupCode`] definitions.

use common::{
    unit::{Creation, Usage},
    DateTimeOf,
};
#[cfg(doc)]
use common::DateTime;
use derive_more::{AsRef, Display};
#[cfg(feature = "postgres")]
use postgres_types::{FromSql, ToSql};
use rand::Rng as _;
use serde::{Deserialize, Serialize};

use crate::domain::user;

/// Single-use invitation code required to sign up.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct SignupCode {
    /// [`Code`] itself.
    pub code: Code,

    /// Indicator whether this [`SignupCode`] has been redeemed.
    pub used: bool,

    /// Indicator whether this [`SignupCode`] has been handed out to someone.
    pub given_out: bool,

    /// Who handed out this [`SignupCode`], if recorded.
    pub given_by: Option<String>,

    /// Free-form comment on this [`SignupCode`].
    pub comment: Option<String>,

    /// [`user::Email`] of whoever redeemed this [`SignupCode`].
    pub used_by: Option<user::Email>,

    /// [`DateTime`] when this [`SignupCode`] was redeemed.
    #[serde(with = "common::datetime::serde::rfc3339_option")]
    pub used_at: Option<UsageDateTime>,

    /// [`DateTime`] when this [`SignupCode`] was created.
    #[serde(with = "common::datetime::serde::rfc3339")]
    pub created_at: CreationDateTime,
}

impl SignupCode {
    /// Creates a new unused [`SignupCode`] with a freshly generated [`Code`].
    #[must_use]
    pub fn generate() -> Self {
        Self {
            code: Code::generate(),
            used: false,
            given_out: false,
            given_by: None,
            comment: None,
            used_by: None,
            used_at: None,
            created_at: DateTimeOf::now(),
        }
    }
}

/// Textual representation of a [`SignupCode`].
#[derive(
    AsRef, Clone, Debug, Deserialize, Display, Eq, Hash, PartialEq, Serialize,
)]
#[as_ref(str)]
#[serde(try_from = "String")]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
pub struct Code(String);

impl Code {
    /// Length of a generated [`Code`].
    pub const LENGTH: usize = 8;

    /// Alphabet of a generated [`Code`].
    const ALPHABET: &'static [u8] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";

    /// Creates a new [`Code`] if the given `code` is valid.
    #[must_use]
    pub fn new(code: impl Into<String>) -> Option<Self> {
        let code = code.into();
        Self::check(&code).then_some(Self(code))
    }

    /// Generates a new random [`Code`].
    #[must_use]
    pub fn generate() -> Self {
        let mut rng = rand::thread_rng();
        Self(
            (0..Self::LENGTH)
                .map(|_| {
                    char::from(
                        Self::ALPHABET[rng.gen_range(0..Self::ALPHABET.len())],
                    )
                })
                .collect(),
        )
    }

    /// Checks whether the given `code` is a valid [`Code`].
    fn check(code: impl AsRef<str>) -> bool {
        let code = code.as_ref();
        !code.is_empty()
            && code.len() <= 64
            && code.bytes().all(|b| b.is_ascii_alphanumeric())
    }
}

impl TryFrom<String> for Code {
    type Error = &'static str;

    fn try_from(code: String) -> Result<Self, Self::Error> {
        Self::new(code).ok_or("invalid `signup_code::Code`")
    }
}

/// Handing out of a [`SignupCode`] to someone.
#[derive(Clone, Debug)]
pub struct Handout {
    /// [`Code`] being handed out.
    pub code: Code,

    /// New value of [`SignupCode::given_out`].
    pub given_out: bool,

    /// New value of [`SignupCode::given_by`], if it should be changed.
    pub given_by: Option<String>,

    /// New value of [`SignupCode::comment`], if it should be changed.
    pub comment: Option<String>,
}

/// Redemption of an unused [`SignupCode`].
#[derive(Clone, Debug)]
pub struct Redemption {
    /// [`Code`] being redeemed.
    pub code: Code,

    /// [`user::Email`] of whoever redeems the [`Code`].
    pub used_by: user::Email,

    /// [`DateTime`] of the redemption.
    pub used_at: UsageDateTime,
}

/// [`DateTime`] when a [`SignupCode`] was created.
pub type CreationDateTime = DateTimeOf<(SignupCode, Creation)>;

/// [`DateTime`] when a [`SignupCode`] was redeemed.
pub type UsageDateTime = DateTimeOf<(SignupCode, Usage)>;

#[cfg(test)]
mod spec {
    use std::collections::HashSet;

    use super::Code;

    #[test]
    fn generates_uppercase_base36_codes() {
        for _ in 0..100 {
            let code = Code::generate();

            assert_eq!(code.as_ref().len(), Code::LENGTH);
            assert!(code
                .as_ref()
                .bytes()
                .all(|b| b.is_ascii_digit() || b.is_ascii_uppercase()));
        }
    }

    #[test]
    fn generates_distinct_codes() {
        let codes = (0..100).map(|_| Code::generate()).collect::<HashSet<_>>();

        assert_eq!(codes.len(), 100);
    }

    #[test]
    fn validates_codes() {
        assert!(Code::new("AB12CD34").is_some());
        assert!(Code::new("legacy42").is_some());

        assert!(Code::new("").is_none());
        assert!(Code::new("AB12 CD34").is_none());
        assert!(Code::new("AB12-CD34").is_none());
        assert!(Code::new("A".repeat(65)).is_none());
    }

    #[test]
    fn deserializes_only_valid_codes() {
        assert!(serde_json::from_str::<Code>(r#""AB12CD34""#).is_ok());
        assert!(serde_json::from_str::<Code>(r#""AB 12""#).is_err());
    }
}
