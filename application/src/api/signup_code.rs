//! [`SignupCode`] management endpoints.

use axum::{
    extract::rejection::JsonRejection, http::StatusCode, Extension, Json,
};
use serde::{Deserialize, Serialize};
use service::{
    command::{
        delete_signup_code, generate_signup_codes, give_out_signup_code,
        redeem_signup_code, DeleteSignupCode, GenerateSignupCodes,
        GiveOutSignupCode, RedeemSignupCode,
    },
    domain::{signup_code::Code, user, SignupCode},
    query, Command as _,
};

use crate::{define_error, AsError, Error, Service};

/// Request of the [`generate()`] endpoint.
#[derive(Clone, Copy, Debug, Default, Deserialize)]
pub struct GenerateRequest {
    /// Number of [`SignupCode`]s to generate, one by default.
    #[serde(default)]
    pub count: Option<usize>,
}

/// List of [`SignupCode`]s, or of their [`Code`]s only.
#[derive(Clone, Debug, Serialize)]
pub struct Codes<T> {
    /// Listed values.
    pub codes: Vec<T>,
}

/// Confirmation of a successful [`SignupCode`] modification.
#[derive(Clone, Copy, Debug, Serialize)]
pub struct Success {
    /// Always `true`.
    pub success: bool,
}

impl Success {
    /// Confirms a successful modification.
    const fn ok() -> Json<Self> {
        Json(Self { success: true })
    }
}

/// Generates new unused [`SignupCode`]s.
///
/// # Errors
///
/// With `INVALID_SIGNUP_CODES_COUNT` if too few or too many [`SignupCode`]s
/// are requested.
#[tracing::instrument(skip_all)]
pub async fn generate(
    Extension(service): Extension<Service>,
    payload: Result<Json<GenerateRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Codes<Code>>), Error> {
    let Json(GenerateRequest { count }) =
        payload.map_err(AsError::into_error)?;

    let codes = service
        .execute(count.map_or_else(GenerateSignupCodes::default, |count| {
            GenerateSignupCodes { count }
        }))
        .await
        .map_err(AsError::into_error)?;
    tracing::info!(count = codes.len(), "generated signup codes");

    Ok((StatusCode::CREATED, Json(Codes { codes })))
}

/// Lists all [`SignupCode`]s, the most recently created first.
///
/// # Errors
///
/// If the [`SignupCode`]s cannot be read.
#[tracing::instrument(skip_all)]
pub async fn list(
    Extension(service): Extension<Service>,
) -> Result<Json<Codes<SignupCode>>, Error> {
    let codes = service
        .execute(query::signup_codes::All::by(()))
        .await
        .map_err(AsError::into_error)?;
    Ok(Json(Codes { codes }))
}

/// Request of the [`give_out()`] endpoint.
#[derive(Clone, Debug, Deserialize)]
pub struct GiveOutRequest {
    /// [`Code`] to hand out.
    pub code: Code,

    /// Indicator whether the [`SignupCode`] is given out.
    pub given_out: bool,

    /// Who hands out the [`SignupCode`], if should be changed.
    #[serde(default)]
    pub given_by: Option<String>,

    /// Comment on the [`SignupCode`], if should be changed.
    #[serde(default)]
    pub comment: Option<String>,
}

/// Marks a [`SignupCode`] as (not) given out.
///
/// # Errors
///
/// With `SIGNUP_CODE_NOT_FOUND` if the [`SignupCode`] does not exist.
#[tracing::instrument(skip_all)]
pub async fn give_out(
    Extension(service): Extension<Service>,
    payload: Result<Json<GiveOutRequest>, JsonRejection>,
) -> Result<Json<Success>, Error> {
    let Json(GiveOutRequest {
        code,
        given_out,
        given_by,
        comment,
    }) = payload.map_err(AsError::into_error)?;

    service
        .execute(GiveOutSignupCode {
            code,
            given_out,
            given_by,
            comment,
        })
        .await
        .map_err(AsError::into_error)?;
    Ok(Success::ok())
}

/// Request of the [`delete()`] endpoint.
#[derive(Clone, Debug, Deserialize)]
pub struct DeleteRequest {
    /// [`Code`] to delete.
    pub code: Code,
}

/// Deletes a [`SignupCode`].
///
/// # Errors
///
/// With `SIGNUP_CODE_NOT_FOUND` if the [`SignupCode`] does not exist.
#[tracing::instrument(skip_all)]
pub async fn delete(
    Extension(service): Extension<Service>,
    payload: Result<Json<DeleteRequest>, JsonRejection>,
) -> Result<Json<Success>, Error> {
    let Json(DeleteRequest { code }) = payload.map_err(AsError::into_error)?;

    service
        .execute(DeleteSignupCode { code })
        .await
        .map_err(AsError::into_error)?;
    Ok(Success::ok())
}

/// Request of the [`redeem()`] endpoint.
#[derive(Clone, Debug, Deserialize)]
pub struct RedeemRequest {
    /// [`Code`] to redeem.
    pub code: Code,

    /// Email of whoever signs up.
    pub email: String,
}

/// Redeems an unused [`SignupCode`] on sign up.
///
/// # Errors
///
/// - `INVALID_EMAIL` if the email is malformed;
/// - `INVALID_SIGNUP_CODE` if the [`SignupCode`] does not exist or has been
///   used already.
#[tracing::instrument(skip_all)]
pub async fn redeem(
    Extension(service): Extension<Service>,
    payload: Result<Json<RedeemRequest>, JsonRejection>,
) -> Result<Json<Success>, Error> {
    let Json(RedeemRequest { code, email }) =
        payload.map_err(AsError::into_error)?;
    let email = user::Email::new(email)
        .ok_or_else(|| Error::from(SignupCodeError::InvalidEmail))?;

    _ = service
        .execute(RedeemSignupCode { code, email })
        .await
        .map_err(AsError::into_error)?;
    Ok(Success::ok())
}

impl AsError for generate_signup_codes::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::Db(e) => e.try_as_error(),
            Self::InvalidCount(_) => {
                Some(SignupCodeError::InvalidCount.into())
            }
        }
    }
}

impl AsError for give_out_signup_code::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::Db(e) => e.try_as_error(),
            Self::SignupCodeNotExists(_) => {
                Some(SignupCodeError::NotExists.into())
            }
        }
    }
}

impl AsError for delete_signup_code::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::Db(e) => e.try_as_error(),
            Self::SignupCodeNotExists(_) => {
                Some(SignupCodeError::NotExists.into())
            }
        }
    }
}

impl AsError for redeem_signup_code::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::Db(e) => e.try_as_error(),
            Self::InvalidOrUsed(_) => {
                Some(SignupCodeError::InvalidOrUsed.into())
            }
        }
    }
}

define_error! {
    enum SignupCodeError {
        #[code = "INVALID_SIGNUP_CODES_COUNT"]
        #[status = BAD_REQUEST]
        #[message = "Number of signup codes must be from 1 to 1000"]
        InvalidCount,

        #[code = "SIGNUP_CODE_NOT_FOUND"]
        #[status = NOT_FOUND]
        #[message = "Signup code does not exist"]
        NotExists,

        #[code = "INVALID_SIGNUP_CODE"]
        #[status = BAD_REQUEST]
        #[message = "Invalid or already used signup code"]
        InvalidOrUsed,

        #[code = "INVALID_EMAIL"]
        #[status = BAD_REQUEST]
        #[message = "Invalid email address"]
        InvalidEmail,
    }
}
