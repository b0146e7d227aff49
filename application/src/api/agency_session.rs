//! Agency [`Session`] endpoints.

use axum::{
    extract::{rejection::JsonRejection, Path},
    http::StatusCode,
    Extension, Json,
};
use serde::{Deserialize, Serialize};
use service::{
    command::{
        authorize_agency_session, AuthorizeAgencySession, ClearAgencySession,
        RefreshAgencySession, ValidateAgencySession,
    },
    domain::user::Session,
    Command as _,
};

use crate::{define_error, AsError, Error, Service};

/// Response of the [`validate()`] endpoint.
#[derive(Clone, Copy, Debug, Serialize)]
pub struct ValidateResponse {
    /// Indicator whether the [`Session`] is still authorized.
    pub valid: bool,
}

/// Checks whether the provided [`Session`] is still authorized.
///
/// # Errors
///
/// With `BAD_REQUEST` if the request body is not a [`Session`].
#[tracing::instrument(skip_all)]
pub async fn validate(
    Extension(service): Extension<Service>,
    payload: Result<Json<Session>, JsonRejection>,
) -> Result<Json<ValidateResponse>, Error> {
    let Json(session) = payload.map_err(AsError::into_error)?;

    let valid = service
        .execute(ValidateAgencySession::from(&session))
        .await
        .unwrap_or_else(|e| match e {});
    Ok(Json(ValidateResponse { valid }))
}

/// Refreshes the user snapshot of the provided [`Session`].
///
/// # Errors
///
/// With `INVALID_SESSION` if the [`Session`] is not authorized, or its user
/// is not active anymore.
#[tracing::instrument(skip_all)]
pub async fn refresh(
    Extension(service): Extension<Service>,
    payload: Result<Json<Session>, JsonRejection>,
) -> Result<Json<Session>, Error> {
    let Json(session) = payload.map_err(AsError::into_error)?;

    service
        .execute(RefreshAgencySession::from(session))
        .await
        .unwrap_or_else(|e| match e {})
        .map(Json)
        .ok_or_else(|| SessionError::Invalid.into())
}

/// Revokes the provided [`Session`].
///
/// # Errors
///
/// With `BAD_REQUEST` if the request body is not a [`Session`].
#[tracing::instrument(skip_all)]
pub async fn clear(
    Extension(service): Extension<Service>,
    payload: Result<Json<Session>, JsonRejection>,
) -> Result<StatusCode, Error> {
    let Json(session) = payload.map_err(AsError::into_error)?;

    service
        .execute(ClearAgencySession::from(&session))
        .await
        .unwrap_or_else(|e| match e {});
    Ok(StatusCode::NO_CONTENT)
}

/// Request of the [`authorize()`] endpoint.
#[derive(Clone, Debug, Deserialize)]
pub struct AuthorizeRequest {
    /// [`Session`] to authorize.
    pub session: Session,

    /// Dot-separated permission required, if any.
    #[serde(default)]
    pub permission: Option<String>,
}

/// Response of the [`authorize()`] endpoint.
#[derive(Clone, Copy, Debug, Serialize)]
pub struct AuthorizeResponse {
    /// Always `true`, as unauthorized requests are answered with an [`Error`].
    pub authorized: bool,
}

/// Guards an agency page: authorizes the provided [`Session`] to access the
/// agency, optionally requiring a permission.
///
/// The [`Session`] is always validated remotely, regardless of its own
/// expiration, and only its token and user ID are taken from the request.
/// Agency membership and permissions are those currently stored.
///
/// # Errors
///
/// - `INVALID_SESSION` if the [`Session`] is not authorized anymore;
/// - `AGENCY_FORBIDDEN` if the user belongs to another agency;
/// - `PERMISSION_DENIED` if the required permission is not granted.
#[tracing::instrument(skip_all, fields(agency.id = %agency_id))]
pub async fn authorize(
    Extension(service): Extension<Service>,
    Path(agency_id): Path<String>,
    payload: Result<Json<AuthorizeRequest>, JsonRejection>,
) -> Result<Json<AuthorizeResponse>, Error> {
    let Json(AuthorizeRequest {
        session,
        permission,
    }) = payload.map_err(AsError::into_error)?;

    _ = service
        .execute(AuthorizeAgencySession {
            token: session.token,
            user_id: session.user.id,
            agency_id: agency_id.into(),
            permission,
        })
        .await
        .map_err(AsError::into_error)?;

    Ok(Json(AuthorizeResponse { authorized: true }))
}

impl AsError for authorize_agency_session::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::Db(e) => e.try_as_error(),
            Self::InvalidSession(_) => Some(SessionError::Invalid.into()),
            Self::OtherAgency(_) => Some(SessionError::OtherAgency.into()),
            Self::PermissionDenied(_) => {
                Some(SessionError::PermissionDenied.into())
            }
        }
    }
}

define_error! {
    enum SessionError {
        #[code = "INVALID_SESSION"]
        #[status = UNAUTHORIZED]
        #[message = "Agency session is invalid or expired"]
        Invalid,

        #[code = "AGENCY_FORBIDDEN"]
        #[status = FORBIDDEN]
        #[message = "Agency user belongs to another agency"]
        OtherAgency,

        #[code = "PERMISSION_DENIED"]
        #[status = FORBIDDEN]
        #[message = "Agency session lacks the required permission"]
        PermissionDenied,
    }
}

#[cfg(test)]
mod spec {
    use service::{
        command::authorize_agency_session::ExecutionError,
        domain::user::session::Token,
    };

    use crate::AsError as _;

    #[test]
    fn maps_other_agency_to_forbidden() {
        let err = ExecutionError::OtherAgency("agency-2".into()).as_error();

        assert_eq!(err.code, "AGENCY_FORBIDDEN");
        assert_eq!(err.status_code, http::StatusCode::FORBIDDEN);
    }

    #[test]
    fn maps_missing_permission_to_forbidden() {
        let err =
            ExecutionError::PermissionDenied("admin.delete".into()).as_error();

        assert_eq!(err.code, "PERMISSION_DENIED");
        assert_eq!(err.status_code, http::StatusCode::FORBIDDEN);
    }

    #[test]
    fn maps_invalid_session_to_unauthorized() {
        let err =
            ExecutionError::InvalidSession(Token::generate()).as_error();

        assert_eq!(err.code, "INVALID_SESSION");
        assert_eq!(err.status_code, http::StatusCode::UNAUTHORIZED);
    }
}
