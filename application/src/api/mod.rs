//! HTTP JSON API definitions.

pub mod agency_session;
pub mod signup_code;

use axum::{
    routing::{post, put},
    Router,
};

/// Creates a new [`Router`] serving the HTTP JSON API.
///
/// Handlers expect the [`Service`] to be provided as an [`Extension`].
/// Sessions are only issued by the command line client, as no credentials
/// are checked here.
///
/// [`Extension`]: axum::Extension
/// [`Service`]: crate::Service
pub fn router() -> Router {
    Router::new()
        .route(
            "/api/agency/sessions/validate",
            post(agency_session::validate),
        )
        .route("/api/agency/sessions/refresh", post(agency_session::refresh))
        .route("/api/agency/sessions/clear", post(agency_session::clear))
        .route(
            "/api/agency/:agency_id/authorize",
            post(agency_session::authorize),
        )
        .route(
            "/api/signup-codes",
            put(signup_code::give_out)
                .get(signup_code::list)
                .post(signup_code::generate)
                .delete(signup_code::delete),
        )
        .route("/api/signup-codes/redeem", post(signup_code::redeem))
}
