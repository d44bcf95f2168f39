use axum::{
    extract::{
        rejection::{PathRejection, QueryRejection},
        Path, Query, Request, State,
    },
    http::{header::WWW_AUTHENTICATE, HeaderValue},
    middleware::Next,
    response::{IntoResponse, Response},
};
use serde::Deserialize;

use super::AuthError;
use crate::error::TriggerFailure;
use crate::handlers::trigger::raw_job_segment;
use crate::state::AppState;

/// Secondary credential channel: `?api_key=...`
#[derive(Debug, Default, Deserialize)]
pub struct CredentialQuery {
    pub api_key: Option<String>,
}

/// Middleware guarding `POST /trigger/{job_name}`.
///
/// Extraction failures never short-circuit here: with auth disabled the
/// request goes through untouched, and the handler reports a bad path.
pub async fn require_api_key(
    State(state): State<AppState>,
    path: Result<Path<String>, PathRejection>,
    credentials: Result<Query<CredentialQuery>, QueryRejection>,
    request: Request,
    next: Next,
) -> Result<Response, Response> {
    let auth = &state.auth;
    let header = request
        .headers()
        .get(auth.header_name())
        .map(|value| value.as_bytes());

    let result = match &credentials {
        Ok(Query(query)) => auth.authorize(header, query.api_key.as_deref()),
        // An unparseable query string was still presented as credentials
        Err(_) => match auth.authorize(header, None) {
            Err(AuthError::Missing) => Err(AuthError::Invalid),
            other => other,
        },
    };

    if let Err(e) = result {
        let job_name = match &path {
            Ok(Path(job_name)) => job_name.trim().to_string(),
            Err(_) => raw_job_segment(request.uri()).to_string(),
        };
        let mut response = TriggerFailure::new(job_name, e).into_response();
        if let Ok(value) = HeaderValue::from_str(auth.header_name().as_str()) {
            response.headers_mut().insert(WWW_AUTHENTICATE, value);
        }
        return Err(response);
    }

    Ok(next.run(request).await)
}
