use super::{AppState, error::ApiError};
use crate::server::telemetry::{
    increment_rejections, increment_submissions, record_lookup, record_submit_duration,
};
use axum::{
    Form, Json,
    extract::{
        Path, Query, State,
        rejection::{FormRejection, QueryRejection},
    },
    http::StatusCode,
    response::{IntoResponse, Response},
};
use pwdhash::{JobId, Lookup, StatsSnapshot};
use serde::Deserialize;
use std::time::Instant;

#[derive(Debug, Deserialize)]
pub struct HashForm {
    password: Option<String>,
}

/// `POST /hash`: queues the trimmed `password` field and returns its id.
///
/// The field is read from the form body, falling back to the query string. A
/// body that is not form-encoded counts as empty.
#[tracing::instrument(skip_all)]
pub async fn submit(
    State(state): State<AppState>,
    query: Result<Query<HashForm>, QueryRejection>,
    form: Result<Form<HashForm>, FormRejection>,
) -> Result<(StatusCode, String), ApiError> {
    let start = Instant::now();

    let result = match password(query, form) {
        Ok(password) => state
            .service
            .submit(password.trim())
            .await
            .map_err(ApiError::from),
        Err(err) => Err(err),
    };

    match result {
        Ok(id) => {
            increment_submissions();
            record_submit_duration(start.elapsed().as_secs_f64() * 1000.0);
            tracing::info!(id, "Accepted submission");
            Ok((StatusCode::CREATED, id.to_string()))
        }
        Err(err) => {
            increment_rejections(err.kind());
            tracing::info!(reason = err.kind(), "Rejected submission");
            Err(err)
        }
    }
}

fn password(
    query: Result<Query<HashForm>, QueryRejection>,
    form: Result<Form<HashForm>, FormRejection>,
) -> Result<String, ApiError> {
    let from_body = match form {
        Ok(Form(form)) => form.password,
        Err(FormRejection::InvalidFormContentType(_)) => None,
        Err(rejection) => return Err(rejection.into()),
    };
    let Query(query) = query?;
    from_body
        .or(query.password)
        .ok_or_else(|| ApiError::BadRequest("missing `password` field".to_string()))
}

/// `GET /hash/{id}`: returns the digest once computed.
pub async fn get_hash(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> Result<Response, ApiError> {
    let id: JobId = raw_id
        .parse()
        .map_err(|_| ApiError::BadRequest(format!("invalid id `{raw_id}`")))?;

    let response = match state.service.lookup(id) {
        Lookup::Ready(digest) => {
            record_lookup("ready");
            (StatusCode::OK, digest).into_response()
        }
        Lookup::NotReady => {
            record_lookup("not_ready");
            StatusCode::ACCEPTED.into_response()
        }
        Lookup::NotFound => {
            record_lookup("not_found");
            StatusCode::NOT_FOUND.into_response()
        }
    };
    Ok(response)
}

/// `GET /stats`
pub async fn stats(State(state): State<AppState>) -> Json<StatsSnapshot> {
    Json(state.service.stats())
}

/// `/shutdown`: signals the server to stop. The response is sent before the
/// listener closes; queued jobs are drained afterwards.
pub async fn shutdown(State(state): State<AppState>) -> StatusCode {
    tracing::info!("Shutdown requested over HTTP");
    state.shutdown.cancel();
    StatusCode::NO_CONTENT
}
