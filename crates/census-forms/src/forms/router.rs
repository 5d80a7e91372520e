use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Router,
};
use serde_json::json;

use super::service::{FormKind, FormServiceError, FormSubmission, FormValidationService};
use super::store::{Clock, RecordStore};

/// Router exposing one validation endpoint per census form.
pub fn form_router<S, C>(service: Arc<FormValidationService<S, C>>) -> Router
where
    S: RecordStore + 'static,
    C: Clock + 'static,
{
    Router::new()
        .route("/api/v1/forms/:form/validate", post(validate_handler::<S, C>))
        .with_state(service)
}

pub(crate) async fn validate_handler<S, C>(
    State(service): State<Arc<FormValidationService<S, C>>>,
    Path(form): Path<String>,
    payload: Result<axum::Json<FormSubmission>, JsonRejection>,
) -> Response
where
    S: RecordStore + 'static,
    C: Clock + 'static,
{
    let Some(form) = FormKind::parse(&form) else {
        let payload = json!({
            "error": format!("unknown form '{form}'"),
        });
        return (StatusCode::NOT_FOUND, axum::Json(payload)).into_response();
    };

    let submission = match payload {
        Ok(axum::Json(submission)) => submission,
        Err(rejection) => {
            let body = json!({
                "error": rejection.body_text(),
            });
            return (StatusCode::BAD_REQUEST, axum::Json(body)).into_response();
        }
    };

    match service.validate(form, &submission) {
        Ok(report) if report.accepted => (StatusCode::OK, axum::Json(report)).into_response(),
        Ok(report) => (StatusCode::UNPROCESSABLE_ENTITY, axum::Json(report)).into_response(),
        Err(FormServiceError::Store(error)) => {
            let payload = json!({
                "error": error.to_string(),
            });
            (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
        }
    }
}
