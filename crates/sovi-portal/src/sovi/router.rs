use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;

use super::domain::{CreateDistrict, IndicatorSubmission, IndicatorValues};
use super::repository::{DistrictRepository, RepositoryError};
use super::service::{PortalService, PortalServiceError};
use super::validation::ValidationFailure;

/// Router builder exposing the portal API over a shared service.
pub fn portal_router<R>(service: Arc<PortalService<R>>) -> Router
where
    R: DistrictRepository + 'static,
{
    Router::new()
        .route("/api/v1/sovi/map-data", get(map_data_handler::<R>))
        .route(
            "/api/v1/sovi/district/:district_id",
            get(district_data_handler::<R>),
        )
        .route(
            "/api/v1/sovi/district/:district_id/latest",
            get(latest_handler::<R>),
        )
        .route(
            "/api/v1/sovi/district/:district_id/trends",
            get(trends_handler::<R>),
        )
        .route(
            "/api/v1/sovi/district/:district_id/compare",
            get(compare_handler::<R>),
        )
        .route("/api/v1/sovi/calculate", post(calculate_handler::<R>))
        .route("/api/v1/sovi/district-data", post(submit_handler::<R>))
        .route(
            "/api/v1/sovi/district-data/:record_id",
            delete(delete_record_handler::<R>),
        )
        .route(
            "/api/v1/sovi/validate-improvement",
            post(validate_improvement_handler::<R>),
        )
        .route("/api/v1/sovi/bulk-update", post(bulk_update_handler::<R>))
        .route(
            "/api/v1/districts",
            get(list_districts_handler::<R>).post(create_district_handler::<R>),
        )
        .route(
            "/api/v1/districts/:district_id",
            get(district_detail_handler::<R>),
        )
        .with_state(service)
}

#[derive(Debug, Deserialize)]
pub(crate) struct HistoryQuery {
    pub(crate) year: Option<i32>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ImprovementRequest {
    #[serde(rename = "currentData")]
    pub(crate) current_data: IndicatorValues,
    #[serde(rename = "newData")]
    pub(crate) new_data: IndicatorValues,
}

pub(crate) async fn map_data_handler<R>(
    State(service): State<Arc<PortalService<R>>>,
) -> Response
where
    R: DistrictRepository + 'static,
{
    match service.map_data() {
        Ok(entries) => (StatusCode::OK, Json(entries)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn district_data_handler<R>(
    State(service): State<Arc<PortalService<R>>>,
    Path(district_id): Path<i64>,
    Query(query): Query<HistoryQuery>,
) -> Response
where
    R: DistrictRepository + 'static,
{
    match service.history(district_id, query.year) {
        Ok(records) => (StatusCode::OK, Json(records)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn latest_handler<R>(
    State(service): State<Arc<PortalService<R>>>,
    Path(district_id): Path<i64>,
) -> Response
where
    R: DistrictRepository + 'static,
{
    match service.latest(district_id) {
        Ok(record) => (StatusCode::OK, Json(record)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn trends_handler<R>(
    State(service): State<Arc<PortalService<R>>>,
    Path(district_id): Path<i64>,
) -> Response
where
    R: DistrictRepository + 'static,
{
    match service.yearly_trends(district_id) {
        Ok(trends) => (StatusCode::OK, Json(trends)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn compare_handler<R>(
    State(service): State<Arc<PortalService<R>>>,
    Path(district_id): Path<i64>,
) -> Response
where
    R: DistrictRepository + 'static,
{
    match service.comparative_analysis(district_id) {
        Ok(analysis) => (StatusCode::OK, Json(analysis)).into_response(),
        Err(error) => error_response(error),
    }
}

/// Dry-run score preview: nothing is persisted and no range validation runs.
pub(crate) async fn calculate_handler<R>(
    State(service): State<Arc<PortalService<R>>>,
    Json(values): Json<IndicatorValues>,
) -> Response
where
    R: DistrictRepository + 'static,
{
    let scores = service.preview(&values);
    (StatusCode::OK, Json(scores)).into_response()
}

pub(crate) async fn submit_handler<R>(
    State(service): State<Arc<PortalService<R>>>,
    Json(submission): Json<IndicatorSubmission>,
) -> Response
where
    R: DistrictRepository + 'static,
{
    match service.submit_indicators(submission) {
        Ok(record) => (StatusCode::CREATED, Json(record)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn delete_record_handler<R>(
    State(service): State<Arc<PortalService<R>>>,
    Path(record_id): Path<u64>,
) -> Response
where
    R: DistrictRepository + 'static,
{
    match service.delete_record(record_id) {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({ "message": "District data deleted successfully" })),
        )
            .into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn validate_improvement_handler<R>(
    State(service): State<Arc<PortalService<R>>>,
    Json(request): Json<ImprovementRequest>,
) -> Response
where
    R: DistrictRepository + 'static,
{
    let validation = service.validate_improvement(&request.current_data, &request.new_data);
    (StatusCode::OK, Json(validation)).into_response()
}

pub(crate) async fn bulk_update_handler<R>(
    State(service): State<Arc<PortalService<R>>>,
    Json(submissions): Json<Vec<IndicatorSubmission>>,
) -> Response
where
    R: DistrictRepository + 'static,
{
    let outcome = service.bulk_submit(submissions);
    (StatusCode::OK, Json(outcome)).into_response()
}

pub(crate) async fn list_districts_handler<R>(
    State(service): State<Arc<PortalService<R>>>,
) -> Response
where
    R: DistrictRepository + 'static,
{
    match service.list_districts() {
        Ok(districts) => (StatusCode::OK, Json(districts)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn create_district_handler<R>(
    State(service): State<Arc<PortalService<R>>>,
    Json(input): Json<CreateDistrict>,
) -> Response
where
    R: DistrictRepository + 'static,
{
    match service.create_district(input) {
        Ok(district) => (StatusCode::CREATED, Json(district)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn district_detail_handler<R>(
    State(service): State<Arc<PortalService<R>>>,
    Path(district_id): Path<i64>,
) -> Response
where
    R: DistrictRepository + 'static,
{
    match service.district_detail(district_id) {
        Ok(detail) => (StatusCode::OK, Json(detail)).into_response(),
        Err(error) => error_response(error),
    }
}

fn error_response(error: PortalServiceError) -> Response {
    match error {
        PortalServiceError::Validation(ValidationFailure { errors }) => {
            let payload = json!({
                "error": "Validation failed",
                "errors": errors,
            });
            (StatusCode::BAD_REQUEST, Json(payload)).into_response()
        }
        PortalServiceError::DistrictNotFound(_)
        | PortalServiceError::NoDataForDistrict(_)
        | PortalServiceError::RecordNotFound(_) => {
            let payload = json!({ "error": error.to_string() });
            (StatusCode::NOT_FOUND, Json(payload)).into_response()
        }
        PortalServiceError::Repository(RepositoryError::Conflict) => {
            let payload = json!({ "error": "record already exists" });
            (StatusCode::CONFLICT, Json(payload)).into_response()
        }
        other => {
            let payload = json!({ "error": other.to_string() });
            (StatusCode::INTERNAL_SERVER_ERROR, Json(payload)).into_response()
        }
    }
}
