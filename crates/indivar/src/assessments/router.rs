use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use serde_json::json;

use super::inventory::{InventoryKind, Question, ResponseSet};
use super::repository::{ProgressRepository, RepositoryError, ResultId, ResultRepository};
use super::service::{AssessmentService, AssessmentServiceError};

/// Router builder exposing the assessment endpoints over a shared service.
pub fn assessment_router<R, P>(service: Arc<AssessmentService<R, P>>) -> Router
where
    R: ResultRepository + 'static,
    P: ProgressRepository + 'static,
{
    Router::new()
        .route(
            "/api/v1/assessments/:inventory/questions",
            get(questions_handler::<R, P>),
        )
        .route(
            "/api/v1/assessments/:inventory/progress",
            get(fetch_progress_handler::<R, P>)
                .put(save_progress_handler::<R, P>)
                .delete(clear_progress_handler::<R, P>),
        )
        .route(
            "/api/v1/assessments/:inventory/submissions",
            post(submit_handler::<R, P>),
        )
        .route("/api/v1/results", get(list_results_handler::<R, P>))
        .route("/api/v1/results/stats/summary", get(stats_handler::<R, P>))
        .route(
            "/api/v1/results/export.csv",
            get(export_results_handler::<R, P>),
        )
        .route(
            "/api/v1/results/:result_id",
            get(fetch_result_handler::<R, P>).delete(delete_result_handler::<R, P>),
        )
        .with_state(service)
}

#[derive(Debug, Deserialize)]
pub(crate) struct SaveProgressRequest {
    pub(crate) responses: ResponseSet,
    #[serde(default)]
    pub(crate) current_item: usize,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SubmitRequest {
    pub(crate) responses: ResponseSet,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ResultsQuery {
    pub(crate) test_type: Option<String>,
}

#[derive(Debug, serde::Serialize)]
struct QuestionBankView<'a> {
    test_id: &'a str,
    title: &'a str,
    total_questions: usize,
    items: &'a [Question],
}

fn error_response(error: AssessmentServiceError) -> Response {
    let status = match &error {
        AssessmentServiceError::UnknownInventory(_) => StatusCode::NOT_FOUND,
        AssessmentServiceError::Incomplete { .. } | AssessmentServiceError::Scoring(_) => {
            StatusCode::UNPROCESSABLE_ENTITY
        }
        AssessmentServiceError::Repository(RepositoryError::NotFound) => StatusCode::NOT_FOUND,
        AssessmentServiceError::Repository(RepositoryError::Conflict) => StatusCode::CONFLICT,
        AssessmentServiceError::Repository(RepositoryError::Unavailable(_))
        | AssessmentServiceError::Export(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };

    let payload = json!({ "error": error.to_string() });
    (status, axum::Json(payload)).into_response()
}

fn parse_filter(query: &ResultsQuery) -> Result<Option<InventoryKind>, Response> {
    match query.test_type.as_deref() {
        None => Ok(None),
        Some(slug) => match InventoryKind::from_slug(slug) {
            Some(kind) => Ok(Some(kind)),
            None => {
                let payload = json!({ "error": format!("unknown inventory '{slug}'") });
                Err((StatusCode::UNPROCESSABLE_ENTITY, axum::Json(payload)).into_response())
            }
        },
    }
}

pub(crate) async fn questions_handler<R, P>(
    State(service): State<Arc<AssessmentService<R, P>>>,
    Path(inventory): Path<String>,
) -> Response
where
    R: ResultRepository + 'static,
    P: ProgressRepository + 'static,
{
    match service.bank(&inventory) {
        Ok(bank) => {
            let view = QuestionBankView {
                test_id: bank.inventory().slug(),
                title: bank.inventory().title(),
                total_questions: bank.len(),
                items: bank.questions(),
            };
            (StatusCode::OK, axum::Json(view)).into_response()
        }
        Err(error) => error_response(error),
    }
}

pub(crate) async fn fetch_progress_handler<R, P>(
    State(service): State<Arc<AssessmentService<R, P>>>,
    Path(inventory): Path<String>,
) -> Response
where
    R: ResultRepository + 'static,
    P: ProgressRepository + 'static,
{
    match service.progress(&inventory) {
        Ok(Some(progress)) => (StatusCode::OK, axum::Json(progress)).into_response(),
        Ok(None) => {
            let payload = json!({ "error": "no progress found for this test" });
            (StatusCode::NOT_FOUND, axum::Json(payload)).into_response()
        }
        Err(error) => error_response(error),
    }
}

pub(crate) async fn save_progress_handler<R, P>(
    State(service): State<Arc<AssessmentService<R, P>>>,
    Path(inventory): Path<String>,
    axum::Json(request): axum::Json<SaveProgressRequest>,
) -> Response
where
    R: ResultRepository + 'static,
    P: ProgressRepository + 'static,
{
    match service.save_progress(&inventory, request.responses, request.current_item) {
        Ok(progress) => (StatusCode::OK, axum::Json(progress)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn clear_progress_handler<R, P>(
    State(service): State<Arc<AssessmentService<R, P>>>,
    Path(inventory): Path<String>,
) -> Response
where
    R: ResultRepository + 'static,
    P: ProgressRepository + 'static,
{
    match service.clear_progress(&inventory) {
        Ok(true) => {
            let payload = json!({ "message": "test progress deleted" });
            (StatusCode::OK, axum::Json(payload)).into_response()
        }
        Ok(false) => {
            let payload = json!({ "error": "no progress found for this test" });
            (StatusCode::NOT_FOUND, axum::Json(payload)).into_response()
        }
        Err(error) => error_response(error),
    }
}

pub(crate) async fn submit_handler<R, P>(
    State(service): State<Arc<AssessmentService<R, P>>>,
    Path(inventory): Path<String>,
    axum::Json(request): axum::Json<SubmitRequest>,
) -> Response
where
    R: ResultRepository + 'static,
    P: ProgressRepository + 'static,
{
    match service.submit(&inventory, request.responses) {
        Ok(record) => (StatusCode::CREATED, axum::Json(record)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn list_results_handler<R, P>(
    State(service): State<Arc<AssessmentService<R, P>>>,
    Query(query): Query<ResultsQuery>,
) -> Response
where
    R: ResultRepository + 'static,
    P: ProgressRepository + 'static,
{
    let filter = match parse_filter(&query) {
        Ok(filter) => filter,
        Err(response) => return response,
    };

    match service.history(filter) {
        Ok(records) => {
            let views: Vec<_> = records
                .iter()
                .map(|record| record.summary_view())
                .collect();
            (StatusCode::OK, axum::Json(views)).into_response()
        }
        Err(error) => error_response(error),
    }
}

pub(crate) async fn stats_handler<R, P>(
    State(service): State<Arc<AssessmentService<R, P>>>,
) -> Response
where
    R: ResultRepository + 'static,
    P: ProgressRepository + 'static,
{
    match service.stats() {
        Ok(stats) => (StatusCode::OK, axum::Json(stats)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn export_results_handler<R, P>(
    State(service): State<Arc<AssessmentService<R, P>>>,
    Query(query): Query<ResultsQuery>,
) -> Response
where
    R: ResultRepository + 'static,
    P: ProgressRepository + 'static,
{
    let filter = match parse_filter(&query) {
        Ok(filter) => filter,
        Err(response) => return response,
    };

    match service.export_csv(filter) {
        Ok(csv) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, mime::TEXT_CSV.as_ref())],
            csv,
        )
            .into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn fetch_result_handler<R, P>(
    State(service): State<Arc<AssessmentService<R, P>>>,
    Path(result_id): Path<String>,
) -> Response
where
    R: ResultRepository + 'static,
    P: ProgressRepository + 'static,
{
    match service.result(&ResultId(result_id)) {
        Ok(record) => (StatusCode::OK, axum::Json(record)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn delete_result_handler<R, P>(
    State(service): State<Arc<AssessmentService<R, P>>>,
    Path(result_id): Path<String>,
) -> Response
where
    R: ResultRepository + 'static,
    P: ProgressRepository + 'static,
{
    let id = ResultId(result_id);
    match service.delete_result(&id) {
        Ok(()) => {
            let payload = json!({ "message": "test result deleted", "result_id": id.0 });
            (StatusCode::OK, axum::Json(payload)).into_response()
        }
        Err(error) => error_response(error),
    }
}
