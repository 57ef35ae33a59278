use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use serde_json::json;

use super::domain::{CandidateId, PositionId, ResultId};
use super::repository::{ProfileCatalog, ResultLedger};
use super::service::{
    CalculationRequest, MatchingError, MatchingErrorKind, ProfileMatchingService,
};

/// Router builder exposing the calculation and result ledger endpoints.
pub fn matching_router<C, L>(service: Arc<ProfileMatchingService<C, L>>) -> Router
where
    C: ProfileCatalog + 'static,
    L: ResultLedger + 'static,
{
    Router::new()
        .route("/profile-matching/calculate", post(calculate_handler::<C, L>))
        .route("/profile-matching/results", get(list_results_handler::<C, L>))
        .route(
            "/profile-matching/results/:result_id",
            get(result_handler::<C, L>),
        )
        .route(
            "/profile-matching/positions/:position_id/candidates/:candidate_id/scorecard",
            get(scorecard_handler::<C, L>),
        )
        .with_state(service)
}

/// Wire shape of a calculation request; `candidate_ids` may be omitted or null.
#[derive(Debug, Deserialize)]
pub(crate) struct CalculateBody {
    pub(crate) position_id: u64,
    #[serde(default)]
    pub(crate) candidate_ids: Option<Vec<u64>>,
}

impl From<CalculateBody> for CalculationRequest {
    fn from(body: CalculateBody) -> Self {
        CalculationRequest {
            position_id: PositionId(body.position_id),
            candidate_ids: body
                .candidate_ids
                .unwrap_or_default()
                .into_iter()
                .map(CandidateId)
                .collect(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct ResultsQuery {
    #[serde(default)]
    pub(crate) position_id: Option<u64>,
}

pub(crate) async fn calculate_handler<C, L>(
    State(service): State<Arc<ProfileMatchingService<C, L>>>,
    axum::Json(body): axum::Json<CalculateBody>,
) -> Response
where
    C: ProfileCatalog + 'static,
    L: ResultLedger + 'static,
{
    let request = CalculationRequest::from(body);
    match service.calculate(&request) {
        Ok(results) => (StatusCode::OK, axum::Json(results)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn list_results_handler<C, L>(
    State(service): State<Arc<ProfileMatchingService<C, L>>>,
    Query(query): Query<ResultsQuery>,
) -> Response
where
    C: ProfileCatalog + 'static,
    L: ResultLedger + 'static,
{
    match service.list_results(query.position_id.map(PositionId)) {
        Ok(views) => (StatusCode::OK, axum::Json(views)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn result_handler<C, L>(
    State(service): State<Arc<ProfileMatchingService<C, L>>>,
    Path(result_id): Path<u64>,
) -> Response
where
    C: ProfileCatalog + 'static,
    L: ResultLedger + 'static,
{
    match service.get_result(ResultId(result_id)) {
        Ok(view) => (StatusCode::OK, axum::Json(view)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn scorecard_handler<C, L>(
    State(service): State<Arc<ProfileMatchingService<C, L>>>,
    Path((position_id, candidate_id)): Path<(u64, u64)>,
) -> Response
where
    C: ProfileCatalog + 'static,
    L: ResultLedger + 'static,
{
    match service.explain(PositionId(position_id), CandidateId(candidate_id)) {
        Ok(scorecard) => (StatusCode::OK, axum::Json(scorecard)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) fn error_response(error: MatchingError) -> Response {
    let status = match error.kind() {
        MatchingErrorKind::NotFound => StatusCode::NOT_FOUND,
        MatchingErrorKind::InvalidRequest => StatusCode::BAD_REQUEST,
        MatchingErrorKind::StorageFailure => StatusCode::INTERNAL_SERVER_ERROR,
    };

    let payload = json!({
        "error": error.to_string(),
    });
    (status, axum::Json(payload)).into_response()
}
