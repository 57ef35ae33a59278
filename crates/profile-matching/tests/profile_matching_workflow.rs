//! End-to-end checks of the profile matching workflow over the bundled sample dataset.
//!
//! Everything goes through the public service facade and HTTP router, with the catalog
//! loaded the same way the API binary loads it.

mod common {
    use std::sync::Arc;

    use profile_matching::dataset;
    use profile_matching::matching::{
        InMemoryCatalog, InMemoryLedger, MatchingConfig, ProfileMatchingService,
    };

    pub(super) type SampleService = ProfileMatchingService<InMemoryCatalog, InMemoryLedger>;

    pub(super) fn sample_service() -> (Arc<SampleService>, Arc<InMemoryLedger>) {
        let catalog = dataset::load_sample().expect("sample dataset loads");
        let ledger = Arc::new(InMemoryLedger::default());
        let service = ProfileMatchingService::new(
            Arc::new(catalog),
            ledger.clone(),
            MatchingConfig::default(),
        );
        (Arc::new(service), ledger)
    }

    pub(super) fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-9,
            "expected {expected}, got {actual}"
        );
    }
}

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use tower::ServiceExt;

use common::{assert_close, sample_service};
use profile_matching::matching::{
    matching_router, CalculationRequest, CandidateId, MatchingErrorKind, PositionId,
};

#[test]
fn sample_position_produces_expected_factors() {
    let (service, ledger) = sample_service();

    let results = service
        .calculate(&CalculationRequest::for_all(PositionId(1)))
        .expect("calculation succeeds");

    assert_eq!(results.len(), 3);
    assert_eq!(ledger.len(), 3);

    let by_candidate = |id: u64| {
        results
            .iter()
            .find(|row| row.candidate_id == CandidateId(id))
            .expect("candidate scored")
    };

    let budi = by_candidate(1);
    assert_close(budi.core_factor, 3.8);
    assert_close(budi.secondary_factor, 11.5 / 3.0);
    assert_close(budi.total_score, 0.6 * 3.8 + 0.4 * (11.5 / 3.0));

    let siti = by_candidate(2);
    assert_close(siti.core_factor, 4.3);
    assert_close(siti.secondary_factor, 4.0);
    assert_close(siti.total_score, 4.18);

    let ahmad = by_candidate(3);
    assert_close(ahmad.core_factor, 4.6);
    assert_close(ahmad.secondary_factor, 11.0 / 3.0);
    assert_close(ahmad.total_score, 0.6 * 4.6 + 0.4 * (11.0 / 3.0));
}

#[test]
fn sample_ranking_orders_candidates_by_total() {
    let (service, _) = sample_service();
    service
        .calculate(&CalculationRequest::for_all(PositionId(1)))
        .expect("calculation succeeds");

    let views = service
        .list_results(Some(PositionId(1)))
        .expect("listing succeeds");

    let order: Vec<(usize, u64)> = views
        .iter()
        .map(|view| (view.rank.expect("ranked"), view.result.candidate_id.0))
        .collect();
    assert_eq!(order, vec![(1, 3), (2, 2), (3, 1)]);
    assert_eq!(
        views[0].candidate.as_ref().map(|c| c.national_id.as_str()),
        Some("TK003")
    );
}

#[test]
fn positions_without_targets_are_rejected() {
    let (service, ledger) = sample_service();

    let error = service
        .calculate(&CalculationRequest::for_all(PositionId(2)))
        .expect_err("position 2 has no target profile");

    assert_eq!(error.kind(), MatchingErrorKind::InvalidRequest);
    assert!(ledger.is_empty());
}

#[test]
fn scorecard_accounts_for_every_target() {
    let (service, _) = sample_service();

    let card = service
        .explain(PositionId(1), CandidateId(2))
        .expect("scorecard");

    assert_eq!(card.components.len(), 8);
    assert!(card.skipped.is_empty());
    assert_close(card.total_score, 4.18);
}

#[tokio::test]
async fn http_calculation_then_ranked_listing() {
    let (service, _) = sample_service();
    let app = matching_router(service);

    let calculate = Request::builder()
        .method("POST")
        .uri("/profile-matching/calculate")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(r#"{"position_id":1,"candidate_ids":[1,3]}"#))
        .expect("request");
    let response = app.clone().oneshot(calculate).await.expect("response");
    assert_eq!(response.status(), StatusCode::OK);

    let listing = Request::builder()
        .uri("/profile-matching/results?position_id=1")
        .body(Body::empty())
        .expect("request");
    let response = app.oneshot(listing).await.expect("response");
    assert_eq!(response.status(), StatusCode::OK);

    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("body");
    let payload: serde_json::Value = serde_json::from_slice(&body).expect("json");
    let rows = payload.as_array().expect("array");
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0]["candidate_id"], 3);
    assert_eq!(rows[0]["rank"], 1);
    assert_eq!(rows[1]["candidate_id"], 1);
    assert_eq!(rows[1]["position"]["name"], "Production Operator");
}
