use axum::http::StatusCode;
use axum::response::IntoResponse;
use rstest::rstest;

use guidance_api::middleware::error_handling::AppError;
use guidance_core::errors::GuidanceError;

fn invalid_input() -> GuidanceError {
    GuidanceError::InvalidInput("bad date".to_string())
}

fn not_found() -> GuidanceError {
    GuidanceError::NotFound("missing".to_string())
}

fn conflict() -> GuidanceError {
    GuidanceError::Conflict("duplicate slot".to_string())
}

fn slot_unavailable() -> GuidanceError {
    GuidanceError::SlotUnavailable("not open".to_string())
}

fn slot_full() -> GuidanceError {
    GuidanceError::SlotFull("at capacity".to_string())
}

fn invalid_transition() -> GuidanceError {
    GuidanceError::InvalidStateTransition("already rejected".to_string())
}

fn data_integrity() -> GuidanceError {
    GuidanceError::DataIntegrity("unknown status".to_string())
}

fn database() -> GuidanceError {
    GuidanceError::Database(eyre::eyre!("connection refused"))
}

#[rstest]
#[case(invalid_input(), StatusCode::BAD_REQUEST)]
#[case(not_found(), StatusCode::NOT_FOUND)]
#[case(conflict(), StatusCode::CONFLICT)]
#[case(slot_unavailable(), StatusCode::CONFLICT)]
#[case(slot_full(), StatusCode::CONFLICT)]
#[case(invalid_transition(), StatusCode::CONFLICT)]
#[case(data_integrity(), StatusCode::INTERNAL_SERVER_ERROR)]
#[case(database(), StatusCode::INTERNAL_SERVER_ERROR)]
fn test_error_status_mapping(#[case] err: GuidanceError, #[case] expected: StatusCode) {
    let response = AppError(err).into_response();
    assert_eq!(response.status(), expected);
}

#[tokio::test]
async fn test_error_body_carries_the_message() {
    let response = AppError(GuidanceError::SlotFull(
        "slot 2025-06-10 9:00 AM already has 1 approved appointment(s)".to_string(),
    ))
    .into_response();

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();

    assert_eq!(
        body["error"],
        "Slot full: slot 2025-06-10 9:00 AM already has 1 approved appointment(s)"
    );
}

#[test]
fn test_from_conversions() {
    let from_domain: AppError = GuidanceError::NotFound("missing".to_string()).into();
    assert!(matches!(from_domain.0, GuidanceError::NotFound(_)));

    let from_report: AppError = eyre::eyre!("io failure").into();
    assert!(matches!(from_report.0, GuidanceError::Database(_)));
}
