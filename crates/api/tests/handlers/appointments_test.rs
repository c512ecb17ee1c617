use axum::http::StatusCode;
use axum::response::IntoResponse;
use mockall::predicate;
use pretty_assertions::assert_eq;
use uuid::Uuid;

use guidance_api::handlers::appointments::{appointment_response, appointment_responses};
use guidance_api::middleware::error_handling::AppError;
use guidance_core::errors::GuidanceError;
use guidance_core::models::appointment::{
    self, AppointmentStatus, ApproveAppointmentResponse, AppointmentResponse,
};
use guidance_core::models::slot::SlotKey;
use guidance_db::booking::ApprovalOutcome;

use crate::test_utils::{appointment_row, test_date, TestContext};

// Test wrappers that drive the same orchestration as the handlers against
// the mocked booking engine, so the flow can run without a database.
async fn approve_wrapper(
    ctx: &mut TestContext,
    id: Uuid,
) -> Result<ApproveAppointmentResponse, AppError> {
    let outcome = ctx.booking.approve_appointment(id).await?;

    Ok(ApproveAppointmentResponse {
        appointment: appointment_response(outcome.appointment)?,
        auto_rejected: appointment_responses(outcome.auto_rejected)?,
    })
}

async fn reject_wrapper(
    ctx: &mut TestContext,
    id: Uuid,
    reason: &str,
) -> Result<AppointmentResponse, AppError> {
    let reason = appointment::normalize_rejection_reason(reason)?;
    // Static reference for mockall
    let reason_static: &'static str = Box::leak(reason.into_boxed_str());

    let updated = ctx.booking.reject_appointment(id, reason_static).await?;
    Ok(appointment_response(updated)?)
}

async fn get_wrapper(ctx: &mut TestContext, id: Uuid) -> Result<AppointmentResponse, AppError> {
    let row = ctx
        .appointment_repo
        .get_appointment_by_id(id)
        .await
        .map_err(GuidanceError::Database)?
        .ok_or_else(|| GuidanceError::NotFound(format!("appointment {id} not found")))?;

    Ok(appointment_response(row)?)
}

#[tokio::test]
async fn test_approve_that_fills_slot_cascades_remaining_pending() {
    let mut ctx = TestContext::new();
    let appt1 = Uuid::new_v4();
    let appt2 = Uuid::new_v4();
    let key = SlotKey::from_parts(test_date(), "9:00 AM").unwrap();

    // Capacity-one slot: approving appt1 fills it, so the engine reports
    // appt2 auto-rejected with the system reason naming the slot.
    let reason = appointment::capacity_rejection_reason(&key);
    ctx.booking
        .expect_approve_appointment()
        .with(predicate::eq(appt1))
        .times(1)
        .returning(move |_| {
            let mut approved = appointment_row(appt1, "approved", test_date(), "9:00 AM");
            approved.rejection_reason = None;

            let mut rejected = appointment_row(appt2, "rejected", test_date(), "9:00 AM");
            rejected.rejection_reason =
                Some(appointment::capacity_rejection_reason(
                    &SlotKey::from_parts(test_date(), "9:00 AM").unwrap(),
                ));

            Ok(ApprovalOutcome {
                appointment: approved,
                auto_rejected: vec![rejected],
            })
        });

    let response = approve_wrapper(&mut ctx, appt1).await.unwrap();

    assert_eq!(response.appointment.status, AppointmentStatus::Approved);
    assert_eq!(response.auto_rejected.len(), 1);
    assert_eq!(response.auto_rejected[0].id, appt2);
    assert_eq!(
        response.auto_rejected[0].status,
        AppointmentStatus::Rejected
    );
    let recorded = response.auto_rejected[0]
        .rejection_reason
        .as_deref()
        .unwrap();
    assert_eq!(recorded, reason);
    assert!(recorded.contains("9:00 AM"));
    assert!(recorded.contains("2025-06-10"));
}

#[tokio::test]
async fn test_approve_after_auto_rejection_is_a_state_error() {
    let mut ctx = TestContext::new();
    let appt2 = Uuid::new_v4();

    // appt2 was auto-rejected by the cascade above; a later approval
    // attempt fails the transition check.
    ctx.booking
        .expect_approve_appointment()
        .with(predicate::eq(appt2))
        .returning(|_| {
            Err(GuidanceError::InvalidStateTransition(
                "cannot move a rejected appointment to approved".to_string(),
            ))
        });

    let err = approve_wrapper(&mut ctx, appt2).await.unwrap_err();

    assert!(matches!(&err.0, GuidanceError::InvalidStateTransition(_)));
    assert_eq!(err.into_response().status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_approve_full_slot_maps_to_conflict() {
    let mut ctx = TestContext::new();
    let id = Uuid::new_v4();

    ctx.booking
        .expect_approve_appointment()
        .returning(|_| Err(GuidanceError::SlotFull("slot is full".to_string())));

    let err = approve_wrapper(&mut ctx, id).await.unwrap_err();

    assert_eq!(err.into_response().status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_reject_requires_a_reason() {
    let mut ctx = TestContext::new();
    let id = Uuid::new_v4();

    // The engine must never be reached with a blank reason
    ctx.booking.expect_reject_appointment().times(0);

    for blank in ["", "   ", "\t"] {
        let err = reject_wrapper(&mut ctx, id, blank).await.unwrap_err();
        assert!(matches!(err.0, GuidanceError::InvalidInput(_)));
    }
}

#[tokio::test]
async fn test_reject_passes_trimmed_reason_to_engine() {
    let mut ctx = TestContext::new();
    let id = Uuid::new_v4();

    ctx.booking
        .expect_reject_appointment()
        .with(predicate::eq(id), predicate::eq("schedule conflict"))
        .times(1)
        .returning(move |id, reason| {
            let mut row = appointment_row(id, "rejected", test_date(), "9:00 AM");
            row.rejection_reason = Some(reason.to_string());
            Ok(row)
        });

    let response = reject_wrapper(&mut ctx, id, "  schedule conflict  ")
        .await
        .unwrap();

    assert_eq!(response.status, AppointmentStatus::Rejected);
    assert_eq!(response.rejection_reason.as_deref(), Some("schedule conflict"));
}

#[tokio::test]
async fn test_get_appointment_not_found() {
    let mut ctx = TestContext::new();
    let id = Uuid::new_v4();

    ctx.appointment_repo
        .expect_get_appointment_by_id()
        .with(predicate::eq(id))
        .returning(|_| Ok(None));

    let err = get_wrapper(&mut ctx, id).await.unwrap_err();

    assert!(matches!(&err.0, GuidanceError::NotFound(_)));
    assert_eq!(err.into_response().status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_unknown_stored_status_is_a_data_integrity_fault() {
    let row = appointment_row(Uuid::new_v4(), "cancelled", test_date(), "9:00 AM");

    let err = appointment_response(row).unwrap_err();

    assert!(matches!(err, GuidanceError::DataIntegrity(_)));
}
