use chrono::NaiveDate;
use pretty_assertions::assert_eq;
use serde_json::{json, to_value};

use guidance_api::handlers::slots::{slot_response, sort_slot_rows};
use guidance_core::clock::Clock;
use guidance_core::errors::GuidanceError;
use guidance_core::models::slot::{
    BulkCreateSlotsResponse, SkipReason, SkippedSlotTime, SlotResponse,
};
use guidance_db::models::DbSlot;

use crate::test_utils::{slot_row, test_date, TestContext};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[test]
fn test_sort_orders_by_date_then_wall_clock_time() {
    let mut rows = vec![
        slot_row(date(2025, 6, 11), "9:00 AM", 3, 0, true),
        slot_row(date(2025, 6, 10), "1:00 PM", 3, 0, true),
        slot_row(date(2025, 6, 10), "9:00 AM", 3, 0, true),
        slot_row(date(2025, 6, 10), "10:30 AM", 3, 0, true),
    ];

    sort_slot_rows(&mut rows);

    let order: Vec<(NaiveDate, String)> = rows
        .into_iter()
        .map(|row| (row.slot_date, row.time_label))
        .collect();
    assert_eq!(
        order,
        vec![
            (date(2025, 6, 10), "9:00 AM".to_string()),
            (date(2025, 6, 10), "10:30 AM".to_string()),
            (date(2025, 6, 10), "1:00 PM".to_string()),
            (date(2025, 6, 11), "9:00 AM".to_string()),
        ]
    );
}

#[test]
fn test_sort_puts_unparsable_labels_last() {
    let mut rows = vec![
        slot_row(test_date(), "whenever", 3, 0, true),
        slot_row(test_date(), "4:30 PM", 3, 0, true),
    ];

    sort_slot_rows(&mut rows);

    assert_eq!(rows[0].time_label, "4:30 PM");
    assert_eq!(rows[1].time_label, "whenever");
}

#[test]
fn test_slot_response_mapping() {
    let row = slot_row(test_date(), "9:00 AM", 3, 2, true);
    let id = row.id;
    let created_at = row.created_at;

    let response = slot_response(row);

    assert_eq!(response.id, id);
    assert_eq!(response.date, test_date());
    assert_eq!(response.time, "9:00 AM");
    assert_eq!(response.max_capacity, 3);
    assert_eq!(response.current_count, 2);
    assert!(response.is_active);
    assert_eq!(response.created_at, created_at);
}

#[test]
fn test_bulk_response_reports_skips_with_reasons() {
    let created = slot_response(slot_row(test_date(), "2:00 PM", 3, 0, true));
    let response = BulkCreateSlotsResponse {
        created: vec![created],
        skipped: vec![
            SkippedSlotTime {
                time: "9:00 AM".to_string(),
                reason: SkipReason::AlreadyExists,
            },
            SkippedSlotTime {
                time: "8:00 AM".to_string(),
                reason: SkipReason::TimePassed,
            },
        ],
    };

    let value = to_value(&response).unwrap();

    assert_eq!(value["created"].as_array().unwrap().len(), 1);
    assert_eq!(
        value["skipped"],
        json!([
            { "time": "9:00 AM", "reason": "already exists" },
            { "time": "8:00 AM", "reason": "time has passed" },
        ])
    );
}

#[test]
fn test_slot_response_serializes_date_as_wire_format() {
    let response: SlotResponse = slot_response(slot_row(test_date(), "9:00 AM", 3, 0, true));

    let value = to_value(&response).unwrap();

    assert_eq!(value["date"], "2025-06-10");
    assert_eq!(value["time"], "9:00 AM");
}

// The expiry sweep runs against the engine before a listing is answered;
// this drives the mocked sweep + read sequence the listing handlers follow.
#[tokio::test]
async fn test_listing_runs_expiry_before_reading() {
    let mut ctx = TestContext::new();
    let today = ctx.clock.today();
    let local_time_now = ctx.clock.now_local().time();

    ctx.booking
        .expect_expire_due_slots()
        .times(1)
        .returning(|_, _| Ok(1));
    ctx.slot_repo
        .expect_list_active_from()
        .times(1)
        .returning(|_| Ok(vec![]));

    let retired = ctx
        .booking
        .expire_due_slots(today, local_time_now)
        .await
        .unwrap();
    let rows: Vec<DbSlot> = ctx.slot_repo.list_active_from(today).await.unwrap();

    assert_eq!(retired, 1);
    assert!(rows.is_empty());
}

#[test]
fn test_stored_blank_label_flags_integrity() {
    let mut row = slot_row(test_date(), "9:00 AM", 3, 0, true);
    row.time_label = "  ".to_string();

    let err = row.key().unwrap_err();
    assert!(matches!(err, GuidanceError::InvalidInput(_)));
}
