//! # Booking Engine
//!
//! This module contains every write path that touches slots and
//! appointments together: admission of new appointments, approval with its
//! cascade, rejection, slot retirement, staff completion with pass
//! issuance, the lazy expiry sweep, and cache reconciliation.
//!
//! ## Locking discipline
//!
//! Appointments join slots on the (slot_date, time_label) natural key, and
//! the capacity contract (approved appointments never exceed a slot's
//! capacity) has to hold under concurrent approvals. Every unit of work
//! here therefore:
//!
//! 1. Opens one transaction.
//! 2. Takes `SELECT ... FOR UPDATE` on the slot row for the key, which
//!    serializes all writers of the same slot while letting unrelated
//!    slots proceed.
//! 3. Recomputes the approved count from live appointment rows; the
//!    cached `current_count` is advisory and never consulted for a
//!    decision.
//! 4. Applies the status change through a conditional `UPDATE ... WHERE
//!    status = ...`, so a row that moved since it was read fails the
//!    transition instead of being clobbered.
//! 5. Refreshes the cached count and commits. Cascades (auto-rejection on
//!    fill, completion on retirement) ride in the same transaction as
//!    their trigger.
//!
//! Retirement is idempotent: the expiry sweep and a manual deactivation
//! both re-check `is_active` under the row lock, so deactivating an
//! already-inactive slot is a no-op.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use sqlx::{Pool, Postgres, Transaction};
use tracing::{info, warn};
use uuid::Uuid;

use guidance_core::errors::{GuidanceError, GuidanceResult};
use guidance_core::models::appointment::{self, AppointmentStatus};
use guidance_core::models::slot::{self, SkipReason, SkippedSlotTime, SlotKey};

use crate::models::{DbAppointment, DbGuidancePass, DbSlot};
use crate::repositories;

/// Fields a student submits when requesting an appointment.
#[derive(Debug, Clone)]
pub struct NewAppointment {
    pub student_id: String,
    pub student_name: String,
    pub program_section: String,
    pub reason: String,
    pub key: SlotKey,
}

#[derive(Debug, Clone)]
pub struct ApprovalOutcome {
    pub appointment: DbAppointment,
    /// Pending appointments for the same slot rejected because this
    /// approval filled it.
    pub auto_rejected: Vec<DbAppointment>,
}

#[derive(Debug, Clone)]
pub struct ToggleOutcome {
    pub slot: DbSlot,
    /// Approved appointments completed by a deactivation; empty on
    /// activation.
    pub completed: Vec<DbAppointment>,
}

#[derive(Debug, Clone)]
pub struct CompletionOutcome {
    pub appointment: DbAppointment,
    pub slot: DbSlot,
    pub pass: DbGuidancePass,
}

fn db_err(err: sqlx::Error) -> GuidanceError {
    GuidanceError::Database(err.into())
}

fn map_slot_write_err(err: sqlx::Error, key: &SlotKey) -> GuidanceError {
    match &err {
        sqlx::Error::Database(db) if db.is_unique_violation() => {
            GuidanceError::Conflict(format!("a slot for {key} already exists"))
        }
        _ => db_err(err),
    }
}

/// Locks the slot row for a key, serializing writers of the same slot.
async fn lock_slot(
    tx: &mut Transaction<'_, Postgres>,
    key: &SlotKey,
) -> GuidanceResult<Option<DbSlot>> {
    sqlx::query_as::<_, DbSlot>(
        r#"
        SELECT id, slot_date, time_label, max_capacity, current_count, is_active,
               created_at, updated_at
        FROM slots
        WHERE slot_date = $1 AND time_label = $2
        FOR UPDATE
        "#,
    )
    .bind(key.date())
    .bind(key.time_label())
    .fetch_optional(&mut **tx)
    .await
    .map_err(db_err)
}

async fn count_approved(tx: &mut Transaction<'_, Postgres>, key: &SlotKey) -> GuidanceResult<i64> {
    sqlx::query_scalar::<_, i64>(
        r#"
        SELECT COUNT(*)
        FROM appointments
        WHERE slot_date = $1 AND time_label = $2 AND status = $3
        "#,
    )
    .bind(key.date())
    .bind(key.time_label())
    .bind(AppointmentStatus::Approved.as_str())
    .fetch_one(&mut **tx)
    .await
    .map_err(db_err)
}

/// Rewrites the advisory cached count from live {pending, approved} rows.
async fn refresh_cached_count(
    tx: &mut Transaction<'_, Postgres>,
    key: &SlotKey,
    now: DateTime<Utc>,
) -> GuidanceResult<()> {
    let result = sqlx::query(
        r#"
        UPDATE slots
        SET current_count = (
                SELECT COUNT(*)::INTEGER
                FROM appointments
                WHERE slot_date = $1 AND time_label = $2 AND status IN ($3, $4)
            ),
            updated_at = $5
        WHERE slot_date = $1 AND time_label = $2
        "#,
    )
    .bind(key.date())
    .bind(key.time_label())
    .bind(AppointmentStatus::Pending.as_str())
    .bind(AppointmentStatus::Approved.as_str())
    .bind(now)
    .execute(&mut **tx)
    .await
    .map_err(db_err)?;

    if result.rows_affected() == 0 {
        warn!(%key, "no slot row for appointment key while refreshing count");
    }
    Ok(())
}

pub async fn create_slot(
    pool: &Pool<Postgres>,
    key: &SlotKey,
    max_capacity: i32,
) -> GuidanceResult<DbSlot> {
    let existing = repositories::slot::get_slot_by_key(pool, key.date(), key.time_label())
        .await
        .map_err(GuidanceError::Database)?;
    if existing.is_some() {
        return Err(GuidanceError::Conflict(format!(
            "a slot for {key} already exists"
        )));
    }

    let now = Utc::now();
    let slot = sqlx::query_as::<_, DbSlot>(
        r#"
        INSERT INTO slots (id, slot_date, time_label, max_capacity, current_count, is_active,
                           created_at, updated_at)
        VALUES ($1, $2, $3, $4, 0, TRUE, $5, $5)
        RETURNING id, slot_date, time_label, max_capacity, current_count, is_active,
                  created_at, updated_at
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(key.date())
    .bind(key.time_label())
    .bind(max_capacity)
    .bind(now)
    .fetch_one(pool)
    .await
    .map_err(|err| map_slot_write_err(err, key))?;

    Ok(slot)
}

/// Creates slots for one date, validating each requested time on its own.
/// A time that is blank, already offered, or already in the past is
/// skipped with a reason; the rest are still created.
pub async fn create_slots_bulk(
    pool: &Pool<Postgres>,
    date: NaiveDate,
    times: &[String],
    max_capacity: i32,
    today: NaiveDate,
    local_time_now: NaiveTime,
) -> GuidanceResult<(Vec<DbSlot>, Vec<SkippedSlotTime>)> {
    let mut created = Vec::new();
    let mut skipped = Vec::new();

    for time in times {
        let key = match SlotKey::from_parts(date, time) {
            Ok(key) => key,
            Err(_) => {
                skipped.push(SkippedSlotTime {
                    time: time.clone(),
                    reason: SkipReason::InvalidLabel,
                });
                continue;
            }
        };

        if slot::validate_not_past(&key, today, local_time_now).is_err() {
            skipped.push(SkippedSlotTime {
                time: time.clone(),
                reason: SkipReason::TimePassed,
            });
            continue;
        }

        match create_slot(pool, &key, max_capacity).await {
            Ok(slot) => created.push(slot),
            Err(GuidanceError::Conflict(_)) => {
                skipped.push(SkippedSlotTime {
                    time: time.clone(),
                    reason: SkipReason::AlreadyExists,
                });
            }
            Err(err) => return Err(err),
        }
    }

    Ok((created, skipped))
}

/// Full overwrite of a slot's date, time label and capacity. Deliberately
/// skips past-date validation; staff use this to correct existing rows.
pub async fn update_slot(
    pool: &Pool<Postgres>,
    id: Uuid,
    key: &SlotKey,
    max_capacity: i32,
) -> GuidanceResult<DbSlot> {
    let now = Utc::now();
    let slot = sqlx::query_as::<_, DbSlot>(
        r#"
        UPDATE slots
        SET slot_date = $2, time_label = $3, max_capacity = $4, updated_at = $5
        WHERE id = $1
        RETURNING id, slot_date, time_label, max_capacity, current_count, is_active,
                  created_at, updated_at
        "#,
    )
    .bind(id)
    .bind(key.date())
    .bind(key.time_label())
    .bind(max_capacity)
    .bind(now)
    .fetch_optional(pool)
    .await
    .map_err(|err| map_slot_write_err(err, key))?
    .ok_or_else(|| GuidanceError::NotFound(format!("slot {id} not found")))?;

    Ok(slot)
}

/// Marks a locked, active slot inactive and completes its approved
/// appointments. The caller holds the row lock and commits.
async fn retire_locked_slot(
    tx: &mut Transaction<'_, Postgres>,
    slot: &DbSlot,
    now: DateTime<Utc>,
) -> GuidanceResult<(DbSlot, Vec<DbAppointment>)> {
    let key = slot.key()?;

    let retired = sqlx::query_as::<_, DbSlot>(
        r#"
        UPDATE slots
        SET is_active = FALSE, updated_at = $2
        WHERE id = $1
        RETURNING id, slot_date, time_label, max_capacity, current_count, is_active,
                  created_at, updated_at
        "#,
    )
    .bind(slot.id)
    .bind(now)
    .fetch_one(&mut **tx)
    .await
    .map_err(db_err)?;

    // The session window closed: whoever held an approved appointment is
    // deemed to have had their session.
    let completed = sqlx::query_as::<_, DbAppointment>(
        r#"
        UPDATE appointments
        SET status = $3, updated_at = $4
        WHERE slot_date = $1 AND time_label = $2 AND status = $5
        RETURNING id, student_id, student_name, program_section, reason, slot_date, time_label,
                  status, rejection_reason, created_at, updated_at
        "#,
    )
    .bind(key.date())
    .bind(key.time_label())
    .bind(AppointmentStatus::Completed.as_str())
    .bind(now)
    .bind(AppointmentStatus::Approved.as_str())
    .fetch_all(&mut **tx)
    .await
    .map_err(db_err)?;

    refresh_cached_count(tx, &key, now).await?;

    Ok((retired, completed))
}

/// Flips a slot's active flag. Deactivation retires the slot: its approved
/// appointments are completed in the same transaction.
pub async fn toggle_slot(pool: &Pool<Postgres>, id: Uuid) -> GuidanceResult<ToggleOutcome> {
    let mut tx = pool.begin().await.map_err(db_err)?;

    let slot = sqlx::query_as::<_, DbSlot>(
        r#"
        SELECT id, slot_date, time_label, max_capacity, current_count, is_active,
               created_at, updated_at
        FROM slots
        WHERE id = $1
        FOR UPDATE
        "#,
    )
    .bind(id)
    .fetch_optional(&mut *tx)
    .await
    .map_err(db_err)?
    .ok_or_else(|| GuidanceError::NotFound(format!("slot {id} not found")))?;

    let now = Utc::now();
    let outcome = if slot.is_active {
        let (retired, completed) = retire_locked_slot(&mut tx, &slot, now).await?;
        ToggleOutcome {
            slot: retired,
            completed,
        }
    } else {
        let activated = sqlx::query_as::<_, DbSlot>(
            r#"
            UPDATE slots
            SET is_active = TRUE, updated_at = $2
            WHERE id = $1
            RETURNING id, slot_date, time_label, max_capacity, current_count, is_active,
                      created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(now)
        .fetch_one(&mut *tx)
        .await
        .map_err(db_err)?;
        ToggleOutcome {
            slot: activated,
            completed: Vec::new(),
        }
    };

    tx.commit().await.map_err(db_err)?;
    Ok(outcome)
}

/// Deletes a slot only when nothing references its key.
pub async fn delete_slot(pool: &Pool<Postgres>, id: Uuid) -> GuidanceResult<DbSlot> {
    let mut tx = pool.begin().await.map_err(db_err)?;

    let slot = sqlx::query_as::<_, DbSlot>(
        r#"
        SELECT id, slot_date, time_label, max_capacity, current_count, is_active,
               created_at, updated_at
        FROM slots
        WHERE id = $1
        FOR UPDATE
        "#,
    )
    .bind(id)
    .fetch_optional(&mut *tx)
    .await
    .map_err(db_err)?
    .ok_or_else(|| GuidanceError::NotFound(format!("slot {id} not found")))?;

    let key = slot.key()?;
    let referencing = sqlx::query_scalar::<_, i64>(
        r#"
        SELECT COUNT(*)
        FROM appointments
        WHERE slot_date = $1 AND time_label = $2
        "#,
    )
    .bind(key.date())
    .bind(key.time_label())
    .fetch_one(&mut *tx)
    .await
    .map_err(db_err)?;

    if referencing > 0 {
        return Err(GuidanceError::Conflict(format!(
            "slot {key} is referenced by {referencing} appointment(s) and cannot be deleted"
        )));
    }

    sqlx::query("DELETE FROM slots WHERE id = $1")
        .bind(id)
        .execute(&mut *tx)
        .await
        .map_err(db_err)?;

    tx.commit().await.map_err(db_err)?;
    Ok(slot)
}

/// Retires every active slot dated today whose label time has elapsed.
///
/// Runs at the start of slot-listing reads and before capacity checks, so
/// expiry is always fresh as of the read without a background job. Labels
/// that do not parse are flagged and left alone rather than silently
/// retired. Returns the number of slots retired.
pub async fn expire_due_slots(
    pool: &Pool<Postgres>,
    today: NaiveDate,
    local_time_now: NaiveTime,
) -> GuidanceResult<u64> {
    let candidates = repositories::slot::list_active_on(pool, today)
        .await
        .map_err(GuidanceError::Database)?;

    let mut retired_count = 0;
    for candidate in candidates {
        let key = candidate.key()?;
        if key.time_of_day().is_none() {
            warn!(slot_id = %candidate.id, label = %candidate.time_label,
                "slot time label does not parse; slot will never auto-expire");
            continue;
        }
        if !slot::is_lapsed(&key, today, local_time_now) {
            continue;
        }

        let mut tx = pool.begin().await.map_err(db_err)?;

        // Re-check under the lock; a concurrent sweep or manual toggle may
        // have retired the slot already.
        let locked = sqlx::query_as::<_, DbSlot>(
            r#"
            SELECT id, slot_date, time_label, max_capacity, current_count, is_active,
                   created_at, updated_at
            FROM slots
            WHERE id = $1 AND is_active = TRUE
            FOR UPDATE
            "#,
        )
        .bind(candidate.id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(db_err)?;

        let Some(locked) = locked else {
            continue;
        };

        let now = Utc::now();
        let (_, completed) = retire_locked_slot(&mut tx, &locked, now).await?;
        tx.commit().await.map_err(db_err)?;

        info!(slot = %key, completed = completed.len(), "slot lapsed and was retired");
        retired_count += 1;
    }

    Ok(retired_count)
}

/// Records a pending appointment if the slot is active and not yet full of
/// approvals. Pending appointments from other students never block
/// submission.
pub async fn create_appointment(
    pool: &Pool<Postgres>,
    new: NewAppointment,
) -> GuidanceResult<DbAppointment> {
    let mut tx = pool.begin().await.map_err(db_err)?;

    let slot = lock_slot(&mut tx, &new.key).await?.ok_or_else(|| {
        GuidanceError::SlotUnavailable(format!("no slot is offered for {}", new.key))
    })?;

    let approved = count_approved(&mut tx, &new.key).await?;
    appointment::admit_new_appointment(slot.is_active, approved, slot.max_capacity, &new.key)?;

    let now = Utc::now();
    let created = sqlx::query_as::<_, DbAppointment>(
        r#"
        INSERT INTO appointments (id, student_id, student_name, program_section, reason,
                                  slot_date, time_label, status, created_at, updated_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $9)
        RETURNING id, student_id, student_name, program_section, reason, slot_date, time_label,
                  status, rejection_reason, created_at, updated_at
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(&new.student_id)
    .bind(&new.student_name)
    .bind(&new.program_section)
    .bind(&new.reason)
    .bind(new.key.date())
    .bind(new.key.time_label())
    .bind(AppointmentStatus::Pending.as_str())
    .bind(now)
    .fetch_one(&mut *tx)
    .await
    .map_err(db_err)?;

    refresh_cached_count(&mut tx, &new.key, now).await?;
    tx.commit().await.map_err(db_err)?;

    Ok(created)
}

/// Approves a pending appointment, re-checking capacity under the slot
/// lock. When the approval fills the slot, every other pending appointment
/// for the same key is rejected in the same transaction.
pub async fn approve_appointment(pool: &Pool<Postgres>, id: Uuid) -> GuidanceResult<ApprovalOutcome> {
    let mut tx = pool.begin().await.map_err(db_err)?;

    let appt = fetch_appointment(&mut tx, id)
        .await?
        .ok_or_else(|| GuidanceError::NotFound(format!("appointment {id} not found")))?;
    appointment::check_transition(appt.parsed_status()?, AppointmentStatus::Approved)?;

    let key = appt.key()?;
    let slot = lock_slot(&mut tx, &key)
        .await?
        .ok_or_else(|| GuidanceError::SlotUnavailable(format!("no slot is offered for {key}")))?;
    if !slot.is_active {
        return Err(GuidanceError::SlotUnavailable(format!(
            "slot {key} is no longer open"
        )));
    }

    let approved = count_approved(&mut tx, &key).await?;
    appointment::admit_approval(approved, slot.max_capacity, &key)?;

    let now = Utc::now();
    let updated = sqlx::query_as::<_, DbAppointment>(
        r#"
        UPDATE appointments
        SET status = $2, updated_at = $3
        WHERE id = $1 AND status = $4
        RETURNING id, student_id, student_name, program_section, reason, slot_date, time_label,
                  status, rejection_reason, created_at, updated_at
        "#,
    )
    .bind(id)
    .bind(AppointmentStatus::Approved.as_str())
    .bind(now)
    .bind(AppointmentStatus::Pending.as_str())
    .fetch_optional(&mut *tx)
    .await
    .map_err(db_err)?
    .ok_or_else(|| {
        GuidanceError::InvalidStateTransition(format!("appointment {id} is no longer pending"))
    })?;

    // The approval above may have filled the slot; if so, the remaining
    // pending requests for this key lose in the same transaction.
    let mut auto_rejected = Vec::new();
    if approved + 1 >= i64::from(slot.max_capacity) {
        auto_rejected = sqlx::query_as::<_, DbAppointment>(
            r#"
            UPDATE appointments
            SET status = $3, rejection_reason = $4, updated_at = $5
            WHERE slot_date = $1 AND time_label = $2 AND status = $6
            RETURNING id, student_id, student_name, program_section, reason, slot_date,
                      time_label, status, rejection_reason, created_at, updated_at
            "#,
        )
        .bind(key.date())
        .bind(key.time_label())
        .bind(AppointmentStatus::Rejected.as_str())
        .bind(appointment::capacity_rejection_reason(&key))
        .bind(now)
        .bind(AppointmentStatus::Pending.as_str())
        .fetch_all(&mut *tx)
        .await
        .map_err(db_err)?;

        if !auto_rejected.is_empty() {
            info!(slot = %key, rejected = auto_rejected.len(),
                "slot filled; remaining pending appointments auto-rejected");
        }
    }

    refresh_cached_count(&mut tx, &key, now).await?;
    tx.commit().await.map_err(db_err)?;

    Ok(ApprovalOutcome {
        appointment: updated,
        auto_rejected,
    })
}

/// Rejects a pending appointment with a staff-entered reason.
pub async fn reject_appointment(
    pool: &Pool<Postgres>,
    id: Uuid,
    reason: &str,
) -> GuidanceResult<DbAppointment> {
    let mut tx = pool.begin().await.map_err(db_err)?;

    let appt = fetch_appointment(&mut tx, id)
        .await?
        .ok_or_else(|| GuidanceError::NotFound(format!("appointment {id} not found")))?;
    appointment::check_transition(appt.parsed_status()?, AppointmentStatus::Rejected)?;

    let key = appt.key()?;
    // Lock the slot so the cached count cannot interleave with an approval
    // cascade on the same key.
    let slot = lock_slot(&mut tx, &key).await?;
    if slot.is_none() {
        warn!(appointment_id = %id, %key, "appointment references a missing slot");
    }

    let now = Utc::now();
    let updated = sqlx::query_as::<_, DbAppointment>(
        r#"
        UPDATE appointments
        SET status = $2, rejection_reason = $3, updated_at = $4
        WHERE id = $1 AND status = $5
        RETURNING id, student_id, student_name, program_section, reason, slot_date, time_label,
                  status, rejection_reason, created_at, updated_at
        "#,
    )
    .bind(id)
    .bind(AppointmentStatus::Rejected.as_str())
    .bind(reason)
    .bind(now)
    .bind(AppointmentStatus::Pending.as_str())
    .fetch_optional(&mut *tx)
    .await
    .map_err(db_err)?
    .ok_or_else(|| {
        GuidanceError::InvalidStateTransition(format!("appointment {id} is no longer pending"))
    })?;

    if slot.is_some() {
        refresh_cached_count(&mut tx, &key, now).await?;
    }
    tx.commit().await.map_err(db_err)?;

    Ok(updated)
}

/// Staff action: completes one approved appointment, retires its slot and
/// issues the guidance pass. Unlike retirement, the slot's other approved
/// appointments are left untouched.
pub async fn complete_appointment(
    pool: &Pool<Postgres>,
    id: Uuid,
) -> GuidanceResult<CompletionOutcome> {
    let mut tx = pool.begin().await.map_err(db_err)?;

    let appt = fetch_appointment(&mut tx, id)
        .await?
        .ok_or_else(|| GuidanceError::NotFound(format!("appointment {id} not found")))?;
    appointment::check_transition(appt.parsed_status()?, AppointmentStatus::Completed)?;

    let key = appt.key()?;
    let slot = lock_slot(&mut tx, &key).await?.ok_or_else(|| {
        GuidanceError::DataIntegrity(format!(
            "appointment {id} references missing slot {key}"
        ))
    })?;

    let now = Utc::now();
    let updated = sqlx::query_as::<_, DbAppointment>(
        r#"
        UPDATE appointments
        SET status = $2, updated_at = $3
        WHERE id = $1 AND status = $4
        RETURNING id, student_id, student_name, program_section, reason, slot_date, time_label,
                  status, rejection_reason, created_at, updated_at
        "#,
    )
    .bind(id)
    .bind(AppointmentStatus::Completed.as_str())
    .bind(now)
    .bind(AppointmentStatus::Approved.as_str())
    .fetch_optional(&mut *tx)
    .await
    .map_err(db_err)?
    .ok_or_else(|| {
        GuidanceError::InvalidStateTransition(format!("appointment {id} is no longer approved"))
    })?;

    let slot = if slot.is_active {
        sqlx::query_as::<_, DbSlot>(
            r#"
            UPDATE slots
            SET is_active = FALSE, updated_at = $2
            WHERE id = $1
            RETURNING id, slot_date, time_label, max_capacity, current_count, is_active,
                      created_at, updated_at
            "#,
        )
        .bind(slot.id)
        .bind(now)
        .fetch_one(&mut *tx)
        .await
        .map_err(db_err)?
    } else {
        slot
    };

    refresh_cached_count(&mut tx, &key, now).await?;

    let pass = sqlx::query_as::<_, DbGuidancePass>(
        r#"
        INSERT INTO guidance_passes (id, appointment_id, student_id, student_name,
                                     slot_date, time_label, issued_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        RETURNING id, appointment_id, student_id, student_name, slot_date, time_label, issued_at
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(updated.id)
    .bind(&updated.student_id)
    .bind(&updated.student_name)
    .bind(key.date())
    .bind(key.time_label())
    .bind(now)
    .fetch_one(&mut *tx)
    .await
    .map_err(db_err)?;

    tx.commit().await.map_err(db_err)?;

    Ok(CompletionOutcome {
        appointment: updated,
        slot,
        pass,
    })
}

/// Administrative bulk pass: rewrites every slot's cached count from live
/// appointment rows and reports how many slots actually changed.
pub async fn resync_all_counts(pool: &Pool<Postgres>) -> GuidanceResult<u64> {
    let now = Utc::now();
    let result = sqlx::query(
        r#"
        UPDATE slots
        SET current_count = live.cnt, updated_at = $1
        FROM (
            SELECT s.id AS slot_id, COUNT(a.id)::INTEGER AS cnt
            FROM slots s
            LEFT JOIN appointments a
                   ON a.slot_date = s.slot_date
                  AND a.time_label = s.time_label
                  AND a.status IN ($2, $3)
            GROUP BY s.id
        ) AS live
        WHERE slots.id = live.slot_id
          AND slots.current_count <> live.cnt
        "#,
    )
    .bind(now)
    .bind(AppointmentStatus::Pending.as_str())
    .bind(AppointmentStatus::Approved.as_str())
    .execute(pool)
    .await
    .map_err(db_err)?;

    Ok(result.rows_affected())
}

async fn fetch_appointment(
    tx: &mut Transaction<'_, Postgres>,
    id: Uuid,
) -> GuidanceResult<Option<DbAppointment>> {
    sqlx::query_as::<_, DbAppointment>(
        r#"
        SELECT id, student_id, student_name, program_section, reason, slot_date, time_label,
               status, rejection_reason, created_at, updated_at
        FROM appointments
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(&mut **tx)
    .await
    .map_err(db_err)
}
