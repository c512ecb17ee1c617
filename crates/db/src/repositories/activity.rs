use eyre::Result;
use sqlx::{Pool, Postgres};
use tracing::warn;
use uuid::Uuid;

use crate::models::DbActivityRecord;

pub async fn record(
    pool: &Pool<Postgres>,
    actor: &str,
    action: &str,
    detail: &str,
) -> Result<DbActivityRecord> {
    let entry = sqlx::query_as::<_, DbActivityRecord>(
        r#"
        INSERT INTO activity_log (id, actor, action, detail)
        VALUES ($1, $2, $3, $4)
        RETURNING id, actor, action, detail, created_at
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(actor)
    .bind(action)
    .bind(detail)
    .fetch_one(pool)
    .await?;

    Ok(entry)
}

/// Appends an audit record without letting a failed write fail the
/// operation being audited.
pub async fn record_best_effort(pool: &Pool<Postgres>, actor: &str, action: &str, detail: &str) {
    if let Err(err) = record(pool, actor, action, detail).await {
        warn!(action, %err, "failed to append activity log record");
    }
}
