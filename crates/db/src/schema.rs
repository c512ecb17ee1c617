use eyre::Result;
use sqlx::{Pool, Postgres};
use tracing::info;

pub async fn initialize_database(pool: &Pool<Postgres>) -> Result<()> {
    info!("Initializing database schema...");

    // Create slots table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS slots (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            slot_date DATE NOT NULL,
            time_label VARCHAR(32) NOT NULL,
            max_capacity INTEGER NOT NULL DEFAULT 3,
            current_count INTEGER NOT NULL DEFAULT 0,
            is_active BOOLEAN NOT NULL DEFAULT TRUE,
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW(),
            updated_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW(),
            CONSTRAINT positive_capacity CHECK (max_capacity > 0)
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create appointments table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS appointments (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            student_id VARCHAR(64) NOT NULL,
            student_name VARCHAR(255) NOT NULL,
            program_section VARCHAR(255) NOT NULL,
            reason TEXT NOT NULL,
            slot_date DATE NOT NULL,
            time_label VARCHAR(32) NOT NULL,
            status VARCHAR(16) NOT NULL DEFAULT 'pending',
            rejection_reason TEXT NULL,
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW(),
            updated_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW()
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create guidance_passes table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS guidance_passes (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            appointment_id UUID NOT NULL UNIQUE REFERENCES appointments(id),
            student_id VARCHAR(64) NOT NULL,
            student_name VARCHAR(255) NOT NULL,
            slot_date DATE NOT NULL,
            time_label VARCHAR(32) NOT NULL,
            issued_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW()
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create activity_log table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS activity_log (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            actor VARCHAR(255) NOT NULL,
            action VARCHAR(64) NOT NULL,
            detail TEXT NOT NULL,
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW()
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create indexes; the unique slot index backs duplicate-slot rejection
    let indexes = [
        "CREATE UNIQUE INDEX IF NOT EXISTS idx_slots_date_label ON slots(slot_date, time_label)",
        "CREATE INDEX IF NOT EXISTS idx_slots_active_date ON slots(is_active, slot_date)",
        "CREATE INDEX IF NOT EXISTS idx_appointments_key ON appointments(slot_date, time_label)",
        "CREATE INDEX IF NOT EXISTS idx_appointments_status ON appointments(status)",
        "CREATE INDEX IF NOT EXISTS idx_appointments_student ON appointments(student_id)",
        "CREATE INDEX IF NOT EXISTS idx_activity_log_created_at ON activity_log(created_at)",
    ];
    for statement in indexes {
        sqlx::query(statement).execute(pool).await?;
    }

    info!("Database schema initialized successfully.");
    Ok(())
}
