use sqlx::{Pool, Postgres};
use tracing::instrument;

const CREATE_USERS: &str = r#"
CREATE TABLE IF NOT EXISTS users (
    id SERIAL PRIMARY KEY,
    username TEXT NOT NULL,
    email TEXT NOT NULL UNIQUE,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now()
)"#;

const DROP_USERS: &str = "DROP TABLE IF EXISTS users";

/// Creates the `users` table if it is missing.
#[instrument(name = "Creating schema", skip(pool))]
pub async fn create_all(pool: &Pool<Postgres>) -> Result<(), sqlx::Error> {
    sqlx::query(CREATE_USERS).execute(pool).await?;
    Ok(())
}

#[instrument(name = "Dropping schema", skip(pool))]
pub async fn drop_all(pool: &Pool<Postgres>) -> Result<(), sqlx::Error> {
    sqlx::query(DROP_USERS).execute(pool).await?;
    Ok(())
}

/// Drops and recreates every table inside one transaction.
pub async fn recreate_all(pool: &Pool<Postgres>) -> Result<(), sqlx::Error> {
    let mut tx = pool.begin().await?;
    sqlx::query(DROP_USERS).execute(&mut *tx).await?;
    sqlx::query(CREATE_USERS).execute(&mut *tx).await?;
    tx.commit().await?;
    tracing::info!("Schema recreated");
    Ok(())
}
