//! Database schema and migrations
//!
//! The notes schema has a single version today. Migrations are still
//! recorded in a `migrations` table so an existing database file is never
//! re-initialized.

use crate::error::Result;
use sqlx::sqlite::SqlitePool;

/// A schema step shipped with the binary
struct Migration {
    version: i64,
    name: &'static str,
    sql: &'static str,
}

const MIGRATIONS: &[Migration] = &[Migration {
    version: 1,
    name: "initial_schema",
    sql: include_str!("migrations/001_initial_schema.sql"),
}];

/// Bring the schema of `pool` up to date.
///
/// Returns how many migrations were applied by this call.
pub async fn initialize_database(pool: &SqlitePool) -> Result<usize> {
    tracing::info!("Initializing database schema");

    sqlx::query("PRAGMA journal_mode = WAL").execute(pool).await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS migrations (
            version INTEGER PRIMARY KEY,
            name TEXT NOT NULL,
            applied_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
        )
        "#,
    )
    .execute(pool)
    .await?;

    let current_version = schema_version(pool).await?;
    tracing::info!("Current database version: {}", current_version);

    let mut applied = 0;
    for migration in MIGRATIONS.iter().filter(|m| m.version > current_version) {
        apply_migration(pool, migration).await?;
        applied += 1;
    }

    tracing::info!("Database initialization complete ({} migrations applied)", applied);
    Ok(applied)
}

/// Highest applied migration version, 0 for a fresh database
pub async fn schema_version(pool: &SqlitePool) -> Result<i64> {
    let version: i64 = sqlx::query_scalar("SELECT COALESCE(MAX(version), 0) FROM migrations")
        .fetch_one(pool)
        .await?;
    Ok(version)
}

async fn apply_migration(pool: &SqlitePool, migration: &Migration) -> Result<()> {
    tracing::info!(
        "Applying migration {} ({})",
        migration.version,
        migration.name
    );

    let mut tx = pool.begin().await?;

    for statement in statements(migration.sql) {
        sqlx::query(&statement).execute(&mut *tx).await?;
    }

    sqlx::query("INSERT INTO migrations (version, name) VALUES (?, ?)")
        .bind(migration.version)
        .bind(migration.name)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;
    Ok(())
}

/// Split a migration script into executable statements, dropping `--` comment lines
fn statements(sql: &str) -> Vec<String> {
    let stripped: String = sql
        .lines()
        .filter(|line| !line.trim_start().starts_with("--"))
        .collect::<Vec<_>>()
        .join("\n");

    stripped
        .split(';')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::sqlite::SqlitePoolOptions;

    async fn memory_pool() -> SqlitePool {
        SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_initialize_database() {
        let pool = memory_pool().await;

        let applied = initialize_database(&pool).await.unwrap();

        assert_eq!(applied, MIGRATIONS.len());
        assert_eq!(schema_version(&pool).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_initialize_is_idempotent() {
        let pool = memory_pool().await;

        initialize_database(&pool).await.unwrap();
        let applied_again = initialize_database(&pool).await.unwrap();

        assert_eq!(applied_again, 0);
        assert_eq!(schema_version(&pool).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_notes_and_settings_tables_created() {
        let pool = memory_pool().await;
        initialize_database(&pool).await.unwrap();

        let tables: Vec<String> = sqlx::query_scalar(
            "SELECT name FROM sqlite_master WHERE type = 'table' AND name IN ('notes', 'settings') ORDER BY name",
        )
        .fetch_all(&pool)
        .await
        .unwrap();

        assert_eq!(tables, vec!["notes".to_string(), "settings".to_string()]);
    }

    #[test]
    fn test_statements_skip_comments_and_blanks() {
        let sql = "-- header\nCREATE TABLE a (x INTEGER);\n\n-- second\nCREATE TABLE b (y TEXT);\n";

        let parsed = statements(sql);

        assert_eq!(
            parsed,
            vec![
                "CREATE TABLE a (x INTEGER)".to_string(),
                "CREATE TABLE b (y TEXT)".to_string()
            ]
        );
    }
}
