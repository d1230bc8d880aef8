//! Catalog database layer
//!
//! A small SQLite catalog of posts, taxonomy terms, and the links between
//! them. The grid endpoints never write; everything here besides schema
//! creation and seeding is read-only.

use pgrid_common::Result;
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::{Pool, Sqlite, SqlitePool};
use std::path::Path;
use std::time::Duration;
use tracing::{info, warn};

pub mod catalog;
pub mod seed;

/// Connect to the catalog database, creating the file when missing
pub async fn connect(db_path: &Path) -> Result<SqlitePool> {
    // mode=rwc: create the catalog file on first run
    let db_url = format!("sqlite://{}?mode=rwc", db_path.display());

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .acquire_timeout(Duration::from_secs(5))
        .connect(&db_url)
        .await?;

    info!("Connected to catalog database: {}", db_path.display());

    Ok(pool)
}

/// Create the catalog tables when they do not exist
///
/// Idempotent: an already-initialized catalog passes through untouched.
pub async fn init_schema(pool: &Pool<Sqlite>) -> Result<()> {
    let table_exists: bool = sqlx::query_scalar(
        r#"
        SELECT EXISTS(
            SELECT 1 FROM sqlite_master
            WHERE type='table' AND name='posts'
        )
        "#,
    )
    .fetch_one(pool)
    .await?;

    if table_exists {
        info!("Catalog schema already present");
        return Ok(());
    }

    warn!("Catalog tables do not exist - creating empty schema");

    sqlx::query(
        r#"
        CREATE TABLE posts (
            id INTEGER PRIMARY KEY,
            title TEXT NOT NULL,
            post_type TEXT NOT NULL DEFAULT 'post',
            published_at TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE terms (
            id INTEGER PRIMARY KEY,
            name TEXT NOT NULL,
            taxonomy TEXT NOT NULL DEFAULT 'category'
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE post_terms (
            post_id INTEGER NOT NULL REFERENCES posts(id),
            term_id INTEGER NOT NULL REFERENCES terms(id),
            PRIMARY KEY (post_id, term_id)
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX idx_posts_type ON posts(post_type, published_at)")
        .execute(pool)
        .await?;

    sqlx::query("CREATE INDEX idx_post_terms_term ON post_terms(term_id)")
        .execute(pool)
        .await?;

    info!("Catalog schema created");

    Ok(())
}
