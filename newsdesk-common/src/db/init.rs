//! Database initialization
//!
//! Creates the database file on first run and brings the schema up
//! idempotently. Every `create_*_table` function is safe to call repeatedly.

use crate::Result;
use sqlx::{sqlite::SqlitePoolOptions, SqlitePool};
use std::path::Path;
use tracing::info;

/// Aggregator sources seeded on first run
pub const SOURCE_NEWSAPI: &str = "NewsAPI";
pub const SOURCE_GNEWS: &str = "GNews";
pub const SOURCE_GOOGLE_RSS: &str = "Google News RSS";

/// Initialize database connection and create tables if needed
pub async fn init_database(db_path: &Path) -> Result<SqlitePool> {
    let newly_created = !db_path.exists();

    // Create parent directory if it doesn't exist
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let db_url = format!("sqlite://{}?mode=rwc", db_path.display());
    let pool = SqlitePoolOptions::new()
        .max_connections(10)
        .connect(&db_url)
        .await?;

    if newly_created {
        info!("Initialized new database: {}", db_path.display());
    } else {
        info!("Opened existing database: {}", db_path.display());
    }

    // Enable foreign keys
    sqlx::query("PRAGMA foreign_keys = ON")
        .execute(&pool)
        .await?;

    // WAL allows concurrent readers alongside the single writer
    sqlx::query("PRAGMA journal_mode = WAL")
        .execute(&pool)
        .await?;

    sqlx::query("PRAGMA busy_timeout = 5000")
        .execute(&pool)
        .await?;

    init_schema(&pool).await?;

    Ok(pool)
}

/// Create all tables and seed rows (idempotent, safe to call multiple times)
pub async fn init_schema(pool: &SqlitePool) -> Result<()> {
    create_aggregator_sources_table(pool).await?;
    create_ingest_requests_table(pool).await?;
    create_articles_table(pool).await?;
    create_article_contents_table(pool).await?;
    create_us_states_table(pool).await?;
    create_state_proposals_table(pool).await?;
    create_state_confirmations_table(pool).await?;
    create_ai_report_drafts_table(pool).await?;
    create_report_approvals_table(pool).await?;

    seed_aggregator_sources(pool).await?;
    seed_us_states(pool).await?;

    info!("Database schema initialized");

    Ok(())
}

pub async fn create_aggregator_sources_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS aggregator_sources (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL UNIQUE,
            is_api INTEGER NOT NULL DEFAULT 0,
            is_rss INTEGER NOT NULL DEFAULT 0,
            created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

pub async fn create_ingest_requests_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS ingest_requests (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            source_id INTEGER NOT NULL REFERENCES aggregator_sources(id),
            and_terms TEXT,
            or_terms TEXT,
            not_terms TEXT,
            request_url TEXT,
            count_received INTEGER NOT NULL DEFAULT 0,
            count_saved INTEGER,
            status TEXT NOT NULL DEFAULT 'success',
            created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

pub async fn create_articles_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS articles (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            title TEXT NOT NULL DEFAULT '',
            description TEXT NOT NULL DEFAULT '',
            url TEXT NOT NULL UNIQUE,
            published_date TEXT,
            publication_name TEXT NOT NULL DEFAULT 'Unknown',
            author TEXT,
            found_by_source_id INTEGER REFERENCES aggregator_sources(id),
            ingest_request_id INTEGER REFERENCES ingest_requests(id),
            created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

pub async fn create_article_contents_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS article_contents (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            article_id INTEGER NOT NULL REFERENCES articles(id),
            content TEXT NOT NULL,
            created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

pub async fn create_us_states_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS us_states (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL UNIQUE,
            abbreviation TEXT NOT NULL UNIQUE
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

/// AI-proposed (article, state) classifications.
///
/// The logical natural key is (article_id, state_id) but the schema does not
/// enforce it: the reconciliation engine must be able to detect upstream
/// anomalies (zero or multiple rows per pair) instead of silently losing them.
pub async fn create_state_proposals_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS state_proposals (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            article_id INTEGER NOT NULL REFERENCES articles(id),
            state_id INTEGER REFERENCES us_states(id),
            prompt_id INTEGER,
            is_human_approved INTEGER,
            is_determined_to_be_error INTEGER NOT NULL DEFAULT 0,
            occurred_in_us INTEGER NOT NULL DEFAULT 1,
            reasoning TEXT,
            created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

/// Human-confirmed (article, state) associations. Row existence is the
/// approval; the UNIQUE constraint is the last line of defense against
/// concurrent double-approval.
pub async fn create_state_confirmations_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS state_confirmations (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            article_id INTEGER NOT NULL REFERENCES articles(id),
            state_id INTEGER NOT NULL REFERENCES us_states(id),
            created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
            UNIQUE(article_id, state_id)
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

pub async fn create_ai_report_drafts_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS ai_report_drafts (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            article_id INTEGER NOT NULL REFERENCES articles(id),
            headline TEXT,
            publication_name TEXT,
            publication_date TEXT,
            report_text TEXT,
            url TEXT,
            is_approved INTEGER NOT NULL DEFAULT 1,
            created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

pub async fn create_report_approvals_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS report_approvals (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            article_id INTEGER NOT NULL REFERENCES articles(id),
            reviewer_id INTEGER,
            is_approved INTEGER NOT NULL DEFAULT 0,
            headline TEXT,
            publication_name TEXT,
            publication_date TEXT,
            report_text TEXT,
            url TEXT,
            created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

/// Seed the known aggregator source rows
async fn seed_aggregator_sources(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        INSERT OR IGNORE INTO aggregator_sources (name, is_api, is_rss) VALUES
            (?, 1, 0),
            (?, 1, 0),
            (?, 0, 1)
        "#,
    )
    .bind(SOURCE_NEWSAPI)
    .bind(SOURCE_GNEWS)
    .bind(SOURCE_GOOGLE_RSS)
    .execute(pool)
    .await?;

    Ok(())
}

/// Seed the 50 US states plus DC
async fn seed_us_states(pool: &SqlitePool) -> Result<()> {
    const STATES: [(&str, &str); 51] = [
        ("Alabama", "AL"),
        ("Alaska", "AK"),
        ("Arizona", "AZ"),
        ("Arkansas", "AR"),
        ("California", "CA"),
        ("Colorado", "CO"),
        ("Connecticut", "CT"),
        ("Delaware", "DE"),
        ("District of Columbia", "DC"),
        ("Florida", "FL"),
        ("Georgia", "GA"),
        ("Hawaii", "HI"),
        ("Idaho", "ID"),
        ("Illinois", "IL"),
        ("Indiana", "IN"),
        ("Iowa", "IA"),
        ("Kansas", "KS"),
        ("Kentucky", "KY"),
        ("Louisiana", "LA"),
        ("Maine", "ME"),
        ("Maryland", "MD"),
        ("Massachusetts", "MA"),
        ("Michigan", "MI"),
        ("Minnesota", "MN"),
        ("Mississippi", "MS"),
        ("Missouri", "MO"),
        ("Montana", "MT"),
        ("Nebraska", "NE"),
        ("Nevada", "NV"),
        ("New Hampshire", "NH"),
        ("New Jersey", "NJ"),
        ("New Mexico", "NM"),
        ("New York", "NY"),
        ("North Carolina", "NC"),
        ("North Dakota", "ND"),
        ("Ohio", "OH"),
        ("Oklahoma", "OK"),
        ("Oregon", "OR"),
        ("Pennsylvania", "PA"),
        ("Rhode Island", "RI"),
        ("South Carolina", "SC"),
        ("South Dakota", "SD"),
        ("Tennessee", "TN"),
        ("Texas", "TX"),
        ("Utah", "UT"),
        ("Vermont", "VT"),
        ("Virginia", "VA"),
        ("Washington", "WA"),
        ("West Virginia", "WV"),
        ("Wisconsin", "WI"),
        ("Wyoming", "WY"),
    ];

    for (name, abbreviation) in STATES {
        sqlx::query("INSERT OR IGNORE INTO us_states (name, abbreviation) VALUES (?, ?)")
            .bind(name)
            .bind(abbreviation)
            .execute(pool)
            .await?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn schema_init_is_idempotent() {
        let pool = SqlitePool::connect("sqlite::memory:")
            .await
            .expect("Failed to create in-memory database");

        init_schema(&pool).await.expect("First init failed");
        init_schema(&pool).await.expect("Second init failed");

        let state_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM us_states")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(state_count, 51);

        let source_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM aggregator_sources")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(source_count, 3);
    }

    #[tokio::test]
    async fn article_url_is_unique() {
        let pool = SqlitePool::connect("sqlite::memory:")
            .await
            .expect("Failed to create in-memory database");
        init_schema(&pool).await.unwrap();

        sqlx::query("INSERT INTO articles (title, url) VALUES ('a', 'http://x.com/1')")
            .execute(&pool)
            .await
            .unwrap();

        let dup = sqlx::query("INSERT INTO articles (title, url) VALUES ('b', 'http://x.com/1')")
            .execute(&pool)
            .await;
        assert!(dup.is_err());
    }
}
