use std::collections::HashMap;
use std::time::Duration;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use tracing::info;
use crate::core::domain::Configuration;
use crate::core::library::{LibraryError, LibraryResult};

const ACQUIRE_TIMEOUT: Duration = Duration::from_secs(5);

pub(crate) async fn build_pool(config: &Configuration, url: &str) -> LibraryResult<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .acquire_timeout(ACQUIRE_TIMEOUT)
        .connect(url)
        .await?;
    info!(max_connections = config.max_connections, "connected to postgres");
    Ok(pool)
}

// creates the books, parties and loans tables when missing
pub(crate) async fn migrate(pool: &PgPool) -> LibraryResult<()> {
    sqlx::migrate!("./migrations")
        .run(pool)
        .await
        .map_err(|err| LibraryError::database(format!("migration failed: {}", err).as_str(), None, false))?;
    info!("database migrations applied");
    Ok(())
}

// ILIKE pattern matching the term anywhere, with LIKE wildcards in the term taken literally
pub(crate) fn like_pattern(term: &str) -> String {
    let mut pattern = String::from("%");
    for c in term.trim().chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

// Builds ` WHERE col::text = $1 AND ...` over the allowed columns, sorted by column
// so the binds line up with the returned values. None when a key names a column
// outside the allowed list, which can never match.
pub(crate) fn where_clause(allowed: &[&str], predicate: &HashMap<String, String>) -> Option<(String, Vec<String>)> {
    let mut keys: Vec<&String> = predicate.keys().collect();
    keys.sort();
    let mut conditions = vec![];
    let mut values = vec![];
    for key in keys {
        let column = allowed.iter().find(|c| **c == key.as_str())?;
        values.push(predicate[key].to_string());
        conditions.push(format!("{}::text = ${}", column, values.len()));
    }
    if conditions.is_empty() {
        return Some((String::new(), values));
    }
    Some((format!(" WHERE {}", conditions.join(" AND ")), values))
}

pub(crate) fn stale_version(table: &str, id: &str, version: i64) -> LibraryError {
    LibraryError::conflict(format!("stale version {} for {} in {}", version, id, table).as_str(),
                           Some("stale_version".to_string()))
}

pub(crate) fn missing(table: &str, id: &str) -> LibraryError {
    LibraryError::not_found(format!("{} not found for {}", table, id).as_str())
}

pub(crate) fn duplicate(table: &str, id: &str) -> LibraryError {
    LibraryError::conflict(format!("{} already exists in {}", id, table).as_str(), Some("duplicate_key".to_string()))
}

// pool against LMS_TEST_DATABASE_URL for the postgres tests run with `cargo test -- --ignored`
#[cfg(test)]
pub(crate) async fn test_pool() -> PgPool {
    let url = std::env::var("LMS_TEST_DATABASE_URL").expect("LMS_TEST_DATABASE_URL must be set");
    let pool = build_pool(&Configuration::new("test"), url.as_str()).await.expect("should connect");
    migrate(&pool).await.expect("should migrate");
    pool
}
