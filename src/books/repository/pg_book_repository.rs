use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;

use crate::books::domain::model::BookEntity;
use crate::books::repository::BookRepository;
use crate::core::library::LibraryResult;
use crate::core::repository::Repository;
use crate::utils::pg::{duplicate, like_pattern, missing, stale_version, where_clause};

const TABLE: &str = "books";
const QUERYABLE: [&str; 5] = ["book_id", "version", "title", "author", "category"];

#[derive(Debug)]
pub(crate) struct PgBookRepository {
    pool: PgPool,
}

impl PgBookRepository {
    pub(crate) fn new(pool: PgPool) -> Self {
        Self {
            pool,
        }
    }
}

#[async_trait]
impl Repository<BookEntity> for PgBookRepository {
    async fn create(&self, entity: &BookEntity) -> LibraryResult<usize> {
        let res = sqlx::query(
            "INSERT INTO books (book_id, version, title, author, category, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) ON CONFLICT (book_id) DO NOTHING")
            .bind(&entity.book_id)
            .bind(entity.version)
            .bind(&entity.title)
            .bind(&entity.author)
            .bind(&entity.category)
            .bind(entity.created_at)
            .bind(entity.updated_at)
            .execute(&self.pool)
            .await?;
        if res.rows_affected() == 0 {
            return Err(duplicate(TABLE, entity.book_id.as_str()));
        }
        Ok(1)
    }

    async fn update(&self, entity: &BookEntity) -> LibraryResult<usize> {
        let res = sqlx::query(
            "UPDATE books SET version = version + 1, title = $3, author = $4, category = $5, updated_at = $6 \
             WHERE book_id = $1 AND version = $2")
            .bind(&entity.book_id)
            .bind(entity.version)
            .bind(&entity.title)
            .bind(&entity.author)
            .bind(&entity.category)
            .bind(Utc::now().naive_utc())
            .execute(&self.pool)
            .await?;
        if res.rows_affected() == 0 {
            // surfaces NotFound when the row is gone
            let _ = self.get(entity.book_id.as_str()).await?;
            return Err(stale_version(TABLE, entity.book_id.as_str(), entity.version));
        }
        Ok(1)
    }

    async fn get(&self, id: &str) -> LibraryResult<BookEntity> {
        sqlx::query_as::<_, BookEntity>(
            "SELECT book_id, version, title, author, category, created_at, updated_at FROM books WHERE book_id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| missing(TABLE, id))
    }

    async fn delete(&self, id: &str) -> LibraryResult<usize> {
        let res = sqlx::query("DELETE FROM books WHERE book_id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if res.rows_affected() == 0 {
            return Err(missing(TABLE, id));
        }
        Ok(1)
    }

    async fn query(&self, predicate: &HashMap<String, String>) -> LibraryResult<Vec<BookEntity>> {
        let Some((clause, values)) = where_clause(&QUERYABLE, predicate) else {
            return Ok(vec![]);
        };
        let sql = format!(
            "SELECT book_id, version, title, author, category, created_at, updated_at FROM books{} ORDER BY seq",
            clause);
        let mut query = sqlx::query_as::<_, BookEntity>(sql.as_str());
        for value in values {
            query = query.bind(value);
        }
        Ok(query.fetch_all(&self.pool).await?)
    }

    async fn count(&self) -> LibraryResult<usize> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM books")
            .fetch_one(&self.pool)
            .await?;
        Ok(count as usize)
    }
}

#[async_trait]
impl BookRepository for PgBookRepository {
    async fn scan(&self) -> LibraryResult<Vec<BookEntity>> {
        Ok(sqlx::query_as::<_, BookEntity>(
            "SELECT book_id, version, title, author, category, created_at, updated_at FROM books ORDER BY seq")
            .fetch_all(&self.pool)
            .await?)
    }

    async fn search(&self, term: &str) -> LibraryResult<Vec<BookEntity>> {
        if term.trim().is_empty() {
            return self.scan().await;
        }
        Ok(sqlx::query_as::<_, BookEntity>(
            "SELECT book_id, version, title, author, category, created_at, updated_at FROM books \
             WHERE title ILIKE $1 OR author ILIKE $1 OR category ILIKE $1 ORDER BY seq")
            .bind(like_pattern(term))
            .fetch_all(&self.pool)
            .await?)
    }
}
