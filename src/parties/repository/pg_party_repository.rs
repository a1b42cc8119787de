use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;

use crate::core::library::LibraryResult;
use crate::core::repository::Repository;
use crate::parties::domain::model::PartyEntity;
use crate::parties::repository::PartyRepository;
use crate::utils::pg::{duplicate, like_pattern, missing, stale_version, where_clause};

const TABLE: &str = "parties";
const QUERYABLE: [&str; 4] = ["party_id", "version", "name", "email"];

#[derive(Debug)]
pub(crate) struct PgPartyRepository {
    pool: PgPool,
}

impl PgPartyRepository {
    pub(crate) fn new(pool: PgPool) -> Self {
        Self {
            pool,
        }
    }
}

#[async_trait]
impl Repository<PartyEntity> for PgPartyRepository {
    // a taken email fails with the unique index violation mapped to a duplicate_key conflict
    async fn create(&self, entity: &PartyEntity) -> LibraryResult<usize> {
        let res = sqlx::query(
            "INSERT INTO parties (party_id, version, name, email, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6) ON CONFLICT (party_id) DO NOTHING")
            .bind(&entity.party_id)
            .bind(entity.version)
            .bind(&entity.name)
            .bind(&entity.email)
            .bind(entity.created_at)
            .bind(entity.updated_at)
            .execute(&self.pool)
            .await?;
        if res.rows_affected() == 0 {
            return Err(duplicate(TABLE, entity.party_id.as_str()));
        }
        Ok(1)
    }

    async fn update(&self, entity: &PartyEntity) -> LibraryResult<usize> {
        let res = sqlx::query(
            "UPDATE parties SET version = version + 1, name = $3, email = $4, updated_at = $5 \
             WHERE party_id = $1 AND version = $2")
            .bind(&entity.party_id)
            .bind(entity.version)
            .bind(&entity.name)
            .bind(&entity.email)
            .bind(Utc::now().naive_utc())
            .execute(&self.pool)
            .await?;
        if res.rows_affected() == 0 {
            let _ = self.get(entity.party_id.as_str()).await?;
            return Err(stale_version(TABLE, entity.party_id.as_str(), entity.version));
        }
        Ok(1)
    }

    async fn get(&self, id: &str) -> LibraryResult<PartyEntity> {
        sqlx::query_as::<_, PartyEntity>(
            "SELECT party_id, version, name, email, created_at, updated_at FROM parties WHERE party_id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| missing(TABLE, id))
    }

    async fn delete(&self, id: &str) -> LibraryResult<usize> {
        let res = sqlx::query("DELETE FROM parties WHERE party_id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if res.rows_affected() == 0 {
            return Err(missing(TABLE, id));
        }
        Ok(1)
    }

    async fn query(&self, predicate: &HashMap<String, String>) -> LibraryResult<Vec<PartyEntity>> {
        let Some((clause, values)) = where_clause(&QUERYABLE, predicate) else {
            return Ok(vec![]);
        };
        let sql = format!(
            "SELECT party_id, version, name, email, created_at, updated_at FROM parties{} ORDER BY seq", clause);
        let mut query = sqlx::query_as::<_, PartyEntity>(sql.as_str());
        for value in values {
            query = query.bind(value);
        }
        Ok(query.fetch_all(&self.pool).await?)
    }

    async fn count(&self) -> LibraryResult<usize> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM parties")
            .fetch_one(&self.pool)
            .await?;
        Ok(count as usize)
    }
}

#[async_trait]
impl PartyRepository for PgPartyRepository {
    async fn find_by_email(&self, email: &str) -> LibraryResult<Vec<PartyEntity>> {
        Ok(sqlx::query_as::<_, PartyEntity>(
            "SELECT party_id, version, name, email, created_at, updated_at FROM parties \
             WHERE lower(email) = lower($1) ORDER BY seq")
            .bind(email.trim())
            .fetch_all(&self.pool)
            .await?)
    }

    async fn scan(&self) -> LibraryResult<Vec<PartyEntity>> {
        Ok(sqlx::query_as::<_, PartyEntity>(
            "SELECT party_id, version, name, email, created_at, updated_at FROM parties ORDER BY seq")
            .fetch_all(&self.pool)
            .await?)
    }

    async fn search(&self, term: &str) -> LibraryResult<Vec<PartyEntity>> {
        if term.trim().is_empty() {
            return self.scan().await;
        }
        Ok(sqlx::query_as::<_, PartyEntity>(
            "SELECT party_id, version, name, email, created_at, updated_at FROM parties \
             WHERE name ILIKE $1 OR email ILIKE $1 ORDER BY seq")
            .bind(like_pattern(term))
            .fetch_all(&self.pool)
            .await?)
    }
}
