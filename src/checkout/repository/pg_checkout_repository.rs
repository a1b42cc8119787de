use std::collections::HashMap;

use async_trait::async_trait;
use sqlx::PgPool;

use crate::checkout::domain::model::LoanEntity;
use crate::checkout::repository::CheckoutRepository;
use crate::core::library::{LibraryError, LibraryResult};
use crate::core::repository::Repository;
use crate::utils::pg::{duplicate, missing, stale_version, where_clause};

const TABLE: &str = "loans";
const QUERYABLE: [&str; 5] = ["loan_id", "version", "branch_id", "book_id", "user_id"];

#[derive(Debug)]
pub(crate) struct PgCheckoutRepository {
    pool: PgPool,
}

impl PgCheckoutRepository {
    pub(crate) fn new(pool: PgPool) -> Self {
        Self {
            pool,
        }
    }
}

#[async_trait]
impl Repository<LoanEntity> for PgCheckoutRepository {
    // the partial unique index on active loans rejects a second active loan for a book
    async fn create(&self, entity: &LoanEntity) -> LibraryResult<usize> {
        let res = sqlx::query(
            "INSERT INTO loans (loan_id, version, branch_id, book_id, user_id, borrow_date, return_date) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) ON CONFLICT (loan_id) DO NOTHING")
            .bind(&entity.loan_id)
            .bind(entity.version)
            .bind(&entity.branch_id)
            .bind(&entity.book_id)
            .bind(&entity.user_id)
            .bind(entity.borrow_date)
            .bind(entity.return_date)
            .execute(&self.pool)
            .await
            .map_err(|err| match LibraryError::from(err) {
                LibraryError::Conflict { message, .. } =>
                    LibraryError::conflict(message.as_str(), Some("book_on_loan".to_string())),
                other => other,
            })?;
        if res.rows_affected() == 0 {
            return Err(duplicate(TABLE, entity.loan_id.as_str()));
        }
        Ok(1)
    }

    // only the return date ever changes
    async fn update(&self, entity: &LoanEntity) -> LibraryResult<usize> {
        let res = sqlx::query(
            "UPDATE loans SET version = version + 1, return_date = $3 WHERE loan_id = $1 AND version = $2")
            .bind(&entity.loan_id)
            .bind(entity.version)
            .bind(entity.return_date)
            .execute(&self.pool)
            .await?;
        if res.rows_affected() == 0 {
            let _ = self.get(entity.loan_id.as_str()).await?;
            return Err(stale_version(TABLE, entity.loan_id.as_str(), entity.version));
        }
        Ok(1)
    }

    async fn get(&self, id: &str) -> LibraryResult<LoanEntity> {
        sqlx::query_as::<_, LoanEntity>(
            "SELECT loan_id, version, branch_id, book_id, user_id, borrow_date, return_date FROM loans \
             WHERE loan_id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| missing(TABLE, id))
    }

    // the ledger is append-only
    async fn delete(&self, id: &str) -> LibraryResult<usize> {
        let _ = self.get(id).await?;
        Err(LibraryError::conflict(format!("loan {} cannot be deleted", id).as_str(),
                                   Some("append_only".to_string())))
    }

    async fn query(&self, predicate: &HashMap<String, String>) -> LibraryResult<Vec<LoanEntity>> {
        let Some((clause, values)) = where_clause(&QUERYABLE, predicate) else {
            return Ok(vec![]);
        };
        let sql = format!(
            "SELECT loan_id, version, branch_id, book_id, user_id, borrow_date, return_date FROM loans{} \
             ORDER BY seq", clause);
        let mut query = sqlx::query_as::<_, LoanEntity>(sql.as_str());
        for value in values {
            query = query.bind(value);
        }
        Ok(query.fetch_all(&self.pool).await?)
    }

    async fn count(&self) -> LibraryResult<usize> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM loans")
            .fetch_one(&self.pool)
            .await?;
        Ok(count as usize)
    }
}

#[async_trait]
impl CheckoutRepository for PgCheckoutRepository {
    async fn scan(&self) -> LibraryResult<Vec<LoanEntity>> {
        Ok(sqlx::query_as::<_, LoanEntity>(
            "SELECT loan_id, version, branch_id, book_id, user_id, borrow_date, return_date FROM loans ORDER BY seq")
            .fetch_all(&self.pool)
            .await?)
    }

    async fn find_active(&self) -> LibraryResult<Vec<LoanEntity>> {
        Ok(sqlx::query_as::<_, LoanEntity>(
            "SELECT loan_id, version, branch_id, book_id, user_id, borrow_date, return_date FROM loans \
             WHERE return_date IS NULL ORDER BY seq")
            .fetch_all(&self.pool)
            .await?)
    }

    async fn find_active_by_book(&self, book_id: &str) -> LibraryResult<Option<LoanEntity>> {
        Ok(sqlx::query_as::<_, LoanEntity>(
            "SELECT loan_id, version, branch_id, book_id, user_id, borrow_date, return_date FROM loans \
             WHERE return_date IS NULL AND book_id = $1")
            .bind(book_id)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn find_active_by_user(&self, user_id: &str) -> LibraryResult<Vec<LoanEntity>> {
        Ok(sqlx::query_as::<_, LoanEntity>(
            "SELECT loan_id, version, branch_id, book_id, user_id, borrow_date, return_date FROM loans \
             WHERE return_date IS NULL AND user_id = $1 ORDER BY seq")
            .bind(user_id)
            .fetch_all(&self.pool)
            .await?)
    }
}
