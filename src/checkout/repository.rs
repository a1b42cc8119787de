pub mod memory_checkout_repository;
pub mod pg_checkout_repository;

use async_trait::async_trait;
use crate::checkout::domain::model::LoanEntity;
use crate::core::library::LibraryResult;
use crate::core::repository::Repository;


#[async_trait]
pub(crate) trait CheckoutRepository : Repository<LoanEntity> {
    // all loans in insertion order
    async fn scan(&self) -> LibraryResult<Vec<LoanEntity>>;

    async fn find_active(&self) -> LibraryResult<Vec<LoanEntity>>;

    // the single loan that currently holds the book, if any
    async fn find_active_by_book(&self, book_id: &str) -> LibraryResult<Option<LoanEntity>>;

    async fn find_active_by_user(&self, user_id: &str) -> LibraryResult<Vec<LoanEntity>>;
}
