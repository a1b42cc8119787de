pub mod memory_book_repository;
pub mod pg_book_repository;

use async_trait::async_trait;
use crate::books::domain::model::BookEntity;
use crate::core::library::LibraryResult;
use crate::core::repository::Repository;


#[async_trait]
pub(crate) trait BookRepository: Repository<BookEntity> {
    // all books in insertion order
    async fn scan(&self) -> LibraryResult<Vec<BookEntity>>;

    // case-insensitive substring match over title, author and category
    async fn search(&self, term: &str) -> LibraryResult<Vec<BookEntity>>;
}
