use std::sync::Arc;
use async_trait::async_trait;
use tracing::{debug, info, warn};
use crate::books::domain::model::BookEntity;
use crate::books::dto::BookDto;
use crate::books::repository::BookRepository;
use crate::catalog::domain::CatalogService;
use crate::checkout::repository::CheckoutRepository;
use crate::core::domain::Configuration;
use crate::core::library::{LibraryError, LibraryResult};
use crate::core::locks::{BOOK_SCOPE, LockRegistry};
use crate::utils::validate::require_non_blank;

pub(crate) struct CatalogServiceImpl {
    book_repository: Arc<dyn BookRepository>,
    checkout_repository: Arc<dyn CheckoutRepository>,
    locks: Arc<LockRegistry>,
}

impl CatalogServiceImpl {
    pub(crate) fn new(_config: &Configuration, book_repository: Arc<dyn BookRepository>,
                      checkout_repository: Arc<dyn CheckoutRepository>,
                      locks: Arc<LockRegistry>) -> Self {
        Self {
            book_repository,
            checkout_repository,
            locks,
        }
    }
}

#[async_trait]
impl CatalogService for CatalogServiceImpl {
    async fn add_book(&self, book: &BookDto) -> LibraryResult<BookDto> {
        let mut book = book.clone();
        book.title = require_non_blank("title", book.title.as_str())?;
        book.author = require_non_blank("author", book.author.as_str())?;
        book.category = require_non_blank("category", book.category.as_str())?;
        self.book_repository.create(&BookEntity::from(&book)).await?;
        info!(book_id = book.id.as_str(), title = book.title.as_str(), "book added");
        Ok(book)
    }

    async fn remove_book(&self, id: &str) -> LibraryResult<()> {
        let id = require_non_blank("id", id)?;
        let id = id.as_str();
        // same key checkout holds, so a delete cannot race a new loan of this book
        let _guard = self.locks.acquire(BOOK_SCOPE, id).await?;
        let _ = self.book_repository.get(id).await?;
        if let Some(loan) = self.checkout_repository.find_active_by_book(id).await? {
            warn!(book_id = id, loan_id = loan.loan_id.as_str(), "refusing to remove book on loan");
            return Err(LibraryError::conflict(
                format!("book {} is on loan {}", id, loan.loan_id).as_str(), Some("active_loan".to_string())));
        }
        self.book_repository.delete(id).await?;
        info!(book_id = id, "book removed");
        Ok(())
    }

    async fn find_book_by_id(&self, id: &str) -> LibraryResult<BookDto> {
        self.book_repository.get(id).await.map(|b| BookDto::from(&b))
    }

    async fn find_books(&self) -> LibraryResult<Vec<BookDto>> {
        let res = self.book_repository.scan().await?;
        Ok(res.iter().map(BookDto::from).collect())
    }

    async fn search_books(&self, term: &str) -> LibraryResult<Vec<BookDto>> {
        let res = self.book_repository.search(term).await?;
        debug!(term, matches = res.len(), "catalog search");
        Ok(res.iter().map(BookDto::from).collect())
    }
}

impl From<&BookEntity> for BookDto {
    fn from(other: &BookEntity) -> Self {
        Self {
            id: other.book_id.to_string(),
            version: other.version,
            title: other.title.to_string(),
            author: other.author.to_string(),
            category: other.category.to_string(),
        }
    }
}

impl From<&BookDto> for BookEntity {
    fn from(other: &BookDto) -> Self {
        let now = chrono::Utc::now().naive_utc();
        Self {
            book_id: other.id.to_string(),
            version: other.version,
            title: other.title.to_string(),
            author: other.author.to_string(),
            category: other.category.to_string(),
            created_at: now,
            updated_at: now,
        }
    }
}
