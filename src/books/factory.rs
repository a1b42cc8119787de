use std::sync::Arc;
use crate::books::repository::BookRepository;
use crate::books::repository::memory_book_repository::MemoryBookRepository;
use crate::books::repository::pg_book_repository::PgBookRepository;
use crate::core::repository::StorageBackend;

pub(crate) fn create_book_repository(backend: &StorageBackend) -> Arc<dyn BookRepository> {
    match backend {
        StorageBackend::Memory => Arc::new(MemoryBookRepository::new("books")),
        StorageBackend::Postgres(pool) => Arc::new(PgBookRepository::new(pool.clone())),
    }
}
