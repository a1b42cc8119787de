use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use sqlx::PgPool;
use crate::books::factory::create_book_repository;
use crate::books::repository::BookRepository;
use crate::checkout::factory::create_checkout_repository;
use crate::checkout::repository::CheckoutRepository;
use crate::core::domain::Configuration;
use crate::core::library::LibraryResult;
use crate::core::locks::LockRegistry;
use crate::parties::factory::create_party_repository;
use crate::parties::repository::PartyRepository;
use crate::utils::pg::{build_pool, migrate};

#[async_trait]
pub trait Repository<Entity>: Sync + Send {
    // create an entity
    async fn create(&self, entity: &Entity) -> LibraryResult<usize>;

    // updates an entity if its version still matches the stored one
    async fn update(&self, entity: &Entity) -> LibraryResult<usize>;

    // get an entity
    async fn get(&self, id: &str) -> LibraryResult<Entity>;

    // delete an entity
    async fn delete(&self, id: &str) -> LibraryResult<usize>;

    // find by exact field values, in insertion order
    async fn query(&self, predicate: &HashMap::<String, String>) -> LibraryResult<Vec<Entity>>;

    // number of stored entities
    async fn count(&self) -> LibraryResult<usize>;
}

// StorageBackend picks where books, patrons and loans are kept.
#[derive(Debug, Clone)]
pub(crate) enum StorageBackend {
    Memory,
    Postgres(PgPool),
}

impl StorageBackend {
    // postgres when a database url is configured, memory otherwise
    pub(crate) async fn from_config(config: &Configuration) -> LibraryResult<Self> {
        match &config.database_url {
            Some(url) => {
                let pool = build_pool(config, url.as_str()).await?;
                migrate(&pool).await?;
                Ok(StorageBackend::Postgres(pool))
            }
            None => Ok(StorageBackend::Memory),
        }
    }

    pub(crate) fn name(&self) -> &'static str {
        match self {
            StorageBackend::Memory => "memory",
            StorageBackend::Postgres(_) => "postgres",
        }
    }
}

// RepositoryStore owns the process-wide stores and the lock registry shared by
// every service built from it.
#[derive(Clone)]
pub(crate) struct RepositoryStore {
    pub(crate) books: Arc<dyn BookRepository>,
    pub(crate) parties: Arc<dyn PartyRepository>,
    pub(crate) checkouts: Arc<dyn CheckoutRepository>,
    pub(crate) locks: Arc<LockRegistry>,
}

impl RepositoryStore {
    pub(crate) fn new(backend: &StorageBackend) -> Self {
        RepositoryStore {
            books: create_book_repository(backend),
            parties: create_party_repository(backend),
            checkouts: create_checkout_repository(backend),
            locks: Arc::new(LockRegistry::new()),
        }
    }

    pub(crate) fn in_memory() -> Self {
        Self::new(&StorageBackend::Memory)
    }
}
