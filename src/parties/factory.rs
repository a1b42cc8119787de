use std::sync::Arc;
use crate::core::repository::StorageBackend;
use crate::parties::repository::memory_party_repository::MemoryPartyRepository;
use crate::parties::repository::pg_party_repository::PgPartyRepository;
use crate::parties::repository::PartyRepository;

pub(crate) fn create_party_repository(backend: &StorageBackend) -> Arc<dyn PartyRepository> {
    match backend {
        StorageBackend::Memory => Arc::new(MemoryPartyRepository::new("parties")),
        StorageBackend::Postgres(pool) => Arc::new(PgPartyRepository::new(pool.clone())),
    }
}
