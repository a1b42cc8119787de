pub(crate) mod memory_party_repository;
pub(crate) mod pg_party_repository;
use async_trait::async_trait;
use crate::core::library::LibraryResult;
use crate::core::repository::Repository;
use crate::parties::domain::model::PartyEntity;

#[async_trait]
pub(crate) trait PartyRepository: Repository<PartyEntity> {
    // emails compare case-insensitively
    async fn find_by_email(&self, email: &str) -> LibraryResult<Vec<PartyEntity>>;

    async fn scan(&self) -> LibraryResult<Vec<PartyEntity>>;

    // case-insensitive substring match over name and email
    async fn search(&self, term: &str) -> LibraryResult<Vec<PartyEntity>>;
}
