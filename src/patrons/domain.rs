pub mod service;

use async_trait::async_trait;
use crate::core::domain::Identifiable;
use crate::core::library::LibraryResult;
use crate::patrons::dto::PatronDto;

#[async_trait]
pub(crate) trait PatronService: Sync + Send {
    async fn add_patron(&self, patron: &PatronDto) -> LibraryResult<PatronDto>;
    async fn remove_patron(&self, id: &str) -> LibraryResult<()>;
    async fn find_patron_by_id(&self, id: &str) -> LibraryResult<PatronDto>;
    async fn find_patrons(&self) -> LibraryResult<Vec<PatronDto>>;
    async fn search_patrons(&self, term: &str) -> LibraryResult<Vec<PatronDto>>;
}

pub(crate) trait Patron: Identifiable {
    fn name(&self) -> &str;
}
