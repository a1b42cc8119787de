pub mod service;

use async_trait::async_trait;
use crate::core::library::LibraryResult;
use crate::stats::dto::StatisticsDto;

// StatisticsService derives reporting figures from the current catalog, patrons and ledger.
#[async_trait]
pub(crate) trait StatisticsService: Sync + Send {
    async fn compute(&self) -> LibraryResult<StatisticsDto>;
}
