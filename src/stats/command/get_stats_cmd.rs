use async_trait::async_trait;
use serde::Serialize;
use crate::core::command::{Command, CommandError};
use crate::stats::domain::StatisticsService;
use crate::stats::dto::StatisticsDto;

pub(crate) struct GetStatsCommand {
    statistics_service: Box<dyn StatisticsService>,
}

impl GetStatsCommand {
    pub(crate) fn new(statistics_service: Box<dyn StatisticsService>) -> Self {
        Self {
            statistics_service,
        }
    }
}

#[derive(Debug, Default)]
pub(crate) struct GetStatsCommandRequest {}

#[derive(Debug, Serialize)]
pub(crate) struct GetStatsCommandResponse {
    pub statistics: StatisticsDto,
}

impl GetStatsCommandResponse {
    pub fn new(statistics: StatisticsDto) -> Self {
        Self {
            statistics,
        }
    }
}

#[async_trait]
impl Command<GetStatsCommandRequest, GetStatsCommandResponse> for GetStatsCommand {
    async fn execute(&self, _req: GetStatsCommandRequest) -> Result<GetStatsCommandResponse, CommandError> {
        self.statistics_service.compute().await
            .map_err(CommandError::from).map(GetStatsCommandResponse::new)
    }
}
