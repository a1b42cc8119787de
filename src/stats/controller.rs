use axum::{
    extract::State,
    response::Json,
};
use crate::core::command::Command;
use crate::core::controller::{AppState, ServerError};
use crate::stats::command::get_stats_cmd::{GetStatsCommand, GetStatsCommandRequest, GetStatsCommandResponse};
use crate::stats::factory;

pub(crate) async fn get_statistics(
    State(state): State<AppState>) -> Result<Json<GetStatsCommandResponse>, ServerError> {
    let svc = factory::create_statistics_service(&state.config, &state.store);
    let res = GetStatsCommand::new(svc).execute(GetStatsCommandRequest::default()).await?;
    Ok(Json(res))
}
