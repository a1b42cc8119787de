use axum::{
    extract::{Path, Query, State},
    response::Json,
};
use serde_json::Value;
use crate::core::command::Command;
use crate::core::controller::{AppState, json_to_server_error, ServerError};
use crate::patrons::command::add_patron_cmd::{AddPatronCommand, AddPatronCommandRequest, AddPatronCommandResponse};
use crate::patrons::command::get_patron_cmd::{GetPatronCommand, GetPatronCommandRequest, GetPatronCommandResponse};
use crate::patrons::command::list_patrons_cmd::{ListPatronsCommand, ListPatronsCommandRequest, ListPatronsCommandResponse};
use crate::patrons::command::remove_patron_cmd::{RemovePatronCommand, RemovePatronCommandRequest, RemovePatronCommandResponse};
use crate::patrons::domain::PatronService;
use crate::patrons::factory;

fn build_service(state: &AppState) -> Box<dyn PatronService> {
    factory::create_patron_service(&state.config, &state.store)
}

pub(crate) async fn add_patron(
    State(state): State<AppState>,
    json: Json<Value>) -> Result<Json<AddPatronCommandResponse>, ServerError> {
    let req: AddPatronCommandRequest = serde_json::from_value(json.0).map_err(json_to_server_error)?;
    let res = AddPatronCommand::new(build_service(&state)).execute(req).await?;
    Ok(Json(res))
}

pub(crate) async fn find_patrons(
    State(state): State<AppState>,
    Query(req): Query<ListPatronsCommandRequest>) -> Result<Json<ListPatronsCommandResponse>, ServerError> {
    let res = ListPatronsCommand::new(build_service(&state)).execute(req).await?;
    Ok(Json(res))
}

pub(crate) async fn find_patron_by_id(
    State(state): State<AppState>,
    Path(patron_id): Path<String>) -> Result<Json<GetPatronCommandResponse>, ServerError> {
    let req = GetPatronCommandRequest { patron_id };
    let res = GetPatronCommand::new(build_service(&state)).execute(req).await?;
    Ok(Json(res))
}

pub(crate) async fn remove_patron(
    State(state): State<AppState>,
    Path(patron_id): Path<String>) -> Result<Json<RemovePatronCommandResponse>, ServerError> {
    let req = RemovePatronCommandRequest { patron_id };
    let res = RemovePatronCommand::new(build_service(&state)).execute(req).await?;
    Ok(Json(res))
}
