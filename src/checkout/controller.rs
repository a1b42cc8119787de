use axum::{
    extract::{Path, Query, State},
    response::Json,
};
use serde_json::Value;
use crate::checkout::command::checkout_book_cmd::{CheckoutBookCommand, CheckoutBookCommandRequest, CheckoutBookCommandResponse};
use crate::checkout::command::list_loans_cmd::{ListLoansCommand, ListLoansCommandRequest, ListLoansCommandResponse};
use crate::checkout::command::return_book_cmd::{ReturnBookCommand, ReturnBookCommandRequest, ReturnBookCommandResponse};
use crate::checkout::domain::LoanLedger;
use crate::checkout::factory;
use crate::core::command::Command;
use crate::core::controller::{AppState, json_to_server_error, ServerError};

fn build_ledger(state: &AppState) -> Box<dyn LoanLedger> {
    factory::create_loan_ledger(&state.config, &state.store)
}

pub(crate) async fn checkout_book(
    State(state): State<AppState>,
    json: Json<Value>) -> Result<Json<CheckoutBookCommandResponse>, ServerError> {
    let req: CheckoutBookCommandRequest = serde_json::from_value(json.0).map_err(json_to_server_error)?;
    let res = CheckoutBookCommand::new(build_ledger(&state)).execute(req).await?;
    Ok(Json(res))
}

pub(crate) async fn return_book(
    State(state): State<AppState>,
    Path(loan_id): Path<String>) -> Result<Json<ReturnBookCommandResponse>, ServerError> {
    let req = ReturnBookCommandRequest { loan_id };
    let res = ReturnBookCommand::new(build_ledger(&state)).execute(req).await?;
    Ok(Json(res))
}

pub(crate) async fn find_loans(
    State(state): State<AppState>,
    Query(req): Query<ListLoansCommandRequest>) -> Result<Json<ListLoansCommandResponse>, ServerError> {
    let res = ListLoansCommand::new(build_ledger(&state)).execute(req).await?;
    Ok(Json(res))
}
