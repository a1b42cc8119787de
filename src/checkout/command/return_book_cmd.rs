use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use crate::checkout::domain::LoanLedger;
use crate::checkout::dto::LoanDto;
use crate::core::command::{Command, CommandError};

pub(crate) struct ReturnBookCommand {
    loan_ledger: Box<dyn LoanLedger>,
}

impl ReturnBookCommand {
    pub(crate) fn new(loan_ledger: Box<dyn LoanLedger>) -> Self {
        Self {
            loan_ledger,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct ReturnBookCommandRequest {
    pub loan_id: String,
}

impl ReturnBookCommandRequest {
    pub fn new(loan_id: &str) -> Self {
        Self {
            loan_id: loan_id.to_string(),
        }
    }
}


#[derive(Debug, Serialize)]
pub(crate) struct ReturnBookCommandResponse {
    pub loan: LoanDto,
}

impl ReturnBookCommandResponse {
    pub fn new(loan: LoanDto) -> Self {
        Self {
            loan,
        }
    }
}

#[async_trait]
impl Command<ReturnBookCommandRequest, ReturnBookCommandResponse> for ReturnBookCommand {
    async fn execute(&self, req: ReturnBookCommandRequest) -> Result<ReturnBookCommandResponse, CommandError> {
        self.loan_ledger.return_loan(req.loan_id.as_str())
            .await.map_err(CommandError::from).map(ReturnBookCommandResponse::new)
    }
}
