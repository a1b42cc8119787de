use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use crate::checkout::domain::LoanLedger;
use crate::checkout::dto::LoanDto;
use crate::core::command::{Command, CommandError};

pub(crate) struct CheckoutBookCommand {
    loan_ledger: Box<dyn LoanLedger>,
}

impl CheckoutBookCommand {
    pub(crate) fn new(loan_ledger: Box<dyn LoanLedger>) -> Self {
        Self {
            loan_ledger,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CheckoutBookCommandRequest {
    book_id: String,
    user_id: String,
}

impl CheckoutBookCommandRequest {
    pub fn new(book_id: &str, user_id: &str) -> Self {
        Self {
            book_id: book_id.to_string(),
            user_id: user_id.to_string(),
        }
    }
}


#[derive(Debug, Serialize)]
pub(crate) struct CheckoutBookCommandResponse {
    pub loan: LoanDto,
}

impl CheckoutBookCommandResponse {
    pub fn new(loan: LoanDto) -> Self {
        Self {
            loan,
        }
    }
}

#[async_trait]
impl Command<CheckoutBookCommandRequest, CheckoutBookCommandResponse> for CheckoutBookCommand {
    async fn execute(&self, req: CheckoutBookCommandRequest) -> Result<CheckoutBookCommandResponse, CommandError> {
        self.loan_ledger.checkout(req.book_id.as_str(), req.user_id.as_str())
            .await.map_err(CommandError::from).map(CheckoutBookCommandResponse::new)
    }
}
