use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use crate::checkout::domain::{LoanFilter, LoanLedger};
use crate::checkout::dto::LoanDto;
use crate::core::command::{Command, CommandError};

pub(crate) struct ListLoansCommand {
    loan_ledger: Box<dyn LoanLedger>,
}

impl ListLoansCommand {
    pub(crate) fn new(loan_ledger: Box<dyn LoanLedger>) -> Self {
        Self {
            loan_ledger,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ListLoansCommandRequest {
    pub active: Option<bool>,
    pub user_id: Option<String>,
    pub book_id: Option<String>,
}

impl From<ListLoansCommandRequest> for LoanFilter {
    fn from(other: ListLoansCommandRequest) -> Self {
        LoanFilter {
            active: other.active,
            user_id: other.user_id,
            book_id: other.book_id,
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct ListLoansCommandResponse {
    pub loans: Vec<LoanDto>,
}

impl ListLoansCommandResponse {
    pub fn new(loans: Vec<LoanDto>) -> Self {
        Self {
            loans,
        }
    }
}

#[async_trait]
impl Command<ListLoansCommandRequest, ListLoansCommandResponse> for ListLoansCommand {
    async fn execute(&self, req: ListLoansCommandRequest) -> Result<ListLoansCommandResponse, CommandError> {
        let filter = LoanFilter::from(req);
        let res = if filter == LoanFilter::default() {
            self.loan_ledger.find_loans().await
        } else {
            self.loan_ledger.query_loans(&filter).await
        };
        res.map_err(CommandError::from).map(ListLoansCommandResponse::new)
    }
}
