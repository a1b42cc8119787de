use async_trait::async_trait;
use crate::checkout::dto::LoanDto;
use crate::core::library::LibraryResult;

pub mod model;
pub mod service;

// LoanFilter narrows a loan listing; every populated field must match.
#[derive(Debug, Default, Clone, PartialEq)]
pub(crate) struct LoanFilter {
    pub active: Option<bool>,
    pub user_id: Option<String>,
    pub book_id: Option<String>,
}

#[async_trait]
pub(crate) trait LoanLedger: Sync + Send {
    async fn checkout(&self, book_id: &str, user_id: &str) -> LibraryResult<LoanDto>;
    async fn return_loan(&self, loan_id: &str) -> LibraryResult<LoanDto>;
    async fn find_loans(&self) -> LibraryResult<Vec<LoanDto>>;
    async fn find_active_loans(&self) -> LibraryResult<Vec<LoanDto>>;
    async fn find_loans_by_user(&self, user_id: &str) -> LibraryResult<Vec<LoanDto>>;
    async fn find_loans_by_book(&self, book_id: &str) -> LibraryResult<Vec<LoanDto>>;
    async fn query_loans(&self, filter: &LoanFilter) -> LibraryResult<Vec<LoanDto>>;
}
