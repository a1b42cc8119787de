use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use crate::books::domain::Book;
use crate::checkout::domain::model::LoanEntity;
use crate::core::domain::Identifiable;
use crate::core::library::LoanStatus;
use crate::patrons::domain::Patron;
use crate::utils::date::{opt_serializer, serializer};


// LoanDto abstracts the book that is checked out or borrowed.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct LoanDto {
    pub id: String,
    #[serde(skip)]
    pub version: i64,
    #[serde(skip)]
    pub branch_id: String,
    pub book_id: String,
    pub user_id: String,
    #[serde(with = "serializer")]
    pub borrow_date: NaiveDateTime,
    #[serde(with = "opt_serializer")]
    pub return_date: Option<NaiveDateTime>,
    pub status: LoanStatus,
}

impl LoanDto {
    pub fn from_patron_book(branch_id: &str, patron: &dyn Patron, book: &dyn Book) -> Self {
        LoanDto::from(&LoanEntity::new(branch_id, book.id().as_str(), patron.id().as_str()))
    }

    pub fn is_active(&self) -> bool {
        self.return_date.is_none()
    }
}

impl Identifiable for LoanDto {
    fn id(&self) -> String {
        self.id.to_string()
    }

    fn version(&self) -> i64 {
        self.version
    }
}

impl From<&LoanEntity> for LoanDto {
    fn from(other: &LoanEntity) -> LoanDto {
        LoanDto {
            id: other.loan_id.to_string(),
            version: other.version,
            branch_id: other.branch_id.to_string(),
            book_id: other.book_id.to_string(),
            user_id: other.user_id.to_string(),
            borrow_date: other.borrow_date,
            return_date: other.return_date,
            status: other.status(),
        }
    }
}

impl From<&LoanDto> for LoanEntity {
    fn from(other: &LoanDto) -> LoanEntity {
        LoanEntity {
            loan_id: other.id.to_string(),
            version: other.version,
            branch_id: other.branch_id.to_string(),
            book_id: other.book_id.to_string(),
            user_id: other.user_id.to_string(),
            borrow_date: other.borrow_date,
            return_date: other.return_date,
        }
    }
}
