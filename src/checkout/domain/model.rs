use chrono::{NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use crate::core::domain::{Identifiable, Versioned};
use crate::core::library::LoanStatus;
use crate::utils::date::{opt_serializer, serializer};

// LoanEntity records one lending of a book to a patron. It is created active and
// mutated at most once, when the book comes back.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub(crate) struct LoanEntity {
    pub loan_id: String,
    pub version: i64,
    pub branch_id: String,
    pub book_id: String,
    pub user_id: String,
    #[serde(with = "serializer")]
    pub borrow_date: NaiveDateTime,
    #[serde(with = "opt_serializer")]
    pub return_date: Option<NaiveDateTime>,
}

impl LoanEntity {
    pub fn new(branch_id: &str, book_id: &str, user_id: &str) -> Self {
        Self {
            loan_id: Uuid::new_v4().to_string(),
            version: 0,
            branch_id: branch_id.to_string(),
            book_id: book_id.to_string(),
            user_id: user_id.to_string(),
            borrow_date: Utc::now().naive_utc(),
            return_date: None,
        }
    }

    pub fn is_active(&self) -> bool {
        self.return_date.is_none()
    }

    pub fn status(&self) -> LoanStatus {
        if self.is_active() { LoanStatus::Active } else { LoanStatus::Returned }
    }
}

impl Identifiable for LoanEntity {
    fn id(&self) -> String {
        self.loan_id.to_string()
    }

    fn version(&self) -> i64 {
        self.version
    }
}

impl Versioned for LoanEntity {
    fn set_version(&mut self, version: i64) {
        self.version = version;
    }
}
