use std::collections::HashMap;

use async_trait::async_trait;

use crate::checkout::domain::model::LoanEntity;
use crate::checkout::repository::CheckoutRepository;
use crate::core::library::{LibraryError, LibraryResult};
use crate::core::repository::Repository;
use crate::utils::memory::MemoryTable;

#[derive(Debug)]
pub struct MemoryCheckoutRepository {
    table: MemoryTable<LoanEntity>,
}

impl MemoryCheckoutRepository {
    pub(crate) fn new(table_name: &str) -> Self {
        Self {
            table: MemoryTable::new(table_name),
        }
    }
}

#[async_trait]
impl Repository<LoanEntity> for MemoryCheckoutRepository {
    async fn create(&self, entity: &LoanEntity) -> LibraryResult<usize> {
        self.table.insert(entity)
    }

    async fn update(&self, entity: &LoanEntity) -> LibraryResult<usize> {
        self.table.update(entity)
    }

    async fn get(&self, id: &str) -> LibraryResult<LoanEntity> {
        self.table.get(id)
    }

    // the ledger is append-only
    async fn delete(&self, id: &str) -> LibraryResult<usize> {
        let _ = self.table.get(id)?;
        Err(LibraryError::conflict(format!("loan {} cannot be deleted", id).as_str(),
                                   Some("append_only".to_string())))
    }

    async fn query(&self, predicate: &HashMap<String, String>) -> LibraryResult<Vec<LoanEntity>> {
        self.table.query(predicate)
    }

    async fn count(&self) -> LibraryResult<usize> {
        self.table.count()
    }
}

#[async_trait]
impl CheckoutRepository for MemoryCheckoutRepository {
    async fn scan(&self) -> LibraryResult<Vec<LoanEntity>> {
        self.table.scan()
    }

    async fn find_active(&self) -> LibraryResult<Vec<LoanEntity>> {
        self.table.filter(LoanEntity::is_active)
    }

    async fn find_active_by_book(&self, book_id: &str) -> LibraryResult<Option<LoanEntity>> {
        let active = self.table.filter(|l| l.is_active() && l.book_id == book_id)?;
        Ok(active.into_iter().next())
    }

    async fn find_active_by_user(&self, user_id: &str) -> LibraryResult<Vec<LoanEntity>> {
        self.table.filter(|l| l.is_active() && l.user_id == user_id)
    }
}
