use std::collections::HashMap;

use async_trait::async_trait;

use crate::core::library::LibraryResult;
use crate::core::repository::Repository;
use crate::parties::domain::model::PartyEntity;
use crate::parties::repository::PartyRepository;
use crate::utils::memory::{contains_term, MemoryTable};

#[derive(Debug)]
pub struct MemoryPartyRepository {
    table: MemoryTable<PartyEntity>,
}

impl MemoryPartyRepository {
    pub(crate) fn new(table_name: &str) -> Self {
        Self {
            table: MemoryTable::new(table_name),
        }
    }
}

#[async_trait]
impl Repository<PartyEntity> for MemoryPartyRepository {
    async fn create(&self, entity: &PartyEntity) -> LibraryResult<usize> {
        self.table.insert(entity)
    }

    async fn update(&self, entity: &PartyEntity) -> LibraryResult<usize> {
        self.table.update(entity)
    }

    async fn get(&self, id: &str) -> LibraryResult<PartyEntity> {
        self.table.get(id)
    }

    async fn delete(&self, id: &str) -> LibraryResult<usize> {
        self.table.delete(id)
    }

    async fn query(&self, predicate: &HashMap<String, String>) -> LibraryResult<Vec<PartyEntity>> {
        self.table.query(predicate)
    }

    async fn count(&self) -> LibraryResult<usize> {
        self.table.count()
    }
}

#[async_trait]
impl PartyRepository for MemoryPartyRepository {
    async fn find_by_email(&self, email: &str) -> LibraryResult<Vec<PartyEntity>> {
        let email = email.trim();
        self.table.filter(|p| p.email.eq_ignore_ascii_case(email))
    }

    async fn scan(&self) -> LibraryResult<Vec<PartyEntity>> {
        self.table.scan()
    }

    async fn search(&self, term: &str) -> LibraryResult<Vec<PartyEntity>> {
        self.table.filter(|p| contains_term(&[p.name.as_str(), p.email.as_str()], term))
    }
}
