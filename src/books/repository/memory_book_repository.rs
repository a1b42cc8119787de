use std::collections::HashMap;

use async_trait::async_trait;

use crate::books::domain::model::BookEntity;
use crate::books::repository::BookRepository;
use crate::core::library::LibraryResult;
use crate::core::repository::Repository;
use crate::utils::memory::{contains_term, MemoryTable};

#[derive(Debug)]
pub struct MemoryBookRepository {
    table: MemoryTable<BookEntity>,
}

impl MemoryBookRepository {
    pub(crate) fn new(table_name: &str) -> Self {
        Self {
            table: MemoryTable::new(table_name),
        }
    }
}

#[async_trait]
impl Repository<BookEntity> for MemoryBookRepository {
    async fn create(&self, entity: &BookEntity) -> LibraryResult<usize> {
        self.table.insert(entity)
    }

    async fn update(&self, entity: &BookEntity) -> LibraryResult<usize> {
        self.table.update(entity)
    }

    async fn get(&self, id: &str) -> LibraryResult<BookEntity> {
        self.table.get(id)
    }

    async fn delete(&self, id: &str) -> LibraryResult<usize> {
        self.table.delete(id)
    }

    async fn query(&self, predicate: &HashMap<String, String>) -> LibraryResult<Vec<BookEntity>> {
        self.table.query(predicate)
    }

    async fn count(&self) -> LibraryResult<usize> {
        self.table.count()
    }
}

#[async_trait]
impl BookRepository for MemoryBookRepository {
    async fn scan(&self) -> LibraryResult<Vec<BookEntity>> {
        self.table.scan()
    }

    async fn search(&self, term: &str) -> LibraryResult<Vec<BookEntity>> {
        self.table.filter(|b| contains_term(
            &[b.title.as_str(), b.author.as_str(), b.category.as_str()], term))
    }
}
