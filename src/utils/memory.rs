use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Value;
use crate::core::domain::Versioned;
use crate::core::library::{LibraryError, LibraryResult};

// MemoryTable is an insertion-ordered keyed table guarded by a read-write lock.
// Writes are conditional the same way a conditional put/update is: create fails on
// an existing key and update fails unless the caller holds the current version.
#[derive(Debug)]
pub(crate) struct MemoryTable<E> {
    table_name: String,
    rows: RwLock<IndexMap<String, E>>,
}

impl<E: Versioned + Clone + Serialize> MemoryTable<E> {
    pub(crate) fn new(table_name: &str) -> Self {
        Self {
            table_name: table_name.to_string(),
            rows: RwLock::new(IndexMap::new()),
        }
    }

    fn read(&self) -> LibraryResult<RwLockReadGuard<'_, IndexMap<String, E>>> {
        self.rows.read().map_err(|_| LibraryError::database(
            format!("{} table lock poisoned", self.table_name).as_str(), None, false))
    }

    fn write(&self) -> LibraryResult<RwLockWriteGuard<'_, IndexMap<String, E>>> {
        self.rows.write().map_err(|_| LibraryError::database(
            format!("{} table lock poisoned", self.table_name).as_str(), None, false))
    }

    pub(crate) fn insert(&self, entity: &E) -> LibraryResult<usize> {
        let mut rows = self.write()?;
        let id = entity.id();
        if rows.contains_key(&id) {
            return Err(LibraryError::conflict(
                format!("{} already exists in {}", id, self.table_name).as_str(),
                Some("duplicate_key".to_string())));
        }
        rows.insert(id, entity.clone());
        Ok(1)
    }

    pub(crate) fn update(&self, entity: &E) -> LibraryResult<usize> {
        let mut rows = self.write()?;
        let id = entity.id();
        let existing = rows.get_mut(&id).ok_or_else(|| LibraryError::not_found(
            format!("{} not found in {}", id, self.table_name).as_str()))?;
        if existing.version() != entity.version() {
            return Err(LibraryError::conflict(
                format!("stale version {} for {} in {}, current is {}",
                        entity.version(), id, self.table_name, existing.version()).as_str(),
                Some("stale_version".to_string())));
        }
        let mut next = entity.clone();
        next.set_version(entity.version() + 1);
        *existing = next;
        Ok(1)
    }

    pub(crate) fn get(&self, id: &str) -> LibraryResult<E> {
        self.read()?.get(id).cloned().ok_or_else(|| LibraryError::not_found(
            format!("{} not found for {}", self.table_name, id).as_str()))
    }

    pub(crate) fn delete(&self, id: &str) -> LibraryResult<usize> {
        self.write()?.shift_remove(id).map(|_| 1).ok_or_else(|| LibraryError::not_found(
            format!("{} not found for {}", self.table_name, id).as_str()))
    }

    pub(crate) fn count(&self) -> LibraryResult<usize> {
        Ok(self.read()?.len())
    }

    pub(crate) fn scan(&self) -> LibraryResult<Vec<E>> {
        Ok(self.read()?.values().cloned().collect())
    }

    pub(crate) fn filter<F>(&self, predicate: F) -> LibraryResult<Vec<E>>
        where F: Fn(&E) -> bool {
        Ok(self.read()?.values().filter(|e| predicate(e)).cloned().collect())
    }

    // query matches every predicate key against the serialized form of each row
    pub(crate) fn query(&self, predicate: &HashMap<String, String>) -> LibraryResult<Vec<E>> {
        let rows = self.read()?;
        let mut records = vec![];
        for entity in rows.values() {
            let val = serde_json::to_value(entity)?;
            if matches_predicate(&val, predicate) {
                records.push(entity.clone());
            }
        }
        Ok(records)
    }
}

fn matches_predicate(val: &Value, predicate: &HashMap<String, String>) -> bool {
    predicate.iter().all(|(k, v)| match val.get(k) {
        Some(Value::String(s)) => s == v,
        Some(Value::Null) | None => false,
        Some(other) => other.to_string() == *v,
    })
}

// case-insensitive substring match over any of the given fields
pub(crate) fn contains_term(fields: &[&str], term: &str) -> bool {
    let term = term.trim().to_lowercase();
    term.is_empty() || fields.iter().any(|f| f.to_lowercase().contains(term.as_str()))
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use serde::Serialize;
    use crate::core::domain::{Identifiable, Versioned};
    use crate::core::library::LibraryError;
    use crate::utils::memory::{contains_term, MemoryTable};

    #[derive(Debug, Clone, Serialize)]
    struct Row {
        row_id: String,
        version: i64,
        kind: String,
        size: i64,
    }

    impl Identifiable for Row {
        fn id(&self) -> String {
            self.row_id.to_string()
        }

        fn version(&self) -> i64 {
            self.version
        }
    }

    impl Versioned for Row {
        fn set_version(&mut self, version: i64) {
            self.version = version;
        }
    }

    fn row(id: &str, kind: &str, size: i64) -> Row {
        Row { row_id: id.to_string(), version: 0, kind: kind.to_string(), size }
    }

    #[tokio::test]
    async fn test_should_insert_and_get() {
        let table = MemoryTable::new("rows");
        assert_eq!(1, table.insert(&row("a", "x", 1)).expect("should insert"));
        assert_eq!("x", table.get("a").expect("should get").kind.as_str());
        assert!(matches!(table.insert(&row("a", "y", 1)), Err(LibraryError::Conflict { .. })));
        assert!(matches!(table.get("b"), Err(LibraryError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_should_reject_stale_update() {
        let table = MemoryTable::new("rows");
        let mut first = row("a", "x", 1);
        table.insert(&first).expect("should insert");
        first.kind = "y".to_string();
        table.update(&first).expect("should update");
        assert_eq!(1, table.get("a").expect("should get").version);

        // same version again is now stale
        first.kind = "z".to_string();
        assert!(matches!(table.update(&first), Err(LibraryError::Conflict { .. })));
        assert_eq!("y", table.get("a").expect("should get").kind.as_str());
    }

    #[tokio::test]
    async fn test_should_keep_insertion_order_after_delete() {
        let table = MemoryTable::new("rows");
        for id in ["c", "a", "d", "b"] {
            table.insert(&row(id, "x", 1)).expect("should insert");
        }
        table.delete("a").expect("should delete");
        let ids: Vec<String> = table.scan().expect("should scan").into_iter().map(|r| r.row_id).collect();
        assert_eq!(vec!["c", "d", "b"], ids);
        assert!(matches!(table.delete("a"), Err(LibraryError::NotFound { .. })));
        assert_eq!(3, table.count().expect("should count"));
    }

    #[tokio::test]
    async fn test_should_query_by_predicate() {
        let table = MemoryTable::new("rows");
        table.insert(&row("a", "x", 1)).expect("should insert");
        table.insert(&row("b", "y", 2)).expect("should insert");
        table.insert(&row("c", "x", 2)).expect("should insert");
        let res = table.query(&HashMap::from([("kind".to_string(), "x".to_string())])).expect("should query");
        assert_eq!(2, res.len());
        let res = table.query(&HashMap::from([
            ("kind".to_string(), "x".to_string()),
            ("size".to_string(), "2".to_string()),
        ])).expect("should query");
        assert_eq!(1, res.len());
        assert_eq!("c", res[0].row_id.as_str());
    }

    #[tokio::test]
    async fn test_should_match_term() {
        assert!(contains_term(&["Dune", "Herbert"], "herb"));
        assert!(contains_term(&["Dune", "Herbert"], "  DUNE "));
        assert!(contains_term(&["Dune"], ""));
        assert!(!contains_term(&["Dune", "Herbert"], "asimov"));
    }
}
