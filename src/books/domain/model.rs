use chrono::{NaiveDateTime, Utc};
use uuid::Uuid;
use serde::{Deserialize, Serialize};
use crate::core::domain::{Identifiable, Versioned};
use crate::utils::date::serializer;

// BookEntity abstracts a catalog title; the library keeps a single record per title.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub(crate) struct BookEntity {
    pub book_id: String,
    pub version: i64,
    pub title: String,
    pub author: String,
    pub category: String,
    #[serde(with = "serializer")]
    pub created_at: NaiveDateTime,
    #[serde(with = "serializer")]
    pub updated_at: NaiveDateTime,
}

impl BookEntity {
    pub fn new(title: &str, author: &str, category: &str) -> Self {
        Self {
            book_id: Uuid::new_v4().to_string(),
            version: 0,
            title: title.to_string(),
            author: author.to_string(),
            category: category.to_string(),
            created_at: Utc::now().naive_utc(),
            updated_at: Utc::now().naive_utc(),
        }
    }
}

impl Identifiable for BookEntity {
    fn id(&self) -> String {
        self.book_id.to_string()
    }

    fn version(&self) -> i64 {
        self.version
    }
}

impl Versioned for BookEntity {
    fn set_version(&mut self, version: i64) {
        self.version = version;
    }
}
