use serde::{Deserialize, Serialize};
use uuid::Uuid;
use crate::books::domain::Book;
use crate::core::domain::Identifiable;

// BookDto is a data transfer object for Catalog service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct BookDto {
    pub id: String,
    #[serde(skip)]
    pub version: i64,
    pub title: String,
    pub author: String,
    pub category: String,
}

impl BookDto {
    pub fn new(title: &str, author: &str, category: &str) -> BookDto {
        BookDto {
            id: Uuid::new_v4().to_string(),
            version: 0,
            title: title.to_string(),
            author: author.to_string(),
            category: category.to_string(),
        }
    }
}

impl Identifiable for BookDto {
    fn id(&self) -> String {
        self.id.to_string()
    }

    fn version(&self) -> i64 {
        self.version
    }
}

impl Book for BookDto {
    fn title(&self) -> &str {
        self.title.as_str()
    }
}
