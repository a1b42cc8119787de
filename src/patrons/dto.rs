use uuid::Uuid;
use serde::{Deserialize, Serialize};
use crate::core::domain::Identifiable;
use crate::patrons::domain::Patron;


// PatronDto abstracts a library member along with the titles they currently hold.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct PatronDto {
    pub id: String,
    #[serde(skip)]
    pub version: i64,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub borrowed_books: Vec<String>,
}

impl PatronDto {
    pub(crate) fn new(name: &str, email: &str) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            version: 0,
            name: name.to_string(),
            email: email.to_string(),
            borrowed_books: vec![],
        }
    }
}

impl Identifiable for PatronDto {
    fn id(&self) -> String {
        self.id.to_string()
    }

    fn version(&self) -> i64 {
        self.version
    }
}

impl Patron for PatronDto {
    fn name(&self) -> &str {
        self.name.as_str()
    }
}
