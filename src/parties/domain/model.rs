use chrono::{NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use crate::core::domain::{Identifiable, Versioned};
use crate::utils::date::serializer;

// Party abstracts a registered library member who can borrow books.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub(crate) struct PartyEntity {
    pub party_id: String,
    pub version: i64,
    pub name: String,
    pub email: String,
    #[serde(with = "serializer")]
    pub created_at: NaiveDateTime,
    #[serde(with = "serializer")]
    pub updated_at: NaiveDateTime,
}

impl PartyEntity {
    pub fn new(name: &str, email: &str) -> Self {
        Self {
            party_id: Uuid::new_v4().to_string(),
            version: 0,
            name: name.to_string(),
            email: email.to_string(),
            created_at: Utc::now().naive_utc(),
            updated_at: Utc::now().naive_utc(),
        }
    }
}

impl Identifiable for PartyEntity {
    fn id(&self) -> String {
        self.party_id.to_string()
    }

    fn version(&self) -> i64 {
        self.version
    }
}

impl Versioned for PartyEntity {
    fn set_version(&mut self, version: i64) {
        self.version = version;
    }
}
