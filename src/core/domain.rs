use config::{Config, Environment};
use serde::{Deserialize, Serialize};
use crate::core::library::{LibraryError, LibraryResult};

// Identifiable defines common traits that can be shared by persistent objects
pub trait Identifiable : Sync + Send {
    fn id(&self) -> String;
    fn version(&self) -> i64;
}

// Versioned lets a store bump the optimistic-locking counter after a successful write
pub trait Versioned : Identifiable {
    fn set_version(&mut self, version: i64);
}

pub(crate) const DEFAULT_PORT: u16 = 8080;
pub(crate) const DEFAULT_BRANCH: &str = "main";
pub(crate) const DEFAULT_MAX_CONNECTIONS: u32 = 5;
const ENV_PREFIX: &str = "LMS";

// Configuration abstracts config options for library system
#[derive(Debug, PartialEq, Serialize, Deserialize, Clone)]
pub(crate) struct Configuration {
    pub branch_id: String,
    pub port: u16,
    pub log_json: bool,
    // books, patrons and loans live in memory when unset
    pub database_url: Option<String>,
    pub max_connections: u32,
}

impl Configuration {
    pub fn new(branch_id: &str) -> Self {
        Configuration {
            branch_id: branch_id.to_string(),
            port: DEFAULT_PORT,
            log_json: false,
            database_url: None,
            max_connections: DEFAULT_MAX_CONNECTIONS,
        }
    }

    // Reads LMS_BRANCH_ID, LMS_PORT, LMS_LOG_JSON, LMS_DATABASE_URL and LMS_MAX_CONNECTIONS.
    pub fn from_env() -> LibraryResult<Self> {
        Self::from_environment(Environment::with_prefix(ENV_PREFIX))
    }

    fn from_environment(env: Environment) -> LibraryResult<Self> {
        let config = Config::builder()
            .set_default("branch_id", DEFAULT_BRANCH)?
            .set_default("port", DEFAULT_PORT as i64)?
            .set_default("log_json", false)?
            .set_default("max_connections", DEFAULT_MAX_CONNECTIONS as i64)?
            .add_source(env.try_parsing(true))
            .build()?
            .try_deserialize::<Configuration>()?;
        if config.branch_id.trim().is_empty() {
            return Err(LibraryError::validation("branch_id must not be blank", Some("invalid_config".to_string())));
        }
        Ok(config)
    }
}
