use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use crate::core::command::{Command, CommandError};
use crate::patrons::domain::PatronService;
use crate::patrons::dto::PatronDto;

pub(crate) struct ListPatronsCommand {
    patron_service: Box<dyn PatronService>,
}

impl ListPatronsCommand {
    pub(crate) fn new(patron_service: Box<dyn PatronService>) -> Self {
        Self {
            patron_service,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct ListPatronsCommandRequest {
    pub search: Option<String>,
}

impl ListPatronsCommandRequest {
    pub fn new(search: Option<&str>) -> Self {
        Self {
            search: search.map(str::to_string),
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct ListPatronsCommandResponse {
    pub users: Vec<PatronDto>,
}

impl ListPatronsCommandResponse {
    pub fn new(users: Vec<PatronDto>) -> Self {
        Self {
            users,
        }
    }
}

#[async_trait]
impl Command<ListPatronsCommandRequest, ListPatronsCommandResponse> for ListPatronsCommand {
    async fn execute(&self, req: ListPatronsCommandRequest) -> Result<ListPatronsCommandResponse, CommandError> {
        let res = match req.search {
            Some(term) => self.patron_service.search_patrons(term.as_str()).await,
            None => self.patron_service.find_patrons().await,
        };
        res.map_err(CommandError::from).map(ListPatronsCommandResponse::new)
    }
}
