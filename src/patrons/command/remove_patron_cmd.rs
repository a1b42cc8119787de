use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use crate::core::command::{Command, CommandError};
use crate::patrons::domain::PatronService;

pub(crate) struct RemovePatronCommand {
    patron_service: Box<dyn PatronService>,
}

impl RemovePatronCommand {
    pub(crate) fn new(patron_service: Box<dyn PatronService>) -> Self {
        Self {
            patron_service,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct RemovePatronCommandRequest {
    pub patron_id: String,
}

impl RemovePatronCommandRequest {
    pub fn new(patron_id: &str) -> Self {
        Self {
            patron_id: patron_id.to_string(),
        }
    }
}


#[derive(Debug, Serialize)]
pub(crate) struct RemovePatronCommandResponse {
    pub removed: String,
}

#[async_trait]
impl Command<RemovePatronCommandRequest, RemovePatronCommandResponse> for RemovePatronCommand {
    async fn execute(&self, req: RemovePatronCommandRequest) -> Result<RemovePatronCommandResponse, CommandError> {
        self.patron_service.remove_patron(req.patron_id.as_str()).await?;
        Ok(RemovePatronCommandResponse { removed: req.patron_id })
    }
}
