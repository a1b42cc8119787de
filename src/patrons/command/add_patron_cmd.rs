use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use crate::patrons::dto::PatronDto;
use crate::core::command::{Command, CommandError};
use crate::patrons::domain::PatronService;

pub(crate) struct AddPatronCommand {
    patron_service: Box<dyn PatronService>,
}

impl AddPatronCommand {
    pub(crate) fn new(patron_service: Box<dyn PatronService>) -> Self {
        Self {
            patron_service,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct AddPatronCommandRequest {
    pub name: String,
    pub email: String,
}

impl AddPatronCommandRequest {
    pub fn new(name: &str, email: &str) -> Self {
        Self {
            name: name.to_string(),
            email: email.to_string(),
        }
    }
    pub fn build_patron(&self) -> PatronDto {
        PatronDto::new(self.name.as_str(), self.email.as_str())
    }
}


#[derive(Debug, Serialize)]
pub(crate) struct AddPatronCommandResponse {
    pub user: PatronDto,
}

impl AddPatronCommandResponse {
    pub fn new(user: PatronDto) -> Self {
        Self {
            user,
        }
    }
}

#[async_trait]
impl Command<AddPatronCommandRequest, AddPatronCommandResponse> for AddPatronCommand {
    async fn execute(&self, req: AddPatronCommandRequest) -> Result<AddPatronCommandResponse, CommandError> {
        let patron = req.build_patron();
        self.patron_service.add_patron(&patron).await.map_err(CommandError::from).map(AddPatronCommandResponse::new)
    }
}
