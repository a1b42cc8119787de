use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use crate::books::dto::BookDto;
use crate::catalog::domain::CatalogService;
use crate::core::command::{Command, CommandError};

pub(crate) struct GetBookCommand {
    catalog_service: Box<dyn CatalogService>,
}

impl GetBookCommand {
    pub(crate) fn new(catalog_service: Box<dyn CatalogService>) -> Self {
        Self {
            catalog_service,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct GetBookCommandRequest {
    pub(crate) book_id: String,
}

impl GetBookCommandRequest {
    pub fn new(book_id: &str) -> Self {
        Self {
            book_id: book_id.trim().to_string(),
        }
    }
}


#[derive(Debug, Serialize)]
pub(crate) struct GetBookCommandResponse {
    pub book: BookDto,
}

impl GetBookCommandResponse {
    pub fn new(book: BookDto) -> Self {
        Self {
            book,
        }
    }
}

#[async_trait]
impl Command<GetBookCommandRequest, GetBookCommandResponse> for GetBookCommand {
    async fn execute(&self, req: GetBookCommandRequest) -> Result<GetBookCommandResponse, CommandError> {
        self.catalog_service.find_book_by_id(req.book_id.as_str())
            .await.map_err(CommandError::from).map(GetBookCommandResponse::new)
    }
}

#[cfg(test)]
mod tests {
    use crate::catalog::command::add_book_cmd::{AddBookCommand, AddBookCommandRequest};
    use crate::catalog::command::get_book_cmd::{GetBookCommand, GetBookCommandRequest};
    use crate::catalog::factory;
    use crate::core::command::{Command, CommandError};
    use crate::core::domain::Configuration;
    use crate::core::repository::RepositoryStore;

    #[tokio::test]
    async fn test_should_run_get_book() {
        let config = Configuration::new("test");
        let store = RepositoryStore::in_memory();
        let add_cmd = AddBookCommand::new(factory::create_catalog_service(&config, &store));
        let get_cmd = GetBookCommand::new(factory::create_catalog_service(&config, &store));

        let res = add_cmd.execute(AddBookCommandRequest::new("SPQR", "Beard", "History")).await.expect("should add book");
        let loaded = get_cmd.execute(GetBookCommandRequest::new(format!(" {} ", res.book.id).as_str())).await.expect("should get book");
        assert_eq!(res.book, loaded.book);

        let missing = get_cmd.execute(GetBookCommandRequest::new("missing")).await;
        assert!(matches!(missing, Err(CommandError::NotFound { .. })));
    }
}
