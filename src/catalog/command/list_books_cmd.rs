use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use crate::books::dto::BookDto;
use crate::catalog::domain::CatalogService;
use crate::core::command::{Command, CommandError};

pub(crate) struct ListBooksCommand {
    catalog_service: Box<dyn CatalogService>,
}

impl ListBooksCommand {
    pub(crate) fn new(catalog_service: Box<dyn CatalogService>) -> Self {
        Self {
            catalog_service,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct ListBooksCommandRequest {
    pub(crate) search: Option<String>,
}

impl ListBooksCommandRequest {
    pub fn new(search: Option<&str>) -> Self {
        Self {
            search: search.map(str::to_string),
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct ListBooksCommandResponse {
    pub books: Vec<BookDto>,
}

impl ListBooksCommandResponse {
    pub fn new(books: Vec<BookDto>) -> Self {
        Self {
            books,
        }
    }
}

#[async_trait]
impl Command<ListBooksCommandRequest, ListBooksCommandResponse> for ListBooksCommand {
    async fn execute(&self, req: ListBooksCommandRequest) -> Result<ListBooksCommandResponse, CommandError> {
        let res = match req.search {
            Some(term) => self.catalog_service.search_books(term.as_str()).await,
            None => self.catalog_service.find_books().await,
        };
        res.map_err(CommandError::from).map(ListBooksCommandResponse::new)
    }
}
