use crate::catalog::domain::CatalogService;
use crate::catalog::domain::service::CatalogServiceImpl;
use crate::core::domain::Configuration;
use crate::core::repository::RepositoryStore;

pub(crate) fn create_catalog_service(config: &Configuration, store: &RepositoryStore) -> Box<dyn CatalogService> {
    Box::new(CatalogServiceImpl::new(config, store.books.clone(),
                                     store.checkouts.clone(), store.locks.clone()))
}
