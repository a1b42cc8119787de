use crate::core::domain::Configuration;
use crate::core::repository::RepositoryStore;
use crate::patrons::domain::PatronService;
use crate::patrons::domain::service::PatronServiceImpl;

pub(crate) fn create_patron_service(config: &Configuration, store: &RepositoryStore) -> Box<dyn PatronService> {
    Box::new(PatronServiceImpl::new(config, store.parties.clone(), store.books.clone(),
                                    store.checkouts.clone(), store.locks.clone()))
}
