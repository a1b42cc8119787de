use crate::core::domain::Configuration;
use crate::core::repository::RepositoryStore;
use crate::stats::domain::StatisticsService;
use crate::stats::domain::service::StatisticsServiceImpl;

pub(crate) fn create_statistics_service(config: &Configuration, store: &RepositoryStore) -> Box<dyn StatisticsService> {
    Box::new(StatisticsServiceImpl::new(config, store.books.clone(),
                                        store.parties.clone(), store.checkouts.clone()))
}
