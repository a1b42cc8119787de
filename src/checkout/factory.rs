use std::sync::Arc;
use crate::catalog::factory::create_catalog_service;
use crate::checkout::domain::LoanLedger;
use crate::checkout::domain::service::LoanLedgerImpl;
use crate::checkout::repository::CheckoutRepository;
use crate::checkout::repository::memory_checkout_repository::MemoryCheckoutRepository;
use crate::checkout::repository::pg_checkout_repository::PgCheckoutRepository;
use crate::core::domain::Configuration;
use crate::core::repository::{RepositoryStore, StorageBackend};
use crate::patrons::factory::create_patron_service;

pub(crate) fn create_checkout_repository(backend: &StorageBackend) -> Arc<dyn CheckoutRepository> {
    match backend {
        StorageBackend::Memory => Arc::new(MemoryCheckoutRepository::new("checkout")),
        StorageBackend::Postgres(pool) => Arc::new(PgCheckoutRepository::new(pool.clone())),
    }
}

pub(crate) fn create_loan_ledger(config: &Configuration, store: &RepositoryStore) -> Box<dyn LoanLedger> {
    let catalog_svc = create_catalog_service(config, store);
    let patron_svc = create_patron_service(config, store);
    Box::new(LoanLedgerImpl::new(config, store.checkouts.clone(),
                                 patron_svc, catalog_svc, store.locks.clone()))
}
