use std::collections::HashMap;
use std::sync::Arc;
use chrono::Utc;
use async_trait::async_trait;
use tracing::{info, warn};
use crate::books::domain::Book;
use crate::catalog::domain::CatalogService;
use crate::checkout::domain::{LoanFilter, LoanLedger};
use crate::checkout::domain::model::LoanEntity;
use crate::checkout::dto::LoanDto;
use crate::checkout::repository::CheckoutRepository;
use crate::core::domain::Configuration;
use crate::core::library::{LibraryError, LibraryResult};
use crate::core::locks::{BOOK_SCOPE, LockRegistry, PATRON_SCOPE};
use crate::patrons::domain::{Patron, PatronService};

pub(crate) struct LoanLedgerImpl {
    branch_id: String,
    checkout_repository: Arc<dyn CheckoutRepository>,
    patron_service: Box<dyn PatronService>,
    catalog_service: Box<dyn CatalogService>,
    locks: Arc<LockRegistry>,
}

impl LoanLedgerImpl {
    pub(crate) fn new(config: &Configuration, checkout_repository: Arc<dyn CheckoutRepository>,
                      patron_service: Box<dyn PatronService>, catalog_service: Box<dyn CatalogService>,
                      locks: Arc<LockRegistry>) -> Self {
        Self {
            branch_id: config.branch_id.to_string(),
            checkout_repository,
            patron_service,
            catalog_service,
            locks,
        }
    }

    fn already_returned(loan_id: &str) -> LibraryError {
        LibraryError::conflict(format!("loan {} is already returned", loan_id).as_str(),
                               Some("already_returned".to_string()))
    }
}

#[async_trait]
impl LoanLedger for LoanLedgerImpl {
    async fn checkout(&self, book_id: &str, user_id: &str) -> LibraryResult<LoanDto> {
        // book before patron, the only place two locks are held at once
        let _book_guard = self.locks.acquire(BOOK_SCOPE, book_id).await?;
        let book = self.catalog_service.find_book_by_id(book_id).await?;
        let _patron_guard = self.locks.acquire(PATRON_SCOPE, user_id).await?;
        let patron = self.patron_service.find_patron_by_id(user_id).await?;
        if let Some(holder) = self.checkout_repository.find_active_by_book(book_id).await? {
            warn!(book_id, loan_id = holder.loan_id.as_str(), "book already on loan");
            return Err(LibraryError::conflict(
                format!("book {} is already on loan", book_id).as_str(), Some("book_on_loan".to_string())));
        }
        let loan = LoanDto::from_patron_book(self.branch_id.as_str(), &patron, &book);
        self.checkout_repository.create(&LoanEntity::from(&loan)).await?;
        info!(loan_id = loan.id.as_str(), book_id, user_id, title = book.title(), patron = patron.name(), "book checked out");
        Ok(loan)
    }

    async fn return_loan(&self, loan_id: &str) -> LibraryResult<LoanDto> {
        let mut existing = self.checkout_repository.get(loan_id).await?;
        if !existing.is_active() {
            warn!(loan_id, "loan already returned");
            return Err(Self::already_returned(loan_id));
        }
        existing.return_date = Some(Utc::now().naive_utc());
        match self.checkout_repository.update(&existing).await {
            Ok(_) => {}
            // a concurrent return committed first
            Err(LibraryError::Conflict { .. }) => {
                warn!(loan_id, "lost concurrent return");
                return Err(Self::already_returned(loan_id));
            }
            Err(err) => return Err(err),
        }
        existing.version += 1;
        info!(loan_id, book_id = existing.book_id.as_str(), "book returned");
        Ok(LoanDto::from(&existing))
    }

    async fn find_loans(&self) -> LibraryResult<Vec<LoanDto>> {
        let res = self.checkout_repository.scan().await?;
        Ok(res.iter().map(LoanDto::from).collect())
    }

    async fn find_active_loans(&self) -> LibraryResult<Vec<LoanDto>> {
        let res = self.checkout_repository.find_active().await?;
        Ok(res.iter().map(LoanDto::from).collect())
    }

    async fn find_loans_by_user(&self, user_id: &str) -> LibraryResult<Vec<LoanDto>> {
        self.query_loans(&LoanFilter { user_id: Some(user_id.to_string()), ..LoanFilter::default() }).await
    }

    async fn find_loans_by_book(&self, book_id: &str) -> LibraryResult<Vec<LoanDto>> {
        self.query_loans(&LoanFilter { book_id: Some(book_id.to_string()), ..LoanFilter::default() }).await
    }

    async fn query_loans(&self, filter: &LoanFilter) -> LibraryResult<Vec<LoanDto>> {
        let mut predicate = HashMap::new();
        if let Some(user_id) = &filter.user_id {
            predicate.insert("user_id".to_string(), user_id.to_string());
        }
        if let Some(book_id) = &filter.book_id {
            predicate.insert("book_id".to_string(), book_id.to_string());
        }
        let res = self.checkout_repository.query(&predicate).await?;
        Ok(res.iter()
            .filter(|l| filter.active.map_or(true, |active| l.is_active() == active))
            .map(LoanDto::from)
            .collect())
    }
}


#[cfg(test)]
mod tests {
    use crate::books::domain::model::BookEntity;
    use crate::catalog::factory::create_catalog_service;
    use crate::checkout::domain::{LoanFilter, LoanLedger};
    use crate::checkout::factory;
    use crate::core::domain::Configuration;
    use crate::core::library::{LibraryError, LoanStatus};
    use crate::core::repository::{RepositoryStore, StorageBackend};
    use crate::parties::domain::model::PartyEntity;
    use crate::patrons::factory::create_patron_service;
    use crate::utils::pg::test_pool;

    fn build_ledger(store: &RepositoryStore) -> Box<dyn LoanLedger> {
        factory::create_loan_ledger(&Configuration::new("test"), store)
    }

    async fn add_book(store: &RepositoryStore, title: &str, category: &str) -> BookEntity {
        let book = BookEntity::new(title, "author", category);
        store.books.create(&book).await.expect("should add book");
        book
    }

    async fn add_patron(store: &RepositoryStore, name: &str) -> PartyEntity {
        let patron = PartyEntity::new(name, format!("{}@example.com", name.to_lowercase()).as_str());
        store.parties.create(&patron).await.expect("should add patron");
        patron
    }

    #[tokio::test]
    async fn test_should_checkout_and_return_book() {
        let store = RepositoryStore::in_memory();
        let ledger = build_ledger(&store);
        let dune = add_book(&store, "Dune", "Fiction").await;
        let ada = add_patron(&store, "Ada").await;

        let loan = ledger.checkout(dune.book_id.as_str(), ada.party_id.as_str()).await.expect("should checkout");
        assert_eq!(dune.book_id, loan.book_id);
        assert_eq!(ada.party_id, loan.user_id);
        assert_eq!(LoanStatus::Active, loan.status);
        assert!(loan.return_date.is_none());
        assert_eq!("test", loan.branch_id.as_str());

        let returned = ledger.return_loan(loan.id.as_str()).await.expect("should return");
        assert_eq!(LoanStatus::Returned, returned.status);
        let returned_at = returned.return_date.expect("should have return date");
        assert!(returned_at >= returned.borrow_date);

        let again = ledger.checkout(dune.book_id.as_str(), ada.party_id.as_str()).await.expect("should checkout again");
        assert_ne!(loan.id, again.id);
        assert_eq!(2, ledger.find_loans().await.expect("should list").len());
        assert_eq!(1, ledger.find_active_loans().await.expect("should list").len());
    }

    #[tokio::test]
    async fn test_should_check_preconditions_in_order() {
        let store = RepositoryStore::in_memory();
        let ledger = build_ledger(&store);
        let dune = add_book(&store, "Dune", "Fiction").await;
        let ada = add_patron(&store, "Ada").await;
        let grace = add_patron(&store, "Grace").await;

        let res = ledger.checkout("missing", "missing").await;
        assert!(matches!(res, Err(LibraryError::NotFound { .. })));
        let res = ledger.checkout(dune.book_id.as_str(), "missing").await;
        assert!(matches!(res, Err(LibraryError::NotFound { .. })));
        assert!(ledger.find_loans().await.expect("should list").is_empty());

        ledger.checkout(dune.book_id.as_str(), ada.party_id.as_str()).await.expect("should checkout");
        let res = ledger.checkout(dune.book_id.as_str(), grace.party_id.as_str()).await;
        match res {
            Err(err) => assert_eq!(Some("book_on_loan"), err.reason_code()),
            Ok(_) => panic!("book should be on loan"),
        }
        let res = ledger.checkout(dune.book_id.as_str(), ada.party_id.as_str()).await;
        assert!(matches!(res, Err(LibraryError::Conflict { .. })));
        assert_eq!(0, store.locks.len());
    }

    #[tokio::test]
    async fn test_should_not_retain_locks_for_unknown_ids() {
        let store = RepositoryStore::in_memory();
        let ledger = build_ledger(&store);
        let catalog_svc = create_catalog_service(&Configuration::new("test"), &store);
        let dune = add_book(&store, "Dune", "Fiction").await;
        for i in 0..50 {
            let missing = format!("missing-{}", i);
            assert!(ledger.checkout(missing.as_str(), missing.as_str()).await.is_err());
            assert!(ledger.checkout(dune.book_id.as_str(), missing.as_str()).await.is_err());
            assert!(catalog_svc.remove_book(missing.as_str()).await.is_err());
        }
        assert_eq!(0, store.locks.len());
    }

    #[tokio::test]
    async fn test_should_reject_second_return() {
        let store = RepositoryStore::in_memory();
        let ledger = build_ledger(&store);
        let dune = add_book(&store, "Dune", "Fiction").await;
        let ada = add_patron(&store, "Ada").await;

        let loan = ledger.checkout(dune.book_id.as_str(), ada.party_id.as_str()).await.expect("should checkout");
        let first = ledger.return_loan(loan.id.as_str()).await.expect("should return");
        let res = ledger.return_loan(loan.id.as_str()).await;
        match res {
            Err(err) => assert_eq!(Some("already_returned"), err.reason_code()),
            Ok(_) => panic!("second return should be rejected"),
        }
        let stored = ledger.find_loans().await.expect("should list");
        assert_eq!(first.return_date, stored[0].return_date);

        let res = ledger.return_loan("missing").await;
        assert!(matches!(res, Err(LibraryError::NotFound { .. })));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_should_allow_one_concurrent_checkout() {
        let store = RepositoryStore::in_memory();
        let dune = add_book(&store, "Dune", "Fiction").await;
        let mut handles = vec![];
        for i in 0..16 {
            let patron = add_patron(&store, format!("Patron{}", i).as_str()).await;
            let ledger = build_ledger(&store);
            let book_id = dune.book_id.clone();
            handles.push(tokio::spawn(async move {
                ledger.checkout(book_id.as_str(), patron.party_id.as_str()).await
            }));
        }
        let mut ok = 0;
        let mut conflicts = 0;
        for handle in handles {
            match handle.await.expect("task should finish") {
                Ok(_) => ok += 1,
                Err(LibraryError::Conflict { .. }) => conflicts += 1,
                Err(err) => panic!("unexpected error {}", err),
            }
        }
        assert_eq!(1, ok);
        assert_eq!(15, conflicts);
        let ledger = build_ledger(&store);
        assert_eq!(1, ledger.find_active_loans().await.expect("should list").len());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_should_allow_one_concurrent_return() {
        let store = RepositoryStore::in_memory();
        let dune = add_book(&store, "Dune", "Fiction").await;
        let ada = add_patron(&store, "Ada").await;
        let loan = build_ledger(&store).checkout(dune.book_id.as_str(), ada.party_id.as_str())
            .await.expect("should checkout");

        let mut handles = vec![];
        for _ in 0..8 {
            let ledger = build_ledger(&store);
            let loan_id = loan.id.clone();
            handles.push(tokio::spawn(async move { ledger.return_loan(loan_id.as_str()).await }));
        }
        let mut ok = 0;
        for handle in handles {
            match handle.await.expect("task should finish") {
                Ok(_) => ok += 1,
                Err(err) => assert_eq!(Some("already_returned"), err.reason_code()),
            }
        }
        assert_eq!(1, ok);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_should_not_lend_book_being_removed() {
        let config = Configuration::new("test");
        for _ in 0..20 {
            let store = RepositoryStore::in_memory();
            let dune = add_book(&store, "Dune", "Fiction").await;
            let mut checkouts = vec![];
            for i in 0..8 {
                let patron = add_patron(&store, format!("Patron{}", i).as_str()).await;
                let ledger = build_ledger(&store);
                let book_id = dune.book_id.clone();
                checkouts.push(tokio::spawn(async move {
                    ledger.checkout(book_id.as_str(), patron.party_id.as_str()).await
                }));
            }
            let catalog_svc = create_catalog_service(&config, &store);
            let book_id = dune.book_id.clone();
            let removal = tokio::spawn(async move { catalog_svc.remove_book(book_id.as_str()).await });

            let removed = removal.await.expect("task should finish");
            let mut lent = 0;
            for handle in checkouts {
                match handle.await.expect("task should finish") {
                    Ok(_) => lent += 1,
                    Err(LibraryError::NotFound { .. }) => assert!(removed.is_ok()),
                    Err(LibraryError::Conflict { .. }) => {}
                    Err(err) => panic!("unexpected error {}", err),
                }
            }
            let active = build_ledger(&store).find_active_loans().await.expect("should list");
            match removed {
                Ok(_) => {
                    assert_eq!(0, lent);
                    assert!(active.is_empty());
                }
                Err(err) => {
                    assert_eq!(Some("active_loan"), err.reason_code());
                    assert_eq!(1, lent);
                    assert_eq!(1, active.len());
                    assert!(store.books.get(dune.book_id.as_str()).await.is_ok());
                }
            }
            assert_eq!(0, store.locks.len());
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_should_not_lend_to_patron_being_removed() {
        let config = Configuration::new("test");
        for _ in 0..20 {
            let store = RepositoryStore::in_memory();
            let ada = add_patron(&store, "Ada").await;
            let mut checkouts = vec![];
            for i in 0..8 {
                let book = add_book(&store, format!("Book{}", i).as_str(), "Fiction").await;
                let ledger = build_ledger(&store);
                let user_id = ada.party_id.clone();
                checkouts.push(tokio::spawn(async move {
                    ledger.checkout(book.book_id.as_str(), user_id.as_str()).await
                }));
            }
            let patron_svc = create_patron_service(&config, &store);
            let user_id = ada.party_id.clone();
            let removal = tokio::spawn(async move { patron_svc.remove_patron(user_id.as_str()).await });

            let removed = removal.await.expect("task should finish");
            let mut lent = 0;
            for handle in checkouts {
                match handle.await.expect("task should finish") {
                    Ok(_) => lent += 1,
                    Err(LibraryError::NotFound { .. }) => assert!(removed.is_ok()),
                    Err(err) => panic!("unexpected error {}", err),
                }
            }
            let active = build_ledger(&store).find_loans_by_user(ada.party_id.as_str()).await.expect("should list");
            assert_eq!(lent, active.len());
            match removed {
                Ok(_) => assert_eq!(0, lent),
                Err(err) => {
                    assert_eq!(Some("active_loan"), err.reason_code());
                    assert!(lent >= 1);
                    assert!(store.parties.get(ada.party_id.as_str()).await.is_ok());
                }
            }
            assert_eq!(0, store.locks.len());
        }
    }

    // two stores share one database but not a lock registry, as two server processes would
    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    #[ignore]
    async fn test_should_allow_one_checkout_across_processes() {
        let backend = StorageBackend::Postgres(test_pool().await);
        let stores = [RepositoryStore::new(&backend), RepositoryStore::new(&backend)];
        let dune = add_book(&stores[0], "Dune", "Fiction").await;
        let mut handles = vec![];
        for i in 0..8 {
            let store = &stores[i % 2];
            let patron = PartyEntity::new("Patron", format!("{}@example.com", uuid::Uuid::new_v4()).as_str());
            store.parties.create(&patron).await.expect("should add patron");
            let ledger = build_ledger(store);
            let book_id = dune.book_id.clone();
            handles.push(tokio::spawn(async move {
                ledger.checkout(book_id.as_str(), patron.party_id.as_str()).await
            }));
        }
        let mut ok = 0;
        for handle in handles {
            match handle.await.expect("task should finish") {
                Ok(_) => ok += 1,
                Err(err) => assert_eq!(Some("book_on_loan"), err.reason_code()),
            }
        }
        assert_eq!(1, ok);
        let active = build_ledger(&stores[1]).find_loans_by_book(dune.book_id.as_str()).await.expect("should list");
        assert_eq!(1, active.len());
    }

    #[tokio::test]
    async fn test_should_filter_loans() {
        let store = RepositoryStore::in_memory();
        let ledger = build_ledger(&store);
        let dune = add_book(&store, "Dune", "Fiction").await;
        let spqr = add_book(&store, "SPQR", "History").await;
        let ada = add_patron(&store, "Ada").await;
        let grace = add_patron(&store, "Grace").await;

        let first = ledger.checkout(dune.book_id.as_str(), ada.party_id.as_str()).await.expect("should checkout");
        ledger.return_loan(first.id.as_str()).await.expect("should return");
        ledger.checkout(dune.book_id.as_str(), grace.party_id.as_str()).await.expect("should checkout");
        ledger.checkout(spqr.book_id.as_str(), ada.party_id.as_str()).await.expect("should checkout");

        assert_eq!(2, ledger.find_loans_by_user(ada.party_id.as_str()).await.expect("should list").len());
        assert_eq!(2, ledger.find_loans_by_book(dune.book_id.as_str()).await.expect("should list").len());
        let filter = LoanFilter {
            active: Some(true),
            user_id: Some(ada.party_id.to_string()),
            book_id: None,
        };
        let res = ledger.query_loans(&filter).await.expect("should query");
        assert_eq!(1, res.len());
        assert_eq!(spqr.book_id, res[0].book_id);
        let returned = ledger.query_loans(&LoanFilter { active: Some(false), ..LoanFilter::default() })
            .await.expect("should query");
        assert_eq!(vec![first.id], returned.into_iter().map(|l| l.id).collect::<Vec<_>>());
    }
}
