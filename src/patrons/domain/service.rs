use std::collections::HashMap;
use std::sync::Arc;
use async_trait::async_trait;
use tracing::{debug, info, warn};
use crate::books::repository::BookRepository;
use crate::checkout::domain::model::LoanEntity;
use crate::checkout::repository::CheckoutRepository;
use crate::core::domain::Configuration;
use crate::core::library::{LibraryError, LibraryResult};
use crate::core::locks::{EMAIL_SCOPE, LockRegistry, PATRON_SCOPE};
use crate::parties::domain::model::PartyEntity;
use crate::parties::repository::PartyRepository;
use crate::patrons::domain::PatronService;
use crate::patrons::dto::PatronDto;
use crate::utils::validate::{require_email, require_non_blank};

pub(crate) struct PatronServiceImpl {
    party_repository: Arc<dyn PartyRepository>,
    book_repository: Arc<dyn BookRepository>,
    checkout_repository: Arc<dyn CheckoutRepository>,
    locks: Arc<LockRegistry>,
}

impl PatronServiceImpl {
    pub(crate) fn new(_config: &Configuration, party_repository: Arc<dyn PartyRepository>,
                      book_repository: Arc<dyn BookRepository>,
                      checkout_repository: Arc<dyn CheckoutRepository>,
                      locks: Arc<LockRegistry>) -> Self {
        PatronServiceImpl {
            party_repository,
            book_repository,
            checkout_repository,
            locks,
        }
    }

    // titles of the books each patron holds right now, keyed by patron id
    async fn borrowed_books(&self, loans: Vec<LoanEntity>) -> LibraryResult<HashMap<String, Vec<String>>> {
        let mut borrowed: HashMap<String, Vec<String>> = HashMap::new();
        for loan in loans {
            match self.book_repository.get(loan.book_id.as_str()).await {
                Ok(book) => borrowed.entry(loan.user_id).or_default().push(book.title),
                Err(LibraryError::NotFound { .. }) => {}
                Err(err) => return Err(err),
            }
        }
        Ok(borrowed)
    }

    async fn to_patrons(&self, parties: Vec<PartyEntity>) -> LibraryResult<Vec<PatronDto>> {
        let mut borrowed = self.borrowed_books(self.checkout_repository.find_active().await?).await?;
        Ok(parties.iter().map(|p| {
            let mut patron = PatronDto::from(p);
            patron.borrowed_books = borrowed.remove(p.party_id.as_str()).unwrap_or_default();
            patron
        }).collect())
    }
}

#[async_trait]
impl PatronService for PatronServiceImpl {
    async fn add_patron(&self, patron: &PatronDto) -> LibraryResult<PatronDto> {
        let mut patron = patron.clone();
        patron.name = require_non_blank("name", patron.name.as_str())?;
        patron.email = require_email(patron.email.as_str())?;
        patron.borrowed_books.clear();

        let _guard = self.locks.acquire(EMAIL_SCOPE, patron.email.to_lowercase().as_str()).await?;
        if !self.party_repository.find_by_email(patron.email.as_str()).await?.is_empty() {
            warn!(email = patron.email.as_str(), "refusing duplicate patron email");
            return Err(duplicate_email(patron.email.as_str()));
        }
        match self.party_repository.create(&PartyEntity::from(&patron)).await {
            Ok(_) => {}
            // another process registered the email between the lookup and the insert
            Err(LibraryError::Conflict { .. }) => return Err(duplicate_email(patron.email.as_str())),
            Err(err) => return Err(err),
        }
        info!(patron_id = patron.id.as_str(), "patron added");
        Ok(patron)
    }

    async fn remove_patron(&self, id: &str) -> LibraryResult<()> {
        let _guard = self.locks.acquire(PATRON_SCOPE, id).await?;
        let _ = self.party_repository.get(id).await?;
        let active = self.checkout_repository.find_active_by_user(id).await?;
        if !active.is_empty() {
            warn!(patron_id = id, active = active.len(), "refusing to remove patron with active loans");
            return Err(LibraryError::conflict(
                format!("patron {} has {} active loans", id, active.len()).as_str(), Some("active_loan".to_string())));
        }
        self.party_repository.delete(id).await?;
        info!(patron_id = id, "patron removed");
        Ok(())
    }

    async fn find_patron_by_id(&self, id: &str) -> LibraryResult<PatronDto> {
        let party = self.party_repository.get(id).await?;
        let mut borrowed = self.borrowed_books(self.checkout_repository.find_active_by_user(id).await?).await?;
        let mut patron = PatronDto::from(&party);
        patron.borrowed_books = borrowed.remove(id).unwrap_or_default();
        Ok(patron)
    }

    async fn find_patrons(&self) -> LibraryResult<Vec<PatronDto>> {
        let parties = self.party_repository.scan().await?;
        self.to_patrons(parties).await
    }

    async fn search_patrons(&self, term: &str) -> LibraryResult<Vec<PatronDto>> {
        let parties = self.party_repository.search(term).await?;
        debug!(term, matches = parties.len(), "patron search");
        self.to_patrons(parties).await
    }
}

impl From<&PartyEntity> for PatronDto {
    fn from(other: &PartyEntity) -> Self {
        Self {
            id: other.party_id.to_string(),
            version: other.version,
            name: other.name.to_string(),
            email: other.email.to_string(),
            borrowed_books: vec![],
        }
    }
}

impl From<&PatronDto> for PartyEntity {
    fn from(other: &PatronDto) -> Self {
        let now = chrono::Utc::now().naive_utc();
        PartyEntity {
            party_id: other.id.to_string(),
            version: other.version,
            name: other.name.to_string(),
            email: other.email.to_string(),
            created_at: now,
            updated_at: now,
        }
    }
}


fn duplicate_email(email: &str) -> LibraryError {
    LibraryError::conflict(format!("email {} is already registered", email).as_str(), Some("duplicate_email".to_string()))
}
