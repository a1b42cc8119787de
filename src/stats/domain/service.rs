use std::collections::HashMap;
use std::sync::Arc;
use async_trait::async_trait;
use tracing::debug;
use crate::books::repository::BookRepository;
use crate::checkout::repository::CheckoutRepository;
use crate::core::domain::Configuration;
use crate::core::library::LibraryResult;
use crate::parties::repository::PartyRepository;
use crate::stats::domain::StatisticsService;
use crate::stats::dto::{CategoryStatsDto, StatisticsDto, UserStatsDto};

pub(crate) struct StatisticsServiceImpl {
    book_repository: Arc<dyn BookRepository>,
    party_repository: Arc<dyn PartyRepository>,
    checkout_repository: Arc<dyn CheckoutRepository>,
}

impl StatisticsServiceImpl {
    pub(crate) fn new(_config: &Configuration, book_repository: Arc<dyn BookRepository>,
                      party_repository: Arc<dyn PartyRepository>,
                      checkout_repository: Arc<dyn CheckoutRepository>) -> Self {
        Self {
            book_repository,
            party_repository,
            checkout_repository,
        }
    }
}

// counts per key in first-seen order, then count desc and name asc
fn rank<'a>(keys: impl Iterator<Item = &'a str>) -> Vec<(String, usize)> {
    let mut counts: Vec<(String, usize)> = vec![];
    let mut index: HashMap<&str, usize> = HashMap::new();
    for key in keys {
        match index.get(key) {
            Some(&i) => counts[i].1 += 1,
            None => {
                index.insert(key, counts.len());
                counts.push((key.to_string(), 1));
            }
        }
    }
    counts.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    counts
}

#[async_trait]
impl StatisticsService for StatisticsServiceImpl {
    async fn compute(&self) -> LibraryResult<StatisticsDto> {
        // Each read is its own snapshot. Loans go first so every loan's book and
        // patron, written before it, show up in the later reads unless removed since.
        let loans = self.checkout_repository.scan().await?;
        let books = self.book_repository.scan().await?;
        let parties = self.party_repository.scan().await?;
        let total_books = self.book_repository.count().await?;
        let total_users = self.party_repository.count().await?;

        let categories: HashMap<&str, &str> = books.iter()
            .map(|b| (b.book_id.as_str(), b.category.as_str())).collect();
        let names: HashMap<&str, &str> = parties.iter()
            .map(|p| (p.party_id.as_str(), p.name.as_str())).collect();

        let popular_categories = rank(loans.iter().filter_map(|l| categories.get(l.book_id.as_str()).copied()))
            .into_iter()
            .map(|(name, count)| CategoryStatsDto { name, count })
            .collect();

        // grouped by patron id so namesakes stay separate
        let mut active_users: Vec<UserStatsDto> = rank(loans.iter().map(|l| l.user_id.as_str()))
            .into_iter()
            .filter_map(|(user_id, loans_count)| names.get(user_id.as_str())
                .map(|name| UserStatsDto { name: name.to_string(), loans_count }))
            .collect();
        active_users.sort_by(|a, b| b.loans_count.cmp(&a.loans_count).then_with(|| a.name.cmp(&b.name)));

        let stats = StatisticsDto {
            total_books,
            total_users,
            total_loans: loans.len(),
            active_loans: loans.iter().filter(|l| l.is_active()).count(),
            popular_categories,
            active_users,
        };
        debug!(total_loans = stats.total_loans, active_loans = stats.active_loans, "statistics computed");
        Ok(stats)
    }
}
