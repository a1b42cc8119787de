use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CategoryStatsDto {
    pub name: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct UserStatsDto {
    pub name: String,
    pub loans_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct StatisticsDto {
    pub total_books: usize,
    pub total_users: usize,
    pub total_loans: usize,
    pub active_loans: usize,
    pub popular_categories: Vec<CategoryStatsDto>,
    pub active_users: Vec<UserStatsDto>,
}
