//! Trait abstraction for the API client to enable mocking in tests

use super::error::ApiError;
use crate::state::{City, Family, FamilyPage, FamilyUpdate, State};
use async_trait::async_trait;

/// Operations the TUI needs from the family API
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait FamilyApi: Send + Sync {
    /// Fetch one family by identifier
    async fn get_family(&self, id: &str) -> Result<Family, ApiError>;

    /// Fetch one page of families (pages start at 1)
    async fn list_families(&self, page: u32, limit: u32) -> Result<FamilyPage, ApiError>;

    /// List the provinces of a country
    async fn list_states(&self, country_id: i64) -> Result<Vec<State>, ApiError>;

    /// List the cities of a province
    async fn list_cities(&self, state_id: i64) -> Result<Vec<City>, ApiError>;

    /// Apply a partial update to a family
    async fn update_family(&self, id: &str, update: &FamilyUpdate) -> Result<(), ApiError>;
}
