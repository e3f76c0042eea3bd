//! API client module for HTTP communication with the family backend

mod client;
mod error;
mod traits;

pub use client::{ApiClient, DEFAULT_ADDRESS};
pub use error::ApiError;
pub use traits::FamilyApi;

#[cfg(test)]
pub use traits::MockFamilyApi;
