//! Family and locality records as served by the API

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A family (household) record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Family {
    #[serde(rename = "_id")]
    pub id: String,
    /// Family card number, generated by the server
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub state_id: Option<i64>,
    #[serde(default)]
    pub city_id: Option<i64>,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub district: String,
    #[serde(default, rename = "postalCode")]
    pub postal_code: String,
    #[serde(default, rename = "familyPhoneNumber")]
    pub family_phone_number: String,
    /// RW
    #[serde(default)]
    pub hamlet: Option<String>,
    /// RT
    #[serde(default)]
    pub neighbourhood: Option<String>,
    #[serde(default, rename = "churchArea")]
    pub church_area: Option<String>,
    #[serde(default, rename = "churchName")]
    pub church_name: Option<String>,
    #[serde(default, rename = "updatedAt")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Family {
    pub fn display_code(&self) -> &str {
        self.code.as_deref().unwrap_or("-")
    }
}

/// Partial update payload: only the fields a user may edit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FamilyUpdate {
    pub name: String,
    pub state_id: i64,
    pub city_id: i64,
    pub address: String,
    pub district: String,
    #[serde(rename = "postalCode")]
    pub postal_code: String,
    #[serde(rename = "familyPhoneNumber")]
    pub family_phone_number: String,
    /// RW; sent even when blank so clearing it reaches the server
    pub hamlet: String,
    /// RT
    pub neighbourhood: String,
}

/// A province
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct State {
    #[serde(rename = "_id")]
    pub id: i64,
    pub name: String,
}

/// A city or regency within a province
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct City {
    #[serde(rename = "_id")]
    pub id: i64,
    pub name: String,
}

/// Paging information attached to list responses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct PageMeta {
    #[serde(default)]
    pub page: u32,
    #[serde(default)]
    pub limit: u32,
    #[serde(default)]
    pub total: u64,
}

impl PageMeta {
    /// Number of pages, at least one
    pub fn page_count(&self) -> u32 {
        if self.limit == 0 {
            return 1;
        }
        let pages = self.total.div_ceil(u64::from(self.limit));
        u32::try_from(pages).unwrap_or(u32::MAX).max(1)
    }
}

/// One page of families
#[derive(Debug, Clone, Default)]
pub struct FamilyPage {
    pub families: Vec<Family>,
    pub meta: PageMeta,
}
