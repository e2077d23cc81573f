use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use utoipa::ToSchema;

/// Lifecycle of a catalog entry: `draft -> active -> closed`.
///
/// Products are created as drafts. `closed` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema, sqlx::Type)]
#[sqlx(type_name = "product_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ProductStatus {
    Draft,
    Active,
    Closed,
}

impl ProductStatus {
    /// The state a status update moves to, or `None` when already terminal.
    pub fn next(self) -> Option<Self> {
        match self {
            ProductStatus::Draft => Some(ProductStatus::Active),
            ProductStatus::Active => Some(ProductStatus::Closed),
            ProductStatus::Closed => None,
        }
    }
}

impl fmt::Display for ProductStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ProductStatus::Draft => "draft",
            ProductStatus::Active => "active",
            ProductStatus::Closed => "closed",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Product {
    pub id: i32,
    pub brand_id: i32,
    pub type_id: i32,
    pub material_id: Option<i32>,
    pub name: String,
    pub default_pic: Option<String>,
    pub description: String,
    pub closing_date: NaiveDate,
    pub status: ProductStatus,
    pub created_at: Option<NaiveDateTime>,
    pub updated_at: Option<NaiveDateTime>,
}
