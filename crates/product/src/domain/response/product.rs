use crate::model::{Product as ProductModel, ProductStatus};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone, PartialEq)]
pub struct ProductResponse {
    pub id: i32,
    pub brand_id: i32,
    pub type_id: i32,
    pub material_id: Option<i32>,
    pub name: String,
    pub default_pic: Option<String>,
    pub description: String,
    #[schema(value_type = String, example = "2024-01-01")]
    pub closing_date: NaiveDate,
    pub status: ProductStatus,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

impl From<ProductModel> for ProductResponse {
    fn from(value: ProductModel) -> Self {
        ProductResponse {
            id: value.id,
            brand_id: value.brand_id,
            type_id: value.type_id,
            material_id: value.material_id,
            name: value.name,
            default_pic: value.default_pic,
            description: value.description,
            closing_date: value.closing_date,
            status: value.status,
            created_at: value.created_at.map(|dt| dt.to_string()),
            updated_at: value.updated_at.map(|dt| dt.to_string()),
        }
    }
}
