pub mod command;
pub mod query;

/// Column list matching `model::Product`.
pub(crate) const PRODUCT_COLUMNS: &str = "id, brand_id, type_id, material_id, name, default_pic, \
     description, closing_date, status, created_at, updated_at";
