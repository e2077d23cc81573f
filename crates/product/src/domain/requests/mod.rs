mod filter;
mod product;

pub use self::filter::{FilterId, ProductFilter, UNSET_SENTINEL, check_valid_id, parse_id};
pub use self::product::{
    CLOSING_DATE_FORMAT, CreateProductRequest, ImageUpload, ProductFields, ProductForm,
    ProductUploadForm, UpdateProductRequest,
};
