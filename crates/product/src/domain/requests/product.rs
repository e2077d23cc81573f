use crate::domain::requests::filter::{FilterId, parse_id};
use chrono::NaiveDate;
use serde::Serialize;
use shared::errors::ServiceError;
use utoipa::ToSchema;
use validator::Validate;

pub const CLOSING_DATE_FORMAT: &str = "%Y-%m-%d";

/// A file part accepted from a multipart body.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageUpload {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl ImageUpload {
    pub fn is_image(&self) -> bool {
        self.content_type.starts_with("image/")
    }
}

/// Text fields of a create or update form, exactly as received.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductForm {
    pub type_id: Option<String>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub closing_date: Option<String>,
    pub material_id: Option<String>,
    pub default_pic: Option<String>,
}

/// Validated product attributes shared by create and full update.
#[derive(Debug, Clone, PartialEq, Validate)]
pub struct ProductFields {
    #[validate(range(min = 1, message = "type_id must be a positive identifier"))]
    pub type_id: i32,

    #[validate(range(min = 1, message = "material_id must be a positive identifier"))]
    pub material_id: Option<i32>,

    #[validate(length(min = 1, max = 255, message = "name must be 1 to 255 characters"))]
    pub name: String,

    #[validate(length(min = 1, message = "description is required"))]
    pub description: String,

    pub closing_date: NaiveDate,

    pub default_pic: Option<String>,
}

fn collect_validation(errors: &mut Vec<String>, err: ServiceError) {
    match err {
        ServiceError::Validation(mut msgs) => errors.append(&mut msgs),
        other => errors.push(other.to_string()),
    }
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

impl ProductForm {
    /// Every required field is checked on its own; a missing one yields
    /// `MissingFields`, a malformed one `Validation`.
    pub fn into_fields(self) -> Result<ProductFields, ServiceError> {
        let required = [
            ("type_id", present(&self.type_id)),
            ("name", present(&self.name)),
            ("description", present(&self.description)),
            ("closing_date", present(&self.closing_date)),
        ];

        let missing: Vec<&'static str> = required
            .iter()
            .filter(|(_, value)| value.is_none())
            .map(|(field, _)| *field)
            .collect();

        let [
            (_, Some(type_id)),
            (_, Some(name)),
            (_, Some(description)),
            (_, Some(closing_date)),
        ] = required
        else {
            return Err(ServiceError::MissingFields(missing));
        };

        let mut errors = Vec::new();

        let type_id = parse_id("type_id", type_id).unwrap_or_else(|e| {
            collect_validation(&mut errors, e);
            0
        });

        // "0" is the "no material" sentinel, same as in the filter routes
        let material_id = match present(&self.material_id) {
            None => None,
            Some(raw) => match FilterId::parse("material_id", raw) {
                Ok(id) => id.as_bind(),
                Err(e) => {
                    collect_validation(&mut errors, e);
                    None
                }
            },
        };

        let closing_date = NaiveDate::parse_from_str(closing_date, CLOSING_DATE_FORMAT)
            .unwrap_or_else(|_| {
                errors.push(format!(
                    "closing_date must be formatted as YYYY-MM-DD, got '{closing_date}'"
                ));
                NaiveDate::default()
            });

        if !errors.is_empty() {
            return Err(ServiceError::Validation(errors));
        }

        let fields = ProductFields {
            type_id,
            material_id,
            name: name.to_string(),
            description: description.to_string(),
            closing_date,
            default_pic: present(&self.default_pic).map(str::to_string),
        };

        fields.validate().map_err(|e| {
            ServiceError::Validation(
                e.field_errors()
                    .into_iter()
                    .flat_map(|(field, errs)| {
                        errs.iter().map(move |err| match &err.message {
                            Some(msg) => msg.to_string(),
                            None => format!("invalid {field}"),
                        })
                    })
                    .collect(),
            )
        })?;

        Ok(fields)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CreateProductRequest {
    pub brand_id: i32,
    pub fields: ProductFields,
}

#[derive(Debug, Clone, PartialEq)]
pub struct UpdateProductRequest {
    pub id: i32,
    pub fields: ProductFields,
}

/// Multipart body accepted by the create and full update routes.
#[derive(Debug, Serialize, ToSchema)]
pub struct ProductUploadForm {
    #[schema(example = "1")]
    pub type_id: String,
    #[schema(example = "Shirt")]
    pub name: String,
    #[schema(example = "Organic cotton shirt")]
    pub description: String,
    #[schema(example = "2024-01-01")]
    pub closing_date: String,
    #[schema(example = "3")]
    pub material_id: Option<String>,
    /// Kept picture path when no new file is uploaded (update only).
    pub default_pic: Option<String>,
    #[schema(value_type = Option<String>, format = Binary)]
    #[serde(rename = "productPic")]
    pub product_pic: Option<Vec<u8>>,
}
