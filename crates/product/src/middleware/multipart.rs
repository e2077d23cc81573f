use crate::domain::requests::{ImageUpload, ProductForm};
use axum::extract::{
    FromRequest, Request,
    multipart::{Multipart, MultipartError},
};
use shared::errors::HttpError;
use tracing::debug;

/// Multipart part carrying the product picture.
pub const PICTURE_FIELD: &str = "productPic";

/// Product form read from a `multipart/form-data` body.
///
/// Text parts are collected as-is; the first non-empty `productPic` part is
/// kept whatever its content type, the service decides whether it is an image.
#[derive(Debug, Default)]
pub struct ProductMultipart {
    pub form: ProductForm,
    pub image: Option<ImageUpload>,
}

fn bad_multipart(err: MultipartError) -> HttpError {
    HttpError::BadRequest(format!("Invalid multipart body: {}", err.body_text()))
}

impl<S> FromRequest<S> for ProductMultipart
where
    S: Send + Sync,
{
    type Rejection = HttpError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let mut multipart = Multipart::from_request(req, state)
            .await
            .map_err(|rejection| HttpError::BadRequest(rejection.body_text()))?;

        let mut parsed = ProductMultipart::default();

        while let Some(field) = multipart.next_field().await.map_err(bad_multipart)? {
            let Some(name) = field.name().map(str::to_owned) else {
                continue;
            };

            if name == PICTURE_FIELD {
                let file_name = field.file_name().unwrap_or("upload").to_owned();
                let content_type = field
                    .content_type()
                    .unwrap_or("application/octet-stream")
                    .to_owned();
                let bytes = field.bytes().await.map_err(bad_multipart)?;

                if parsed.image.is_none() && !bytes.is_empty() {
                    parsed.image = Some(ImageUpload {
                        file_name,
                        content_type,
                        bytes: bytes.to_vec(),
                    });
                }
                continue;
            }

            let value = field.text().await.map_err(bad_multipart)?;
            let form = &mut parsed.form;

            match name.as_str() {
                "type_id" => form.type_id = Some(value),
                "name" => form.name = Some(value),
                "description" => form.description = Some(value),
                "closing_date" => form.closing_date = Some(value),
                "material_id" => form.material_id = Some(value),
                "default_pic" => form.default_pic = Some(value),
                other => debug!("Ignoring unknown form field '{other}'"),
            }
        }

        Ok(parsed)
    }
}
