//! Upload service for report images.

use std::sync::Arc;

use communityfix_common::{
    AppError, AppResult, IdGenerator,
    storage::{StorageBackend, generate_storage_key},
};
use communityfix_db::{entities::attachment, repositories::AttachmentRepository};
use sea_orm::Set;

/// Maximum image size (10MB)
pub const MAX_IMAGE_SIZE: usize = 10 * 1024 * 1024;

/// Shared storage backend handle.
pub type StorageService = Arc<dyn StorageBackend>;

/// Upload service for report images.
#[derive(Clone)]
pub struct UploadService {
    attachment_repo: AttachmentRepository,
    storage: StorageService,
    id_gen: IdGenerator,
}

/// Input for uploading an image.
pub struct CreateUploadInput {
    pub name: String,
    pub content_type: String,
    pub data: Vec<u8>,
}

impl UploadService {
    /// Create a new upload service.
    #[must_use]
    pub fn new(attachment_repo: AttachmentRepository, storage: StorageService) -> Self {
        Self {
            attachment_repo,
            storage,
            id_gen: IdGenerator::new(),
        }
    }

    /// Upload a new image.
    pub async fn upload(
        &self,
        user_id: &str,
        input: CreateUploadInput,
    ) -> AppResult<attachment::Model> {
        if !input.content_type.starts_with("image/") {
            return Err(AppError::Validation(
                "Only image uploads are supported".to_string(),
            ));
        }

        if input.data.is_empty() {
            return Err(AppError::Validation("File is empty".to_string()));
        }

        if input.data.len() > MAX_IMAGE_SIZE {
            return Err(AppError::Validation(format!(
                "File too large. Maximum size is {MAX_IMAGE_SIZE} bytes"
            )));
        }

        // Check for an identical prior upload by this user
        let md5 = format!("{:x}", md5::compute(&input.data));
        if let Some(existing) = self
            .attachment_repo
            .find_by_md5_for_user(&md5, user_id)
            .await?
        {
            return Ok(existing);
        }

        let storage_key = generate_storage_key(user_id, &input.name);
        let uploaded = self
            .storage
            .upload(&storage_key, &input.data, &input.content_type)
            .await?;

        let (width, height) = image_dimensions(&input.data);

        let model = attachment::ActiveModel {
            id: Set(self.id_gen.generate()),
            user_id: Set(user_id.to_string()),
            name: Set(input.name),
            content_type: Set(input.content_type),
            size: Set(input.data.len() as i64),
            url: Set(uploaded.url),
            storage_key: Set(storage_key),
            md5: Set(md5),
            width: Set(width),
            height: Set(height),
            created_at: Set(chrono::Utc::now().into()),
        };

        let attachment = self.attachment_repo.create(model).await?;
        tracing::debug!(
            attachment_id = %attachment.id,
            user_id = %user_id,
            size = attachment.size,
            "Uploaded image"
        );

        Ok(attachment)
    }

    /// Get an attachment by ID.
    pub async fn get(&self, id: &str) -> AppResult<attachment::Model> {
        self.attachment_repo.get_by_id(id).await
    }
}

/// Probe image dimensions. Undecodable data yields no dimensions.
fn image_dimensions(data: &[u8]) -> (Option<i32>, Option<i32>) {
    image::load_from_memory(data).map_or((None, None), |img| {
        (
            i32::try_from(img.width()).ok(),
            i32::try_from(img.height()).ok(),
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_image_dimensions_garbage_data() {
        let (width, height) = image_dimensions(b"definitely not an image");
        assert!(width.is_none());
        assert!(height.is_none());
    }

    #[test]
    fn test_image_dimensions_tiny_png() {
        // 1x1 transparent PNG
        let png: &[u8] = &[
            0x89, 0x50, 0x4e, 0x47, 0x0d, 0x0a, 0x1a, 0x0a, 0x00, 0x00, 0x00, 0x0d, 0x49, 0x48,
            0x44, 0x52, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x01, 0x08, 0x06, 0x00, 0x00,
            0x00, 0x1f, 0x15, 0xc4, 0x89, 0x00, 0x00, 0x00, 0x0d, 0x49, 0x44, 0x41, 0x54, 0x78,
            0x9c, 0x62, 0x00, 0x01, 0x00, 0x00, 0x05, 0x00, 0x01, 0x0d, 0x0a, 0x2d, 0xb4, 0x00,
            0x00, 0x00, 0x00, 0x49, 0x45, 0x4e, 0x44, 0xae, 0x42, 0x60, 0x82,
        ];
        let (width, height) = image_dimensions(png);
        assert_eq!(width, Some(1));
        assert_eq!(height, Some(1));
    }
}
