//! Upload endpoints for report images.

use axum::{
    Router,
    extract::{Multipart, State},
    routing::post,
};
use communityfix_common::AppResult;
use communityfix_core::CreateUploadInput;
use communityfix_db::entities::attachment::Model as AttachmentModel;
use serde::Serialize;

use crate::{extractors::AuthUser, middleware::AppState, response::ApiResponse};

/// Attachment response.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AttachmentResponse {
    pub id: String,
    pub created_at: String,
    pub name: String,
    #[serde(rename = "type")]
    pub content_type: String,
    pub size: i64,
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<i32>,
}

impl From<AttachmentModel> for AttachmentResponse {
    fn from(a: AttachmentModel) -> Self {
        Self {
            id: a.id,
            created_at: a.created_at.to_rfc3339(),
            name: a.name,
            content_type: a.content_type,
            size: a.size,
            url: a.url,
            width: a.width,
            height: a.height,
        }
    }
}

/// Upload an image via multipart form.
async fn upload_image(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> AppResult<ApiResponse<AttachmentResponse>> {
    let mut file_data: Option<Vec<u8>> = None;
    let mut file_name: Option<String> = None;
    let mut content_type: Option<String> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| communityfix_common::AppError::BadRequest(e.to_string()))?
    {
        let name = field.name().unwrap_or("").to_string();

        match name.as_str() {
            "file" => {
                file_name = field.file_name().map(std::string::ToString::to_string);
                content_type = field.content_type().map(std::string::ToString::to_string);
                file_data = Some(
                    field
                        .bytes()
                        .await
                        .map_err(|e| communityfix_common::AppError::BadRequest(e.to_string()))?
                        .to_vec(),
                );
            }
            "name" => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| communityfix_common::AppError::BadRequest(e.to_string()))?;
                if !text.is_empty() {
                    file_name = Some(text);
                }
            }
            _ => {}
        }
    }

    let data = file_data
        .ok_or_else(|| communityfix_common::AppError::BadRequest("No file provided".to_string()))?;

    let input = CreateUploadInput {
        name: file_name.unwrap_or_else(|| "unnamed".to_string()),
        content_type: content_type.unwrap_or_else(|| "application/octet-stream".to_string()),
        data,
    };

    let attachment = state.upload_service.upload(&user.id, input).await?;
    Ok(ApiResponse::ok(attachment.into()))
}

pub fn router() -> Router<AppState> {
    Router::new().route("/create", post(upload_image))
}
