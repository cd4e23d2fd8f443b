use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::{
    error::{ApiError, InternalServerError},
    extractor::{json::ApiJson, path::ApiPath, validated::Validated},
    state::ApiState,
    types::book::{Book, BookDraft},
};

use super::BookPath;

/// The seven non-key attributes. The isbn comes from the path; one present
/// in the body is ignored.
#[derive(Debug, Deserialize, JsonSchema, Validate)]
pub struct UpdateBookRequest {
    #[validate(required(message = "is required"))]
    pub amazon_url: Option<String>,
    #[validate(required(message = "is required"))]
    pub author: Option<String>,
    #[validate(required(message = "is required"))]
    pub language: Option<String>,
    #[validate(required(message = "is required"))]
    pub pages: Option<i64>,
    #[validate(required(message = "is required"))]
    pub publisher: Option<String>,
    #[validate(required(message = "is required"))]
    pub title: Option<String>,
    #[validate(required(message = "is required"))]
    pub year: Option<i64>,
}

impl UpdateBookRequest {
    /// `None` only if the payload has not been through validation.
    fn into_draft(self) -> Option<BookDraft> {
        Some(BookDraft {
            amazon_url: self.amazon_url?,
            author: self.author?,
            language: self.language?,
            pages: self.pages?,
            publisher: self.publisher?,
            title: self.title?,
            year: self.year?,
        })
    }
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct UpdateBookResponse {
    pub book: Book,
}

impl IntoResponse for UpdateBookResponse {
    fn into_response(self) -> Response {
        (StatusCode::OK, Json(self)).into_response()
    }
}

pub async fn update_book(
    State(state): State<ApiState>,
    ApiPath(path): ApiPath<BookPath>,
    Validated(ApiJson(request)): Validated<ApiJson<UpdateBookRequest>>,
) -> Result<UpdateBookResponse, ApiError> {
    let draft = request.into_draft().ok_or_else(|| {
        InternalServerError::from_generic_error(anyhow::anyhow!(
            "Update payload passed validation with missing fields"
        ))
    })?;

    let book = state.repository().update(&path.isbn, &draft).await?;

    Ok(UpdateBookResponse { book })
}
