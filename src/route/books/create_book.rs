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
    extractor::{json::ApiJson, validated::Validated},
    state::ApiState,
    types::book::Book,
};

/// A full book payload. Every attribute must be present.
#[derive(Debug, Deserialize, JsonSchema, Validate)]
pub struct CreateBookRequest {
    #[validate(required(message = "is required"))]
    pub isbn: Option<String>,
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

impl CreateBookRequest {
    /// `None` only if the payload has not been through validation.
    fn into_book(self) -> Option<Book> {
        Some(Book {
            isbn: self.isbn?,
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
pub struct CreateBookResponse {
    pub book: Book,
}

impl IntoResponse for CreateBookResponse {
    fn into_response(self) -> Response {
        (StatusCode::CREATED, Json(self)).into_response()
    }
}

pub async fn create_book(
    State(state): State<ApiState>,
    Validated(ApiJson(request)): Validated<ApiJson<CreateBookRequest>>,
) -> Result<CreateBookResponse, ApiError> {
    let book = request.into_book().ok_or_else(|| {
        InternalServerError::from_generic_error(anyhow::anyhow!(
            "Create payload passed validation with missing fields"
        ))
    })?;

    let book = state.repository().create(&book).await?;

    Ok(CreateBookResponse { book })
}
