use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::{error::ApiError, extractor::path::ApiPath, state::ApiState, types::book::Book};

use super::BookPath;

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct GetBookResponse {
    pub book: Book,
}

impl IntoResponse for GetBookResponse {
    fn into_response(self) -> Response {
        (StatusCode::OK, Json(self)).into_response()
    }
}

pub async fn get_book(
    State(state): State<ApiState>,
    ApiPath(path): ApiPath<BookPath>,
) -> Result<GetBookResponse, ApiError> {
    let book = state.repository().get_by_isbn(&path.isbn).await?;

    Ok(GetBookResponse { book })
}
