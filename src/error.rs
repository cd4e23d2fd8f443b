use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use derive_more::From;
use serde::Serialize;

use crate::repository::RepositoryError;

/// API error.
///
/// Every failure a handler can produce, serialized on the wire as
/// `{"error": {"message": .., "status": .., ..detail}}`.
#[derive(Debug, From)]
pub enum ApiError {
    /// The request body could not be parsed.
    Body(BodyError),
    /// The path parameters could not be parsed.
    Path(PathError),
    /// The payload failed book schema validation.
    Validation(ValidationError),
    /// No book matches the requested isbn.
    BookNotFound(BookNotFoundError),
    /// A book with the requested isbn already exists.
    Conflict(ConflictError),
    /// The requested route does not exist.
    NotFound(NotFoundError),
    /// The method is not allowed on this route.
    MethodNotAllowed(MethodNotAllowedError),
    /// Internal server error.
    InternalServerError(InternalServerError),
}

impl ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Body(err) => err.status_code(),
            ApiError::Path(err) => err.status_code(),
            ApiError::Validation(err) => err.status_code(),
            ApiError::BookNotFound(err) => err.status_code(),
            ApiError::Conflict(err) => err.status_code(),
            ApiError::NotFound(err) => err.status_code(),
            ApiError::MethodNotAllowed(err) => err.status_code(),
            ApiError::InternalServerError(err) => err.status_code(),
        }
    }

    fn message(&self) -> String {
        match self {
            ApiError::Body(_) => "Failed to parse request body".to_string(),
            ApiError::Path(_) => "Failed to parse path parameters".to_string(),
            ApiError::Validation(_) => "Book validation failed".to_string(),
            ApiError::BookNotFound(err) => {
                format!("There is no book with an isbn {}", err.isbn)
            }
            ApiError::Conflict(err) => {
                format!("There is already a book with an isbn {}", err.isbn)
            }
            ApiError::NotFound(_) => "The requested resource was not found".to_string(),
            ApiError::MethodNotAllowed(_) => "Method not allowed".to_string(),
            ApiError::InternalServerError(_) => {
                "An internal server error has occurred".to_string()
            }
        }
    }
}

impl From<RepositoryError> for ApiError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound { isbn } => {
                ApiError::BookNotFound(BookNotFoundError { isbn })
            }
            RepositoryError::Duplicate { isbn } => ApiError::Conflict(ConflictError { isbn }),
            RepositoryError::Database(err) => {
                ApiError::InternalServerError(InternalServerError::from_generic_error(err))
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status_code = self.status_code();

        (status_code, Json(ApiErrorResponse::from(self))).into_response()
    }
}

#[derive(Debug, Serialize)]
struct ApiErrorResponse {
    error: ApiErrorBody,
}

#[derive(Debug, Serialize)]
struct ApiErrorBody {
    message: String,
    status: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    violations: Option<Vec<Violation>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    reason: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    expected_schema: Option<String>,
}

impl From<ApiError> for ApiErrorResponse {
    fn from(error: ApiError) -> Self {
        let message = error.message();
        let status = error.status_code().as_u16();

        let (violations, reason, expected_schema) = match error {
            ApiError::Validation(err) => (Some(err.violations), None, None),
            ApiError::Body(err) => (None, Some(err.reason), Some(err.expected_schema)),
            ApiError::Path(err) => (None, Some(err.reason), None),
            _ => (None, None, None),
        };

        ApiErrorResponse {
            error: ApiErrorBody {
                message,
                status,
                violations,
                reason,
                expected_schema,
            },
        }
    }
}

#[derive(Debug)]
pub struct BodyError {
    pub reason: String,
    pub expected_schema: String,
}

impl BodyError {
    fn status_code(&self) -> StatusCode {
        StatusCode::BAD_REQUEST
    }
}

#[derive(Debug)]
pub struct PathError {
    pub reason: String,
}

impl PathError {
    fn status_code(&self) -> StatusCode {
        StatusCode::BAD_REQUEST
    }
}

/// One field-level schema violation.
#[derive(Debug, Serialize)]
pub struct Violation {
    pub field: String,
    pub message: String,
}

#[derive(Debug)]
pub struct ValidationError {
    violations: Vec<Violation>,
}

impl ValidationError {
    pub fn from_validation_errors(errors: validator::ValidationErrors) -> Self {
        let mut violations: Vec<Violation> = errors
            .field_errors()
            .into_iter()
            .flat_map(|(field, errors)| {
                errors.iter().map(move |error| Violation {
                    field: field.to_string(),
                    message: error
                        .message
                        .as_deref()
                        .map(str::to_string)
                        .unwrap_or_else(|| error.code.to_string()),
                })
            })
            .collect();

        violations.sort_by(|a, b| a.field.cmp(&b.field));

        ValidationError { violations }
    }

    fn status_code(&self) -> StatusCode {
        // Invalid payloads have always been answered with a 404 here, not a
        // 400. Existing clients depend on it.
        StatusCode::NOT_FOUND
    }
}

#[derive(Debug)]
pub struct BookNotFoundError {
    pub isbn: String,
}

impl BookNotFoundError {
    fn status_code(&self) -> StatusCode {
        StatusCode::NOT_FOUND
    }
}

#[derive(Debug)]
pub struct ConflictError {
    pub isbn: String,
}

impl ConflictError {
    fn status_code(&self) -> StatusCode {
        StatusCode::CONFLICT
    }
}

#[derive(Debug)]
pub struct NotFoundError;

impl NotFoundError {
    fn status_code(&self) -> StatusCode {
        StatusCode::NOT_FOUND
    }
}

#[derive(Debug)]
pub struct MethodNotAllowedError;

impl MethodNotAllowedError {
    fn status_code(&self) -> StatusCode {
        StatusCode::METHOD_NOT_ALLOWED
    }
}

#[derive(Debug)]
pub struct InternalServerError;

impl InternalServerError {
    pub fn from_generic_error<E: Into<anyhow::Error>>(err: E) -> Self {
        let err: anyhow::Error = err.into();
        let err = format!("{err:#}");
        tracing::error!(%err, "Internal server error");

        InternalServerError
    }

    fn status_code(&self) -> StatusCode {
        StatusCode::INTERNAL_SERVER_ERROR
    }
}
