use axum::{
    async_trait,
    extract::{FromRequest, Request},
};
use validator::Validate;

use crate::error::{ApiError, ValidationError};

use super::Extractor;

/// An extractor that validates the payload extracted by another extractor.
///
/// Rejects with the list of violations when validation fails.
pub struct Validated<X>(pub X);

#[async_trait]
impl<X, S> FromRequest<S> for Validated<X>
where
    X: FromRequest<S, Rejection = ApiError> + Extractor + Send,
    <X as Extractor>::Extracted: Validate,
    S: Send + Sync,
{
    type Rejection = ApiError;

    #[tracing::instrument(name = "validated_extractor", skip_all)]
    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let inner = X::from_request(req, state).await?;
        let extracted = inner.extracted();

        match extracted.validate() {
            Ok(_) => {
                tracing::trace!("Validated");

                Ok(Validated(inner))
            }
            Err(errors) => {
                tracing::warn!(?errors, "Validation errors");

                Err(ValidationError::from_validation_errors(errors).into())
            }
        }
    }
}
