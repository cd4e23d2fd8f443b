pub mod json;
pub mod path;
pub mod validated;

/// Uniform access to the value an extractor produced.
pub trait Extractor {
    type Extracted;

    fn extracted(&self) -> &Self::Extracted;

    fn extracted_mut(&mut self) -> &mut Self::Extracted;

    fn into_extracted(self) -> Self::Extracted;
}
