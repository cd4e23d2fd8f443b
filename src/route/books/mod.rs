use schemars::JsonSchema;
use serde::Deserialize;

pub mod app;
pub mod create_book;
pub mod delete_book;
pub mod get_book;
pub mod list_books;
pub mod update_book;

pub use app::app;

/// Path parameters of the isbn-keyed routes.
#[derive(Debug, Deserialize, JsonSchema)]
pub struct BookPath {
    pub isbn: String,
}
