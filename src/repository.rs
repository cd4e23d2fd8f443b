use sqlx::SqlitePool;

use crate::types::book::{Book, BookDraft};

#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("No book with isbn {isbn}")]
    NotFound { isbn: String },
    #[error("A book with isbn {isbn} already exists")]
    Duplicate { isbn: String },
    #[error("Database failure: {0}")]
    Database(#[from] sqlx::Error),
}

/// Data access for the `books` table.
///
/// Every operation is a single parameterized statement executed on a
/// connection checked out of the pool.
#[derive(Clone)]
pub struct BookRepository {
    pool: SqlitePool,
}

impl BookRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Returns all books, ordered by title ascending.
    #[tracing::instrument(skip_all)]
    pub async fn list_all(&self) -> Result<Vec<Book>, RepositoryError> {
        let books = sqlx::query_as::<_, Book>(
            "SELECT isbn, amazon_url, author, language, pages, publisher, title, year \
             FROM books ORDER BY title",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(books)
    }

    /// Returns the book with the given isbn.
    #[tracing::instrument(skip(self))]
    pub async fn get_by_isbn(&self, isbn: &str) -> Result<Book, RepositoryError> {
        let book = sqlx::query_as::<_, Book>(
            "SELECT isbn, amazon_url, author, language, pages, publisher, title, year \
             FROM books WHERE isbn = ?",
        )
        .bind(isbn)
        .fetch_optional(&self.pool)
        .await?;

        book.ok_or_else(|| RepositoryError::NotFound {
            isbn: isbn.to_string(),
        })
    }

    /// Inserts a new book and returns the persisted row.
    #[tracing::instrument(skip(self))]
    pub async fn create(&self, book: &Book) -> Result<Book, RepositoryError> {
        let book = sqlx::query_as::<_, Book>(
            "INSERT INTO books (isbn, amazon_url, author, language, pages, publisher, title, year) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?) \
             RETURNING isbn, amazon_url, author, language, pages, publisher, title, year",
        )
        .bind(&book.isbn)
        .bind(&book.amazon_url)
        .bind(&book.author)
        .bind(&book.language)
        .bind(book.pages)
        .bind(&book.publisher)
        .bind(&book.title)
        .bind(book.year)
        .fetch_one(&self.pool)
        .await
        .map_err(|err| {
            if is_unique_violation(&err) {
                return RepositoryError::Duplicate {
                    isbn: book.isbn.clone(),
                };
            }

            RepositoryError::Database(err)
        })?;

        Ok(book)
    }

    /// Replaces all non-key attributes of the book with the given isbn and
    /// returns the updated row.
    #[tracing::instrument(skip(self))]
    pub async fn update(&self, isbn: &str, draft: &BookDraft) -> Result<Book, RepositoryError> {
        let book = sqlx::query_as::<_, Book>(
            "UPDATE books \
             SET amazon_url = ?, author = ?, language = ?, pages = ?, publisher = ?, title = ?, year = ? \
             WHERE isbn = ? \
             RETURNING isbn, amazon_url, author, language, pages, publisher, title, year",
        )
        .bind(&draft.amazon_url)
        .bind(&draft.author)
        .bind(&draft.language)
        .bind(draft.pages)
        .bind(&draft.publisher)
        .bind(&draft.title)
        .bind(draft.year)
        .bind(isbn)
        .fetch_optional(&self.pool)
        .await?;

        book.ok_or_else(|| RepositoryError::NotFound {
            isbn: isbn.to_string(),
        })
    }

    /// Removes the book with the given isbn.
    #[tracing::instrument(skip(self))]
    pub async fn delete(&self, isbn: &str) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM books WHERE isbn = ?")
            .bind(isbn)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound {
                isbn: isbn.to_string(),
            });
        }

        Ok(())
    }
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    err.as_database_error()
        .is_some_and(|db_err| matches!(db_err.kind(), sqlx::error::ErrorKind::UniqueViolation))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::{Database, DatabaseConfig};

    async fn repository() -> BookRepository {
        let config = DatabaseConfig {
            url: "sqlite::memory:".to_string(),
            max_connections: 1,
        };

        let database = Database::open(&config)
            .await
            .expect("Failed to open in-memory database");

        BookRepository::new(database.pool().clone())
    }

    fn book(isbn: &str, title: &str) -> Book {
        Book {
            isbn: isbn.to_string(),
            amazon_url: format!("www.amazon/{isbn}.com"),
            author: "Test McTesty".to_string(),
            language: "English".to_string(),
            pages: 123,
            publisher: "Test Publishers".to_string(),
            title: title.to_string(),
            year: 2019,
        }
    }

    #[tokio::test]
    async fn create_then_get_round_trips() {
        let repository = repository().await;
        let book = book("123321", "Tests for Testy Test Takers");

        let created = repository.create(&book).await.expect("Create failed");
        assert_eq!(created, book);

        let fetched = repository
            .get_by_isbn("123321")
            .await
            .expect("Get after create failed");
        assert_eq!(fetched, book);
    }

    #[tokio::test]
    async fn create_duplicate_isbn_is_rejected() {
        let repository = repository().await;
        let book = book("123321", "Tests for Testy Test Takers");

        repository.create(&book).await.expect("Create failed");
        let err = repository
            .create(&book)
            .await
            .expect_err("Duplicate create should fail");

        assert!(matches!(err, RepositoryError::Duplicate { isbn } if isbn == "123321"));
    }

    #[tokio::test]
    async fn get_unknown_isbn_is_not_found() {
        let repository = repository().await;

        let err = repository
            .get_by_isbn("0")
            .await
            .expect_err("Get on empty table should fail");

        assert!(matches!(err, RepositoryError::NotFound { isbn } if isbn == "0"));
    }

    #[tokio::test]
    async fn list_is_ordered_by_title() {
        let repository = repository().await;

        repository
            .create(&book("2", "Zebra Stripes"))
            .await
            .expect("Create failed");
        repository
            .create(&book("1", "Aardvark Habits"))
            .await
            .expect("Create failed");

        let books = repository.list_all().await.expect("List failed");
        let titles: Vec<&str> = books.iter().map(|book| book.title.as_str()).collect();

        assert_eq!(titles, vec!["Aardvark Habits", "Zebra Stripes"]);
    }

    #[tokio::test]
    async fn update_replaces_every_attribute() {
        let repository = repository().await;

        repository
            .create(&book("123321", "Tests for Testy Test Takers"))
            .await
            .expect("Create failed");

        let draft = BookDraft {
            amazon_url: "www.amazon/book3.com".to_string(),
            author: "Test User1".to_string(),
            language: "Pig Latin".to_string(),
            pages: 21,
            publisher: "Test Publisher".to_string(),
            title: "Book of Tests".to_string(),
            year: 2020,
        };

        let updated = repository
            .update("123321", &draft)
            .await
            .expect("Update failed");

        assert_eq!(updated.isbn, "123321");
        assert_eq!(updated.amazon_url, draft.amazon_url);
        assert_eq!(updated.author, draft.author);
        assert_eq!(updated.language, draft.language);
        assert_eq!(updated.pages, draft.pages);
        assert_eq!(updated.publisher, draft.publisher);
        assert_eq!(updated.title, draft.title);
        assert_eq!(updated.year, draft.year);
    }

    #[tokio::test]
    async fn update_unknown_isbn_is_not_found() {
        let repository = repository().await;

        let draft = BookDraft {
            amazon_url: "www.amazon/book3.com".to_string(),
            author: "Test User".to_string(),
            language: "English".to_string(),
            pages: 21,
            publisher: "Test Publisher".to_string(),
            title: "Book of Tests".to_string(),
            year: 2020,
        };

        let err = repository
            .update("0", &draft)
            .await
            .expect_err("Update on empty table should fail");

        assert!(matches!(err, RepositoryError::NotFound { isbn } if isbn == "0"));
    }

    #[tokio::test]
    async fn delete_removes_the_row() {
        let repository = repository().await;

        repository
            .create(&book("123321", "Tests for Testy Test Takers"))
            .await
            .expect("Create failed");

        repository.delete("123321").await.expect("Delete failed");

        let err = repository
            .get_by_isbn("123321")
            .await
            .expect_err("Get after delete should fail");
        assert!(matches!(err, RepositoryError::NotFound { .. }));
    }

    #[tokio::test]
    async fn delete_unknown_isbn_is_not_found() {
        let repository = repository().await;

        let err = repository
            .delete("0")
            .await
            .expect_err("Delete on empty table should fail");

        assert!(matches!(err, RepositoryError::NotFound { isbn } if isbn == "0"));
    }
}
