pub use in_memory_books_repository::InMemoryBookRepository;
pub use postgres_books_repository::{PostgresBooksRepository, PostgresBooksRepositoryConfig};

use crate::api::{Book, BookDetails, BookId};

mod in_memory_books_repository;
mod postgres_books_repository;

#[derive(thiserror::Error, Debug)]
pub enum BookRepositoryError {
    #[error("Book {0} already exists")]
    AlreadyExists(BookId),

    #[error("Failed to deserialize book: {0}")]
    DeserializationError(#[from] serde_json::Error),

    #[error("DatabaseFailure failure {0}")]
    DatabaseFailure(#[from] tokio_postgres::Error),
}

#[async_trait::async_trait]
pub trait BookRepository: Send + Sync {
    /// Stores a new book, fails with AlreadyExists if a book with the same id is stored
    async fn insert_book(&self, book: Book) -> Result<Book, BookRepositoryError>;

    /// Stores a new book under a freshly generated id
    async fn add_book(&self, details: BookDetails) -> Result<Book, BookRepositoryError> {
        self.insert_book(Book::new(details)).await
    }

    /// Retrieves the book, None if it is not in the repository
    async fn get_book(&self, book_id: BookId) -> Result<Option<Book>, BookRepositoryError>;

    /// Lists all books in insertion order
    async fn list_books(&self) -> Result<Vec<Book>, BookRepositoryError>;

    /// Lists books whose author name contains the fragment (case sensitive)
    async fn find_books_by_author_name(
        &self,
        fragment: &str,
    ) -> Result<Vec<Book>, BookRepositoryError>;

    /// Replaces author name, title and price of the stored book with the same id.
    /// Returns true if book was updated and false if it was not found
    async fn update_book(&self, book: &Book) -> Result<bool, BookRepositoryError>;

    /// Removes the book, returns false if there was nothing to remove
    async fn delete_book_by_id(&self, book_id: BookId) -> Result<bool, BookRepositoryError>;

    async fn delete_book(&self, book: &Book) -> Result<bool, BookRepositoryError> {
        self.delete_book_by_id(book.id).await
    }
}
