use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use itertools::Itertools;

use crate::api::{Book, BookId};
use crate::books_repository::{BookRepository, BookRepositoryError};

struct StoredBook {
    sequence: u64,
    book: Book,
}

pub struct InMemoryBookRepository {
    book_sequence_generator: AtomicU64,
    books: parking_lot::RwLock<HashMap<BookId, StoredBook>>,
}

impl Default for InMemoryBookRepository {
    fn default() -> Self {
        Self {
            book_sequence_generator: Default::default(),
            books: Default::default(),
        }
    }
}

impl InMemoryBookRepository {
    fn collect_books<F>(&self, filter: F) -> Vec<Book>
    where
        F: Fn(&Book) -> bool,
    {
        self.books
            .read()
            .values()
            .filter(|stored| filter(&stored.book))
            .sorted_by_key(|stored| stored.sequence)
            .map(|stored| stored.book.clone())
            .collect()
    }
}

#[async_trait::async_trait]
impl BookRepository for InMemoryBookRepository {
    async fn insert_book(&self, book: Book) -> Result<Book, BookRepositoryError> {
        match self.books.write().entry(book.id) {
            Entry::Occupied(_) => Err(BookRepositoryError::AlreadyExists(book.id)),
            Entry::Vacant(entry) => {
                let sequence = self.book_sequence_generator.fetch_add(1, Ordering::Relaxed);
                entry.insert(StoredBook {
                    sequence,
                    book: book.clone(),
                });
                Ok(book)
            }
        }
    }

    async fn get_book(&self, book_id: BookId) -> Result<Option<Book>, BookRepositoryError> {
        Ok(self
            .books
            .read()
            .get(&book_id)
            .map(|stored| stored.book.clone()))
    }

    async fn list_books(&self) -> Result<Vec<Book>, BookRepositoryError> {
        Ok(self.collect_books(|_| true))
    }

    async fn find_books_by_author_name(
        &self,
        fragment: &str,
    ) -> Result<Vec<Book>, BookRepositoryError> {
        Ok(self.collect_books(|book| book.author_name.contains(fragment)))
    }

    async fn update_book(&self, book: &Book) -> Result<bool, BookRepositoryError> {
        let mut locked_books = self.books.write();
        if let Some(stored) = locked_books.get_mut(&book.id) {
            stored.book.apply(book.details());
            Ok(true)
        } else {
            Ok(false)
        }
    }

    async fn delete_book_by_id(&self, book_id: BookId) -> Result<bool, BookRepositoryError> {
        Ok(self.books.write().remove(&book_id).is_some())
    }
}

#[cfg(test)]
mod in_memory_book_repository_tests {
    use rust_decimal::Decimal;
    use uuid::Uuid;

    use crate::api::{Book, BookDetails};
    use crate::books_repository::{BookRepository, BookRepositoryError, InMemoryBookRepository};

    fn default_book() -> Book {
        Book::new(BookDetails {
            author_name: "Ivan Franchin".to_string(),
            title: "Spring Boot".to_string(),
            price: Decimal::new(1999, 2),
        })
    }

    #[tokio::test]
    async fn test_list_books_of_empty_repository() {
        let repo = InMemoryBookRepository::default();

        let books = repo.list_books().await.expect("Failed to list books");
        assert_eq!(books, vec![]);
    }

    #[tokio::test]
    /// Tests if insert_book and get_book work correctly
    async fn test_insert_book_and_get_it() {
        let repo = InMemoryBookRepository::default();

        let book_not_found = repo
            .get_book(Uuid::new_v4())
            .await
            .expect("Failed to get book");
        assert_eq!(book_not_found, None);

        let book = default_book();
        let inserted = repo
            .insert_book(book.clone())
            .await
            .expect("Failed to insert book");
        assert_eq!(inserted, book);

        let found = repo.get_book(book.id).await.expect("Failed to get book");
        assert_eq!(found, Some(book.clone()));

        let books = repo.list_books().await.expect("Failed to list books");
        assert_eq!(books, vec![book]);
    }

    #[tokio::test]
    async fn test_insert_book_with_taken_id_fails() {
        let repo = InMemoryBookRepository::default();
        let book = default_book();
        repo.insert_book(book.clone())
            .await
            .expect("Failed to insert book");

        let duplicate = Book {
            title: "Other".to_string(),
            ..book.clone()
        };
        let result = repo.insert_book(duplicate).await;
        assert!(matches!(result, Err(BookRepositoryError::AlreadyExists(id)) if id == book.id));

        let found = repo.get_book(book.id).await.expect("Failed to get book");
        assert_eq!(found, Some(book));
    }

    #[tokio::test]
    /// Tests if list_books keeps insertion order
    async fn test_add_books_and_list_them() {
        let repo = InMemoryBookRepository::default();

        let mut added = vec![];
        for title in ["title1", "title2", "title3"] {
            let book = repo
                .add_book(BookDetails {
                    title: title.to_string(),
                    ..default_book().details()
                })
                .await
                .expect("Failed to add book");
            added.push(book);
        }

        let books = repo.list_books().await.expect("Failed to list books");
        assert_eq!(books, added);
    }

    #[tokio::test]
    async fn test_find_books_by_author_name() {
        let repo = InMemoryBookRepository::default();
        let book = repo
            .insert_book(default_book())
            .await
            .expect("Failed to insert book");
        repo.add_book(BookDetails {
            author_name: "Craig Walls".to_string(),
            ..book.details()
        })
        .await
        .expect("Failed to add book");

        let found = repo
            .find_books_by_author_name("Franchin")
            .await
            .expect("Failed to find books");
        assert_eq!(found, vec![book]);

        let found = repo
            .find_books_by_author_name("franchin")
            .await
            .expect("Failed to find books");
        assert_eq!(found, vec![]);

        let found = repo
            .find_books_by_author_name("a")
            .await
            .expect("Failed to find books");
        assert_eq!(found.len(), 2);
    }

    #[tokio::test]
    async fn test_delete_book() {
        let repo = InMemoryBookRepository::default();
        let book = repo
            .insert_book(default_book())
            .await
            .expect("Failed to insert book");
        assert!(repo
            .get_book(book.id)
            .await
            .expect("Failed to get book")
            .is_some());

        let deleted = repo.delete_book(&book).await.expect("Failed to delete");
        assert!(deleted);
        assert_eq!(
            repo.get_book(book.id).await.expect("Failed to get book"),
            None
        );

        // deleting again is not an error
        let deleted = repo.delete_book(&book).await.expect("Failed to delete");
        assert!(!deleted);
    }

    #[tokio::test]
    async fn test_update_book() {
        let repo = InMemoryBookRepository::default();

        let missing = default_book();
        let result = repo
            .update_book(&missing)
            .await
            .expect("Failed to update");
        // false means nothing to update
        assert!(!result);
        assert_eq!(
            repo.get_book(missing.id).await.expect("Failed to get book"),
            None
        );

        let mut book = repo
            .insert_book(default_book())
            .await
            .expect("Failed to insert book");
        book.apply(BookDetails {
            author_name: "Ivan Franchin Jr.".to_string(),
            title: "Java 8".to_string(),
            price: Decimal::new(1299, 2),
        });

        let result = repo.update_book(&book).await.expect("Failed to update");
        assert!(result);

        let found = repo
            .get_book(book.id)
            .await
            .expect("Failed to get book")
            .expect("Book not found");
        assert_eq!(found, book);
        assert_eq!(found.author_name, "Ivan Franchin Jr.");
        assert_eq!(found.title, "Java 8");
        assert_eq!(found.price, Decimal::new(1299, 2));
    }
}
