use paperclip::actix::Apiv2Schema;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub type BookId = Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, Eq, PartialEq, Apiv2Schema)]
/// Mutable part of a book, used as payload when creating or updating books
pub struct BookDetails {
    pub author_name: String,
    pub title: String,
    pub price: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize, Eq, PartialEq, Apiv2Schema)]
/// Book as it is stored in the repository
pub struct Book {
    pub id: BookId,
    pub author_name: String,
    pub title: String,
    pub price: Decimal,
}

impl Book {
    /// Creates a book with a freshly generated id
    pub fn new(details: BookDetails) -> Self {
        Self::with_id(Uuid::new_v4(), details)
    }

    pub fn with_id(id: BookId, details: BookDetails) -> Self {
        Self {
            id,
            author_name: details.author_name,
            title: details.title,
            price: details.price,
        }
    }

    pub fn details(&self) -> BookDetails {
        BookDetails {
            author_name: self.author_name.clone(),
            title: self.title.clone(),
            price: self.price,
        }
    }

    /// Replaces author name, title and price, the id stays untouched
    pub fn apply(&mut self, details: BookDetails) {
        self.author_name = details.author_name;
        self.title = details.title;
        self.price = details.price;
    }
}
