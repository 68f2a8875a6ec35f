use std::sync::Arc;

use actix_web::http::header::LOCATION;
use actix_web::web::Data;
use actix_web::{Error, HttpResponse};
use paperclip::actix::{
    api_v2_operation,
    web::{self},
    Apiv2Schema,
};
use serde::Deserialize;

use crate::api::{Book, BookDetails, BookId};
use crate::books_repository::BookRepository;

pub type SharedBookRepository = Arc<dyn BookRepository>;

#[derive(Debug, Deserialize, Apiv2Schema)]
/// Optional filter of the book listing
pub struct BooksQuery {
    pub author_name: Option<String>,
}

#[api_v2_operation]
pub async fn health() -> Result<HttpResponse, Error> {
    Ok(HttpResponse::Ok().finish())
}

#[api_v2_operation]
pub async fn get_all_books(
    books_repository: Data<SharedBookRepository>,
    query: web::Query<BooksQuery>,
) -> Result<HttpResponse, Error> {
    let result = match query.into_inner().author_name {
        Some(fragment) => books_repository.find_books_by_author_name(&fragment).await,
        None => books_repository.list_books().await,
    };
    Ok(match result {
        Ok(books) => HttpResponse::Ok().json(books),
        Err(err) => {
            tracing::error!("Get all books failed {}", err);
            HttpResponse::InternalServerError().finish()
        }
    })
}

#[api_v2_operation]
pub async fn add_book(
    books_repository: Data<SharedBookRepository>,
    details: web::Json<BookDetails>,
) -> Result<HttpResponse, Error> {
    Ok(
        match books_repository.add_book(details.into_inner()).await {
            Ok(book) => HttpResponse::Created()
                .append_header((LOCATION, format!("/api/books/{}", book.id)))
                .json(book),
            Err(err) => {
                tracing::error!("Add book failed {}", err);
                HttpResponse::InternalServerError().finish()
            }
        },
    )
}

#[api_v2_operation]
pub async fn update_book(
    books_repository: Data<SharedBookRepository>,
    book_id: web::Path<BookId>,
    details: web::Json<BookDetails>,
) -> Result<HttpResponse, Error> {
    let book = Book::with_id(book_id.into_inner(), details.into_inner());
    Ok(match books_repository.update_book(&book).await {
        Ok(true) => HttpResponse::Ok().json(book),
        Ok(false) => HttpResponse::NotFound().finish(),
        Err(err) => {
            tracing::error!("Update book failed {}", err);
            HttpResponse::InternalServerError().finish()
        }
    })
}

#[api_v2_operation]
pub async fn get_book(
    books_repository: Data<SharedBookRepository>,
    book_id: web::Path<BookId>,
) -> Result<HttpResponse, Error> {
    Ok(
        match books_repository.get_book(book_id.into_inner()).await {
            Ok(Some(book)) => HttpResponse::Ok().json(book),
            Ok(None) => HttpResponse::NotFound().finish(),
            Err(err) => {
                tracing::error!("Get book failed {}", err);
                HttpResponse::InternalServerError().finish()
            }
        },
    )
}

#[api_v2_operation]
pub async fn delete_book(
    books_repository: Data<SharedBookRepository>,
    book_id: web::Path<BookId>,
) -> Result<HttpResponse, Error> {
    let book = match books_repository.get_book(book_id.into_inner()).await {
        Ok(Some(book)) => book,
        Ok(None) => return Ok(HttpResponse::NotFound().finish()),
        Err(err) => {
            tracing::error!("Delete book failed {}", err);
            return Ok(HttpResponse::InternalServerError().finish());
        }
    };
    Ok(match books_repository.delete_book(&book).await {
        Ok(true) => HttpResponse::Ok().json(book),
        Ok(false) => HttpResponse::NotFound().finish(),
        Err(err) => {
            tracing::error!("Delete book failed {}", err);
            HttpResponse::InternalServerError().finish()
        }
    })
}
