use anyhow::Context;
use serde_json::json;
use tokio_postgres::{Client, NoTls, Row, Statement};

use crate::api::{Book, BookId};
use crate::books_repository::{BookRepository, BookRepositoryError};

/// Books are kept as JSONB documents, `seq` only tracks insertion order
pub struct PostgresBooksRepository {
    client: Client,
}

#[derive(Debug, Clone)]
pub struct PostgresBooksRepositoryConfig {
    pub hostname: String,
    pub username: String,
    pub password: String,
}

impl PostgresBooksRepository {
    pub async fn init(config: PostgresBooksRepositoryConfig) -> anyhow::Result<Self> {
        let connection_str = format!(
            "postgresql://{}:{}@{}",
            config.username, config.password, config.hostname
        );
        tracing::info!(
            "Connecting to postgres at {} as {}",
            config.hostname,
            config.username
        );
        let (client, connection) = tokio_postgres::connect(&connection_str, NoTls)
            .await
            .context("Failed to start postgres")?;

        tokio::spawn(async move {
            if let Err(e) = connection.await {
                tracing::error!("Postgres connection error: {}", e);
            }
        });

        client
            .batch_execute(
                "
        CREATE TABLE IF NOT EXISTS books (
            seq             BIGSERIAL,
            id              UUID PRIMARY KEY,
            params          JSONB NOT NULL
            )
        ",
            )
            .await
            .context("Failed to setup table")?;
        Ok(Self { client })
    }

    async fn query_books(
        &self,
        query: &str,
        params: &[&(dyn tokio_postgres::types::ToSql + Sync)],
    ) -> Result<Vec<Book>, BookRepositoryError> {
        let stmt: Statement = self.client.prepare(query).await?;
        let rows = self.client.query(&stmt, params).await?;
        rows.iter().map(book_from_row).collect()
    }
}

fn book_from_row(row: &Row) -> Result<Book, BookRepositoryError> {
    let params: serde_json::Value = row.try_get(0)?;
    Ok(serde_json::from_value(params)?)
}

#[async_trait::async_trait]
impl BookRepository for PostgresBooksRepository {
    #[tracing::instrument(skip(self, book), fields(book_id = %book.id))]
    async fn insert_book(&self, book: Book) -> Result<Book, BookRepositoryError> {
        let stmt: Statement = self
            .client
            .prepare("INSERT INTO books (id, params) VALUES ($1, $2) ON CONFLICT (id) DO NOTHING RETURNING id")
            .await?;

        let rows = self.client.query(&stmt, &[&book.id, &json!(book)]).await?;
        if rows.is_empty() {
            return Err(BookRepositoryError::AlreadyExists(book.id));
        }
        Ok(book)
    }

    #[tracing::instrument(skip(self))]
    async fn get_book(&self, book_id: BookId) -> Result<Option<Book>, BookRepositoryError> {
        let stmt: Statement = self
            .client
            .prepare("SELECT params FROM books WHERE id = ($1)")
            .await?;

        let rows = self.client.query(&stmt, &[&book_id]).await?;
        rows.first().map(book_from_row).transpose()
    }

    #[tracing::instrument(skip(self))]
    async fn list_books(&self) -> Result<Vec<Book>, BookRepositoryError> {
        self.query_books("SELECT params FROM books ORDER BY seq", &[])
            .await
    }

    #[tracing::instrument(skip(self))]
    async fn find_books_by_author_name(
        &self,
        fragment: &str,
    ) -> Result<Vec<Book>, BookRepositoryError> {
        // strpos matches literally, LIKE would treat % and _ in the fragment as wildcards
        self.query_books(
            "SELECT params FROM books WHERE strpos(params->>'author_name', $1) > 0 ORDER BY seq",
            &[&fragment],
        )
        .await
    }

    #[tracing::instrument(skip(self, book), fields(book_id = %book.id))]
    async fn update_book(&self, book: &Book) -> Result<bool, BookRepositoryError> {
        let stmt: Statement = self
            .client
            .prepare("UPDATE books SET params = ($1) WHERE id = ($2) RETURNING id")
            .await?;

        let rows = self.client.query(&stmt, &[&json!(book), &book.id]).await?;
        Ok(!rows.is_empty())
    }

    #[tracing::instrument(skip(self))]
    async fn delete_book_by_id(&self, book_id: BookId) -> Result<bool, BookRepositoryError> {
        let stmt: Statement = self
            .client
            .prepare("DELETE FROM books WHERE id = ($1) RETURNING id")
            .await?;

        let rows = self.client.query(&stmt, &[&book_id]).await?;
        Ok(!rows.is_empty())
    }
}
