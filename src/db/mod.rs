//! Database abstraction layer.
//!
//! Provides a trait-based interface for query execution, allowing the
//! report runner to be tested against mock backends.

mod mock;
mod postgres;
mod types;

pub use mock::{FailingDatabaseClient, MockDatabaseClient};
pub use postgres::PostgresClient;
pub use types::{ColumnInfo, QueryResult, Row, Value};

use crate::config::ConnectionConfig;
use crate::error::Result;
use async_trait::async_trait;

/// Creates a database client for the given connection configuration.
///
/// This is the central factory function for database connections.
pub async fn connect(config: &ConnectionConfig) -> Result<Box<dyn DatabaseClient>> {
    let client = PostgresClient::connect(config).await?;
    Ok(Box::new(client))
}

/// Trait defining the interface for database clients.
///
/// All operations are async and return Results with ReportError.
#[async_trait]
pub trait DatabaseClient: Send + Sync {
    /// Opens a connection for the given configuration.
    async fn connect(config: &ConnectionConfig) -> Result<Self>
    where
        Self: Sized;

    /// Executes a SQL query with positional text parameters and returns
    /// the full result set.
    async fn execute_query(&self, sql: &str, params: &[&str]) -> Result<QueryResult>;

    /// Closes the database connection.
    async fn close(&self) -> Result<()>;
}
