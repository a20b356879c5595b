//! MongoDB connection factory for the book runner.
//!
//! [`Store`] is the one connection a run owns: acquired with
//! [`Store::connect`] before any query and released with [`Store::close`].

use std::time::Duration;

use mongodb::{
    bson::{doc, Document},
    options::ClientOptions,
    Client, Collection, Database,
};
use shelf_kernel::settings::DatabaseSettings;
use thiserror::Error;

/// Failures while opening or closing the connection
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("invalid connection string '{uri}': {source}")]
    InvalidUri {
        uri: String,
        #[source]
        source: mongodb::error::Error,
    },

    #[error("database server did not answer ping: {0}")]
    Unreachable(#[source] mongodb::error::Error),

    #[error("failed to build client: {0}")]
    Client(#[source] mongodb::error::Error),
}

/// Open connection plus the database and collection handles a run needs
pub struct Store {
    client: Client,
    database: Database,
    books: Collection<Document>,
}

impl Store {
    /// Parse the connection string, build the client and ping the server.
    pub async fn connect(settings: &DatabaseSettings) -> Result<Self, StoreError> {
        let options = client_options(settings).await?;
        let client = Client::with_options(options).map_err(StoreError::Client)?;

        client
            .database("admin")
            .run_command(doc! { "ping": 1 })
            .await
            .map_err(StoreError::Unreachable)?;

        let database = client.database(&settings.database);
        let books = database.collection::<Document>(&settings.collection);

        tracing::info!(
            target: "shelf-db",
            database = %settings.database,
            collection = %settings.collection,
            "connected to MongoDB"
        );

        Ok(Self {
            client,
            database,
            books,
        })
    }

    pub fn database(&self) -> &Database {
        &self.database
    }

    /// The book collection as raw documents
    pub fn books(&self) -> &Collection<Document> {
        &self.books
    }

    /// The book collection with a typed document model
    pub fn typed_books<T: Send + Sync>(&self) -> Collection<T> {
        self.books.clone_with_type()
    }

    /// Release the connection, waiting for in-flight work to finish.
    pub async fn close(self) {
        self.client.shutdown().await;
        tracing::info!(target: "shelf-db", "MongoDB connection closed");
    }
}

async fn client_options(settings: &DatabaseSettings) -> Result<ClientOptions, StoreError> {
    let mut options =
        ClientOptions::parse(&settings.uri)
            .await
            .map_err(|source| StoreError::InvalidUri {
                uri: settings.uri.clone(),
                source,
            })?;

    if let Some(app_name) = &settings.app_name {
        options.app_name = Some(app_name.clone());
    }
    if let Some(ms) = settings.connect_timeout_ms {
        options.connect_timeout = Some(Duration::from_millis(ms));
    }
    if let Some(ms) = settings.server_selection_timeout_ms {
        options.server_selection_timeout = Some(Duration::from_millis(ms));
    }

    Ok(options)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn malformed_uri_is_reported_before_connecting() {
        let settings = DatabaseSettings {
            uri: "postgres://localhost:5432".to_string(),
            ..DatabaseSettings::default()
        };

        let err = match Store::connect(&settings).await {
            Ok(_) => panic!("expected an invalid URI error"),
            Err(err) => err,
        };
        assert!(matches!(err, StoreError::InvalidUri { .. }));
        assert!(err.to_string().contains("postgres://localhost:5432"));
    }

    #[tokio::test]
    async fn timeouts_and_app_name_are_applied() {
        let settings = DatabaseSettings {
            connect_timeout_ms: Some(1500),
            server_selection_timeout_ms: Some(2500),
            ..DatabaseSettings::default()
        };

        let options = client_options(&settings).await.unwrap();
        assert_eq!(options.app_name.as_deref(), Some("shelf"));
        assert_eq!(options.connect_timeout, Some(Duration::from_millis(1500)));
        assert_eq!(
            options.server_selection_timeout,
            Some(Duration::from_millis(2500))
        );
    }

    #[tokio::test]
    async fn unset_timeouts_keep_driver_defaults() {
        let options = client_options(&DatabaseSettings::default()).await.unwrap();
        assert!(options.connect_timeout.is_none());
        assert!(options.server_selection_timeout.is_none());
    }
}
