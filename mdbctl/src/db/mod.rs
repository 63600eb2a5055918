//! Database layer: the MongoDB connection handle and the catalog component
//! built on top of it.
//!
//! The handle is the only place a driver client lives. It is owned by
//! [`catalog::Catalog`] and passed down explicitly, never as ambient global
//! state. It is also lazy: nothing connects at startup, the first catalog
//! call does. Subsequent calls reuse the cached client after a ping check and
//! reconnect when the cached connection has gone stale.
//!
//! # Modules
//!
//! - [`catalog`]: database/collection listing, provisioning, JSON export and
//!   import
//! - [`errors`]: database-specific error types

pub mod catalog;
pub mod errors;

use errors::DbError;
use mongodb::{bson::doc, options::ClientOptions, Client};
use std::sync::Arc;
use tokio::sync::Mutex;

/// Lazily-initialized, self-healing handle to a MongoDB deployment.
///
/// Cheap to clone; clones share one cached client.
#[derive(Clone)]
pub struct MongoHandle {
    inner: Arc<HandleInner>,
}

struct HandleInner {
    uri: String,
    client: Mutex<Option<Client>>,
}

impl MongoHandle {
    pub fn new(uri: impl Into<String>) -> Self {
        Self {
            inner: Arc::new(HandleInner {
                uri: uri.into(),
                client: Mutex::new(None),
            }),
        }
    }

    /// Get a client that answered a ping, connecting or reconnecting as
    /// needed. Safe to call repeatedly and from concurrent requests.
    pub async fn client(&self) -> Result<Client, DbError> {
        let mut cached = self.inner.client.lock().await;

        if let Some(client) = cached.as_ref() {
            if ping(client).await.is_ok() {
                return Ok(client.clone());
            }
            tracing::warn!("cached MongoDB connection is stale, reconnecting");
            *cached = None;
        }

        let options = ClientOptions::parse(&self.inner.uri).await.map_err(DbError::Connection)?;
        let client = Client::with_options(options).map_err(DbError::Connection)?;
        ping(&client).await.map_err(DbError::Connection)?;

        tracing::info!("established MongoDB connection");
        *cached = Some(client.clone());
        Ok(client)
    }
}

async fn ping(client: &Client) -> mongodb::error::Result<()> {
    client.database("admin").run_command(doc! { "ping": 1 }).await.map(|_| ())
}
