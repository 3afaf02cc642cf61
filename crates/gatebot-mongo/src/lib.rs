//! MongoDB adapter.
//!
//! This crate implements the `gatebot-core` Datastore port. The handle is
//! opened at startup and held in the app context; nothing reads or writes it.

use mongodb::{Client, Database};
use tracing::debug;

use gatebot_core::{errors::Error, store::Datastore, Result};

pub struct MongoDatastore {
    db: Database,
}

impl MongoDatastore {
    /// Parse `uri` and build a client bound to `db_name`.
    ///
    /// The driver connects lazily, so this does not fail on an unreachable
    /// server, only on a malformed connection string.
    pub async fn open(uri: &str, db_name: &str) -> Result<Self> {
        let client = Client::with_uri_str(uri)
            .await
            .map_err(|e| Error::Datastore(format!("invalid connection string: {e}")))?;
        let db = client.database(db_name);
        debug!(database = db_name, "datastore handle opened");
        Ok(Self { db })
    }
}

impl Datastore for MongoDatastore {
    fn database_name(&self) -> &str {
        self.db.name()
    }
}
