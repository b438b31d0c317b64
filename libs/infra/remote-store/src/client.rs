// [libs/infra/remote-store/src/client.rs]
//! APARATO: REMOTE STORE CONNECTION CLIENT
//! RESPONSABILIDAD: ENLACE libSQL AL ALMACÉN AGREGADO Y BOOTSTRAP DE ESQUEMA
//!
//! `libsql`'s remote mode (`Builder::new_remote`) is the relational store
//! spec.md §6 describes as "a relational key-value store accessed over
//! HTTPS" — no bespoke REST client needed. A local/in-memory mode is also
//! accepted for tests.

use crate::errors::StoreError;
use crate::schema::ensure_schema;
use libsql::{Builder, Database};
use std::sync::Arc;
use tracing::{info, instrument};

#[derive(Clone)]
pub struct RemoteStoreClient {
    database: Arc<Database>,
}

impl RemoteStoreClient {
    #[instrument(skip(auth_token))]
    pub async fn connect(url: &str, auth_token: Option<String>) -> Result<Self, StoreError> {
        if url.is_empty() {
            return Err(StoreError::Configuration("REMOTE_STORE_URL is empty".into()));
        }

        let is_remote = url.starts_with("libsql://") || url.starts_with("https://");

        let database = if is_remote {
            let token = auth_token.ok_or_else(|| StoreError::Configuration("REMOTE_STORE_AUTH missing for a remote URL".into()))?;
            Builder::new_remote(url.to_string(), token).build().await
        } else {
            Builder::new_local(url).build().await
        }
        .map_err(|fault| StoreError::Connection(fault.to_string()))?;

        let database = Arc::new(database);

        let bootstrap_connection = database.connect().map_err(|fault| StoreError::Connection(fault.to_string()))?;
        ensure_schema(&bootstrap_connection).await?;

        info!("remote aggregate store connected and schema ensured");
        Ok(Self { database })
    }

    pub fn connection(&self) -> Result<libsql::Connection, StoreError> {
        self.database.connect().map_err(|fault| StoreError::Connection(fault.to_string()))
    }
}
