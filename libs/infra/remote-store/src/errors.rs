// [libs/infra/remote-store/src/errors.rs]
//! APARATO: REMOTE STORE ERROR CATALOG
//! RESPONSABILIDAD: CATALOGACIÓN SEMÁNTICA DE FALLOS DE PERSISTENCIA REMOTA

use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    /// Network or auth failure reaching the remote store.
    #[error("remote store connection failed: {0}")]
    Connection(String),

    /// Query rejected by the libSQL engine (schema mismatch, constraint violation).
    #[error("remote store query rejected: {0}")]
    Query(#[from] libsql::Error),

    /// A required endpoint/credential env var is missing or empty.
    #[error("remote store configuration missing or malformed: {0}")]
    Configuration(String),
}
