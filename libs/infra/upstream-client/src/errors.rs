// [libs/infra/upstream-client/src/errors.rs]
//! APARATO: UPSTREAM CLIENT ERRORS
//! RESPONSABILIDAD: CATALOGACIÓN SEMÁNTICA DE FALLOS DE LA API DE PARTIDAS

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("network fault contacting upstream: {0}")]
    Network(#[from] reqwest::Error),

    /// 401/403 — the bearer credential is rejected. Always propagated;
    /// the caller must not retry in-place.
    #[error("credential invalid (401/403)")]
    CredentialInvalid,

    /// Any non-200 status other than 401/403/404/429.
    #[error("upstream returned status {0}")]
    Transient(u16),

    /// 404 — benign, the caller skips the affected entity.
    #[error("entity not found upstream")]
    NotFound,

    #[error("failed to decode upstream response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("I/O fault: {0}")]
    Io(#[from] std::io::Error),

    #[error("acquire cancelled while waiting on the rate limiter")]
    Cancelled,
}
