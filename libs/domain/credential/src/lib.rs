//! [libs/domain/credential/src/lib.rs]
//! APARATO: CREDENTIAL LIFECYCLE CONTRACTS
//! CLASIFICACIÓN: DOMAIN LAYER (ESTRATO L2)
//! RESPONSABILIDAD: INTERFACES ESTRECHAS PARA PROVISIÓN Y VALIDACIÓN DE CREDENCIALES
//!
//! Narrow capability traits, injected through the supervisor constructor
//! rather than wired through callbacks — avoids the back-pointer cycle the
//! original implementation's notification callbacks would otherwise force.

mod env_poll;
mod validator;

pub use env_poll::EnvPollKeyProvider;
pub use validator::UpstreamProbeValidator;

use async_trait::async_trait;
use harvester_domain_models::Credential;
use tokio_util::sync::CancellationToken;

/// Outcome of probing a credential against the upstream API.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationOutcome {
    Valid,
    /// 401/403 from the probe — the credential is definitively rejected.
    Invalid,
    /// Any other non-success — don't trust it, but don't discard it either;
    /// the caller should loop and retry the probe.
    Unknown,
}

/// Supplies fresh credentials from an out-of-band source (an operator, a
/// secrets rotation job, a companion UI — all outside this core's scope).
#[async_trait]
pub trait KeyProvider: Send + Sync {
    /// Blocks until a new credential is available. Honors cancellation by
    /// returning `None` promptly.
    async fn wait_for_key(&self, cancel: &CancellationToken) -> Option<Credential>;
}

/// Tests a credential against a lightweight upstream probe before it is
/// hot-swapped into the upstream client.
#[async_trait]
pub trait KeyValidator: Send + Sync {
    async fn validate(&self, credential: &Credential) -> ValidationOutcome;
}
