// [libs/domain/credential/src/validator.rs]
use crate::{KeyValidator, ValidationOutcome};
use async_trait::async_trait;
use harvester_domain_models::Credential;
use reqwest::StatusCode;
use std::time::Duration;
use tracing::{instrument, warn};

/// Header the upstream match API expects the bearer credential under.
/// Duplicated from the upstream-client crate's own constant rather than
/// depending on it — a domain-layer credential probe has no business
/// reaching into an infrastructure adapter for one header name.
const CREDENTIAL_HEADER: &str = "X-Riot-Token";

/// Tests a candidate credential against a single lightweight upstream
/// endpoint (the platform status probe — cheap, unauthenticated-adjacent,
/// and exempt from the per-credential rate budget since it carries no
/// match data). Used only during `WAITING_FOR_KEY`, never on the hot path.
pub struct UpstreamProbeValidator {
    http: reqwest::Client,
    probe_url: String,
}

impl UpstreamProbeValidator {
    pub fn new(probe_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::builder()
                .timeout(Duration::from_secs(10))
                .build()
                .expect("reqwest client construction cannot fail with these settings"),
            probe_url: probe_url.into(),
        }
    }
}

#[async_trait]
impl KeyValidator for UpstreamProbeValidator {
    #[instrument(skip(self, credential))]
    async fn validate(&self, credential: &Credential) -> ValidationOutcome {
        let response = self.http.get(&self.probe_url).header(CREDENTIAL_HEADER, credential.as_str()).send().await;

        match response {
            Ok(response) => match response.status() {
                StatusCode::OK => ValidationOutcome::Valid,
                StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => ValidationOutcome::Invalid,
                other => {
                    warn!(status = %other, "credential probe returned a non-decisive status");
                    ValidationOutcome::Unknown
                }
            },
            Err(fault) => {
                warn!(error = %fault, "credential probe request failed outright");
                ValidationOutcome::Unknown
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn unreachable_host_yields_unknown_not_invalid() {
        let validator = UpstreamProbeValidator::new("http://127.0.0.1:1/status");
        let outcome = validator.validate(&Credential::new("whatever")).await;
        assert_eq!(outcome, ValidationOutcome::Unknown);
    }
}
