// [libs/domain/credential/src/env_poll.rs]
use crate::KeyProvider;
use async_trait::async_trait;
use harvester_domain_models::Credential;
use std::sync::Mutex;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{info, instrument};

/// Default standalone `KeyProvider`: polls an environment variable on a
/// fixed interval and returns a fresh `Credential` the first time its value
/// differs from the last one this provider has handed out. The core binary
/// needs *some* concrete default to run without an interactive companion
/// supplying credentials; an operator rotates the variable out-of-band
/// (e.g. via the host's process manager) to trigger `WAITING_FOR_KEY` ->
/// `FRESH_RESTART`.
pub struct EnvPollKeyProvider {
    env_var: String,
    poll_interval: Duration,
    last_seen: Mutex<Option<String>>,
}

impl EnvPollKeyProvider {
    pub fn new(env_var: impl Into<String>, poll_interval: Duration) -> Self {
        let env_var = env_var.into();
        let initial = std::env::var(&env_var).ok();
        Self { env_var, poll_interval, last_seen: Mutex::new(initial) }
    }
}

#[async_trait]
impl KeyProvider for EnvPollKeyProvider {
    #[instrument(skip(self, cancel), fields(env_var = %self.env_var))]
    async fn wait_for_key(&self, cancel: &CancellationToken) -> Option<Credential> {
        loop {
            tokio::select! {
                _ = tokio::time::sleep(self.poll_interval) => {}
                _ = cancel.cancelled() => return None,
            }

            let current = std::env::var(&self.env_var).ok();
            let changed = {
                let mut last_seen = self.last_seen.lock().expect("env poll lock poisoned");
                if current.as_ref().filter(|v| !v.is_empty()) != last_seen.as_ref() && current.as_ref().map_or(false, |v| !v.is_empty()) {
                    *last_seen = current.clone();
                    true
                } else {
                    false
                }
            };

            if changed {
                if let Some(value) = current {
                    info!("new credential observed via env poll");
                    return Some(Credential::new(value));
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn returns_none_when_cancelled_before_a_change() {
        let provider = EnvPollKeyProvider::new("HARVESTER_TEST_UNSET_VAR_XYZ", Duration::from_millis(5));
        let cancel = CancellationToken::new();
        cancel.cancel();
        assert!(provider.wait_for_key(&cancel).await.is_none());
    }
}
