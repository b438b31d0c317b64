// [apps/harvester/src/supervisor.rs]
//! APARATO: SUPERVISOR STATE MACHINE
//! CLASIFICACIÓN: APPLICATION SHELL (ESTRATO L3)
//! RESPONSABILIDAD: ORQUESTACIÓN DE COSECHA, REDUCCIÓN, EMPUJE Y CICLO DE VIDA DE CREDENCIAL
//!
//! Single-threaded dispatcher over the seven-state machine: `STARTUP`,
//! `COLLECTING`, `REDUCING`, `PUSHING`, `WAITING_FOR_KEY`, `FRESH_RESTART`,
//! `SHUTDOWN`. Grounded on the teacher's `operational_nexus.rs`
//! RwLock-guarded enum-transition pattern, extended from a four-mode enum
//! to this machine's seven states, with illegal transitions logged and
//! ignored rather than panicking (the same early-return-on-no-op idiom,
//! generalized to early-return-on-illegal).

use crate::notify::NotificationHook;
use chrono::Utc;
use harvester_domain_credential::{KeyProvider, KeyValidator, ValidationOutcome};
use harvester_domain_models::PatchTag;
use harvester_domain_reducer::{ReduceError, Reducer};
use harvester_domain_spider::{Spider, SpiderError, StepOutcome};
use harvester_infra_async_pusher::{AsyncPusher, PushJob};
use harvester_infra_rotating_log::{RotatingLog, WarmFileEvent};
use harvester_infra_upstream_client::{ClientError, UpstreamClient};
use std::fs;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc::UnboundedReceiver;
use tokio::sync::Notify;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, instrument, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    Startup,
    Collecting,
    Reducing,
    Pushing,
    WaitingForKey,
    FreshRestart,
    Shutdown,
}

/// True if `to` is a direct legal successor of `from` per the transition
/// table. `Startup -> Startup` is the documented "retry after backoff"
/// self-loop; every state may transition into `Shutdown`.
fn is_legal_transition(from: State, to: State) -> bool {
    use State::*;
    if to == Shutdown {
        return true;
    }
    matches!(
        (from, to),
        (Startup, Startup) | (Startup, Collecting) | (Startup, WaitingForKey)
            | (Collecting, Reducing)
            | (Reducing, Pushing)
            | (Pushing, Collecting) | (Pushing, WaitingForKey)
            | (WaitingForKey, FreshRestart)
            | (FreshRestart, Startup)
    )
}

/// Lightweight cloneable reference a signal handler task can hold to
/// request shutdown without owning the supervisor. Idempotent: the second
/// and later calls are no-ops.
#[derive(Clone)]
pub struct ShutdownHandle {
    requested: Arc<AtomicBool>,
    notify: Arc<Notify>,
    cancel: CancellationToken,
}

impl ShutdownHandle {
    pub fn request(&self) {
        if !self.requested.swap(true, Ordering::SeqCst) {
            self.cancel.cancel();
            self.notify.notify_waiters();
        }
    }
}

#[derive(Debug, Clone)]
pub struct SupervisorConfig {
    pub warm_file_threshold: u32,
    pub bloom_reset_interval: u32,
    pub shutdown_timeout: Duration,
    pub retention_delta: u32,
    pub state_poll_tick: Duration,
    pub manifest_url: String,
    pub data_url: String,
}

pub struct Supervisor {
    config: SupervisorConfig,
    state: State,
    current_patch: PatchTag,
    from_fresh_restart: bool,

    upstream: Arc<UpstreamClient>,
    spider: Spider,
    log: RotatingLog,
    reducer: Reducer,
    pusher: AsyncPusher,

    key_provider: Arc<dyn KeyProvider>,
    key_validator: Arc<dyn KeyValidator>,
    notify_hook: Arc<dyn NotificationHook>,

    warm_rx: UnboundedReceiver<WarmFileEvent>,
    warm_file_counter: AtomicU32,
    reduce_cycle_counter: AtomicU32,
    key_expired: AtomicBool,

    requested: Arc<AtomicBool>,
    notify: Arc<Notify>,
    cancel: CancellationToken,
}

impl Supervisor {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        config: SupervisorConfig,
        upstream: Arc<UpstreamClient>,
        spider: Spider,
        log: RotatingLog,
        reducer: Reducer,
        pusher: AsyncPusher,
        key_provider: Arc<dyn KeyProvider>,
        key_validator: Arc<dyn KeyValidator>,
        notify_hook: Arc<dyn NotificationHook>,
        warm_rx: UnboundedReceiver<WarmFileEvent>,
        cancel: CancellationToken,
    ) -> Self {
        Self {
            config,
            state: State::Startup,
            current_patch: PatchTag { major: 0, minor: 0 },
            from_fresh_restart: false,
            upstream,
            spider,
            log,
            reducer,
            pusher,
            key_provider,
            key_validator,
            notify_hook,
            warm_rx,
            warm_file_counter: AtomicU32::new(0),
            reduce_cycle_counter: AtomicU32::new(0),
            key_expired: AtomicBool::new(false),
            requested: Arc::new(AtomicBool::new(false)),
            notify: Arc::new(Notify::new()),
            cancel,
        }
    }

    pub fn current_state(&self) -> State {
        self.state
    }

    pub fn shutdown_handle(&self) -> ShutdownHandle {
        ShutdownHandle { requested: self.requested.clone(), notify: self.notify.clone(), cancel: self.cancel.clone() }
    }

    fn transition(&mut self, to: State) {
        if !is_legal_transition(self.state, to) {
            warn!(from = ?self.state, to = ?to, "illegal state transition attempted, ignoring");
            return;
        }
        debug!(from = ?self.state, to = ?to, "state transition");
        self.state = to;
    }

    fn shutdown_requested(&self) -> bool {
        self.requested.load(Ordering::SeqCst)
    }

    fn drain_warm_events(&mut self) {
        while let Ok(event) = self.warm_rx.try_recv() {
            self.warm_file_counter.fetch_add(1, Ordering::SeqCst);
            debug!(path = %event.path.display(), matches = event.matches, "warm file counted toward reduce threshold");
        }
    }

    fn has_pending_warm_data(&self) -> bool {
        let (matches_in_hot, _) = self.log.stats();
        if matches_in_hot > 0 || self.warm_file_counter.load(Ordering::SeqCst) > 0 {
            return true;
        }
        fs::read_dir(&self.log.paths().warm).map(|mut entries| entries.next().is_some()).unwrap_or(false)
    }

    /// Drives the state machine until a shutdown has been fully sequenced.
    pub async fn run(&mut self) {
        loop {
            if self.shutdown_requested() && self.state != State::Reducing {
                self.execute_shutdown_sequence().await;
                break;
            }

            match self.state {
                State::Startup => self.handle_startup().await,
                State::Collecting => self.handle_collecting().await,
                State::Reducing => self.handle_reducing().await,
                State::Pushing => self.handle_pushing().await,
                State::WaitingForKey => self.handle_waiting_for_key().await,
                State::FreshRestart => self.handle_fresh_restart(),
                State::Shutdown => break,
            }
        }
    }

    #[instrument(skip(self))]
    async fn seed(&mut self) -> Result<(), SpiderError> {
        match self.upstream.current_patch(&self.config.manifest_url).await {
            Ok(patch) => self.current_patch = patch,
            Err(ClientError::CredentialInvalid) => return Err(SpiderError::Upstream(ClientError::CredentialInvalid)),
            Err(other) => return Err(SpiderError::Upstream(other)),
        }
        self.spider.seed_from_top_of_ladder().await
    }

    #[instrument(skip(self))]
    async fn handle_startup(&mut self) {
        match self.seed().await {
            Ok(()) => {
                self.transition(State::Collecting);
                if self.from_fresh_restart {
                    self.from_fresh_restart = false;
                    self.notify_hook.notify("fresh session started");
                }
            }
            Err(SpiderError::Upstream(ClientError::CredentialInvalid)) => {
                self.key_expired.store(true, Ordering::SeqCst);
                self.notify_hook.notify("credential expired; please supply a new one");
                self.transition(State::WaitingForKey);
            }
            Err(other) => {
                warn!(error = %other, "seed failed, retrying after backoff");
                tokio::time::sleep(self.config.state_poll_tick.max(Duration::from_millis(500))).await;
            }
        }
    }

    #[instrument(skip(self))]
    async fn handle_collecting(&mut self) {
        match self.spider.step(&mut self.log, self.current_patch).await {
            Ok(outcome) => {
                self.drain_warm_events();
                if matches!(outcome, StepOutcome::QueueEmpty) {
                    tokio::time::sleep(self.config.state_poll_tick).await;
                }
                if self.warm_file_counter.load(Ordering::SeqCst) >= self.config.warm_file_threshold {
                    self.transition(State::Reducing);
                }
            }
            Err(SpiderError::Upstream(ClientError::CredentialInvalid)) => {
                info!("spider surfaced an invalid credential, draining into a final reduce");
                self.key_expired.store(true, Ordering::SeqCst);
                self.drain_warm_events();
                self.transition(State::Reducing);
            }
            Err(other) => {
                warn!(error = %other, "spider step failed, backing off");
                tokio::time::sleep(self.config.state_poll_tick.max(Duration::from_secs(1))).await;
            }
        }
    }

    #[instrument(skip(self))]
    async fn run_one_reduce_cycle(&mut self) -> Result<(), ReduceError> {
        let generated_at = Utc::now();
        let outcome =
            self.reducer.run_cycle(&mut self.log, self.current_patch, self.config.retention_delta, &self.config.data_url, generated_at)?;
        self.warm_file_counter.store(0, Ordering::SeqCst);

        let job = PushJob {
            artifact: outcome.artifact,
            manifest: outcome.manifest,
            retention_floor: self.current_patch.retention_floor(self.config.retention_delta),
        };
        if let Err(fault) = self.pusher.push(job).await {
            warn!(error = %fault, "failed to enqueue export artifact for push");
        }
        Ok(())
    }

    #[instrument(skip(self))]
    async fn handle_reducing(&mut self) {
        match self.run_one_reduce_cycle().await {
            Ok(()) => self.transition(State::Pushing),
            Err(fault) => {
                error!(error = %fault, "reduce cycle failed, warm files retained for the next attempt");
                self.transition(State::Collecting);
            }
        }
    }

    #[instrument(skip(self))]
    async fn handle_pushing(&mut self) {
        let cycle = self.reduce_cycle_counter.fetch_add(1, Ordering::SeqCst) + 1;
        if cycle % self.config.bloom_reset_interval == 0 {
            self.spider.reset();
        }

        if self.key_expired.load(Ordering::SeqCst) {
            self.notify_hook.notify("credential expired; please supply a new one");
            self.transition(State::WaitingForKey);
        } else {
            self.transition(State::Collecting);
        }
    }

    #[instrument(skip(self))]
    async fn handle_waiting_for_key(&mut self) {
        let Some(candidate) = self.key_provider.wait_for_key(&self.cancel).await else { return };

        match self.key_validator.validate(&candidate).await {
            ValidationOutcome::Valid => {
                self.upstream.set_credential(candidate).await;
                self.key_expired.store(false, Ordering::SeqCst);
                self.from_fresh_restart = true;
                self.transition(State::FreshRestart);
            }
            ValidationOutcome::Invalid | ValidationOutcome::Unknown => {
                debug!("candidate credential rejected by validator, continuing to wait");
            }
        }
    }

    fn handle_fresh_restart(&mut self) {
        self.spider.reset();
        self.reducer.reset();
        self.transition(State::Startup);
    }

    #[instrument(skip(self))]
    async fn execute_shutdown_sequence(&mut self) {
        info!("shutdown sequencing started");

        if self.has_pending_warm_data() {
            match tokio::time::timeout(self.config.shutdown_timeout, self.run_one_reduce_cycle()).await {
                Ok(Ok(())) => info!("final reduce completed before shutdown"),
                Ok(Err(fault)) => error!(error = %fault, "final reduce failed during shutdown, proceeding anyway"),
                Err(_) => warn!("final reduce exceeded the shutdown timeout, proceeding anyway"),
            }
        }

        self.state = State::Shutdown;

        if let Err(fault) = self.log.close() {
            error!(error = %fault, "rotating log close failed during shutdown");
        }

        self.pusher.wait().await;
        info!("shutdown sequencing complete");
    }
}
