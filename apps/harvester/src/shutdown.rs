// [apps/harvester/src/shutdown.rs]
//! APARATO: SHUTDOWN SIGNAL HANDLER
//! RESPONSABILIDAD: PRIMERA SEÑAL DE TERMINACIÓN ORDENADA, SEGUNDA SEÑAL FORZADA
//!
//! Installs `ctrl_c` plus, on unix, `SIGTERM`. The first signal observed
//! requests an orderly shutdown through the supervisor's handle and cancels
//! the root token; a second signal while that is still in flight forces an
//! immediate process exit. A platform with no signal support at all is
//! tolerated — the select simply never resolves from that branch.

use crate::supervisor::ShutdownHandle;
use tokio::signal;
use tracing::{info, warn};

#[cfg(unix)]
async fn wait_for_terminate() {
    match signal::unix::signal(signal::unix::SignalKind::terminate()) {
        Ok(mut stream) => {
            stream.recv().await;
        }
        Err(fault) => {
            warn!(error = %fault, "failed to install SIGTERM handler, relying on ctrl_c only");
            std::future::pending::<()>().await;
        }
    }
}

#[cfg(not(unix))]
async fn wait_for_terminate() {
    std::future::pending::<()>().await
}

/// Waits for the first termination signal, requests shutdown, then waits
/// for a second one and forces the process to exit immediately.
pub async fn install(handle: ShutdownHandle) {
    tokio::select! {
        _ = signal::ctrl_c() => info!("received ctrl-c"),
        _ = wait_for_terminate() => info!("received terminate signal"),
    }

    info!("shutdown requested, sequencing final reduce and orderly exit");
    handle.request();

    tokio::select! {
        _ = signal::ctrl_c() => {}
        _ = wait_for_terminate() => {}
    }
    warn!("second termination signal received, forcing immediate exit");
    std::process::exit(1);
}
