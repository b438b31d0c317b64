// [apps/harvester/src/notify.rs]
//! APARATO: NOTIFICATION HOOK
//! RESPONSABILIDAD: AVISO OPCIONAL EN EXPIRACIÓN DE CREDENCIAL Y REINICIO EXITOSO
//!
//! A narrow capability trait (one of the "dynamic callback / plugin
//! surfaces" the design notes call out) injected through the supervisor
//! constructor rather than an optional closure field, matching the
//! credential crate's `KeyProvider`/`KeyValidator` shape. A nil/absent
//! hook is just the default tracing-only implementation.

use tracing::info;

pub trait NotificationHook: Send + Sync {
    fn notify(&self, message: &str);
}

/// Default hook: logs the notification at info level and nothing else.
pub struct TracingNotificationHook;

impl NotificationHook for TracingNotificationHook {
    fn notify(&self, message: &str) {
        info!(notification = message, "supervisor notification");
    }
}
