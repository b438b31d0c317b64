// [apps/harvester/src/lib.rs]
//! APARATO: HARVESTER APPLICATION SHELL ROOT
//! CLASIFICACIÓN: CRATE ROOT (ESTRATO L3)
//! RESPONSABILIDAD: DEFINICIÓN DEL ÁRBOL DE MÓDULOS DEL BINARIO SUPERVISOR
//!
//! Everything below `apps/harvester` is composition: wiring the domain and
//! infrastructure crates into one running process. No domain logic lives
//! here — that stays in `libs/domain/*` and `libs/infra/*`.

pub mod config;
pub mod notify;
pub mod shutdown;
pub mod supervisor;

pub use config::HarvesterConfig;
pub use notify::{NotificationHook, TracingNotificationHook};
pub use supervisor::{ShutdownHandle, State, Supervisor, SupervisorConfig};
