// [libs/domain/spider/src/lib.rs]
//! APARATO: CRAWL ENGINE ROOT
//! CLASIFICACIÓN: DOMAIN LIB (ESTRATO L2)
//! RESPONSABILIDAD: EXPOSICIÓN PÚBLICA DEL MOTOR DE RASTREO DE JUGADORES

pub mod config;
pub mod errors;
pub mod spider;
pub mod stats;

pub use config::SpiderConfig;
pub use errors::SpiderError;
pub use spider::{Spider, StepOutcome};
pub use stats::SpiderStats;

pub mod prelude {
    pub use crate::config::SpiderConfig;
    pub use crate::errors::SpiderError;
    pub use crate::spider::{Spider, StepOutcome};
    pub use crate::stats::SpiderStats;
}
