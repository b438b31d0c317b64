// [libs/infra/rotating-log/src/lib.rs]
//! APARATO: TIERED ROTATING LOG ROOT
//! CLASIFICACIÓN: INFRASTRUCTURE LIB (ESTRATO L3)
//! RESPONSABILIDAD: EXPOSICIÓN PÚBLICA DEL LOG CALIENTE/TIBIO/FRÍO

pub mod errors;
pub mod log;
pub mod paths;

pub use errors::LogError;
pub use log::{RotatingLog, RotatingLogConfig, WarmFileEvent};
pub use paths::StoragePaths;

pub mod prelude {
    pub use crate::errors::LogError;
    pub use crate::log::{RotatingLog, RotatingLogConfig, WarmFileEvent};
    pub use crate::paths::StoragePaths;
}
