//! [libs/domain/models/src/lib.rs]
//! APARATO: SHARED DOMAIN MODELS ROOT
//! CLASIFICACIÓN: DOMAIN LAYER (ESTRATO L2)
//! RESPONSABILIDAD: TIPOS COMPARTIDOS ENTRE LA ARAÑA, EL REDUCTOR Y EL ALMACÉN REMOTO
//!
//! Centraliza las formas de dato que cruzan los límites de crate: el registro
//! de participante escrito por la araña, los contadores agregados producidos
//! por el reductor, el artefacto de exportación consumido por el empujador
//! asíncrono y la etiqueta de parche normalizada que indexa todo lo anterior.

pub mod credential;
pub mod counters;
pub mod export;
pub mod patch;
pub mod position;
pub mod record;

pub use credential::Credential;
pub use counters::{AggregateCounters, CounterCell, ItemKey, ItemSlotKey, MatchupKey, PositionKey};
pub use export::{ExportArtifact, Manifest};
pub use patch::PatchTag;
pub use position::Position;
pub use record::ParticipantRow;

/// Colección de re-exportaciones de alta frecuencia para inyección directa en crates consumidoras.
pub mod prelude {
    pub use crate::credential::Credential;
    pub use crate::counters::{AggregateCounters, CounterCell, ItemKey, ItemSlotKey, MatchupKey, PositionKey};
    pub use crate::export::{ExportArtifact, Manifest};
    pub use crate::patch::PatchTag;
    pub use crate::position::Position;
    pub use crate::record::ParticipantRow;
}
