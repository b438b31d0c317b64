// [libs/infra/upstream-client/src/lib.rs]
//! APARATO: UPSTREAM MATCH API CLIENT ROOT
//! CLASIFICACIÓN: INFRASTRUCTURE LIB (ESTRATO L3)
//! RESPONSABILIDAD: EXPOSICIÓN PÚBLICA DEL CLIENTE TIPADO SOBRE EL API DE PARTIDAS

pub mod client;
pub mod dto;
pub mod errors;
pub mod item_catalog;
pub mod rank;

pub use client::UpstreamClient;
pub use errors::ClientError;
pub use item_catalog::ItemCatalog;
pub use rank::RankFloor;

pub mod prelude {
    pub use crate::client::UpstreamClient;
    pub use crate::errors::ClientError;
    pub use crate::item_catalog::ItemCatalog;
    pub use crate::rank::RankFloor;
}
