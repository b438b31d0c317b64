// [libs/infra/remote-store/src/lib.rs]
//! APARATO: REMOTE AGGREGATE STORE ROOT
//! CLASIFICACIÓN: INFRASTRUCTURE LIB (ESTRATO L3)
//! RESPONSABILIDAD: EXPOSICIÓN PÚBLICA DEL ADAPTADOR libSQL DEL ALMACÉN AGREGADO

pub mod client;
pub mod errors;
pub mod repositories;
pub mod schema;

pub use client::RemoteStoreClient;
pub use errors::StoreError;
pub use repositories::AggregateRepository;

pub mod prelude {
    pub use crate::client::RemoteStoreClient;
    pub use crate::errors::StoreError;
    pub use crate::repositories::AggregateRepository;
}
