// [libs/infra/remote-store/src/schema.rs]
//! APARATO: AGGREGATE STORE SCHEMA
//! RESPONSABILIDAD: BOOTSTRAP IDEMPOTENTE DE LAS CINCO TABLAS DEL ALMACÉN REMOTO
//!
//! Five tables, created (or accepted pre-existing) on first connect via
//! `CREATE TABLE IF NOT EXISTS`: one singleton version marker and four
//! keyed aggregate tables, one per counter shape the reducer emits.

use crate::errors::StoreError;
use libsql::Connection;
use tracing::{debug, info, instrument};

const TABLES: &[(&str, &str)] = &[
    (
        "data_version",
        r#"
        CREATE TABLE IF NOT EXISTS data_version (
            id INTEGER PRIMARY KEY CHECK (id = 1),
            patch TEXT NOT NULL,
            updated_at TEXT NOT NULL
        );
    "#,
    ),
    (
        "champion_stats",
        r#"
        CREATE TABLE IF NOT EXISTS champion_stats (
            patch TEXT NOT NULL,
            champion_id INTEGER NOT NULL,
            position TEXT NOT NULL,
            wins INTEGER NOT NULL,
            matches INTEGER NOT NULL,
            PRIMARY KEY (patch, champion_id, position)
        );
    "#,
    ),
    (
        "champion_items",
        r#"
        CREATE TABLE IF NOT EXISTS champion_items (
            patch TEXT NOT NULL,
            champion_id INTEGER NOT NULL,
            position TEXT NOT NULL,
            item_id INTEGER NOT NULL,
            wins INTEGER NOT NULL,
            matches INTEGER NOT NULL,
            PRIMARY KEY (patch, champion_id, position, item_id)
        );
    "#,
    ),
    (
        "champion_item_slots",
        r#"
        CREATE TABLE IF NOT EXISTS champion_item_slots (
            patch TEXT NOT NULL,
            champion_id INTEGER NOT NULL,
            position TEXT NOT NULL,
            item_id INTEGER NOT NULL,
            slot INTEGER NOT NULL,
            wins INTEGER NOT NULL,
            matches INTEGER NOT NULL,
            PRIMARY KEY (patch, champion_id, position, item_id, slot)
        );
    "#,
    ),
    (
        "champion_matchups",
        r#"
        CREATE TABLE IF NOT EXISTS champion_matchups (
            patch TEXT NOT NULL,
            champion_id INTEGER NOT NULL,
            position TEXT NOT NULL,
            enemy_champion_id INTEGER NOT NULL,
            wins INTEGER NOT NULL,
            matches INTEGER NOT NULL,
            PRIMARY KEY (patch, champion_id, position, enemy_champion_id)
        );
    "#,
    ),
];

/// Indexes dropped before a bulk push and recreated after, so the chunked
/// inserts don't pay per-row index maintenance during the push itself.
const SECONDARY_INDEXES: &[(&str, &str)] = &[
    ("idx_champion_items_patch", "CREATE INDEX IF NOT EXISTS idx_champion_items_patch ON champion_items(patch)"),
    ("idx_champion_item_slots_patch", "CREATE INDEX IF NOT EXISTS idx_champion_item_slots_patch ON champion_item_slots(patch)"),
    ("idx_champion_matchups_patch", "CREATE INDEX IF NOT EXISTS idx_champion_matchups_patch ON champion_matchups(patch)"),
];

#[instrument(skip(connection))]
pub async fn ensure_schema(connection: &Connection) -> Result<(), StoreError> {
    for (name, ddl) in TABLES {
        debug!("ensuring table {name}");
        connection.execute(ddl, ()).await?;
    }
    for (name, ddl) in SECONDARY_INDEXES {
        debug!("ensuring index {name}");
        connection.execute(ddl, ()).await?;
    }
    info!("aggregate store schema bootstrap complete");
    Ok(())
}

/// Drops the secondary indexes ahead of a bulk push.
pub async fn drop_secondary_indexes(connection: &Connection) -> Result<(), StoreError> {
    for (name, _ddl) in SECONDARY_INDEXES {
        connection.execute(&format!("DROP INDEX IF EXISTS {name}"), ()).await?;
    }
    Ok(())
}

/// Recreates the secondary indexes after a bulk push completes.
pub async fn recreate_secondary_indexes(connection: &Connection) -> Result<(), StoreError> {
    for (_name, ddl) in SECONDARY_INDEXES {
        connection.execute(ddl, ()).await?;
    }
    Ok(())
}
