// [libs/infra/remote-store/src/repositories/aggregate.rs]
//! APARATO: AGGREGATE REPOSITORY
//! RESPONSABILIDAD: ESCRITURA EN LOTE DE LOS CUATRO ARREGLOS DEL EXPORT Y PODA POR RETENCIÓN
//!
//! One push cycle: drop non-primary indexes, batch-insert each of the four
//! aggregate arrays inside chunked transactions, upsert the patch version
//! marker, recreate indexes, then delete rows for patches strictly older
//! than the retention floor. Mirrors the outbox relay's batch/retry shape,
//! redirected from a Supabase REST push to a direct libSQL write.

use crate::client::RemoteStoreClient;
use crate::errors::StoreError;
use crate::schema::{drop_secondary_indexes, recreate_secondary_indexes};
use harvester_domain_models::{ExportArtifact, Manifest, PatchTag};
use tracing::{debug, info, instrument};

/// Rows per `INSERT` transaction. The reduce cadence is measured in
/// minutes, so a push taking a few seconds under load is acceptable.
const CHUNK_SIZE: usize = 500;

pub struct AggregateRepository {
    client: RemoteStoreClient,
}

impl AggregateRepository {
    pub fn new(client: RemoteStoreClient) -> Self {
        Self { client }
    }

    #[instrument(skip(self, artifact, manifest))]
    pub async fn push(&self, artifact: &ExportArtifact, manifest: &Manifest, retention_floor: PatchTag) -> Result<(), StoreError> {
        let connection = self.client.connection()?;

        drop_secondary_indexes(&connection).await?;

        self.insert_champion_stats(&connection, artifact).await?;
        self.insert_champion_items(&connection, artifact).await?;
        self.insert_champion_item_slots(&connection, artifact).await?;
        self.insert_champion_matchups(&connection, artifact).await?;
        self.upsert_version_marker(&connection, manifest).await?;

        recreate_secondary_indexes(&connection).await?;

        self.prune_patches_older_than(&connection, retention_floor).await?;

        info!(
            patch = %artifact.patch,
            stats = artifact.champion_stats.len(),
            items = artifact.champion_items.len(),
            item_slots = artifact.champion_item_slots.len(),
            matchups = artifact.champion_matchups.len(),
            "aggregate push complete"
        );
        Ok(())
    }

    async fn insert_champion_stats(&self, connection: &libsql::Connection, artifact: &ExportArtifact) -> Result<(), StoreError> {
        for chunk in artifact.champion_stats.chunks(CHUNK_SIZE) {
            let transaction = connection.transaction().await?;
            for row in chunk {
                transaction
                    .execute(
                        "INSERT INTO champion_stats (patch, champion_id, position, wins, matches) VALUES (?1, ?2, ?3, ?4, ?5)
                         ON CONFLICT (patch, champion_id, position) DO UPDATE SET wins = excluded.wins, matches = excluded.matches",
                        libsql::params![row.patch.clone(), row.champion_id as i64, row.position.clone(), row.wins as i64, row.matches as i64],
                    )
                    .await?;
            }
            transaction.commit().await?;
        }
        debug!(rows = artifact.champion_stats.len(), "champion_stats batch committed");
        Ok(())
    }

    async fn insert_champion_items(&self, connection: &libsql::Connection, artifact: &ExportArtifact) -> Result<(), StoreError> {
        for chunk in artifact.champion_items.chunks(CHUNK_SIZE) {
            let transaction = connection.transaction().await?;
            for row in chunk {
                transaction
                    .execute(
                        "INSERT INTO champion_items (patch, champion_id, position, item_id, wins, matches) VALUES (?1, ?2, ?3, ?4, ?5, ?6)
                         ON CONFLICT (patch, champion_id, position, item_id) DO UPDATE SET wins = excluded.wins, matches = excluded.matches",
                        libsql::params![row.patch.clone(), row.champion_id as i64, row.position.clone(), row.item_id as i64, row.wins as i64, row.matches as i64],
                    )
                    .await?;
            }
            transaction.commit().await?;
        }
        debug!(rows = artifact.champion_items.len(), "champion_items batch committed");
        Ok(())
    }

    async fn insert_champion_item_slots(&self, connection: &libsql::Connection, artifact: &ExportArtifact) -> Result<(), StoreError> {
        for chunk in artifact.champion_item_slots.chunks(CHUNK_SIZE) {
            let transaction = connection.transaction().await?;
            for row in chunk {
                transaction
                    .execute(
                        "INSERT INTO champion_item_slots (patch, champion_id, position, item_id, slot, wins, matches) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
                         ON CONFLICT (patch, champion_id, position, item_id, slot) DO UPDATE SET wins = excluded.wins, matches = excluded.matches",
                        libsql::params![
                            row.patch.clone(),
                            row.champion_id as i64,
                            row.position.clone(),
                            row.item_id as i64,
                            row.slot as i64,
                            row.wins as i64,
                            row.matches as i64
                        ],
                    )
                    .await?;
            }
            transaction.commit().await?;
        }
        debug!(rows = artifact.champion_item_slots.len(), "champion_item_slots batch committed");
        Ok(())
    }

    async fn insert_champion_matchups(&self, connection: &libsql::Connection, artifact: &ExportArtifact) -> Result<(), StoreError> {
        for chunk in artifact.champion_matchups.chunks(CHUNK_SIZE) {
            let transaction = connection.transaction().await?;
            for row in chunk {
                transaction
                    .execute(
                        "INSERT INTO champion_matchups (patch, champion_id, position, enemy_champion_id, wins, matches) VALUES (?1, ?2, ?3, ?4, ?5, ?6)
                         ON CONFLICT (patch, champion_id, position, enemy_champion_id) DO UPDATE SET wins = excluded.wins, matches = excluded.matches",
                        libsql::params![
                            row.patch.clone(),
                            row.champion_id as i64,
                            row.position.clone(),
                            row.enemy_champion_id as i64,
                            row.wins as i64,
                            row.matches as i64
                        ],
                    )
                    .await?;
            }
            transaction.commit().await?;
        }
        debug!(rows = artifact.champion_matchups.len(), "champion_matchups batch committed");
        Ok(())
    }

    async fn upsert_version_marker(&self, connection: &libsql::Connection, manifest: &Manifest) -> Result<(), StoreError> {
        connection
            .execute(
                "INSERT INTO data_version (id, patch, updated_at) VALUES (1, ?1, ?2)
                 ON CONFLICT (id) DO UPDATE SET patch = excluded.patch, updated_at = excluded.updated_at",
                libsql::params![manifest.version.clone(), manifest.updated_at.to_rfc3339()],
            )
            .await?;
        Ok(())
    }

    /// Deletes every row whose patch, parsed and compared numerically, is
    /// strictly older than `floor`. String comparison alone is unsafe here
    /// ("9.5" would sort after "14.2"), so distinct patches are fetched and
    /// filtered in Rust before issuing the per-patch deletes.
    async fn prune_patches_older_than(&self, connection: &libsql::Connection, floor: PatchTag) -> Result<(), StoreError> {
        const TABLES: &[&str] = &["champion_stats", "champion_items", "champion_item_slots", "champion_matchups"];

        for table in TABLES {
            let mut rows = connection.query(&format!("SELECT DISTINCT patch FROM {table}"), ()).await?;
            let mut stale = Vec::new();
            while let Some(row) = rows.next().await? {
                let patch: String = row.get(0)?;
                if let Some(tag) = PatchTag::parse(&patch) {
                    if tag < floor {
                        stale.push(patch);
                    }
                }
            }
            for patch in stale {
                connection.execute(&format!("DELETE FROM {table} WHERE patch = ?1"), libsql::params![patch]).await?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use harvester_domain_models::export::ChampionStatRow;
    use harvester_domain_models::Position;

    async fn repository() -> AggregateRepository {
        let client = RemoteStoreClient::connect(":memory:", None).await.unwrap();
        AggregateRepository::new(client)
    }

    fn artifact_with_one_patch(patch: &str) -> ExportArtifact {
        ExportArtifact {
            patch: patch.to_string(),
            generated_at: Utc::now(),
            champion_stats: vec![ChampionStatRow {
                patch: patch.to_string(),
                champion_id: 1,
                position: Position::Top.as_str().to_string(),
                wins: 3,
                matches: 5,
            }],
            champion_items: vec![],
            champion_item_slots: vec![],
            champion_matchups: vec![],
        }
    }

    #[tokio::test]
    async fn push_upserts_version_marker_and_rows() {
        let repository = repository().await;
        let artifact = artifact_with_one_patch("14.3");
        let manifest = Manifest { version: "14.3".into(), min_patch: "14.1".into(), data_url: "local".into(), updated_at: Utc::now() };

        repository.push(&artifact, &manifest, PatchTag { major: 14, minor: 1 }).await.unwrap();

        let connection = repository.client.connection().unwrap();
        let mut rows = connection.query("SELECT patch FROM data_version WHERE id = 1", ()).await.unwrap();
        let row = rows.next().await.unwrap().expect("version marker row");
        let patch: String = row.get(0).unwrap();
        assert_eq!(patch, "14.3");
    }

    #[tokio::test]
    async fn prune_deletes_only_patches_older_than_the_floor() {
        let repository = repository().await;
        let old_artifact = artifact_with_one_patch("13.20");
        let new_artifact = artifact_with_one_patch("14.3");
        let manifest = Manifest { version: "14.3".into(), min_patch: "14.1".into(), data_url: "local".into(), updated_at: Utc::now() };

        repository.push(&old_artifact, &manifest, PatchTag { major: 1, minor: 1 }).await.unwrap();
        repository.push(&new_artifact, &manifest, PatchTag { major: 14, minor: 1 }).await.unwrap();

        let connection = repository.client.connection().unwrap();
        let mut rows = connection.query("SELECT patch FROM champion_stats", ()).await.unwrap();
        let mut remaining = Vec::new();
        while let Some(row) = rows.next().await.unwrap() {
            let patch: String = row.get(0).unwrap();
            remaining.push(patch);
        }
        assert_eq!(remaining, vec!["14.3".to_string()]);
    }
}
