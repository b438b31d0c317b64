// [libs/infra/upstream-client/src/item_catalog.rs]
//! APARATO: ITEM METADATA CATALOG
//! RESPONSABILIDAD: PREDICADO DE ÍTEM COMPLETO SOBRE EL CATÁLOGO EXTERNO
//!
//! Fetched once at reducer/spider startup and cached for the process
//! lifetime — the spec treats the item-metadata endpoint as a static
//! external collaborator with no live-reload requirement.

use crate::errors::ClientError;
use serde::Deserialize;
use std::collections::HashMap;

/// The primary map id (Summoner's Rift) items are evaluated against for
/// availability when computing the completed-item predicate.
const PRIMARY_MAP_ID: &str = "11";

#[derive(Debug, Clone, Deserialize)]
struct RawGold {
    total: u64,
    purchasable: bool,
}

#[derive(Debug, Clone, Deserialize)]
struct RawItemEntry {
    #[serde(default)]
    into: Vec<String>,
    gold: RawGold,
    #[serde(default)]
    maps: HashMap<String, bool>,
}

#[derive(Debug, Clone, Deserialize)]
struct RawItemCatalog {
    data: HashMap<String, RawItemEntry>,
}

/// In-memory index of the upstream item metadata, answering the
/// completed-item predicate: `into` is empty AND `gold.total >= 1000` AND
/// `gold.purchasable` AND available on the primary map.
#[derive(Debug, Clone, Default)]
pub struct ItemCatalog {
    completed: std::collections::HashSet<u32>,
}

impl ItemCatalog {
    pub async fn fetch(http: &reqwest::Client, url: &str) -> Result<Self, ClientError> {
        let response = http.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ClientError::Transient(status.as_u16()));
        }

        let raw: RawItemCatalog = response.json().await?;
        let mut completed = std::collections::HashSet::new();

        for (id_str, entry) in raw.data {
            let Ok(id) = id_str.parse::<u32>() else { continue };
            let available_on_primary_map = entry.maps.get(PRIMARY_MAP_ID).copied().unwrap_or(true);
            let is_completed = entry.into.is_empty() && entry.gold.total >= 1000 && entry.gold.purchasable && available_on_primary_map;
            if is_completed {
                completed.insert(id);
            }
        }

        Ok(Self { completed })
    }

    pub fn is_completed_item(&self, item_id: u32) -> bool {
        self.completed.contains(&item_id)
    }

    /// Test-only constructor for exercising consumers of the predicate
    /// without going through the HTTP fetch path.
    #[cfg(test)]
    pub fn with_completed(ids: impl IntoIterator<Item = u32>) -> Self {
        Self { completed: ids.into_iter().collect() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_catalog_has_no_completed_items() {
        let catalog = ItemCatalog::default();
        assert!(!catalog.is_completed_item(1001));
    }

    #[test]
    fn with_completed_reports_only_the_given_ids() {
        let catalog = ItemCatalog::with_completed([1001, 1002]);
        assert!(catalog.is_completed_item(1001));
        assert!(!catalog.is_completed_item(2003));
    }
}
