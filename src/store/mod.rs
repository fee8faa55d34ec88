//! Read-only source tables: the card transaction table and the per-cluster
//! venue catalogs.
//!
//! Tables are loaded once through a [`CatalogSource`] and never mutated.

use std::collections::{BTreeMap, BTreeSet};

use crate::{
    error::AppResult,
    models::{TransactionRecord, VenueRow},
};

pub mod fs;
pub mod normalize;

pub use fs::FsCatalogSource;
pub use normalize::normalize_destination;

/// Venue rows of one cluster
#[derive(Debug, Clone, Default)]
pub struct ClusterCatalog {
    venues: Vec<VenueRow>,
}

impl ClusterCatalog {
    pub fn new(venues: Vec<VenueRow>) -> Self {
        Self { venues }
    }

    /// Venue rows in file order
    pub fn venues(&self) -> &[VenueRow] {
        &self.venues
    }

    /// Unique destination names of this cluster, sorted
    pub fn destinations(&self) -> BTreeSet<&str> {
        self.venues.iter().map(|v| v.destination.as_str()).collect()
    }
}

/// All source tables, with destination names normalized
#[derive(Debug, Clone, Default)]
pub struct CatalogStore {
    transactions: Vec<TransactionRecord>,
    clusters: BTreeMap<u32, ClusterCatalog>,
}

impl CatalogStore {
    /// Builds the store, normalizing every destination name so the
    /// transaction table and the catalogs share one join key
    pub fn new(
        mut transactions: Vec<TransactionRecord>,
        clusters: BTreeMap<u32, Vec<VenueRow>>,
    ) -> Self {
        for record in &mut transactions {
            record.destination = normalize_destination(&record.destination);
        }

        let clusters = clusters
            .into_iter()
            .map(|(id, mut venues)| {
                for venue in &mut venues {
                    venue.destination = normalize_destination(&venue.destination);
                }
                (id, ClusterCatalog::new(venues))
            })
            .collect();

        Self {
            transactions,
            clusters,
        }
    }

    pub fn transactions(&self) -> &[TransactionRecord] {
        &self.transactions
    }

    pub fn cluster(&self, id: u32) -> Option<&ClusterCatalog> {
        self.clusters.get(&id)
    }

    pub fn cluster_ids(&self) -> impl Iterator<Item = u32> + '_ {
        self.clusters.keys().copied()
    }

    /// Every destination named by any cluster catalog
    pub fn catalog_destinations(&self) -> BTreeSet<&str> {
        self.clusters
            .values()
            .flat_map(|c| c.venues.iter().map(|v| v.destination.as_str()))
            .collect()
    }
}

/// Supplier of the source tables
#[async_trait::async_trait]
pub trait CatalogSource: Send + Sync {
    /// Loads every required table, failing with `DataUnavailable` if any is
    /// missing or unparsable
    async fn load(&self) -> AppResult<CatalogStore>;

    /// Source name for logging
    fn name(&self) -> &'static str;
}


#[cfg(test)]
mod tests {
    use super::test_support::{record, venue};
    use super::*;

    #[test]
    fn test_names_are_normalized_in_every_table() {
        let store = CatalogStore::new(
            vec![record("해운대 (부산)", "한식", "F", 20, (1.0, 1.0), (1.0, 1.0))],
            BTreeMap::from([(0, vec![venue("1", "해운대(해수욕장)", "Cafe")])]),
        );

        assert_eq!(store.transactions()[0].destination, "해운대");
        let cluster = store.cluster(0).unwrap();
        assert_eq!(cluster.venues()[0].destination, "해운대");
    }

    #[test]
    fn test_cluster_destinations_are_unique() {
        let store = CatalogStore::new(
            Vec::new(),
            BTreeMap::from([(
                1,
                vec![
                    venue("1", "B", "x"),
                    venue("2", "A", "y"),
                    venue("3", "B", "z"),
                ],
            )]),
        );
        let names: Vec<&str> = store.cluster(1).unwrap().destinations().into_iter().collect();
        assert_eq!(names, vec!["A", "B"]);
    }

    #[test]
    fn test_catalog_destinations_span_clusters() {
        let store = CatalogStore::new(
            Vec::new(),
            BTreeMap::from([
                (0, vec![venue("1", "A", "x")]),
                (1, vec![venue("2", "B", "y")]),
            ]),
        );
        assert_eq!(store.catalog_destinations().len(), 2);
        assert!(store.cluster(2).is_none());
        assert_eq!(store.cluster_ids().collect::<Vec<_>>(), vec![0, 1]);
    }
}
