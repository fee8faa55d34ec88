use std::time::Instant;

use crate::{
    config::Config,
    error::{AppError, AppResult},
    models::{RecommendationRecord, UserQuery},
    store::{CatalogSource, CatalogStore},
};

use super::{
    aggregator::{self, DestinationTables},
    composer,
    ranker::SimilarityRanker,
    vector_builder::VectorBuilder,
};

/// Everything a request reads: the source tables, the derived tables and
/// the ranking settings. Built once at startup, immutable afterwards.
#[derive(Debug)]
pub struct RecommendationContext {
    store: CatalogStore,
    tables: DestinationTables,
    ranker: SimilarityRanker,
}

impl RecommendationContext {
    /// Aggregates the store into the derived tables
    pub fn new(store: CatalogStore, ranker: SimilarityRanker) -> Self {
        let tables = aggregator::build(store.transactions(), store.catalog_destinations());
        Self {
            store,
            tables,
            ranker,
        }
    }

    /// Loads the source tables and builds the context.
    ///
    /// Any missing or unreadable table fails the whole load.
    pub async fn load(source: &dyn CatalogSource, config: &Config) -> AppResult<Self> {
        let start = Instant::now();
        tracing::info!(source = source.name(), "Loading catalog data");

        let store = source.load().await?;
        let context = Self::new(
            store,
            SimilarityRanker::new(config.demographic_alpha, config.top_n),
        );

        tracing::info!(
            clusters = context.cluster_count(),
            destinations = context.destination_count(),
            transactions = context.store.transactions().len(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Recommendation context ready"
        );

        Ok(context)
    }

    pub fn cluster_count(&self) -> usize {
        self.store.cluster_ids().count()
    }

    pub fn destination_count(&self) -> usize {
        self.tables.len()
    }

    /// Recommends venues of the best matching destinations in the query's
    /// cluster, ordered by descending similarity
    pub fn recommend(&self, query: &UserQuery) -> AppResult<Vec<RecommendationRecord>> {
        let resolved = VectorBuilder::new(&self.store, &self.tables).resolve(query)?;

        let ranked = self.ranker.rank(&resolved.user_vector, &resolved.candidates);

        let catalog = self.store.cluster(query.cluster).ok_or_else(|| {
            AppError::ComputationFailure(format!("cluster {} vanished", query.cluster))
        })?;
        let records = composer::compose(&ranked, catalog);

        tracing::debug!(
            cluster = query.cluster,
            destinations = ranked.len(),
            records = records.len(),
            "Composed recommendation"
        );

        Ok(records)
    }
}
