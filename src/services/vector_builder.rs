use crate::{
    error::{AppError, AppResult},
    models::{AgeBand, CategoryVector, UserQuery},
    store::CatalogStore,
};

use super::aggregator::DestinationTables;

pub const MAX_AGE: i64 = 120;

/// A destination of the user's cluster, ready for scoring
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    pub destination: String,
    pub vector: CategoryVector,
    /// Average spend of the user's demographic at this destination
    pub demographic_basis: f64,
}

/// User vector plus the candidate set it is compared against
#[derive(Debug, Clone)]
pub struct ResolvedQuery {
    pub user_vector: CategoryVector,
    pub age_band: AgeBand,
    /// Sorted by destination name
    pub candidates: Vec<Candidate>,
}

/// Turns a query into vectors drawn from the derived tables
pub struct VectorBuilder<'a> {
    store: &'a CatalogStore,
    tables: &'a DestinationTables,
}

impl<'a> VectorBuilder<'a> {
    pub fn new(store: &'a CatalogStore, tables: &'a DestinationTables) -> Self {
        Self { store, tables }
    }

    /// Validates the query against the loaded data and resolves the
    /// candidate vectors of its cluster
    pub fn resolve(&self, query: &UserQuery) -> AppResult<ResolvedQuery> {
        let cluster = self.store.cluster(query.cluster).ok_or_else(|| {
            AppError::InvalidInput(format!("unknown cluster {}", query.cluster))
        })?;

        if !(0..=MAX_AGE).contains(&query.age) {
            return Err(AppError::InvalidInput(format!(
                "age must be between 0 and {}, got {}",
                MAX_AGE, query.age
            )));
        }
        // in range, so the cast cannot truncate
        let age_band = AgeBand::from_age(query.age as u32);

        let demographics = self.tables.demographics();
        if !demographics.has_gender(&query.gender) {
            return Err(AppError::InvalidInput(format!(
                "unknown gender {:?}",
                query.gender
            )));
        }
        if !demographics.has_column(&query.gender, age_band.code()) {
            return Err(AppError::ComputationFailure(format!(
                "no demographic column for gender {:?} and age band {}",
                query.gender,
                age_band.code()
            )));
        }

        let candidates = cluster
            .destinations()
            .into_iter()
            .map(|destination| -> AppResult<Candidate> {
                let vector = self.tables.category_vector(destination).ok_or_else(|| {
                    AppError::ComputationFailure(format!(
                        "destination {:?} has no category vector",
                        destination
                    ))
                })?;
                let demographic_basis = demographics
                    .value(destination, &query.gender, age_band.code())
                    .ok_or_else(|| {
                        AppError::ComputationFailure(format!(
                            "destination {:?} has no demographic vector",
                            destination
                        ))
                    })?;

                Ok(Candidate {
                    destination: destination.to_string(),
                    vector: *vector,
                    demographic_basis,
                })
            })
            .collect::<AppResult<Vec<Candidate>>>()?;

        tracing::debug!(
            cluster = query.cluster,
            age = query.age,
            age_band = age_band.code(),
            candidates = candidates.len(),
            "Resolved candidate set"
        );

        Ok(ResolvedQuery {
            user_vector: query.spending,
            age_band,
            candidates,
        })
    }
}
