use std::collections::{HashMap, HashSet};

use crate::{
    models::{RankedResult, RecommendationRecord},
    store::ClusterCatalog,
};

/// Joins ranked destinations back to their venues.
///
/// Venues are limited to the ranked destinations and deduplicated on
/// (destination, venue name), first row wins. Destinations without venues
/// contribute nothing. Output is ordered by descending similarity, keeping
/// catalog order within a tie.
pub fn compose(ranked: &[RankedResult], catalog: &ClusterCatalog) -> Vec<RecommendationRecord> {
    let scores: HashMap<&str, f64> = ranked
        .iter()
        .map(|r| (r.destination.as_str(), r.similarity))
        .collect();

    let mut seen: HashSet<(&str, &str)> = HashSet::new();
    let mut records: Vec<RecommendationRecord> = catalog
        .venues()
        .iter()
        .filter_map(|venue| {
            let similarity = *scores.get(venue.destination.as_str())?;
            seen.insert((venue.destination.as_str(), venue.venue_name.as_str()))
                .then(|| RecommendationRecord::from_venue(venue, similarity))
        })
        .collect();

    records.sort_by(|a, b| b.similarity.total_cmp(&a.similarity));
    records
}
