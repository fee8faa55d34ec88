use std::collections::{BTreeMap, BTreeSet};

use crate::models::{Category, CategoryVector, TransactionRecord, CATEGORY_COUNT};

/// Running spend and transaction totals for one group
#[derive(Debug, Default, Clone, Copy)]
struct Totals {
    amount: f64,
    count: f64,
}

impl Totals {
    fn add(&mut self, amount: f64, count: f64) {
        self.amount += amount;
        self.count += count;
    }

    /// Average spend per transaction, rounded half-to-even to whole units.
    /// A group without transactions averages to zero.
    fn average(self) -> f64 {
        if self.count == 0.0 {
            return 0.0;
        }
        (self.amount / self.count).round_ties_even()
    }
}

/// Destination x (gender, age band) average-spend matrix.
///
/// Columns are the cross product of every gender and band code observed in
/// the transaction table; absent combinations hold zero.
#[derive(Debug, Clone, Default)]
pub struct DemographicTable {
    columns: Vec<(String, u32)>,
    rows: BTreeMap<String, Vec<f64>>,
}

impl DemographicTable {
    /// Average spend of `destination` for one demographic column.
    ///
    /// `None` when either the destination or the column is unknown.
    pub fn value(&self, destination: &str, gender: &str, age_band: u32) -> Option<f64> {
        let column = self
            .columns
            .iter()
            .position(|(g, b)| g == gender && *b == age_band)?;
        self.rows.get(destination).map(|row| row[column])
    }

    pub fn has_gender(&self, gender: &str) -> bool {
        self.columns.iter().any(|(g, _)| g == gender)
    }

    pub fn has_column(&self, gender: &str, age_band: u32) -> bool {
        self.columns
            .iter()
            .any(|(g, b)| g == gender && *b == age_band)
    }

    pub fn columns(&self) -> &[(String, u32)] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Derived per-destination tables, built once from the transaction table
#[derive(Debug, Clone, Default)]
pub struct DestinationTables {
    categories: BTreeMap<String, CategoryVector>,
    demographics: DemographicTable,
}

impl DestinationTables {
    pub fn category_vector(&self, destination: &str) -> Option<&CategoryVector> {
        self.categories.get(destination)
    }

    pub fn demographics(&self) -> &DemographicTable {
        &self.demographics
    }

    /// Number of destinations with a category vector
    pub fn len(&self) -> usize {
        self.categories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }
}

/// Aggregates the transaction table into per-destination vectors.
///
/// Destinations listed in `catalog_destinations` always get a row in both
/// tables, zero-filled when they have no transactions. Records whose
/// industry label has no coarse category are left out of the category
/// vectors but still count toward the demographic table.
pub fn build<'a>(
    transactions: &[TransactionRecord],
    catalog_destinations: impl IntoIterator<Item = &'a str>,
) -> DestinationTables {
    let mut by_category: BTreeMap<(&str, Category), Totals> = BTreeMap::new();
    let mut by_demographic: BTreeMap<(&str, &str, u32), Totals> = BTreeMap::new();
    let mut destinations: BTreeSet<&str> = catalog_destinations.into_iter().collect();
    let mut genders: BTreeSet<&str> = BTreeSet::new();
    let mut bands: BTreeSet<u32> = BTreeSet::new();
    let mut unmapped = 0usize;

    for record in transactions {
        let destination = record.destination.as_str();
        destinations.insert(destination);
        genders.insert(record.gender.as_str());
        bands.insert(record.age_band);

        match record.category() {
            Some(category) => by_category
                .entry((destination, category))
                .or_default()
                .add(record.category_amount, record.category_count),
            None => unmapped += 1,
        }

        by_demographic
            .entry((destination, record.gender.as_str(), record.age_band))
            .or_default()
            .add(record.demographic_amount, record.demographic_count);
    }

    if unmapped > 0 {
        tracing::warn!(
            unmapped,
            "Excluded records with unmapped category labels from category aggregation"
        );
    }

    let mut categories: BTreeMap<String, CategoryVector> = destinations
        .iter()
        .map(|d| (d.to_string(), [0.0; CATEGORY_COUNT]))
        .collect();
    for ((destination, category), totals) in by_category {
        if let Some(vector) = categories.get_mut(destination) {
            vector[category.index()] = totals.average();
        }
    }

    let columns: Vec<(String, u32)> = genders
        .iter()
        .flat_map(|g| bands.iter().map(move |b| (g.to_string(), *b)))
        .collect();
    let mut rows: BTreeMap<String, Vec<f64>> = destinations
        .iter()
        .map(|d| (d.to_string(), vec![0.0; columns.len()]))
        .collect();
    for ((destination, gender, band), totals) in by_demographic {
        let column = columns.iter().position(|(g, b)| g == gender && *b == band);
        if let (Some(column), Some(row)) = (column, rows.get_mut(destination)) {
            row[column] = totals.average();
        }
    }

    tracing::info!(
        destinations = categories.len(),
        demographic_columns = columns.len(),
        "Built destination tables"
    );

    DestinationTables {
        categories,
        demographics: DemographicTable { columns, rows },
    }
}
