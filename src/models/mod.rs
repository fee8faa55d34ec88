mod category;
mod query;
mod transaction;
mod venue;

pub use category::{AgeBand, Category, CategoryVector, CATEGORY_COUNT};
pub use query::UserQuery;
pub use transaction::TransactionRecord;
pub use venue::{RankedResult, RecommendationRecord, VenueRow};
