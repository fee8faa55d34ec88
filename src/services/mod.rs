pub mod aggregator;
pub mod composer;
pub mod ranker;
pub mod recommendations;
pub mod vector_builder;

pub use recommendations::RecommendationContext;
