//! Tourist destination recommender.
//!
//! Card transaction data is aggregated once at startup into per-destination
//! spending vectors; each request ranks the destinations of one cluster by
//! demographic-weighted cosine similarity to the user's spending profile and
//! returns their venues.

pub mod api;
pub mod config;
pub mod error;
pub mod middleware;
pub mod models;
pub mod services;
pub mod store;
