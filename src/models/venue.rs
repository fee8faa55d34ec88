use serde::{Deserialize, Deserializer, Serialize};

/// One venue row of a cluster catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VenueRow {
    #[serde(alias = "ID")]
    pub id: String,
    #[serde(default, alias = "분류")]
    pub classification: Option<String>,
    /// Destination the venue belongs to; join key against the derived tables
    #[serde(alias = "관광지")]
    pub destination: String,
    #[serde(alias = "가맹점명")]
    pub venue_name: String,
    #[serde(default, alias = "가게 이미지 URL")]
    pub image_url: Option<String>,
    #[serde(default, alias = "별점")]
    pub rating: Option<f64>,
    /// Accepts float-formatted counts such as `120.0`
    #[serde(default, alias = "리뷰 수", deserialize_with = "count_from_number")]
    pub review_count: Option<u32>,
    #[serde(default, alias = "주소")]
    pub address: Option<String>,
    #[serde(default, alias = "위치값 주소")]
    pub normalized_address: Option<String>,
    #[serde(default, alias = "위도")]
    pub latitude: Option<f64>,
    #[serde(default, alias = "경도")]
    pub longitude: Option<f64>,
}

fn count_from_number<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    let Some(value) = Option::<f64>::deserialize(deserializer)? else {
        return Ok(None);
    };
    if !value.is_finite() || value < 0.0 || value.fract() != 0.0 || value > u32::MAX as f64 {
        return Err(serde::de::Error::custom(format!(
            "expected a non-negative whole count, got {}",
            value
        )));
    }
    Ok(Some(value as u32))
}

/// A destination with its similarity to the user profile
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedResult {
    pub destination: String,
    /// In [0, 1], rounded to 4 decimals
    pub similarity: f64,
}

/// One venue of a recommended destination, as returned to the client
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecommendationRecord {
    pub id: String,
    pub classification: Option<String>,
    pub destination: String,
    pub venue_name: String,
    pub image_url: Option<String>,
    pub rating: Option<f64>,
    pub review_count: Option<u32>,
    pub address: Option<String>,
    pub normalized_address: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub similarity: f64,
}

impl RecommendationRecord {
    pub fn from_venue(venue: &VenueRow, similarity: f64) -> Self {
        Self {
            id: venue.id.clone(),
            classification: venue.classification.clone(),
            destination: venue.destination.clone(),
            venue_name: venue.venue_name.clone(),
            image_url: venue.image_url.clone(),
            rating: venue.rating,
            review_count: venue.review_count,
            address: venue.address.clone(),
            normalized_address: venue.normalized_address.clone(),
            latitude: venue.latitude,
            longitude: venue.longitude,
            similarity,
        }
    }
}
