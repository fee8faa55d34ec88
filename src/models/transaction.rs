use serde::Deserialize;

use super::Category;

/// One row of the card transaction table.
///
/// Headers may be the English field names or the Korean column names of
/// the card data export.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TransactionRecord {
    /// Destination name; normalized by the catalog store after load
    #[serde(alias = "소비관광지역명칭")]
    pub destination: String,
    /// Raw industry label, see [`Category::from_raw_label`]
    #[serde(alias = "대분류")]
    pub category_label: String,
    #[serde(alias = "성별")]
    pub gender: String,
    /// Age band code (20, 30, ...)
    #[serde(alias = "연령대")]
    pub age_band: u32,
    /// Cumulative spend for this destination and industry
    #[serde(alias = "카드이용금액_업종별")]
    pub category_amount: f64,
    #[serde(alias = "카드이용건수_업종별")]
    pub category_count: f64,
    /// Cumulative spend for this destination, gender and age band
    #[serde(alias = "카드이용금액_성별연령별")]
    pub demographic_amount: f64,
    #[serde(alias = "카드이용건수_성별연령별")]
    pub demographic_count: f64,
    #[serde(default, alias = "기준년월")]
    pub period: Option<String>,
}

impl TransactionRecord {
    pub fn category(&self) -> Option<Category> {
        Category::from_raw_label(&self.category_label)
    }
}
