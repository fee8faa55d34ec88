use std::fmt::Display;

use serde::Serialize;

/// Number of coarse spending categories
pub const CATEGORY_COUNT: usize = 5;

/// Average spend per coarse category, indexed by [`Category::index`]
pub type CategoryVector = [f64; CATEGORY_COUNT];

/// Coarse spending class shared by user profiles and destination vectors.
///
/// Declaration order is the vector order used everywhere.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum Category {
    #[serde(rename = "retail/shopping")]
    RetailShopping,
    #[serde(rename = "lodging")]
    Lodging,
    #[serde(rename = "sports & culture")]
    SportsCulture,
    #[serde(rename = "dining")]
    Dining,
    #[serde(rename = "nightlife")]
    Nightlife,
}

impl Category {
    pub const ALL: [Category; CATEGORY_COUNT] = [
        Category::RetailShopping,
        Category::Lodging,
        Category::SportsCulture,
        Category::Dining,
        Category::Nightlife,
    ];

    /// Position of this category in a [`CategoryVector`]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Request key for this category
    pub fn key(self) -> &'static str {
        match self {
            Category::RetailShopping => "retail/shopping",
            Category::Lodging => "lodging",
            Category::SportsCulture => "sports & culture",
            Category::Dining => "dining",
            Category::Nightlife => "nightlife",
        }
    }

    /// Key used by clients of the Korean-language frontend
    pub fn legacy_key(self) -> &'static str {
        match self {
            Category::RetailShopping => "소매/쇼핑",
            Category::Lodging => "숙박",
            Category::SportsCulture => "스포츠 및 문화",
            Category::Dining => "외식",
            Category::Nightlife => "유흥",
        }
    }

    /// Maps a raw card-industry label onto its coarse category.
    ///
    /// Labels outside the table return `None` and are left out of the
    /// per-category aggregation.
    pub fn from_raw_label(label: &str) -> Option<Category> {
        match label.trim() {
            "유흥" => Some(Category::Nightlife),
            "외식업기타" | "중식/일식/양식" | "한식" => Some(Category::Dining),
            "음/식료품" | "할인점/슈퍼마켓" | "백화점/면세점" => {
                Some(Category::RetailShopping)
            }
            "숙박" => Some(Category::Lodging),
            "스포츠/문화/레저" => Some(Category::SportsCulture),
            _ => None,
        }
    }
}

impl Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.key())
    }
}

/// Discrete age bucket used to look up demographic spend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AgeBand {
    Under20,
    Twenties,
    Thirties,
    Forties,
    Fifties,
    SixtyPlus,
}

impl AgeBand {
    pub fn from_age(age: u32) -> Self {
        match age {
            0..=19 => AgeBand::Under20,
            20..=29 => AgeBand::Twenties,
            30..=39 => AgeBand::Thirties,
            40..=49 => AgeBand::Forties,
            50..=59 => AgeBand::Fifties,
            _ => AgeBand::SixtyPlus,
        }
    }

    /// Band code as it appears in the transaction table.
    ///
    /// Under-20s share the twenties code; the source data has no separate
    /// teen column. Confirm with the data owners before splitting them.
    pub fn code(self) -> u32 {
        match self {
            AgeBand::Under20 | AgeBand::Twenties => 20,
            AgeBand::Thirties => 30,
            AgeBand::Forties => 40,
            AgeBand::Fifties => 50,
            AgeBand::SixtyPlus => 60,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_order_matches_index() {
        for (i, category) in Category::ALL.iter().enumerate() {
            assert_eq!(category.index(), i);
        }
    }

    #[test]
    fn test_raw_label_mapping() {
        assert_eq!(Category::from_raw_label("한식"), Some(Category::Dining));
        assert_eq!(Category::from_raw_label("중식/일식/양식"), Some(Category::Dining));
        assert_eq!(
            Category::from_raw_label("백화점/면세점"),
            Some(Category::RetailShopping)
        );
        assert_eq!(Category::from_raw_label("숙박"), Some(Category::Lodging));
        assert_eq!(
            Category::from_raw_label("스포츠/문화/레저"),
            Some(Category::SportsCulture)
        );
        assert_eq!(Category::from_raw_label("유흥"), Some(Category::Nightlife));
    }

    #[test]
    fn test_unknown_label_is_unmapped() {
        assert_eq!(Category::from_raw_label("의료"), None);
        assert_eq!(Category::from_raw_label(""), None);
        // coarse names are not raw labels
        assert_eq!(Category::from_raw_label("dining"), None);
    }

    #[test]
    fn test_category_serialization() {
        let json = serde_json::to_string(&Category::SportsCulture).unwrap();
        assert_eq!(json, "\"sports & culture\"");
        assert_eq!(Category::RetailShopping.to_string(), "retail/shopping");
    }

    #[test]
    fn test_age_band_is_total_over_valid_ages() {
        let codes = [20, 30, 40, 50, 60];
        for age in 0..=120 {
            let band = AgeBand::from_age(age);
            assert!(codes.contains(&band.code()), "age {} has no band", age);
        }
    }

    #[test]
    fn test_age_band_boundaries() {
        assert_eq!(AgeBand::from_age(19).code(), AgeBand::from_age(25).code());
        assert_eq!(AgeBand::from_age(0).code(), 20);
        assert_eq!(AgeBand::from_age(29).code(), 20);
        assert_eq!(AgeBand::from_age(30).code(), 30);
        assert_eq!(AgeBand::from_age(49).code(), 40);
        assert_eq!(AgeBand::from_age(50).code(), 50);
        assert_eq!(AgeBand::from_age(60).code(), AgeBand::from_age(95).code());
        assert_eq!(AgeBand::from_age(120).code(), 60);
    }

    #[test]
    fn test_age_bands_do_not_overlap() {
        // each band owns a contiguous run of ages
        let mut previous = AgeBand::from_age(0);
        let mut seen = vec![previous];
        for age in 1..=120 {
            let band = AgeBand::from_age(age);
            if band != previous {
                assert!(!seen.contains(&band), "band {:?} reappears at {}", band, age);
                seen.push(band);
                previous = band;
            }
        }
        assert_eq!(seen.len(), 6);
    }
}
