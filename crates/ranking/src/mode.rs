use common::MarketError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How a listing sequence is ordered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortMode {
    /// Most recently created first
    Newest,
    PriceAsc,
    PriceDesc,
    /// Keep the order handed in (already ranked by a search step)
    Relevance,
    /// Composite score, highest first
    #[default]
    Recommended,
}

impl SortMode {
    pub const ALL: [SortMode; 5] = [
        SortMode::Newest,
        SortMode::PriceAsc,
        SortMode::PriceDesc,
        SortMode::Relevance,
        SortMode::Recommended,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SortMode::Newest => "newest",
            SortMode::PriceAsc => "price-asc",
            SortMode::PriceDesc => "price-desc",
            SortMode::Relevance => "relevance",
            SortMode::Recommended => "recommended",
        }
    }
}

impl fmt::Display for SortMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortMode {
    type Err = MarketError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('_', "-");
        SortMode::ALL
            .into_iter()
            .find(|mode| mode.as_str() == normalized)
            .ok_or_else(|| MarketError::invalid_input(format!("unknown sort mode: {}", s)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_sort_modes() {
        assert_eq!("newest".parse::<SortMode>().unwrap(), SortMode::Newest);
        assert_eq!("price_asc".parse::<SortMode>().unwrap(), SortMode::PriceAsc);
        assert_eq!("Price-Desc".parse::<SortMode>().unwrap(), SortMode::PriceDesc);
        assert!(matches!(
            "cheapest".parse::<SortMode>(),
            Err(MarketError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_default_is_recommended() {
        assert_eq!(SortMode::default(), SortMode::Recommended);
    }
}
