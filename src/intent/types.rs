use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Catalog routes a search can be translated into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CatalogRoute {
    /// Free-text keyword search against titles.
    #[serde(rename = "search/movie")]
    Search,
    /// Filter-based listing (genre, rating, year).
    #[serde(rename = "discover/movie")]
    Discover,
}

impl CatalogRoute {
    pub fn as_str(&self) -> &'static str {
        match self {
            CatalogRoute::Search => "search/movie",
            CatalogRoute::Discover => "discover/movie",
        }
    }

    pub fn from_path(path: &str) -> Option<Self> {
        match path.trim().trim_matches('/') {
            "search/movie" => Some(CatalogRoute::Search),
            "discover/movie" => Some(CatalogRoute::Discover),
            _ => None,
        }
    }
}

impl fmt::Display for CatalogRoute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// Well-known parameter names. Any other key is passed to the provider as-is.
pub const QUERY: &str = "query";
pub const WITH_GENRES: &str = "with_genres";
pub const VOTE_AVERAGE_GTE: &str = "vote_average.gte";
pub const PRIMARY_RELEASE_YEAR: &str = "primary_release_year";
pub const SORT_BY: &str = "sort_by";

pub const WELL_KNOWN_PARAMS: &[&str] = &[
    QUERY,
    VOTE_AVERAGE_GTE,
    PRIMARY_RELEASE_YEAR,
    WITH_GENRES,
    SORT_BY,
];

/// Catalog query parameters, kept sorted by name.
pub type IntentParams = BTreeMap<String, String>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchIntent {
    pub path: CatalogRoute,
    #[serde(default)]
    pub params: IntentParams,
}

impl SearchIntent {
    pub fn new(path: CatalogRoute) -> Self {
        Self {
            path,
            params: IntentParams::new(),
        }
    }

    pub fn with(mut self, key: &str, value: &str) -> Self {
        self.params.insert(key.to_string(), value.to_string());
        self
    }

    /// Plain keyword search for the term, unmodified.
    pub fn keyword_search(term: &str) -> Self {
        SearchIntent::new(CatalogRoute::Search).with(QUERY, term)
    }

    pub fn param(&self, key: &str) -> Option<&str> {
        self.params.get(key).map(|v| v.as_str())
    }
}
