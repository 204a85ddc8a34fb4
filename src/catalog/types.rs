use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::intent::SearchIntent;
use crate::util::QueryParams;

/// Parameters the gateway always sends. They are applied after the caller's
/// parameters and replace any caller value for the same key.
pub const FIXED_PARAMS: [(&str, &str); 3] = [
    ("language", "en-US"),
    ("page", "1"),
    ("include_adult", "false"),
];

pub const PATH_PARAM: &str = "path";

/// One call to the movie catalog: a provider-relative route plus query
/// parameters in the order they should be sent.
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogRequest {
    pub path: String,
    pub params: Vec<(String, String)>,
}

impl CatalogRequest {
    pub fn new(path: &str) -> Self {
        Self {
            path: path.to_string(),
            params: Vec::new(),
        }
    }

    pub fn with_param(mut self, key: &str, value: &str) -> Self {
        self.params.push((key.to_string(), value.to_string()));
        self
    }

    /// Build from incoming query parameters. `path` selects the route and
    /// everything else is forwarded.
    pub fn from_query(query: &QueryParams) -> Option<Self> {
        let path = query.get_trimmed(PATH_PARAM)?;
        let params = query
            .iter()
            .filter(|(k, _)| *k != PATH_PARAM)
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Some(Self {
            path: path.to_string(),
            params,
        })
    }

    pub fn from_intent(intent: &SearchIntent) -> Self {
        Self {
            path: intent.path.as_str().to_string(),
            params: intent
                .params
                .iter()
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect(),
        }
    }

    /// Caller parameters followed by the fixed ones.
    pub fn query_pairs(&self) -> Vec<(&str, &str)> {
        let mut pairs: Vec<(&str, &str)> = self
            .params
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .filter(|(k, _)| !FIXED_PARAMS.iter().any(|(fixed, _)| fixed == k))
            .collect();
        pairs.extend(FIXED_PARAMS.iter().copied());
        pairs
    }
}

/// Error body returned by the API handlers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorEnvelope {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
}

impl ErrorEnvelope {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            details: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Movie {
    pub id: i64,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub overview: String,
    #[serde(default)]
    pub release_date: String,
    #[serde(default)]
    pub vote_average: f64,
}

impl Movie {
    pub fn year(&self) -> Option<&str> {
        self.release_date
            .get(..4)
            .filter(|y| y.chars().all(|c| c.is_ascii_digit()))
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MovieList {
    #[serde(default)]
    pub page: u32,
    #[serde(default)]
    pub results: Vec<Movie>,
    #[serde(default)]
    pub total_pages: u32,
    #[serde(default)]
    pub total_results: u32,
}
