use async_trait::async_trait;
use serde_json::{json, Value};

use super::types::WELL_KNOWN_PARAMS;

#[derive(Debug, thiserror::Error)]
pub enum IntentError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Model API returned {status}")]
    Api { status: u16, body: String },
    #[error("Model returned no text")]
    EmptyResponse,
    #[error("Invalid JSON from model: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Unexpected response shape: {0}")]
    Malformed(String),
}

/// A text-generation service that answers a prompt with JSON conforming to
/// the given response schema.
#[async_trait]
pub trait IntentModel: Send + Sync {
    async fn generate(&self, prompt: &str, schema: &Value) -> Result<String, IntentError>;
}

pub fn build_prompt(search_term: &str) -> String {
    format!(
        r#"You translate movie search requests into query parameters for The Movie Database (TMDB) API.

User request: "{search_term}"

Choose exactly one path:
- "search/movie" when the user names a specific title, person or keyword. Put the text to search for in params.query.
- "discover/movie" when the user describes a kind of movie (genre, mood, era, quality). Do not set params.query.

Only include parameters the request explicitly implies:
- with_genres: TMDB genre ids, comma separated (e.g. 28 action, 35 comedy, 18 drama, 27 horror, 878 science fiction, 10749 romance, 16 animation)
- vote_average.gte: minimum rating from 0 to 10
- primary_release_year: four digit year
- sort_by: e.g. popularity.desc, vote_average.desc, vote_count.desc, primary_release_date.desc

All parameter values are strings. Respond with the JSON object only."#
    )
}

/// Structured-output schema for the model response.
pub fn response_schema() -> Value {
    let properties: serde_json::Map<String, Value> = WELL_KNOWN_PARAMS
        .iter()
        .map(|key| (key.to_string(), json!({ "type": "STRING" })))
        .collect();

    json!({
        "type": "OBJECT",
        "properties": {
            "path": {
                "type": "STRING",
                "enum": ["search/movie", "discover/movie"]
            },
            "params": {
                "type": "OBJECT",
                "properties": properties
            }
        },
        "required": ["path", "params"]
    })
}
