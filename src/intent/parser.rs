use serde_json::Value;
use std::convert::Infallible;
use std::sync::Arc;
use tracing::{debug, warn};

use super::heuristic::keyword_intent;
use super::model::{build_prompt, response_schema, IntentError, IntentModel};
use super::types::*;

/// Translates free-text search requests into catalog queries.
///
/// With a model configured, the model decides; any failure there degrades to
/// a plain keyword search for the term. Without one, a fixed keyword
/// heuristic is used.
#[derive(Clone)]
pub struct IntentParser {
    model: Option<Arc<dyn IntentModel>>,
    schema: Arc<Value>,
}

impl IntentParser {
    pub fn new(model: Option<Arc<dyn IntentModel>>) -> Self {
        Self {
            model,
            schema: Arc::new(response_schema()),
        }
    }

    pub async fn parse(&self, search_term: &str) -> Result<SearchIntent, Infallible> {
        let Some(model) = &self.model else {
            debug!("No language model configured, using keyword rules");
            return Ok(keyword_intent(search_term));
        };

        match self.ask_model(model.as_ref(), search_term).await {
            Ok(intent) => Ok(intent),
            Err(e) => {
                if let IntentError::Api { body, .. } = &e {
                    debug!("Intent model error body: {}", body);
                }
                warn!(error = %e, "Intent model failed, falling back to keyword search");
                Ok(SearchIntent::keyword_search(search_term))
            }
        }
    }

    async fn ask_model(
        &self,
        model: &dyn IntentModel,
        search_term: &str,
    ) -> Result<SearchIntent, IntentError> {
        let prompt = build_prompt(search_term);
        let text = model.generate(&prompt, &self.schema).await?;
        let intent = parse_model_output(&text)?;
        debug!(path = %intent.path, params = ?intent.params, "Model produced search intent");
        Ok(intent)
    }
}

/// Parse the model's JSON answer. Only the outer shape is checked: `path`
/// must name a known route and `params` must be an object.
pub fn parse_model_output(text: &str) -> Result<SearchIntent, IntentError> {
    let value: Value = serde_json::from_str(strip_code_fence(text))?;

    let path = value
        .get("path")
        .and_then(Value::as_str)
        .ok_or_else(|| IntentError::Malformed("path is not a string".to_string()))?;
    let path = CatalogRoute::from_path(path)
        .ok_or_else(|| IntentError::Malformed(format!("unknown path {:?}", path)))?;

    let params = value
        .get("params")
        .and_then(Value::as_object)
        .ok_or_else(|| IntentError::Malformed("params is not an object".to_string()))?;

    let params = params
        .iter()
        .filter_map(|(key, value)| {
            let value = match value {
                Value::String(s) => s.clone(),
                Value::Number(n) => n.to_string(),
                Value::Bool(b) => b.to_string(),
                _ => return None,
            };
            Some((key.clone(), value))
        })
        .collect();

    Ok(SearchIntent { path, params })
}

// Some models wrap JSON in a markdown fence even when asked not to.
fn strip_code_fence(text: &str) -> &str {
    let text = text.trim();
    match text.strip_prefix("```") {
        Some(rest) => {
            let rest = rest.strip_prefix("json").unwrap_or(rest);
            rest.strip_suffix("```").unwrap_or(rest).trim()
        }
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Replays a canned answer and records the prompts it was sent.
    struct FakeModel {
        answer: Result<String, ()>,
        prompts: Mutex<Vec<String>>,
    }

    impl FakeModel {
        fn new(answer: Result<&str, ()>) -> Arc<Self> {
            Arc::new(Self {
                answer: answer.map(|s| s.to_string()),
                prompts: Mutex::new(Vec::new()),
            })
        }
    }

    #[async_trait]
    impl IntentModel for FakeModel {
        async fn generate(&self, prompt: &str, schema: &Value) -> Result<String, IntentError> {
            assert_eq!(schema["type"], "OBJECT");
            self.prompts.lock().unwrap().push(prompt.to_string());
            match &self.answer {
                Ok(text) => Ok(text.clone()),
                Err(()) => Err(IntentError::Api {
                    status: 503,
                    body: "overloaded".to_string(),
                }),
            }
        }
    }

    fn parser_with(model: Arc<FakeModel>) -> IntentParser {
        IntentParser::new(Some(model as Arc<dyn IntentModel>))
    }

    async fn parse(parser: &IntentParser, term: &str) -> SearchIntent {
        parser.parse(term).await.unwrap_or_else(|never| match never {})
    }

    #[tokio::test]
    async fn test_without_model_uses_keywords() {
        let parser = IntentParser::new(None);
        let intent = parse(&parser, "Mind-Bending movies").await;
        assert_eq!(intent.path, CatalogRoute::Discover);
        assert_eq!(intent.param(WITH_GENRES), Some("878"));
    }

    #[tokio::test]
    async fn test_model_answer_is_used() {
        let model = FakeModel::new(Ok(
            r#"{"path":"discover/movie","params":{"with_genres":"27","primary_release_year":1985,"sort_by":"popularity.desc"}}"#,
        ));
        let parser = parser_with(model.clone());
        let intent = parse(&parser, "80s horror").await;

        assert_eq!(intent.path, CatalogRoute::Discover);
        assert_eq!(intent.param(WITH_GENRES), Some("27"));
        assert_eq!(intent.param(PRIMARY_RELEASE_YEAR), Some("1985"));
        assert_eq!(intent.param(SORT_BY), Some("popularity.desc"));

        let prompts = model.prompts.lock().unwrap();
        assert_eq!(prompts.len(), 1);
        assert!(prompts[0].contains("80s horror"));
    }

    #[tokio::test]
    async fn test_model_failures_fall_back_to_keyword_search() {
        let answers: [Result<&str, ()>; 6] = [
            Err(()),
            Ok("not json at all"),
            Ok(r#"{"path": 42, "params": {}}"#),
            Ok(r#"{"path": "search/movie", "params": "query=x"}"#),
            Ok(r#"{"path": "tv/popular", "params": {}}"#),
            Ok(r#"["search/movie"]"#),
        ];
        for answer in answers {
            let parser = parser_with(FakeModel::new(answer));
            // keyword rules are not consulted once a model is configured
            let intent = parse(&parser, "best sci-fi").await;
            assert_eq!(intent, SearchIntent::keyword_search("best sci-fi"), "{:?}", answer);
        }
    }

    #[tokio::test]
    async fn test_parse_never_fails_on_blank_input() {
        let parser = IntentParser::new(None);
        for term in ["", "   ", "\n"] {
            let result = parser.parse(term).await;
            assert!(result.is_ok());
        }
        let parser = parser_with(FakeModel::new(Err(())));
        assert!(parser.parse("").await.is_ok());
    }

    #[test]
    fn test_parse_model_output_drops_nested_values() {
        let intent = parse_model_output(
            r#"{"path":"search/movie","params":{"query":"Dune","extra":{"a":1},"list":[1],"include_video":false}}"#,
        )
        .unwrap();
        assert_eq!(intent.path, CatalogRoute::Search);
        assert_eq!(intent.param(QUERY), Some("Dune"));
        assert_eq!(intent.param("include_video"), Some("false"));
        assert_eq!(intent.params.len(), 2);
    }

    #[test]
    fn test_parse_model_output_with_fence() {
        let intent = parse_model_output(
            "```json\n{\"path\":\"discover/movie\",\"params\":{\"vote_average.gte\":\"8\"}}\n```",
        )
        .unwrap();
        assert_eq!(intent.param(VOTE_AVERAGE_GTE), Some("8"));
    }

    #[test]
    fn test_parse_model_output_errors() {
        assert!(matches!(parse_model_output(""), Err(IntentError::Json(_))));
        assert!(matches!(
            parse_model_output(r#"{"params":{}}"#),
            Err(IntentError::Malformed(_))
        ));
        assert!(matches!(
            parse_model_output(r#"{"path":"search/movie"}"#),
            Err(IntentError::Malformed(_))
        ));
    }
}
