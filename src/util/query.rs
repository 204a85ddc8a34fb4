use serde::{Deserialize, Deserializer};

/// Query string parameters in arrival order. A key that appears more than
/// once keeps only its first value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryParams {
    pairs: Vec<(String, String)>,
}

impl<'de> Deserialize<'de> for QueryParams {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        // A sequence of pairs keeps order and repeated keys.
        let raw = Vec::<(String, String)>::deserialize(deserializer)?;
        Ok(raw.into_iter().collect())
    }
}

impl FromIterator<(String, String)> for QueryParams {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        let mut params = QueryParams::default();
        for (key, value) in iter {
            if !params.has(&key) {
                params.pairs.push((key, value));
            }
        }
        params
    }
}

impl QueryParams {
    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Like `get`, but whitespace-only values count as absent.
    pub fn get_trimmed(&self, key: &str) -> Option<&str> {
        self.get(key).map(str::trim).filter(|v| !v.is_empty())
    }

    pub fn has(&self, key: &str) -> bool {
        self.pairs.iter().any(|(k, _)| k == key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.pairs.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(qs: &str) -> QueryParams {
        let pairs: Vec<(String, String)> = qs
            .split('&')
            .filter_map(|kv| kv.split_once('='))
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        pairs.into_iter().collect()
    }

    #[test]
    fn test_first_value_wins() {
        let params = parse("path=movie/popular&page=2&page=5&query=Dune");
        assert_eq!(params.get("page"), Some("2"));
        assert_eq!(params.get("query"), Some("Dune"));
        let keys: Vec<&str> = params.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["path", "page", "query"]);
    }

    #[test]
    fn test_get_trimmed() {
        let params: QueryParams = vec![
            ("q".to_string(), "   ".to_string()),
            ("path".to_string(), " movie/popular ".to_string()),
        ]
        .into_iter()
        .collect();
        assert_eq!(params.get_trimmed("q"), None);
        assert_eq!(params.get_trimmed("path"), Some("movie/popular"));
        assert!(params.has("q"));
        assert!(!params.has("missing"));
    }
}
