use crate::error::SearchError;
use crate::profile::{BoostProfile, select_profile};
use crate::query_parser::Classification;
use serde::Serialize;
use serde_json::Value;

/// Hits returned per page.
pub const PAGE_SIZE: u32 = 15;

/// Parse the caller's `from` parameter.
///
/// Missing or non-numeric values fall back to 0, and negative offsets are
/// clamped to 0.
pub fn parse_offset(raw: Option<&str>) -> u64 {
    raw.map(str::trim)
        .and_then(|s| s.parse::<i64>().ok())
        .and_then(|n| u64::try_from(n).ok())
        .unwrap_or(0)
}

fn is_false(value: &bool) -> bool {
    !*value
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueryString {
    pub fields: Vec<String>,
    pub query: String,
    #[serde(skip_serializing_if = "is_false")]
    pub analyze_wildcard: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Query {
    pub query_string: QueryString,
}

/// Request body for the engine's search endpoint.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchRequest {
    #[serde(rename = "_source")]
    pub source: Vec<String>,
    pub from: u64,
    pub size: u32,
    pub query: Query,
    pub highlight: Value,
}

impl SearchRequest {
    /// Assemble the request for a classified query.
    ///
    /// Refuses an empty query so it never reaches the engine.
    pub fn build(classification: &Classification, from: u64) -> Result<Self, SearchError> {
        if classification.is_empty() {
            return Err(SearchError::EmptyQuery);
        }

        let profile = select_profile(classification.category);
        Ok(Self::with_profile(profile, &classification.residual, from))
    }

    pub fn with_profile(profile: &BoostProfile, query: &str, from: u64) -> Self {
        Self {
            source: vec!["*".to_string()],
            from,
            size: PAGE_SIZE,
            query: Query {
                query_string: QueryString {
                    fields: profile.query_fields(),
                    query: query.to_string(),
                    analyze_wildcard: profile.analyze_wildcard,
                },
            },
            highlight: profile.highlight.to_json(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query_parser::{Category, classify};
    use serde_json::json;

    #[test]
    fn test_parse_offset() {
        assert_eq!(parse_offset(None), 0);
        assert_eq!(parse_offset(Some("abc")), 0);
        assert_eq!(parse_offset(Some("")), 0);
        assert_eq!(parse_offset(Some("30")), 30);
        assert_eq!(parse_offset(Some(" 15 ")), 15);
        assert_eq!(parse_offset(Some("1.5")), 0);
    }

    #[test]
    fn test_negative_offset_is_clamped() {
        assert_eq!(parse_offset(Some("-5")), 0);
    }

    #[test]
    fn test_overflowing_offset_falls_back() {
        assert_eq!(parse_offset(Some("99999999999999999999999")), 0);
    }

    #[test]
    fn test_condition_request() {
        let classification = classify("Condition:diabetes");
        assert_eq!(classification.category, Category::Condition);

        let request = SearchRequest::build(&classification, parse_offset(None)).unwrap();
        let body = serde_json::to_value(&request).unwrap();

        assert_eq!(
            body,
            json!({
                "_source": ["*"],
                "from": 0,
                "size": 15,
                "query": {
                    "query_string": {
                        "fields": [
                            "@title^4",
                            "mesh-heading.descriptor.#text^4",
                            "mesh-heading.qualifier.#text^4",
                            "also-called^4"
                        ],
                        "query": "diabetes"
                    }
                },
                "highlight": {
                    "require_field_match": false,
                    "pre_tags": ["<strong>"],
                    "post_tags": ["</strong>"],
                    "fields": { "@meta-desc": {}, "full-summary": {} },
                    "type": "unified"
                }
            })
        );
    }

    #[test]
    fn test_default_request_analyzes_wildcards() {
        let request = SearchRequest::build(&classify("diab*"), 15).unwrap();
        let body = serde_json::to_value(&request).unwrap();

        assert_eq!(body["from"], 15);
        assert_eq!(body["query"]["query_string"]["analyze_wildcard"], true);
        assert_eq!(body["query"]["query_string"]["fields"][0], "@title^8");
    }

    #[test]
    fn test_symptom_request_has_no_wildcard_analysis() {
        let request = SearchRequest::build(&classify("symptom: cough"), 0).unwrap();
        let body = serde_json::to_value(&request).unwrap();

        assert!(body["query"]["query_string"].get("analyze_wildcard").is_none());
        assert_eq!(body["query"]["query_string"]["query"], "cough");
    }

    #[test]
    fn test_empty_query_is_refused() {
        let err = SearchRequest::build(&classify("symptom:   "), 0).unwrap_err();
        assert!(matches!(err, SearchError::EmptyQuery));
    }
}
