//! Field weighting per query category.

use crate::query_parser::Category;
use serde_json::{Map, Value, json};

/// Catch-all field pattern, searched at the engine's implicit weight.
pub const WILDCARD_FIELD: &str = "*";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldBoost {
    pub field: &'static str,
    /// `None` leaves the engine's default weight in place.
    pub weight: Option<u32>,
}

impl FieldBoost {
    const fn boosted(field: &'static str, weight: u32) -> Self {
        Self {
            field,
            weight: Some(weight),
        }
    }

    const fn wildcard() -> Self {
        Self {
            field: WILDCARD_FIELD,
            weight: None,
        }
    }

    /// `field^weight`, as the query-string syntax expects.
    pub fn to_query_field(&self) -> String {
        match self.weight {
            Some(weight) => format!("{}^{}", self.field, weight),
            None => self.field.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Highlight {
    pub fields: &'static [&'static str],
    pub pre_tag: &'static str,
    pub post_tag: &'static str,
    pub require_field_match: bool,
    pub kind: &'static str,
}

impl Highlight {
    pub fn to_json(&self) -> Value {
        let fields: Map<String, Value> = self
            .fields
            .iter()
            .map(|field| (field.to_string(), json!({})))
            .collect();

        json!({
            "require_field_match": self.require_field_match,
            "pre_tags": [self.pre_tag],
            "post_tags": [self.post_tag],
            "fields": fields,
            "type": self.kind,
        })
    }
}

/// Snippets come from the two narrative fields whatever the category.
pub const HIGHLIGHT: Highlight = Highlight {
    fields: &["@meta-desc", "full-summary"],
    pre_tag: "<strong>",
    post_tag: "</strong>",
    require_field_match: false,
    kind: "unified",
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoostProfile {
    pub category: Category,
    pub fields: &'static [FieldBoost],
    pub highlight: Highlight,
    /// Expand wildcard patterns inside the query text.
    pub analyze_wildcard: bool,
}

impl BoostProfile {
    pub fn query_fields(&self) -> Vec<String> {
        self.fields.iter().map(FieldBoost::to_query_field).collect()
    }

    pub fn has_wildcard_field(&self) -> bool {
        self.fields.iter().any(|f| f.field == WILDCARD_FIELD)
    }
}

static CONDITION: BoostProfile = BoostProfile {
    category: Category::Condition,
    fields: &[
        FieldBoost::boosted("@title", 4),
        FieldBoost::boosted("mesh-heading.descriptor.#text", 4),
        FieldBoost::boosted("mesh-heading.qualifier.#text", 4),
        FieldBoost::boosted("also-called", 4),
    ],
    highlight: HIGHLIGHT,
    analyze_wildcard: false,
};

static SYMPTOM: BoostProfile = BoostProfile {
    category: Category::Symptom,
    fields: &[
        FieldBoost::boosted("@meta-desc", 4),
        FieldBoost::boosted("full-summary", 5),
        FieldBoost::boosted("site.information-category", 5),
        FieldBoost::boosted("site.@title", 5),
        FieldBoost::boosted("related-topic.#text", 3),
        FieldBoost::wildcard(),
    ],
    highlight: HIGHLIGHT,
    analyze_wildcard: false,
};

static DEFAULT: BoostProfile = BoostProfile {
    category: Category::Default,
    fields: &[
        FieldBoost::boosted("@title", 8),
        FieldBoost::boosted("mesh-heading.descriptor.#text", 8),
        FieldBoost::boosted("mesh-heading.qualifier.#text", 8),
        FieldBoost::boosted("also-called", 8),
        FieldBoost::boosted("see-reference", 8),
        FieldBoost::boosted("@meta-desc", 7),
        FieldBoost::boosted("full-summary", 7),
        FieldBoost::boosted("site.information-category", 5),
        FieldBoost::boosted("site.@title", 5),
        FieldBoost::boosted("related-topic.#text", 2),
        FieldBoost::wildcard(),
    ],
    highlight: HIGHLIGHT,
    analyze_wildcard: true,
};

/// Boost profile for a category.
pub fn select_profile(category: Category) -> &'static BoostProfile {
    match category {
        Category::Condition => &CONDITION,
        Category::Symptom => &SYMPTOM,
        Category::Default => &DEFAULT,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::find_rule;

    const ALL: [Category; 3] = [Category::Condition, Category::Symptom, Category::Default];

    #[test]
    fn test_condition_profile_is_uniform_without_wildcard() {
        let profile = select_profile(Category::Condition);

        assert!(!profile.has_wildcard_field());
        assert!(!profile.analyze_wildcard);
        assert!(profile.fields.iter().all(|f| f.weight == Some(4)));
        assert_eq!(
            profile.query_fields(),
            vec![
                "@title^4",
                "mesh-heading.descriptor.#text^4",
                "mesh-heading.qualifier.#text^4",
                "also-called^4",
            ]
        );
    }

    #[test]
    fn test_symptom_profile_favours_narrative_fields() {
        let profile = select_profile(Category::Symptom);
        let weight = |name: &str| {
            profile
                .fields
                .iter()
                .find(|f| f.field == name)
                .and_then(|f| f.weight)
        };

        assert_eq!(weight("full-summary"), Some(5));
        assert!(weight("related-topic.#text") < weight("site.@title"));
        assert_eq!(profile.fields.last().map(|f| f.field), Some(WILDCARD_FIELD));
        assert!(!profile.analyze_wildcard);
    }

    #[test]
    fn test_only_default_profile_analyzes_wildcards() {
        for category in ALL {
            let profile = select_profile(category);
            assert_eq!(profile.analyze_wildcard, category == Category::Default);
            assert_eq!(profile.category, category);
        }
    }

    #[test]
    fn test_default_profile_tiers() {
        let profile = select_profile(Category::Default);
        let weights: Vec<Option<u32>> = profile.fields.iter().map(|f| f.weight).collect();

        // Non-increasing weights, wildcard last at implicit weight.
        let explicit: Vec<u32> = weights.iter().flatten().copied().collect();
        assert!(explicit.windows(2).all(|w| w[0] >= w[1]));
        assert_eq!(weights.last(), Some(&None));
        assert_eq!(explicit.first(), Some(&8));
    }

    #[test]
    fn test_boosted_fields_are_searchable_schema_fields() {
        for category in ALL {
            for boost in select_profile(category).fields {
                if boost.field == WILDCARD_FIELD {
                    continue;
                }
                let rule = find_rule(boost.field)
                    .unwrap_or_else(|| panic!("{} is not in the schema", boost.field));
                assert!(rule.index_analyzer().is_some(), "{}", boost.field);
            }
        }
    }

    #[test]
    fn test_highlight_fields_are_schema_fields() {
        for field in HIGHLIGHT.fields {
            assert!(find_rule(field).is_some(), "{field}");
        }
    }

    #[test]
    fn test_highlight_json() {
        assert_eq!(
            HIGHLIGHT.to_json(),
            json!({
                "require_field_match": false,
                "pre_tags": ["<strong>"],
                "post_tags": ["</strong>"],
                "fields": { "@meta-desc": {}, "full-summary": {} },
                "type": "unified"
            })
        );
    }

    #[test]
    fn test_selection_is_deterministic() {
        for category in ALL {
            assert_eq!(select_profile(category), select_profile(category));
            assert_eq!(
                select_profile(category).query_fields(),
                select_profile(category).query_fields()
            );
        }
    }
}
