//! Index configuration: analyzer chains, filter definitions and the
//! per-field mapping rules for the health-topic corpus.
//!
//! The mapping is a fold over [`FIELD_RULES`]. Dotted paths become nested
//! `properties` objects, so `site.@title` lands under `site`.

use serde_json::{Map, Value, json};

pub const STANDARD_TOKENIZER: &str = "standard";

/// Analyzer applied at index time to every analyzed field.
pub const INDEX_ANALYZER: &str = "custom_analyzer";
/// Analyzer for quoted phrases: synonyms but no stopword removal.
pub const QUOTE_ANALYZER: &str = "custom_search_analyzer";
/// Analyzer for unquoted query text.
pub const SEARCH_ANALYZER: &str = "custom_search_stop_analyzer";

pub const SYNONYM_FILTER: &str = "synonym_graph";
pub const STOP_FILTER: &str = "custom_stop";

/// Token filters in the order they must run within a chain.
///
/// Case folding and synonym graph expansion come first so stopword matching
/// sees the final tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum TokenFilter {
    Lowercase,
    SynonymGraph,
    Stop,
}

impl TokenFilter {
    pub fn id(self) -> &'static str {
        match self {
            TokenFilter::Lowercase => "lowercase",
            TokenFilter::SynonymGraph => SYNONYM_FILTER,
            TokenFilter::Stop => STOP_FILTER,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnalyzerChain {
    pub id: &'static str,
    pub tokenizer: &'static str,
    pub filters: &'static [TokenFilter],
}

impl AnalyzerChain {
    pub fn to_json(&self) -> Value {
        let filters: Vec<&str> = self.filters.iter().map(|f| f.id()).collect();
        json!({
            "type": "custom",
            "tokenizer": self.tokenizer,
            "filter": filters,
        })
    }
}

pub const ANALYZER_CHAINS: [AnalyzerChain; 3] = [
    AnalyzerChain {
        id: INDEX_ANALYZER,
        tokenizer: STANDARD_TOKENIZER,
        filters: &[TokenFilter::Lowercase],
    },
    AnalyzerChain {
        id: QUOTE_ANALYZER,
        tokenizer: STANDARD_TOKENIZER,
        filters: &[TokenFilter::Lowercase, TokenFilter::SynonymGraph],
    },
    AnalyzerChain {
        id: SEARCH_ANALYZER,
        tokenizer: STANDARD_TOKENIZER,
        filters: &[
            TokenFilter::Lowercase,
            TokenFilter::SynonymGraph,
            TokenFilter::Stop,
        ],
    },
];

/// How the engine treats a field's text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Runs through the custom chains. `phrases` turns on shingle indexing.
    Analyzed { phrases: bool },
    /// Text field on the engine's default analyzer (URLs, language codes).
    Plain,
    /// Stored in the source but not searchable.
    Excluded,
    /// Date parsed with the given pattern.
    Date { format: &'static str },
}

/// Exact-match `keyword` sub-field generated next to the main field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExactMatch {
    None,
    Keyword,
    /// Keyword sub-field that skips values longer than the limit.
    KeywordIgnoreAbove(u32),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldRule {
    pub path: &'static str,
    pub kind: FieldKind,
    pub exact: ExactMatch,
}

impl FieldRule {
    const fn new(path: &'static str, kind: FieldKind, exact: ExactMatch) -> Self {
        Self { path, kind, exact }
    }

    pub fn is_indexed(&self) -> bool {
        !matches!(self.kind, FieldKind::Excluded)
    }

    pub fn index_analyzer(&self) -> Option<&'static str> {
        match self.kind {
            FieldKind::Analyzed { .. } => Some(INDEX_ANALYZER),
            _ => None,
        }
    }

    pub fn search_analyzer(&self) -> Option<&'static str> {
        match self.kind {
            FieldKind::Analyzed { .. } => Some(SEARCH_ANALYZER),
            _ => None,
        }
    }

    pub fn search_quote_analyzer(&self) -> Option<&'static str> {
        match self.kind {
            FieldKind::Analyzed { .. } => Some(QUOTE_ANALYZER),
            _ => None,
        }
    }

    pub fn index_phrases(&self) -> bool {
        matches!(self.kind, FieldKind::Analyzed { phrases: true })
    }

    /// Mapping definition for this leaf field.
    pub fn to_mapping(&self) -> Value {
        let mut mapping = Map::new();

        match self.kind {
            FieldKind::Date { format } => {
                mapping.insert("type".into(), json!("date"));
                mapping.insert("format".into(), json!(format));
            }
            FieldKind::Excluded => {
                mapping.insert("type".into(), json!("text"));
                mapping.insert("index".into(), json!(false));
            }
            FieldKind::Plain | FieldKind::Analyzed { .. } => {
                mapping.insert("type".into(), json!("text"));
            }
        }

        if self.index_phrases() {
            mapping.insert("index_phrases".into(), json!(true));
        }
        if let Some(analyzer) = self.index_analyzer() {
            mapping.insert("analyzer".into(), json!(analyzer));
        }
        if let Some(analyzer) = self.search_analyzer() {
            mapping.insert("search_analyzer".into(), json!(analyzer));
        }
        if let Some(analyzer) = self.search_quote_analyzer() {
            mapping.insert("search_quote_analyzer".into(), json!(analyzer));
        }

        let keyword = match self.exact {
            ExactMatch::None => None,
            ExactMatch::Keyword => Some(json!({ "type": "keyword" })),
            ExactMatch::KeywordIgnoreAbove(limit) => {
                Some(json!({ "type": "keyword", "ignore_above": limit }))
            }
        };
        if let Some(keyword) = keyword {
            mapping.insert("fields".into(), json!({ "keyword": keyword }));
        }

        Value::Object(mapping)
    }
}

use ExactMatch::{Keyword, KeywordIgnoreAbove};
use FieldKind::{Analyzed, Excluded, Plain};

const TEXT: FieldKind = Analyzed { phrases: false };
const PHRASES: FieldKind = Analyzed { phrases: true };

/// Every field of a health-topic record, keyed by dotted path.
pub const FIELD_RULES: &[FieldRule] = &[
    FieldRule::new("@date-created", FieldKind::Date { format: "MM/dd/yyyy" }, Keyword),
    FieldRule::new("@language", Excluded, ExactMatch::None),
    FieldRule::new("@meta-desc", PHRASES, Keyword),
    FieldRule::new("@title", PHRASES, Keyword),
    FieldRule::new("@url", Plain, Keyword),
    FieldRule::new("also-called", TEXT, Keyword),
    FieldRule::new("full-summary", PHRASES, KeywordIgnoreAbove(256)),
    FieldRule::new("group.#text", TEXT, Keyword),
    FieldRule::new("group.@id", Excluded, ExactMatch::None),
    FieldRule::new("group.@url", Plain, Keyword),
    FieldRule::new("language-mapped-topic.#text", PHRASES, Keyword),
    FieldRule::new("language-mapped-topic.@id", Excluded, ExactMatch::None),
    FieldRule::new("language-mapped-topic.@language", Plain, Keyword),
    FieldRule::new("language-mapped-topic.@url", Plain, Keyword),
    FieldRule::new("mesh-heading.descriptor.#text", TEXT, Keyword),
    FieldRule::new("mesh-heading.descriptor.@id", Excluded, ExactMatch::None),
    FieldRule::new("mesh-heading.qualifier.#text", TEXT, Keyword),
    FieldRule::new("mesh-heading.qualifier.@id", Excluded, ExactMatch::None),
    FieldRule::new("other-language.#text", Excluded, ExactMatch::None),
    FieldRule::new("other-language.@url", Excluded, ExactMatch::None),
    FieldRule::new("other-language.@vernacular-name", Excluded, ExactMatch::None),
    FieldRule::new("primary-institute.#text", PHRASES, Keyword),
    FieldRule::new("primary-institute.@url", Plain, Keyword),
    FieldRule::new("related-topic.#text", TEXT, Keyword),
    FieldRule::new("related-topic.@id", Excluded, ExactMatch::None),
    FieldRule::new("related-topic.@url", Plain, Keyword),
    FieldRule::new("see-reference", TEXT, Keyword),
    FieldRule::new("site.@language-mapped-url", Excluded, ExactMatch::None),
    FieldRule::new("site.@title", TEXT, ExactMatch::None),
    FieldRule::new("site.@url", Plain, Keyword),
    FieldRule::new("site.information-category", TEXT, ExactMatch::None),
    FieldRule::new("site.organization", TEXT, Keyword),
    FieldRule::new("site.standard-description", TEXT, ExactMatch::None),
];

pub fn find_rule(path: &str) -> Option<&'static FieldRule> {
    FIELD_RULES.iter().find(|rule| rule.path == path)
}

/// Engine-side locations of the word lists the filters load.
///
/// These are opaque references resolved by the engine relative to its own
/// configuration directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourcePaths {
    pub stopwords_path: String,
    pub synonyms_path: String,
}

impl Default for ResourcePaths {
    fn default() -> Self {
        Self {
            stopwords_path: "./stoplist.txt".to_string(),
            synonyms_path: "./solr_synonyms.txt".to_string(),
        }
    }
}

fn analysis_settings(resources: &ResourcePaths) -> Value {
    let analyzers: Map<String, Value> = ANALYZER_CHAINS
        .iter()
        .map(|chain| (chain.id.to_string(), chain.to_json()))
        .collect();

    json!({
        "analyzer": analyzers,
        "filter": {
            STOP_FILTER: {
                "type": "stop",
                "ignore_case": true,
                "stopwords_path": resources.stopwords_path,
            },
            SYNONYM_FILTER: {
                "type": "synonym_graph",
                "expand": true,
                "synonyms_path": resources.synonyms_path,
            },
        },
    })
}

/// Insert `mapping` at the dotted `path`, creating intermediate object
/// mappings as needed.
fn insert_at_path(properties: &mut Map<String, Value>, path: &str, mapping: Value) {
    match path.split_once('.') {
        None => {
            properties.insert(path.to_string(), mapping);
        }
        Some((head, rest)) => {
            let object = properties
                .entry(head.to_string())
                .or_insert_with(|| json!({ "properties": {} }));
            if let Some(children) = object
                .get_mut("properties")
                .and_then(Value::as_object_mut)
            {
                insert_at_path(children, rest, mapping);
            }
        }
    }
}

/// Nested `properties` document for a set of field rules.
pub fn build_mappings(rules: &[FieldRule]) -> Value {
    let properties = rules.iter().fold(Map::new(), |mut props, rule| {
        insert_at_path(&mut props, rule.path, rule.to_mapping());
        props
    });

    json!({ "properties": properties })
}

/// The complete index configuration document (settings plus mappings).
///
/// Pure: the same resource paths always yield the same document.
pub fn build_index_config(resources: &ResourcePaths) -> Value {
    json!({
        "settings": {
            "index.mapping.ignore_malformed": true,
            "analysis": analysis_settings(resources),
        },
        "mappings": build_mappings(FIELD_RULES),
    })
}
