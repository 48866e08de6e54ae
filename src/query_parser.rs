use std::fmt;

/// Retrieval category a query can be tagged with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Condition,
    Symptom,
    /// No recognized tag.
    Default,
}

impl Category {
    /// Match a prefix against the known tags.
    ///
    /// Case-insensitive whole-word match; `illness` is an alias of
    /// `condition`.
    pub fn from_prefix(prefix: &str) -> Option<Category> {
        match prefix.trim().to_lowercase().as_str() {
            "condition" | "illness" => Some(Category::Condition),
            "symptom" => Some(Category::Symptom),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Condition => "condition",
            Category::Symptom => "symptom",
            Category::Default => "default",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    pub category: Category,
    /// Trimmed text to hand to the engine.
    pub residual: String,
}

impl Classification {
    /// Nothing left to search for.
    pub fn is_empty(&self) -> bool {
        self.residual.is_empty()
    }
}

/// Split a raw query into its category tag and the text to search for.
///
/// Only the text before the first colon can name a category. When it does
/// not name one, the whole query (colon included) is the search text.
pub fn classify(raw: &str) -> Classification {
    let query = raw.trim();

    if let Some((prefix, rest)) = query.split_once(':') {
        if let Some(category) = Category::from_prefix(prefix) {
            return Classification {
                category,
                residual: rest.trim().to_string(),
            };
        }
    }

    Classification {
        category: Category::Default,
        residual: query.to_string(),
    }
}
