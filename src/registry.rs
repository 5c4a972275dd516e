use serde::Deserialize;

/// Filter target reserved for the "All" pill.
pub const ALL_SECTIONS: &str = "all";

/// Fallback identifier for labels without any ASCII letters or digits.
const FALLBACK_SECTION_ID: &str = "section";

const DIGIT_PREFIX: &str = "s-";

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct Source {
    pub name: String,
    pub url: String,
}

#[derive(Debug, Clone)]
pub struct Category {
    pub label: String,
    /// Selector-safe identifier, unique within the owning registry.
    pub id: String,
    pub sources: Vec<Source>,
}

/// Ordered, immutable table of categories shown on the dashboard.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    categories: Vec<Category>,
}

impl Registry {
    /// Build a registry, deriving section identifiers in the given order.
    pub fn new<I, L>(entries: I) -> Self
    where
        I: IntoIterator<Item = (L, Vec<Source>)>,
        L: Into<String>,
    {
        let mut categories: Vec<Category> = Vec::new();

        for (label, sources) in entries {
            let label = label.into();
            let base = section_id(&label);

            let mut id = base.clone();
            let mut suffix = 2;
            while id == ALL_SECTIONS || categories.iter().any(|c| c.id == id) {
                id = format!("{}-{}", base, suffix);
                suffix += 1;
            }

            categories.push(Category { label, id, sources });
        }

        Self { categories }
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn get(&self, id: &str) -> Option<&Category> {
        self.categories.iter().find(|c| c.id == id)
    }

    pub fn section_ids(&self) -> impl Iterator<Item = &str> {
        self.categories.iter().map(|c| c.id.as_str())
    }

    /// Total number of sources across every category.
    pub fn source_count(&self) -> usize {
        self.categories.iter().map(|c| c.sources.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }
}

/// Derive a DOM-safe identifier from a category label.
///
/// ASCII letters and digits are kept as-is; any run of other characters
/// (whitespace, emoji, variation selectors, punctuation) collapses into a
/// single hyphen. Leading and trailing hyphens are dropped, and an id that
/// would start with a digit gets an `s-` prefix so it is usable as `#id`.
pub fn section_id(label: &str) -> String {
    let mut id = String::with_capacity(label.len());
    let mut pending_dash = false;

    for ch in label.chars() {
        if ch.is_ascii_alphanumeric() {
            if pending_dash && !id.is_empty() {
                id.push('-');
            }
            id.push(ch);
            pending_dash = false;
        } else {
            pending_dash = true;
        }
    }

    if id.is_empty() {
        return FALLBACK_SECTION_ID.to_string();
    }

    // CSS identifiers cannot start with a digit
    if id.starts_with(|c: char| c.is_ascii_digit()) {
        id.insert_str(0, DIGIT_PREFIX);
    }

    id
}
