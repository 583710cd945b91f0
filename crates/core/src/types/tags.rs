//! Product tag lists.

use serde::{Deserialize, Serialize};

/// Tags as supplied by a caller: either a JSON array or a comma-separated
/// string (`"summer, sale"`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TagsInput {
    /// `["summer", "sale"]`
    List(Vec<String>),
    /// `"summer, sale"`
    Csv(String),
}

impl TagsInput {
    /// Trimmed tags with empty entries dropped, in input order.
    #[must_use]
    pub fn normalized(&self) -> Vec<String> {
        match self {
            Self::List(tags) => normalize_tags(tags.iter().map(String::as_str)),
            Self::Csv(raw) => normalize_tags(raw.split(',')),
        }
    }
}

impl From<Vec<String>> for TagsInput {
    fn from(tags: Vec<String>) -> Self {
        Self::List(tags)
    }
}

/// Trim every tag and drop the ones left empty.
pub fn normalize_tags<'a>(tags: impl IntoIterator<Item = &'a str>) -> Vec<String> {
    tags.into_iter()
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
        .map(String::from)
        .collect()
}
