//! Product tags.

use indexmap::IndexSet;
use serde::{Deserialize, Serialize};

/// Ordered set of product tags.
///
/// Tags arrive from a single comma-separated form field. Each segment is
/// trimmed, empty segments are dropped, and repeated tags keep their first
/// position.
///
/// ```
/// use itiza_core::Tags;
///
/// let tags = Tags::parse("electronics, gadgets ,new");
/// assert_eq!(tags.iter().collect::<Vec<_>>(), ["electronics", "gadgets", "new"]);
/// assert!(Tags::parse("").is_empty());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct Tags(IndexSet<String>);

impl Tags {
    /// Parse tags from comma-separated input.
    #[must_use]
    pub fn parse(input: &str) -> Self {
        input.split(',').collect()
    }

    /// Number of distinct tags.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether there are no tags.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Whether `tag` is present (exact match after trimming).
    #[must_use]
    pub fn contains(&self, tag: &str) -> bool {
        self.0.contains(tag.trim())
    }

    /// Iterate tags in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    /// Render back to the comma-separated form used by the product form.
    #[must_use]
    pub fn to_input(&self) -> String {
        self.iter().collect::<Vec<_>>().join(", ")
    }
}

impl<S: AsRef<str>> FromIterator<S> for Tags {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|tag| tag.as_ref().trim().to_owned())
                .filter(|tag| !tag.is_empty())
                .collect(),
        )
    }
}

impl From<Vec<String>> for Tags {
    fn from(tags: Vec<String>) -> Self {
        tags.into_iter().collect()
    }
}

impl From<Tags> for Vec<String> {
    fn from(tags: Tags) -> Self {
        tags.0.into_iter().collect()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn tags(input: &str) -> Vec<String> {
        Tags::parse(input).into()
    }

    #[test]
    fn test_trims_segments() {
        assert_eq!(
            tags("electronics, gadgets ,new"),
            ["electronics", "gadgets", "new"]
        );
    }

    #[test]
    fn test_empty_input_yields_no_tags() {
        assert!(tags("").is_empty());
        assert!(tags(" , ,, ").is_empty());
    }

    #[test]
    fn test_duplicates_keep_first_position() {
        assert_eq!(tags("new, sale, new ,gift"), ["new", "sale", "gift"]);
    }

    #[test]
    fn test_to_input() {
        assert_eq!(Tags::parse("a ,b").to_input(), "a, b");
    }

    #[test]
    fn test_deserialize_normalises() {
        let tags: Tags = serde_json::from_str(r#"[" wine ", "", "wine", "red"]"#).unwrap();
        assert_eq!(Vec::<String>::from(tags), ["wine", "red"]);
    }
}
