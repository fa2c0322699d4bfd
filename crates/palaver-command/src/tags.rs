//! Request-scoped tag set and label map.
//!
//! Tags gate and modify handler behavior for one call; labels carry the
//! optional `key:value` payload attached at peel time. Both preserve
//! discovery order — system-prompt injection and the `labels`
//! diagnostic depend on it — so they are Vec-backed rather than hashed.

/// Insertion-ordered set of lowercase marker tokens.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagSet {
    entries: Vec<String>,
}

impl TagSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a tag. Returns false if it was already present.
    pub fn add(&mut self, tag: impl Into<String>) -> bool {
        let tag = tag.into();
        if self.entries.iter().any(|t| *t == tag) {
            return false;
        }
        self.entries.push(tag);
        true
    }

    /// Remove a tag. Returns true if it was present.
    pub fn remove(&mut self, tag: &str) -> bool {
        match self.entries.iter().position(|t| t == tag) {
            Some(i) => {
                self.entries.remove(i);
                true
            }
            None => false,
        }
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.entries.iter().any(|t| t == tag)
    }

    /// Tags in discovery order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

/// Insertion-ordered `tag -> optional value` map.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LabelMap {
    entries: Vec<(String, Option<String>)>,
}

impl LabelMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a label. Overwriting keeps the original position.
    pub fn set(&mut self, key: impl Into<String>, value: Option<String>) {
        let key = key.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, v)) => *v = value,
            None => self.entries.push((key, value)),
        }
    }

    /// The value attached to a tag. Bare tags (null label) yield None,
    /// same as tags never seen.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .and_then(|(_, v)| v.as_deref())
    }

    /// All entries in discovery order, bare tags included.
    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&str>)> {
        self.entries
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_deref()))
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tags_preserve_discovery_order() {
        let mut tags = TagSet::new();
        tags.add("b");
        tags.add("a");
        tags.add("b");
        assert_eq!(tags.iter().collect::<Vec<_>>(), vec!["b", "a"]);
    }

    #[test]
    fn tag_remove_reports_presence() {
        let mut tags = TagSet::new();
        tags.add("random");
        assert!(tags.remove("random"));
        assert!(!tags.remove("random"));
        assert!(tags.is_empty());
    }

    #[test]
    fn bare_label_reads_as_missing() {
        let mut labels = LabelMap::new();
        labels.set("raw", None);
        labels.set("context", Some("5".into()));
        assert_eq!(labels.get("raw"), None);
        assert_eq!(labels.get("context"), Some("5"));
        assert_eq!(labels.get("absent"), None);
    }

    #[test]
    fn label_overwrite_keeps_position() {
        let mut labels = LabelMap::new();
        labels.set("a", None);
        labels.set("b", Some("1".into()));
        labels.set("a", Some("2".into()));
        let entries: Vec<_> = labels.iter().collect();
        assert_eq!(entries, vec![("a", Some("2")), ("b", Some("1"))]);
    }
}
