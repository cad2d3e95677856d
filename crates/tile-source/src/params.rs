//! Ordered request parameter tables.
//!
//! Keys are case-sensitive and unique. Setting an existing key replaces its
//! value in place, so the first insertion fixes a key's position in the
//! serialized query string.

/// An ordered, string-keyed table of request parameters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParamTable {
    entries: Vec<(String, String)>,
}

impl ParamTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert `key`, or overwrite its value if already present.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    /// Builder form of [`set`](Self::set).
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.set(key, value);
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Apply every entry of `overlay` on top of this table.
    ///
    /// Keys present in both end up with the overlay's value; values are never
    /// concatenated.
    pub fn overlay(&mut self, overlay: &ParamTable) {
        for (key, value) in overlay.iter() {
            self.set(key, value);
        }
    }

    /// Consuming form of [`overlay`](Self::overlay).
    pub fn overlaid(mut self, overlay: &ParamTable) -> Self {
        self.overlay(overlay);
        self
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for ParamTable {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut table = ParamTable::new();
        for (k, v) in iter {
            table.set(k, v);
        }
        table
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_replaces_in_place() {
        let mut table = ParamTable::new();
        table.set("A", "1");
        table.set("B", "2");
        table.set("A", "3");

        assert_eq!(table.len(), 2);
        assert_eq!(table.get("A"), Some("3"));
        let keys: Vec<&str> = table.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["A", "B"]);
    }

    #[test]
    fn test_keys_are_case_sensitive() {
        let table = ParamTable::new().with("LAYERS", "a").with("layers", "b");
        assert_eq!(table.len(), 2);
        assert_eq!(table.get("LAYERS"), Some("a"));
        assert_eq!(table.get("layers"), Some("b"));
        assert_eq!(table.get("Layers"), None);
    }

    #[test]
    fn test_overlay_wins_and_appends() {
        let mut base = ParamTable::new().with("FORMAT", "image/png").with("SRS", "EPSG:4326");
        let overlay = ParamTable::new().with("SRS", "EPSG:900913").with("LAYERS", "base");

        base.overlay(&overlay);

        let entries: Vec<(&str, &str)> = base.iter().collect();
        assert_eq!(
            entries,
            vec![
                ("FORMAT", "image/png"),
                ("SRS", "EPSG:900913"),
                ("LAYERS", "base"),
            ]
        );
        // overlay table is untouched
        assert_eq!(overlay.len(), 2);
    }

    #[test]
    fn test_overlay_with_empty_value() {
        let base = ParamTable::new().with("STYLES", "default");
        let overlay = ParamTable::new().with("STYLES", "");
        assert_eq!(base.overlaid(&overlay).get("STYLES"), Some(""));
    }

    #[test]
    fn test_clone_is_independent() {
        let original = ParamTable::new().with("VERSION", "1.1.1");
        let mut copy = original.clone();
        copy.set("VERSION", "1.3.0");
        copy.set("EXTRA", "x");

        assert_eq!(original.get("VERSION"), Some("1.1.1"));
        assert!(!original.contains_key("EXTRA"));
        assert_eq!(original.len(), 1);
    }

    #[test]
    fn test_from_iterator_last_wins() {
        let table: ParamTable = [("A", "1"), ("A", "2")].into_iter().collect();
        assert_eq!(table.len(), 1);
        assert_eq!(table.get("A"), Some("2"));
    }
}
