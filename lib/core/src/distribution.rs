use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Raw per-category aggregates of one view over one cohort
///
/// Values are stored unnormalized and keyed in sorted category order, so two
/// distributions built from the same rows in any order are identical.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Distribution {
    values: BTreeMap<String, f64>,
}

impl Distribution {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, category: impl Into<String>, value: f64) {
        self.values.insert(category.into(), value);
    }

    /// Raw value for a category, if the cohort has it
    pub fn get(&self, category: &str) -> Option<f64> {
        self.values.get(category).copied()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn categories(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.values.iter().map(|(k, v)| (k.as_str(), *v))
    }

    pub fn total(&self) -> f64 {
        self.values.values().sum()
    }
}

impl<K: Into<String>> FromIterator<(K, f64)> for Distribution {
    fn from_iter<I: IntoIterator<Item = (K, f64)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_independent() {
        let a: Distribution = [("Male", 40.0), ("Female", 35.0)].into_iter().collect();
        let b: Distribution = [("Female", 35.0), ("Male", 40.0)].into_iter().collect();
        assert_eq!(a, b);
        assert_eq!(a.categories().collect::<Vec<_>>(), vec!["Female", "Male"]);
    }

    #[test]
    fn test_total_and_lookup() {
        let mut dist = Distribution::new();
        dist.insert("A", 8.0);
        dist.insert("B", 2.0);
        assert_eq!(dist.total(), 10.0);
        assert_eq!(dist.get("A"), Some(8.0));
        assert_eq!(dist.get("C"), None);
        assert_eq!(dist.len(), 2);
    }
}
