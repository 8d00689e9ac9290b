//! # Label Index
//!
//! Dense class ids for label strings. Ids are assigned in ascending
//! lexicographic order of the labels, so the same label set always yields the
//! same mapping regardless of the order rows appear in the corpus.

use std::collections::{BTreeSet, HashMap};

use serde::{Deserialize, Serialize};

use crate::error::{AdlensError, Result};

/// Bijection between label strings and class ids `0..len()`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<String>", into = "Vec<String>")]
pub struct LabelIndex {
    labels: Vec<String>,
    ids: HashMap<String, u32>,
}

impl LabelIndex {
    /// Index the distinct labels in `labels` and map every input to its id.
    ///
    /// The returned ids follow input order, one per input label.
    pub fn fit<S: AsRef<str>>(labels: &[S]) -> (Self, Vec<u32>) {
        let distinct: BTreeSet<&str> = labels.iter().map(AsRef::as_ref).collect();
        let index = Self::build(distinct.into_iter().map(str::to_string).collect());

        let targets = labels
            .iter()
            .map(|label| index.ids[label.as_ref()])
            .collect();

        (index, targets)
    }

    /// Rebuild an index from labels listed in id order.
    pub fn from_labels(labels: Vec<String>) -> Result<Self> {
        let distinct: BTreeSet<&String> = labels.iter().collect();
        if distinct.len() != labels.len() {
            return Err(AdlensError::InvalidInput(
                "label list contains duplicates".into(),
            ));
        }
        Ok(Self::build(labels))
    }

    fn build(labels: Vec<String>) -> Self {
        let ids = labels
            .iter()
            .enumerate()
            .map(|(id, label)| (label.clone(), id as u32))
            .collect();
        Self { labels, ids }
    }

    /// Number of classes.
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Class id for `label`.
    pub fn id(&self, label: &str) -> Option<u32> {
        self.ids.get(label).copied()
    }

    /// Label for class `id`.
    pub fn label(&self, id: u32) -> Option<&str> {
        self.labels.get(id as usize).map(String::as_str)
    }

    /// Labels in id order.
    pub fn labels(&self) -> &[String] {
        &self.labels
    }
}

impl TryFrom<Vec<String>> for LabelIndex {
    type Error = AdlensError;

    fn try_from(labels: Vec<String>) -> Result<Self> {
        Self::from_labels(labels)
    }
}

impl From<LabelIndex> for Vec<String> {
    fn from(index: LabelIndex) -> Self {
        index.labels
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fit_assigns_sorted_ids() {
        let (index, targets) = LabelIndex::fit(&["technology", "sports", "finance", "sports"]);

        assert_eq!(index.len(), 3);
        assert_eq!(index.id("finance"), Some(0));
        assert_eq!(index.id("sports"), Some(1));
        assert_eq!(index.id("technology"), Some(2));
        assert_eq!(targets, vec![2, 1, 0, 1]);
    }

    #[test]
    fn test_fit_is_a_bijection() {
        let labels = ["b", "a", "c", "a", "d", "b"];
        let (index, targets) = LabelIndex::fit(&labels);

        let mut ids: Vec<u32> = labels.iter().map(|l| index.id(l).unwrap()).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids, (0..index.len() as u32).collect::<Vec<_>>());

        for (label, target) in labels.iter().zip(&targets) {
            assert_eq!(index.label(*target), Some(*label));
        }
    }

    #[test]
    fn test_fit_ignores_input_order() {
        let (first, _) = LabelIndex::fit(&["sports", "technology"]);
        let (second, _) = LabelIndex::fit(&["technology", "sports"]);
        assert_eq!(first, second);
    }

    #[test]
    fn test_single_label() {
        let (index, targets) = LabelIndex::fit(&["technology", "technology"]);
        assert_eq!(index.len(), 1);
        assert_eq!(targets, vec![0, 0]);
    }

    #[test]
    fn test_unknown_label() {
        let (index, _) = LabelIndex::fit(&["sports"]);
        assert_eq!(index.id("finance"), None);
        assert_eq!(index.label(5), None);
    }

    #[test]
    fn test_serde_as_list() {
        let (index, _) = LabelIndex::fit(&["technology", "finance"]);
        let json = serde_json::to_string(&index).unwrap();
        assert_eq!(json, r#"["finance","technology"]"#);

        let restored: LabelIndex = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, index);
    }

    #[test]
    fn test_duplicates_rejected() {
        let result = LabelIndex::from_labels(vec!["a".into(), "a".into()]);
        assert!(matches!(result, Err(AdlensError::InvalidInput(_))));
        assert!(serde_json::from_str::<LabelIndex>(r#"["a","a"]"#).is_err());
    }
}
