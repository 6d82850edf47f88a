//! Label classification for pull requests.
//!
//! Only the three reserved labels carry meaning here; every other label is
//! ignored. Classification is total: a label set with several reserved labels
//! resolves to the most severe one instead of being rejected.

use std::collections::BTreeSet;

use crate::domain::IncrementKind;

/// The current labels of a pull request, de-duplicated and ordered
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LabelSet {
    labels: BTreeSet<String>,
}

impl LabelSet {
    pub fn new() -> Self {
        LabelSet::default()
    }

    pub fn insert(&mut self, label: impl Into<String>) -> bool {
        self.labels.insert(label.into())
    }

    pub fn remove(&mut self, label: &str) -> bool {
        self.labels.remove(label)
    }

    pub fn contains(&self, label: &str) -> bool {
        self.labels.contains(label)
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.labels.iter().map(String::as_str)
    }

    /// Derive the increment decision for this label set
    pub fn classify(&self) -> IncrementKind {
        classify(self.iter())
    }

    /// Reserved labels present in this set, most severe first
    pub fn reserved(&self) -> Vec<IncrementKind> {
        reserved_in(self.iter())
    }
}

impl<S: Into<String>> FromIterator<S> for LabelSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        LabelSet {
            labels: iter.into_iter().map(Into::into).collect(),
        }
    }
}

/// Classify a label set into an increment decision.
///
/// Returns the most severe reserved label present (`Major > Minor > Patch`),
/// or [`IncrementKind::None`] when no reserved label is present.
///
/// # Example
/// ```
/// use version_gate::domain::{classify, IncrementKind};
///
/// assert_eq!(classify(["bug", "patch-increment"]), IncrementKind::Patch);
/// assert_eq!(classify(["minor-increment", "major-increment"]), IncrementKind::Major);
/// assert_eq!(classify(Vec::<String>::new()), IncrementKind::None);
/// ```
pub fn classify<I, S>(labels: I) -> IncrementKind
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    labels
        .into_iter()
        .filter_map(|label| IncrementKind::from_label(label.as_ref()))
        .max()
        .unwrap_or(IncrementKind::None)
}

/// List the distinct reserved labels present, most severe first
pub fn reserved_in<I, S>(labels: I) -> Vec<IncrementKind>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let found: BTreeSet<IncrementKind> = labels
        .into_iter()
        .filter_map(|label| IncrementKind::from_label(label.as_ref()))
        .collect();
    found.into_iter().rev().collect()
}
