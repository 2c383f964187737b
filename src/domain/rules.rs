//! Label rules that decide what counts as a coordination.

use serde::{Deserialize, Serialize};

/// Labels and thresholds matched by the locator, checker and mutator.
///
/// The defaults describe Penn Treebank noun-phrase coordination:
/// an `NP` with at least three children, two of them `NP`, joined by `,` or `CC`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct CoordinationRules {
    /// Label of the coordinated phrases and of the enclosing span
    pub phrase_label: String,
    /// Labels that join the coordinated phrases
    pub separator_labels: Vec<String>,
    /// Minimum number of direct children of a span
    pub min_children: usize,
    /// Minimum number of direct children labeled `phrase_label`
    pub min_phrases: usize,
    /// Minimum number of direct children labeled with one of `separator_labels`
    pub min_separators: usize,
}

impl Default for CoordinationRules {
    fn default() -> Self {
        Self {
            phrase_label: "NP".into(),
            separator_labels: vec![",".into(), "CC".into()],
            min_children: 3,
            min_phrases: 2,
            min_separators: 1,
        }
    }
}

impl CoordinationRules {
    pub fn is_phrase(&self, label: &str) -> bool {
        label == self.phrase_label
    }

    pub fn is_separator(&self, label: &str) -> bool {
        self.separator_labels.iter().any(|s| s == label)
    }
}
