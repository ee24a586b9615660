//! Method traversal records.
//!
//! A traversal record lists the method index chosen at every compound task the
//! decomposition engine passed through. Engines compare a fresh record against
//! the baseline of the running plan to decide whether a new plan may replace it.

/// Ordered decomposition choices plus a parallel, diagnostic-only label trail.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TraversalRecord {
    choices: Vec<usize>,
    labels: Vec<String>,
}

impl TraversalRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a record from method indices with no labels.
    pub fn from_choices(choices: impl IntoIterator<Item = usize>) -> Self {
        Self {
            choices: choices.into_iter().collect(),
            labels: Vec::new(),
        }
    }

    /// Append a method choice.
    pub fn push(&mut self, choice: usize) {
        self.choices.push(choice);
    }

    /// Append a diagnostic label. Labels never affect planning decisions.
    pub fn push_label(&mut self, label: impl Into<String>) {
        self.labels.push(label.into());
    }

    pub fn choices(&self) -> &[usize] {
        &self.choices
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn len(&self) -> usize {
        self.choices.len()
    }

    /// A record with labels but no choices still counts as empty.
    pub fn is_empty(&self) -> bool {
        self.choices.is_empty()
    }

    /// Drop all choices and labels.
    pub fn clear(&mut self) {
        self.choices.clear();
        self.labels.clear();
    }

    /// Overwrite this record with a copy of `other`, reusing allocations.
    pub fn copy_from(&mut self, other: &TraversalRecord) {
        self.choices.clone_from(&other.choices);
        self.labels.clone_from(&other.labels);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn copy_from_replaces_choices_and_labels() {
        let mut source = TraversalRecord::from_choices([1, 0, 2]);
        source.push_label("BeTrunkThumper");
        let mut target = TraversalRecord::from_choices([4]);
        target.push_label("stale");

        target.copy_from(&source);

        assert_eq!(target, source);
    }

    #[test]
    fn labels_alone_do_not_make_a_record_non_empty() {
        let mut record = TraversalRecord::new();
        record.push_label("diagnostic");
        assert!(record.is_empty());

        record.push(0);
        assert_eq!(record.len(), 1);

        record.clear();
        assert!(record.is_empty());
        assert!(record.labels().is_empty());
    }
}
