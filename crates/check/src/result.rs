//! Findings produced by checks.

use serde::{Deserialize, Serialize};

/// A single pass/fail statement produced by a check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Finding {
    pub description: String,
    pub passed: bool,
}

impl Finding {
    #[must_use]
    pub fn new(description: impl Into<String>, passed: bool) -> Self {
        Self {
            description: description.into(),
            passed,
        }
    }

    #[must_use]
    pub fn pass(description: impl Into<String>) -> Self {
        Self::new(description, true)
    }

    #[must_use]
    pub fn fail(description: impl Into<String>) -> Self {
        Self::new(description, false)
    }
}

/// Ordered findings from one check, in discovery order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResultSet(Vec<Finding>);

impl ResultSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A result set holding exactly one finding.
    #[must_use]
    pub fn single(description: impl Into<String>, passed: bool) -> Self {
        Self(vec![Finding::new(description, passed)])
    }

    pub fn push(&mut self, description: impl Into<String>, passed: bool) {
        self.0.push(Finding::new(description, passed));
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// True when every finding passed. An empty set never counts as passing.
    #[must_use]
    pub fn all_passed(&self) -> bool {
        !self.0.is_empty() && self.0.iter().all(|f| f.passed)
    }

    #[must_use]
    pub fn failed_count(&self) -> usize {
        self.0.iter().filter(|f| !f.passed).count()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Finding> {
        self.0.iter()
    }

    #[must_use]
    pub fn as_slice(&self) -> &[Finding] {
        &self.0
    }
}

impl From<Vec<Finding>> for ResultSet {
    fn from(findings: Vec<Finding>) -> Self {
        Self(findings)
    }
}

impl FromIterator<Finding> for ResultSet {
    fn from_iter<I: IntoIterator<Item = Finding>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl IntoIterator for ResultSet {
    type Item = Finding;
    type IntoIter = std::vec::IntoIter<Finding>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a ResultSet {
    type Item = &'a Finding;
    type IntoIter = std::slice::Iter<'a, Finding>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_holds_one_finding() {
        let results = ResultSet::single("kubernetes version is compatible", true);
        assert_eq!(results.len(), 1);
        assert!(results.all_passed());
        assert_eq!(results.failed_count(), 0);
    }

    #[test]
    fn test_push_preserves_order() {
        let mut results = ResultSet::new();
        results.push("pod router-1 is running", true);
        results.push("no process found for role timer", false);

        let descriptions: Vec<&str> = results.iter().map(|f| f.description.as_str()).collect();
        assert_eq!(
            descriptions,
            vec!["pod router-1 is running", "no process found for role timer"]
        );
        assert!(!results.all_passed());
        assert_eq!(results.failed_count(), 1);
    }

    #[test]
    fn test_empty_set_is_not_passing() {
        assert!(!ResultSet::new().all_passed());
    }

    #[test]
    fn test_serializes_as_plain_list() {
        let results = ResultSet::single("ok", true);
        let json = serde_json::to_value(&results).unwrap();
        assert_eq!(
            json,
            serde_json::json!([{ "description": "ok", "passed": true }])
        );
    }
}
