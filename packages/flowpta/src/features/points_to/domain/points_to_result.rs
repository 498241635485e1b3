//! Final analysis output: test id → reported allocation-site ids

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// Result handed to the sink (ordered for stable output)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PointsToResult {
    entries: BTreeMap<i64, BTreeSet<i64>>,
}

impl PointsToResult {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, test_id: i64, sites: BTreeSet<i64>) {
        self.entries.insert(test_id, sites);
    }

    pub fn get(&self, test_id: i64) -> Option<&BTreeSet<i64>> {
        self.entries.get(&test_id)
    }

    /// Sites of one test as a sorted vector (empty if unknown)
    pub fn sites(&self, test_id: i64) -> Vec<i64> {
        self.entries
            .get(&test_id)
            .map(|s| s.iter().copied().collect())
            .unwrap_or_default()
    }

    pub fn iter(&self) -> impl Iterator<Item = (i64, &BTreeSet<i64>)> {
        self.entries.iter().map(|(k, v)| (*k, v))
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Line format: `<test id>: <site> <site> ...`
    pub fn to_text(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for PointsToResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (test_id, sites) in &self.entries {
            write!(f, "{}:", test_id)?;
            for site in sites {
                write!(f, " {}", site)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
