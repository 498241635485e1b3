//! Flow-Sensitive Analysis State
//!
//! Domain model for the per-block dataflow value:
//! - LocationSet: allocation sites a pointer may reference
//! - FlowState: pointer → LocationSet at one block boundary
//!
//! States are kept canonical: a pointer with no sites has no entry, so two
//! states are equal exactly when they describe the same facts.

use rustc_hash::{FxHashMap, FxHashSet};

use super::abstract_location::LocationId;
use super::pointer::PointerId;

/// Set of abstract locations that a pointer may point to
pub type LocationSet = FxHashSet<LocationId>;

/// Points-to state at a block boundary
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FlowState {
    /// Pointer → LocationSet mapping (no empty sets)
    points_to: FxHashMap<PointerId, LocationSet>,
}

impl FlowState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get points-to set for a pointer (None if it points nowhere)
    #[inline]
    pub fn get_points_to(&self, ptr: PointerId) -> Option<&LocationSet> {
        self.points_to.get(&ptr)
    }

    /// Owned copy of a pointer's set (empty if absent)
    pub fn points_to_of(&self, ptr: PointerId) -> LocationSet {
        self.points_to.get(&ptr).cloned().unwrap_or_default()
    }

    /// Replace a pointer's set (strong update)
    pub fn set_points_to(&mut self, ptr: PointerId, locs: LocationSet) {
        if locs.is_empty() {
            self.points_to.remove(&ptr);
        } else {
            self.points_to.insert(ptr, locs);
        }
    }

    /// Add one location to a pointer's set (weak update)
    pub fn add_points_to(&mut self, ptr: PointerId, loc: LocationId) {
        self.points_to.entry(ptr).or_default().insert(loc);
    }

    /// `target := source` within this state
    pub fn copy(&mut self, target: PointerId, source: PointerId) {
        let locs = self.points_to_of(source);
        self.set_points_to(target, locs);
    }

    /// Check if two pointers may alias
    pub fn may_alias(&self, a: PointerId, b: PointerId) -> bool {
        match (self.points_to.get(&a), self.points_to.get(&b)) {
            (Some(x), Some(y)) => !x.is_disjoint(y),
            _ => false,
        }
    }

    /// Merge another state into this one (union at join points)
    pub fn merge(&mut self, other: &FlowState) -> bool {
        let mut changed = false;
        for (ptr, other_locs) in &other.points_to {
            let entry = self.points_to.entry(*ptr).or_default();
            let old_len = entry.len();
            entry.extend(other_locs.iter().copied());
            if entry.len() > old_len {
                changed = true;
            }
        }
        changed
    }

    /// Every (pointer, set) entry, unordered
    pub fn iter(&self) -> impl Iterator<Item = (PointerId, &LocationSet)> + '_ {
        self.points_to.iter().map(|(p, locs)| (*p, locs))
    }

    /// Total number of points-to facts
    pub fn fact_count(&self) -> usize {
        self.points_to.values().map(|s| s.len()).sum()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points_to.is_empty()
    }
}
