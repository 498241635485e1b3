//! Abstract Heap Location
//!
//! Represents allocation sites in the program.
//! Each `new C` statement of an analyzed method maps to exactly one location.

use crate::shared::models::MethodId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique identifier for abstract locations
pub type LocationId = u32;

/// Abstract representation of a heap allocation site
///
/// # Example
/// ```text
/// // Benchmark.alloc(1);
/// // B b = new B();      -> location 0, label 1
/// // A a = new A();      -> location 1, unlabeled
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AbstractLocation {
    /// Dense id, assigned in program order of allocation statements
    pub id: LocationId,

    /// Method containing the allocation
    pub method: MethodId,

    /// Statement index of the `new` within its method
    pub stmt: usize,

    /// Allocated class
    pub type_info: String,

    /// External id given by a preceding allocation hook
    pub label: Option<i64>,
}

impl AbstractLocation {
    #[inline]
    pub fn new(id: LocationId, method: MethodId, stmt: usize, type_info: impl Into<String>) -> Self {
        Self {
            id,
            method,
            stmt,
            type_info: type_info.into(),
            label: None,
        }
    }

    #[inline]
    pub fn with_label(mut self, label: i64) -> Self {
        self.label = Some(label);
        self
    }

    /// Whether this site takes part in reported results
    #[inline]
    pub fn is_reported(&self) -> bool {
        self.label.is_some()
    }
}

impl fmt::Display for AbstractLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "new {}@m{}:{}", self.type_info, self.method, self.stmt)?;
        if let Some(label) = self.label {
            write!(f, "#{}", label)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_location_creation() {
        let loc = AbstractLocation::new(0, 2, 5, "B");
        assert_eq!(loc.id, 0);
        assert_eq!(loc.method, 2);
        assert!(!loc.is_reported());
        assert_eq!(loc.to_string(), "new B@m2:5");
    }

    #[test]
    fn test_location_with_label() {
        let loc = AbstractLocation::new(3, 0, 1, "A").with_label(7);
        assert_eq!(loc.label, Some(7));
        assert!(loc.is_reported());
        assert_eq!(loc.to_string(), "new A@m0:1#7");
    }
}
