//! Copy edges
//!
//! The only constraint form the flow-sensitive engine propagates:
//! `target := source`, scoped to one basic block. Loads, stores, parameter
//! passing and returns are all lowered to copies between pointer identities.

use super::pointer::PointerId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Where a copy edge came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EdgeOrigin {
    /// Direct translation of a statement
    Statement,
    /// Argument/receiver binding or write-back at a call
    Call,
    /// Implied instance-field edge of a variable copy
    FieldCopy,
}

/// `target` may now point to whatever `source` points to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CopyEdge {
    pub target: PointerId,
    pub source: PointerId,
    pub origin: EdgeOrigin,
}

impl CopyEdge {
    #[inline]
    pub fn new(target: PointerId, source: PointerId) -> Self {
        Self {
            target,
            source,
            origin: EdgeOrigin::Statement,
        }
    }

    #[inline]
    pub fn call(target: PointerId, source: PointerId) -> Self {
        Self {
            target,
            source,
            origin: EdgeOrigin::Call,
        }
    }

    #[inline]
    pub fn field_copy(target: PointerId, source: PointerId) -> Self {
        Self {
            target,
            source,
            origin: EdgeOrigin::FieldCopy,
        }
    }
}

impl fmt::Display for CopyEdge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "p{} := p{}", self.target, self.source)
    }
}
