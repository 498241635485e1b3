//! Pointer identities
//!
//! Four kinds of pointers carry points-to facts:
//! - Variable: a method-local variable
//! - StaticField: a class field without a base object
//! - InstanceField: field `f` reached through base variable `v` (keyed by
//!   the variable, not by the objects it points to)
//! - Allocation: the object created by one `new` statement; it always
//!   points to that statement's site, and `x = new C` is lowered to a copy
//!   from it
//!
//! Pointers are interned to dense [`PointerId`]s by the pointer table.

use crate::shared::models::{FieldRef, MethodId, Program, Var};
use serde::{Deserialize, Serialize};

/// Dense pointer identifier (index into the pointer table)
pub type PointerId = u32;

/// Structural description of a pointer
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PointerSite {
    Variable(Var),
    StaticField(FieldRef),
    InstanceField { base: Var, field: FieldRef },
    Allocation { method: MethodId, stmt: usize },
}

impl PointerSite {
    #[inline]
    pub fn as_variable(&self) -> Option<Var> {
        match self {
            PointerSite::Variable(v) => Some(*v),
            _ => None,
        }
    }

    /// Human-readable form using the program's names
    pub fn describe(&self, program: &Program) -> String {
        match self {
            PointerSite::Variable(v) => program.var_name(*v),
            PointerSite::StaticField(f) => f.to_string(),
            PointerSite::InstanceField { base, field } => {
                format!("{}.{}", program.var_name(*base), field.name)
            }
            PointerSite::Allocation { method, stmt } => match program.methods.get(*method as usize) {
                Some(m) => format!("new@{}:{}", m.qualified_name(), stmt),
                None => format!("new@?{}:{}", method, stmt),
            },
        }
    }
}
