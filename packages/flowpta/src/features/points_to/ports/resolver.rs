//! Call-target resolution port

use crate::shared::models::{MethodId, MethodRef, Program};

/// Maps a call site's target to a method of the program
pub trait MethodResolver: Send + Sync {
    /// The method a call to `callee` executes, if known
    fn resolve(&self, program: &Program, callee: &MethodRef) -> Option<MethodId>;
}

/// Resolves by declaring class, walking declared superclasses on a miss
///
/// An empty descriptor on either side matches any overload. No dispatch on
/// receiver types is attempted.
#[derive(Debug, Clone, Copy, Default)]
pub struct HierarchyResolver;

impl HierarchyResolver {
    pub fn new() -> Self {
        Self
    }

    fn lookup(program: &Program, class: &str, callee: &MethodRef) -> Option<MethodId> {
        program
            .methods
            .iter()
            .position(|m| {
                m.class == class
                    && m.name == callee.name
                    && (callee.descriptor.is_empty()
                        || m.descriptor.is_empty()
                        || m.descriptor == callee.descriptor)
            })
            .map(|i| i as MethodId)
    }
}

impl MethodResolver for HierarchyResolver {
    fn resolve(&self, program: &Program, callee: &MethodRef) -> Option<MethodId> {
        let mut class = callee.class.as_str();
        // bounded walk: a malformed hierarchy may contain cycles
        for _ in 0..=program.classes.len() {
            if let Some(id) = Self::lookup(program, class, callee) {
                return Some(id);
            }
            class = program.superclass_of(class)?;
        }
        None
    }
}
