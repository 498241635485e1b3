//! Allocation Site Registry
//!
//! Assigns an [`AbstractLocation`] to every `new` of the analyzed methods and
//! derives two fact sets:
//! - generators: `new@stmt ∋ site`, the allocation pointer of each `new`
//! - seed: the generators plus `ptr(lhs) ∋ site` for every allocated variable
//!
//! An allocation hook labels the next `new` of the same method; a `new`
//! without a pending label gets a site that is tracked but never reported.

use crate::features::points_to::domain::{AbstractLocation, FlowState, LocationId, LocationSet};
use crate::features::points_to::infrastructure::pointer_table::PointerTable;
use crate::features::points_to::ports::{Intrinsic, IntrinsicRecognizer};
use crate::shared::models::{MethodId, Program, Stmt, Var};
use std::collections::BTreeSet;

#[derive(Debug, Clone, Default)]
pub struct AllocationRegistry {
    sites: Vec<AbstractLocation>,
    generators: FlowState,
    seed: FlowState,
}

impl AllocationRegistry {
    /// Scan `methods` in ascending id order, statements in order
    pub fn build(
        program: &Program,
        methods: impl IntoIterator<Item = MethodId>,
        intrinsics: &dyn IntrinsicRecognizer,
        pointers: &mut PointerTable,
    ) -> Self {
        let mut methods: Vec<MethodId> = methods.into_iter().collect();
        methods.sort_unstable();
        methods.dedup();

        let mut registry = Self::default();
        for method in methods {
            let mut pending_label = None;
            for (idx, stmt) in program.method(method).stmts.iter().enumerate() {
                match stmt {
                    Stmt::Invoke(invoke) => {
                        if let Some(Intrinsic::Alloc { label }) = intrinsics.classify(invoke) {
                            if label.is_none() {
                                tracing::warn!(
                                    "allocation hook without constant label at {}:{}",
                                    program.method(method).qualified_name(),
                                    idx
                                );
                            }
                            pending_label = label;
                        }
                    }
                    Stmt::New { lhs, class } => {
                        let id = registry.sites.len() as LocationId;
                        let mut site = AbstractLocation::new(id, method, idx, class.clone());
                        if let Some(label) = pending_label.take() {
                            site = site.with_label(label);
                        }
                        let alloc = pointers.intern_allocation(method, idx);
                        let target = pointers.intern_variable(Var::new(method, *lhs));
                        registry.sites.push(site);
                        registry.generators.add_points_to(alloc, id);
                        registry.seed.add_points_to(alloc, id);
                        registry.seed.add_points_to(target, id);
                    }
                    _ => {}
                }
            }
        }

        tracing::debug!(
            "registered {} allocation sites ({} labeled)",
            registry.sites.len(),
            registry.sites.iter().filter(|s| s.is_reported()).count()
        );
        registry
    }

    #[inline]
    pub fn site(&self, id: LocationId) -> &AbstractLocation {
        &self.sites[id as usize]
    }

    pub fn sites(&self) -> &[AbstractLocation] {
        &self.sites
    }

    /// Allocation facts: every allocation pointer and allocated variable → its sites
    pub fn seed(&self) -> &FlowState {
        &self.seed
    }

    /// Allocation pointers only; variables get their sites from the `new` copies
    pub fn generators(&self) -> &FlowState {
        &self.generators
    }

    /// Every label that can be reported
    pub fn universe(&self) -> BTreeSet<i64> {
        self.sites.iter().filter_map(|s| s.label).collect()
    }

    /// Labels of the reported sites in `locs`
    pub fn labels_of<'s>(&self, locs: impl IntoIterator<Item = &'s LocationId>) -> BTreeSet<i64> {
        locs.into_iter().filter_map(|id| self.site(*id).label).collect()
    }

    /// Labels of a points-to set
    pub fn labels(&self, locs: &LocationSet) -> BTreeSet<i64> {
        self.labels_of(locs.iter())
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.sites.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.sites.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::points_to::domain::PointerSite;
    use crate::features::points_to::ports::BenchmarkIntrinsics;
    use crate::shared::models::{MethodBuilder, ProgramBuilder};

    fn registry_for(program: &Program) -> (AllocationRegistry, PointerTable) {
        let mut pointers = PointerTable::new();
        let registry = AllocationRegistry::build(
            program,
            program.method_ids(),
            &BenchmarkIntrinsics::default(),
            &mut pointers,
        );
        (registry, pointers)
    }

    #[test]
    fn test_labels_attach_to_next_new() {
        let mut m = MethodBuilder::new("Main", "main").static_method();
        let (a, b, c) = (m.var("a"), m.var("b"), m.var("c"));
        m.alloc(1);
        m.other("x");
        m.new_obj(a, "A");
        m.new_obj(b, "B");
        m.alloc(7);
        m.new_obj(c, "C");
        let mut p = ProgramBuilder::new();
        p.method(m.build());
        let program = p.build();

        let (registry, pointers) = registry_for(&program);
        assert_eq!(registry.len(), 3);
        assert_eq!(registry.site(0).label, Some(1));
        assert_eq!(registry.site(1).label, None);
        assert_eq!(registry.site(2).label, Some(7));
        assert_eq!(registry.site(1).stmt, 3);
        assert_eq!(registry.universe(), [1, 7].into_iter().collect());

        let pa = pointers.lookup_variable(Var::new(0, a)).unwrap();
        assert_eq!(registry.seed().points_to_of(pa), [0].into_iter().collect());
    }

    #[test]
    fn test_label_does_not_cross_methods() {
        let mut m0 = MethodBuilder::new("Main", "main").static_method();
        m0.alloc(5);
        let mut m1 = MethodBuilder::new("A", "make").static_method();
        let x = m1.var("x");
        m1.new_obj(x, "A");
        let mut p = ProgramBuilder::new();
        p.method(m0.build());
        p.method(m1.build());
        let program = p.build();

        let (registry, _) = registry_for(&program);
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.site(0).label, None);
        assert!(registry.universe().is_empty());
    }

    #[test]
    fn test_reassigned_variable_unions_sites() {
        let mut m = MethodBuilder::new("Main", "main").static_method();
        let a = m.var("a");
        m.alloc(1);
        m.new_obj(a, "A");
        m.alloc(2);
        m.new_obj(a, "A");
        let mut p = ProgramBuilder::new();
        p.method(m.build());
        let program = p.build();

        let (registry, pointers) = registry_for(&program);
        let pa = pointers.lookup_variable(Var::new(0, a)).unwrap();
        let labels = registry.labels(&registry.seed().points_to_of(pa));
        assert_eq!(labels, [1, 2].into_iter().collect());
    }

    #[test]
    fn test_generators_hold_only_allocation_pointers() {
        let mut m = MethodBuilder::new("Main", "main").static_method();
        let (a, b) = (m.var("a"), m.var("b"));
        m.new_obj(a, "A");
        m.new_obj(a, "A");
        m.new_obj(b, "B");
        let mut p = ProgramBuilder::new();
        p.method(m.build());
        let program = p.build();
        let (registry, pointers) = registry_for(&program);

        let generators = registry.generators();
        assert_eq!(generators.iter().count(), 3);
        for stmt in 0..3 {
            let alloc = pointers
                .lookup(&PointerSite::Allocation { method: 0, stmt })
                .unwrap();
            assert_eq!(generators.points_to_of(alloc), [stmt as u32].into_iter().collect());
            assert_eq!(registry.seed().points_to_of(alloc), [stmt as u32].into_iter().collect());
        }
        let pa = pointers.lookup_variable(Var::new(0, a)).unwrap();
        assert!(generators.get_points_to(pa).is_none());
        assert_eq!(registry.seed().points_to_of(pa), [0, 1].into_iter().collect());
    }

    #[test]
    fn test_methods_scanned_in_id_order() {
        let mut p = ProgramBuilder::new();
        for class in ["A", "B"] {
            let mut m = MethodBuilder::new(class, "f").static_method();
            let v = m.var("v");
            m.new_obj(v, class);
            p.method(m.build());
        }
        let program = p.build();
        let mut pointers = PointerTable::new();
        let registry = AllocationRegistry::build(
            &program,
            [1, 0, 1],
            &BenchmarkIntrinsics::default(),
            &mut pointers,
        );
        assert_eq!(registry.len(), 2);
        assert_eq!(registry.site(0).method, 0);
        assert_eq!(registry.site(1).type_info, "B");
    }
}
