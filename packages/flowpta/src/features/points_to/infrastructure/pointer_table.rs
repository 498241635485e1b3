//! Pointer table
//!
//! Append-only interner from structural [`PointerSite`]s to dense
//! [`PointerId`]s. Ids are handed out on first use and never recycled within
//! a run. The table also remembers which fields each variable was used as a
//! base for; field co-propagation reads that back.

use crate::features::points_to::domain::pointer::{PointerId, PointerSite};
use crate::shared::models::{FieldRef, MethodId, Program, Var};
use rustc_hash::FxHashMap;
use std::collections::BTreeSet;

#[derive(Debug, Clone, Default)]
pub struct PointerTable {
    sites: Vec<PointerSite>,
    index: FxHashMap<PointerSite, PointerId>,
    /// Fields accessed through each variable
    observed_fields: FxHashMap<Var, BTreeSet<FieldRef>>,
}

impl PointerTable {
    pub fn new() -> Self {
        Self::default()
    }

    fn intern(&mut self, site: PointerSite) -> PointerId {
        if let Some(id) = self.index.get(&site) {
            return *id;
        }
        let id = self.sites.len() as PointerId;
        self.sites.push(site.clone());
        self.index.insert(site, id);
        id
    }

    pub fn intern_variable(&mut self, var: Var) -> PointerId {
        self.intern(PointerSite::Variable(var))
    }

    pub fn intern_static_field(&mut self, field: &FieldRef) -> PointerId {
        self.intern(PointerSite::StaticField(field.clone()))
    }

    /// Pointer holding the object created by statement `stmt` of `method`
    pub fn intern_allocation(&mut self, method: MethodId, stmt: usize) -> PointerId {
        self.intern(PointerSite::Allocation { method, stmt })
    }

    /// Intern `base.field` and record that `base` is used with `field`
    pub fn intern_instance_field(&mut self, base: Var, field: &FieldRef) -> PointerId {
        self.observed_fields
            .entry(base)
            .or_default()
            .insert(field.clone());
        self.intern(PointerSite::InstanceField {
            base,
            field: field.clone(),
        })
    }

    /// Id of an already interned site
    pub fn lookup(&self, site: &PointerSite) -> Option<PointerId> {
        self.index.get(site).copied()
    }

    pub fn lookup_variable(&self, var: Var) -> Option<PointerId> {
        self.lookup(&PointerSite::Variable(var))
    }

    /// Structural description of an id
    ///
    /// # Panics
    /// If `id` was not handed out by this table.
    #[inline]
    pub fn resolve(&self, id: PointerId) -> &PointerSite {
        &self.sites[id as usize]
    }

    #[inline]
    pub fn contains(&self, id: PointerId) -> bool {
        (id as usize) < self.sites.len()
    }

    /// Fields accessed through `var`, in a stable order
    pub fn observed_fields(&self, var: Var) -> impl Iterator<Item = &FieldRef> {
        self.observed_fields.get(&var).into_iter().flatten()
    }

    pub fn describe(&self, id: PointerId, program: &Program) -> String {
        match self.sites.get(id as usize) {
            Some(site) => site.describe(program),
            None => format!("<unregistered p{}>", id),
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.sites.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.sites.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (PointerId, &PointerSite)> {
        self.sites
            .iter()
            .enumerate()
            .map(|(i, s)| (i as PointerId, s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interning_is_stable() {
        let mut table = PointerTable::new();
        let a = table.intern_variable(Var::new(0, 0));
        let b = table.intern_variable(Var::new(0, 1));
        assert_ne!(a, b);
        assert_eq!(table.intern_variable(Var::new(0, 0)), a);
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn test_same_local_in_different_methods() {
        let mut table = PointerTable::new();
        let a = table.intern_variable(Var::new(0, 0));
        let b = table.intern_variable(Var::new(1, 0));
        assert_ne!(a, b);
    }

    #[test]
    fn test_field_kinds_are_distinct() {
        let mut table = PointerTable::new();
        let f = FieldRef::new("A", "f");
        let base = Var::new(0, 0);
        let v = table.intern_variable(base);
        let s = table.intern_static_field(&f);
        let i = table.intern_instance_field(base, &f);
        assert_eq!(table.len(), 3);
        assert!(matches!(table.resolve(v), PointerSite::Variable(_)));
        assert!(matches!(table.resolve(s), PointerSite::StaticField(_)));
        assert_eq!(
            table.resolve(i),
            &PointerSite::InstanceField { base, field: f.clone() }
        );
        assert_eq!(table.intern_instance_field(base, &f), i);

        let n = table.intern_allocation(0, 0);
        assert_eq!(table.intern_allocation(0, 0), n);
        assert_ne!(table.intern_allocation(1, 0), n);
        assert_eq!(table.len(), 5);
    }

    #[test]
    fn test_observed_fields() {
        let mut table = PointerTable::new();
        let base = Var::new(0, 0);
        table.intern_instance_field(base, &FieldRef::new("A", "g"));
        table.intern_instance_field(base, &FieldRef::new("A", "f"));
        table.intern_static_field(&FieldRef::new("A", "h"));

        let names: Vec<_> = table.observed_fields(base).map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["f", "g"]);
        assert_eq!(table.observed_fields(Var::new(0, 1)).count(), 0);
    }

    #[test]
    fn test_lookup_does_not_intern() {
        let mut table = PointerTable::new();
        assert_eq!(table.lookup_variable(Var::new(0, 0)), None);
        let id = table.intern_variable(Var::new(0, 0));
        assert_eq!(table.lookup_variable(Var::new(0, 0)), Some(id));
        assert!(table.contains(id));
        assert!(!table.contains(id + 1));
    }
}
