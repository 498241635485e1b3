//! Field co-propagation
//!
//! Instance-field pointers are keyed by their base *variable*, so a plain
//! `a := b` would not carry what `b.f` holds over to `a.f`. This pass adds,
//! right after every variable-to-variable copy `a := b`, the implied edges
//! `a.f := b.f` for each field `f` of interest.
//!
//! Variables linked by copies (in either direction) form one component, and
//! the fields of interest are those accessed through any of its members.
//! The closure is needed when an object passes through an intermediate that
//! never touches the field itself:
//!
//! ```text
//! this.f = b      // in a constructor
//! t = new A; t.<init>(b); a = t; c = a.f
//! ```

use super::pointer_table::PointerTable;
use super::union_find::UnionFind;
use crate::features::points_to::domain::{CopyEdge, EdgeOrigin, GlobalCfgBuilder};
use crate::shared::models::{FieldRef, Var};
use rustc_hash::FxHashMap;
use std::collections::BTreeSet;

/// Insert implied field edges into every block; returns how many were added
pub fn apply(cfg: &mut GlobalCfgBuilder, pointers: &mut PointerTable) -> usize {
    let mut index: FxHashMap<Var, u32> = FxHashMap::default();
    let mut vars: Vec<Var> = Vec::new();
    let mut uf = UnionFind::default();

    let mut dense = |var: Var, vars: &mut Vec<Var>| -> u32 {
        *index.entry(var).or_insert_with(|| {
            vars.push(var);
            (vars.len() - 1) as u32
        })
    };

    for block in cfg.blocks() {
        for edge in &block.edges {
            if let Some((t, s)) = variable_pair(pointers, edge) {
                let (t, s) = (dense(t, &mut vars), dense(s, &mut vars));
                uf.union(t, s);
            }
        }
    }

    // fields of interest per component root
    let mut fields: FxHashMap<u32, BTreeSet<FieldRef>> = FxHashMap::default();
    for (i, var) in vars.iter().enumerate() {
        let observed: Vec<&FieldRef> = pointers.observed_fields(*var).collect();
        if observed.is_empty() {
            continue;
        }
        let root = uf.find(i as u32);
        fields
            .entry(root)
            .or_default()
            .extend(observed.into_iter().cloned());
    }
    if fields.is_empty() {
        return 0;
    }

    let mut added = 0;
    for block in cfg.blocks_mut() {
        let mut edges = Vec::with_capacity(block.edges.len());
        for edge in block.edges.drain(..) {
            edges.push(edge);
            let Some((t, s)) = variable_pair(pointers, &edge) else {
                continue;
            };
            let root = uf.find(index[&t]);
            let Some(component_fields) = fields.get(&root) else {
                continue;
            };
            for field in component_fields {
                let target = pointers.intern_instance_field(t, field);
                let source = pointers.intern_instance_field(s, field);
                edges.push(CopyEdge::field_copy(target, source));
                added += 1;
            }
        }
        block.edges = edges;
    }

    tracing::debug!(
        "field co-propagation: {} components, {} implied edges",
        fields.len(),
        added
    );
    added
}

/// Both ends of a statement/call copy between two variables
fn variable_pair(pointers: &PointerTable, edge: &CopyEdge) -> Option<(Var, Var)> {
    if edge.origin == EdgeOrigin::FieldCopy {
        return None;
    }
    let target = pointers.resolve(edge.target).as_variable()?;
    let source = pointers.resolve(edge.source).as_variable()?;
    Some((target, source))
}
