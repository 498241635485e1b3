//! Block Builder
//!
//! Splits one method body into basic blocks and lowers every
//! pointer-relevant statement to a [`CopyEdge`].
//!
//! # Segmentation
//! A new block starts at statement 0, at every jump target, and right after
//! a jump, a return, a non-intrinsic call or a test hook. Allocation hooks do
//! not split blocks.
//!
//! # Lowering
//! ```text
//! a = b        ->  ptr(a) := ptr(b)
//! a = new C    ->  ptr(a) := new@stmt
//! a = b.f      ->  ptr(a) := b.f        (C.f for static loads)
//! a.f = b      ->  a.f    := ptr(b)
//! return v     ->  recv   := ptr(v)     (only with a receiver)
//! ```
//! Constant sources produce no edge. Calls are left to the inliner; the
//! block that ends with one remembers its statement index.

use crate::features::points_to::domain::{CopyEdge, PointerId, TestMark};
use crate::features::points_to::infrastructure::pointer_table::PointerTable;
use crate::features::points_to::ports::{Intrinsic, IntrinsicRecognizer};
use crate::shared::models::{FieldRef, MethodId, Operand, Program, Stmt, Var};
use std::collections::BTreeSet;

/// One block of a single method, before splicing into the global CFG
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalBlock {
    /// First statement index (inclusive)
    pub from: usize,
    /// Last statement index (inclusive)
    pub to: usize,
    pub edges: Vec<CopyEdge>,
    /// Successors as indices into [`MethodBlocks::blocks`]
    pub succs: Vec<usize>,
    /// Statement index of the trailing non-intrinsic call, if any
    pub call: Option<usize>,
    pub test_mark: Option<TestMark>,
}

impl LocalBlock {
    /// No intraprocedural successor: control leaves the method here
    #[inline]
    pub fn is_exit(&self) -> bool {
        self.succs.is_empty()
    }
}

/// Blocks of one method, in statement order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MethodBlocks {
    pub blocks: Vec<LocalBlock>,
}

impl MethodBlocks {
    pub fn exits(&self) -> impl Iterator<Item = usize> + '_ {
        self.blocks
            .iter()
            .enumerate()
            .filter(|(_, b)| b.is_exit())
            .map(|(i, _)| i)
    }
}

pub struct BlockBuilder<'a> {
    program: &'a Program,
    intrinsics: &'a dyn IntrinsicRecognizer,
}

impl<'a> BlockBuilder<'a> {
    pub fn new(program: &'a Program, intrinsics: &'a dyn IntrinsicRecognizer) -> Self {
        Self { program, intrinsics }
    }

    /// Build the blocks of `method`
    ///
    /// `receiver` is the caller-side pointer that `return v` writes into;
    /// it differs per inlined instance, so blocks are built per instance.
    pub fn build(&self, method: MethodId, receiver: Option<PointerId>, pointers: &mut PointerTable) -> MethodBlocks {
        let stmts = &self.program.method(method).stmts;
        if stmts.is_empty() {
            return MethodBlocks::default();
        }

        let starts = self.block_starts(stmts);
        let starts: Vec<usize> = starts.into_iter().collect();
        let block_of = |stmt: usize| starts.binary_search(&stmt).ok();

        let mut blocks = Vec::with_capacity(starts.len());
        for (i, &from) in starts.iter().enumerate() {
            let to = starts.get(i + 1).map_or(stmts.len() - 1, |next| next - 1);
            let mut block = LocalBlock {
                from,
                to,
                edges: Vec::new(),
                succs: Vec::new(),
                call: None,
                test_mark: None,
            };
            for idx in from..=to {
                self.lower(method, idx, &stmts[idx], receiver, pointers, &mut block);
            }

            let next = (i + 1 < starts.len()).then_some(i + 1);
            let last = &stmts[to];
            match last {
                Stmt::If { targets } => {
                    block.succs.extend(targets.iter().filter_map(|t| block_of(*t)));
                    block.succs.extend(next);
                }
                Stmt::Goto { targets } => {
                    block.succs.extend(targets.iter().filter_map(|t| block_of(*t)));
                }
                Stmt::Return { .. } => {}
                _ => block.succs.extend(next),
            }
            block.succs.sort_unstable();
            block.succs.dedup();
            blocks.push(block);
        }

        MethodBlocks { blocks }
    }

    /// Statement indices that begin a block
    pub fn block_starts(&self, stmts: &[Stmt]) -> BTreeSet<usize> {
        let n = stmts.len();
        let mut starts = BTreeSet::new();
        if n == 0 {
            return starts;
        }
        starts.insert(0);

        for (idx, stmt) in stmts.iter().enumerate() {
            let ends_block = match stmt {
                _ if stmt.is_jump() || stmt.is_return() => true,
                Stmt::Invoke(invoke) => !matches!(
                    self.intrinsics.classify(invoke),
                    Some(Intrinsic::Alloc { .. })
                ),
                _ => false,
            };
            if ends_block && idx + 1 < n {
                starts.insert(idx + 1);
            }
            // out-of-range targets are ignored
            starts.extend(stmt.jump_targets().iter().copied().filter(|t| *t < n));
        }
        starts
    }

    fn lower(
        &self,
        method: MethodId,
        idx: usize,
        stmt: &Stmt,
        receiver: Option<PointerId>,
        pointers: &mut PointerTable,
        block: &mut LocalBlock,
    ) {
        let var = |local| Var::new(method, local);
        match stmt {
            Stmt::Copy {
                lhs,
                rhs: Operand::Var(rhs),
            } => {
                let target = pointers.intern_variable(var(*lhs));
                let source = pointers.intern_variable(var(*rhs));
                block.edges.push(CopyEdge::new(target, source));
            }
            Stmt::New { lhs, .. } => {
                let target = pointers.intern_variable(var(*lhs));
                let source = pointers.intern_allocation(method, idx);
                block.edges.push(CopyEdge::new(target, source));
            }
            Stmt::LoadField { lhs, base, field } => {
                let source = field_pointer(pointers, base.map(var), field);
                let target = pointers.intern_variable(var(*lhs));
                block.edges.push(CopyEdge::new(target, source));
            }
            Stmt::StoreField {
                base,
                field,
                rhs: Operand::Var(rhs),
            } => {
                let target = field_pointer(pointers, base.map(var), field);
                let source = pointers.intern_variable(var(*rhs));
                block.edges.push(CopyEdge::new(target, source));
            }
            Stmt::Return {
                value: Some(Operand::Var(value)),
            } => {
                if let Some(receiver) = receiver {
                    let source = pointers.intern_variable(var(*value));
                    block.edges.push(CopyEdge::new(receiver, source));
                }
            }
            Stmt::Invoke(invoke) => match self.intrinsics.classify(invoke) {
                Some(Intrinsic::Test {
                    test_id: Some(test_id),
                    traced: Some(traced),
                }) => {
                    block.test_mark = Some(TestMark {
                        test_id,
                        traced: pointers.intern_variable(var(traced)),
                    });
                }
                Some(Intrinsic::Test { .. }) => {
                    tracing::warn!(
                        "malformed test hook at {}:{}",
                        self.program.method(method).qualified_name(),
                        idx
                    );
                }
                Some(Intrinsic::Alloc { .. }) => {}
                None => block.call = Some(idx),
            },
            // constant sources, branches and the rest carry no copy
            _ => {}
        }
    }
}

fn field_pointer(pointers: &mut PointerTable, base: Option<Var>, field: &FieldRef) -> PointerId {
    match base {
        Some(base) => pointers.intern_instance_field(base, field),
        None => pointers.intern_static_field(field),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::points_to::domain::PointerSite;
    use crate::features::points_to::ports::BenchmarkIntrinsics;
    use crate::shared::models::{MethodBuilder, MethodRef, ProgramBuilder};

    fn build_single(method: MethodBuilder) -> (Program, MethodBlocks, PointerTable) {
        let mut p = ProgramBuilder::new();
        p.method(method.build());
        let program = p.build();
        let intrinsics = BenchmarkIntrinsics::default();
        let mut pointers = PointerTable::new();
        let blocks = BlockBuilder::new(&program, &intrinsics).build(0, None, &mut pointers);
        (program, blocks, pointers)
    }

    #[test]
    fn test_straight_line_is_one_block() {
        let mut m = MethodBuilder::new("Main", "main").static_method();
        let (a, b) = (m.var("a"), m.var("b"));
        m.new_obj(a, "A");
        m.copy(b, a);
        m.other("nop");
        let (_, blocks, _) = build_single(m);

        assert_eq!(blocks.blocks.len(), 1);
        let block = &blocks.blocks[0];
        assert_eq!((block.from, block.to), (0, 2));
        assert_eq!(block.edges.len(), 2);
        assert!(block.is_exit());
    }

    #[test]
    fn test_branches_split_blocks() {
        // 0: if -> 3 ; 1: a = b ; 2: goto 4 ; 3: a = c ; 4: return
        let mut m = MethodBuilder::new("Main", "main").static_method();
        let (a, b, c) = (m.var("a"), m.var("b"), m.var("c"));
        m.if_goto(&[3]);
        m.copy(a, b);
        m.goto(&[4]);
        m.copy(a, c);
        m.ret_void();
        let (_, blocks, _) = build_single(m);

        let spans: Vec<_> = blocks.blocks.iter().map(|b| (b.from, b.to)).collect();
        assert_eq!(spans, vec![(0, 0), (1, 2), (3, 3), (4, 4)]);
        assert_eq!(blocks.blocks[0].succs, vec![1, 2]);
        assert_eq!(blocks.blocks[1].succs, vec![3]);
        assert_eq!(blocks.blocks[2].succs, vec![3]);
        assert_eq!(blocks.exits().collect::<Vec<_>>(), vec![3]);
    }

    #[test]
    fn test_return_has_no_successor() {
        let mut m = MethodBuilder::new("A", "pick").static_method();
        let (x, y) = (m.param("x"), m.param("y"));
        m.if_goto(&[3]);
        m.ret(x);
        m.other("unreachable");
        m.ret(y);
        let (_, blocks, _) = build_single(m);

        let exits: Vec<_> = blocks.exits().collect();
        assert_eq!(exits.len(), 2);
        assert!(blocks.blocks[1].succs.is_empty());
    }

    #[test]
    fn test_calls_and_hooks() {
        let mut m = MethodBuilder::new("Main", "main").static_method();
        let (a, b) = (m.var("a"), m.var("b"));
        m.alloc(1);
        m.new_obj(a, "A");
        m.invoke(None, a, MethodRef::new("A", "<init>"), &[]);
        m.copy(b, a);
        m.test(1, b);
        m.other("after");
        let (_, blocks, pointers) = build_single(m);

        let spans: Vec<_> = blocks.blocks.iter().map(|b| (b.from, b.to)).collect();
        assert_eq!(spans, vec![(0, 2), (3, 4), (5, 5)]);
        assert_eq!(blocks.blocks[0].call, Some(2));
        assert_eq!(blocks.blocks[0].succs, vec![1]);

        let mark = blocks.blocks[1].test_mark.unwrap();
        assert_eq!(mark.test_id, 1);
        assert_eq!(pointers.resolve(mark.traced), &PointerSite::Variable(Var::new(0, b)));
    }

    #[test]
    fn test_field_and_constant_lowering() {
        let f = FieldRef::new("A", "f");
        let s = FieldRef::new("A", "s");
        let mut m = MethodBuilder::new("Main", "main").static_method();
        let (a, b) = (m.var("a"), m.var("b"));
        m.store(a, f.clone(), b);
        m.load(b, a, f.clone());
        m.store_static(s.clone(), b);
        m.load_static(a, s.clone());
        m.copy_null(a);
        let (_, blocks, pointers) = build_single(m);

        let edges = &blocks.blocks[0].edges;
        assert_eq!(edges.len(), 4);
        assert!(matches!(
            pointers.resolve(edges[0].target),
            PointerSite::InstanceField { .. }
        ));
        assert_eq!(edges[1].source, edges[0].target);
        assert!(matches!(
            pointers.resolve(edges[2].target),
            PointerSite::StaticField(_)
        ));
        assert_eq!(edges[3].source, edges[2].target);
        assert_eq!(pointers.observed_fields(Var::new(0, a)).count(), 1);
    }

    #[test]
    fn test_new_copies_from_its_allocation() {
        let mut m = MethodBuilder::new("Main", "main").static_method();
        let (a, b) = (m.var("a"), m.var("b"));
        m.new_obj(b, "A");
        m.copy(a, b);
        m.new_obj(b, "A");
        let (_, blocks, pointers) = build_single(m);

        let edges = &blocks.blocks[0].edges;
        let sources: Vec<_> = edges.iter().map(|e| pointers.resolve(e.source).clone()).collect();
        assert_eq!(
            sources,
            vec![
                PointerSite::Allocation { method: 0, stmt: 0 },
                PointerSite::Variable(Var::new(0, b)),
                PointerSite::Allocation { method: 0, stmt: 2 },
            ]
        );
        assert_eq!(edges[0].target, edges[2].target);
    }

    #[test]
    fn test_return_writes_receiver() {
        let mut m = MethodBuilder::new("A", "id").static_method();
        let x = m.param("x");
        m.ret(x);
        let mut p = ProgramBuilder::new();
        p.method(m.build());
        let program = p.build();
        let intrinsics = BenchmarkIntrinsics::default();
        let mut pointers = PointerTable::new();
        let receiver = pointers.intern_variable(Var::new(9, 0));

        let builder = BlockBuilder::new(&program, &intrinsics);
        let with = builder.build(0, Some(receiver), &mut pointers);
        assert_eq!(with.blocks[0].edges.len(), 1);
        assert_eq!(with.blocks[0].edges[0].target, receiver);

        let without = builder.build(0, None, &mut pointers);
        assert!(without.blocks[0].edges.is_empty());
    }

    #[test]
    fn test_out_of_range_targets_ignored() {
        let mut m = MethodBuilder::new("Main", "main").static_method();
        m.goto(&[42]);
        m.other("x");
        let (_, blocks, _) = build_single(m);
        assert_eq!(blocks.blocks.len(), 2);
        assert!(blocks.blocks[0].succs.is_empty());
    }

    #[test]
    fn test_empty_body() {
        let (_, blocks, _) = build_single(MethodBuilder::new("A", "f").abstract_method());
        assert!(blocks.blocks.is_empty());
    }
}
