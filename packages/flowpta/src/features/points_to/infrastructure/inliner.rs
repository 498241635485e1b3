//! Call-Graph Inliner
//!
//! Builds the whole-program CFG by copying each callee's blocks into the
//! graph at every call site, up to a fixed depth.
//!
//! ```text
//!   caller block ──> [call: p := a, this := base] ──> callee entry
//!                                                        ...
//!   callee exits ──> [return: a := p, base := this] ──> caller successors
//! ```
//!
//! Pending call sites live on an explicit stack, so deep call chains do not
//! grow the native stack. Variables stay context-insensitive: every instance
//! of a method shares its pointer identities, only the blocks are copied.
//!
//! A call is left as plain fallthrough when its target is unresolved or has
//! no body, or when the calling instance already sits at the depth limit.

use super::block_builder::BlockBuilder;
use super::pointer_table::PointerTable;
use crate::features::points_to::domain::{BlockId, BlockKind, CopyEdge, GlobalCfgBuilder, PointerId};
use crate::features::points_to::ports::{IntrinsicRecognizer, MethodResolver};
use crate::shared::models::{Invoke, MethodId, Operand, Program, Stmt, Var};
use std::collections::BTreeSet;

/// Counters of one inlining run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InlineStats {
    /// Method instances copied into the graph (entry included)
    pub instances: usize,
    /// Call sites replaced by call/return pseudo-blocks
    pub spliced_calls: usize,
    /// Resolvable calls not inlined because of the depth limit
    pub truncated_calls: usize,
    /// Calls whose target is unknown, abstract or bodiless
    pub unresolved_calls: usize,
    /// Deepest instance created
    pub max_depth_reached: usize,
}

/// Result of inlining from one entry method
#[derive(Debug)]
pub struct InlinedProgram {
    pub cfg: GlobalCfgBuilder,
    pub entry: BlockId,
    /// Every method with at least one instance, ascending
    pub methods: BTreeSet<MethodId>,
    /// Display names of unresolved call targets
    pub unresolved_targets: BTreeSet<String>,
    pub stats: InlineStats,
}

struct Instance {
    entry: BlockId,
    exits: Vec<BlockId>,
}

/// A call site waiting to be spliced
struct PendingCall {
    caller_block: BlockId,
    caller: MethodId,
    stmt: usize,
    callee: MethodId,
    /// Depth of the callee instance
    depth: usize,
}

pub struct CallGraphInliner<'a> {
    program: &'a Program,
    resolver: &'a dyn MethodResolver,
    blocks: BlockBuilder<'a>,
    max_depth: usize,
}

/// Mutable state threaded through one run
struct InlineRun<'p> {
    cfg: GlobalCfgBuilder,
    pointers: &'p mut PointerTable,
    pending: Vec<PendingCall>,
    methods: BTreeSet<MethodId>,
    unresolved_targets: BTreeSet<String>,
    stats: InlineStats,
}

impl<'a> CallGraphInliner<'a> {
    pub fn new(
        program: &'a Program,
        resolver: &'a dyn MethodResolver,
        intrinsics: &'a dyn IntrinsicRecognizer,
        max_depth: usize,
    ) -> Self {
        Self {
            program,
            resolver,
            blocks: BlockBuilder::new(program, intrinsics),
            max_depth,
        }
    }

    /// Inline everything reachable from `entry`
    ///
    /// Returns `None` when the entry method has no body.
    pub fn inline(&self, entry: MethodId, pointers: &mut PointerTable) -> Option<InlinedProgram> {
        let mut run = InlineRun {
            cfg: GlobalCfgBuilder::new(),
            pointers,
            pending: Vec::new(),
            methods: BTreeSet::new(),
            unresolved_targets: BTreeSet::new(),
            stats: InlineStats::default(),
        };

        let root = self.instantiate(entry, None, 0, &mut run)?;
        while let Some(call) = run.pending.pop() {
            self.splice(call, &mut run);
        }

        tracing::debug!(
            "inlined {} instances of {} methods into {} blocks ({} truncated, {} unresolved calls)",
            run.stats.instances,
            run.methods.len(),
            run.cfg.len(),
            run.stats.truncated_calls,
            run.stats.unresolved_calls
        );

        Some(InlinedProgram {
            cfg: run.cfg,
            entry: root.entry,
            methods: run.methods,
            unresolved_targets: run.unresolved_targets,
            stats: run.stats,
        })
    }

    /// Copy the blocks of one method instance into the graph and queue its calls
    fn instantiate(
        &self,
        method: MethodId,
        receiver: Option<PointerId>,
        depth: usize,
        run: &mut InlineRun<'_>,
    ) -> Option<Instance> {
        let local = self.blocks.build(method, receiver, run.pointers);
        if local.blocks.is_empty() {
            return None;
        }

        let base = run.cfg.len() as BlockId;
        for block in &local.blocks {
            run.cfg.add_block(
                BlockKind::Body {
                    method,
                    from: block.from,
                    to: block.to,
                    depth,
                },
                block.edges.clone(),
                block.test_mark,
            );
        }
        for (i, block) in local.blocks.iter().enumerate() {
            for succ in &block.succs {
                run.cfg.add_edge(base + i as BlockId, base + *succ as BlockId);
            }
        }

        run.methods.insert(method);
        run.stats.instances += 1;
        run.stats.max_depth_reached = run.stats.max_depth_reached.max(depth);

        for (i, block) in local.blocks.iter().enumerate() {
            let Some(stmt) = block.call else { continue };
            let Stmt::Invoke(invoke) = &self.program.method(method).stmts[stmt] else {
                continue;
            };
            let target = self
                .resolver
                .resolve(self.program, &invoke.callee)
                .filter(|id| self.program.method(*id).has_body());
            match target {
                Some(callee) if depth < self.max_depth => run.pending.push(PendingCall {
                    caller_block: base + i as BlockId,
                    caller: method,
                    stmt,
                    callee,
                    depth: depth + 1,
                }),
                Some(callee) => {
                    run.stats.truncated_calls += 1;
                    tracing::trace!(
                        "depth limit {} reached, not inlining {}",
                        self.max_depth,
                        self.program.method(callee).qualified_name()
                    );
                }
                None => {
                    run.stats.unresolved_calls += 1;
                    run.unresolved_targets
                        .insert(format!("{}.{}", invoke.callee.class, invoke.callee.name));
                }
            }
        }

        let exits = local
            .exits()
            .map(|i| base + i as BlockId)
            .collect();
        Some(Instance { entry: base, exits })
    }

    fn splice(&self, call: PendingCall, run: &mut InlineRun<'_>) {
        let Stmt::Invoke(invoke) = &self.program.method(call.caller).stmts[call.stmt] else {
            return;
        };
        let receiver = invoke
            .result
            .map(|r| run.pointers.intern_variable(Var::new(call.caller, r)));

        let Some(instance) = self.instantiate(call.callee, receiver, call.depth, run) else {
            return;
        };
        let (forward, backward) = self.bindings(call.caller, invoke, call.callee, receiver, run.pointers);

        let call_block = run.cfg.add_block(
            BlockKind::Call {
                callee: call.callee,
                depth: call.depth,
            },
            forward,
            None,
        );
        let return_block = run.cfg.add_block(
            BlockKind::Return {
                callee: call.callee,
                depth: call.depth,
            },
            backward,
            None,
        );

        let continuation = run.cfg.take_successors(call.caller_block);
        run.cfg.add_edge(call.caller_block, call_block);
        run.cfg.add_edge(call_block, instance.entry);
        for exit in instance.exits {
            run.cfg.add_edge(exit, return_block);
        }
        for succ in continuation {
            run.cfg.add_edge(return_block, succ);
        }
        run.stats.spliced_calls += 1;
    }

    /// Parameter binding edges into the callee and write-back edges out of it
    ///
    /// Write-backs into the call's result variable are dropped: the callee's
    /// return edge assigns it.
    fn bindings(
        &self,
        caller: MethodId,
        invoke: &Invoke,
        callee: MethodId,
        receiver: Option<PointerId>,
        pointers: &mut PointerTable,
    ) -> (Vec<CopyEdge>, Vec<CopyEdge>) {
        let callee_method = self.program.method(callee);
        let mut pairs: Vec<(PointerId, PointerId)> = Vec::new();

        for (arg, param) in invoke.args.iter().zip(&callee_method.params) {
            if let Operand::Var(arg) = arg {
                let actual = pointers.intern_variable(Var::new(caller, *arg));
                let formal = pointers.intern_variable(Var::new(callee, *param));
                pairs.push((formal, actual));
            }
        }
        if let (Some(base), Some(this)) = (invoke.base, callee_method.this_var) {
            let actual = pointers.intern_variable(Var::new(caller, base));
            let formal = pointers.intern_variable(Var::new(callee, this));
            pairs.push((formal, actual));
        }

        let forward = pairs
            .iter()
            .map(|(formal, actual)| CopyEdge::call(*formal, *actual))
            .collect();
        let backward = pairs
            .iter()
            .filter(|(_, actual)| Some(*actual) != receiver)
            .map(|(formal, actual)| CopyEdge::call(*actual, *formal))
            .collect();
        (forward, backward)
    }
}
