/*
 * Flow-Sensitive Points-To Solver over the inlined CFG
 */

use std::collections::VecDeque;

use super::super::domain::{BlockId, FlowState, GlobalCfg, LocationSet, PointerId};

#[derive(Debug, Clone)]
pub struct FlowSensitiveResult {
    /// Output state of every block, indexed by block id
    pub states: Vec<FlowState>,
    pub stats: SolverStats,
}

impl FlowSensitiveResult {
    #[inline]
    pub fn out_state(&self, block: BlockId) -> &FlowState {
        &self.states[block as usize]
    }

    pub fn points_to(&self, block: BlockId, ptr: PointerId) -> Option<&LocationSet> {
        self.out_state(block).get_points_to(ptr)
    }

    pub fn may_alias(&self, block: BlockId, a: PointerId, b: PointerId) -> bool {
        self.out_state(block).may_alias(a, b)
    }
}

#[derive(Debug, Clone, Default)]
pub struct SolverStats {
    /// Block transfer evaluations
    pub evaluations: usize,
    pub blocks: usize,
    pub total_facts: usize,
    /// False when the evaluation budget ran out first
    pub converged: bool,
    pub time_ms: u64,
}

#[derive(Debug)]
pub struct FlowSensitiveSolver<'a> {
    cfg: &'a GlobalCfg,
    /// Joined into every block's input; also every block's initial output
    seed: &'a FlowState,
    max_iterations: Option<usize>,
}

impl<'a> FlowSensitiveSolver<'a> {
    pub fn new(cfg: &'a GlobalCfg, seed: &'a FlowState) -> Self {
        Self {
            cfg,
            seed,
            max_iterations: None,
        }
    }

    /// Cap the number of block evaluations
    pub fn with_max_iterations(mut self, max: Option<usize>) -> Self {
        self.max_iterations = max;
        self
    }

    pub fn solve(&self) -> FlowSensitiveResult {
        let start = std::time::Instant::now();
        let n = self.cfg.len();

        let mut states = vec![self.seed.clone(); n];
        let mut worklist: VecDeque<BlockId> = (0..n as BlockId).collect();
        let mut queued = vec![true; n];

        let mut evaluations = 0;
        let mut converged = true;
        while let Some(b) = worklist.pop_front() {
            if self.max_iterations.is_some_and(|max| evaluations >= max) {
                converged = false;
                tracing::warn!(
                    "points-to solver stopped after {} block evaluations without reaching a fixed point",
                    evaluations
                );
                break;
            }
            queued[b as usize] = false;
            evaluations += 1;

            let out = self.transfer(b, &states);
            if out != states[b as usize] {
                #[cfg(feature = "trace")]
                tracing::trace!(block = b, facts = out.fact_count(), "out state changed");

                states[b as usize] = out;
                for succ in self.cfg.successors(b) {
                    if !queued[*succ as usize] {
                        queued[*succ as usize] = true;
                        worklist.push_back(*succ);
                    }
                }
            }
        }

        let stats = SolverStats {
            evaluations,
            blocks: n,
            total_facts: states.iter().map(|s| s.fact_count()).sum(),
            converged,
            time_ms: start.elapsed().as_millis() as u64,
        };
        tracing::debug!(
            "solver: {} evaluations over {} blocks, converged={}",
            stats.evaluations,
            stats.blocks,
            stats.converged
        );
        FlowSensitiveResult { states, stats }
    }

    /// Join the predecessors' outputs, then apply the block's copies in order
    ///
    /// Each copy is a strong update, so a pointer written in the block leaves
    /// it holding only what its last write assigned. Allocations are copies
    /// from their site's own pointer and are ordered with the rest.
    fn transfer(&self, b: BlockId, states: &[FlowState]) -> FlowState {
        let mut state = self.seed.clone();
        for pred in self.cfg.predecessors(b) {
            state.merge(&states[*pred as usize]);
        }
        for edge in &self.cfg.block(b).edges {
            state.copy(edge.target, edge.source);
        }
        state
    }
}
