//! Global (call-inlined) control-flow graph
//!
//! One graph for the whole program: every inlined method instance
//! contributes its own copy of its blocks, spliced together through call and
//! return pseudo-blocks. Built once through [`GlobalCfgBuilder`] and
//! immutable afterwards.

use super::basic_block::{BasicBlock, BlockId, BlockKind, TestMark};
use super::constraint::CopyEdge;
use crate::features::points_to::infrastructure::pointer_table::PointerTable;
use crate::shared::models::Program;
use petgraph::dot::{Config, Dot};
use petgraph::graph::{DiGraph, NodeIndex};
use std::fmt::Write;

/// The inlined CFG: blocks, forward/reverse adjacency, entry and exits
#[derive(Debug, Clone, Default)]
pub struct GlobalCfg {
    blocks: Vec<BasicBlock>,
    succs: Vec<Vec<BlockId>>,
    preds: Vec<Vec<BlockId>>,
    entry: BlockId,
    exits: Vec<BlockId>,
}

impl GlobalCfg {
    #[inline]
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    #[inline]
    pub fn block(&self, id: BlockId) -> &BasicBlock {
        &self.blocks[id as usize]
    }

    pub fn blocks(&self) -> &[BasicBlock] {
        &self.blocks
    }

    #[inline]
    pub fn successors(&self, id: BlockId) -> &[BlockId] {
        &self.succs[id as usize]
    }

    #[inline]
    pub fn predecessors(&self, id: BlockId) -> &[BlockId] {
        &self.preds[id as usize]
    }

    #[inline]
    pub fn entry(&self) -> BlockId {
        self.entry
    }

    pub fn exits(&self) -> &[BlockId] {
        &self.exits
    }

    /// Blocks carrying a test marker, in block order
    pub fn test_points(&self) -> impl Iterator<Item = (BlockId, TestMark)> + '_ {
        self.blocks
            .iter()
            .filter_map(|b| b.test_mark.map(|mark| (b.id, mark)))
    }

    /// Total number of CFG edges
    pub fn edge_count(&self) -> usize {
        self.succs.iter().map(|s| s.len()).sum()
    }

    /// Total number of copy edges over all blocks
    pub fn copy_edge_count(&self) -> usize {
        self.blocks.iter().map(|b| b.edges.len()).sum()
    }

    /// Text dump: one paragraph per block with kind, successors, edges and marks
    pub fn render(&self, pointers: &PointerTable, program: &Program) -> String {
        let mut out = String::new();
        for block in &self.blocks {
            let _ = write!(out, "B{}: {}", block.id, block.kind.describe(program));
            if block.id == self.entry {
                out.push_str(" [entry]");
            }
            if self.exits.contains(&block.id) {
                out.push_str(" [exit]");
            }
            let succs: Vec<String> = self.successors(block.id).iter().map(|s| format!("B{}", s)).collect();
            let _ = writeln!(out, " -> [{}]", succs.join(", "));
            for edge in &block.edges {
                let _ = writeln!(
                    out,
                    "    {} := {}",
                    pointers.describe(edge.target, program),
                    pointers.describe(edge.source, program)
                );
            }
            if let Some(mark) = block.test_mark {
                let _ = writeln!(
                    out,
                    "    test({}, {})",
                    mark.test_id,
                    pointers.describe(mark.traced, program)
                );
            }
        }
        out
    }

    /// Graphviz export
    pub fn to_dot(&self, program: &Program) -> String {
        let mut graph: DiGraph<String, &'static str> = DiGraph::new();
        let nodes: Vec<NodeIndex> = self
            .blocks
            .iter()
            .map(|b| {
                let mut label = format!("B{} {}", b.id, b.kind.describe(program));
                if let Some(mark) = b.test_mark {
                    let _ = write!(label, " test({})", mark.test_id);
                }
                graph.add_node(label)
            })
            .collect();
        for (from, succs) in self.succs.iter().enumerate() {
            for to in succs {
                graph.add_edge(nodes[from], nodes[*to as usize], "");
            }
        }
        format!("{}", Dot::with_config(&graph, &[Config::EdgeNoLabel]))
    }
}

/// Incremental construction of a [`GlobalCfg`]
#[derive(Debug, Default)]
pub struct GlobalCfgBuilder {
    blocks: Vec<BasicBlock>,
    succs: Vec<Vec<BlockId>>,
}

impl GlobalCfgBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Append a block; its id is its position
    pub fn add_block(&mut self, kind: BlockKind, edges: Vec<CopyEdge>, test_mark: Option<TestMark>) -> BlockId {
        let id = self.blocks.len() as BlockId;
        let mut block = BasicBlock::new(id, kind).with_edges(edges);
        block.test_mark = test_mark;
        self.blocks.push(block);
        self.succs.push(Vec::new());
        id
    }

    pub fn add_edge(&mut self, from: BlockId, to: BlockId) {
        let succs = &mut self.succs[from as usize];
        if !succs.contains(&to) {
            succs.push(to);
        }
    }

    /// Remove and return the successors of a block
    pub fn take_successors(&mut self, id: BlockId) -> Vec<BlockId> {
        std::mem::take(&mut self.succs[id as usize])
    }

    pub fn successors(&self, id: BlockId) -> &[BlockId] {
        &self.succs[id as usize]
    }

    pub fn blocks(&self) -> &[BasicBlock] {
        &self.blocks
    }

    pub fn blocks_mut(&mut self) -> &mut [BasicBlock] {
        &mut self.blocks
    }

    /// Freeze: sort adjacency and derive predecessors
    pub fn finish(mut self, entry: BlockId, mut exits: Vec<BlockId>) -> GlobalCfg {
        let n = self.blocks.len();
        let mut preds: Vec<Vec<BlockId>> = vec![Vec::new(); n];
        for (from, succs) in self.succs.iter_mut().enumerate() {
            succs.sort_unstable();
            succs.dedup();
            for to in succs.iter() {
                preds[*to as usize].push(from as BlockId);
            }
        }
        exits.sort_unstable();
        exits.dedup();
        GlobalCfg {
            blocks: self.blocks,
            succs: self.succs,
            preds,
            entry,
            exits,
        }
    }
}
