//! Basic blocks of the inlined control-flow graph

use super::constraint::CopyEdge;
use super::pointer::PointerId;
use crate::shared::models::{MethodId, Program};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Index of a block in the global CFG
pub type BlockId = u32;

/// What a block was built from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BlockKind {
    /// Statements `from..=to` of one inlined instance of `method`
    Body {
        method: MethodId,
        from: usize,
        to: usize,
        depth: usize,
    },
    /// Argument/receiver binding before entering `callee`
    Call { callee: MethodId, depth: usize },
    /// Write-back after leaving `callee`
    Return { callee: MethodId, depth: usize },
}

impl BlockKind {
    /// Inlining depth of the method instance this block belongs to
    pub fn depth(&self) -> usize {
        match self {
            BlockKind::Body { depth, .. }
            | BlockKind::Call { depth, .. }
            | BlockKind::Return { depth, .. } => *depth,
        }
    }

    pub fn describe(&self, program: &Program) -> String {
        match self {
            BlockKind::Body { method, from, to, .. } => format!(
                "{}[{}..={}]",
                program.method(*method).qualified_name(),
                from,
                to
            ),
            BlockKind::Call { callee, .. } => {
                format!("call {}", program.method(*callee).qualified_name())
            }
            BlockKind::Return { callee, .. } => {
                format!("return {}", program.method(*callee).qualified_name())
            }
        }
    }
}

/// Test hook attached to the block it ends
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestMark {
    pub test_id: i64,
    pub traced: PointerId,
}

/// Straight-line code: ordered copy edges plus an optional test marker
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BasicBlock {
    pub id: BlockId,
    pub kind: BlockKind,
    pub edges: Vec<CopyEdge>,
    pub test_mark: Option<TestMark>,
}

impl BasicBlock {
    pub fn new(id: BlockId, kind: BlockKind) -> Self {
        Self {
            id,
            kind,
            edges: Vec::new(),
            test_mark: None,
        }
    }

    pub fn with_edges(mut self, edges: Vec<CopyEdge>) -> Self {
        self.edges = edges;
        self
    }
}

impl fmt::Display for BasicBlock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "B{} ({} edges)", self.id, self.edges.len())
    }
}
