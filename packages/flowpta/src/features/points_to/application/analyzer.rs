//! High-Level Points-to Analyzer
//!
//! Runs the whole pipeline for one program:
//!
//! ```text
//! entry lookup → inlining → field co-propagation → allocation registry
//!              → flow-sensitive solver → result collection
//! ```
//!
//! # Usage
//! ```text
//! use flowpta::{PointerAnalysis, Program, PtaConfig};
//!
//! let program = Program::from_json_file("order.json")?;
//! let outcome = PointerAnalysis::new(&program, PtaConfig::default()).run()?;
//! println!("{}", outcome.result);
//! ```

use super::result_collector;
use crate::config::{PtaConfig, SeedPolicy};
use crate::errors::Result;
use crate::features::points_to::domain::{BlockId, GlobalCfg, GlobalCfgBuilder, PointsToResult};
use crate::features::points_to::infrastructure::{
    field_copropagation, AllocationRegistry, CallGraphInliner, FlowSensitiveResult, FlowSensitiveSolver,
    PointerTable,
};
use crate::features::points_to::ports::{
    BenchmarkIntrinsics, HierarchyResolver, IntrinsicRecognizer, MethodResolver, ResultSink,
};
use crate::shared::models::Program;
use serde::{Deserialize, Serialize};
use std::time::Instant;

/// Owned state of one analysis run
#[derive(Debug, Clone, Default)]
pub struct AnalysisContext {
    pub pointers: PointerTable,
    pub sites: AllocationRegistry,
    pub cfg: GlobalCfg,
}

impl AnalysisContext {
    /// Text dump of the inlined CFG
    pub fn render(&self, program: &Program) -> String {
        self.cfg.render(&self.pointers, program)
    }
}

/// Unified statistics
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisStats {
    /// Distinct methods with at least one inlined instance
    pub methods_inlined: usize,
    pub instances: usize,
    pub blocks: usize,
    pub cfg_edges: usize,
    pub copy_edges: usize,
    pub implied_field_edges: usize,
    pub pointers: usize,
    pub sites: usize,
    pub truncated_calls: usize,
    pub unresolved_calls: usize,
    pub evaluations: usize,
    pub converged: bool,
    /// Test ids answered with the universe
    pub fallbacks: usize,
    pub duration_ms: u64,
}

/// Everything one run produces
#[derive(Debug)]
pub struct AnalysisOutcome {
    pub result: PointsToResult,
    pub context: AnalysisContext,
    pub solution: FlowSensitiveResult,
    pub stats: AnalysisStats,
}

/// High-level points-to analysis over one program
pub struct PointerAnalysis<'a> {
    program: &'a Program,
    config: PtaConfig,
    resolver: Box<dyn MethodResolver>,
    intrinsics: Box<dyn IntrinsicRecognizer>,
}

impl<'a> PointerAnalysis<'a> {
    pub fn new(program: &'a Program, config: PtaConfig) -> Self {
        let intrinsics = BenchmarkIntrinsics::from_config(&config);
        Self {
            program,
            config,
            resolver: Box::new(HierarchyResolver::new()),
            intrinsics: Box::new(intrinsics),
        }
    }

    /// Replace the call-target resolver
    pub fn with_resolver(mut self, resolver: impl MethodResolver + 'static) -> Self {
        self.resolver = Box::new(resolver);
        self
    }

    /// Replace the intrinsic hook recognizer
    pub fn with_intrinsics(mut self, intrinsics: impl IntrinsicRecognizer + 'static) -> Self {
        self.intrinsics = Box::new(intrinsics);
        self
    }

    pub fn config(&self) -> &PtaConfig {
        &self.config
    }

    /// Construction phases only: the inlined CFG with its pointer and site tables
    pub fn build(&self) -> Result<AnalysisContext> {
        Ok(self.construct()?.0)
    }

    fn construct(&self) -> Result<(AnalysisContext, AnalysisStats)> {
        self.config.validate()?;
        let entry = self.program.entry_method(self.config.entry.as_deref())?;
        tracing::info!(
            "analyzing from {} (max inline depth {})",
            self.program.method(entry).qualified_name(),
            self.config.max_inline_depth
        );

        let mut pointers = PointerTable::new();
        let inliner = CallGraphInliner::new(
            self.program,
            self.resolver.as_ref(),
            self.intrinsics.as_ref(),
            self.config.max_inline_depth,
        );
        let Some(mut inlined) = inliner.inline(entry, &mut pointers) else {
            tracing::warn!(
                "entry method {} has no body, nothing to analyze",
                self.program.method(entry).qualified_name()
            );
            return Ok((AnalysisContext::default(), AnalysisStats::default()));
        };

        if inlined.stats.unresolved_calls > 0 {
            tracing::warn!(
                "{} calls left unresolved: {}",
                inlined.stats.unresolved_calls,
                inlined.unresolved_targets.iter().cloned().collect::<Vec<_>>().join(", ")
            );
        }
        if inlined.stats.truncated_calls > 0 {
            tracing::warn!(
                "{} calls not inlined at depth limit {}",
                inlined.stats.truncated_calls,
                self.config.max_inline_depth
            );
        }

        let implied_field_edges = if self.config.field_copropagation {
            field_copropagation::apply(&mut inlined.cfg, &mut pointers)
        } else {
            0
        };

        let sites = AllocationRegistry::build(
            self.program,
            inlined.methods.iter().copied(),
            self.intrinsics.as_ref(),
            &mut pointers,
        );

        let cfg = finish_cfg(inlined.cfg, inlined.entry);
        let stats = AnalysisStats {
            methods_inlined: inlined.methods.len(),
            instances: inlined.stats.instances,
            blocks: cfg.len(),
            cfg_edges: cfg.edge_count(),
            copy_edges: cfg.copy_edge_count(),
            implied_field_edges,
            pointers: pointers.len(),
            sites: sites.len(),
            truncated_calls: inlined.stats.truncated_calls,
            unresolved_calls: inlined.stats.unresolved_calls,
            ..Default::default()
        };
        tracing::info!(
            "built global CFG: {} blocks, {} copy edges, {} pointers, {} sites",
            stats.blocks,
            stats.copy_edges,
            stats.pointers,
            stats.sites
        );

        Ok((AnalysisContext { pointers, sites, cfg }, stats))
    }

    /// Run the full analysis
    pub fn run(&self) -> Result<AnalysisOutcome> {
        let start = Instant::now();
        let (context, mut stats) = self.construct()?;

        let seed = match self.config.seed_policy {
            SeedPolicy::Everywhere => context.sites.seed(),
            SeedPolicy::AtAllocation => context.sites.generators(),
        };
        let solution = FlowSensitiveSolver::new(&context.cfg, seed)
            .with_max_iterations(self.config.max_iterations)
            .solve();

        let declared = result_collector::declared_tests(self.program, self.intrinsics.as_ref());
        let collected = result_collector::collect(&context.cfg, &solution, &context.sites, &declared);

        stats.evaluations = solution.stats.evaluations;
        stats.converged = solution.stats.converged;
        stats.fallbacks = collected.fallbacks.len();
        stats.duration_ms = start.elapsed().as_millis() as u64;
        tracing::info!(
            "analysis finished in {}ms: {} test points, {} fallbacks, {} evaluations",
            stats.duration_ms,
            collected.result.len(),
            stats.fallbacks,
            stats.evaluations
        );

        Ok(AnalysisOutcome {
            result: collected.result,
            context,
            solution,
            stats,
        })
    }

    /// Run and hand the result to `sink`
    pub fn run_and_write(&self, sink: &mut dyn ResultSink) -> Result<AnalysisOutcome> {
        let outcome = self.run()?;
        sink.write(&outcome.result)?;
        Ok(outcome)
    }
}

/// Freeze the graph; exits are the blocks left without successors
fn finish_cfg(builder: GlobalCfgBuilder, entry: BlockId) -> GlobalCfg {
    let exits = (0..builder.len() as BlockId)
        .filter(|b| builder.successors(*b).is_empty())
        .collect();
    builder.finish(entry, exits)
}
