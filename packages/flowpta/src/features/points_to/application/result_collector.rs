//! Result Collector
//!
//! Reads the converged out-state of every test-marked block and maps each
//! test id to the labels of the sites its traced pointer may reference.
//! When a test id ends up with no label at all, it is answered with the
//! whole label universe instead. Test hooks in methods that were never
//! inlined (depth-cut, unresolved or uncalled) mark no block; their ids get
//! the universe too.

use crate::features::points_to::domain::{GlobalCfg, PointsToResult};
use crate::features::points_to::infrastructure::{AllocationRegistry, FlowSensitiveResult};
use crate::features::points_to::ports::{Intrinsic, IntrinsicRecognizer};
use crate::shared::models::{Program, Stmt};
use std::collections::{BTreeMap, BTreeSet};

/// Collected answers plus the test ids that needed the fallback
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CollectedResult {
    pub result: PointsToResult,
    /// Test ids answered with the universe, ascending
    pub fallbacks: Vec<i64>,
}

/// Test ids of every test hook in a method with a body, inlined or not
pub fn declared_tests(program: &Program, intrinsics: &dyn IntrinsicRecognizer) -> BTreeSet<i64> {
    program
        .methods
        .iter()
        .filter(|m| m.has_body())
        .flat_map(|m| m.stmts.iter())
        .filter_map(|stmt| match stmt {
            Stmt::Invoke(invoke) => match intrinsics.classify(invoke) {
                Some(Intrinsic::Test {
                    test_id: Some(test_id),
                    ..
                }) => Some(test_id),
                _ => None,
            },
            _ => None,
        })
        .collect()
}

pub fn collect(
    cfg: &GlobalCfg,
    solution: &FlowSensitiveResult,
    sites: &AllocationRegistry,
    declared: &BTreeSet<i64>,
) -> CollectedResult {
    // the same test id may be marked by several inlined copies
    let mut answers: BTreeMap<i64, BTreeSet<i64>> = BTreeMap::new();
    for (block, mark) in cfg.test_points() {
        let labels = solution
            .points_to(block, mark.traced)
            .map(|locs| sites.labels(locs))
            .unwrap_or_default();
        answers.entry(mark.test_id).or_default().extend(labels);
    }
    for test_id in declared {
        if !answers.contains_key(test_id) {
            tracing::warn!("test {} is in a method that was never inlined", test_id);
            answers.insert(*test_id, BTreeSet::new());
        }
    }

    let universe = sites.universe();
    let mut collected = CollectedResult::default();
    for (test_id, labels) in answers {
        if labels.is_empty() {
            tracing::warn!(
                "test {} has an empty points-to set, reporting all {} sites",
                test_id,
                universe.len()
            );
            collected.fallbacks.push(test_id);
            collected.result.insert(test_id, universe.clone());
        } else {
            collected.result.insert(test_id, labels);
        }
    }
    collected
}
