//! Intrinsic hook recognition
//!
//! Two calls are special-cased instead of inlined:
//! - `alloc(n)`: labels the next allocation in the method with `n`
//! - `test(id, v)`: reports the points-to set of `v` under test `id`
//!
//! Both are identified structurally by declaring class and method name.

use crate::config::PtaConfig;
use crate::shared::models::{Invoke, Local};

/// Declaring class of the benchmark hooks
pub const DEFAULT_INTRINSIC_CLASS: &str = "benchmark.internal.Benchmark";

/// A recognized hook call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intrinsic {
    /// Allocation hook; `label` is absent when the argument is not an int constant
    Alloc { label: Option<i64> },
    /// Test hook; either part is absent when the arguments are malformed
    Test {
        test_id: Option<i64>,
        traced: Option<Local>,
    },
}

/// Decides whether a call is an intrinsic hook
pub trait IntrinsicRecognizer: Send + Sync {
    fn classify(&self, invoke: &Invoke) -> Option<Intrinsic>;
}

/// Recognizes `<class>.<alloc_hook>` and `<class>.<test_hook>`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BenchmarkIntrinsics {
    class: String,
    alloc_hook: String,
    test_hook: String,
}

impl Default for BenchmarkIntrinsics {
    fn default() -> Self {
        Self::new(DEFAULT_INTRINSIC_CLASS, "alloc", "test")
    }
}

impl BenchmarkIntrinsics {
    pub fn new(class: impl Into<String>, alloc_hook: impl Into<String>, test_hook: impl Into<String>) -> Self {
        Self {
            class: class.into(),
            alloc_hook: alloc_hook.into(),
            test_hook: test_hook.into(),
        }
    }

    pub fn from_config(config: &PtaConfig) -> Self {
        Self::new(
            config.intrinsic_class.clone(),
            config.alloc_hook.clone(),
            config.test_hook.clone(),
        )
    }
}

impl IntrinsicRecognizer for BenchmarkIntrinsics {
    fn classify(&self, invoke: &Invoke) -> Option<Intrinsic> {
        if invoke.callee.class != self.class {
            return None;
        }
        if invoke.callee.name == self.alloc_hook {
            Some(Intrinsic::Alloc {
                label: invoke.args.first().and_then(|a| a.as_int()),
            })
        } else if invoke.callee.name == self.test_hook {
            Some(Intrinsic::Test {
                test_id: invoke.args.first().and_then(|a| a.as_int()),
                traced: invoke.args.get(1).and_then(|a| a.as_local()),
            })
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::models::{Literal, MethodRef, Operand};

    fn call(class: &str, name: &str, args: Vec<Operand>) -> Invoke {
        Invoke {
            result: None,
            callee: MethodRef::new(class, name),
            args,
            base: None,
        }
    }

    #[test]
    fn test_alloc_hook() {
        let r = BenchmarkIntrinsics::default();
        let invoke = call(
            DEFAULT_INTRINSIC_CLASS,
            "alloc",
            vec![Operand::Const(Literal::Int(3))],
        );
        assert_eq!(r.classify(&invoke), Some(Intrinsic::Alloc { label: Some(3) }));
    }

    #[test]
    fn test_test_hook() {
        let r = BenchmarkIntrinsics::default();
        let invoke = call(
            DEFAULT_INTRINSIC_CLASS,
            "test",
            vec![Operand::Const(Literal::Int(1)), Operand::Var(4)],
        );
        assert_eq!(
            r.classify(&invoke),
            Some(Intrinsic::Test {
                test_id: Some(1),
                traced: Some(4)
            })
        );
    }

    #[test]
    fn test_malformed_hook_still_recognized() {
        let r = BenchmarkIntrinsics::default();
        let invoke = call(DEFAULT_INTRINSIC_CLASS, "test", vec![Operand::Var(0)]);
        assert_eq!(
            r.classify(&invoke),
            Some(Intrinsic::Test {
                test_id: None,
                traced: None
            })
        );
    }

    #[test]
    fn test_other_calls_ignored() {
        let r = BenchmarkIntrinsics::default();
        assert_eq!(r.classify(&call("Main", "alloc", vec![])), None);
        assert_eq!(r.classify(&call(DEFAULT_INTRINSIC_CLASS, "dump", vec![])), None);
    }

    #[test]
    fn test_custom_names() {
        let config = PtaConfig::default().intrinsic_class("bench.Hooks");
        let r = BenchmarkIntrinsics::from_config(&config);
        assert!(r.classify(&call("bench.Hooks", "alloc", vec![])).is_some());
        assert!(r.classify(&call(DEFAULT_INTRINSIC_CLASS, "alloc", vec![])).is_none());
    }
}
