//! Fluent construction of IR programs
//!
//! Used by tests and by embedders that produce IR without a JSON front end.
//! Jump targets are statement indices; forward jumps are emitted with an
//! empty target list and patched through [`MethodBuilder::set_targets`].

use super::ir::{ClassDecl, FieldRef, Invoke, Literal, Local, Method, MethodId, MethodRef, Operand, Program, Stmt};
use crate::features::points_to::ports::intrinsics::DEFAULT_INTRINSIC_CLASS;

/// Builder for one method
#[derive(Debug, Clone)]
pub struct MethodBuilder {
    method: Method,
}

impl MethodBuilder {
    pub fn new(class: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            method: Method {
                class: class.into(),
                name: name.into(),
                descriptor: String::new(),
                is_static: false,
                is_abstract: false,
                this_var: None,
                params: Vec::new(),
                vars: Vec::new(),
                stmts: Vec::new(),
            },
        }
    }

    pub fn static_method(mut self) -> Self {
        self.method.is_static = true;
        self
    }

    pub fn abstract_method(mut self) -> Self {
        self.method.is_abstract = true;
        self
    }

    pub fn descriptor(mut self, descriptor: impl Into<String>) -> Self {
        self.method.descriptor = descriptor.into();
        self
    }

    /// Get or create a local by name
    pub fn var(&mut self, name: &str) -> Local {
        if let Some(i) = self.method.vars.iter().position(|v| v == name) {
            return i as Local;
        }
        self.method.vars.push(name.to_string());
        (self.method.vars.len() - 1) as Local
    }

    /// Declare the implicit receiver
    pub fn this(&mut self) -> Local {
        let local = self.var("this");
        self.method.this_var = Some(local);
        local
    }

    /// Declare the next formal parameter
    pub fn param(&mut self, name: &str) -> Local {
        let local = self.var(name);
        self.method.params.push(local);
        local
    }

    /// Index the next emitted statement will get
    #[inline]
    pub fn next_index(&self) -> usize {
        self.method.stmts.len()
    }

    pub fn push(&mut self, stmt: Stmt) -> usize {
        self.method.stmts.push(stmt);
        self.method.stmts.len() - 1
    }

    pub fn new_obj(&mut self, lhs: Local, class: &str) -> usize {
        self.push(Stmt::New {
            lhs,
            class: class.to_string(),
        })
    }

    pub fn copy(&mut self, lhs: Local, rhs: Local) -> usize {
        self.push(Stmt::Copy {
            lhs,
            rhs: Operand::Var(rhs),
        })
    }

    pub fn copy_null(&mut self, lhs: Local) -> usize {
        self.push(Stmt::Copy {
            lhs,
            rhs: Operand::Const(Literal::Null),
        })
    }

    pub fn load(&mut self, lhs: Local, base: Local, field: FieldRef) -> usize {
        self.push(Stmt::LoadField {
            lhs,
            base: Some(base),
            field,
        })
    }

    pub fn load_static(&mut self, lhs: Local, field: FieldRef) -> usize {
        self.push(Stmt::LoadField {
            lhs,
            base: None,
            field,
        })
    }

    pub fn store(&mut self, base: Local, field: FieldRef, rhs: Local) -> usize {
        self.push(Stmt::StoreField {
            base: Some(base),
            field,
            rhs: Operand::Var(rhs),
        })
    }

    pub fn store_static(&mut self, field: FieldRef, rhs: Local) -> usize {
        self.push(Stmt::StoreField {
            base: None,
            field,
            rhs: Operand::Var(rhs),
        })
    }

    /// Instance call `result = base.callee(args)`
    pub fn invoke(
        &mut self,
        result: Option<Local>,
        base: Local,
        callee: MethodRef,
        args: &[Local],
    ) -> usize {
        self.push(Stmt::Invoke(Invoke {
            result,
            callee,
            args: args.iter().map(|a| Operand::Var(*a)).collect(),
            base: Some(base),
        }))
    }

    /// Static call `result = callee(args)`
    pub fn invoke_static(&mut self, result: Option<Local>, callee: MethodRef, args: &[Local]) -> usize {
        self.push(Stmt::Invoke(Invoke {
            result,
            callee,
            args: args.iter().map(|a| Operand::Var(*a)).collect(),
            base: None,
        }))
    }

    /// Allocation hook: labels the next `new` with `label`
    pub fn alloc(&mut self, label: i64) -> usize {
        self.push(Stmt::Invoke(Invoke {
            result: None,
            callee: MethodRef::new(DEFAULT_INTRINSIC_CLASS, "alloc"),
            args: vec![Operand::Const(Literal::Int(label))],
            base: None,
        }))
    }

    /// Test hook: report the points-to set of `traced` under `test_id`
    pub fn test(&mut self, test_id: i64, traced: Local) -> usize {
        self.push(Stmt::Invoke(Invoke {
            result: None,
            callee: MethodRef::new(DEFAULT_INTRINSIC_CLASS, "test"),
            args: vec![Operand::Const(Literal::Int(test_id)), Operand::Var(traced)],
            base: None,
        }))
    }

    pub fn if_goto(&mut self, targets: &[usize]) -> usize {
        self.push(Stmt::If {
            targets: targets.to_vec(),
        })
    }

    pub fn goto(&mut self, targets: &[usize]) -> usize {
        self.push(Stmt::Goto {
            targets: targets.to_vec(),
        })
    }

    /// Patch the targets of an already emitted jump
    pub fn set_targets(&mut self, stmt: usize, new_targets: &[usize]) {
        if let Some(Stmt::If { targets } | Stmt::Goto { targets }) = self.method.stmts.get_mut(stmt) {
            *targets = new_targets.to_vec();
        }
    }

    pub fn ret(&mut self, value: Local) -> usize {
        self.push(Stmt::Return {
            value: Some(Operand::Var(value)),
        })
    }

    pub fn ret_void(&mut self) -> usize {
        self.push(Stmt::Return { value: None })
    }

    pub fn other(&mut self, text: &str) -> usize {
        self.push(Stmt::Other {
            text: text.to_string(),
        })
    }

    pub fn build(self) -> Method {
        self.method
    }
}

/// Builder for a whole program
#[derive(Debug, Clone, Default)]
pub struct ProgramBuilder {
    program: Program,
}

impl ProgramBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn class(&mut self, name: &str, superclass: Option<&str>) -> &mut Self {
        self.program.classes.push(ClassDecl {
            name: name.to_string(),
            superclass: superclass.map(str::to_string),
        });
        self
    }

    pub fn method(&mut self, method: Method) -> MethodId {
        self.program.methods.push(method);
        (self.program.methods.len() - 1) as MethodId
    }

    pub fn entry(&mut self, qualified: &str) -> &mut Self {
        self.program.entry = Some(qualified.to_string());
        self
    }

    pub fn build(self) -> Program {
        self.program
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vars_are_deduplicated() {
        let mut m = MethodBuilder::new("Main", "main").static_method();
        let a = m.var("a");
        let b = m.var("b");
        assert_eq!(m.var("a"), a);
        assert_ne!(a, b);
    }

    #[test]
    fn test_forward_jump_patching() {
        let mut m = MethodBuilder::new("Main", "main").static_method();
        let jump = m.if_goto(&[]);
        m.other("nop");
        let target = m.ret_void();
        m.set_targets(jump, &[target]);
        let method = m.build();
        assert_eq!(method.stmts[jump].jump_targets(), &[2]);
    }

    #[test]
    fn test_params_and_this() {
        let mut m = MethodBuilder::new("A", "<init>");
        let this = m.this();
        let x = m.param("x");
        let method = m.build();
        assert_eq!(method.this_var, Some(this));
        assert_eq!(method.params, vec![x]);
        assert!(!method.is_static);
    }
}
