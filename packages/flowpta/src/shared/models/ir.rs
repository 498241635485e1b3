//! Resolved method IR
//!
//! The value types a front end hands to the engine:
//! - Program: classes + methods + entry point
//! - Method: ordered statement list over method-local variables
//! - Stmt: closed set of statement kinds the engine understands
//!
//! Locals are dense indices into `Method::vars`. A local only has a global
//! identity together with its method, see [`Var`].

use crate::errors::{PtaError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// Index of a method in `Program::methods`
pub type MethodId = u32;

/// Index of a local variable in `Method::vars`
pub type Local = u32;

/// A variable with whole-program identity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Var {
    pub method: MethodId,
    pub local: Local,
}

impl Var {
    #[inline]
    pub fn new(method: MethodId, local: Local) -> Self {
        Self { method, local }
    }
}

/// Field reference (declaring class + field name)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FieldRef {
    pub class: String,
    pub name: String,
}

impl FieldRef {
    pub fn new(class: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            class: class.into(),
            name: name.into(),
        }
    }
}

impl fmt::Display for FieldRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.class, self.name)
    }
}

/// Call target as written at the call site
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MethodRef {
    pub class: String,
    pub name: String,
    /// Parameter/return descriptor; empty matches any overload
    #[serde(default)]
    pub descriptor: String,
}

impl MethodRef {
    pub fn new(class: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            class: class.into(),
            name: name.into(),
            descriptor: String::new(),
        }
    }

    pub fn with_descriptor(mut self, descriptor: impl Into<String>) -> Self {
        self.descriptor = descriptor.into();
        self
    }
}

impl fmt::Display for MethodRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.class, self.name)?;
        if !self.descriptor.is_empty() {
            write!(f, "{}", self.descriptor)?;
        }
        Ok(())
    }
}

/// Compile-time constant operand
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Literal {
    Null,
    Int(i64),
    Str(String),
}

/// Statement operand
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operand {
    Var(Local),
    Const(Literal),
}

impl Operand {
    /// The local this operand names, if it is not a constant
    #[inline]
    pub fn as_local(&self) -> Option<Local> {
        match self {
            Operand::Var(local) => Some(*local),
            Operand::Const(_) => None,
        }
    }

    /// The integer value of a constant operand
    #[inline]
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Operand::Const(Literal::Int(v)) => Some(*v),
            _ => None,
        }
    }
}

/// Method invocation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Invoke {
    /// Variable receiving the call's return value
    #[serde(default)]
    pub result: Option<Local>,
    pub callee: MethodRef,
    #[serde(default)]
    pub args: Vec<Operand>,
    /// Receiver object for instance calls
    #[serde(default)]
    pub base: Option<Local>,
}

/// IR statement
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Stmt {
    /// `lhs = new C`
    New { lhs: Local, class: String },
    /// `lhs = rhs`
    Copy { lhs: Local, rhs: Operand },
    /// `lhs = base.f` or `lhs = C.f` when `base` is absent
    LoadField {
        lhs: Local,
        #[serde(default)]
        base: Option<Local>,
        field: FieldRef,
    },
    /// `base.f = rhs` or `C.f = rhs` when `base` is absent
    StoreField {
        #[serde(default)]
        base: Option<Local>,
        field: FieldRef,
        rhs: Operand,
    },
    Invoke(Invoke),
    /// Conditional jump (if/switch): falls through or jumps to any target
    If { targets: Vec<usize> },
    /// Unconditional jump
    Goto { targets: Vec<usize> },
    Return {
        #[serde(default)]
        value: Option<Operand>,
    },
    /// Anything the front end could not classify (arithmetic, array ops, ...)
    Other {
        #[serde(default)]
        text: String,
    },
}

impl Stmt {
    /// Jump targets of a branch statement
    pub fn jump_targets(&self) -> &[usize] {
        match self {
            Stmt::If { targets } | Stmt::Goto { targets } => targets,
            _ => &[],
        }
    }

    #[inline]
    pub fn is_jump(&self) -> bool {
        matches!(self, Stmt::If { .. } | Stmt::Goto { .. })
    }

    #[inline]
    pub fn is_return(&self) -> bool {
        matches!(self, Stmt::Return { .. })
    }
}

/// Class declaration (only the parts method resolution needs)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassDecl {
    pub name: String,
    #[serde(default)]
    pub superclass: Option<String>,
}

/// One method's IR
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Method {
    pub class: String,
    pub name: String,
    #[serde(default)]
    pub descriptor: String,
    #[serde(default)]
    pub is_static: bool,
    #[serde(default)]
    pub is_abstract: bool,
    /// Implicit receiver (`this`) of instance methods
    #[serde(default)]
    pub this_var: Option<Local>,
    #[serde(default)]
    pub params: Vec<Local>,
    /// Local names, indexed by `Local`
    #[serde(default)]
    pub vars: Vec<String>,
    #[serde(default)]
    pub stmts: Vec<Stmt>,
}

impl Method {
    /// Whether the engine can translate this method into blocks
    #[inline]
    pub fn has_body(&self) -> bool {
        !self.is_abstract && !self.stmts.is_empty()
    }

    /// Display name of a local
    pub fn var_name(&self, local: Local) -> String {
        self.vars
            .get(local as usize)
            .cloned()
            .unwrap_or_else(|| format!("%{}", local))
    }

    /// `Class.name`
    pub fn qualified_name(&self) -> String {
        format!("{}.{}", self.class, self.name)
    }
}

/// A whole program as delivered by the front end
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Program {
    #[serde(default)]
    pub classes: Vec<ClassDecl>,
    pub methods: Vec<Method>,
    /// Entry method as `Class.name`
    #[serde(default)]
    pub entry: Option<String>,
}

impl Program {
    /// Parse the JSON form of a program
    pub fn from_json_str(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(PtaError::from)
    }

    /// Load a program from a JSON file
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_json_str(&content)
    }

    #[inline]
    pub fn method(&self, id: MethodId) -> &Method {
        &self.methods[id as usize]
    }

    pub fn method_ids(&self) -> impl Iterator<Item = MethodId> + '_ {
        (0..self.methods.len()).map(|i| i as MethodId)
    }

    /// Find a method by `Class.name` (first overload wins)
    pub fn find_method(&self, qualified: &str) -> Option<MethodId> {
        let (class, name) = qualified.rsplit_once('.')?;
        self.methods
            .iter()
            .position(|m| m.class == class && m.name == name)
            .map(|i| i as MethodId)
    }

    /// Resolve the entry method: explicit override, declared entry, or `main`
    pub fn entry_method(&self, override_name: Option<&str>) -> Result<MethodId> {
        if let Some(name) = override_name.or(self.entry.as_deref()) {
            return self
                .find_method(name)
                .ok_or_else(|| PtaError::EntryNotFound(name.to_string()));
        }
        self.methods
            .iter()
            .position(|m| m.name == "main" && m.is_static)
            .map(|i| i as MethodId)
            .ok_or_else(|| PtaError::EntryNotFound("main".to_string()))
    }

    pub fn superclass_of(&self, class: &str) -> Option<&str> {
        self.classes
            .iter()
            .find(|c| c.name == class)
            .and_then(|c| c.superclass.as_deref())
    }

    /// Display name of a variable, e.g. `Main.main/a`
    pub fn var_name(&self, var: Var) -> String {
        match self.methods.get(var.method as usize) {
            Some(m) => format!("{}/{}", m.qualified_name(), m.var_name(var.local)),
            None => format!("?{}/%{}", var.method, var.local),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stmt_json_shape() {
        let json = r#"[
            {"kind": "new", "lhs": 0, "class": "A"},
            {"kind": "copy", "lhs": 1, "rhs": {"var": 0}},
            {"kind": "copy", "lhs": 1, "rhs": {"const": "null"}},
            {"kind": "load_field", "lhs": 2, "base": 1, "field": {"class": "A", "name": "f"}},
            {"kind": "if", "targets": [6]},
            {"kind": "return"},
            {"kind": "other", "text": "x = y + 1"}
        ]"#;
        let stmts: Vec<Stmt> = serde_json::from_str(json).unwrap();
        assert_eq!(stmts.len(), 7);
        assert_eq!(
            stmts[1],
            Stmt::Copy {
                lhs: 1,
                rhs: Operand::Var(0)
            }
        );
        assert_eq!(stmts[2], Stmt::Copy { lhs: 1, rhs: Operand::Const(Literal::Null) });
        assert_eq!(stmts[4].jump_targets(), &[6]);
        assert!(stmts[5].is_return());
    }

    #[test]
    fn test_entry_lookup() {
        let program = Program {
            classes: vec![],
            methods: vec![
                Method {
                    class: "Main".into(),
                    name: "helper".into(),
                    descriptor: String::new(),
                    is_static: true,
                    is_abstract: false,
                    this_var: None,
                    params: vec![],
                    vars: vec![],
                    stmts: vec![],
                },
                Method {
                    class: "Main".into(),
                    name: "main".into(),
                    descriptor: String::new(),
                    is_static: true,
                    is_abstract: false,
                    this_var: None,
                    params: vec![],
                    vars: vec![],
                    stmts: vec![],
                },
            ],
            entry: None,
        };
        assert_eq!(program.entry_method(None).unwrap(), 1);
        assert_eq!(program.entry_method(Some("Main.helper")).unwrap(), 0);
        assert!(matches!(
            program.entry_method(Some("Main.missing")),
            Err(PtaError::EntryNotFound(_))
        ));
    }

    #[test]
    fn test_var_names() {
        let mut program = Program::default();
        program.methods.push(Method {
            class: "Main".into(),
            name: "main".into(),
            descriptor: String::new(),
            is_static: true,
            is_abstract: false,
            this_var: None,
            params: vec![],
            vars: vec!["a".into()],
            stmts: vec![],
        });
        assert_eq!(program.var_name(Var::new(0, 0)), "Main.main/a");
        assert_eq!(program.var_name(Var::new(0, 7)), "Main.main/%7");
    }
}
