//! Program models (IR input contract)

pub mod builder;
pub mod ir;

pub use builder::{MethodBuilder, ProgramBuilder};
pub use ir::{
    ClassDecl, FieldRef, Invoke, Literal, Local, Method, MethodId, MethodRef, Operand, Program,
    Stmt, Var,
};
