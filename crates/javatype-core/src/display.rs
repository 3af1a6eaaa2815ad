//! Source-like textual rendering. Class names come from the environment,
//! so rendering is a method taking [`TypeEnv`] rather than a `Display`
//! impl.

use std::fmt::Write as _;

use crate::store::{ClassId, TypeEnv};
use crate::types::{ConcreteType, MethodType, Type};

fn class_name(env: &dyn TypeEnv, id: ClassId) -> String {
    match env.class(id) {
        Some(def) => def.name.clone(),
        None => format!("<class#{}>", id.index()),
    }
}

fn join(env: &dyn TypeEnv, types: &[Type], separator: &str) -> String {
    types
        .iter()
        .map(|t| t.render(env))
        .collect::<Vec<_>>()
        .join(separator)
}

impl Type {
    /// `Name<A, B>` for concrete types (no `<>` when unparameterized), one
    /// `[]` per dimension for arrays, and
    /// `name extends U1 & U2 super L1 & L2` for variables with empty
    /// clauses left out.
    pub fn render(&self, env: &dyn TypeEnv) -> String {
        match self {
            Type::Concrete(c) => c.render(env),
            Type::Array(a) => {
                let mut out = a.element().render(env);
                for _ in 0..a.dims() {
                    out.push_str("[]");
                }
                out
            }
            Type::Variable(v) => {
                let mut out = v.name().to_string();
                if !v.upper().is_empty() {
                    let _ = write!(out, " extends {}", join(env, v.upper(), " & "));
                }
                if !v.lower().is_empty() {
                    let _ = write!(out, " super {}", join(env, v.lower(), " & "));
                }
                out
            }
        }
    }
}

impl ConcreteType {
    pub fn render(&self, env: &dyn TypeEnv) -> String {
        let mut out = class_name(env, self.handle());
        if !self.args().is_empty() {
            let _ = write!(out, "<{}>", join(env, self.args(), ", "));
        }
        out
    }
}

impl MethodType {
    /// `Ret (P1, P2)`.
    pub fn render(&self, env: &dyn TypeEnv) -> String {
        format!(
            "{} ({})",
            self.ret().render(env),
            join(env, self.params(), ", ")
        )
    }
}
