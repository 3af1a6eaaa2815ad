//! Pairwise assignability over the type model.
//!
//! The check is depth-aware: depth 0 is a top-level (covariant,
//! wildcard-capturing) question, every generic-argument position below it
//! is invariant. Array component compatibility is always covariant,
//! whatever the depth.

use std::collections::{HashSet, VecDeque};

use crate::store::{ClassId, ClassKind, TypeEnv};
use crate::types::{MethodType, Type, VariableType};

/// Is `source` assignable to `target` at the top level?
pub fn is_assignable_to(env: &dyn TypeEnv, source: &Type, target: &Type) -> bool {
    assignable(env, source, target, 0)
}

/// Depth-aware assignability. `depth > 0` means the pair sits inside a
/// generic-argument position and is compared invariantly.
pub fn assignable(env: &dyn TypeEnv, source: &Type, target: &Type, depth: u32) -> bool {
    match (source, target) {
        (Type::Variable(s), Type::Variable(t)) => {
            // Bound containment: every source upper inside every target
            // upper, and the target must fit above every source lower.
            !s.upper().is_empty()
                && s.upper()
                    .iter()
                    .all(|u| t.upper().iter().all(|tu| assignable(env, u, tu, 0)))
                && s.lower().iter().all(|l| assignable(env, target, l, depth))
        }
        (Type::Variable(s), _) => {
            // Existential widening: the variable stands for some subtype of
            // one of its uppers. With no uppers it fits nowhere but top.
            target.is_top(env) || s.upper().iter().any(|u| assignable(env, u, target, depth))
        }
        (_, Type::Variable(t)) => depth == 0 && matches_bounds(env, source, t),
        (Type::Concrete(s), Type::Concrete(t)) => {
            if depth == 0 {
                if !is_raw_subclass(env, s.handle(), t.handle()) {
                    return false;
                }
                let shared = s.arg_count().min(t.arg_count());
                (0..shared).all(|i| match &t.args()[i] {
                    // Wildcard capture: the target position accepts any
                    // argument inside its bounds.
                    Type::Variable(v) => matches_bounds(env, &s.args()[i], v),
                    ta => assignable(env, &s.args()[i], ta, depth + 1),
                })
            } else {
                if s.handle() != t.handle() {
                    return false;
                }
                let shared = s.arg_count().min(t.arg_count());
                (0..shared).all(|i| {
                    let (sa, ta) = (&s.args()[i], &t.args()[i]);
                    sa == ta || assignable(env, sa, ta, depth + 1)
                })
            }
        }
        (Type::Array(a), Type::Array(b)) => {
            // Arrays are covariant in their component, never invariant.
            (a.dims() == b.dims() && assignable(env, a.element(), b.element(), 0))
                || (b.dims() < a.dims() && b.element().is_top(env))
        }
        (Type::Array(_), Type::Concrete(_)) => target.is_top(env),
        (Type::Concrete(_), Type::Array(_)) => false,
    }
}

/// Does `source` fit inside the bounds of variable `target`?
fn matches_bounds(env: &dyn TypeEnv, source: &Type, target: &VariableType) -> bool {
    target
        .upper()
        .iter()
        .all(|u| assignable(env, source, u, 0))
        && (target.lower().is_empty()
            || target
                .lower()
                .iter()
                .any(|l| assignable(env, source, l, 0)))
}

/// The native is-a relation over erased handles: reflexive reachability in
/// the declared-supertype graph. Interfaces implicitly reach `Object`;
/// primitives are related only to themselves.
pub fn is_raw_subclass(env: &dyn TypeEnv, sub: ClassId, sup: ClassId) -> bool {
    if sub == sup {
        return true;
    }

    let mut queue: VecDeque<ClassId> = VecDeque::from([sub]);
    let mut seen: HashSet<ClassId> = HashSet::new();

    while let Some(current) = queue.pop_front() {
        if current == sup {
            return true;
        }
        if !seen.insert(current) {
            continue;
        }
        let Some(def) = env.class(current) else {
            continue;
        };
        if def.kind == ClassKind::Primitive {
            continue;
        }
        if let Some(sc) = &def.super_class {
            queue.push_back(sc.erasure(env));
        }
        for iface in &def.interfaces {
            queue.push_back(iface.erasure(env));
        }
        if def.kind == ClassKind::Interface {
            queue.push_back(env.well_known().object);
        }
    }

    false
}

impl MethodType {
    /// Covariant signature compatibility: same arity, return and every
    /// parameter assignable position-wise.
    pub fn is_assignable_to(&self, env: &dyn TypeEnv, other: &MethodType) -> bool {
        self.params().len() == other.params().len()
            && is_assignable_to(env, self.ret(), other.ret())
            && self
                .params()
                .iter()
                .zip(other.params())
                .all(|(p, o)| is_assignable_to(env, p, o))
    }
}
