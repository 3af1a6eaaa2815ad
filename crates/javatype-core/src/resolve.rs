//! Hierarchy search and generic re-parameterization.
//!
//! A hierarchy path is discovered breadth-first over declared supertypes,
//! superclass enqueued before interfaces at each node; the first path found
//! wins. Re-parameterization walks that path, rewriting each ancestor's
//! declared parameters in terms of the bindings accumulated so far.

use std::collections::{HashMap, HashSet, VecDeque};

use crate::assign::is_raw_subclass;
use crate::store::{ClassId, ClassKind, TypeEnv};
use crate::types::{ConcreteType, Type};

/// The class viewed through its own declared parameters: `List` becomes
/// `List<E>` with `E` carrying its declared bounds.
pub fn parameterized_type(env: &dyn TypeEnv, id: ClassId) -> ConcreteType {
    let args = env
        .class(id)
        .map(|def| {
            def.type_params
                .iter()
                .map(|tp| {
                    Type::variable(env, tp.name.clone(), tp.upper_bounds.clone(), Vec::new())
                })
                .collect()
        })
        .unwrap_or_default();
    ConcreteType::new(id, args)
}

/// BFS from `from` to `to` over the declared-supertype graph.
///
/// Returns the node sequence from `from` to `to`, or `None` when the graph
/// is exhausted — an expected outcome, not a failure. Revisited nodes are
/// pruned; the first-found path is unaffected.
pub fn find_hierarchy_path(env: &dyn TypeEnv, from: ClassId, to: ClassId) -> Option<Vec<ClassId>> {
    let mut queue: VecDeque<Vec<ClassId>> = VecDeque::from([vec![from]]);
    let mut seen: HashSet<ClassId> = HashSet::new();

    while let Some(path) = queue.pop_front() {
        let Some(&last) = path.last() else {
            continue;
        };
        if last == to {
            return Some(path);
        }
        if !seen.insert(last) {
            continue;
        }
        let Some(def) = env.class(last) else {
            continue;
        };
        if def.kind == ClassKind::Primitive {
            continue;
        }

        let mut extend = |next: ClassId| {
            let mut longer = path.clone();
            longer.push(next);
            queue.push_back(longer);
        };
        if let Some(sc) = &def.super_class {
            extend(sc.erasure(env));
        }
        for iface in &def.interfaces {
            extend(iface.erasure(env));
        }
        if def.kind == ClassKind::Interface {
            extend(env.well_known().object);
        }
    }

    None
}

/// How `class` declares `target` among its direct supertypes, with the
/// declaration's own type arguments (`ArrayList` declares
/// `AbstractList<E>`). Interfaces inherit a bare `Object` implicitly.
fn inherited_supertype(env: &dyn TypeEnv, class: ClassId, target: ClassId) -> Option<Type> {
    let def = env.class(class)?;
    if let Some(sc) = &def.super_class {
        if sc.erasure(env) == target {
            return Some(sc.clone());
        }
    }
    for iface in &def.interfaces {
        if iface.erasure(env) == target {
            return Some(iface.clone());
        }
    }
    if target == env.well_known().object {
        return Some(Type::top(env));
    }
    None
}

/// Express `sub` as its ancestor `parent`, carrying type arguments across
/// the hierarchy: `ArrayList<String>` viewed as `Collection` is
/// `Collection<String>`. `None` when the two are unrelated.
pub fn resolve_to_supertype(
    env: &dyn TypeEnv,
    sub: &ConcreteType,
    parent: ClassId,
) -> Option<ConcreteType> {
    let path = find_hierarchy_path(env, sub.handle(), parent)?;
    let sub_params = parameterized_type(env, sub.handle());

    // Bindings for the current path step, keyed by declared parameter name.
    let mut bindings: HashMap<String, Type> = HashMap::new();
    for (i, param) in sub_params.args().iter().enumerate() {
        if let Type::Variable(v) = param {
            bindings.insert(v.name().to_string(), sub.generic_argument(env, i));
        }
    }

    for step in path.windows(2) {
        let (class, sup) = (step[0], step[1]);
        let sup_params = parameterized_type(env, sup);
        let filled = match inherited_supertype(env, class, sup)? {
            Type::Concrete(c) => c,
            _ => return None,
        };

        let mut next: HashMap<String, Type> = HashMap::new();
        for (j, param) in sup_params.args().iter().enumerate() {
            let Type::Variable(p) = param else { continue };
            let value = match filled.generic_argument(env, j) {
                // The declaration passes one of the current step's own
                // variables along; carry its binding, or the name itself
                // while it is still free.
                Type::Variable(free) => bindings
                    .get(free.name())
                    .cloned()
                    .unwrap_or(Type::Variable(free)),
                concrete => concrete,
            };
            next.insert(p.name().to_string(), value);
        }
        bindings = next;
    }

    let parent_params = parameterized_type(env, parent);
    let mut args = Vec::with_capacity(parent_params.arg_count());
    for param in parent_params.args() {
        let Type::Variable(p) = param else { continue };
        let bound = bindings
            .get(p.name())
            .cloned()
            .unwrap_or_else(|| Type::top(env));
        let resolved = match bound {
            // A propagation chain ended on a still-free variable; fall back
            // to the subtype's original argument under that name.
            Type::Variable(free) => sub_params
                .args()
                .iter()
                .position(|sp| matches!(sp, Type::Variable(v) if v.name() == free.name()))
                .map(|i| sub.generic_argument(env, i))
                .unwrap_or(Type::Variable(free)),
            concrete => concrete,
        };
        args.push(resolved);
    }

    Some(ConcreteType::new(parent, args))
}

/// The approximate inverse of [`resolve_to_supertype`]: given a filled
/// ancestor view, recover the subtype's parameterization.
///
/// The subtype's free parameterization is resolved forward to the ancestor;
/// each subtype parameter whose forward image is an ancestor variable takes
/// that ancestor's filled argument. Unmatched parameters stay declared
/// variables.
pub fn resolve_to_subtype(
    env: &dyn TypeEnv,
    sub: ClassId,
    parent: &ConcreteType,
) -> Option<ConcreteType> {
    let own = parameterized_type(env, sub);
    let forward = resolve_to_supertype(env, &own, parent.handle())?;

    let mut args: Vec<Type> = own.args().to_vec();
    for slot in args.iter_mut() {
        let Type::Variable(v) = &*slot else { continue };
        let matched = forward
            .args()
            .iter()
            .position(|f| matches!(f, Type::Variable(fv) if fv.name() == v.name()));
        if let Some(j) = matched {
            *slot = parent.generic_argument(env, j);
        }
    }

    Some(ConcreteType::new(sub, args))
}

/// The nearest handle that is a raw ancestor of every input, searched
/// upward in lock-step (superclass level before interfaces). Total: the
/// walk is bounded by the top type.
pub fn common_ancestor(env: &dyn TypeEnv, handles: &[ClassId]) -> ClassId {
    let object = env.well_known().object;
    match handles {
        [] => return object,
        [only] => return *only,
        _ => {}
    }

    // Level order is candidate priority: superclass edges before interface
    // edges, implicit Object last. Dedup must keep the first occurrence.
    fn push_unique(next: &mut Vec<ClassId>, id: ClassId) {
        if !next.contains(&id) {
            next.push(id);
        }
    }

    let mut current: Vec<ClassId> = handles.to_vec();
    let mut visited: HashSet<ClassId> = current.iter().copied().collect();
    loop {
        let found = current
            .iter()
            .copied()
            .find(|cand| handles.iter().all(|h| is_raw_subclass(env, *h, *cand)));
        if let Some(found) = found {
            return found;
        }

        let mut next: Vec<ClassId> = Vec::new();
        for id in &current {
            let Some(def) = env.class(*id) else { continue };
            if def.kind == ClassKind::Primitive {
                continue;
            }
            if let Some(sc) = &def.super_class {
                push_unique(&mut next, sc.erasure(env));
            }
            for iface in &def.interfaces {
                push_unique(&mut next, iface.erasure(env));
            }
            if def.kind == ClassKind::Interface {
                push_unique(&mut next, object);
            }
        }

        // No candidate and no unvisited node left: only top remains.
        let mut progressed = false;
        for id in &next {
            if visited.insert(*id) {
                progressed = true;
            }
        }
        if next.is_empty() || !progressed {
            return object;
        }
        current = next;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{ClassDef, TypeStore};

    #[test]
    fn hierarchy_path_prefers_the_superclass_edge() {
        let store = TypeStore::with_minimal_jdk();
        let array_list = store.class_id("java.util.ArrayList").unwrap();
        let abstract_list = store.class_id("java.util.AbstractList").unwrap();
        let list = store.class_id("java.util.List").unwrap();

        // ArrayList both extends AbstractList (which implements List) and
        // declares List directly; the direct interface edge is shorter.
        let path = find_hierarchy_path(&store, array_list, list).unwrap();
        assert_eq!(path, vec![array_list, list]);

        let via_super = find_hierarchy_path(&store, array_list, abstract_list).unwrap();
        assert_eq!(via_super, vec![array_list, abstract_list]);

        assert_eq!(find_hierarchy_path(&store, list, array_list), None);
        assert_eq!(
            find_hierarchy_path(&store, array_list, array_list).unwrap(),
            vec![array_list]
        );
    }

    #[test]
    fn interfaces_reach_object_implicitly() {
        let store = TypeStore::with_minimal_jdk();
        let list = store.class_id("java.util.List").unwrap();
        let object = store.well_known().object;
        assert!(find_hierarchy_path(&store, list, object).is_some());
    }

    #[test]
    fn common_ancestor_meets_at_the_shared_interface() {
        let store = TypeStore::with_minimal_jdk();
        let array_list = store.class_id("java.util.ArrayList").unwrap();
        let set = store.class_id("java.util.Set").unwrap();
        let collection = store.class_id("java.util.Collection").unwrap();
        let map = store.class_id("java.util.Map").unwrap();
        let object = store.well_known().object;

        assert_eq!(common_ancestor(&store, &[array_list, set]), collection);
        assert_eq!(common_ancestor(&store, &[array_list, map]), object);
        assert_eq!(common_ancestor(&store, &[array_list]), array_list);
        assert_eq!(common_ancestor(&store, &[]), object);
    }

    #[test]
    fn common_ancestor_prefers_near_interfaces_over_implicit_object() {
        let store = TypeStore::with_minimal_jdk();
        let list = store.class_id("java.util.List").unwrap();
        let set = store.class_id("java.util.Set").unwrap();
        let collection = store.class_id("java.util.Collection").unwrap();

        // Both inputs are interfaces, so the frontier above them carries the
        // implicit Object next to Collection; the nearer node must win.
        assert_eq!(common_ancestor(&store, &[list, set]), collection);
    }

    #[test]
    fn common_ancestor_terminates_on_cyclic_hierarchies() {
        let mut store = TypeStore::with_minimal_jdk();
        let a = store.intern_class_id("com.example.A");
        let b = store.intern_class_id("com.example.B");
        store.define_class(
            a,
            ClassDef {
                name: "com.example.A".to_string(),
                kind: ClassKind::Class,
                type_params: vec![],
                super_class: Some(Type::class(b, vec![])),
                interfaces: vec![],
            },
        );
        store.define_class(
            b,
            ClassDef {
                name: "com.example.B".to_string(),
                kind: ClassKind::Class,
                type_params: vec![],
                super_class: Some(Type::class(a, vec![])),
                interfaces: vec![],
            },
        );

        let int = store.class_id("int").unwrap();
        assert_eq!(
            common_ancestor(&store, &[a, int]),
            store.well_known().object
        );
    }

    #[test]
    fn common_ancestor_is_total_for_unrelated_primitives() {
        let store = TypeStore::with_minimal_jdk();
        let int = store.class_id("int").unwrap();
        let string = store.well_known().string;
        assert_eq!(
            common_ancestor(&store, &[int, string]),
            store.well_known().object
        );
    }
}
