//! Name-keyed type-variable substitution.
//!
//! A variable is bound by the position its name occupies in a
//! *parameterized* carrier (a type's argument list or a method's generic
//! parameter list); the replacement is the *filled* carrier's entry at the
//! same position. Substitution is a pure rewrite producing a new value.

use crate::store::TypeEnv;
use crate::types::{ConcreteType, MethodType, Type};

/// Replace every variable occurrence in `ty` using the
/// `filled`/`paramed` instantiation pair.
pub fn resolve_variables(
    env: &dyn TypeEnv,
    ty: &Type,
    filled: &ConcreteType,
    paramed: &ConcreteType,
) -> Type {
    substitute(env, ty, filled, paramed, None)
}

/// Like [`resolve_variables`], additionally consulting a method-signature
/// pair. A method-level binding shadows a declaring-type binding of the
/// same name.
pub fn resolve_variables_in_method(
    env: &dyn TypeEnv,
    ty: &Type,
    filled: &ConcreteType,
    paramed: &ConcreteType,
    filled_method: &MethodType,
    paramed_method: &MethodType,
) -> Type {
    substitute(env, ty, filled, paramed, Some((filled_method, paramed_method)))
}

fn substitute(
    env: &dyn TypeEnv,
    ty: &Type,
    filled: &ConcreteType,
    paramed: &ConcreteType,
    method: Option<(&MethodType, &MethodType)>,
) -> Type {
    match ty {
        Type::Concrete(c) => Type::class(
            c.handle(),
            c.args()
                .iter()
                .map(|arg| substitute(env, arg, filled, paramed, method))
                .collect(),
        ),
        Type::Array(a) => {
            let component = substitute(env, a.element(), filled, paramed, method);
            // dims >= 1 by invariant, so rebuilding cannot fail; a variable
            // component resolving to an array merges its dimensions.
            match Type::array_of(component, a.dims()) {
                Ok(rebuilt) => rebuilt,
                Err(_) => ty.clone(),
            }
        }
        Type::Variable(v) => {
            if let Some((filled_m, paramed_m)) = method {
                if let Some(bound) = filled_m.resolve_var(env, v.name(), paramed_m) {
                    return bound;
                }
            }
            if let Some(bound) = filled.resolve_var(env, v.name(), paramed) {
                return bound;
            }
            // Unbound: pass through, but keep resolving inside the bounds.
            let upper = v
                .upper()
                .iter()
                .map(|b| substitute(env, b, filled, paramed, method))
                .collect();
            let lower = v
                .lower()
                .iter()
                .map(|b| substitute(env, b, filled, paramed, method))
                .collect();
            Type::variable(env, v.name(), upper, lower)
        }
    }
}

impl MethodType {
    /// Apply a declaring-type instantiation across the whole signature.
    pub fn resolve_variables(
        &self,
        env: &dyn TypeEnv,
        filled: &ConcreteType,
        paramed: &ConcreteType,
    ) -> MethodType {
        MethodType::new(
            resolve_variables(env, self.ret(), filled, paramed),
            self.params()
                .iter()
                .map(|p| resolve_variables(env, p, filled, paramed))
                .collect(),
            self.generics()
                .iter()
                .map(|g| resolve_variables(env, g, filled, paramed))
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{ClassDef, ClassKind, TypeParamDef, TypeStore};
    use crate::types::VariableType;

    fn box_class(store: &mut TypeStore) -> crate::store::ClassId {
        let object = Type::class(store.well_known().object, vec![]);
        store.add_class(ClassDef {
            name: "com.example.Box".to_string(),
            kind: ClassKind::Class,
            type_params: vec![TypeParamDef {
                name: "T".to_string(),
                upper_bounds: vec![object.clone()],
            }],
            super_class: Some(object),
            interfaces: vec![],
        })
    }

    #[test]
    fn variable_resolves_to_the_positional_binding() {
        let mut store = TypeStore::with_minimal_jdk();
        let bx = box_class(&mut store);
        let string = Type::class(store.well_known().string, vec![]);

        let paramed = ConcreteType::new(bx, vec![Type::Variable(VariableType::unbounded("T"))]);
        let filled = ConcreteType::new(bx, vec![string.clone()]);

        let t = Type::Variable(VariableType::unbounded("T"));
        assert_eq!(resolve_variables(&store, &t, &filled, &paramed), string);
    }

    #[test]
    fn substitution_is_identity_on_variable_free_types() {
        let mut store = TypeStore::with_minimal_jdk();
        let bx = box_class(&mut store);
        let list = store.class_id("java.util.List").unwrap();
        let string = Type::class(store.well_known().string, vec![]);

        let paramed = ConcreteType::new(bx, vec![Type::Variable(VariableType::unbounded("T"))]);
        let filled = ConcreteType::new(bx, vec![string.clone()]);

        let plain = Type::class(list, vec![string.clone()]);
        assert_eq!(resolve_variables(&store, &plain, &filled, &paramed), plain);

        let arr = string.array(2).unwrap();
        assert_eq!(resolve_variables(&store, &arr, &filled, &paramed), arr);
    }

    #[test]
    fn substitution_recurses_into_arguments_components_and_bounds() {
        let mut store = TypeStore::with_minimal_jdk();
        let bx = box_class(&mut store);
        let list = store.class_id("java.util.List").unwrap();
        let string = Type::class(store.well_known().string, vec![]);

        let paramed = ConcreteType::new(bx, vec![Type::Variable(VariableType::unbounded("T"))]);
        let filled = ConcreteType::new(bx, vec![string.clone()]);
        let t = Type::Variable(VariableType::unbounded("T"));

        let nested = Type::class(list, vec![t.clone()]);
        assert_eq!(
            resolve_variables(&store, &nested, &filled, &paramed),
            Type::class(list, vec![string.clone()])
        );

        let arr = t.array(1).unwrap();
        assert_eq!(
            resolve_variables(&store, &arr, &filled, &paramed),
            string.array(1).unwrap()
        );

        // An unbound variable keeps its name but its bounds still resolve.
        let bounded = Type::variable(&store, "U", vec![Type::class(list, vec![t])], vec![]);
        let resolved = resolve_variables(&store, &bounded, &filled, &paramed);
        let Type::Variable(v) = resolved else {
            panic!("expected a variable");
        };
        assert_eq!(v.name(), "U");
        assert_eq!(v.upper(), &[Type::class(list, vec![string])]);
    }

    #[test]
    fn method_level_binding_shadows_the_type_level_one() {
        let mut store = TypeStore::with_minimal_jdk();
        let bx = box_class(&mut store);
        let string = Type::class(store.well_known().string, vec![]);
        let integer = Type::class(store.well_known().integer, vec![]);

        let paramed_ty = ConcreteType::new(bx, vec![Type::Variable(VariableType::unbounded("T"))]);
        let filled_ty = ConcreteType::new(bx, vec![string]);

        let paramed_m = MethodType::new(
            Type::top(&store),
            vec![],
            vec![Type::Variable(VariableType::unbounded("T"))],
        );
        let filled_m = MethodType::new(Type::top(&store), vec![], vec![integer.clone()]);

        let t = Type::Variable(VariableType::unbounded("T"));
        assert_eq!(
            resolve_variables_in_method(&store, &t, &filled_ty, &paramed_ty, &filled_m, &paramed_m),
            integer
        );
    }
}
