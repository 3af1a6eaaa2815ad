//! Primitive/boxed duality tables.
//!
//! These are plain `const` data: read-only from the first instruction, so
//! there is no initialization order to get wrong and nothing to
//! synchronize.

use crate::store::TypeEnv;
use crate::types::Type;

/// Primitive name paired with its boxed class name.
pub const PRIMITIVE_BOX_PAIRS: &[(&str, &str)] = &[
    ("byte", "java.lang.Byte"),
    ("short", "java.lang.Short"),
    ("char", "java.lang.Character"),
    ("int", "java.lang.Integer"),
    ("long", "java.lang.Long"),
    ("float", "java.lang.Float"),
    ("double", "java.lang.Double"),
    ("boolean", "java.lang.Boolean"),
    ("void", "java.lang.Void"),
];

pub fn is_primitive_name(name: &str) -> bool {
    PRIMITIVE_BOX_PAIRS.iter().any(|(p, _)| *p == name)
}

/// The boxed class name for a primitive name, if any.
pub fn box_of(name: &str) -> Option<&'static str> {
    PRIMITIVE_BOX_PAIRS
        .iter()
        .find(|(p, _)| *p == name)
        .map(|(_, b)| *b)
}

/// The primitive name for a boxed class name, if any.
pub fn unbox_of(name: &str) -> Option<&'static str> {
    PRIMITIVE_BOX_PAIRS
        .iter()
        .find(|(_, b)| *b == name)
        .map(|(p, _)| *p)
}

impl Type {
    pub fn is_primitive(&self, env: &dyn TypeEnv) -> bool {
        match self {
            Type::Concrete(c) => env
                .class(c.handle())
                .is_some_and(|def| is_primitive_name(&def.name)),
            _ => false,
        }
    }

    /// Primitive other than `boolean` and `void`.
    pub fn is_numeric_primitive(&self, env: &dyn TypeEnv) -> bool {
        match self {
            Type::Concrete(c) => env.class(c.handle()).is_some_and(|def| {
                is_primitive_name(&def.name) && def.name != "boolean" && def.name != "void"
            }),
            _ => false,
        }
    }

    /// Map a primitive handle to its boxed form, preserving type arguments.
    /// Identity on everything that is not a known primitive.
    pub fn boxed(&self, env: &dyn TypeEnv) -> Type {
        self.map_handle(env, box_of)
    }

    /// Map a boxed handle back to its primitive form; identity otherwise.
    pub fn unboxed(&self, env: &dyn TypeEnv) -> Type {
        self.map_handle(env, unbox_of)
    }

    fn map_handle(&self, env: &dyn TypeEnv, table: fn(&str) -> Option<&'static str>) -> Type {
        let Type::Concrete(c) = self else {
            return self.clone();
        };
        let mapped = env
            .class(c.handle())
            .and_then(|def| table(&def.name))
            .and_then(|name| env.lookup_class(name));
        match mapped {
            Some(handle) => Type::class(handle, c.args().to_vec()),
            None => self.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::TypeStore;

    #[test]
    fn tables_are_inverse() {
        for (p, b) in PRIMITIVE_BOX_PAIRS {
            assert_eq!(box_of(p), Some(*b));
            assert_eq!(unbox_of(b), Some(*p));
        }
        assert_eq!(box_of("java.lang.String"), None);
        assert_eq!(unbox_of("int"), None);
    }

    #[test]
    fn boxing_round_trips_through_the_store() {
        let store = TypeStore::with_minimal_jdk();
        let int = Type::class(store.class_id("int").unwrap(), vec![]);
        let integer = Type::class(store.well_known().integer, vec![]);

        assert_eq!(int.boxed(&store), integer);
        assert_eq!(integer.unboxed(&store), int);
        assert!(int.is_primitive(&store));
        assert!(int.is_numeric_primitive(&store));
        assert!(!integer.is_primitive(&store));

        let boolean = Type::class(store.class_id("boolean").unwrap(), vec![]);
        assert!(!boolean.is_numeric_primitive(&store));

        let string = Type::class(store.well_known().string, vec![]);
        assert_eq!(string.boxed(&store), string);
    }
}
