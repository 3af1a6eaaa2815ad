use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::primitive::PRIMITIVE_BOX_PAIRS;
use crate::types::Type;

/// Interned handle for a class, interface, or primitive known to a
/// [`TypeStore`]. This is the model's stand-in for a runtime class object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ClassId(u32);

impl ClassId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ClassKind {
    Class,
    Interface,
    Primitive,
}

/// A declared type parameter: its name and declared upper bounds.
///
/// Bounds may reference the parameter itself (`T extends Comparable<T>`);
/// such references are stored as bare name-only variables, so declaration
/// and reference never recurse into each other.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeParamDef {
    pub name: String,
    pub upper_bounds: Vec<Type>,
}

/// Declared metadata for one class or interface.
///
/// `super_class` and `interfaces` are generic declarations: their arguments
/// may be [`Type::Variable`]s naming the class's own type parameters
/// (`ArrayList<E>` declares `super_class = AbstractList<E>`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassDef {
    pub name: String,
    pub kind: ClassKind,
    pub type_params: Vec<TypeParamDef>,
    pub super_class: Option<Type>,
    pub interfaces: Vec<Type>,
}

/// Handles every query needs without a lookup by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WellKnownTypes {
    /// `java.lang.Object`, the universal top type.
    pub object: ClassId,
    pub string: ClassId,
    pub integer: ClassId,
}

/// Read-only class-metadata queries consumed by the algorithms.
///
/// Keeping the algorithms behind this trait means they never observe
/// mutation: loading happens against a concrete `&mut TypeStore`, queries
/// against `&dyn TypeEnv`.
pub trait TypeEnv {
    fn class(&self, id: ClassId) -> Option<&ClassDef>;
    fn lookup_class(&self, name: &str) -> Option<ClassId>;
    fn well_known(&self) -> &WellKnownTypes;
}

/// Owning implementation of [`TypeEnv`].
#[derive(Debug, Clone)]
pub struct TypeStore {
    classes: Vec<ClassDef>,
    by_name: HashMap<String, ClassId>,
    well_known: WellKnownTypes,
}

impl TypeStore {
    /// A store seeded with `java.lang.Object`, `java.lang.String`, and
    /// `java.lang.Integer` (the [`WellKnownTypes`] every query relies on).
    pub fn new() -> Self {
        let mut store = TypeStore {
            classes: Vec::new(),
            by_name: HashMap::new(),
            well_known: WellKnownTypes {
                object: ClassId(0),
                string: ClassId(0),
                integer: ClassId(0),
            },
        };

        let object = store.add_class(ClassDef {
            name: "java.lang.Object".to_string(),
            kind: ClassKind::Class,
            type_params: vec![],
            super_class: None,
            interfaces: vec![],
        });
        let string = store.add_class(ClassDef {
            name: "java.lang.String".to_string(),
            kind: ClassKind::Class,
            type_params: vec![],
            super_class: Some(Type::class(object, vec![])),
            interfaces: vec![],
        });
        let integer = store.add_class(ClassDef {
            name: "java.lang.Integer".to_string(),
            kind: ClassKind::Class,
            type_params: vec![],
            super_class: Some(Type::class(object, vec![])),
            interfaces: vec![],
        });

        store.well_known = WellKnownTypes {
            object,
            string,
            integer,
        };
        store
    }

    /// A store with the primitives, their boxes, and a small collections
    /// hierarchy. Enough for tests and demos without touching a real JDK.
    pub fn with_minimal_jdk() -> Self {
        let mut store = Self::new();
        let object = store.well_known.object;
        let object_ty = Type::class(object, vec![]);

        for (primitive, boxed) in PRIMITIVE_BOX_PAIRS {
            store.add_class(ClassDef {
                name: (*primitive).to_string(),
                kind: ClassKind::Primitive,
                type_params: vec![],
                super_class: None,
                interfaces: vec![],
            });
            if store.class_id(boxed).is_none() {
                store.add_class(ClassDef {
                    name: (*boxed).to_string(),
                    kind: ClassKind::Class,
                    type_params: vec![],
                    super_class: Some(object_ty.clone()),
                    interfaces: vec![],
                });
            }
        }

        let comparable = store.add_interface("java.lang.Comparable", &["T"], vec![]);
        let char_sequence = store.add_interface("java.lang.CharSequence", &[], vec![]);

        // String was seeded before the interfaces it implements existed.
        let string = store.well_known.string;
        let string_ty = Type::class(string, vec![]);
        if let Some(def) = store.class_mut(string) {
            def.interfaces = vec![
                Type::class(comparable, vec![string_ty]),
                Type::class(char_sequence, vec![]),
            ];
        }

        let iterable = store.add_interface("java.lang.Iterable", &["T"], vec![]);
        let collection = store.add_interface(
            "java.util.Collection",
            &["E"],
            vec![Type::class(iterable, vec![param("E")])],
        );
        let list = store.add_interface(
            "java.util.List",
            &["E"],
            vec![Type::class(collection, vec![param("E")])],
        );
        store.add_interface(
            "java.util.Set",
            &["E"],
            vec![Type::class(collection, vec![param("E")])],
        );

        let abstract_list = store.add_class(ClassDef {
            name: "java.util.AbstractList".to_string(),
            kind: ClassKind::Class,
            type_params: vec![object_param("E", &object_ty)],
            super_class: Some(object_ty.clone()),
            interfaces: vec![Type::class(list, vec![param("E")])],
        });
        store.add_class(ClassDef {
            name: "java.util.ArrayList".to_string(),
            kind: ClassKind::Class,
            type_params: vec![object_param("E", &object_ty)],
            super_class: Some(Type::class(abstract_list, vec![param("E")])),
            interfaces: vec![Type::class(list, vec![param("E")])],
        });

        let map = store.add_interface("java.util.Map", &["K", "V"], vec![]);
        store.add_class(ClassDef {
            name: "java.util.HashMap".to_string(),
            kind: ClassKind::Class,
            type_params: vec![object_param("K", &object_ty), object_param("V", &object_ty)],
            super_class: Some(object_ty.clone()),
            interfaces: vec![Type::class(map, vec![param("K"), param("V")])],
        });

        store
    }

    pub fn add_class(&mut self, def: ClassDef) -> ClassId {
        if let Some(existing) = self.by_name.get(&def.name) {
            let id = *existing;
            self.classes[id.index()] = def;
            return id;
        }
        let id = ClassId(self.classes.len() as u32);
        self.by_name.insert(def.name.clone(), id);
        self.classes.push(def);
        id
    }

    /// Intern a name, creating a placeholder definition if it is unknown.
    ///
    /// Placeholders are plain classes extending `Object`; loaders call
    /// [`TypeStore::define_class`] once the real metadata is available.
    pub fn intern_class_id(&mut self, name: &str) -> ClassId {
        if let Some(id) = self.by_name.get(name) {
            return *id;
        }
        let object = Type::class(self.well_known.object, vec![]);
        self.add_class(ClassDef {
            name: name.to_string(),
            kind: ClassKind::Class,
            type_params: vec![],
            super_class: Some(object),
            interfaces: vec![],
        })
    }

    /// Replace the definition behind `id` (typically a placeholder).
    pub fn define_class(&mut self, id: ClassId, def: ClassDef) {
        self.by_name.insert(def.name.clone(), id);
        self.classes[id.index()] = def;
    }

    pub fn class_id(&self, name: &str) -> Option<ClassId> {
        self.by_name.get(name).copied()
    }

    pub fn class_mut(&mut self, id: ClassId) -> Option<&mut ClassDef> {
        self.classes.get_mut(id.index())
    }

    fn add_interface(&mut self, name: &str, params: &[&str], interfaces: Vec<Type>) -> ClassId {
        let object_ty = Type::class(self.well_known.object, vec![]);
        self.add_class(ClassDef {
            name: name.to_string(),
            kind: ClassKind::Interface,
            type_params: params
                .iter()
                .copied()
                .map(|p| object_param(p, &object_ty))
                .collect(),
            super_class: None,
            interfaces,
        })
    }
}

impl Default for TypeStore {
    fn default() -> Self {
        Self::new()
    }
}

impl TypeEnv for TypeStore {
    fn class(&self, id: ClassId) -> Option<&ClassDef> {
        self.classes.get(id.index())
    }

    fn lookup_class(&self, name: &str) -> Option<ClassId> {
        self.class_id(name)
    }

    fn well_known(&self) -> &WellKnownTypes {
        &self.well_known
    }
}

/// A bare reference to a declared type parameter, bound at the declaration
/// site rather than here.
fn param(name: &str) -> Type {
    Type::Variable(crate::types::VariableType::unbounded(name))
}

fn object_param(name: &str, object_ty: &Type) -> TypeParamDef {
    TypeParamDef {
        name: name.to_string(),
        upper_bounds: vec![object_ty.clone()],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimal_jdk_defines_collections() {
        let store = TypeStore::with_minimal_jdk();
        for name in [
            "java.lang.Object",
            "java.lang.Integer",
            "java.util.List",
            "java.util.ArrayList",
            "java.util.Map",
            "int",
        ] {
            assert!(store.class_id(name).is_some(), "missing {name}");
        }
    }

    #[test]
    fn intern_creates_placeholder_until_defined() {
        let mut store = TypeStore::new();
        let id = store.intern_class_id("com.example.Later");
        assert_eq!(store.class_id("com.example.Later"), Some(id));
        assert_eq!(store.class(id).unwrap().kind, ClassKind::Class);

        store.define_class(
            id,
            ClassDef {
                name: "com.example.Later".to_string(),
                kind: ClassKind::Interface,
                type_params: vec![],
                super_class: None,
                interfaces: vec![],
            },
        );
        assert_eq!(store.class(id).unwrap().kind, ClassKind::Interface);
    }
}
