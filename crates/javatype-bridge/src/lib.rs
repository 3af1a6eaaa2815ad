//! On-demand loading of external class metadata into a
//! [`TypeStore`], driven by generic signatures.
//!
//! A [`TypeProvider`] hands out [`ClassStub`]s (the raw facts a classfile
//! reader would produce); [`TypeLoader`] turns them into [`ClassDef`]s,
//! recursively pulling in every class a signature mentions. Loading is
//! cycle-safe: a class being built is visible to its own supertypes as a
//! placeholder.

#![forbid(unsafe_code)]

use std::collections::HashSet;

use thiserror::Error;
use tracing::{debug, trace};

use javatype_core::{
    ClassDef, ClassId, ClassKind, MethodType, Type, TypeEnv, TypeParamDef, TypeStore, VariableType,
};
use javatype_signature::{
    parse_class_signature, parse_field_signature, parse_method_signature, ClassTypeSignature,
    MethodSignature, ReturnType, TypeArgument, TypeParameter, TypeSignature,
};

const ACC_INTERFACE: u16 = 0x0200;

#[derive(Debug, Error)]
pub enum BridgeError {
    #[error("invalid signature for {context}: {source}")]
    Signature {
        context: String,
        source: javatype_signature::Error,
    },
    #[error(transparent)]
    Type(#[from] javatype_core::TypeError),
}

pub type Result<T> = std::result::Result<T, BridgeError>;

/// The raw facts about one class, as a classfile reader would report
/// them: binary names, access flags, and the optional generic signature.
#[derive(Debug, Clone)]
pub struct ClassStub {
    pub binary_name: String,
    pub access_flags: u16,
    /// `Signature` attribute text; when absent the erased
    /// `super_binary_name`/`interfaces` fields describe the hierarchy.
    pub signature: Option<String>,
    pub super_binary_name: Option<String>,
    pub interfaces: Vec<String>,
}

/// Source of [`ClassStub`]s, typically backed by a classpath index.
pub trait TypeProvider {
    fn lookup_type(&self, binary_name: &str) -> Option<ClassStub>;
}

/// Loads [`TypeProvider`] stubs into a [`TypeStore`] on demand.
pub struct TypeLoader<'a> {
    pub store: &'a mut TypeStore,
    pub provider: &'a dyn TypeProvider,
    in_progress: HashSet<String>,
    loaded: HashSet<String>,
    /// Names this loader interned without a real definition.
    placeholders: HashSet<String>,
}

impl<'a> TypeLoader<'a> {
    pub fn new(store: &'a mut TypeStore, provider: &'a dyn TypeProvider) -> Self {
        Self {
            store,
            provider,
            in_progress: HashSet::new(),
            loaded: HashSet::new(),
            placeholders: HashSet::new(),
        }
    }

    /// Ensure `binary_name` has a [`ClassId`], loading it from the
    /// provider when needed.
    ///
    /// A definition that already exists in the store and was not interned
    /// by this loader is left intact; the provider's stub is ignored for
    /// it. Names the provider cannot resolve become placeholder classes
    /// extending `Object`.
    pub fn ensure_class(&mut self, binary_name: &str) -> Result<ClassId> {
        if self.in_progress.contains(binary_name) {
            // Cycle: hand back the placeholder allocated by the outer call.
            return Ok(self.store.intern_class_id(binary_name));
        }
        if self.loaded.contains(binary_name) {
            return Ok(self.store.intern_class_id(binary_name));
        }
        if let Some(id) = self.store.class_id(binary_name) {
            if !self.placeholders.contains(binary_name) {
                self.loaded.insert(binary_name.to_string());
                return Ok(id);
            }
        }

        let Some(stub) = self.provider.lookup_type(binary_name) else {
            trace!(class = binary_name, "unresolved class, interning placeholder");
            let id = self.store.intern_class_id(binary_name);
            self.placeholders.insert(binary_name.to_string());
            return Ok(id);
        };

        let id = self.store.intern_class_id(binary_name);
        self.in_progress.insert(binary_name.to_string());
        let built = self.build_class_def(binary_name, &stub);
        self.in_progress.remove(binary_name);
        let def = built?;

        self.store.define_class(id, def);
        self.placeholders.remove(binary_name);
        self.loaded.insert(binary_name.to_string());
        debug!(class = binary_name, "loaded external class");
        Ok(id)
    }

    /// Convert a field signature into a [`Type`], loading every class it
    /// mentions.
    pub fn field_type(&mut self, signature: &str) -> Result<Type> {
        let parsed = parse_field_signature(signature).map_err(|source| BridgeError::Signature {
            context: signature.to_string(),
            source,
        })?;
        self.type_signature(&parsed)
    }

    /// Convert a method signature into a [`MethodType`]. Declared type
    /// parameters become the signature's bounded generic variables.
    pub fn method_type(&mut self, signature: &str) -> Result<MethodType> {
        let parsed = parse_method_signature(signature).map_err(|source| BridgeError::Signature {
            context: signature.to_string(),
            source,
        })?;
        self.convert_method(&parsed)
    }

    fn build_class_def(&mut self, binary_name: &str, stub: &ClassStub) -> Result<ClassDef> {
        let kind = if stub.access_flags & ACC_INTERFACE != 0 {
            ClassKind::Interface
        } else {
            ClassKind::Class
        };

        if let Some(sig) = stub.signature.as_deref() {
            let parsed = parse_class_signature(sig).map_err(|source| BridgeError::Signature {
                context: binary_name.to_string(),
                source,
            })?;

            let type_params = parsed
                .type_parameters
                .iter()
                .map(|tp| self.type_param(tp))
                .collect::<Result<Vec<_>>>()?;
            // An interface's superclass slot in the signature is always
            // Object; the model keeps it empty instead.
            let super_class = match kind {
                ClassKind::Interface => None,
                _ => Some(self.class_reference(&parsed.super_class)?),
            };
            let interfaces = parsed
                .interfaces
                .iter()
                .map(|iface| self.class_reference(iface))
                .collect::<Result<Vec<_>>>()?;

            return Ok(ClassDef {
                name: binary_name.to_string(),
                kind,
                type_params,
                super_class,
                interfaces,
            });
        }

        let super_class = match kind {
            ClassKind::Interface => None,
            _ => match stub.super_binary_name.as_deref() {
                Some(name) => Some(Type::class(self.ensure_class(name)?, vec![])),
                None => None,
            },
        };
        let interfaces = stub
            .interfaces
            .iter()
            .map(|name| Ok(Type::class(self.ensure_class(name)?, vec![])))
            .collect::<Result<Vec<_>>>()?;

        Ok(ClassDef {
            name: binary_name.to_string(),
            kind,
            type_params: vec![],
            super_class,
            interfaces,
        })
    }

    fn type_param(&mut self, tp: &TypeParameter) -> Result<TypeParamDef> {
        let mut upper_bounds = Vec::new();
        if let Some(bound) = &tp.class_bound {
            upper_bounds.push(self.type_signature(bound)?);
        }
        for bound in &tp.interface_bounds {
            upper_bounds.push(self.type_signature(bound)?);
        }
        if upper_bounds.is_empty() {
            upper_bounds.push(Type::class(self.store.well_known().object, vec![]));
        }
        Ok(TypeParamDef {
            name: tp.name.clone(),
            upper_bounds,
        })
    }

    fn type_signature(&mut self, sig: &TypeSignature) -> Result<Type> {
        match sig {
            TypeSignature::Base(base) => {
                let id = self.primitive_class(base.java_name());
                Ok(Type::class(id, vec![]))
            }
            // References to declared type parameters stay name-only; the
            // bounds live at the declaration site.
            TypeSignature::TypeVariable(name) => {
                Ok(Type::Variable(VariableType::unbounded(name)))
            }
            TypeSignature::Class(cls) => self.class_reference(cls),
            TypeSignature::Array(_) => {
                let mut dims = 0u32;
                let mut inner = sig;
                while let TypeSignature::Array(elem) = inner {
                    dims += 1;
                    inner = elem;
                }
                let element = self.type_signature(inner)?;
                Ok(Type::array_of(element, dims)?)
            }
        }
    }

    fn class_reference(&mut self, sig: &ClassTypeSignature) -> Result<Type> {
        let id = self.ensure_class(&sig.binary_name())?;
        // Outer segments of a nested class can carry their own arguments;
        // only the leaf's are representable, so the rest are dropped.
        let mut args = Vec::new();
        if let Some(leaf) = sig.segments.last() {
            for arg in &leaf.type_arguments {
                args.push(self.type_argument(arg)?);
            }
        }
        Ok(Type::class(id, args))
    }

    fn type_argument(&mut self, arg: &TypeArgument) -> Result<Type> {
        Ok(match arg {
            TypeArgument::Any => Type::Variable(VariableType::unbounded("?")),
            TypeArgument::Exact(ty) => self.type_signature(ty)?,
            TypeArgument::Extends(ty) => {
                let bound = self.type_signature(ty)?;
                Type::variable(&*self.store, "?", vec![bound], vec![])
            }
            TypeArgument::Super(ty) => {
                let bound = self.type_signature(ty)?;
                Type::variable(&*self.store, "?", vec![], vec![bound])
            }
        })
    }

    fn convert_method(&mut self, sig: &MethodSignature) -> Result<MethodType> {
        let mut generics = Vec::new();
        for tp in &sig.type_parameters {
            let def = self.type_param(tp)?;
            generics.push(Type::variable(
                &*self.store,
                &def.name,
                def.upper_bounds,
                vec![],
            ));
        }
        let params = sig
            .parameters
            .iter()
            .map(|p| self.type_signature(p))
            .collect::<Result<Vec<_>>>()?;
        let ret = match &sig.return_type {
            ReturnType::Void => {
                let id = self.primitive_class("void");
                Type::class(id, vec![])
            }
            ReturnType::Type(ty) => self.type_signature(ty)?,
        };
        Ok(MethodType::new(ret, params, generics))
    }

    fn primitive_class(&mut self, name: &str) -> ClassId {
        if let Some(id) = self.store.class_id(name) {
            return id;
        }
        self.store.add_class(ClassDef {
            name: name.to_string(),
            kind: ClassKind::Primitive,
            type_params: vec![],
            super_class: None,
            interfaces: vec![],
        })
    }
}
