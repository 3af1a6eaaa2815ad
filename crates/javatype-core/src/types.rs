use serde::{Deserialize, Serialize};

use crate::error::TypeError;
use crate::resolve::common_ancestor;
use crate::store::{ClassId, TypeEnv};

/// A type, in one of exactly three shapes.
///
/// Values are immutable and compared structurally; building one never
/// mutates another. The three-shape set is closed on purpose: every
/// pairwise rule (assignability, substitution, rendering) is an exhaustive
/// match, so no combination can go unhandled.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Type {
    Concrete(ConcreteType),
    Array(ArrayType),
    Variable(VariableType),
}

/// A named class or interface together with its type arguments.
///
/// The argument list may be shorter than the class's declared parameter
/// count: missing positions read as the top type (raw-type compatibility).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ConcreteType {
    handle: ClassId,
    args: Vec<Type>,
}

/// A reified array: a non-array component plus a dimension count.
///
/// The component is never itself an array; stacking arrays merges their
/// dimension counts instead of nesting.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ArrayType {
    component: Box<Type>,
    dims: u32,
}

/// A bounded placeholder: a declared type parameter or a wildcard.
///
/// Upper bounds are types the variable must extend, lower bounds types
/// that must extend it. The erasure (the handle raw is-a checks see) is
/// cached at construction: the common ancestor of the upper bounds'
/// erasures, or the top type when there are none.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VariableType {
    name: String,
    upper: Vec<Type>,
    lower: Vec<Type>,
    erasure: Option<ClassId>,
}

impl Type {
    /// A concrete reference to `handle`. Callers at the model boundary
    /// should prefer [`ConcreteType::checked`].
    pub fn class(handle: ClassId, args: Vec<Type>) -> Type {
        Type::Concrete(ConcreteType { handle, args })
    }

    /// The universal top type (`java.lang.Object`).
    pub fn top(env: &dyn TypeEnv) -> Type {
        Type::class(env.well_known().object, vec![])
    }

    pub fn variable(
        env: &dyn TypeEnv,
        name: impl Into<String>,
        upper: Vec<Type>,
        lower: Vec<Type>,
    ) -> Type {
        Type::Variable(VariableType::new(env, name, upper, lower))
    }

    /// An array over `component` with `dims` dimensions. Rejects zero
    /// dimensions; an array component merges its dimensions into `dims`.
    pub fn array_of(component: Type, dims: u32) -> Result<Type, TypeError> {
        Ok(Type::Array(ArrayType::new(component, dims)?))
    }

    /// Adjust the array dimension count by `delta`.
    ///
    /// `0` is the identity. A positive `delta` wraps (or deepens) the
    /// array. A negative `delta` on an array peels dimensions; landing
    /// exactly on zero yields the bare component, going past zero is an
    /// error, as is a negative `delta` on a non-array.
    pub fn array(&self, delta: i64) -> Result<Type, TypeError> {
        let (component, have) = match self {
            Type::Array(a) => (a.element(), a.dims as i64),
            other => (other, 0),
        };
        let total = have + delta;
        match total {
            0 => Ok(component.clone()),
            t if t > 0 => Type::array_of(component.clone(), t as u32),
            _ => Err(TypeError::DimensionUnderflow {
                have: have as u32,
                removed: (-delta) as u32,
            }),
        }
    }

    pub fn is_concrete(&self) -> bool {
        matches!(self, Type::Concrete(_))
    }

    pub fn is_array(&self) -> bool {
        matches!(self, Type::Array(_))
    }

    pub fn is_variable(&self) -> bool {
        matches!(self, Type::Variable(_))
    }

    /// Whether this is the top type (`Object` raw).
    pub fn is_top(&self, env: &dyn TypeEnv) -> bool {
        matches!(self, Type::Concrete(c) if c.handle == env.well_known().object)
    }

    /// The handle raw is-a checks and boxing operate on.
    ///
    /// Arrays erase to the top type: the model stores no array classes, and
    /// reference arrays participate in bound computations as objects.
    pub fn erasure(&self, env: &dyn TypeEnv) -> ClassId {
        match self {
            Type::Concrete(c) => c.handle,
            Type::Array(_) => env.well_known().object,
            Type::Variable(v) => v.erasure(env),
        }
    }
}

impl ConcreteType {
    pub(crate) fn new(handle: ClassId, args: Vec<Type>) -> ConcreteType {
        ConcreteType { handle, args }
    }

    /// Boundary constructor: rejects a handle whose class denotes an array
    /// (arrays are expressed only through [`Type::Array`]).
    pub fn checked(
        env: &dyn TypeEnv,
        handle: ClassId,
        args: Vec<Type>,
    ) -> Result<ConcreteType, TypeError> {
        if let Some(def) = env.class(handle) {
            if def.name.contains('[') {
                return Err(TypeError::ArrayHandle(def.name.clone()));
            }
        }
        Ok(ConcreteType { handle, args })
    }

    pub fn handle(&self) -> ClassId {
        self.handle
    }

    pub fn args(&self) -> &[Type] {
        &self.args
    }

    pub fn arg_count(&self) -> usize {
        self.args.len()
    }

    /// The `i`-th type argument, defaulting to the top type beyond the
    /// stored list. This is defined behavior, not a failure: it is how raw
    /// types erase to `Object`.
    pub fn generic_argument(&self, env: &dyn TypeEnv, i: usize) -> Type {
        self.args.get(i).cloned().unwrap_or_else(|| Type::top(env))
    }

    /// Look up the binding for variable `name`: find its position among
    /// `paramed`'s arguments and read this (filled) type's argument there.
    pub fn resolve_var(&self, env: &dyn TypeEnv, name: &str, paramed: &ConcreteType) -> Option<Type> {
        paramed
            .args
            .iter()
            .position(|arg| matches!(arg, Type::Variable(v) if v.name == name))
            .map(|i| self.generic_argument(env, i))
    }
}

impl From<ConcreteType> for Type {
    fn from(value: ConcreteType) -> Type {
        Type::Concrete(value)
    }
}

impl ArrayType {
    pub(crate) fn new(component: Type, dims: u32) -> Result<ArrayType, TypeError> {
        if dims == 0 {
            return Err(TypeError::ZeroDimension);
        }
        match component {
            Type::Array(inner) => Ok(ArrayType {
                dims: dims + inner.dims,
                component: inner.component,
            }),
            other => Ok(ArrayType {
                component: Box::new(other),
                dims,
            }),
        }
    }

    pub fn dims(&self) -> u32 {
        self.dims
    }

    /// The element type under every dimension; never an array.
    pub fn element(&self) -> &Type {
        &self.component
    }

    /// The type with one dimension peeled off.
    pub fn component(&self) -> Type {
        if self.dims == 1 {
            (*self.component).clone()
        } else {
            Type::Array(ArrayType {
                component: self.component.clone(),
                dims: self.dims - 1,
            })
        }
    }
}

impl VariableType {
    pub fn new(
        env: &dyn TypeEnv,
        name: impl Into<String>,
        upper: Vec<Type>,
        lower: Vec<Type>,
    ) -> VariableType {
        // A top upper bound is redundant next to any other bound.
        let upper = if upper.iter().any(|t| !t.is_top(env)) {
            upper.into_iter().filter(|t| !t.is_top(env)).collect()
        } else {
            upper
        };

        let erasure = if upper.is_empty() {
            None
        } else {
            let handles: Vec<ClassId> = upper.iter().map(|t| t.erasure(env)).collect();
            Some(common_ancestor(env, &handles))
        };

        VariableType {
            name: name.into(),
            upper,
            lower,
            erasure,
        }
    }

    /// A bare reference to a variable declared elsewhere: no bounds of its
    /// own, erasing to the top type.
    pub fn unbounded(name: impl Into<String>) -> VariableType {
        VariableType {
            name: name.into(),
            upper: vec![],
            lower: vec![],
            erasure: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn upper(&self) -> &[Type] {
        &self.upper
    }

    pub fn lower(&self) -> &[Type] {
        &self.lower
    }

    pub fn erasure(&self, env: &dyn TypeEnv) -> ClassId {
        self.erasure.unwrap_or(env.well_known().object)
    }
}

impl From<VariableType> for Type {
    fn from(value: VariableType) -> Type {
        Type::Variable(value)
    }
}

/// A method viewed as types only: return, parameters, and the method's own
/// declared generic parameters. Built once, never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MethodType {
    ret: Type,
    params: Vec<Type>,
    generics: Vec<Type>,
}

impl MethodType {
    pub fn new(ret: Type, params: Vec<Type>, generics: Vec<Type>) -> MethodType {
        MethodType {
            ret,
            params,
            generics,
        }
    }

    pub fn ret(&self) -> &Type {
        &self.ret
    }

    pub fn params(&self) -> &[Type] {
        &self.params
    }

    pub fn generics(&self) -> &[Type] {
        &self.generics
    }

    pub fn generic_count(&self) -> usize {
        self.generics.len()
    }

    /// The `i`-th declared generic parameter, top beyond the list.
    pub fn type_parameter(&self, env: &dyn TypeEnv, i: usize) -> Type {
        self.generics.get(i).cloned().unwrap_or_else(|| Type::top(env))
    }

    /// Method-level binding lookup, mirroring
    /// [`ConcreteType::resolve_var`] over the generic parameter list.
    pub fn resolve_var(&self, env: &dyn TypeEnv, name: &str, paramed: &MethodType) -> Option<Type> {
        paramed
            .generics
            .iter()
            .position(|g| matches!(g, Type::Variable(v) if v.name == name))
            .map(|i| self.type_parameter(env, i))
    }
}
