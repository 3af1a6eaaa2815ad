#![forbid(unsafe_code)]

//! A model of Java-style generic types and the algorithms a compiler runs
//! over them, independent of any live runtime.
//!
//! The model is a closed set of three type shapes ([`Type`]): concrete
//! class references with type arguments, reified arrays, and bounded
//! variables (type parameters and wildcards). On top of it sit three
//! algorithms:
//!
//! - assignability ([`is_assignable_to`]), covariant at the top level and
//!   invariant inside generic argument positions;
//! - generic hierarchy resolution ([`resolve_to_supertype`],
//!   [`resolve_to_subtype`]), which re-parameterizes a type as one of its
//!   ancestors or descendants;
//! - variable substitution ([`resolve_variables`]), which rewrites declared
//!   type variables against a filled instantiation.
//!
//! Class metadata (names, declared supertypes, declared type parameters)
//! comes from a [`TypeEnv`] collaborator; [`TypeStore`] is the in-memory
//! implementation. All values are immutable once built.

mod assign;
mod display;
mod error;
mod primitive;
mod resolve;
mod store;
mod subst;
mod types;

pub use crate::assign::{assignable, is_assignable_to, is_raw_subclass};
pub use crate::error::TypeError;
pub use crate::primitive::{box_of, is_primitive_name, unbox_of};
pub use crate::resolve::{
    common_ancestor, find_hierarchy_path, parameterized_type, resolve_to_subtype,
    resolve_to_supertype,
};
pub use crate::store::{
    ClassDef, ClassId, ClassKind, TypeEnv, TypeParamDef, TypeStore, WellKnownTypes,
};
pub use crate::subst::{resolve_variables, resolve_variables_in_method};
pub use crate::types::{ArrayType, ConcreteType, MethodType, Type, VariableType};
