//! Parser for the generic signature grammar stored in `Signature`
//! attributes (JVMS 4.7.9.1).
//!
//! Signatures are the erased descriptors' generic-aware counterpart:
//! class signatures carry declared type parameters and parameterized
//! supertypes, field signatures a single parameterized type, and method
//! signatures parameters, return type, and throws clauses. Parsing is
//! strict: truncated input and trailing garbage are both errors.

#![forbid(unsafe_code)]

mod error;
mod signature;

pub use error::{Error, Result};
pub use signature::{
    parse_class_signature, parse_field_signature, parse_method_signature, BaseType,
    ClassSignature, ClassTypeSegment, ClassTypeSignature, MethodSignature, ReturnType,
    TypeArgument, TypeParameter, TypeSignature,
};
