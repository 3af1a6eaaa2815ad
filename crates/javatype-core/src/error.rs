use thiserror::Error;

/// Rejected-construction failures for the type model.
///
/// These are precondition violations: the value is never created and the
/// caller must not retry with the same input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TypeError {
    #[error("array dimension count must be at least 1")]
    ZeroDimension,

    #[error("cannot remove {removed} dimensions from a type with {have}")]
    DimensionUnderflow { have: u32, removed: u32 },

    #[error("class `{0}` denotes an array and cannot back a concrete type")]
    ArrayHandle(String),
}
