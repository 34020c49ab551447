use std::string::FromUtf8Error;

use thiserror::Error;

/// Returned by [`Variant::require`](crate::Variant::require) and friends when
/// the held alternative is not the requested one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("bad alternative access: expected `{expected}`, holding `{}`", .found.unwrap_or("<valueless>"))]
pub struct BadAlternativeAccess {
    pub expected: &'static str,
    /// `None` when the variant is valueless.
    pub found: Option<&'static str>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Error)]
#[error("cannot visit a valueless variant")]
pub struct VisitValuelessError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum VarUintError {
    #[error("empty varuint")]
    Empty,
    #[error("truncated varuint")]
    Truncated,
    #[error("varuint overflows 64 bits")]
    Overflow,
    #[error("varuint is not minimally encoded")]
    NonMinimal,
    #[error("{0} trailing byte(s) after varuint")]
    Trailing(usize),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EncodeError {
    #[error("cannot encode a valueless variant")]
    Valueless,
    #[error("tree writer has no child at index {0}")]
    MissingChild(usize),
    #[error("while encoding alternative {index} (`{name}`): {source}")]
    InAlternative {
        index: usize,
        name: &'static str,
        source: Box<EncodeError>,
    },
    #[error("while encoding field `{field}`: {source}")]
    InField {
        field: &'static str,
        source: Box<EncodeError>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("malformed variant encoding: expected exactly 1 child, found {found}")]
    MalformedVariantEncoding { found: usize },
    #[error("alternative index {index} out of range for {count} alternative(s)")]
    AlternativeIndexOutOfRange { index: u64, count: usize },
    #[error("while decoding alternative {index} (`{name}`): {source}")]
    InAlternative {
        index: usize,
        name: &'static str,
        source: Box<DecodeError>,
    },
    #[error("while decoding field `{field}`: {source}")]
    InField {
        field: &'static str,
        source: Box<DecodeError>,
    },
    #[error("expected {expected} child(ren), found {found}")]
    ChildCount { expected: usize, found: usize },
    #[error("invalid varuint: {0}")]
    VarUint(#[from] VarUintError),
    #[error("invalid utf-8: {0}")]
    InvalidUtf8(#[from] FromUtf8Error),
    #[error("invalid bool value {0}")]
    InvalidBool(u64),
    #[error("expected {expected} bytes for a float, found {found}")]
    InvalidFloat { expected: usize, found: usize },
    #[error("value does not fit in `{target}`")]
    IntegerOverflow { target: &'static str },
}

/// One step on the way from the outermost value to a nested decode failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathStep {
    Alternative { index: usize, name: &'static str },
    Field(&'static str),
}

impl DecodeError {
    /// The alternatives and fields that were being decoded when the
    /// innermost error occurred, outermost first.
    pub fn path(&self) -> Vec<PathStep> {
        let mut path = Vec::new();
        let mut current = self;
        loop {
            match current {
                DecodeError::InAlternative {
                    index,
                    name,
                    source,
                } => {
                    path.push(PathStep::Alternative {
                        index: *index,
                        name: *name,
                    });
                    current = &**source;
                }
                DecodeError::InField { field, source } => {
                    path.push(PathStep::Field(*field));
                    current = &**source;
                }
                _ => return path,
            }
        }
    }

    /// The innermost error, with all context stripped.
    pub fn root_cause(&self) -> &DecodeError {
        match self {
            DecodeError::InAlternative { source, .. } | DecodeError::InField { source, .. } => {
                source.root_cause()
            }
            other => other,
        }
    }
}
