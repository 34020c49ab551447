//! Closed, recursively definable tagged unions and a tree codec for them.
//!
//! A variant type is an enum implementing [`Alternatives`], where every enum
//! variant wraps one alternative type and each alternative type implements
//! [`Alternative`] for the enum. Recursive alternatives are boxed inside the
//! enum, so only they pay for an indirection. [`Variant`] adds the valueless
//! state on top and provides the accessors, assignment and visitation.
//!
//! These impls are normally generated by `#[dynamic_variant]` from the
//! `dynvar-macros` crate.

mod alternative;
pub mod codec;
mod error;
pub mod tree;
pub mod varuint;
mod variant;
mod visit;

#[cfg(test)]
mod testing;

pub use alternative::{Alternative, Alternatives};
pub use codec::{Decode, Encode};
pub use error::{
    BadAlternativeAccess, DecodeError, EncodeError, PathStep, VarUintError, VisitValuelessError,
};
pub use tree::{Tree, TreeRead, TreeWrite};
pub use variant::Variant;
pub use visit::{Accept, AcceptOwned, Consume, Visit};
