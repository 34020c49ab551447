//! Single dispatch over whichever alternative is held.
//!
//! A visitor implements [`Visit`] (or [`Consume`]) once per alternative type.
//! The enum's [`Accept`] impl requires every one of those impls to share a
//! single `Output`, so a visitor with mismatched results does not build.

/// Handles a borrowed `T`.
pub trait Visit<T: ?Sized> {
    type Output;

    fn visit(&mut self, value: &T) -> Self::Output;
}

/// Handles an owned `T`.
pub trait Consume<T> {
    type Output;

    fn consume(&mut self, value: T) -> Self::Output;
}

/// Dispatches `&self` to the visitor method for the held alternative.
pub trait Accept<V, R> {
    fn accept(&self, visitor: &mut V) -> R;
}

/// Moves the held alternative into the visitor.
pub trait AcceptOwned<V, R> {
    fn accept_owned(self, visitor: &mut V) -> R;
}
