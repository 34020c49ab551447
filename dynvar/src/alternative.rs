/// A closed, ordered set of alternative types, implemented by an enum whose
/// variants each wrap exactly one alternative.
///
/// Declaration order is significant: the position of an alternative is its
/// tag, and tags are what the tree codec writes.
pub trait Alternatives: Sized {
    /// Alternative names in declaration order.
    const NAMES: &'static [&'static str];

    /// Position of the held alternative in [`Self::NAMES`].
    fn index(&self) -> usize;

    fn count() -> usize {
        Self::NAMES.len()
    }

    fn name(&self) -> &'static str {
        Self::NAMES.get(self.index()).copied().unwrap_or("<unknown>")
    }
}

/// `impl Alternative<E> for T` places `T` at position [`Self::INDEX`] of `E`.
///
/// Resolving a type that is not one of `E`'s alternatives is a build error,
/// since no such impl exists. `Self::extract(Self::insert(t))` gives `t` back.
pub trait Alternative<E: Alternatives>: Sized {
    const INDEX: usize;
    const NAME: &'static str;

    fn insert(self) -> E;

    fn peek(alternatives: &E) -> Option<&Self>;

    fn peek_mut(alternatives: &mut E) -> Option<&mut Self>;

    /// Hands `alternatives` back untouched when it holds another alternative.
    fn extract(alternatives: E) -> Result<Self, E>;
}
