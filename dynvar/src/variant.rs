use std::fmt::{self, Debug, Formatter};

use crate::codec::{Decode, Encode};
use crate::tree::{TreeRead, TreeWrite};
use crate::{
    Accept, AcceptOwned, Alternative, Alternatives, BadAlternativeAccess, DecodeError,
    EncodeError, VisitValuelessError,
};

/// A value of the variant type `E`, or nothing at all.
///
/// The valueless state only comes from [`Default`], [`Variant::clear`],
/// [`Variant::take`] or a consuming visit; every construction from a value,
/// assignment and successful decode leaves a value in place.
///
/// Cloning is a deep copy: the clone owns its payload independently.
pub struct Variant<E> {
    slot: Option<E>,
}

impl<E> Default for Variant<E> {
    fn default() -> Self {
        Self { slot: None }
    }
}

impl<E: Clone> Clone for Variant<E> {
    fn clone(&self) -> Self {
        Self {
            slot: self.slot.clone(),
        }
    }
}

impl<E: Debug> Debug for Variant<E> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match &self.slot {
            Some(alternatives) => f.debug_tuple("Variant").field(alternatives).finish(),
            None => f.write_str("Variant(<valueless>)"),
        }
    }
}

impl<E: Alternatives> From<E> for Variant<E> {
    fn from(alternatives: E) -> Self {
        Self {
            slot: Some(alternatives),
        }
    }
}

impl<E> AsRef<Variant<E>> for Variant<E> {
    fn as_ref(&self) -> &Variant<E> {
        self
    }
}

impl<E: Alternatives> Variant<E> {
    pub const fn valueless() -> Self {
        Self { slot: None }
    }

    /// Holds `value` as alternative `T`.
    pub fn new<T: Alternative<E>>(value: T) -> Self {
        Self {
            slot: Some(value.insert()),
        }
    }

    /// Holds whichever alternative `value` converts to. The enum's `From`
    /// impls pick the alternative: an exact type match first, otherwise the
    /// earliest alternative declared as convertible from `U`.
    pub fn from_value<U: Into<E>>(value: U) -> Self {
        Self {
            slot: Some(value.into()),
        }
    }

    /// Replaces the current state with `value` held as alternative `T`.
    pub fn set<T: Alternative<E>>(&mut self, value: T) {
        self.slot = Some(value.insert());
    }

    /// Replaces the current state, resolving the alternative like
    /// [`Variant::from_value`].
    pub fn assign<U: Into<E>>(&mut self, value: U) {
        self.slot = Some(value.into());
    }

    /// Copies tag and payload from `other` verbatim, without re-resolving the
    /// alternative. `other` may be any wrapper that exposes the same variant
    /// type through `AsRef`.
    pub fn copy_from<D>(&mut self, other: &D)
    where
        D: AsRef<Variant<E>> + ?Sized,
        E: Clone,
    {
        self.slot = other.as_ref().slot.clone();
    }

    /// Moves tag and payload out of `other`, see [`Variant::copy_from`].
    pub fn move_from<D: Into<Variant<E>>>(&mut self, other: D) {
        self.slot = other.into().slot;
    }

    pub fn clear(&mut self) {
        self.slot = None;
    }

    /// Moves the current state out, leaving `self` valueless.
    pub fn take(&mut self) -> Self {
        Self {
            slot: self.slot.take(),
        }
    }

    /// `None` when valueless.
    pub fn tag(&self) -> Option<usize> {
        self.slot.as_ref().map(Alternatives::index)
    }

    pub fn is_valueless(&self) -> bool {
        self.slot.is_none()
    }

    pub fn alternative_name(&self) -> Option<&'static str> {
        self.slot.as_ref().map(Alternatives::name)
    }

    pub fn holds<T: Alternative<E>>(&self) -> bool {
        self.tag() == Some(T::INDEX)
    }

    /// The payload, if alternative `T` is held.
    pub fn get<T: Alternative<E>>(&self) -> Option<&T> {
        if !self.holds::<T>() {
            return None;
        }
        self.slot.as_ref().and_then(T::peek)
    }

    /// Writing through the returned reference changes the payload in place;
    /// the tag stays the same.
    pub fn get_mut<T: Alternative<E>>(&mut self) -> Option<&mut T> {
        if !self.holds::<T>() {
            return None;
        }
        self.slot.as_mut().and_then(T::peek_mut)
    }

    pub fn require<T: Alternative<E>>(&self) -> Result<&T, BadAlternativeAccess> {
        let found = self.alternative_name();
        self.get::<T>().ok_or(BadAlternativeAccess {
            expected: T::NAME,
            found,
        })
    }

    pub fn require_mut<T: Alternative<E>>(&mut self) -> Result<&mut T, BadAlternativeAccess> {
        let found = self.alternative_name();
        self.get_mut::<T>().ok_or(BadAlternativeAccess {
            expected: T::NAME,
            found,
        })
    }

    /// Moves the payload out if alternative `T` is held.
    pub fn into_alternative<T: Alternative<E>>(self) -> Result<T, BadAlternativeAccess> {
        let mismatch = BadAlternativeAccess {
            expected: T::NAME,
            found: self.alternative_name(),
        };
        if !self.holds::<T>() {
            return Err(mismatch);
        }
        self.slot
            .ok_or(mismatch)
            .and_then(|alternatives| T::extract(alternatives).map_err(|_| mismatch))
    }

    pub fn as_alternatives(&self) -> Option<&E> {
        self.slot.as_ref()
    }

    pub fn as_alternatives_mut(&mut self) -> Option<&mut E> {
        self.slot.as_mut()
    }

    pub fn into_alternatives(self) -> Option<E> {
        self.slot
    }

    /// Calls the visitor method for the held alternative, exactly once.
    pub fn visit<V, R>(&self, visitor: &mut V) -> Result<R, VisitValuelessError>
    where
        E: Accept<V, R>,
    {
        let alternatives = self.slot.as_ref().ok_or(VisitValuelessError)?;
        Ok(alternatives.accept(visitor))
    }

    /// Moves the payload into the visitor; `self` is valueless afterwards.
    pub fn consume<V, R>(&mut self, visitor: &mut V) -> Result<R, VisitValuelessError>
    where
        E: AcceptOwned<V, R>,
    {
        let alternatives = self.slot.take().ok_or(VisitValuelessError)?;
        Ok(alternatives.accept_owned(visitor))
    }
}

impl<E: Alternatives + Encode> Encode for Variant<E> {
    fn encode<W: TreeWrite>(&self, tree: &mut W) -> Result<(), EncodeError> {
        match &self.slot {
            Some(alternatives) => alternatives.encode(tree),
            None => Err(EncodeError::Valueless),
        }
    }
}

impl<E: Alternatives + Decode> Decode for Variant<E> {
    fn decode<R: TreeRead>(tree: &R) -> Result<Self, DecodeError> {
        E::decode(tree).map(Variant::from)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::testing::{End, Link, Scalar};
    use crate::{Consume, Visit};

    #[test]
    fn default_is_valueless() {
        let v = Variant::<Scalar>::default();
        assert!(v.is_valueless());
        assert_eq!(v.tag(), None);
        assert_eq!(v.get::<i64>(), None);
        assert_eq!(v.get::<String>(), None);
        assert_eq!(
            v.require::<i64>(),
            Err(BadAlternativeAccess {
                expected: "Int",
                found: None
            })
        );
        assert!(v.require::<String>().is_err());
    }

    #[test]
    fn construction_sets_tag() {
        let int = Variant::<Scalar>::new(3i64);
        assert_eq!(int.tag(), Some(0));
        assert_eq!(int.get::<i64>(), Some(&3));
        assert_eq!(int.get::<String>(), None);

        let text = Variant::<Scalar>::new(String::from("hello"));
        assert_eq!(text.tag(), Some(1));
        assert_eq!(text.alternative_name(), Some("Text"));
        assert_eq!(text.require::<String>().map(String::as_str), Ok("hello"));
        assert_eq!(
            text.require::<i64>(),
            Err(BadAlternativeAccess {
                expected: "Int",
                found: Some("Text")
            })
        );
    }

    #[test]
    fn mutable_access_keeps_tag() {
        let mut v = Variant::<Scalar>::new(3i64);
        if let Some(n) = v.get_mut::<i64>() {
            *n = 4;
        }
        assert_eq!(v.get::<i64>(), Some(&4));
        assert_eq!(v.tag(), Some(0));
        assert!(v.get_mut::<String>().is_none());
        assert!(v.require_mut::<String>().is_err());
    }

    #[test]
    fn assignment_replaces_state() {
        let mut v = Variant::<Scalar>::new(1i64);
        v.set(String::from("now text"));
        assert_eq!(v.tag(), Some(1));
        assert_eq!(v.get::<i64>(), None);

        v.clear();
        assert!(v.is_valueless());

        v.assign(Scalar::Int(9));
        assert_eq!(v.get::<i64>(), Some(&9));
    }

    #[test]
    fn clone_is_independent() {
        let original = Variant::<Scalar>::new(String::from("a"));
        let mut copy = original.clone();
        if let Some(text) = copy.get_mut::<String>() {
            text.push('b');
        }
        assert_eq!(original.get::<String>().map(String::as_str), Some("a"));
        assert_eq!(copy.get::<String>().map(String::as_str), Some("ab"));
    }

    #[test]
    fn copy_and_move_from_wrapper() {
        struct Wrapped(Variant<Scalar>);
        impl AsRef<Variant<Scalar>> for Wrapped {
            fn as_ref(&self) -> &Variant<Scalar> {
                &self.0
            }
        }
        impl From<Wrapped> for Variant<Scalar> {
            fn from(wrapped: Wrapped) -> Self {
                wrapped.0
            }
        }

        let wrapped = Wrapped(Variant::new(5i64));
        let mut target = Variant::<Scalar>::new(String::new());
        target.copy_from(&wrapped);
        assert_eq!(target.get::<i64>(), Some(&5));

        let mut moved = Variant::<Scalar>::default();
        moved.move_from(wrapped);
        assert_eq!(moved.get::<i64>(), Some(&5));

        let mut from_valueless = Variant::<Scalar>::new(1i64);
        from_valueless.copy_from(&Variant::<Scalar>::default());
        assert!(from_valueless.is_valueless());
    }

    #[test]
    fn into_alternative_moves_payload() {
        let v = Variant::<Scalar>::new(String::from("owned"));
        assert_eq!(v.clone().into_alternative::<String>(), Ok(String::from("owned")));
        assert_eq!(
            v.into_alternative::<i64>(),
            Err(BadAlternativeAccess {
                expected: "Int",
                found: Some("Text")
            })
        );
    }

    #[test]
    fn raw_alternatives_access() {
        let mut v = Variant::<Scalar>::valueless();
        assert!(v.is_valueless());
        assert_eq!(v.as_alternatives(), None);
        assert!(v.as_alternatives_mut().is_none());

        v.set(2i64);
        assert_eq!(v.as_alternatives(), Some(&Scalar::Int(2)));
        if let Some(alternatives) = v.as_alternatives_mut() {
            *alternatives = Scalar::Text(String::from("swapped"));
        }
        assert_eq!(v.tag(), Some(1));
        assert_eq!(
            v.into_alternatives(),
            Some(Scalar::Text(String::from("swapped")))
        );
        assert_eq!(Variant::<Scalar>::valueless().into_alternatives(), None);
    }

    struct Describe;

    impl Visit<i64> for Describe {
        type Output = String;
        fn visit(&mut self, value: &i64) -> String {
            format!("int {value}")
        }
    }

    impl Visit<String> for Describe {
        type Output = String;
        fn visit(&mut self, value: &String) -> String {
            format!("text {value}")
        }
    }

    impl Consume<i64> for Describe {
        type Output = String;
        fn consume(&mut self, value: i64) -> String {
            format!("took int {value}")
        }
    }

    impl Consume<String> for Describe {
        type Output = String;
        fn consume(&mut self, value: String) -> String {
            format!("took text {value}")
        }
    }

    #[test]
    fn visit_dispatches_on_tag() {
        let v = Variant::<Scalar>::new(7i64);
        assert_eq!(v.visit(&mut Describe), Ok(String::from("int 7")));
        let v = Variant::<Scalar>::new(String::from("x"));
        assert_eq!(v.visit(&mut Describe), Ok(String::from("text x")));
        assert_eq!(
            Variant::<Scalar>::default().visit(&mut Describe),
            Err(VisitValuelessError)
        );
    }

    #[test]
    fn consume_leaves_valueless() {
        let mut v = Variant::<Scalar>::new(String::from("y"));
        assert_eq!(v.consume(&mut Describe), Ok(String::from("took text y")));
        assert!(v.is_valueless());
        assert_eq!(v.consume(&mut Describe), Err(VisitValuelessError));
    }

    #[test]
    fn recursive_alternative() {
        let chain = Variant::<crate::testing::Chain>::new(Link {
            value: 1,
            next: Variant::new(Link {
                value: 2,
                next: Variant::new(End),
            }),
        });
        let first = chain.require::<Link>().map(|link| link.value);
        assert_eq!(first, Ok(1));
        let second = chain
            .get::<Link>()
            .and_then(|link| link.next.get::<Link>())
            .map(|link| link.value);
        assert_eq!(second, Some(2));
        assert!(chain.get::<End>().is_none());
    }
}
