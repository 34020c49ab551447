//! Encoding of values into [`Tree`]s.
//!
//! Scalars live in a node's value bytes: unsigned integers as a varuint,
//! signed integers as a zigzagged varuint, floats as little-endian bytes and
//! strings as UTF-8. Records leave the value empty and put one child per
//! field. A variant writes its tag as a varuint and its payload as the single
//! child, see [`encode_variant`].

use tracing::{debug, trace};

use crate::tree::{Tree, TreeRead, TreeWrite};
use crate::{varuint, Alternatives, DecodeError, EncodeError};

pub trait Encode {
    fn encode<W: TreeWrite>(&self, tree: &mut W) -> Result<(), EncodeError>;
}

pub trait Decode: Sized {
    fn decode<R: TreeRead>(tree: &R) -> Result<Self, DecodeError>;

    /// Overwrites `target` only when decoding succeeds.
    fn decode_into<R: TreeRead>(tree: &R, target: &mut Self) -> Result<(), DecodeError> {
        *target = Self::decode(tree)?;
        Ok(())
    }
}

pub fn encode<T: Encode + ?Sized>(value: &T) -> Result<Tree, EncodeError> {
    let mut tree = Tree::new();
    value.encode(&mut tree)?;
    Ok(tree)
}

pub fn decode<T: Decode, R: TreeRead>(tree: &R) -> Result<T, DecodeError> {
    T::decode(tree)
}

pub fn decode_into<T: Decode, R: TreeRead>(tree: &R, target: &mut T) -> Result<(), DecodeError> {
    T::decode_into(tree, target)
}

// ----------------------------------------------------------------------------
// Variants

/// Writes the variant wire shape: the tag as a varuint in the node's value,
/// then exactly one child, filled in by `payload`.
pub fn encode_variant<E, W, F>(tree: &mut W, alternatives: &E, payload: F) -> Result<(), EncodeError>
where
    E: Alternatives,
    W: TreeWrite,
    F: FnOnce(&mut W) -> Result<(), EncodeError>,
{
    let index = alternatives.index();
    let name = alternatives.name();
    trace!(index, name, "encoding variant");
    tree.set_value(varuint::encode(index as u64));
    tree.set_child_count(1);
    let child = tree.child_mut(0).ok_or(EncodeError::MissingChild(0))?;
    payload(child).map_err(|source| EncodeError::InAlternative {
        index,
        name,
        source: Box::new(source),
    })
}

/// Reads the variant wire shape. `payload` decodes the child for the
/// alternative at the given index; any error it returns is wrapped with that
/// alternative's index and name.
pub fn decode_variant<E, R, F>(tree: &R, payload: F) -> Result<E, DecodeError>
where
    E: Alternatives,
    R: TreeRead,
    F: FnOnce(usize, &R) -> Result<E, DecodeError>,
{
    let raw = varuint::decode(tree.value())?;
    let found = tree.child_count();
    if found != 1 {
        debug!(tag = raw, found, "variant node without exactly one child");
        return Err(DecodeError::MalformedVariantEncoding { found });
    }
    let count = E::count();
    let index = match usize::try_from(raw) {
        Ok(index) if index < count => index,
        _ => {
            debug!(tag = raw, count, "variant tag out of range");
            return Err(DecodeError::AlternativeIndexOutOfRange { index: raw, count });
        }
    };
    let name = E::NAMES[index];
    trace!(index, name, "decoding variant");
    let child = tree
        .child(0)
        .ok_or(DecodeError::MalformedVariantEncoding { found: 0 })?;
    payload(index, child).map_err(|source| {
        debug!(index, name, error = %source, "variant payload failed to decode");
        DecodeError::InAlternative {
            index,
            name,
            source: Box::new(source),
        }
    })
}

// ----------------------------------------------------------------------------
// Records

/// Starts a record node with `fields` children.
pub fn encode_record<W: TreeWrite>(tree: &mut W, fields: usize) {
    tree.set_value(Vec::new());
    tree.set_child_count(fields);
}

pub fn encode_field<T, W>(
    tree: &mut W,
    index: usize,
    field: &'static str,
    value: &T,
) -> Result<(), EncodeError>
where
    T: Encode + ?Sized,
    W: TreeWrite,
{
    let child = tree
        .child_mut(index)
        .ok_or(EncodeError::MissingChild(index))?;
    value.encode(child).map_err(|source| EncodeError::InField {
        field,
        source: Box::new(source),
    })
}

pub fn expect_children<R: TreeRead>(tree: &R, expected: usize) -> Result<(), DecodeError> {
    let found = tree.child_count();
    if found == expected {
        Ok(())
    } else {
        Err(DecodeError::ChildCount { expected, found })
    }
}

pub fn decode_field<T: Decode, R: TreeRead>(
    tree: &R,
    index: usize,
    field: &'static str,
) -> Result<T, DecodeError> {
    let child = tree.child(index).ok_or(DecodeError::ChildCount {
        expected: index + 1,
        found: tree.child_count(),
    })?;
    T::decode(child).map_err(|source| DecodeError::InField {
        field,
        source: Box::new(source),
    })
}

// ----------------------------------------------------------------------------
// Scalars

fn encode_scalar<W: TreeWrite>(tree: &mut W, value: Vec<u8>) {
    tree.set_value(value);
    tree.set_child_count(0);
}

macro_rules! unsigned {
    ($($ty:ty),*) => {$(
        impl Encode for $ty {
            fn encode<W: TreeWrite>(&self, tree: &mut W) -> Result<(), EncodeError> {
                encode_scalar(tree, varuint::encode(*self as u64));
                Ok(())
            }
        }

        impl Decode for $ty {
            fn decode<R: TreeRead>(tree: &R) -> Result<Self, DecodeError> {
                let raw = varuint::decode(tree.value())?;
                <$ty>::try_from(raw).map_err(|_| DecodeError::IntegerOverflow {
                    target: stringify!($ty),
                })
            }
        }
    )*};
}

unsigned!(u8, u16, u32, u64, usize);

macro_rules! signed {
    ($($ty:ty),*) => {$(
        impl Encode for $ty {
            fn encode<W: TreeWrite>(&self, tree: &mut W) -> Result<(), EncodeError> {
                let value = *self as i64;
                let zigzag = ((value << 1) ^ (value >> 63)) as u64;
                encode_scalar(tree, varuint::encode(zigzag));
                Ok(())
            }
        }

        impl Decode for $ty {
            fn decode<R: TreeRead>(tree: &R) -> Result<Self, DecodeError> {
                let zigzag = varuint::decode(tree.value())?;
                let value = ((zigzag >> 1) as i64) ^ -((zigzag & 1) as i64);
                <$ty>::try_from(value).map_err(|_| DecodeError::IntegerOverflow {
                    target: stringify!($ty),
                })
            }
        }
    )*};
}

signed!(i8, i16, i32, i64, isize);

macro_rules! float {
    ($($ty:ty),*) => {$(
        impl Encode for $ty {
            fn encode<W: TreeWrite>(&self, tree: &mut W) -> Result<(), EncodeError> {
                encode_scalar(tree, self.to_le_bytes().to_vec());
                Ok(())
            }
        }

        impl Decode for $ty {
            fn decode<R: TreeRead>(tree: &R) -> Result<Self, DecodeError> {
                let bytes = tree.value();
                let array = bytes.try_into().map_err(|_| DecodeError::InvalidFloat {
                    expected: std::mem::size_of::<$ty>(),
                    found: bytes.len(),
                })?;
                Ok(<$ty>::from_le_bytes(array))
            }
        }
    )*};
}

float!(f32, f64);

impl Encode for bool {
    fn encode<W: TreeWrite>(&self, tree: &mut W) -> Result<(), EncodeError> {
        encode_scalar(tree, varuint::encode(u64::from(*self)));
        Ok(())
    }
}

impl Decode for bool {
    fn decode<R: TreeRead>(tree: &R) -> Result<Self, DecodeError> {
        match varuint::decode(tree.value())? {
            0 => Ok(false),
            1 => Ok(true),
            other => Err(DecodeError::InvalidBool(other)),
        }
    }
}

impl Encode for str {
    fn encode<W: TreeWrite>(&self, tree: &mut W) -> Result<(), EncodeError> {
        encode_scalar(tree, self.as_bytes().to_vec());
        Ok(())
    }
}

impl Encode for String {
    fn encode<W: TreeWrite>(&self, tree: &mut W) -> Result<(), EncodeError> {
        self.as_str().encode(tree)
    }
}

impl Decode for String {
    fn decode<R: TreeRead>(tree: &R) -> Result<Self, DecodeError> {
        Ok(String::from_utf8(tree.value().to_vec())?)
    }
}

impl Encode for () {
    fn encode<W: TreeWrite>(&self, tree: &mut W) -> Result<(), EncodeError> {
        encode_record(tree, 0);
        Ok(())
    }
}

impl Decode for () {
    fn decode<R: TreeRead>(_tree: &R) -> Result<Self, DecodeError> {
        Ok(())
    }
}

// ----------------------------------------------------------------------------
// Containers

impl<T: Encode + ?Sized> Encode for Box<T> {
    fn encode<W: TreeWrite>(&self, tree: &mut W) -> Result<(), EncodeError> {
        (**self).encode(tree)
    }
}

impl<T: Decode> Decode for Box<T> {
    fn decode<R: TreeRead>(tree: &R) -> Result<Self, DecodeError> {
        T::decode(tree).map(Box::new)
    }
}

impl<T: Encode> Encode for Vec<T> {
    fn encode<W: TreeWrite>(&self, tree: &mut W) -> Result<(), EncodeError> {
        encode_record(tree, self.len());
        for (index, item) in self.iter().enumerate() {
            let child = tree
                .child_mut(index)
                .ok_or(EncodeError::MissingChild(index))?;
            item.encode(child)?;
        }
        Ok(())
    }
}

impl<T: Decode> Decode for Vec<T> {
    fn decode<R: TreeRead>(tree: &R) -> Result<Self, DecodeError> {
        let count = tree.child_count();
        (0..count)
            .map(|index| {
                tree.child(index)
                    .ok_or(DecodeError::ChildCount {
                        expected: count,
                        found: index,
                    })
                    .and_then(T::decode)
            })
            .collect()
    }
}

/// `None` has no children, `Some` has one.
impl<T: Encode> Encode for Option<T> {
    fn encode<W: TreeWrite>(&self, tree: &mut W) -> Result<(), EncodeError> {
        match self {
            Some(value) => {
                encode_record(tree, 1);
                let child = tree.child_mut(0).ok_or(EncodeError::MissingChild(0))?;
                value.encode(child)
            }
            None => {
                encode_record(tree, 0);
                Ok(())
            }
        }
    }
}

impl<T: Decode> Decode for Option<T> {
    fn decode<R: TreeRead>(tree: &R) -> Result<Self, DecodeError> {
        match tree.child_count() {
            0 => Ok(None),
            1 => tree
                .child(0)
                .ok_or(DecodeError::ChildCount {
                    expected: 1,
                    found: 0,
                })
                .and_then(T::decode)
                .map(Some),
            found => Err(DecodeError::ChildCount { expected: 1, found }),
        }
    }
}
