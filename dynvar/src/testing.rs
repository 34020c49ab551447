//! Hand-written variant types for the crate's own tests.

use crate::codec::{self, Decode, Encode};
use crate::tree::{TreeRead, TreeWrite};
use crate::{
    Accept, AcceptOwned, Alternative, Alternatives, Consume, DecodeError, EncodeError, Variant,
    Visit,
};

macro_rules! alternatives {
    ($enum:ident { $($index:literal => $variant:ident($ty:ty)),* $(,)? }) => {
        impl Alternatives for $enum {
            const NAMES: &'static [&'static str] = &[$(stringify!($variant)),*];

            fn index(&self) -> usize {
                match self {
                    $($enum::$variant(_) => $index,)*
                }
            }
        }

        $(
            impl Alternative<$enum> for $ty {
                const INDEX: usize = $index;
                const NAME: &'static str = stringify!($variant);

                fn insert(self) -> $enum {
                    $enum::$variant(self)
                }

                fn peek(alternatives: &$enum) -> Option<&Self> {
                    match alternatives {
                        $enum::$variant(value) => Some(value),
                        _ => None,
                    }
                }

                fn peek_mut(alternatives: &mut $enum) -> Option<&mut Self> {
                    match alternatives {
                        $enum::$variant(value) => Some(value),
                        _ => None,
                    }
                }

                fn extract(alternatives: $enum) -> Result<Self, $enum> {
                    match alternatives {
                        $enum::$variant(value) => Ok(value),
                        other => Err(other),
                    }
                }
            }
        )*
    };
}

#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    Int(i64),
    Text(String),
}

alternatives!(Scalar {
    0 => Int(i64),
    1 => Text(String),
});

impl<V, R> Accept<V, R> for Scalar
where
    V: Visit<i64, Output = R> + Visit<String, Output = R>,
{
    fn accept(&self, visitor: &mut V) -> R {
        match self {
            Scalar::Int(value) => <V as Visit<i64>>::visit(visitor, value),
            Scalar::Text(value) => <V as Visit<String>>::visit(visitor, value),
        }
    }
}

impl<V, R> AcceptOwned<V, R> for Scalar
where
    V: Consume<i64, Output = R> + Consume<String, Output = R>,
{
    fn accept_owned(self, visitor: &mut V) -> R {
        match self {
            Scalar::Int(value) => <V as Consume<i64>>::consume(visitor, value),
            Scalar::Text(value) => <V as Consume<String>>::consume(visitor, value),
        }
    }
}

impl Encode for Scalar {
    fn encode<W: TreeWrite>(&self, tree: &mut W) -> Result<(), EncodeError> {
        codec::encode_variant(tree, self, |child| match self {
            Scalar::Int(value) => value.encode(child),
            Scalar::Text(value) => value.encode(child),
        })
    }
}

impl Decode for Scalar {
    fn decode<R: TreeRead>(tree: &R) -> Result<Self, DecodeError> {
        codec::decode_variant(tree, |index, child| match index {
            0 => i64::decode(child).map(Scalar::Int),
            _ => String::decode(child).map(Scalar::Text),
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct End;

#[derive(Debug, Clone)]
pub struct Link {
    pub value: u32,
    pub next: Variant<Chain>,
}

/// A singly linked list: `End` or a `Link` carrying the rest of the chain.
#[derive(Debug, Clone)]
pub enum Chain {
    End(End),
    Link(Box<Link>),
}

impl Alternatives for Chain {
    const NAMES: &'static [&'static str] = &["End", "Link"];

    fn index(&self) -> usize {
        match self {
            Chain::End(_) => 0,
            Chain::Link(_) => 1,
        }
    }
}

impl Alternative<Chain> for End {
    const INDEX: usize = 0;
    const NAME: &'static str = "End";

    fn insert(self) -> Chain {
        Chain::End(self)
    }

    fn peek(alternatives: &Chain) -> Option<&Self> {
        match alternatives {
            Chain::End(value) => Some(value),
            _ => None,
        }
    }

    fn peek_mut(alternatives: &mut Chain) -> Option<&mut Self> {
        match alternatives {
            Chain::End(value) => Some(value),
            _ => None,
        }
    }

    fn extract(alternatives: Chain) -> Result<Self, Chain> {
        match alternatives {
            Chain::End(value) => Ok(value),
            other => Err(other),
        }
    }
}

impl Alternative<Chain> for Link {
    const INDEX: usize = 1;
    const NAME: &'static str = "Link";

    fn insert(self) -> Chain {
        Chain::Link(Box::new(self))
    }

    fn peek(alternatives: &Chain) -> Option<&Self> {
        match alternatives {
            Chain::Link(value) => Some(&**value),
            _ => None,
        }
    }

    fn peek_mut(alternatives: &mut Chain) -> Option<&mut Self> {
        match alternatives {
            Chain::Link(value) => Some(&mut **value),
            _ => None,
        }
    }

    fn extract(alternatives: Chain) -> Result<Self, Chain> {
        match alternatives {
            Chain::Link(value) => Ok(*value),
            other => Err(other),
        }
    }
}

impl Encode for End {
    fn encode<W: TreeWrite>(&self, tree: &mut W) -> Result<(), EncodeError> {
        codec::encode_record(tree, 0);
        Ok(())
    }
}

impl Decode for End {
    fn decode<R: TreeRead>(tree: &R) -> Result<Self, DecodeError> {
        codec::expect_children(tree, 0)?;
        Ok(End)
    }
}

impl Encode for Link {
    fn encode<W: TreeWrite>(&self, tree: &mut W) -> Result<(), EncodeError> {
        codec::encode_record(tree, 2);
        codec::encode_field(tree, 0, "value", &self.value)?;
        codec::encode_field(tree, 1, "next", &self.next)
    }
}

impl Decode for Link {
    fn decode<R: TreeRead>(tree: &R) -> Result<Self, DecodeError> {
        codec::expect_children(tree, 2)?;
        Ok(Link {
            value: codec::decode_field(tree, 0, "value")?,
            next: codec::decode_field(tree, 1, "next")?,
        })
    }
}

impl Encode for Chain {
    fn encode<W: TreeWrite>(&self, tree: &mut W) -> Result<(), EncodeError> {
        codec::encode_variant(tree, self, |child| match self {
            Chain::End(value) => value.encode(child),
            Chain::Link(value) => value.encode(child),
        })
    }
}

impl Decode for Chain {
    fn decode<R: TreeRead>(tree: &R) -> Result<Self, DecodeError> {
        codec::decode_variant(tree, |index, child| match index {
            0 => End::decode(child).map(Chain::End),
            _ => Link::decode(child).map(|link| Chain::Link(Box::new(link))),
        })
    }
}
