use proc_macro::TokenStream;
use syn::{parse_macro_input, Result};

mod common;

mod dynamic_variant;
mod resolve;
mod tree_codec;

#[inline]
fn result_of(doit: Result<impl Into<TokenStream>>) -> TokenStream {
    match doit {
        Ok(token_stream) => token_stream.into(),
        Err(err) => err.into_compile_error().into(),
    }
}

/// Turns an enum into a closed variant type for the `dynvar` runtime.
///
/// Every variant wraps exactly one alternative type, and declaration order is
/// the tag order. A unit variant `Foo` is rewritten to `Foo(Foo)`. A field
/// written as `Box<T>` holds alternative `T` behind a box, which is how an
/// alternative can contain the variant type itself.
///
/// ```
/// use dynvar::{Variant, Visit};
/// use dynvar_macros::{dynamic_variant, TreeCodec};
///
/// #[derive(Debug, Clone, TreeCodec)]
/// pub struct Empty;
///
/// #[derive(Debug, Clone, TreeCodec)]
/// pub struct Node {
///     head: u64,
///     tail: List,
/// }
///
/// #[dynamic_variant(codec)]
/// #[derive(Debug, Clone)]
/// pub enum ListAlternatives {
///     Empty,
///     Node(Box<Node>),
/// }
///
/// pub type List = Variant<ListAlternatives>;
///
/// struct Len;
///
/// impl Visit<Empty> for Len {
///     type Output = usize;
///     fn visit(&mut self, _: &Empty) -> usize {
///         0
///     }
/// }
///
/// impl Visit<Node> for Len {
///     type Output = usize;
///     fn visit(&mut self, node: &Node) -> usize {
///         1 + node.tail.visit(self).unwrap_or(0)
///     }
/// }
///
/// fn main() {
///     let list = List::new(Node { head: 1, tail: List::new(Empty) });
///     assert_eq!(list.visit(&mut Len), Ok(1));
///     assert_eq!(list.require::<Node>().map(|node| node.head), Ok(1));
///     assert!(list.get::<Empty>().is_none());
///
///     let tree = dynvar::codec::encode(&list).unwrap();
///     let decoded: List = dynvar::codec::decode(&tree).unwrap();
///     assert_eq!(decoded.tag(), Some(1));
/// }
/// ```
///
/// Arguments:
/// - `codec`: also implement `Encode` and `Decode` with the variant wire
///   shape, the tag as a varuint in the node value and the payload as its
///   only child.
/// - `crate = "path"`: where to find the runtime crate, `::dynvar` by
///   default.
///
/// On an alternative, `#[variant(from(T, U, ...))]` accepts values of the
/// listed types through their `From` conversion into that alternative. A
/// value whose type is exactly one of the alternatives always becomes that
/// alternative; otherwise it becomes the earliest alternative listing its
/// type.
///
/// Selection happens on the static type of the value. An unsuffixed integer
/// literal is only accepted when a single integer type converts into the
/// enum; with two, the literal falls back to `i32` and does not build:
///
/// ```compile_fail
/// use dynvar::Variant;
/// use dynvar_macros::dynamic_variant;
///
/// #[dynamic_variant]
/// enum TwoInts {
///     Count(u32),
///     Signed(i64),
///     Label(String),
/// }
///
/// fn main() {
///     let _ = Variant::<TwoInts>::from_value(3);
/// }
/// ```
///
/// `from(...)` goes through `From`, so only lossless conversions can be
/// listed. `from(i32)` on a `u32` alternative does not build either:
///
/// ```compile_fail
/// use dynvar_macros::dynamic_variant;
///
/// #[dynamic_variant]
/// enum Unsigned {
///     #[variant(from(i32))]
///     Count(u32),
///     Label(String),
/// }
///
/// fn main() {}
/// ```
///
/// Asking for a type that is not an alternative does not build:
///
/// ```compile_fail
/// use dynvar::Variant;
/// use dynvar_macros::dynamic_variant;
///
/// #[dynamic_variant]
/// enum Number {
///     Int(i64),
///     Text(String),
/// }
///
/// fn main() {
///     let n = Variant::<Number>::new(1i64);
///     let _ = n.get::<f32>();
/// }
/// ```
///
/// Neither does a type listed twice:
///
/// ```compile_fail
/// use dynvar_macros::dynamic_variant;
///
/// #[dynamic_variant]
/// enum Twice {
///     First(u8),
///     Second(u8),
/// }
///
/// fn main() {}
/// ```
///
/// Nor a visitor whose handlers disagree on the result type:
///
/// ```compile_fail
/// use dynvar::{Variant, Visit};
/// use dynvar_macros::dynamic_variant;
///
/// #[dynamic_variant]
/// enum Number {
///     Int(i64),
///     Text(String),
/// }
///
/// struct Mixed;
///
/// impl Visit<i64> for Mixed {
///     type Output = i64;
///     fn visit(&mut self, value: &i64) -> i64 {
///         *value
///     }
/// }
///
/// impl Visit<String> for Mixed {
///     type Output = String;
///     fn visit(&mut self, value: &String) -> String {
///         value.clone()
///     }
/// }
///
/// fn main() {
///     let n = Variant::<Number>::new(1i64);
///     let _ = n.visit(&mut Mixed);
/// }
/// ```
///
/// Nor assigning a value no alternative accepts:
///
/// ```compile_fail
/// use dynvar::Variant;
/// use dynvar_macros::dynamic_variant;
///
/// #[dynamic_variant]
/// enum Number {
///     #[variant(from(u8))]
///     Int(i64),
///     Text(String),
/// }
///
/// fn main() {
///     let mut n = Variant::<Number>::new(1i64);
///     n.assign(1.5f64);
/// }
/// ```
#[proc_macro_attribute]
pub fn dynamic_variant(args: TokenStream, input: TokenStream) -> TokenStream {
    result_of(dynamic_variant::doit(
        args.into(),
        parse_macro_input!(input),
    ))
}

/// Implements `Encode` and `Decode` for a record: an empty node value and
/// one child per field, in declaration order.
///
/// Takes `#[tree_codec(crate = "path")]` like `#[dynamic_variant]`.
#[proc_macro_derive(TreeCodec, attributes(tree_codec))]
pub fn tree_codec(input: TokenStream) -> TokenStream {
    result_of(tree_codec::doit(parse_macro_input!(input)))
}
