//! Which alternative a value of a given source type becomes.
//!
//! The procedure is ordered: an alternative whose type is exactly the source
//! type wins; failing that, the earliest alternative listing the source type
//! in `#[variant(from(...))]` wins. Types are compared syntactically.

use std::iter;

use syn::Type;

use crate::common::Alternative;

pub struct Conversion<'a> {
    pub source: &'a Type,
    /// Index of the chosen alternative.
    pub target: usize,
    /// `false` when the value goes through `From<source>` first.
    pub exact: bool,
}

pub fn select(alternatives: &[Alternative], source: &Type) -> Option<(usize, bool)> {
    alternatives
        .iter()
        .position(|alternative| &alternative.ty == source)
        .map(|index| (index, true))
        .or_else(|| {
            alternatives
                .iter()
                .position(|alternative| alternative.from.contains(source))
                .map(|index| (index, false))
        })
}

/// One conversion per distinct source type, in declaration order.
pub fn conversions(alternatives: &[Alternative]) -> Vec<Conversion<'_>> {
    let mut seen: Vec<&Type> = Vec::new();
    let mut conversions = Vec::new();
    let sources = alternatives
        .iter()
        .flat_map(|alternative| iter::once(&alternative.ty).chain(&alternative.from));
    for source in sources {
        if seen.contains(&source) {
            continue;
        }
        seen.push(source);
        if let Some((target, exact)) = select(alternatives, source) {
            conversions.push(Conversion {
                source,
                target,
                exact,
            });
        }
    }
    conversions
}
