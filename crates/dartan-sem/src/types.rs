//! Type model of the semantic pass.
//!
//! Types are flat tags: the subset has no generics, so `List` and `Map`
//! carry no element types. `Num` is the common numeric supertype of
//! `Int` and `Double`; `Dynamic` opts out of static checking; `Unknown`
//! marks expressions the analyzer cannot type (and must never produce
//! diagnostics for).

use std::fmt;

use indexmap::IndexMap;

/// Type tag of a variable or expression.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Ty {
    Int,
    Double,
    /// Common numeric supertype
    Num,
    /// Dart's `String`
    Str,
    Bool,
    /// Type of the `null` literal
    Null,
    List,
    Map,
    /// Statically unchecked
    Dynamic,
    /// Not inferable (forward references, unknown calls)
    Unknown,
    /// User-declared type name
    Named(String),
}

impl Ty {
    /// Map a source-level type name to its tag.
    ///
    /// Unrecognized names become [`Ty::Named`]; any identifier used
    /// positionally as a type is legal in a declaration.
    pub fn from_name(name: &str) -> Ty {
        match name {
            "int" => Ty::Int,
            "double" => Ty::Double,
            "num" => Ty::Num,
            "String" => Ty::Str,
            "bool" => Ty::Bool,
            "Null" => Ty::Null,
            "List" => Ty::List,
            "Map" => Ty::Map,
            "dynamic" => Ty::Dynamic,
            other => Ty::Named(other.to_string()),
        }
    }

    /// `int`, `double` and `num` are numeric.
    pub fn is_numeric(&self) -> bool {
        matches!(self, Ty::Int | Ty::Double | Ty::Num)
    }

    /// Types the checker must not judge: `dynamic` by language rule,
    /// `unknown` to avoid false positives.
    pub fn is_unchecked(&self) -> bool {
        matches!(self, Ty::Dynamic | Ty::Unknown)
    }
}

impl fmt::Display for Ty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Ty::Int => write!(f, "int"),
            Ty::Double => write!(f, "double"),
            Ty::Num => write!(f, "num"),
            Ty::Str => write!(f, "String"),
            Ty::Bool => write!(f, "bool"),
            Ty::Null => write!(f, "Null"),
            Ty::List => write!(f, "List"),
            Ty::Map => write!(f, "Map"),
            Ty::Dynamic => write!(f, "dynamic"),
            Ty::Unknown => write!(f, "unknown"),
            Ty::Named(name) => write!(f, "{}", name),
        }
    }
}

/// Implicit conversion lattice: identity, `int → double`, and
/// `int|double → num`.
pub fn can_implicitly_convert(from: &Ty, to: &Ty) -> bool {
    if from == to {
        return true;
    }
    match (from, to) {
        (Ty::Int, Ty::Double) => true,
        (Ty::Int | Ty::Double, Ty::Num) => true,
        _ => false,
    }
}

/// Signature of a declared function.
///
/// Entries are registered at header sight, before the body is walked,
/// so recursive references resolve.
#[derive(Clone, Debug)]
pub struct FnSig {
    pub return_type: Ty,
    pub params: Vec<(Ty, String)>,
    /// Line of the header, for diagnostics
    pub line: u32,
}

/// Global function table, in declaration order.
pub type FunctionTable = IndexMap<String, FnSig>;
