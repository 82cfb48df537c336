//! Type representation for the variadic binding engine.
//!
//! Every type expression is interned into a `TypeId`; the structure behind an
//! id is a `TypeData`. Because argument lists are flattened before they are
//! interned (unpacked fixed-length tuples are spliced in), two parameterized
//! generics are structurally equal exactly when their `TypeId`s are equal.

use crate::def::DefId;
use serde::Serialize;
use varity_common::Atom;

// =============================================================================
// TypeId
// =============================================================================

/// Interned handle for a type expression.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct TypeId(pub u32);

impl TypeId {
    /// Error type, produced when instantiation gives up. Binds with anything
    /// so one failure does not cascade.
    pub const ERROR: TypeId = TypeId(0);
    pub const ANY: TypeId = TypeId(1);
    pub const NEVER: TypeId = TypeId(2);
    /// The `None` type.
    pub const NONE_TYPE: TypeId = TypeId(3);
    pub const OBJECT: TypeId = TypeId(4);
    pub const BOOL: TypeId = TypeId(5);
    pub const INT: TypeId = TypeId(6);
    pub const FLOAT: TypeId = TypeId(7);
    pub const STR: TypeId = TypeId(8);
    pub const BYTES: TypeId = TypeId(9);

    /// First id handed out for interned (non-intrinsic) types.
    pub const FIRST_USER: u32 = 100;

    #[inline]
    pub const fn is_intrinsic(self) -> bool {
        self.0 > 0 && self.0 < Self::FIRST_USER
    }

    #[inline]
    pub const fn is_error(self) -> bool {
        self.0 == Self::ERROR.0
    }

    #[inline]
    pub const fn is_any(self) -> bool {
        self.0 == Self::ANY.0
    }
}

/// Built-in concrete types.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum IntrinsicKind {
    Any,
    Never,
    NoneType,
    Object,
    Bool,
    Int,
    Float,
    Str,
    Bytes,
}

impl IntrinsicKind {
    pub const ALL: [IntrinsicKind; 9] = [
        IntrinsicKind::Any,
        IntrinsicKind::Never,
        IntrinsicKind::NoneType,
        IntrinsicKind::Object,
        IntrinsicKind::Bool,
        IntrinsicKind::Int,
        IntrinsicKind::Float,
        IntrinsicKind::Str,
        IntrinsicKind::Bytes,
    ];

    pub const fn to_type_id(self) -> TypeId {
        match self {
            IntrinsicKind::Any => TypeId::ANY,
            IntrinsicKind::Never => TypeId::NEVER,
            IntrinsicKind::NoneType => TypeId::NONE_TYPE,
            IntrinsicKind::Object => TypeId::OBJECT,
            IntrinsicKind::Bool => TypeId::BOOL,
            IntrinsicKind::Int => TypeId::INT,
            IntrinsicKind::Float => TypeId::FLOAT,
            IntrinsicKind::Str => TypeId::STR,
            IntrinsicKind::Bytes => TypeId::BYTES,
        }
    }

    pub const fn from_type_id(id: TypeId) -> Option<IntrinsicKind> {
        match id {
            TypeId::ANY => Some(IntrinsicKind::Any),
            TypeId::NEVER => Some(IntrinsicKind::Never),
            TypeId::NONE_TYPE => Some(IntrinsicKind::NoneType),
            TypeId::OBJECT => Some(IntrinsicKind::Object),
            TypeId::BOOL => Some(IntrinsicKind::Bool),
            TypeId::INT => Some(IntrinsicKind::Int),
            TypeId::FLOAT => Some(IntrinsicKind::Float),
            TypeId::STR => Some(IntrinsicKind::Str),
            TypeId::BYTES => Some(IntrinsicKind::Bytes),
            _ => None,
        }
    }

    /// Spelling used in annotations and diagnostics.
    pub const fn name(self) -> &'static str {
        match self {
            IntrinsicKind::Any => "Any",
            IntrinsicKind::Never => "Never",
            IntrinsicKind::NoneType => "None",
            IntrinsicKind::Object => "object",
            IntrinsicKind::Bool => "bool",
            IntrinsicKind::Int => "int",
            IntrinsicKind::Float => "float",
            IntrinsicKind::Str => "str",
            IntrinsicKind::Bytes => "bytes",
        }
    }

    pub fn from_name(name: &str) -> Option<IntrinsicKind> {
        IntrinsicKind::ALL.into_iter().find(|kind| kind.name() == name)
    }
}

/// Interned handle for an ordered list of types.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeListId(pub u32);

impl TypeListId {
    /// The empty list is always interned at index 0.
    pub const EMPTY: TypeListId = TypeListId(0);
}

// =============================================================================
// Type variables
// =============================================================================

/// Identity of a declared type variable.
///
/// Allocated once per declaration by `TypeInterner::declare_type_var` and
/// reused by every occurrence. Two declarations named `Ts` get two ids.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct TypeVarId(pub u32);

/// Whether a type variable binds one type or a sequence of types.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum VarKind {
    /// `T = TypeVar("T")`: bound to exactly one type.
    Single,
    /// `Ts = TypeVarTuple("Ts")`: bound to zero or more types.
    Variadic,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct TypeVarInfo {
    pub name: Atom,
    pub kind: VarKind,
}

// =============================================================================
// TypeData
// =============================================================================

/// Structural content of an interned type.
///
/// Invariants maintained by `TypeFactory` (raw `TypeInterner::intern` does
/// not check them):
/// - `VariadicVar` never appears directly inside a list; lists hold
///   `Unpack(VariadicVar)` instead.
/// - `Unpack` of a fixed-length tuple never appears inside a list; it is
///   spliced into the list at construction.
/// - A list holds at most one variadic element (`Unpack(VariadicVar)` or
///   `Unpack(UnboundedTuple)`).
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum TypeData {
    Intrinsic(IntrinsicKind),
    Error,
    /// Instance of a non-generic class, e.g. `Height`.
    Instance(DefId),
    /// A generic used without any argument list, e.g. bare `Array` or `Tuple`.
    Unparameterized(DefId),
    /// A generic with an argument list, e.g. `Array[Height, *Ts]`.
    /// Tuples are applications of `DefId::TUPLE`.
    Application(DefId, TypeListId),
    /// Homogeneous tuple of unknown length, `Tuple[X, ...]`.
    UnboundedTuple(TypeId),
    /// Reference to an ordinary type variable.
    TypeVar(TypeVarId),
    /// Bare reference to a variadic type variable. Only legal as the declared
    /// type of `*args`.
    VariadicVar(TypeVarId),
    /// `*X`: splices the elements of `X` into the enclosing list.
    Unpack(TypeId),
    Union(TypeListId),
    /// `Callable[[params...], ret]`.
    Callable { params: TypeListId, ret: TypeId },
}

/// Classification of one element of a type list.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ListItem {
    /// An element that occupies exactly one position.
    Fixed(TypeId),
    /// `*Ts`: a variadic variable occupying zero or more positions.
    Variadic(TypeVarId),
    /// `*Tuple[X, ...]`: zero or more positions, each of type `X`.
    Unbounded(TypeId),
}

impl ListItem {
    #[inline]
    pub const fn is_variadic_slot(self) -> bool {
        !matches!(self, ListItem::Fixed(_))
    }
}

// =============================================================================
// Signatures
// =============================================================================

/// How a function parameter receives call arguments.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ParamKind {
    Positional,
    /// `*args`: receives every remaining positional argument.
    VarArgs,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ParamInfo {
    pub name: Atom,
    pub type_id: TypeId,
    pub kind: ParamKind,
}

impl ParamInfo {
    pub const fn positional(name: Atom, type_id: TypeId) -> Self {
        ParamInfo {
            name,
            type_id,
            kind: ParamKind::Positional,
        }
    }

    pub const fn var_args(name: Atom, type_id: TypeId) -> Self {
        ParamInfo {
            name,
            type_id,
            kind: ParamKind::VarArgs,
        }
    }
}

/// One call signature of a function declaration.
///
/// `type_params` lists the variables owned by this signature in order of
/// first appearance; only these are inferred at call sites.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Signature {
    pub type_params: Vec<TypeVarId>,
    pub params: Vec<ParamInfo>,
    pub return_type: TypeId,
}

impl Signature {
    pub fn var_args(&self) -> Option<&ParamInfo> {
        self.params.iter().find(|p| p.kind == ParamKind::VarArgs)
    }

    pub fn positional(&self) -> impl Iterator<Item = &ParamInfo> {
        self.params
            .iter()
            .filter(|p| p.kind == ParamKind::Positional)
    }
}

#[cfg(test)]
#[path = "../tests/types_tests.rs"]
mod tests;
