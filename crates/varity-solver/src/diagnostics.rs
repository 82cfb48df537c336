//! Failure values produced by the solver, and their lazy rendering.
//!
//! ## Architecture: Lazy Diagnostics
//!
//! Binding runs speculatively during overload resolution and union matching,
//! and most failures there are discarded. Failures therefore carry raw ids
//! (`TypeId`, `TypeVarId`, `BoundValue`) and are turned into a
//! `PendingDiagnostic` with `DiagnosticArg` values. Strings are produced only
//! when a `TypeFormatter` renders the pending diagnostic for the user.

use crate::environment::BoundValue;
use crate::types::{TypeId, TypeVarId};
use serde::Serialize;
use std::fmt;
use std::sync::Arc;
use varity_common::Atom;
use varity_common::diagnostics::diagnostic_codes;

/// Coarse classification of every failure the engine can report.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum ErrorKind {
    Arity,
    UnknownLength,
    InconsistentBinding,
    MultipleVariadic,
    BareVariadic,
    VariadicPosition,
    TypeMismatch,
    InvalidUnpack,
    InstantiationDepth,
    NoMatchingOverload,
    /// Explicit arguments on a non-generic or unknown declaration.
    NotGeneric,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorKind::Arity => "arity",
            ErrorKind::UnknownLength => "unknown-length",
            ErrorKind::InconsistentBinding => "inconsistent-binding",
            ErrorKind::MultipleVariadic => "multiple-variadic",
            ErrorKind::BareVariadic => "bare-variadic",
            ErrorKind::VariadicPosition => "variadic-position",
            ErrorKind::TypeMismatch => "type-mismatch",
            ErrorKind::InvalidUnpack => "invalid-unpack",
            ErrorKind::InstantiationDepth => "instantiation-depth",
            ErrorKind::NoMatchingOverload => "no-matching-overload",
            ErrorKind::NotGeneric => "not-generic",
        };
        f.write_str(name)
    }
}

// =============================================================================
// Construction failures
// =============================================================================

/// A type expression or declaration that is structurally invalid.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ConstructionError {
    /// Two variadic elements in one list, or two variadic type parameters.
    MultipleVariadic { first: TypeId, second: TypeId },
    /// A variadic variable used without unpacking outside `*args`.
    BareVariadic { var: TypeVarId },
    /// A variadic alias parameter that is not the last parameter.
    VariadicPosition { var: TypeVarId, alias: Atom },
    /// `*X` where `X` is neither a tuple nor a variadic variable.
    InvalidUnpack { target: TypeId },
    /// `*X` used where a single type is expected.
    UnpackOutsideList { unpacked: TypeId },
}

impl ConstructionError {
    pub const fn kind(&self) -> ErrorKind {
        match self {
            ConstructionError::MultipleVariadic { .. } => ErrorKind::MultipleVariadic,
            ConstructionError::BareVariadic { .. } => ErrorKind::BareVariadic,
            ConstructionError::VariadicPosition { .. } => ErrorKind::VariadicPosition,
            ConstructionError::InvalidUnpack { .. }
            | ConstructionError::UnpackOutsideList { .. } => ErrorKind::InvalidUnpack,
        }
    }

    pub fn to_pending(&self) -> PendingDiagnostic {
        match *self {
            ConstructionError::MultipleVariadic { first, second } => {
                PendingDiagnostic::error(diagnostic_codes::MULTIPLE_VARIADIC)
                    .arg(first)
                    .arg(second)
            }
            ConstructionError::BareVariadic { var } => {
                PendingDiagnostic::error(diagnostic_codes::BARE_VARIADIC).arg(var)
            }
            ConstructionError::VariadicPosition { var, alias } => {
                PendingDiagnostic::error(diagnostic_codes::VARIADIC_NOT_LAST_ALIAS_PARAMETER)
                    .arg(var)
                    .arg(alias)
            }
            ConstructionError::InvalidUnpack { target } => {
                PendingDiagnostic::error(diagnostic_codes::INVALID_UNPACK).arg(target)
            }
            ConstructionError::UnpackOutsideList { unpacked } => {
                PendingDiagnostic::error(diagnostic_codes::UNPACK_OUTSIDE_LIST).arg(unpacked)
            }
        }
    }
}

// =============================================================================
// Binding failures
// =============================================================================

/// Why a binding pass (call, explicit parameterization, alias expansion)
/// failed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BindFailure {
    /// Too few or too many arguments. `at_least` is set when the parameter
    /// list has a variadic slot, so only a minimum applies.
    Arity {
        expected: usize,
        actual: usize,
        at_least: bool,
    },
    /// An argument of unknown length reached a position that needs a known
    /// length. `var` is the variadic variable it would have been bound to,
    /// or `None` when it landed on fixed parameters.
    UnknownLength {
        var: Option<TypeVarId>,
        source: TypeId,
    },
    /// A variable already bound to one value was required to take another.
    InconsistentBinding {
        var: TypeVarId,
        existing: BoundValue,
        attempted: BoundValue,
    },
    TypeMismatch {
        source: TypeId,
        target: TypeId,
    },
    InstantiationDepth,
    Construction(ConstructionError),
}

impl BindFailure {
    pub const fn kind(&self) -> ErrorKind {
        match self {
            BindFailure::Arity { .. } => ErrorKind::Arity,
            // Open elements against fixed parameters are reported as arity.
            BindFailure::UnknownLength { var: None, .. } => ErrorKind::Arity,
            BindFailure::UnknownLength { var: Some(_), .. } => ErrorKind::UnknownLength,
            BindFailure::InconsistentBinding { .. } => ErrorKind::InconsistentBinding,
            BindFailure::TypeMismatch { .. } => ErrorKind::TypeMismatch,
            BindFailure::InstantiationDepth => ErrorKind::InstantiationDepth,
            BindFailure::Construction(err) => err.kind(),
        }
    }

    pub fn to_pending(&self) -> PendingDiagnostic {
        match self {
            BindFailure::Arity {
                expected,
                actual,
                at_least,
            } => {
                let code = if *at_least {
                    diagnostic_codes::EXPECTED_AT_LEAST_ARGUMENTS
                } else {
                    diagnostic_codes::EXPECTED_ARGUMENTS
                };
                PendingDiagnostic::error(code).arg(*expected).arg(*actual)
            }
            BindFailure::UnknownLength {
                var: Some(var),
                source,
            } => PendingDiagnostic::error(diagnostic_codes::UNKNOWN_LENGTH_VARIADIC_BINDING)
                .arg(*var)
                .arg(*source),
            BindFailure::UnknownLength { var: None, source } => {
                PendingDiagnostic::error(diagnostic_codes::UNKNOWN_LENGTH_FIXED_PARAMETERS)
                    .arg(*source)
            }
            BindFailure::InconsistentBinding {
                var,
                existing,
                attempted,
            } => PendingDiagnostic::error(diagnostic_codes::INCONSISTENT_BINDING)
                .arg(*var)
                .arg(existing.clone())
                .arg(attempted.clone()),
            BindFailure::TypeMismatch { source, target } => {
                PendingDiagnostic::error(diagnostic_codes::ARGUMENT_TYPE_MISMATCH)
                    .arg(*source)
                    .arg(*target)
            }
            BindFailure::InstantiationDepth => {
                PendingDiagnostic::error(diagnostic_codes::INSTANTIATION_EXCESSIVELY_DEEP)
            }
            BindFailure::Construction(err) => err.to_pending(),
        }
    }
}

impl From<ConstructionError> for BindFailure {
    fn from(err: ConstructionError) -> Self {
        BindFailure::Construction(err)
    }
}

/// A binding failure at a call or instantiation site, with the index of the
/// site argument it is attributed to (when it can be attributed to one).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ArgumentFailure {
    pub failure: BindFailure,
    pub arg_index: Option<usize>,
}

impl ArgumentFailure {
    pub const fn new(failure: BindFailure, arg_index: Option<usize>) -> Self {
        ArgumentFailure { failure, arg_index }
    }

    pub const fn kind(&self) -> ErrorKind {
        self.failure.kind()
    }
}

impl From<BindFailure> for ArgumentFailure {
    fn from(failure: BindFailure) -> Self {
        ArgumentFailure::new(failure, None)
    }
}

// =============================================================================
// Pending diagnostics
// =============================================================================

/// A message argument, formatted only when rendered.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DiagnosticArg {
    /// A type reference (will be formatted via TypeFormatter)
    Type(TypeId),
    /// A type variable (rendered by name)
    Var(TypeVarId),
    /// A bound value (a type or a parenthesized sequence)
    Bound(BoundValue),
    /// An interned string
    Atom(Atom),
    /// A plain string
    String(Arc<str>),
    /// A number
    Number(usize),
}

macro_rules! impl_from_diagnostic_arg {
    ($($source:ty => $variant:ident),* $(,)?) => {
        $(impl From<$source> for DiagnosticArg {
            fn from(v: $source) -> Self { Self::$variant(v) }
        })*
    };
}

impl_from_diagnostic_arg! {
    TypeId     => Type,
    TypeVarId  => Var,
    BoundValue => Bound,
    Atom       => Atom,
    usize      => Number,
}

impl From<&str> for DiagnosticArg {
    fn from(s: &str) -> Self {
        Self::String(s.into())
    }
}

impl From<String> for DiagnosticArg {
    fn from(s: String) -> Self {
        Self::String(s.into())
    }
}

/// A diagnostic that hasn't been rendered yet.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PendingDiagnostic {
    pub code: u32,
    /// Arguments for the message template
    pub args: Vec<DiagnosticArg>,
}

impl PendingDiagnostic {
    pub const fn error(code: u32) -> Self {
        Self {
            code,
            args: Vec::new(),
        }
    }

    #[must_use]
    pub fn arg(mut self, arg: impl Into<DiagnosticArg>) -> Self {
        self.args.push(arg.into());
        self
    }
}

#[cfg(test)]
#[path = "../tests/diagnostics_tests.rs"]
mod tests;
