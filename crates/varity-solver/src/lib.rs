//! Variadic Type-Parameter Solver
//!
//! This crate binds and substitutes variadic type parameters ("type variable
//! tuples") for a gradually-typed checker. It uses:
//!
//! - **Interning**: every type expression is a `TypeId`, so structural
//!   equality after unpack flattening is id equality
//! - **Ena**: the per-site binding environment is a unification table whose
//!   value merge enforces binding consistency and whose snapshots back
//!   speculative union matching
//! - **Validated construction**: the single-variadic-slot and
//!   must-be-unpacked rules are enforced when types and declarations are
//!   built, before any call site is bound
//!
//! Key entry points:
//! - [`CallEvaluator`] resolves a call against one or more signatures
//! - [`instantiate_generic`] checks explicit parameterization of a class
//! - [`AliasExpander`] expands generic type aliases
//! - [`GradualResolver`] answers assignability where nothing is bound
mod alias;
mod application;
pub mod binder;
mod call;
mod consistency;
pub mod def;
mod diagnostics;
pub mod environment;
mod format;
pub mod gradual;
mod instantiate;
mod intern;
pub mod lower;
pub mod recursion;
mod type_factory;
pub mod types;
pub mod visitor;

pub use alias::{AliasExpander, parameter_list};
pub use application::instantiate_generic;
pub use binder::{Binder, bind_lists};
pub use call::{CallArgument, CallEvaluator, CallResolution, OverloadMatch};
pub use consistency::BindingConflict;
pub use def::{DefId, DefKind, DefinitionInfo, DefinitionStore};
pub use diagnostics::{
    ArgumentFailure, BindFailure, ConstructionError, DiagnosticArg, ErrorKind, PendingDiagnostic,
};
pub use environment::{BindingEnvironment, BindingState, BoundValue, EnvSnapshot};
pub use format::TypeFormatter;
pub use gradual::{GradualResolver, is_assignable};
pub use instantiate::{
    TypeInstantiator, TypeSubstitution, bound_value_type, instantiate_type,
    instantiate_type_checked,
};
pub use intern::{TypeInterner, TypeListBuffer};
pub use lower::{LowerError, LoweringScope, ScopeEntry, TypeLowering, TypeNode};
pub use type_factory::TypeFactory;
pub use types::*;
