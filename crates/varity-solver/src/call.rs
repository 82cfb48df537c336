//! Call resolution against function signatures.
//!
//! A signature's call parameter list is its positional parameter types with
//! the expansion of `*args` in place of the `*args` parameter:
//!
//! ```text
//!   def f(x: T, *args: *Ts) -> Tuple[*Ts]         [T, *Ts]
//!   def g(*args: *Tuple[int, *Ts, str]) -> ...    [int, *Ts, str]
//!   def h(*args: int) -> ...                      [*Tuple[int, ...]]
//! ```
//!
//! Call arguments are flattened the same way: `f(*xs)` with
//! `xs: Tuple[int, str]` contributes `int, str`; with `xs: Tuple[int, ...]`
//! it contributes one open element that only a slot can absorb.

use crate::alias::remap_index;
use crate::binder::Binder;
use crate::def::DefId;
use crate::diagnostics::{ArgumentFailure, BindFailure, ConstructionError};
use crate::environment::{BindingEnvironment, BoundValue};
use crate::instantiate::{TypeSubstitution, instantiate_type_checked};
use crate::intern::{TypeInterner, TypeListBuffer};
use crate::recursion::RecursionProfile;
use crate::type_factory::TypeFactory;
use crate::types::{ParamKind, Signature, TypeData, TypeId, TypeVarId};
use std::sync::Arc;
use tracing::{debug, trace};
use varity_common::Span;
use varity_common::limits::MAX_OVERLOAD_CANDIDATES;

/// One argument expression at a call site, already typed.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct CallArgument {
    pub type_id: TypeId,
    /// `*expr` in the call.
    pub spread: bool,
    pub span: Span,
}

impl CallArgument {
    pub const fn positional(type_id: TypeId, span: Span) -> Self {
        CallArgument {
            type_id,
            spread: false,
            span,
        }
    }

    pub const fn spread(type_id: TypeId, span: Span) -> Self {
        CallArgument {
            type_id,
            spread: true,
            span,
        }
    }
}

/// Outcome of a successful call resolution.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CallResolution {
    /// Bound variables, in order of first appearance in the signature.
    pub bindings: Vec<(TypeVarId, BoundValue)>,
    pub substitution: TypeSubstitution,
    /// Return type with the bindings substituted.
    pub return_type: TypeId,
}

/// The overload chosen for a call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OverloadMatch {
    pub index: usize,
    pub resolution: CallResolution,
}

pub struct CallEvaluator<'a> {
    interner: &'a TypeInterner,
    max_depth: u32,
}

impl<'a> CallEvaluator<'a> {
    pub const fn new(interner: &'a TypeInterner) -> Self {
        CallEvaluator {
            interner,
            max_depth: RecursionProfile::Instantiation.max_depth(),
        }
    }

    #[must_use]
    pub const fn with_max_depth(mut self, max_depth: u32) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// The parameter list a call binds against.
    pub fn call_parameters(&self, signature: &Signature) -> Result<TypeListBuffer, ConstructionError> {
        let factory = TypeFactory::new(self.interner);
        let mut params = TypeListBuffer::new();
        for param in &signature.params {
            match param.kind {
                ParamKind::Positional => params.push(factory.standalone(param.type_id)?),
                ParamKind::VarArgs => params.extend(factory.var_args_elements(param.type_id)?),
            }
        }
        factory.normalize_list(&params)
    }

    /// Elements a spread argument contributes.
    fn spread_elements(&self, arg: &CallArgument) -> Result<TypeListBuffer, BindFailure> {
        let open = |element: TypeId| {
            let unbounded = self.interner.unbounded_tuple(element);
            self.interner.intern(TypeData::Unpack(unbounded))
        };
        let mut out = TypeListBuffer::new();
        match self.interner.lookup(arg.type_id) {
            Some(TypeData::Application(DefId::TUPLE, list)) => {
                out.extend(self.interner.type_list(list).iter().copied());
            }
            Some(TypeData::UnboundedTuple(element)) => out.push(open(element)),
            Some(TypeData::Unparameterized(DefId::TUPLE)) => out.push(open(TypeId::ANY)),
            _ if arg.type_id.is_any() => out.push(open(TypeId::ANY)),
            _ => {
                return Err(BindFailure::Construction(ConstructionError::InvalidUnpack {
                    target: arg.type_id,
                }));
            }
        }
        Ok(out)
    }

    /// Flatten call arguments, remembering which argument each element came
    /// from. Several open elements may result; the binder decides whether a
    /// slot can absorb them.
    pub fn flatten_arguments(
        &self,
        args: &[CallArgument],
    ) -> Result<(TypeListBuffer, Vec<usize>), ArgumentFailure> {
        let mut flat = TypeListBuffer::new();
        let mut origin = Vec::with_capacity(args.len());
        for (index, arg) in args.iter().enumerate() {
            if arg.spread {
                let elements = self
                    .spread_elements(arg)
                    .map_err(|failure| ArgumentFailure::new(failure, Some(index)))?;
                origin.extend(std::iter::repeat_n(index, elements.len()));
                flat.extend(elements);
            } else {
                origin.push(index);
                flat.push(arg.type_id);
            }
        }
        Ok((flat, origin))
    }

    /// Bind `args` against one signature and instantiate its return type.
    pub fn resolve(
        &self,
        signature: &Signature,
        args: &[CallArgument],
    ) -> Result<CallResolution, ArgumentFailure> {
        let params = self
            .call_parameters(signature)
            .map_err(|err| ArgumentFailure::new(err.into(), None))?;
        let (flat, origin) = self.flatten_arguments(args)?;
        debug!(
            params = params.len(),
            args = flat.len(),
            type_params = signature.type_params.len(),
            "CallEvaluator::resolve"
        );

        let mut env = BindingEnvironment::new(self.interner, &signature.type_params);
        Binder::new(self.interner, &mut env)
            .bind_arguments(&params, &flat)
            .map_err(|failure| remap_index(failure, &origin))?;

        let substitution = env.to_substitution();
        let bindings = env.bindings();
        let return_type = instantiate_type_checked(
            self.interner,
            signature.return_type,
            &substitution,
            self.max_depth,
        )?;
        Ok(CallResolution {
            bindings,
            substitution,
            return_type,
        })
    }

    /// Try each signature in declaration order; the first that binds wins.
    ///
    /// On failure, returns every candidate's failure in order.
    pub fn resolve_overloads(
        &self,
        signatures: &[Arc<Signature>],
        args: &[CallArgument],
    ) -> Result<OverloadMatch, Vec<ArgumentFailure>> {
        let mut failures = Vec::new();
        for (index, signature) in signatures.iter().take(MAX_OVERLOAD_CANDIDATES).enumerate() {
            match self.resolve(signature, args) {
                Ok(resolution) => {
                    debug!(index, "resolve_overloads: candidate matched");
                    return Ok(OverloadMatch { index, resolution });
                }
                Err(failure) => {
                    trace!(index, kind = %failure.kind(), "resolve_overloads: candidate rejected");
                    failures.push(failure);
                }
            }
        }
        Err(failures)
    }
}

#[cfg(test)]
#[path = "../tests/call_tests.rs"]
mod tests;
