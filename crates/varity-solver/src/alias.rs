//! Generic type alias expansion.
//!
//! ```text
//!   IntTuple = Tuple[int, *Ts]
//!   IntTuple[float, bool]   =>  Tuple[int, float, bool]
//!   IntTuple                =>  Tuple[int]
//!
//!   Pair = Tuple[T, *Ts]
//!   Pair[str]               =>  Tuple[str]
//!   Pair[str, int, bytes]   =>  Tuple[str, int, bytes]
//! ```
//!
//! Alias parameters are matched against the supplied arguments with the
//! ordinary binder: leading ordinary parameters take one argument each and
//! the trailing variadic parameter (always last, checked at declaration)
//! takes the remainder. With no arguments at all, ordinary parameters
//! become `Any` and the variadic parameter becomes the empty sequence.

use crate::binder::Binder;
use crate::def::{DefKind, DefinitionInfo};
use crate::diagnostics::{ArgumentFailure, BindFailure};
use crate::environment::BindingEnvironment;
use crate::instantiate::{TypeSubstitution, instantiate_type_checked};
use crate::intern::{TypeInterner, TypeListBuffer};
use crate::recursion::RecursionProfile;
use crate::type_factory::TypeFactory;
use crate::types::{TypeId, TypeVarId, VarKind};
use tracing::{debug, trace};

pub struct AliasExpander<'a> {
    interner: &'a TypeInterner,
    max_depth: u32,
}

impl<'a> AliasExpander<'a> {
    pub const fn new(interner: &'a TypeInterner) -> Self {
        AliasExpander {
            interner,
            max_depth: RecursionProfile::Instantiation.max_depth(),
        }
    }

    #[must_use]
    pub const fn with_max_depth(mut self, max_depth: u32) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Expand `alias` applied to `args`.
    ///
    /// `None` (the alias used bare) and `Some(&[])` expand identically.
    /// Failures carry the index of the offending argument in `args`, before
    /// any `*Tuple[...]` argument is spliced.
    pub fn expand(
        &self,
        alias: &DefinitionInfo,
        args: Option<&[TypeId]>,
    ) -> Result<TypeId, ArgumentFailure> {
        debug_assert_eq!(alias.kind, DefKind::TypeAlias);
        let Some(body) = alias.body else {
            return Ok(TypeId::ERROR);
        };
        let args = args.unwrap_or(&[]);
        debug!(
            params = alias.type_params.len(),
            args = args.len(),
            "AliasExpander::expand"
        );

        let subst = if args.is_empty() {
            self.default_substitution(alias)
        } else {
            self.bind_arguments(alias, args)?
        };
        trace!(bound = subst.len(), "AliasExpander::expand: substituting");
        instantiate_type_checked(self.interner, body, &subst, self.max_depth)
            .map_err(ArgumentFailure::from)
    }

    fn default_substitution(&self, alias: &DefinitionInfo) -> TypeSubstitution {
        let mut subst = TypeSubstitution::new();
        for &var in &alias.type_params {
            match self.interner.type_var_kind(var) {
                VarKind::Single => subst.insert_single(var, TypeId::ANY),
                VarKind::Variadic => subst.insert_sequence(self.interner, var, &[]),
            }
        }
        subst
    }

    fn bind_arguments(
        &self,
        alias: &DefinitionInfo,
        args: &[TypeId],
    ) -> Result<TypeSubstitution, ArgumentFailure> {
        let (flat, origin) = flatten_with_origin(self.interner, args)?;
        let params = parameter_list(self.interner, &alias.type_params);
        let mut env = BindingEnvironment::new(self.interner, &alias.type_params);
        Binder::new(self.interner, &mut env)
            .bind_arguments(&params, &flat)
            .map_err(|failure| remap_index(failure, &origin))?;
        Ok(env.to_substitution())
    }
}

/// The parameter list a declaration's type parameters stand for:
/// `[T, *Ts]` for `(T, Ts)`.
pub fn parameter_list(interner: &TypeInterner, type_params: &[TypeVarId]) -> TypeListBuffer {
    type_params
        .iter()
        .map(|&var| match interner.type_var_kind(var) {
            VarKind::Single => interner.type_var(var),
            VarKind::Variadic => interner.unpacked_var(var),
        })
        .collect()
}

/// Flatten a site's argument list, remembering which site argument each
/// flattened element came from.
pub fn flatten_with_origin(
    interner: &TypeInterner,
    args: &[TypeId],
) -> Result<(TypeListBuffer, Vec<usize>), ArgumentFailure> {
    let factory = TypeFactory::new(interner);
    let mut flat = TypeListBuffer::new();
    let mut origin = Vec::with_capacity(args.len());
    for (index, &arg) in args.iter().enumerate() {
        let items = factory
            .normalize_list(&[arg])
            .map_err(|err| ArgumentFailure::new(BindFailure::from(err), Some(index)))?;
        origin.extend(std::iter::repeat_n(index, items.len()));
        flat.extend(items);
    }
    // The whole list must still hold at most one open element.
    factory
        .normalize_list(&flat)
        .map_err(|err| ArgumentFailure::new(BindFailure::from(err), None))?;
    Ok((flat, origin))
}

/// Map a flattened-element index back to the site argument it came from.
pub fn remap_index(mut failure: ArgumentFailure, origin: &[usize]) -> ArgumentFailure {
    failure.arg_index = failure
        .arg_index
        .and_then(|index| origin.get(index).copied());
    failure
}

#[cfg(test)]
#[path = "../tests/alias_tests.rs"]
mod tests;
