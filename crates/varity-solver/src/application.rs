//! Explicit parameterization of generic classes: `Array[Height, Width]`.
//!
//! The supplied arguments are bound against the class's type parameters
//! with the ordinary binder, which checks arity, the variadic slot, and
//! unknown-length arguments. The resulting type is the application with the
//! (flattened) arguments as written; nothing is substituted.

use crate::alias::{flatten_with_origin, parameter_list, remap_index};
use crate::binder::Binder;
use crate::def::{DefId, DefKind, DefinitionInfo};
use crate::diagnostics::{ArgumentFailure, BindFailure};
use crate::environment::BindingEnvironment;
use crate::intern::TypeInterner;
use crate::type_factory::TypeFactory;
use crate::types::{TypeData, TypeId};
use tracing::debug;

/// Apply `args` to the generic declaration `def`.
///
/// `Tuple` accepts any argument list. For a class, each argument is matched
/// against the declared parameters; a failure carries the index of the
/// offending argument in `args`.
pub fn instantiate_generic(
    interner: &TypeInterner,
    def: DefId,
    info: &DefinitionInfo,
    args: &[TypeId],
) -> Result<TypeId, ArgumentFailure> {
    debug!(def = def.0, args = args.len(), "instantiate_generic");

    if info.kind == DefKind::Tuple {
        let (flat, _) = flatten_with_origin(interner, args)?;
        return TypeFactory::new(interner)
            .tuple(&flat)
            .map_err(|err| ArgumentFailure::new(BindFailure::from(err), None));
    }

    let (flat, origin) = flatten_with_origin(interner, args)?;
    let params = parameter_list(interner, &info.type_params);
    let mut env = BindingEnvironment::new(interner, &info.type_params);
    Binder::new(interner, &mut env)
        .bind_arguments(&params, &flat)
        .map_err(|failure| remap_index(failure, &origin))?;

    let list = interner.intern_type_list(&flat);
    Ok(interner.intern(TypeData::Application(def, list)))
}

#[cfg(test)]
#[path = "../tests/application_tests.rs"]
mod tests;
