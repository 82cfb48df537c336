//! Consistency rule for repeated bindings.
//!
//! A variable may be bound any number of times within one pass as long as
//! every binding is the same value: an ordinary variable to the same type,
//! a variadic variable to a sequence with the same length and the same
//! types in the same order. Interned lists make that an id comparison.
//! Any other attempt fails the pass with `InconsistentBinding`.

use crate::diagnostics::BindFailure;
use crate::environment::{BindingEnvironment, BindingSlot, BoundValue};
use crate::types::{TypeVarId, VarKind};
use ena::unify::UnifyValue;
use tracing::trace;

/// Conflict reported by the unification table.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BindingConflict {
    pub existing: BoundValue,
    pub attempted: BoundValue,
}

impl UnifyValue for BindingSlot {
    type Error = BindingConflict;

    fn unify_values(a: &Self, b: &Self) -> Result<Self, Self::Error> {
        match (&a.0, &b.0) {
            (None, None) => Ok(BindingSlot(None)),
            (Some(value), None) | (None, Some(value)) => Ok(BindingSlot(Some(value.clone()))),
            (Some(existing), Some(attempted)) if existing == attempted => Ok(a.clone()),
            (Some(existing), Some(attempted)) => Err(BindingConflict {
                existing: existing.clone(),
                attempted: attempted.clone(),
            }),
        }
    }
}

impl BindingEnvironment {
    /// Record `value` for `var`, or check it against the value already
    /// recorded.
    ///
    /// The first binding is accepted as is. A later binding must be equal to
    /// it; otherwise the variable is marked rejected and the conflict is
    /// returned. A rejected variable rejects every further attempt.
    pub fn reconcile(&mut self, var: TypeVarId, value: BoundValue) -> Result<(), BindFailure> {
        let Some(&(key, kind)) = self.keys.get(&var) else {
            // Rigid variables never reach here; the binder matches them
            // structurally.
            return Ok(());
        };
        debug_assert!(
            matches!(
                (kind, &value),
                (VarKind::Single, BoundValue::Single(_))
                    | (VarKind::Variadic, BoundValue::Sequence(_))
            ),
            "binding shape does not match variable kind"
        );

        if self.rejected.contains(&var) {
            let existing = self
                .table
                .probe_value(key)
                .0
                .unwrap_or_else(|| value.clone());
            return Err(BindFailure::InconsistentBinding {
                var,
                existing,
                attempted: value,
            });
        }

        match self.table.unify_var_value(key, BindingSlot(Some(value))) {
            Ok(()) => {
                trace!(var = var.0, "reconcile: accepted");
                Ok(())
            }
            Err(BindingConflict {
                existing,
                attempted,
            }) => {
                trace!(var = var.0, ?existing, ?attempted, "reconcile: conflict");
                self.rejected.push(var);
                Err(BindFailure::InconsistentBinding {
                    var,
                    existing,
                    attempted,
                })
            }
        }
    }
}

#[cfg(test)]
#[path = "../tests/consistency_tests.rs"]
mod tests;
