//! Binding environment for one binding pass.
//!
//! Each call site, explicit parameterization or alias expansion gets a fresh
//! `BindingEnvironment` pre-registered with the variables that site is
//! allowed to infer. Any other variable the binder meets is rigid: it only
//! matches itself.
//!
//! The environment is an `ena` unification table with one key per
//! registered variable. Keys are never unified with each other; the table
//! is used for its value-merge rule (see `consistency.rs`) and for its
//! snapshot/rollback log, which speculative union matching relies on.

use crate::instantiate::TypeSubstitution;
use crate::intern::TypeInterner;
use crate::types::{TypeId, TypeListId, TypeVarId, VarKind};
use ena::unify::{InPlace, InPlaceUnificationTable, Snapshot, UnifyKey};
use indexmap::IndexMap;

/// The value a variable is bound to.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum BoundValue {
    /// An ordinary variable's single type.
    Single(TypeId),
    /// A variadic variable's ordered sequence (possibly empty).
    Sequence(TypeListId),
}

/// Unification key for one registered variable.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct BindingKey(pub u32);

/// Wrapper for the bound value to implement `UnifyValue` (avoiding orphan rule).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BindingSlot(pub Option<BoundValue>);

impl UnifyKey for BindingKey {
    type Value = BindingSlot;

    fn index(&self) -> u32 {
        self.0
    }

    fn from_index(u: u32) -> Self {
        BindingKey(u)
    }

    fn tag() -> &'static str {
        "BindingKey"
    }
}

/// State of one variable in an environment.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BindingState {
    Unbound,
    Bound(BoundValue),
    /// A conflicting value was attempted; the pass has failed.
    Rejected,
}

/// Rollback point for speculative binding.
pub struct EnvSnapshot {
    table: Snapshot<InPlace<BindingKey>>,
    rejected_len: usize,
}

pub struct BindingEnvironment {
    pub(crate) table: InPlaceUnificationTable<BindingKey>,
    pub(crate) keys: IndexMap<TypeVarId, (BindingKey, VarKind)>,
    pub(crate) rejected: Vec<TypeVarId>,
}

impl BindingEnvironment {
    /// An environment that owns no variables.
    pub fn empty() -> Self {
        BindingEnvironment {
            table: InPlaceUnificationTable::new(),
            keys: IndexMap::new(),
            rejected: Vec::new(),
        }
    }

    /// An environment that infers exactly `owned`.
    pub fn new(interner: &TypeInterner, owned: &[TypeVarId]) -> Self {
        let mut env = Self::empty();
        for &var in owned {
            env.register(var, interner.type_var_kind(var));
        }
        env
    }

    /// Register a variable this pass may bind. Re-registering is a no-op.
    pub fn register(&mut self, var: TypeVarId, kind: VarKind) {
        if self.keys.contains_key(&var) {
            return;
        }
        let key = self.table.new_key(BindingSlot(None));
        self.keys.insert(var, (key, kind));
    }

    /// Whether `var` is inferred by this environment (as opposed to rigid).
    pub fn owns(&self, var: TypeVarId) -> bool {
        self.keys.contains_key(&var)
    }

    pub fn kind(&self, var: TypeVarId) -> Option<VarKind> {
        self.keys.get(&var).map(|&(_, kind)| kind)
    }

    pub fn state(&mut self, var: TypeVarId) -> BindingState {
        if self.rejected.contains(&var) {
            return BindingState::Rejected;
        }
        match self.probe(var) {
            Some(value) => BindingState::Bound(value),
            None => BindingState::Unbound,
        }
    }

    /// Current value of `var`, if it is owned and bound.
    pub fn probe(&mut self, var: TypeVarId) -> Option<BoundValue> {
        let &(key, _) = self.keys.get(&var)?;
        self.table.probe_value(key).0
    }

    pub fn snapshot(&mut self) -> EnvSnapshot {
        EnvSnapshot {
            table: self.table.snapshot(),
            rejected_len: self.rejected.len(),
        }
    }

    pub fn rollback_to(&mut self, snapshot: EnvSnapshot) {
        self.table.rollback_to(snapshot.table);
        self.rejected.truncate(snapshot.rejected_len);
    }

    pub fn commit(&mut self, snapshot: EnvSnapshot) {
        self.table.commit(snapshot.table);
    }

    /// Bound variables, in registration order.
    pub fn bindings(&mut self) -> Vec<(TypeVarId, BoundValue)> {
        let vars: Vec<TypeVarId> = self.keys.keys().copied().collect();
        vars.into_iter()
            .filter_map(|var| self.probe(var).map(|value| (var, value)))
            .collect()
    }

    /// Substitution holding every bound variable. Unbound variables are
    /// absent, so substitution leaves them in place.
    pub fn to_substitution(&mut self) -> TypeSubstitution {
        let mut subst = TypeSubstitution::new();
        for (var, value) in self.bindings() {
            subst.insert(var, value);
        }
        subst
    }
}

#[cfg(test)]
#[path = "../tests/environment_tests.rs"]
mod tests;
