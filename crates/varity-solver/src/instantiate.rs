//! Substitution of bound type variables into type expressions.
//!
//! Ordinary variables are replaced by their bound type. An unpacked
//! variadic variable `*Ts` inside a list is replaced by the bound sequence,
//! spliced in place:
//!
//! ```text
//!   Ts = (int, str)
//!   Tuple[bool, *Ts, None]  =>  Tuple[bool, int, str, None]
//!   Callable[[*Ts], int]    =>  Callable[[int, str], int]
//!   Ts = ()
//!   Array[*Ts]              =>  Array[()]
//! ```
//!
//! Variables without a binding are left in place. Results are rebuilt
//! through `TypeFactory`, so they satisfy the same invariants as types built
//! from annotations (spliced tuples, canonical unbounded tuples, flattened
//! unions).

use crate::def::DefId;
use crate::diagnostics::{BindFailure, ConstructionError};
use crate::environment::BoundValue;
use crate::intern::{TypeInterner, TypeListBuffer};
use crate::recursion::{DepthCounter, RecursionProfile};
use crate::type_factory::TypeFactory;
use crate::types::{TypeData, TypeId, TypeVarId};
use rustc_hash::FxHashMap;
use tracing::{debug, trace};

/// A mapping from type variables to their bound values.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TypeSubstitution {
    map: FxHashMap<TypeVarId, BoundValue>,
}

impl TypeSubstitution {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, var: TypeVarId, value: BoundValue) {
        self.map.insert(var, value);
    }

    /// Bind an ordinary variable.
    pub fn insert_single(&mut self, var: TypeVarId, type_id: TypeId) {
        self.insert(var, BoundValue::Single(type_id));
    }

    /// Bind a variadic variable to a sequence.
    pub fn insert_sequence(&mut self, interner: &TypeInterner, var: TypeVarId, items: &[TypeId]) {
        let list = interner.intern_type_list(items);
        self.insert(var, BoundValue::Sequence(list));
    }

    pub fn get(&self, var: TypeVarId) -> Option<&BoundValue> {
        self.map.get(&var)
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&TypeVarId, &BoundValue)> {
        self.map.iter()
    }
}

/// Rebuilds type expressions with a substitution applied.
pub struct TypeInstantiator<'a> {
    interner: &'a TypeInterner,
    factory: TypeFactory<'a>,
    subst: &'a TypeSubstitution,
    depth: DepthCounter,
    /// First rebuilt piece the factory rejected.
    invalid: Option<ConstructionError>,
}

impl<'a> TypeInstantiator<'a> {
    pub fn new(interner: &'a TypeInterner, subst: &'a TypeSubstitution) -> Self {
        Self::with_max_depth(
            interner,
            subst,
            RecursionProfile::Instantiation.max_depth(),
        )
    }

    pub fn with_max_depth(
        interner: &'a TypeInterner,
        subst: &'a TypeSubstitution,
        max_depth: u32,
    ) -> Self {
        TypeInstantiator {
            interner,
            factory: TypeFactory::new(interner),
            subst,
            depth: DepthCounter::new(max_depth),
            invalid: None,
        }
    }

    /// Whether the depth limit was exceeded during any `instantiate` call.
    pub const fn depth_exceeded(&self) -> bool {
        self.depth.is_exceeded()
    }

    /// Whether any part of the result had to be replaced by `ERROR`.
    pub const fn failed(&self) -> bool {
        self.invalid.is_some() || self.depth.is_exceeded()
    }

    /// The first construction error met while rebuilding, if any.
    pub fn invalid(&self) -> Option<&ConstructionError> {
        self.invalid.as_ref()
    }

    pub fn instantiate(&mut self, type_id: TypeId) -> TypeId {
        if self.subst.is_empty() || type_id.is_intrinsic() || type_id.is_error() {
            return type_id;
        }
        if !self.depth.enter() {
            debug!(type_id = type_id.0, "instantiate: depth limit exceeded");
            return TypeId::ERROR;
        }
        let result = self.instantiate_inner(type_id);
        self.depth.leave();
        result
    }

    fn instantiate_inner(&mut self, type_id: TypeId) -> TypeId {
        let Some(data) = self.interner.lookup(type_id) else {
            return type_id;
        };
        match data {
            TypeData::Intrinsic(_)
            | TypeData::Error
            | TypeData::Instance(_)
            | TypeData::Unparameterized(_) => type_id,

            TypeData::TypeVar(var) => match self.subst.get(var) {
                Some(BoundValue::Single(bound)) => *bound,
                _ => type_id,
            },
            // Bare `Ts` (a `*args` annotation) denotes the tuple of the
            // arguments it received.
            TypeData::VariadicVar(var) => match self.subst.get(var) {
                Some(BoundValue::Sequence(list)) => {
                    let items = self.interner.type_list(*list);
                    self.rebuild(self.factory.tuple(&items))
                }
                _ => type_id,
            },
            TypeData::Unpack(inner) => {
                let inner = self.instantiate(inner);
                self.rebuild(self.factory.unpack(inner))
            }

            TypeData::Application(def, list) => {
                let items = self.instantiate_list(&self.interner.type_list(list));
                self.rebuild(self.factory.application(def, &items))
            }
            TypeData::UnboundedTuple(element) => {
                let element = self.instantiate(element);
                self.rebuild(self.factory.unbounded_tuple(element))
            }
            TypeData::Union(list) => {
                let members = self.instantiate_list(&self.interner.type_list(list));
                self.rebuild(self.factory.union(&members))
            }
            TypeData::Callable { params, ret } => {
                let params = self.instantiate_list(&self.interner.type_list(params));
                let ret = self.instantiate(ret);
                self.rebuild(self.factory.callable(&params, ret))
            }
        }
    }

    /// Substitute into each element. `*Ts` with `Ts` bound becomes
    /// `*Tuple[...]`, which the factory splices when the list is rebuilt.
    fn instantiate_list(&mut self, items: &[TypeId]) -> TypeListBuffer {
        items.iter().map(|&item| self.instantiate(item)).collect()
    }

    fn rebuild(&mut self, result: Result<TypeId, ConstructionError>) -> TypeId {
        result.unwrap_or_else(|err| {
            trace!(?err, "instantiate: rebuilt type is invalid");
            self.invalid.get_or_insert(err);
            TypeId::ERROR
        })
    }
}

/// Apply `subst` to `type_id`.
pub fn instantiate_type(interner: &TypeInterner, type_id: TypeId, subst: &TypeSubstitution) -> TypeId {
    TypeInstantiator::new(interner, subst).instantiate(type_id)
}

/// Apply `subst` to `type_id`, failing if the depth limit was hit or a
/// rebuilt piece was invalid.
pub fn instantiate_type_checked(
    interner: &TypeInterner,
    type_id: TypeId,
    subst: &TypeSubstitution,
    max_depth: u32,
) -> Result<TypeId, BindFailure> {
    let mut instantiator = TypeInstantiator::with_max_depth(interner, subst, max_depth);
    let result = instantiator.instantiate(type_id);
    if instantiator.depth_exceeded() {
        return Err(BindFailure::InstantiationDepth);
    }
    if let Some(err) = instantiator.invalid.take() {
        return Err(err.into());
    }
    Ok(result)
}

/// `Tuple[...]` holding a bound sequence, or the bound type itself.
pub fn bound_value_type(interner: &TypeInterner, value: &BoundValue) -> TypeId {
    match value {
        BoundValue::Single(type_id) => *type_id,
        BoundValue::Sequence(list) => interner.intern(TypeData::Application(DefId::TUPLE, *list)),
    }
}

#[cfg(test)]
#[path = "../tests/instantiate_tests.rs"]
mod tests;
