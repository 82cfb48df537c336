//! Structural traversal over interned types.
//!
//! `TypeData` is shallow (children are `TypeId`s), so traversals only need
//! a way to enumerate the direct children of one node; the helpers below
//! are built on [`for_each_child`].

use crate::intern::TypeInterner;
use crate::types::{TypeData, TypeId, TypeVarId};
use indexmap::IndexSet;
use rustc_hash::FxHashSet;

/// Call `f` on every direct child of `type_id`, in source order.
pub fn for_each_child<F>(types: &TypeInterner, type_id: TypeId, mut f: F)
where
    F: FnMut(TypeId),
{
    let Some(data) = types.lookup(type_id) else {
        return;
    };
    match data {
        TypeData::Intrinsic(_)
        | TypeData::Error
        | TypeData::Instance(_)
        | TypeData::Unparameterized(_)
        | TypeData::TypeVar(_)
        | TypeData::VariadicVar(_) => {}
        TypeData::Application(_, list) | TypeData::Union(list) => {
            for &child in types.type_list(list).iter() {
                f(child);
            }
        }
        TypeData::UnboundedTuple(inner) | TypeData::Unpack(inner) => f(inner),
        TypeData::Callable { params, ret } => {
            for &child in types.type_list(params).iter() {
                f(child);
            }
            f(ret);
        }
    }
}

struct TypeVarCollector<'a> {
    types: &'a TypeInterner,
    visited: FxHashSet<TypeId>,
}

impl TypeVarCollector<'_> {
    fn visit(&mut self, type_id: TypeId, out: &mut IndexSet<TypeVarId>) {
        if !self.visited.insert(type_id) {
            return;
        }
        match self.types.lookup(type_id) {
            Some(TypeData::TypeVar(var)) | Some(TypeData::VariadicVar(var)) => {
                out.insert(var);
            }
            _ => {
                let mut children = Vec::new();
                for_each_child(self.types, type_id, |child| children.push(child));
                for child in children {
                    self.visit(child, out);
                }
            }
        }
    }
}

/// Collect every type variable mentioned in `type_id`, in order of first
/// appearance, appending to `out`.
pub fn collect_type_vars(types: &TypeInterner, type_id: TypeId, out: &mut IndexSet<TypeVarId>) {
    let mut collector = TypeVarCollector {
        types,
        visited: FxHashSet::default(),
    };
    collector.visit(type_id, out);
}

/// Whether `type_id` mentions any variable accepted by `is_target`.
pub fn contains_type_var<P>(types: &TypeInterner, type_id: TypeId, is_target: P) -> bool
where
    P: Fn(TypeVarId) -> bool,
{
    let mut vars = IndexSet::new();
    collect_type_vars(types, type_id, &mut vars);
    vars.into_iter().any(is_target)
}

#[cfg(test)]
#[path = "../tests/visitor_tests.rs"]
mod tests;
