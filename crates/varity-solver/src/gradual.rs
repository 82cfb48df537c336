//! Gradual assignability.
//!
//! Types here are nominal and invariant in their arguments; the only
//! subtyping comes from `Any`, `object`, `Never`, unions and the gradual
//! rules for generics used without an argument list:
//!
//! | Source | Target | Assignable |
//! |--------|--------|------------|
//! | `Array` | `Array[int, str]` | yes, gradual |
//! | `Array[int, str]` | `Array` | yes |
//! | `Tuple` | `Tuple[int, str]` | no, fixed-length tuples are exempt |
//! | `Tuple` | `Tuple[int, ...]` | yes |
//! | `Tuple[int, ...]` | `Tuple` | yes |
//!
//! Bare `Array` behaves like `Array[*Tuple[Any, ...]]` with respect to its
//! variadic parameter; the exemption for `Tuple` keeps length checking on
//! fixed-length tuples sound.

use crate::def::DefId;
use crate::intern::TypeInterner;
use crate::recursion::{DepthCounter, RecursionProfile};
use crate::types::{ListItem, TypeData, TypeId};
use std::cell::RefCell;
use tracing::trace;

pub struct GradualResolver<'a> {
    interner: &'a TypeInterner,
    depth: RefCell<DepthCounter>,
}

impl<'a> GradualResolver<'a> {
    pub const fn new(interner: &'a TypeInterner) -> Self {
        GradualResolver {
            interner,
            depth: RefCell::new(DepthCounter::with_profile(RecursionProfile::Assignability)),
        }
    }

    /// Whether a value of type `source` may be used where `target` is
    /// expected.
    pub fn is_assignable(&self, source: TypeId, target: TypeId) -> bool {
        if source == target || source.is_error() || target.is_error() {
            return true;
        }
        if source.is_any() || target.is_any() || target == TypeId::OBJECT {
            return true;
        }
        if source == TypeId::NEVER {
            return true;
        }

        if !self.depth.borrow_mut().enter() {
            trace!(
                depth = self.depth.borrow().depth(),
                "is_assignable: depth limit, assuming assignable"
            );
            return true;
        }
        let result = self.check(source, target);
        self.depth.borrow_mut().leave();
        result
    }

    /// Mutual assignability; used for invariant positions.
    pub fn is_consistent(&self, a: TypeId, b: TypeId) -> bool {
        self.is_assignable(a, b) && self.is_assignable(b, a)
    }

    fn check(&self, source: TypeId, target: TypeId) -> bool {
        let (Some(s), Some(t)) = (self.interner.lookup(source), self.interner.lookup(target))
        else {
            return false;
        };

        match (s, t) {
            (TypeData::Union(members), _) => self
                .interner
                .type_list(members)
                .iter()
                .all(|&member| self.is_assignable(member, target)),
            (_, TypeData::Union(members)) => self
                .interner
                .type_list(members)
                .iter()
                .any(|&member| self.is_assignable(source, member)),

            (TypeData::Unparameterized(a), TypeData::Unparameterized(b)) => a == b,
            (TypeData::Application(a, _), TypeData::Unparameterized(b)) => a == b,
            (TypeData::Unparameterized(a), TypeData::Application(b, _)) => {
                a == b && a != DefId::TUPLE
            }
            (TypeData::Application(a, source_list), TypeData::Application(b, target_list)) => {
                a == b
                    && self.lists_consistent(
                        &self.interner.type_list(source_list),
                        &self.interner.type_list(target_list),
                    )
            }

            (TypeData::Unparameterized(DefId::TUPLE), TypeData::UnboundedTuple(_))
            | (TypeData::UnboundedTuple(_), TypeData::Unparameterized(DefId::TUPLE)) => true,
            (TypeData::UnboundedTuple(a), TypeData::UnboundedTuple(b)) => self.is_assignable(a, b),
            (TypeData::Application(DefId::TUPLE, list), TypeData::UnboundedTuple(element)) => {
                self.interner
                    .type_list(list)
                    .iter()
                    .all(|&item| match self.interner.list_item(item) {
                        ListItem::Fixed(t) | ListItem::Unbounded(t) => {
                            self.is_assignable(t, element)
                        }
                        ListItem::Variadic(_) => element.is_any() || element == TypeId::OBJECT,
                    })
            }

            (
                TypeData::Callable {
                    params: source_params,
                    ret: source_ret,
                },
                TypeData::Callable {
                    params: target_params,
                    ret: target_ret,
                },
            ) => {
                self.lists_consistent(
                    &self.interner.type_list(source_params),
                    &self.interner.type_list(target_params),
                ) && self.is_assignable(source_ret, target_ret)
            }

            _ => false,
        }
    }

    /// Element-wise consistency of two argument lists.
    fn lists_consistent(&self, source: &[TypeId], target: &[TypeId]) -> bool {
        source.len() == target.len()
            && source.iter().zip(target).all(|(&s, &t)| {
                match (self.interner.list_item(s), self.interner.list_item(t)) {
                    (ListItem::Fixed(a), ListItem::Fixed(b))
                    | (ListItem::Unbounded(a), ListItem::Unbounded(b)) => {
                        self.is_consistent(a, b)
                    }
                    (ListItem::Variadic(a), ListItem::Variadic(b)) => a == b,
                    _ => false,
                }
            })
    }
}

/// Convenience wrapper for a one-off check.
pub fn is_assignable(interner: &TypeInterner, source: TypeId, target: TypeId) -> bool {
    GradualResolver::new(interner).is_assignable(source, target)
}

#[cfg(test)]
#[path = "../tests/gradual_tests.rs"]
mod tests;
