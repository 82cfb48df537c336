//! Variadic binding: matching argument lists against parameter lists.
//!
//! A parameter list holds at most one variadic slot (`*Ts` or
//! `*Tuple[X, ...]`). Binding splits it into
//!
//! ```text
//!   params:  p0 .. p(k-1)   [slot]   s0 .. s(m-1)
//!   args:    a0 .. a(k-1)   middle   a(n-m) .. a(n-1)
//! ```
//!
//! The prefix and suffix bind one-to-one; the middle (possibly empty) goes to
//! the slot. The same procedure serves call arguments, explicit
//! parameterization (`Array[Height, Width]`) and alias expansion, and it
//! recurses into nested argument lists such as `Tuple[*Ts]` inside a
//! parameter type.
//!
//! Argument lists may contain open elements: a rigid `*Us` or an unknown
//! length `*Tuple[X, ...]`. They can only be absorbed by the slot.

use crate::def::DefId;
use crate::diagnostics::{ArgumentFailure, BindFailure, ConstructionError};
use crate::environment::{BindingEnvironment, BoundValue};
use crate::gradual::GradualResolver;
use crate::intern::{TypeInterner, TypeListBuffer};
use crate::recursion::{DepthCounter, RecursionProfile};
use crate::types::{ListItem, TypeData, TypeId, TypeVarId};
use crate::visitor::contains_type_var;
use tracing::{debug, trace};

pub struct Binder<'a, 'e> {
    interner: &'a TypeInterner,
    env: &'e mut BindingEnvironment,
    gradual: GradualResolver<'a>,
    depth: DepthCounter,
}

/// Where the variadic slot of a parameter list is, and what it holds.
#[derive(Copy, Clone, Debug)]
struct SlotLayout {
    index: usize,
    item: ListItem,
}

impl<'a, 'e> Binder<'a, 'e> {
    pub fn new(interner: &'a TypeInterner, env: &'e mut BindingEnvironment) -> Self {
        Binder {
            interner,
            env,
            gradual: GradualResolver::new(interner),
            depth: DepthCounter::with_profile(RecursionProfile::Binding),
        }
    }

    pub fn env(&mut self) -> &mut BindingEnvironment {
        &mut *self.env
    }

    /// Bind a site's argument list against its parameter list.
    ///
    /// Both lists must already be flattened (see `TypeFactory::normalize_list`).
    /// A failure is attributed to the index of the argument that caused it,
    /// when there is one.
    pub fn bind_arguments(
        &mut self,
        params: &[TypeId],
        args: &[TypeId],
    ) -> Result<(), ArgumentFailure> {
        debug!(params = params.len(), args = args.len(), "bind_arguments");
        self.bind_list_at(params, args)
    }

    /// Bind one parameter type against one argument type, recursing into
    /// nested lists.
    pub fn bind_type(&mut self, param: TypeId, arg: TypeId) -> Result<(), BindFailure> {
        if param.is_error() || arg.is_error() {
            return Ok(());
        }
        // An argument mentioning the site's own variables still has to bind
        // them, so identity only short-circuits for closed parameters.
        if param == arg && !self.mentions_owned(param) {
            return Ok(());
        }
        if !self.depth.enter() {
            return Err(BindFailure::InstantiationDepth);
        }
        let result = self.bind_type_inner(param, arg);
        self.depth.leave();
        result
    }

    fn bind_type_inner(&mut self, param: TypeId, arg: TypeId) -> Result<(), BindFailure> {
        let Some(param_data) = self.interner.lookup(param) else {
            return Err(self.mismatch(arg, param));
        };
        trace!(param = param.0, arg = arg.0, "bind_type");

        match param_data {
            TypeData::TypeVar(var) if self.env.owns(var) => {
                self.env.reconcile(var, BoundValue::Single(arg))
            }
            TypeData::Application(def, param_list) => {
                let param_list = self.interner.type_list(param_list);
                self.bind_application(def, param, &param_list, arg)
            }
            TypeData::UnboundedTuple(element) => self.bind_unbounded_tuple(element, param, arg),
            TypeData::Union(members) => {
                let members = self.interner.type_list(members);
                self.bind_union(param, &members, arg)
            }
            TypeData::Callable {
                params: param_params,
                ret: param_ret,
            } => match self.interner.lookup(arg) {
                Some(TypeData::Callable {
                    params: arg_params,
                    ret: arg_ret,
                }) => {
                    let param_params = self.interner.type_list(param_params);
                    let arg_params = self.interner.type_list(arg_params);
                    self.bind_list(&param_params, &arg_params)?;
                    self.bind_type(param_ret, arg_ret)
                }
                _ => self.check_assignable(arg, param),
            },
            TypeData::Unpack(_) | TypeData::VariadicVar(_) => Err(BindFailure::Construction(
                ConstructionError::UnpackOutsideList { unpacked: param },
            )),
            _ => self.check_assignable(arg, param),
        }
    }

    // =========================================================================
    // Lists
    // =========================================================================

    fn bind_list(&mut self, params: &[TypeId], args: &[TypeId]) -> Result<(), BindFailure> {
        self.bind_list_at(params, args).map_err(|f| f.failure)
    }

    fn bind_list_at(&mut self, params: &[TypeId], args: &[TypeId]) -> Result<(), ArgumentFailure> {
        let Some(slot) = self.find_slot(params) else {
            return self.bind_fixed_list(params, args);
        };

        let prefix = &params[..slot.index];
        let suffix = &params[slot.index + 1..];
        let fixed_needed = prefix.len() + suffix.len();
        if args.len() < fixed_needed {
            return Err(ArgumentFailure::new(
                BindFailure::Arity {
                    expected: fixed_needed,
                    actual: args.len(),
                    at_least: true,
                },
                None,
            ));
        }
        let middle_start = prefix.len();
        let middle_end = args.len() - suffix.len();

        for (i, &param) in prefix.iter().enumerate() {
            self.bind_fixed_position(param, args[i], i)?;
        }
        for (j, &param) in suffix.iter().enumerate() {
            let index = middle_end + j;
            self.bind_fixed_position(param, args[index], index)?;
        }

        let middle = &args[middle_start..middle_end];
        trace!(
            prefix = prefix.len(),
            middle = middle.len(),
            suffix = suffix.len(),
            "bind_list: split"
        );
        match slot.item {
            ListItem::Variadic(var) => {
                self.bind_variadic_slot(var, params[slot.index], middle, middle_start)
            }
            ListItem::Unbounded(element) => {
                self.bind_homogeneous_slot(element, params[slot.index], middle, middle_start)
            }
            ListItem::Fixed(_) => Ok(()),
        }
    }

    /// Parameter list without a slot: lengths must match exactly and no
    /// argument may be open.
    fn bind_fixed_list(&mut self, params: &[TypeId], args: &[TypeId]) -> Result<(), ArgumentFailure> {
        for (i, &arg) in args.iter().enumerate() {
            if self.interner.list_item(arg).is_variadic_slot() {
                return Err(ArgumentFailure::new(
                    BindFailure::UnknownLength {
                        var: None,
                        source: arg,
                    },
                    Some(i),
                ));
            }
        }
        if params.len() != args.len() {
            return Err(ArgumentFailure::new(
                BindFailure::Arity {
                    expected: params.len(),
                    actual: args.len(),
                    at_least: false,
                },
                None,
            ));
        }
        for (i, (&param, &arg)) in params.iter().zip(args).enumerate() {
            self.bind_type(param, arg)
                .map_err(|failure| ArgumentFailure::new(failure, Some(i)))?;
        }
        Ok(())
    }

    fn bind_fixed_position(
        &mut self,
        param: TypeId,
        arg: TypeId,
        index: usize,
    ) -> Result<(), ArgumentFailure> {
        if self.interner.list_item(arg).is_variadic_slot() {
            return Err(ArgumentFailure::new(
                BindFailure::UnknownLength {
                    var: None,
                    source: arg,
                },
                Some(index),
            ));
        }
        self.bind_type(param, arg)
            .map_err(|failure| ArgumentFailure::new(failure, Some(index)))
    }

    fn bind_variadic_slot(
        &mut self,
        var: TypeVarId,
        slot: TypeId,
        middle: &[TypeId],
        offset: usize,
    ) -> Result<(), ArgumentFailure> {
        let mut open: Option<TypeId> = None;
        for (i, &arg) in middle.iter().enumerate() {
            match self.interner.list_item(arg) {
                ListItem::Fixed(_) => {}
                ListItem::Unbounded(_) => {
                    return Err(ArgumentFailure::new(
                        BindFailure::UnknownLength {
                            var: Some(var),
                            source: arg,
                        },
                        Some(offset + i),
                    ));
                }
                ListItem::Variadic(_) => {
                    if let Some(first) = open {
                        return Err(ArgumentFailure::new(
                            ConstructionError::MultipleVariadic { first, second: arg }.into(),
                            Some(offset + i),
                        ));
                    }
                    open = Some(arg);
                }
            }
        }

        if !self.env.owns(var) {
            // Rigid: only the same unpacked variable matches.
            return match middle {
                [only] if *only == slot => Ok(()),
                _ => {
                    let source = self.sequence_as_tuple(middle);
                    Err(ArgumentFailure::new(
                        self.mismatch(source, slot),
                        middle.first().map(|_| offset),
                    ))
                }
            };
        }

        let list = self.interner.intern_type_list(middle);
        self.env
            .reconcile(var, BoundValue::Sequence(list))
            .map_err(|failure| ArgumentFailure::new(failure, middle.first().map(|_| offset)))
    }

    fn bind_homogeneous_slot(
        &mut self,
        element: TypeId,
        slot: TypeId,
        middle: &[TypeId],
        offset: usize,
    ) -> Result<(), ArgumentFailure> {
        for (i, &arg) in middle.iter().enumerate() {
            let result = match self.interner.list_item(arg) {
                ListItem::Fixed(t) | ListItem::Unbounded(t) => self.bind_type(element, t),
                ListItem::Variadic(_) => Err(self.mismatch(arg, slot)),
            };
            result.map_err(|failure| ArgumentFailure::new(failure, Some(offset + i)))?;
        }
        Ok(())
    }

    fn find_slot(&self, params: &[TypeId]) -> Option<SlotLayout> {
        params.iter().enumerate().find_map(|(index, &param)| {
            let item = self.interner.list_item(param);
            item.is_variadic_slot().then_some(SlotLayout { index, item })
        })
    }

    // =========================================================================
    // Structured parameter types
    // =========================================================================

    fn bind_application(
        &mut self,
        def: DefId,
        param: TypeId,
        param_list: &[TypeId],
        arg: TypeId,
    ) -> Result<(), BindFailure> {
        match self.interner.lookup(arg) {
            Some(TypeData::Application(arg_def, arg_list)) if arg_def == def => {
                let arg_list = self.interner.type_list(arg_list);
                self.bind_list(param_list, &arg_list)
            }
            Some(TypeData::UnboundedTuple(element)) if def == DefId::TUPLE => {
                // `Tuple[X, ...]` as an argument list is `[*Tuple[X, ...]]`.
                let unbounded = self.interner.unbounded_tuple(element);
                let open = self.interner.intern(TypeData::Unpack(unbounded));
                self.bind_list(param_list, &[open])
            }
            // Bare generic argument: gradual, and carries no binding
            // information. Fixed-length tuples are exempt.
            Some(TypeData::Unparameterized(arg_def)) if arg_def == def && def != DefId::TUPLE => {
                Ok(())
            }
            _ => self.check_assignable(arg, param),
        }
    }

    fn bind_unbounded_tuple(
        &mut self,
        element: TypeId,
        param: TypeId,
        arg: TypeId,
    ) -> Result<(), BindFailure> {
        match self.interner.lookup(arg) {
            Some(TypeData::UnboundedTuple(arg_element)) => self.bind_type(element, arg_element),
            Some(TypeData::Application(DefId::TUPLE, list)) => {
                let items = self.interner.type_list(list);
                for &item in items.iter() {
                    match self.interner.list_item(item) {
                        ListItem::Fixed(t) | ListItem::Unbounded(t) => self.bind_type(element, t)?,
                        ListItem::Variadic(_) => {
                            if !self.gradual.is_assignable(arg, param) {
                                return Err(self.mismatch(arg, param));
                            }
                        }
                    }
                }
                Ok(())
            }
            _ => self.check_assignable(arg, param),
        }
    }

    /// Unions are matched speculatively. A union with a `*Ts` member can
    /// only bind it positionally. Otherwise each argument member goes to a
    /// closed parameter member that accepts it, and only failing that to
    /// the first member with free variables that binds.
    fn bind_union(
        &mut self,
        param: TypeId,
        param_members: &[TypeId],
        arg: TypeId,
    ) -> Result<(), BindFailure> {
        if !self.mentions_owned(param) {
            return self.check_assignable(arg, param);
        }

        let arg_members: TypeListBuffer = match self.interner.lookup(arg) {
            Some(TypeData::Union(list)) => self.interner.type_list(list).iter().copied().collect(),
            _ => std::iter::once(arg).collect(),
        };

        if self.find_slot(param_members).is_some() {
            return self
                .speculate(|binder| binder.bind_list(param_members, &arg_members))
                .map_err(|_| self.mismatch(arg, param));
        }

        let (open, closed): (TypeListBuffer, TypeListBuffer) = param_members
            .iter()
            .copied()
            .partition(|&candidate| self.mentions_owned(candidate));

        for &member in &arg_members {
            if closed
                .iter()
                .any(|&candidate| self.gradual.is_assignable(member, candidate))
            {
                continue;
            }
            let matched = open.iter().any(|&candidate| {
                self.speculate(|binder| binder.bind_type(candidate, member))
                    .is_ok()
            });
            if !matched {
                trace!(member = member.0, "bind_union: no member accepts argument");
                return Err(self.mismatch(arg, param));
            }
        }
        Ok(())
    }

    // =========================================================================
    // Helpers
    // =========================================================================

    fn speculate<T, F>(&mut self, f: F) -> Result<T, BindFailure>
    where
        F: FnOnce(&mut Self) -> Result<T, BindFailure>,
    {
        let snapshot = self.env.snapshot();
        match f(self) {
            Ok(value) => {
                self.env.commit(snapshot);
                Ok(value)
            }
            Err(failure) => {
                self.env.rollback_to(snapshot);
                Err(failure)
            }
        }
    }

    fn mentions_owned(&self, type_id: TypeId) -> bool {
        let env = &*self.env;
        contains_type_var(self.interner, type_id, |var| env.owns(var))
    }

    fn check_assignable(&self, arg: TypeId, param: TypeId) -> Result<(), BindFailure> {
        if self.gradual.is_assignable(arg, param) {
            Ok(())
        } else {
            Err(self.mismatch(arg, param))
        }
    }

    fn mismatch(&self, source: TypeId, target: TypeId) -> BindFailure {
        trace!(source = source.0, target = target.0, "bind: type mismatch");
        BindFailure::TypeMismatch { source, target }
    }

    /// `Tuple[middle...]` for reporting a sequence as one type.
    fn sequence_as_tuple(&self, items: &[TypeId]) -> TypeId {
        let list = self.interner.intern_type_list(items);
        self.interner
            .intern(TypeData::Application(DefId::TUPLE, list))
    }
}

/// Bind `args` against `params` in a fresh environment owning `owned`, and
/// return the environment on success.
pub fn bind_lists(
    interner: &TypeInterner,
    owned: &[TypeVarId],
    params: &[TypeId],
    args: &[TypeId],
) -> Result<BindingEnvironment, ArgumentFailure> {
    let mut env = BindingEnvironment::new(interner, owned);
    Binder::new(interner, &mut env).bind_arguments(params, args)?;
    Ok(env)
}

#[cfg(test)]
#[path = "../tests/binder_tests.rs"]
mod tests;
