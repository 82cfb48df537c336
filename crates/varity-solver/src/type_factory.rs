//! Validated construction of type expressions.
//!
//! `TypeInterner::intern` stores whatever it is given. Everything built from
//! user-written annotations goes through `TypeFactory` instead, which keeps
//! the list invariants documented on `TypeData`:
//!
//! - `*Tuple[a, b]` inside a list is spliced, so `Tuple[int, *Tuple[str]]`
//!   and `Tuple[int, str]` are the same `TypeId`
//! - `Tuple[*Tuple[X, ...]]` canonicalizes to `Tuple[X, ...]`
//! - a list holds at most one variadic element
//! - a bare variadic variable is only accepted as a `*args` annotation

use crate::def::DefId;
use crate::diagnostics::ConstructionError;
use crate::intern::{TypeInterner, TypeListBuffer};
use crate::types::{ListItem, TypeData, TypeId, TypeVarId, VarKind};

pub struct TypeFactory<'a> {
    interner: &'a TypeInterner,
}

impl<'a> TypeFactory<'a> {
    pub const fn new(interner: &'a TypeInterner) -> Self {
        TypeFactory { interner }
    }

    pub const fn interner(&self) -> &'a TypeInterner {
        self.interner
    }

    /// Reference to an ordinary type variable in a single-type position.
    pub fn type_var(&self, var: TypeVarId) -> Result<TypeId, ConstructionError> {
        match self.interner.type_var_kind(var) {
            VarKind::Single => Ok(self.interner.intern(TypeData::TypeVar(var))),
            VarKind::Variadic => Err(ConstructionError::BareVariadic { var }),
        }
    }

    /// `*X` (equivalently `Unpack[X]`).
    ///
    /// Bare `Tuple` unpacks as `*Tuple[Any, ...]`.
    pub fn unpack(&self, target: TypeId) -> Result<TypeId, ConstructionError> {
        let target = match self.interner.lookup(target) {
            Some(TypeData::VariadicVar(_))
            | Some(TypeData::UnboundedTuple(_))
            | Some(TypeData::Application(DefId::TUPLE, _)) => target,
            Some(TypeData::Unparameterized(DefId::TUPLE)) => {
                self.interner.unbounded_tuple(TypeId::ANY)
            }
            _ => return Err(ConstructionError::InvalidUnpack { target }),
        };
        Ok(self.interner.intern(TypeData::Unpack(target)))
    }

    /// `*Ts` for a declared variable.
    pub fn unpack_var(&self, var: TypeVarId) -> Result<TypeId, ConstructionError> {
        match self.interner.type_var_kind(var) {
            VarKind::Variadic => Ok(self.interner.unpacked_var(var)),
            VarKind::Single => Err(ConstructionError::InvalidUnpack {
                target: self.interner.intern(TypeData::TypeVar(var)),
            }),
        }
    }

    /// Check a type used where exactly one type is expected (a positional
    /// parameter annotation, a return type, a union member's inner type).
    pub fn standalone(&self, id: TypeId) -> Result<TypeId, ConstructionError> {
        match self.interner.lookup(id) {
            Some(TypeData::VariadicVar(var)) => Err(ConstructionError::BareVariadic { var }),
            Some(TypeData::Unpack(_)) => Err(ConstructionError::UnpackOutsideList { unpacked: id }),
            _ => Ok(id),
        }
    }

    /// Flatten and validate an argument/element list.
    ///
    /// Bare variadic references are rejected; `*Tuple[...]` of known length
    /// is spliced in place; at most one variadic element may remain.
    pub fn normalize_list(&self, items: &[TypeId]) -> Result<TypeListBuffer, ConstructionError> {
        let mut out = TypeListBuffer::new();
        let mut slot: Option<TypeId> = None;
        let mut note_slot = |item: TypeId| -> Result<(), ConstructionError> {
            if let Some(first) = slot {
                return Err(ConstructionError::MultipleVariadic {
                    first,
                    second: item,
                });
            }
            slot = Some(item);
            Ok(())
        };

        for &item in items {
            match self.interner.lookup(item) {
                Some(TypeData::VariadicVar(var)) => {
                    return Err(ConstructionError::BareVariadic { var });
                }
                Some(TypeData::Unpack(inner)) => match self.interner.lookup(inner) {
                    Some(TypeData::Application(DefId::TUPLE, list)) => {
                        // Elements of an interned tuple are already normalized.
                        for &element in self.interner.type_list(list).iter() {
                            if self.interner.list_item(element).is_variadic_slot() {
                                note_slot(element)?;
                            }
                            out.push(element);
                        }
                    }
                    Some(TypeData::VariadicVar(_)) | Some(TypeData::UnboundedTuple(_)) => {
                        note_slot(item)?;
                        out.push(item);
                    }
                    Some(TypeData::Unparameterized(DefId::TUPLE)) => {
                        let unpacked = self.unpack(inner)?;
                        note_slot(unpacked)?;
                        out.push(unpacked);
                    }
                    _ => return Err(ConstructionError::InvalidUnpack { target: inner }),
                },
                _ => out.push(item),
            }
        }
        Ok(out)
    }

    /// `Name[args...]` for a generic class (or `Tuple`).
    ///
    /// Only list structure is checked here; matching the arguments against
    /// the declaration's type parameters is `instantiate_generic`'s job.
    pub fn application(&self, def: DefId, args: &[TypeId]) -> Result<TypeId, ConstructionError> {
        if def == DefId::TUPLE {
            return self.tuple(args);
        }
        let list = self.normalize_list(args)?;
        let list = self.interner.intern_type_list(&list);
        Ok(self.interner.intern(TypeData::Application(def, list)))
    }

    /// `Tuple[elements...]`.
    pub fn tuple(&self, elements: &[TypeId]) -> Result<TypeId, ConstructionError> {
        let list = self.normalize_list(elements)?;
        if let [only] = list.as_slice()
            && let ListItem::Unbounded(element) = self.interner.list_item(*only)
        {
            return Ok(self.interner.unbounded_tuple(element));
        }
        let list = self.interner.intern_type_list(&list);
        Ok(self
            .interner
            .intern(TypeData::Application(DefId::TUPLE, list)))
    }

    /// `Tuple[X, ...]`.
    pub fn unbounded_tuple(&self, element: TypeId) -> Result<TypeId, ConstructionError> {
        let element = self.standalone(element)?;
        Ok(self.interner.unbounded_tuple(element))
    }

    /// `Union[members...]`.
    ///
    /// Nested unions are flattened and duplicates dropped (first occurrence
    /// wins). An empty union is `Never`; a single fixed member is itself.
    pub fn union(&self, members: &[TypeId]) -> Result<TypeId, ConstructionError> {
        let list = self.normalize_list(members)?;
        let mut flat = TypeListBuffer::new();
        for member in list {
            match self.interner.lookup(member) {
                Some(TypeData::Union(inner)) => {
                    for &nested in self.interner.type_list(inner).iter() {
                        if !flat.contains(&nested) {
                            flat.push(nested);
                        }
                    }
                }
                _ => {
                    if !flat.contains(&member) {
                        flat.push(member);
                    }
                }
            }
        }
        match flat.as_slice() {
            [] => Ok(TypeId::NEVER),
            [only] if !self.interner.list_item(*only).is_variadic_slot() => Ok(*only),
            _ => {
                let list = self.interner.intern_type_list(&flat);
                Ok(self.interner.intern(TypeData::Union(list)))
            }
        }
    }

    /// `Callable[[params...], ret]`.
    pub fn callable(&self, params: &[TypeId], ret: TypeId) -> Result<TypeId, ConstructionError> {
        let list = self.normalize_list(params)?;
        let ret = self.standalone(ret)?;
        let params = self.interner.intern_type_list(&list);
        Ok(self.interner.intern(TypeData::Callable { params, ret }))
    }

    /// Expand a `*args` annotation into the parameter-list elements it
    /// stands for:
    ///
    /// - `*args: *Ts` or `*args: Ts` gives `[*Ts]`
    /// - `*args: *Tuple[int, *Ts, str]` gives `[int, *Ts, str]`
    /// - `*args: *Tuple[X, ...]` or `*args: X` gives `[*Tuple[X, ...]]`
    pub fn var_args_elements(&self, annotation: TypeId) -> Result<TypeListBuffer, ConstructionError> {
        let mut out = TypeListBuffer::new();
        match self.interner.lookup(annotation) {
            Some(TypeData::VariadicVar(var)) => out.push(self.interner.unpacked_var(var)),
            Some(TypeData::Unpack(_)) => return self.normalize_list(&[annotation]),
            _ => {
                let homogeneous = self.interner.unbounded_tuple(annotation);
                out.push(self.interner.intern(TypeData::Unpack(homogeneous)));
            }
        }
        Ok(out)
    }
}

#[cfg(test)]
#[path = "../tests/type_factory_tests.rs"]
mod tests;
