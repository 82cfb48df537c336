//! Declaration identifiers and storage for the solver.
//!
//! Generic classes, type aliases and functions are registered once, at
//! declaration time, into a `DefinitionStore` and referred to by `DefId`
//! afterwards. Declaration-time validation lives here too: a declaration
//! that breaks a structural rule (two variadic parameters, a variadic alias
//! parameter that is not last) is rejected before any use site sees it.
//!
//! | Kind | Type parameters | Used by |
//! |------|-----------------|---------|
//! | Tuple | implicit `*Ts` | built-in, `DefId::TUPLE` |
//! | Class | any order, at most one variadic | `instantiate_generic` |
//! | TypeAlias | variadic must be last | `AliasExpander` |
//! | Function | collected from signatures | `CallEvaluator` |

use crate::diagnostics::ConstructionError;
use crate::intern::TypeInterner;
use crate::type_factory::TypeFactory;
use crate::types::{ParamKind, Signature, TypeId, TypeVarId, VarKind};
use crate::visitor::collect_type_vars;
use dashmap::DashMap;
use indexmap::IndexSet;
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, AtomicU64, Ordering};
use tracing::trace;
use varity_common::{Atom, Span};

/// Global counter for assigning unique instance IDs to `DefinitionStore` instances.
static NEXT_INSTANCE_ID: AtomicU64 = AtomicU64::new(1);

// =============================================================================
// DefId
// =============================================================================

/// Solver-owned declaration identifier.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize)]
pub struct DefId(pub u32);

impl DefId {
    /// Sentinel value for invalid `DefId`.
    pub const INVALID: Self = Self(0);

    /// The built-in fixed-arity sequence type `Tuple`.
    ///
    /// Gradual assignability treats this one identity differently from every
    /// other variadic generic, so it is a well-known constant rather than a
    /// name lookup.
    pub const TUPLE: Self = Self(1);

    /// First `DefId` handed out for user declarations.
    pub const FIRST_USER: u32 = 2;

    /// Check if this `DefId` is valid.
    pub const fn is_valid(self) -> bool {
        self.0 != Self::INVALID.0
    }
}

// =============================================================================
// DefKind / DefinitionInfo
// =============================================================================

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum DefKind {
    /// The built-in `Tuple`.
    Tuple,
    /// A (possibly generic) class, e.g. `class Array(Generic[*Shape])`.
    Class,
    /// A type alias, e.g. `IntTuple = Tuple[int, *Ts]`.
    TypeAlias,
    /// A function with one or more (overloaded) signatures.
    Function,
}

/// Complete information about a declaration.
#[derive(Clone, Debug)]
pub struct DefinitionInfo {
    pub kind: DefKind,

    /// Name of the declaration (for diagnostics)
    pub name: Atom,

    /// Type parameters of a class or alias, in declaration order
    pub type_params: Vec<TypeVarId>,

    /// Alias body
    pub body: Option<TypeId>,

    /// Function signatures, in declaration order
    pub signatures: Vec<Arc<Signature>>,

    /// Declaration site
    pub span: Option<Span>,
}

impl DefinitionInfo {
    const fn builtin_tuple() -> Self {
        Self {
            kind: DefKind::Tuple,
            name: Atom::NONE,
            type_params: Vec::new(),
            body: None,
            signatures: Vec::new(),
            span: None,
        }
    }

    /// Create a class definition. Performs no validation.
    pub const fn class(name: Atom, type_params: Vec<TypeVarId>) -> Self {
        Self {
            kind: DefKind::Class,
            name,
            type_params,
            body: None,
            signatures: Vec::new(),
            span: None,
        }
    }

    /// Create a type alias definition. Performs no validation.
    pub const fn type_alias(name: Atom, type_params: Vec<TypeVarId>, body: TypeId) -> Self {
        Self {
            kind: DefKind::TypeAlias,
            name,
            type_params,
            body: Some(body),
            signatures: Vec::new(),
            span: None,
        }
    }

    /// Create a function definition. Performs no validation.
    pub fn function(name: Atom, signatures: Vec<Signature>) -> Self {
        Self {
            kind: DefKind::Function,
            name,
            type_params: Vec::new(),
            body: None,
            signatures: signatures.into_iter().map(Arc::new).collect(),
            span: None,
        }
    }

    /// Set source span.
    pub const fn with_span(mut self, span: Span) -> Self {
        self.span = Some(span);
        self
    }

    pub fn is_generic(&self) -> bool {
        self.kind == DefKind::Tuple || !self.type_params.is_empty()
    }
}

// =============================================================================
// DefinitionStore
// =============================================================================

/// Thread-safe storage for declarations.
///
/// Uses `DashMap` so that call sites can be checked from several threads
/// while sharing one declaration table.
pub struct DefinitionStore {
    /// Unique instance ID for debugging
    instance_id: u64,

    /// `DefId` -> `DefinitionInfo` mapping
    definitions: DashMap<DefId, DefinitionInfo>,

    /// Next available `DefId`
    next_id: AtomicU32,
}

impl Default for DefinitionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl DefinitionStore {
    /// Create a new definition store with the built-in `Tuple` registered.
    pub fn new() -> Self {
        let instance_id = NEXT_INSTANCE_ID.fetch_add(1, Ordering::SeqCst);
        trace!(instance_id, "DefinitionStore::new");
        let definitions = DashMap::new();
        definitions.insert(DefId::TUPLE, DefinitionInfo::builtin_tuple());
        Self {
            instance_id,
            definitions,
            next_id: AtomicU32::new(DefId::FIRST_USER),
        }
    }

    fn allocate(&self) -> DefId {
        DefId(self.next_id.fetch_add(1, Ordering::SeqCst))
    }

    /// Register a definition without validation and return its `DefId`.
    pub fn register(&self, info: DefinitionInfo) -> DefId {
        let id = self.allocate();
        trace!(
            instance_id = self.instance_id,
            def_id = id.0,
            kind = ?info.kind,
            "DefinitionStore::register"
        );
        self.definitions.insert(id, info);
        id
    }

    /// Get definition info by `DefId`.
    pub fn get(&self, id: DefId) -> Option<DefinitionInfo> {
        self.definitions.get(&id).map(|r| r.clone())
    }

    pub fn contains(&self, id: DefId) -> bool {
        self.definitions.contains_key(&id)
    }

    pub fn get_kind(&self, id: DefId) -> Option<DefKind> {
        self.definitions.get(&id).map(|r| r.kind)
    }

    pub fn get_name(&self, id: DefId) -> Option<Atom> {
        self.definitions.get(&id).map(|r| r.name)
    }

    pub fn get_type_params(&self, id: DefId) -> Option<Vec<TypeVarId>> {
        self.definitions.get(&id).map(|r| r.type_params.clone())
    }

    pub fn get_signatures(&self, id: DefId) -> Option<Vec<Arc<Signature>>> {
        self.definitions.get(&id).map(|r| r.signatures.clone())
    }

    /// Number of declarations, the built-in `Tuple` included.
    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }

    // =========================================================================
    // Validated declarations
    // =========================================================================

    /// Declare a class with the given type parameters.
    ///
    /// The variadic parameter may appear anywhere, but only once.
    pub fn declare_class(
        &self,
        interner: &TypeInterner,
        name: &str,
        type_params: Vec<TypeVarId>,
    ) -> Result<DefId, ConstructionError> {
        check_single_variadic(interner, &type_params)?;
        let info = DefinitionInfo::class(interner.intern_string(name), type_params);
        Ok(self.register(info))
    }

    /// Declare a type alias.
    ///
    /// A variadic type parameter must be the last parameter; the check runs
    /// here, at definition time, never at expansion.
    pub fn declare_alias(
        &self,
        interner: &TypeInterner,
        name: &str,
        type_params: Vec<TypeVarId>,
        body: TypeId,
    ) -> Result<DefId, ConstructionError> {
        check_single_variadic(interner, &type_params)?;
        let name = interner.intern_string(name);
        if let Some((index, &var)) = type_params
            .iter()
            .enumerate()
            .find(|&(_, &var)| interner.type_var_kind(var) == VarKind::Variadic)
            && index + 1 != type_params.len()
        {
            return Err(ConstructionError::VariadicPosition { var, alias: name });
        }
        Ok(self.register(DefinitionInfo::type_alias(name, type_params, body)))
    }

    /// Declare a function from one or more signatures (overloads, in
    /// declaration order).
    ///
    /// Each signature's `type_params` is recomputed from its parameter and
    /// return annotations, and its `*args` annotation is validated.
    pub fn declare_function(
        &self,
        interner: &TypeInterner,
        name: &str,
        signatures: Vec<Signature>,
    ) -> Result<DefId, ConstructionError> {
        let factory = TypeFactory::new(interner);
        let mut checked = Vec::with_capacity(signatures.len());
        for mut signature in signatures {
            let mut var_args = signature
                .params
                .iter()
                .filter(|p| p.kind == ParamKind::VarArgs);
            if let (Some(first), Some(second)) = (var_args.next(), var_args.next()) {
                return Err(ConstructionError::MultipleVariadic {
                    first: first.type_id,
                    second: second.type_id,
                });
            }
            for param in &signature.params {
                match param.kind {
                    ParamKind::Positional => {
                        factory.standalone(param.type_id)?;
                    }
                    ParamKind::VarArgs => {
                        factory.var_args_elements(param.type_id)?;
                    }
                }
            }
            factory.standalone(signature.return_type)?;

            let mut vars = IndexSet::new();
            for param in &signature.params {
                collect_type_vars(interner, param.type_id, &mut vars);
            }
            collect_type_vars(interner, signature.return_type, &mut vars);
            signature.type_params = vars.into_iter().collect();
            checked.push(signature);
        }
        let info = DefinitionInfo::function(interner.intern_string(name), checked);
        Ok(self.register(info))
    }
}

/// Reject a type parameter list that declares two variadic variables.
fn check_single_variadic(
    interner: &TypeInterner,
    type_params: &[TypeVarId],
) -> Result<(), ConstructionError> {
    let mut variadic = type_params
        .iter()
        .filter(|&&var| interner.type_var_kind(var) == VarKind::Variadic);
    if let (Some(&first), Some(&second)) = (variadic.next(), variadic.next()) {
        return Err(ConstructionError::MultipleVariadic {
            first: interner.unpacked_var(first),
            second: interner.unpacked_var(second),
        });
    }
    Ok(())
}

#[cfg(test)]
#[path = "../tests/def_tests.rs"]
mod tests;
