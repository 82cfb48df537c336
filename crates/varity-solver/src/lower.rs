//! Type lowering: annotation trees -> `TypeId`
//!
//! The parser is not part of this crate; callers hand over a small
//! `TypeNode` tree. Names are resolved through a `LoweringScope`, and every
//! type is built through `TypeFactory`, so lowering enforces the same
//! structural rules as programmatic construction. The two unpack spellings
//! `*Ts` and `Unpack[Ts]` lower to the same `TypeId`.

use crate::alias::AliasExpander;
use crate::application::instantiate_generic;
use crate::def::{DefId, DefKind, DefinitionStore};
use crate::diagnostics::{ArgumentFailure, ConstructionError};
use crate::intern::{TypeInterner, TypeListBuffer};
use crate::type_factory::TypeFactory;
use crate::types::{IntrinsicKind, TypeId, TypeVarId};
use rustc_hash::FxHashMap;
use std::fmt;
use tracing::trace;

/// A parsed type annotation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TypeNode {
    /// `int`, `Height`, `Ts`, bare `Tuple`.
    Name(String),
    /// `Base[args...]`, including `Unpack[X]`, `Union[...]` and
    /// `Callable[[...], R]`.
    Subscript { base: String, args: Vec<TypeNode> },
    /// `*X`.
    Star(Box<TypeNode>),
    /// `...`, as in `Tuple[X, ...]` or `Callable[..., R]`.
    Ellipsis,
    /// `[a, b]`, the parameter section of `Callable`.
    List(Vec<TypeNode>),
    /// `()`, the empty argument list in `Tuple[()]`.
    EmptyTuple,
}

impl TypeNode {
    pub fn name(name: &str) -> Self {
        TypeNode::Name(name.to_string())
    }

    pub fn subscript(base: &str, args: Vec<TypeNode>) -> Self {
        TypeNode::Subscript {
            base: base.to_string(),
            args,
        }
    }

    pub fn star(inner: TypeNode) -> Self {
        TypeNode::Star(Box::new(inner))
    }

    /// `Unpack[inner]`.
    pub fn unpack(inner: TypeNode) -> Self {
        Self::subscript("Unpack", vec![inner])
    }
}

/// What a name in an annotation refers to.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ScopeEntry {
    TypeVar(TypeVarId),
    Def(DefId),
}

/// Names visible to lowering. `Tuple` is always in scope.
#[derive(Clone, Debug)]
pub struct LoweringScope {
    names: FxHashMap<String, ScopeEntry>,
}

impl Default for LoweringScope {
    fn default() -> Self {
        Self::new()
    }
}

impl LoweringScope {
    pub fn new() -> Self {
        let mut names = FxHashMap::default();
        names.insert("Tuple".to_string(), ScopeEntry::Def(DefId::TUPLE));
        LoweringScope { names }
    }

    pub fn bind_type_var(&mut self, name: &str, var: TypeVarId) {
        self.names.insert(name.to_string(), ScopeEntry::TypeVar(var));
    }

    pub fn bind_def(&mut self, name: &str, def: DefId) {
        self.names.insert(name.to_string(), ScopeEntry::Def(def));
    }

    pub fn get(&self, name: &str) -> Option<ScopeEntry> {
        self.names.get(name).copied()
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LowerError {
    Construction(ConstructionError),
    /// Explicit arguments failed to bind against a generic or alias.
    Bind(ArgumentFailure),
    UnresolvedName(String),
    /// Subscript on something that takes no arguments.
    NotGeneric(String),
    /// A node in a position where it has no meaning (`...` outside
    /// `Tuple`/`Callable`, a bracket list outside `Callable`).
    InvalidForm(&'static str),
}

impl From<ConstructionError> for LowerError {
    fn from(err: ConstructionError) -> Self {
        LowerError::Construction(err)
    }
}

impl From<ArgumentFailure> for LowerError {
    fn from(failure: ArgumentFailure) -> Self {
        LowerError::Bind(failure)
    }
}

impl fmt::Display for LowerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LowerError::Construction(err) => write!(f, "invalid type: {}", err.kind()),
            LowerError::Bind(failure) => write!(f, "invalid type arguments: {}", failure.kind()),
            LowerError::UnresolvedName(name) => write!(f, "unresolved name '{name}'"),
            LowerError::NotGeneric(name) => write!(f, "'{name}' is not a generic type"),
            LowerError::InvalidForm(what) => write!(f, "{what} is not valid here"),
        }
    }
}

/// Type lowering context.
pub struct TypeLowering<'a> {
    interner: &'a TypeInterner,
    defs: &'a DefinitionStore,
    scope: &'a LoweringScope,
    factory: TypeFactory<'a>,
}

impl<'a> TypeLowering<'a> {
    pub fn new(
        interner: &'a TypeInterner,
        defs: &'a DefinitionStore,
        scope: &'a LoweringScope,
    ) -> Self {
        TypeLowering {
            interner,
            defs,
            scope,
            factory: TypeFactory::new(interner),
        }
    }

    /// Lower an annotation.
    ///
    /// A bare variadic name lowers to the bare reference; whether that is
    /// legal is decided by where the result is used (only `*args`).
    pub fn lower_type(&self, node: &TypeNode) -> Result<TypeId, LowerError> {
        match node {
            TypeNode::Name(name) => self.lower_name(name),
            TypeNode::Star(inner) => Ok(self.factory.unpack(self.lower_type(inner)?)?),
            TypeNode::Subscript { base, args } => self.lower_subscript(base, args),
            TypeNode::Ellipsis => Err(LowerError::InvalidForm("'...'")),
            TypeNode::List(_) => Err(LowerError::InvalidForm("a bracketed type list")),
            TypeNode::EmptyTuple => Err(LowerError::InvalidForm("'()'")),
        }
    }

    fn lower_name(&self, name: &str) -> Result<TypeId, LowerError> {
        if let Some(kind) = IntrinsicKind::from_name(name) {
            return Ok(kind.to_type_id());
        }
        match self.scope.get(name) {
            Some(ScopeEntry::TypeVar(var)) => Ok(self.interner.type_var(var)),
            Some(ScopeEntry::Def(def)) => {
                let info = self
                    .defs
                    .get(def)
                    .ok_or_else(|| LowerError::UnresolvedName(name.to_string()))?;
                match info.kind {
                    DefKind::Tuple => Ok(self.interner.unparameterized(def)),
                    DefKind::Class if info.is_generic() => Ok(self.interner.unparameterized(def)),
                    DefKind::Class => Ok(self.interner.instance(def)),
                    DefKind::TypeAlias => Ok(AliasExpander::new(self.interner).expand(&info, None)?),
                    DefKind::Function => Err(LowerError::InvalidForm("a function name")),
                }
            }
            None => Err(LowerError::UnresolvedName(name.to_string())),
        }
    }

    fn lower_subscript(&self, base: &str, args: &[TypeNode]) -> Result<TypeId, LowerError> {
        trace!(base, args = args.len(), "lower_subscript");
        match base {
            "Unpack" => match args {
                [inner] => Ok(self.factory.unpack(self.lower_type(inner)?)?),
                _ => Err(LowerError::InvalidForm("Unpack with other than one argument")),
            },
            "Union" => Ok(self.factory.union(&self.lower_list(args)?)?),
            "Optional" => {
                let mut members = self.lower_list(args)?;
                members.push(TypeId::NONE_TYPE);
                Ok(self.factory.union(&members)?)
            }
            "Callable" => self.lower_callable(args),
            _ => self.lower_generic(base, args),
        }
    }

    fn lower_callable(&self, args: &[TypeNode]) -> Result<TypeId, LowerError> {
        let [params, ret] = args else {
            return Err(LowerError::InvalidForm("Callable without [params, return]"));
        };
        let ret = self.lower_type(ret)?;
        let params = match params {
            TypeNode::List(params) => self.lower_list(params)?,
            // `Callable[..., R]` accepts any arguments.
            TypeNode::Ellipsis => {
                let any = self.factory.unbounded_tuple(TypeId::ANY)?;
                std::iter::once(self.factory.unpack(any)?).collect()
            }
            _ => return Err(LowerError::InvalidForm("Callable parameters")),
        };
        Ok(self.factory.callable(&params, ret)?)
    }

    fn lower_generic(&self, base: &str, args: &[TypeNode]) -> Result<TypeId, LowerError> {
        let Some(ScopeEntry::Def(def)) = self.scope.get(base) else {
            return match self.scope.get(base) {
                Some(ScopeEntry::TypeVar(_)) => Err(LowerError::NotGeneric(base.to_string())),
                _ => Err(LowerError::UnresolvedName(base.to_string())),
            };
        };
        let info = self
            .defs
            .get(def)
            .ok_or_else(|| LowerError::UnresolvedName(base.to_string()))?;

        if info.kind == DefKind::Tuple
            && let [element, TypeNode::Ellipsis] = args
        {
            let element = self.lower_type(element)?;
            return Ok(self.factory.unbounded_tuple(element)?);
        }

        let args = self.lower_list(args)?;
        match info.kind {
            DefKind::Tuple => Ok(instantiate_generic(self.interner, def, &info, &args)?),
            DefKind::Class if info.is_generic() => {
                Ok(instantiate_generic(self.interner, def, &info, &args)?)
            }
            DefKind::TypeAlias => Ok(AliasExpander::new(self.interner).expand(&info, Some(args.as_slice()))?),
            DefKind::Class | DefKind::Function => Err(LowerError::NotGeneric(base.to_string())),
        }
    }

    /// Lower each element; `()` as the sole element is the empty list.
    fn lower_list(&self, nodes: &[TypeNode]) -> Result<TypeListBuffer, LowerError> {
        if let [TypeNode::EmptyTuple] = nodes {
            return Ok(TypeListBuffer::new());
        }
        nodes.iter().map(|node| self.lower_type(node)).collect()
    }
}

#[cfg(test)]
#[path = "../tests/lower_tests.rs"]
mod tests;
