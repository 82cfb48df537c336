//! Checker state and the per-site entry points.
//!
//! `CheckerState` borrows the shared type interner and declaration store and
//! owns the diagnostics it produces. Each entry point checks one site (a
//! call, an explicit parameterization, an alias use) and never panics on bad
//! input: every failure becomes a `Diagnostic` anchored at the offending
//! argument when one can be identified, or at the whole site otherwise.

use crate::context::CheckerOptions;
use smallvec::SmallVec;
use tracing::{debug, trace};
use varity_common::{Diagnostic, Span};
use varity_solver::{
    AliasExpander, CallArgument, CallEvaluator, DefId, DefKind, DefinitionInfo, DefinitionStore,
    OverloadMatch, TypeId, TypeInterner, instantiate_generic,
};

/// One explicit type argument as written at a site (`Array[int, *Ts]`).
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct TypeArgument {
    pub type_id: TypeId,
    pub span: Span,
}

impl TypeArgument {
    pub const fn new(type_id: TypeId, span: Span) -> Self {
        TypeArgument { type_id, span }
    }
}

pub struct CheckerState<'a> {
    pub interner: &'a TypeInterner,
    pub defs: &'a DefinitionStore,
    pub options: CheckerOptions,
    /// File name recorded on every diagnostic.
    pub file: String,
    diagnostics: Vec<Diagnostic>,
}

impl<'a> CheckerState<'a> {
    pub fn new(
        interner: &'a TypeInterner,
        defs: &'a DefinitionStore,
        file: impl Into<String>,
        options: CheckerOptions,
    ) -> Self {
        CheckerState {
            interner,
            defs,
            options,
            file: file.into(),
            diagnostics: Vec::new(),
        }
    }

    /// Diagnostics reported by `check_call` so far.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn take_diagnostics(&mut self) -> Vec<Diagnostic> {
        std::mem::take(&mut self.diagnostics)
    }

    pub(crate) fn definition(&self, def: DefId, span: Span) -> Result<DefinitionInfo, Diagnostic> {
        self.defs
            .get(def)
            .ok_or_else(|| self.unknown_definition(def, span))
    }

    // =========================================================================
    // Calls
    // =========================================================================

    /// Resolve a call against the callee's signatures.
    ///
    /// Overloads are tried in declaration order and the first that binds
    /// wins. A single-signature callee reports its own failure; an
    /// overloaded one reports that no overload matched.
    pub fn resolve_call(
        &self,
        callee: DefId,
        args: &[CallArgument],
        span: Span,
    ) -> Result<OverloadMatch, Diagnostic> {
        let info = self.definition(callee, span)?;
        if info.kind != DefKind::Function || info.signatures.is_empty() {
            return Err(self.not_callable(callee, span));
        }
        debug!(
            callee = callee.0,
            overloads = info.signatures.len(),
            args = args.len(),
            "CheckerState::resolve_call"
        );

        let evaluator =
            CallEvaluator::new(self.interner).with_max_depth(self.options.max_instantiation_depth);
        evaluator
            .resolve_overloads(&info.signatures, args)
            .map_err(|failures| {
                trace!(rejected = failures.len(), "resolve_call: no candidate bound");
                let arg_spans: SmallVec<[Span; 8]> = args.iter().map(|arg| arg.span).collect();
                match failures.as_slice() {
                    [only] if info.signatures.len() == 1 => {
                        self.argument_failure(only, &arg_spans, span)
                    }
                    _ => self.no_matching_overload(&info, &failures, &arg_spans, span),
                }
            })
    }

    /// Check a call and return the diagnostics it produced (none when the
    /// call binds). The diagnostics are also kept on the state.
    pub fn check_call(
        &mut self,
        callee: DefId,
        args: &[CallArgument],
        span: Span,
    ) -> Vec<Diagnostic> {
        match self.resolve_call(callee, args, span) {
            Ok(matched) => {
                trace!(overload = matched.index, "check_call: ok");
                Vec::new()
            }
            Err(diag) => {
                self.diagnostics.push(diag.clone());
                vec![diag]
            }
        }
    }

    /// Return type of a call, or the error type when the call fails. The
    /// failure is recorded on the state.
    pub fn call_return_type(&mut self, callee: DefId, args: &[CallArgument], span: Span) -> TypeId {
        match self.resolve_call(callee, args, span) {
            Ok(matched) => matched.resolution.return_type,
            Err(diag) => {
                self.diagnostics.push(diag);
                TypeId::ERROR
            }
        }
    }

    // =========================================================================
    // Explicit parameterization
    // =========================================================================

    /// Apply explicit type arguments to a generic class, `Tuple`, or alias.
    pub fn instantiate(
        &self,
        def: DefId,
        args: &[TypeArgument],
        span: Span,
    ) -> Result<TypeId, Diagnostic> {
        let info = self.definition(def, span)?;
        match info.kind {
            DefKind::TypeAlias => self.expand_alias(def, Some(args), span),
            DefKind::Function => Err(self.not_generic(def, span)),
            DefKind::Class if !info.is_generic() => Err(self.not_generic(def, span)),
            DefKind::Tuple | DefKind::Class => {
                let types: Vec<TypeId> = args.iter().map(|arg| arg.type_id).collect();
                let arg_spans: SmallVec<[Span; 8]> = args.iter().map(|arg| arg.span).collect();
                debug!(def = def.0, args = types.len(), "CheckerState::instantiate");
                instantiate_generic(self.interner, def, &info, &types)
                    .map_err(|failure| self.argument_failure(&failure, &arg_spans, span))
            }
        }
    }

    /// Expand a type alias. `None` is the alias used bare, which expands the
    /// same as an empty argument list.
    ///
    /// A non-alias declaration is resolved as written: a class or `Tuple`
    /// with arguments is instantiated, a bare one is its unparameterized
    /// form.
    pub fn expand_alias(
        &self,
        alias: DefId,
        args: Option<&[TypeArgument]>,
        span: Span,
    ) -> Result<TypeId, Diagnostic> {
        let info = self.definition(alias, span)?;
        match (info.kind, args) {
            (DefKind::TypeAlias, _) => {
                let types: Option<Vec<TypeId>> =
                    args.map(|args| args.iter().map(|arg| arg.type_id).collect());
                let arg_spans: SmallVec<[Span; 8]> = args
                    .unwrap_or_default()
                    .iter()
                    .map(|arg| arg.span)
                    .collect();
                debug!(
                    alias = alias.0,
                    args = types.as_ref().map_or(0, Vec::len),
                    "CheckerState::expand_alias"
                );
                AliasExpander::new(self.interner)
                    .with_max_depth(self.options.max_instantiation_depth)
                    .expand(&info, types.as_deref())
                    .map_err(|failure| self.argument_failure(&failure, &arg_spans, span))
            }
            (DefKind::Function, _) => Err(self.not_generic(alias, span)),
            (_, Some(args)) => self.instantiate(alias, args, span),
            (DefKind::Class, None) if !info.is_generic() => Ok(self.interner.instance(alias)),
            (_, None) => Ok(self.interner.unparameterized(alias)),
        }
    }
}
