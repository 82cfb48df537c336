//! Checking independent sites in bulk.
//!
//! Sites share the interner and declaration store, which are safe to read
//! from several threads; each site gets its own `CheckerState` and binding
//! environments, so one failing site never affects another. Results come
//! back in input order whether or not the batch ran in parallel.

use crate::context::CheckerOptions;
use crate::state::{CheckerState, TypeArgument};
use rayon::prelude::*;
use serde::Serialize;
use tracing::{debug, info_span};
use varity_common::{Diagnostic, Span};
use varity_solver::{CallArgument, DefId, DefinitionStore, TypeId, TypeInterner};

/// One independent site to check.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CheckSite {
    /// `callee(args...)`
    Call {
        callee: DefId,
        args: Vec<CallArgument>,
        span: Span,
    },
    /// `Generic[args...]`
    Instantiate {
        def: DefId,
        args: Vec<TypeArgument>,
        span: Span,
    },
    /// `Alias` or `Alias[args...]`
    ExpandAlias {
        alias: DefId,
        args: Option<Vec<TypeArgument>>,
        span: Span,
    },
}

/// What checking one site produced.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SiteResult {
    /// The call's return type, or the instantiated/expanded type. `None`
    /// when the site failed.
    #[serde(skip)]
    pub type_id: Option<TypeId>,
    pub diagnostics: Vec<Diagnostic>,
}

impl SiteResult {
    fn from_result(result: Result<TypeId, Diagnostic>) -> Self {
        match result {
            Ok(type_id) => SiteResult {
                type_id: Some(type_id),
                diagnostics: Vec::new(),
            },
            Err(diag) => SiteResult {
                type_id: None,
                diagnostics: vec![diag],
            },
        }
    }

    pub fn is_ok(&self) -> bool {
        self.diagnostics.is_empty()
    }
}

impl CheckerState<'_> {
    pub fn check_site(&self, site: &CheckSite) -> SiteResult {
        let result = match site {
            CheckSite::Call { callee, args, span } => self
                .resolve_call(*callee, args, *span)
                .map(|matched| matched.resolution.return_type),
            CheckSite::Instantiate { def, args, span } => self.instantiate(*def, args, *span),
            CheckSite::ExpandAlias { alias, args, span } => {
                self.expand_alias(*alias, args.as_deref(), *span)
            }
        };
        SiteResult::from_result(result)
    }
}

/// Check every site, on the rayon pool when `options.parallel` is set.
pub fn check_batch(
    interner: &TypeInterner,
    defs: &DefinitionStore,
    file: &str,
    options: &CheckerOptions,
    sites: &[CheckSite],
) -> Vec<SiteResult> {
    let _span = info_span!("check_batch", sites = sites.len(), parallel = options.parallel).entered();
    let check = |site: &CheckSite| {
        CheckerState::new(interner, defs, file, options.clone()).check_site(site)
    };

    let results: Vec<SiteResult> = if options.parallel {
        sites.par_iter().map(check).collect()
    } else {
        sites.iter().map(check).collect()
    };
    debug!(
        failed = results.iter().filter(|r| !r.is_ok()).count(),
        "check_batch: done"
    );
    results
}

/// Diagnostics of a whole batch, flattened in site order.
pub fn batch_diagnostics(results: &[SiteResult]) -> Vec<Diagnostic> {
    results
        .iter()
        .flat_map(|result| result.diagnostics.iter().cloned())
        .collect()
}
