//! Turning solver failures into user-facing diagnostics.
//!
//! Failures arrive as raw ids (`ArgumentFailure`, `ConstructionError`) and
//! are rendered here through `TypeFormatter`, so the cost of formatting is
//! only paid for failures that are actually reported.

use crate::state::CheckerState;
use tracing::trace;
use varity_common::diagnostics::{
    DiagnosticCategory, DiagnosticRelatedInformation, diagnostic_codes, format_message,
    get_diagnostic_message, get_message_template,
};
use varity_common::{Diagnostic, Span};
use varity_solver::{
    ArgumentFailure, ConstructionError, DefId, DefinitionInfo, ErrorKind, ParamKind,
    PendingDiagnostic, Signature, TypeFormatter,
};

/// The error kind a diagnostic code reports, if it is one of the engine's.
pub fn error_kind(code: u32) -> Option<ErrorKind> {
    use diagnostic_codes::*;
    let kind = match code {
        EXPECTED_ARGUMENTS | EXPECTED_AT_LEAST_ARGUMENTS | UNKNOWN_LENGTH_FIXED_PARAMETERS => {
            ErrorKind::Arity
        }
        UNKNOWN_LENGTH_VARIADIC_BINDING => ErrorKind::UnknownLength,
        INCONSISTENT_BINDING => ErrorKind::InconsistentBinding,
        ARGUMENT_TYPE_MISMATCH => ErrorKind::TypeMismatch,
        INSTANTIATION_EXCESSIVELY_DEEP => ErrorKind::InstantiationDepth,
        MULTIPLE_VARIADIC => ErrorKind::MultipleVariadic,
        BARE_VARIADIC => ErrorKind::BareVariadic,
        VARIADIC_NOT_LAST_ALIAS_PARAMETER => ErrorKind::VariadicPosition,
        INVALID_UNPACK | UNPACK_OUTSIDE_LIST => ErrorKind::InvalidUnpack,
        NO_MATCHING_OVERLOAD => ErrorKind::NoMatchingOverload,
        NOT_GENERIC | UNKNOWN_DEFINITION => ErrorKind::NotGeneric,
        _ => return None,
    };
    Some(kind)
}

impl<'a> CheckerState<'a> {
    pub(crate) fn formatter(&self) -> TypeFormatter<'a> {
        TypeFormatter::new(self.interner).with_def_store(self.defs)
    }

    fn error(&self, pending: &PendingDiagnostic, span: Span) -> Diagnostic {
        let message = self.formatter().render(pending);
        Diagnostic::error_at(&self.file, span, message, pending.code)
    }

    /// Name of a declaration as the user wrote it.
    pub(crate) fn def_display_name(&self, def: DefId) -> String {
        self.formatter().format(self.interner.unparameterized(def))
    }

    /// Anchor a binding failure at the argument it is attributed to, or at
    /// the whole site.
    pub(crate) fn argument_failure(
        &self,
        failure: &ArgumentFailure,
        arg_spans: &[Span],
        site: Span,
    ) -> Diagnostic {
        let span = failure
            .arg_index
            .and_then(|index| arg_spans.get(index).copied())
            .unwrap_or(site);
        trace!(
            kind = %failure.kind(),
            arg_index = ?failure.arg_index,
            "argument_failure"
        );
        self.error(&failure.failure.to_pending(), span)
    }

    /// A declaration rejected at construction time (two variadic type
    /// parameters, a variadic alias parameter that is not last, ...).
    pub fn construction_diagnostic(&self, err: &ConstructionError, span: Span) -> Diagnostic {
        self.error(&err.to_pending(), span)
    }

    pub(crate) fn unknown_definition(&self, def: DefId, span: Span) -> Diagnostic {
        let pending = PendingDiagnostic::error(diagnostic_codes::UNKNOWN_DEFINITION)
            .arg(format!("<def {}>", def.0));
        self.error(&pending, span)
    }

    pub(crate) fn not_generic(&self, def: DefId, span: Span) -> Diagnostic {
        let pending =
            PendingDiagnostic::error(diagnostic_codes::NOT_GENERIC).arg(self.def_display_name(def));
        self.error(&pending, span)
    }

    pub(crate) fn not_callable(&self, def: DefId, span: Span) -> Diagnostic {
        let pending =
            PendingDiagnostic::error(diagnostic_codes::NOT_CALLABLE).arg(self.def_display_name(def));
        self.error(&pending, span)
    }

    /// No overload bound. Each rejected candidate's failure becomes related
    /// information, anchored where that candidate failed.
    pub(crate) fn no_matching_overload(
        &self,
        callee: &DefinitionInfo,
        failures: &[ArgumentFailure],
        arg_spans: &[Span],
        site: Span,
    ) -> Diagnostic {
        let name = self.interner.resolve_atom(callee.name);
        let pending = PendingDiagnostic::error(diagnostic_codes::NO_MATCHING_OVERLOAD).arg(name);
        let mut diag = self.error(&pending, site);
        if !self.options.report_overload_candidates {
            return diag;
        }

        let Some(template) = get_message_template(diagnostic_codes::OVERLOAD_CANDIDATE_FAILED)
        else {
            return diag;
        };
        let category = get_diagnostic_message(diagnostic_codes::OVERLOAD_CANDIDATE_FAILED)
            .map_or(DiagnosticCategory::Message, |m| m.category);
        let total = callee.signatures.len().to_string();
        for (index, (signature, failure)) in callee.signatures.iter().zip(failures).enumerate() {
            let reason = self.argument_failure(failure, arg_spans, site);
            let ordinal = (index + 1).to_string();
            let text = self.format_signature(signature);
            diag.related_information.push(DiagnosticRelatedInformation {
                file: self.file.clone(),
                start: reason.start,
                length: reason.length,
                message_text: format_message(
                    template,
                    &[&ordinal, &total, &text, &reason.message_text],
                ),
                category,
                code: diagnostic_codes::OVERLOAD_CANDIDATE_FAILED,
            });
        }
        diag
    }

    /// `(x: int, *args: *Ts) -> Tuple[*Ts]`
    pub fn format_signature(&self, signature: &Signature) -> String {
        let mut fmt = self.formatter();
        let params: Vec<String> = signature
            .params
            .iter()
            .map(|param| {
                let name = self.interner.resolve_atom(param.name);
                let ty = fmt.format(param.type_id);
                match (param.kind, name.is_empty()) {
                    (ParamKind::Positional, true) => ty,
                    (ParamKind::Positional, false) => format!("{name}: {ty}"),
                    (ParamKind::VarArgs, true) => format!("*args: {ty}"),
                    (ParamKind::VarArgs, false) => format!("*{name}: {ty}"),
                }
            })
            .collect();
        format!("({}) -> {}", params.join(", "), fmt.format(signature.return_type))
    }
}
