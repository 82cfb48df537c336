//! Rendering types and pending diagnostics as annotation text.

use crate::def::{DefId, DefinitionStore};
use crate::diagnostics::{DiagnosticArg, PendingDiagnostic};
use crate::environment::BoundValue;
use crate::intern::TypeInterner;
use crate::types::{TypeData, TypeId, TypeListId};
use varity_common::diagnostics::{format_message, get_message_template};
use varity_common::limits::MAX_INSTANTIATION_DEPTH;

/// Formats `TypeId`s in annotation spelling:
/// `Tuple[int, *Ts]`, `Tuple[int, ...]`, `Callable[[int], str]`, `int | str`.
pub struct TypeFormatter<'a> {
    interner: &'a TypeInterner,
    defs: Option<&'a DefinitionStore>,
    depth: u32,
}

impl<'a> TypeFormatter<'a> {
    pub const fn new(interner: &'a TypeInterner) -> Self {
        TypeFormatter {
            interner,
            defs: None,
            depth: 0,
        }
    }

    /// Resolve declaration names through `defs`.
    #[must_use]
    pub const fn with_def_store(mut self, defs: &'a DefinitionStore) -> Self {
        self.defs = Some(defs);
        self
    }

    pub fn format(&mut self, type_id: TypeId) -> String {
        if self.depth > MAX_INSTANTIATION_DEPTH {
            return "...".to_string();
        }
        self.depth += 1;
        let result = self.format_inner(type_id);
        self.depth -= 1;
        result
    }

    fn format_inner(&mut self, type_id: TypeId) -> String {
        let Some(data) = self.interner.lookup(type_id) else {
            return format!("<unknown {}>", type_id.0);
        };
        match data {
            TypeData::Intrinsic(kind) => kind.name().to_string(),
            TypeData::Error => "error".to_string(),
            TypeData::Instance(def) | TypeData::Unparameterized(def) => self.def_name(def),
            TypeData::Application(def, list) => {
                let name = self.def_name(def);
                let args = self.type_list(list);
                if args.is_empty() {
                    format!("{name}[()]")
                } else {
                    format!("{name}[{}]", args.join(", "))
                }
            }
            TypeData::UnboundedTuple(element) => format!("Tuple[{}, ...]", self.format(element)),
            TypeData::TypeVar(var) | TypeData::VariadicVar(var) => {
                self.interner.type_var_name(var)
            }
            TypeData::Unpack(inner) => format!("*{}", self.format(inner)),
            TypeData::Union(list) => self.type_list(list).join(" | "),
            TypeData::Callable { params, ret } => {
                let params = self.type_list(params).join(", ");
                format!("Callable[[{params}], {}]", self.format(ret))
            }
        }
    }

    /// `(int, str)`, `(int,)` or `()` for a sequence; the type for a single
    /// binding.
    pub fn format_bound(&mut self, value: &BoundValue) -> String {
        match value {
            BoundValue::Single(type_id) => self.format(*type_id),
            BoundValue::Sequence(list) => match self.type_list(*list).as_slice() {
                [] => "()".to_string(),
                [only] => format!("({only},)"),
                items => format!("({})", items.join(", ")),
            },
        }
    }

    /// Render a pending diagnostic's message text.
    pub fn render(&mut self, pending: &PendingDiagnostic) -> String {
        let Some(template) = get_message_template(pending.code) else {
            return format!("error {}", pending.code);
        };
        let args: Vec<String> = pending.args.iter().map(|arg| self.render_arg(arg)).collect();
        let refs: Vec<&str> = args.iter().map(String::as_str).collect();
        format_message(template, &refs)
    }

    fn render_arg(&mut self, arg: &DiagnosticArg) -> String {
        match arg {
            DiagnosticArg::Type(type_id) => self.format(*type_id),
            DiagnosticArg::Var(var) => self.interner.type_var_name(*var),
            DiagnosticArg::Bound(value) => self.format_bound(value),
            DiagnosticArg::Atom(atom) => self.interner.resolve_atom(*atom),
            DiagnosticArg::String(s) => s.to_string(),
            DiagnosticArg::Number(n) => n.to_string(),
        }
    }

    fn type_list(&mut self, list: TypeListId) -> Vec<String> {
        self.interner
            .type_list(list)
            .iter()
            .map(|&item| self.format(item))
            .collect()
    }

    fn def_name(&self, def: DefId) -> String {
        if def == DefId::TUPLE {
            return "Tuple".to_string();
        }
        self.defs
            .and_then(|defs| defs.get_name(def))
            .map(|atom| self.interner.resolve_atom(atom))
            .unwrap_or_else(|| format!("<def {}>", def.0))
    }
}

#[cfg(test)]
#[path = "../tests/format_tests.rs"]
mod tests;
