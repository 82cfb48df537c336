//! Generic alias expansion through `CheckerState`.

use varity_checker::{CheckerOptions, CheckerState, TypeArgument, error_kind};
use varity_common::{Span, diagnostic_codes};
use varity_solver::{
    DefId, DefinitionStore, ErrorKind, TypeFactory, TypeFormatter, TypeId, TypeInterner, VarKind,
};

const SITE: Span = Span::new(20, 48);

fn arg_span(index: usize) -> Span {
    Span::at(29 + 7 * index as u32, 5)
}

fn type_args(types: &[TypeId]) -> Vec<TypeArgument> {
    types
        .iter()
        .enumerate()
        .map(|(i, &type_id)| TypeArgument::new(type_id, arg_span(i)))
        .collect()
}

struct Fixture {
    interner: TypeInterner,
    defs: DefinitionStore,
    /// `IntTuple = Tuple[int, *Ts]`
    int_tuple: DefId,
}

impl Fixture {
    fn new() -> Self {
        let interner = TypeInterner::new();
        let defs = DefinitionStore::new();
        let ts = interner.declare_type_var("Ts", VarKind::Variadic);
        let body = TypeFactory::new(&interner)
            .tuple(&[TypeId::INT, interner.unpacked_var(ts)])
            .expect("tuple");
        let int_tuple = defs
            .declare_alias(&interner, "IntTuple", vec![ts], body)
            .expect("alias");
        Fixture {
            interner,
            defs,
            int_tuple,
        }
    }

    fn factory(&self) -> TypeFactory<'_> {
        TypeFactory::new(&self.interner)
    }

    fn state(&self) -> CheckerState<'_> {
        self.state_with(CheckerOptions::default())
    }

    fn state_with(&self, options: CheckerOptions) -> CheckerState<'_> {
        CheckerState::new(&self.interner, &self.defs, "aliases.py", options)
    }

    fn format(&self, type_id: TypeId) -> String {
        TypeFormatter::new(&self.interner)
            .with_def_store(&self.defs)
            .format(type_id)
    }
}

#[test]
fn test_alias_flattening() {
    let fx = Fixture::new();
    let state = fx.state();

    let bare = state.expand_alias(fx.int_tuple, None, SITE).expect("bare");
    assert_eq!(fx.format(bare), "Tuple[int]");

    let empty = state
        .expand_alias(fx.int_tuple, Some(&[][..]), SITE)
        .expect("empty");
    assert_eq!(empty, bare);

    let two = state
        .expand_alias(
            fx.int_tuple,
            Some(type_args(&[TypeId::FLOAT, TypeId::BOOL]).as_slice()),
            SITE,
        )
        .expect("two arguments");
    assert_eq!(fx.format(two), "Tuple[int, float, bool]");
}

#[test]
fn test_instantiate_routes_aliases_to_expansion() {
    let fx = Fixture::new();
    let state = fx.state();
    let args = type_args(&[TypeId::STR]);

    assert_eq!(
        state.instantiate(fx.int_tuple, &args, SITE),
        state.expand_alias(fx.int_tuple, Some(args.as_slice()), SITE)
    );
}

#[test]
fn test_bare_alias_defaults() {
    let fx = Fixture::new();
    let t = fx.interner.declare_type_var("T", VarKind::Single);
    let ts = fx.interner.declare_type_var("Rest", VarKind::Variadic);
    let body = fx
        .factory()
        .tuple(&[fx.interner.type_var(t), fx.interner.unpacked_var(ts)])
        .expect("tuple");
    let pair = fx
        .defs
        .declare_alias(&fx.interner, "Head", vec![t, ts], body)
        .expect("alias");

    let expanded = fx.state().expand_alias(pair, None, SITE).expect("bare");
    assert_eq!(fx.format(expanded), "Tuple[Any]");
}

#[test]
fn test_unknown_length_alias_argument() {
    let fx = Fixture::new();
    let open = fx
        .factory()
        .unpack(fx.interner.unbounded_tuple(TypeId::STR))
        .expect("unpack");

    let diag = fx
        .state()
        .expand_alias(fx.int_tuple, Some(type_args(&[TypeId::BOOL, open]).as_slice()), SITE)
        .expect_err("unknown length");
    assert_eq!(diag.code, diagnostic_codes::UNKNOWN_LENGTH_VARIADIC_BINDING);
    assert_eq!(error_kind(diag.code), Some(ErrorKind::UnknownLength));
    assert_eq!(diag.span(), arg_span(1));
    assert_eq!(diag.file, "aliases.py");
}

#[test]
fn test_variadic_alias_parameter_must_be_last() {
    let fx = Fixture::new();
    let ts = fx.interner.declare_type_var("Ts", VarKind::Variadic);
    let t = fx.interner.declare_type_var("T", VarKind::Single);
    let body = fx
        .factory()
        .tuple(&[fx.interner.unpacked_var(ts), fx.interner.type_var(t)])
        .expect("tuple");

    let err = fx
        .defs
        .declare_alias(&fx.interner, "Bad", vec![ts, t], body)
        .expect_err("variadic parameter first");
    let diag = fx.state().construction_diagnostic(&err, SITE);
    assert_eq!(diag.code, diagnostic_codes::VARIADIC_NOT_LAST_ALIAS_PARAMETER);
    assert_eq!(
        diag.message_text,
        "Variadic type variable 'Ts' must be the last type parameter of alias 'Bad'."
    );
    assert_eq!(error_kind(diag.code), Some(ErrorKind::VariadicPosition));
}

#[test]
fn test_instantiation_depth_option() {
    let fx = Fixture::new();
    let t = fx.interner.declare_type_var("T", VarKind::Single);
    let inner = fx
        .factory()
        .tuple(&[fx.interner.type_var(t)])
        .expect("tuple");
    let body = fx.factory().tuple(&[inner]).expect("tuple");
    let nested = fx
        .defs
        .declare_alias(&fx.interner, "Nested", vec![t], body)
        .expect("alias");
    let args = type_args(&[TypeId::INT]);

    let shallow = CheckerOptions {
        max_instantiation_depth: 1,
        ..CheckerOptions::default()
    };
    let diag = fx
        .state_with(shallow)
        .expand_alias(nested, Some(args.as_slice()), SITE)
        .expect_err("too deep");
    assert_eq!(diag.code, diagnostic_codes::INSTANTIATION_EXCESSIVELY_DEEP);
    assert_eq!(error_kind(diag.code), Some(ErrorKind::InstantiationDepth));
    assert_eq!(diag.span(), SITE);

    let expanded = fx
        .state()
        .expand_alias(nested, Some(args.as_slice()), SITE)
        .expect("default depth");
    assert_eq!(fx.format(expanded), "Tuple[Tuple[int]]");
}

#[test]
fn test_non_alias_declarations_resolve_as_written() {
    let fx = Fixture::new();
    let shape = fx.interner.declare_type_var("Shape", VarKind::Variadic);
    let array = fx
        .defs
        .declare_class(&fx.interner, "Array", vec![shape])
        .expect("class");
    let height = fx.defs.declare_class(&fx.interner, "Height", vec![]).expect("class");
    let state = fx.state();

    let bare = state.expand_alias(array, None, SITE).expect("bare generic");
    assert_eq!(bare, fx.interner.unparameterized(array));
    assert_eq!(
        state.expand_alias(height, None, SITE),
        Ok(fx.interner.instance(height))
    );

    let applied = state
        .expand_alias(array, Some(type_args(&[fx.interner.instance(height)]).as_slice()), SITE)
        .expect("applied");
    assert_eq!(fx.format(applied), "Array[Height]");

    let diag = state
        .expand_alias(height, Some(type_args(&[TypeId::INT]).as_slice()), SITE)
        .expect_err("not generic");
    assert_eq!(diag.code, diagnostic_codes::NOT_GENERIC);
}
