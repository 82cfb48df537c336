//! Variadic binding benchmarks.
//!
//! Measures list binding, call resolution and substitution as the argument
//! count grows.

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use std::sync::Arc;
use varity_common::{Atom, Span};
use varity_solver::{
    CallArgument, CallEvaluator, DefinitionStore, ParamInfo, Signature, TypeFactory, TypeId,
    TypeInterner, TypeSubstitution, VarKind, bind_lists, instantiate_type,
};

const ARG_COUNTS: [usize; 4] = [1, 8, 32, 128];

const ELEMENTS: [TypeId; 5] = [
    TypeId::INT,
    TypeId::STR,
    TypeId::BOOL,
    TypeId::FLOAT,
    TypeId::BYTES,
];

fn arguments(count: usize) -> Vec<TypeId> {
    ELEMENTS.iter().copied().cycle().take(count).collect()
}

/// `(T, *Ts, U)` against `count` arguments.
fn bench_bind_lists(c: &mut Criterion) {
    let mut group = c.benchmark_group("bind_lists");
    let interner = TypeInterner::new();
    let t = interner.declare_type_var("T", VarKind::Single);
    let ts = interner.declare_type_var("Ts", VarKind::Variadic);
    let u = interner.declare_type_var("U", VarKind::Single);
    let params = [
        interner.type_var(t),
        interner.unpacked_var(ts),
        interner.type_var(u),
    ];

    for count in ARG_COUNTS {
        let args = arguments(count + 2);
        group.bench_with_input(BenchmarkId::new("prefix_slot_suffix", count), &args, |b, args| {
            b.iter(|| bind_lists(&interner, &[t, ts, u], black_box(&params), black_box(args)))
        });
    }
    group.finish();
}

/// `def f(*args: *Ts) -> Tuple[*Ts]` called with `count` arguments.
fn bench_resolve_call(c: &mut Criterion) {
    let mut group = c.benchmark_group("resolve_call");
    let interner = TypeInterner::new();
    let store = DefinitionStore::new();
    let factory = TypeFactory::new(&interner);
    let ts = interner.declare_type_var("Ts", VarKind::Variadic);
    let ret = factory
        .tuple(&[interner.unpacked_var(ts)])
        .expect("valid return type");
    let def = store
        .declare_function(
            &interner,
            "f",
            vec![Signature {
                type_params: Vec::new(),
                params: vec![ParamInfo::var_args(Atom::NONE, interner.unpacked_var(ts))],
                return_type: ret,
            }],
        )
        .expect("valid signature");
    let signatures: Vec<Arc<Signature>> = store.get_signatures(def).expect("function");
    let evaluator = CallEvaluator::new(&interner);

    for count in ARG_COUNTS {
        let args: Vec<CallArgument> = arguments(count)
            .into_iter()
            .map(|type_id| CallArgument::positional(type_id, Span::DUMMY))
            .collect();
        group.bench_with_input(BenchmarkId::new("var_args", count), &args, |b, args| {
            b.iter(|| evaluator.resolve_overloads(black_box(&signatures), black_box(args)))
        });
    }
    group.finish();
}

/// Substituting a bound sequence into `Callable[[*Ts], Tuple[int, *Ts]]`.
fn bench_instantiate(c: &mut Criterion) {
    let mut group = c.benchmark_group("instantiate");
    let interner = TypeInterner::new();
    let factory = TypeFactory::new(&interner);
    let ts = interner.declare_type_var("Ts", VarKind::Variadic);
    let shaped = factory
        .tuple(&[TypeId::INT, interner.unpacked_var(ts)])
        .expect("valid tuple");
    let callable = factory
        .callable(&[interner.unpacked_var(ts)], shaped)
        .expect("valid callable");

    for count in ARG_COUNTS {
        let mut subst = TypeSubstitution::new();
        subst.insert_sequence(&interner, ts, &arguments(count));
        group.bench_with_input(BenchmarkId::new("splice", count), &subst, |b, subst| {
            b.iter(|| instantiate_type(&interner, black_box(callable), subst))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_bind_lists, bench_resolve_call, bench_instantiate);
criterion_main!(benches);
