use super::*;
use crate::def::DefinitionStore;
use crate::types::{TypeListId, VarKind};

#[test]
fn test_substitution_basic() {
    let interner = TypeInterner::new();
    let factory = TypeFactory::new(&interner);
    let t = interner.declare_type_var("T", VarKind::Single);

    let mut subst = TypeSubstitution::new();
    subst.insert_single(t, TypeId::INT);
    let generic = factory
        .tuple(&[interner.type_var(t), TypeId::STR])
        .expect("tuple");

    assert_eq!(
        instantiate_type(&interner, generic, &subst),
        factory.tuple(&[TypeId::INT, TypeId::STR]).expect("tuple")
    );
}

#[test]
fn test_sequence_is_spliced() {
    let interner = TypeInterner::new();
    let factory = TypeFactory::new(&interner);
    let ts = interner.declare_type_var("Ts", VarKind::Variadic);

    let mut subst = TypeSubstitution::new();
    subst.insert_sequence(&interner, ts, &[TypeId::INT, TypeId::STR]);
    let generic = factory
        .tuple(&[TypeId::BOOL, interner.unpacked_var(ts), TypeId::NONE_TYPE])
        .expect("tuple");

    assert_eq!(
        instantiate_type(&interner, generic, &subst),
        factory
            .tuple(&[TypeId::BOOL, TypeId::INT, TypeId::STR, TypeId::NONE_TYPE])
            .expect("tuple")
    );
}

#[test]
fn test_empty_sequence_in_class_application() {
    let interner = TypeInterner::new();
    let store = DefinitionStore::new();
    let factory = TypeFactory::new(&interner);
    let ts = interner.declare_type_var("Ts", VarKind::Variadic);
    let array = store
        .declare_class(&interner, "Array", vec![ts])
        .expect("class");

    let mut subst = TypeSubstitution::new();
    subst.insert_sequence(&interner, ts, &[]);
    let generic = factory
        .application(array, &[interner.unpacked_var(ts)])
        .expect("application");

    let result = instantiate_type(&interner, generic, &subst);
    assert_eq!(
        interner.lookup(result),
        Some(TypeData::Application(array, TypeListId::EMPTY))
    );
}

#[test]
fn test_callable_parameters_are_spliced() {
    let interner = TypeInterner::new();
    let factory = TypeFactory::new(&interner);
    let ts = interner.declare_type_var("Ts", VarKind::Variadic);

    let mut subst = TypeSubstitution::new();
    subst.insert_sequence(&interner, ts, &[TypeId::INT, TypeId::STR]);
    let generic = factory
        .callable(&[interner.unpacked_var(ts)], TypeId::INT)
        .expect("callable");

    assert_eq!(
        instantiate_type(&interner, generic, &subst),
        factory
            .callable(&[TypeId::INT, TypeId::STR], TypeId::INT)
            .expect("callable")
    );
}

#[test]
fn test_unbound_variables_stay_in_place() {
    let interner = TypeInterner::new();
    let factory = TypeFactory::new(&interner);
    let t = interner.declare_type_var("T", VarKind::Single);
    let u = interner.declare_type_var("U", VarKind::Single);

    let mut subst = TypeSubstitution::new();
    subst.insert_single(t, TypeId::INT);
    let generic = factory
        .tuple(&[interner.type_var(t), interner.type_var(u)])
        .expect("tuple");

    assert_eq!(
        instantiate_type(&interner, generic, &subst),
        factory
            .tuple(&[TypeId::INT, interner.type_var(u)])
            .expect("tuple")
    );
}

#[test]
fn test_bare_variadic_becomes_tuple() {
    let interner = TypeInterner::new();
    let factory = TypeFactory::new(&interner);
    let ts = interner.declare_type_var("Ts", VarKind::Variadic);

    let mut subst = TypeSubstitution::new();
    subst.insert_sequence(&interner, ts, &[TypeId::INT]);

    assert_eq!(
        instantiate_type(&interner, interner.type_var(ts), &subst),
        factory.tuple(&[TypeId::INT]).expect("tuple")
    );
}

#[test]
fn test_open_sequence_canonicalizes() {
    let interner = TypeInterner::new();
    let factory = TypeFactory::new(&interner);
    let ts = interner.declare_type_var("Ts", VarKind::Variadic);
    let open = factory
        .unpack(interner.unbounded_tuple(TypeId::INT))
        .expect("unpack");

    let mut subst = TypeSubstitution::new();
    subst.insert_sequence(&interner, ts, &[open]);
    let generic = factory.tuple(&[interner.unpacked_var(ts)]).expect("tuple");

    assert_eq!(
        instantiate_type(&interner, generic, &subst),
        interner.unbounded_tuple(TypeId::INT)
    );
}

#[test]
fn test_union_collapses_after_substitution() {
    let interner = TypeInterner::new();
    let factory = TypeFactory::new(&interner);
    let t = interner.declare_type_var("T", VarKind::Single);

    let mut subst = TypeSubstitution::new();
    subst.insert_single(t, TypeId::INT);
    let generic = factory
        .union(&[interner.type_var(t), TypeId::INT])
        .expect("union");

    assert_eq!(instantiate_type(&interner, generic, &subst), TypeId::INT);
}

#[test]
fn test_invalid_rebuild_marks_failure() {
    let interner = TypeInterner::new();
    let factory = TypeFactory::new(&interner);
    let ts = interner.declare_type_var("Ts", VarKind::Variadic);
    let us = interner.declare_type_var("Us", VarKind::Variadic);
    let vs = interner.declare_type_var("Vs", VarKind::Variadic);

    let mut subst = TypeSubstitution::new();
    subst.insert_sequence(
        &interner,
        ts,
        &[interner.unpacked_var(us), interner.unpacked_var(vs)],
    );
    let generic = factory.tuple(&[interner.unpacked_var(ts)]).expect("tuple");

    let mut instantiator = TypeInstantiator::new(&interner, &subst);
    assert_ne!(instantiator.instantiate(generic), generic);
    assert!(instantiator.failed());
    assert!(!instantiator.depth_exceeded());
    assert!(matches!(
        instantiator.invalid(),
        Some(ConstructionError::MultipleVariadic { .. })
    ));
}

#[test]
fn test_checked_instantiation_reports_invalid_rebuild() {
    let interner = TypeInterner::new();
    let factory = TypeFactory::new(&interner);
    let t = interner.declare_type_var("T", VarKind::Single);
    let us = interner.declare_type_var("Us", VarKind::Variadic);

    // `T := Us` puts a bare variadic variable inside `Tuple[T]`.
    let mut subst = TypeSubstitution::new();
    subst.insert_single(t, interner.type_var(us));
    let generic = factory.tuple(&[interner.type_var(t)]).expect("tuple");

    assert_eq!(
        instantiate_type_checked(&interner, generic, &subst, 10),
        Err(BindFailure::Construction(ConstructionError::BareVariadic { var: us }))
    );
}

#[test]
fn test_depth_limit() {
    let interner = TypeInterner::new();
    let factory = TypeFactory::new(&interner);
    let t = interner.declare_type_var("T", VarKind::Single);

    let mut subst = TypeSubstitution::new();
    subst.insert_single(t, TypeId::INT);
    let mut nested = interner.type_var(t);
    for _ in 0..4 {
        nested = factory.tuple(&[nested]).expect("tuple");
    }

    assert_eq!(
        instantiate_type_checked(&interner, nested, &subst, 2),
        Err(BindFailure::InstantiationDepth)
    );
    assert!(instantiate_type_checked(&interner, nested, &subst, 10).is_ok());
}

#[test]
fn test_bound_value_type() {
    let interner = TypeInterner::new();
    let factory = TypeFactory::new(&interner);
    let list = interner.intern_type_list(&[TypeId::INT, TypeId::STR]);

    assert_eq!(
        bound_value_type(&interner, &BoundValue::Single(TypeId::BOOL)),
        TypeId::BOOL
    );
    assert_eq!(
        bound_value_type(&interner, &BoundValue::Sequence(list)),
        factory.tuple(&[TypeId::INT, TypeId::STR]).expect("tuple")
    );
}
