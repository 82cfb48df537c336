use super::*;
use crate::def::DefinitionStore;
use crate::type_factory::TypeFactory;
use crate::types::VarKind;

#[test]
fn test_top_and_bottom() {
    let interner = TypeInterner::new();

    assert!(is_assignable(&interner, TypeId::INT, TypeId::ANY));
    assert!(is_assignable(&interner, TypeId::ANY, TypeId::INT));
    assert!(is_assignable(&interner, TypeId::INT, TypeId::OBJECT));
    assert!(is_assignable(&interner, TypeId::NEVER, TypeId::STR));
    assert!(!is_assignable(&interner, TypeId::OBJECT, TypeId::INT));
}

#[test]
fn test_no_implicit_promotion() {
    let interner = TypeInterner::new();

    assert!(!is_assignable(&interner, TypeId::BOOL, TypeId::INT));
    assert!(!is_assignable(&interner, TypeId::INT, TypeId::FLOAT));
}

#[test]
fn test_union_rules() {
    let interner = TypeInterner::new();
    let factory = TypeFactory::new(&interner);
    let int_or_str = factory.union(&[TypeId::INT, TypeId::STR]).expect("union");

    assert!(is_assignable(&interner, TypeId::INT, int_or_str));
    assert!(!is_assignable(&interner, TypeId::BOOL, int_or_str));
    assert!(!is_assignable(&interner, int_or_str, TypeId::INT));
    assert!(is_assignable(&interner, int_or_str, TypeId::OBJECT));
}

#[test]
fn test_unparameterized_generic_is_gradual() {
    let interner = TypeInterner::new();
    let store = DefinitionStore::new();
    let factory = TypeFactory::new(&interner);
    let ts = interner.declare_type_var("Ts", VarKind::Variadic);
    let array = store
        .declare_class(&interner, "Array", vec![ts])
        .expect("class");

    let bare = interner.unparameterized(array);
    let concrete = factory
        .application(array, &[TypeId::INT, TypeId::STR])
        .expect("application");

    assert!(is_assignable(&interner, bare, concrete));
    assert!(is_assignable(&interner, concrete, bare));
}

#[test]
fn test_bare_tuple_is_not_gradual_for_fixed_tuples() {
    let interner = TypeInterner::new();
    let factory = TypeFactory::new(&interner);

    let bare = interner.unparameterized(DefId::TUPLE);
    let pair = factory.tuple(&[TypeId::INT, TypeId::STR]).expect("tuple");
    let unbounded = factory.unbounded_tuple(TypeId::INT).expect("unbounded");

    assert!(!is_assignable(&interner, bare, pair));
    assert!(is_assignable(&interner, pair, bare));
    assert!(is_assignable(&interner, bare, unbounded));
    assert!(is_assignable(&interner, unbounded, bare));
}

#[test]
fn test_fixed_tuple_to_unbounded() {
    let interner = TypeInterner::new();
    let factory = TypeFactory::new(&interner);

    let ints = factory.tuple(&[TypeId::INT, TypeId::INT]).expect("tuple");
    let mixed = factory.tuple(&[TypeId::INT, TypeId::STR]).expect("tuple");
    let unbounded = factory.unbounded_tuple(TypeId::INT).expect("unbounded");

    assert!(is_assignable(&interner, ints, unbounded));
    assert!(!is_assignable(&interner, mixed, unbounded));
    assert!(!is_assignable(&interner, unbounded, ints));
}

#[test]
fn test_applications_are_invariant() {
    let interner = TypeInterner::new();
    let store = DefinitionStore::new();
    let factory = TypeFactory::new(&interner);
    let ts = interner.declare_type_var("Ts", VarKind::Variadic);
    let array = store
        .declare_class(&interner, "Array", vec![ts])
        .expect("class");

    let of_int = factory.application(array, &[TypeId::INT]).expect("app");
    let of_object = factory.application(array, &[TypeId::OBJECT]).expect("app");
    let of_any = factory.application(array, &[TypeId::ANY]).expect("app");
    let of_two = factory
        .application(array, &[TypeId::INT, TypeId::INT])
        .expect("app");

    assert!(!is_assignable(&interner, of_int, of_object));
    assert!(is_assignable(&interner, of_int, of_any));
    assert!(!is_assignable(&interner, of_int, of_two));
}

#[test]
fn test_rigid_variadic_matches_only_itself() {
    let interner = TypeInterner::new();
    let factory = TypeFactory::new(&interner);
    let ts = interner.declare_type_var("Ts", VarKind::Variadic);
    let us = interner.declare_type_var("Us", VarKind::Variadic);

    let of_ts = factory.tuple(&[interner.unpacked_var(ts)]).expect("tuple");
    let of_us = factory.tuple(&[interner.unpacked_var(us)]).expect("tuple");
    let resolver = GradualResolver::new(&interner);

    assert!(resolver.is_consistent(of_ts, of_ts));
    assert!(!resolver.is_assignable(of_ts, of_us));
    assert!(resolver.is_assignable(of_ts, factory.unbounded_tuple(TypeId::OBJECT).expect("unbounded")));
}

#[test]
fn test_callable_assignability() {
    let interner = TypeInterner::new();
    let factory = TypeFactory::new(&interner);

    let to_int = factory.callable(&[TypeId::STR], TypeId::INT).expect("callable");
    let to_object = factory
        .callable(&[TypeId::STR], TypeId::OBJECT)
        .expect("callable");
    let other_params = factory.callable(&[TypeId::INT], TypeId::INT).expect("callable");

    assert!(is_assignable(&interner, to_int, to_object));
    assert!(!is_assignable(&interner, to_object, to_int));
    assert!(!is_assignable(&interner, other_params, to_int));
}
