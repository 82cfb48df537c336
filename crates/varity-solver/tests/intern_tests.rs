use super::*;

#[test]
fn test_interner_intrinsics() {
    let interner = TypeInterner::new();

    assert_eq!(
        interner.lookup(TypeId::INT),
        Some(TypeData::Intrinsic(IntrinsicKind::Int))
    );
    assert_eq!(interner.lookup(TypeId::ERROR), Some(TypeData::Error));
    assert_eq!(
        interner.intern(TypeData::Intrinsic(IntrinsicKind::Str)),
        TypeId::STR
    );
    assert!(interner.is_empty());
}

#[test]
fn test_interner_deduplication() {
    let interner = TypeInterner::new();

    let a = interner.unbounded_tuple(TypeId::INT);
    let b = interner.unbounded_tuple(TypeId::INT);
    let c = interner.unbounded_tuple(TypeId::STR);

    assert_eq!(a, b);
    assert_ne!(a, c);
    assert_eq!(interner.lookup(a), Some(TypeData::UnboundedTuple(TypeId::INT)));
    assert!(!interner.is_empty());
}

#[test]
fn test_type_list_interning() {
    let interner = TypeInterner::new();

    let a = interner.intern_type_list(&[TypeId::INT, TypeId::STR]);
    let b = interner.intern_type_list(&[TypeId::INT, TypeId::STR]);
    let c = interner.intern_type_list(&[TypeId::STR, TypeId::INT]);

    assert_eq!(a, b);
    assert_ne!(a, c);
    assert_eq!(interner.intern_type_list(&[]), TypeListId::EMPTY);
    assert!(interner.type_list(TypeListId::EMPTY).is_empty());
    assert_eq!(&*interner.type_list(a), &[TypeId::INT, TypeId::STR]);
}

#[test]
fn test_type_var_identity_is_not_name() {
    let interner = TypeInterner::new();

    let first = interner.declare_type_var("Ts", VarKind::Variadic);
    let second = interner.declare_type_var("Ts", VarKind::Variadic);

    assert_ne!(first, second);
    assert_ne!(interner.unpacked_var(first), interner.unpacked_var(second));
    assert_eq!(interner.type_var_name(first), "Ts");
    assert_eq!(interner.type_var_kind(second), VarKind::Variadic);
}

#[test]
fn test_type_var_reference_by_kind() {
    let interner = TypeInterner::new();

    let t = interner.declare_type_var("T", VarKind::Single);
    let ts = interner.declare_type_var("Ts", VarKind::Variadic);

    assert_eq!(interner.lookup(interner.type_var(t)), Some(TypeData::TypeVar(t)));
    assert_eq!(
        interner.lookup(interner.type_var(ts)),
        Some(TypeData::VariadicVar(ts))
    );
}

#[test]
fn test_list_item_classification() {
    let interner = TypeInterner::new();
    let ts = interner.declare_type_var("Ts", VarKind::Variadic);
    let unbounded = interner.unbounded_tuple(TypeId::FLOAT);
    let open = interner.intern(TypeData::Unpack(unbounded));

    assert_eq!(interner.list_item(TypeId::INT), ListItem::Fixed(TypeId::INT));
    assert_eq!(
        interner.list_item(interner.unpacked_var(ts)),
        ListItem::Variadic(ts)
    );
    assert_eq!(interner.list_item(open), ListItem::Unbounded(TypeId::FLOAT));
}

#[test]
fn test_interner_is_shareable_across_threads() {
    use rayon::prelude::*;

    let interner = TypeInterner::new();
    let ids: Vec<TypeId> = (0..64)
        .into_par_iter()
        .map(|i| {
            let element = if i % 2 == 0 { TypeId::INT } else { TypeId::STR };
            interner.unbounded_tuple(element)
        })
        .collect();

    assert_eq!(ids[0], ids[2]);
    assert_eq!(ids[1], ids[3]);
    assert_ne!(ids[0], ids[1]);
}
