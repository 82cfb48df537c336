use super::*;
use crate::diagnostics::BindFailure;

#[test]
fn test_new_environment_owns_given_vars() {
    let interner = TypeInterner::new();
    let t = interner.declare_type_var("T", VarKind::Single);
    let ts = interner.declare_type_var("Ts", VarKind::Variadic);
    let rigid = interner.declare_type_var("U", VarKind::Single);

    let mut env = BindingEnvironment::new(&interner, &[t, ts]);

    assert!(env.owns(t));
    assert!(env.owns(ts));
    assert!(!env.owns(rigid));
    assert_eq!(env.kind(ts), Some(VarKind::Variadic));
    assert_eq!(env.state(t), BindingState::Unbound);
    assert_eq!(env.probe(rigid), None);
}

#[test]
fn test_bindings_follow_registration_order() {
    let interner = TypeInterner::new();
    let t = interner.declare_type_var("T", VarKind::Single);
    let ts = interner.declare_type_var("Ts", VarKind::Variadic);
    let mut env = BindingEnvironment::new(&interner, &[t, ts]);
    let seq = interner.intern_type_list(&[TypeId::INT]);

    env.reconcile(ts, BoundValue::Sequence(seq)).expect("first binding");
    env.reconcile(t, BoundValue::Single(TypeId::STR)).expect("first binding");

    assert_eq!(
        env.bindings(),
        vec![
            (t, BoundValue::Single(TypeId::STR)),
            (ts, BoundValue::Sequence(seq)),
        ]
    );
}

#[test]
fn test_speculation_rolls_back_on_failure() {
    let interner = TypeInterner::new();
    let t = interner.declare_type_var("T", VarKind::Single);
    let mut env = BindingEnvironment::new(&interner, &[t]);

    let snapshot = env.snapshot();
    env.reconcile(t, BoundValue::Single(TypeId::INT)).expect("first");
    let result: Result<(), BindFailure> = env.reconcile(t, BoundValue::Single(TypeId::STR));
    assert!(result.is_err());
    env.rollback_to(snapshot);

    assert_eq!(env.state(t), BindingState::Unbound);
}

#[test]
fn test_speculation_keeps_bindings_on_success() {
    let interner = TypeInterner::new();
    let t = interner.declare_type_var("T", VarKind::Single);
    let mut env = BindingEnvironment::new(&interner, &[t]);

    let snapshot = env.snapshot();
    env.reconcile(t, BoundValue::Single(TypeId::INT))
        .expect("binding succeeds");
    env.commit(snapshot);

    assert_eq!(env.state(t), BindingState::Bound(BoundValue::Single(TypeId::INT)));
}

#[test]
fn test_to_substitution_skips_unbound() {
    let interner = TypeInterner::new();
    let t = interner.declare_type_var("T", VarKind::Single);
    let u = interner.declare_type_var("U", VarKind::Single);
    let mut env = BindingEnvironment::new(&interner, &[t, u]);

    env.reconcile(t, BoundValue::Single(TypeId::INT)).expect("bind");
    let subst = env.to_substitution();

    assert_eq!(subst.len(), 1);
    assert_eq!(subst.get(t), Some(&BoundValue::Single(TypeId::INT)));
    assert_eq!(subst.get(u), None);
}

#[test]
fn test_register_twice_is_noop() {
    let interner = TypeInterner::new();
    let t = interner.declare_type_var("T", VarKind::Single);
    let mut env = BindingEnvironment::empty();

    env.register(t, VarKind::Single);
    env.reconcile(t, BoundValue::Single(TypeId::INT)).expect("bind");
    env.register(t, VarKind::Single);

    assert_eq!(env.probe(t), Some(BoundValue::Single(TypeId::INT)));
}
