use super::*;
use crate::types::TypeListId;

#[test]
fn test_unknown_length_kind_depends_on_target() {
    let on_fixed = BindFailure::UnknownLength {
        var: None,
        source: TypeId::INT,
    };
    let on_variadic = BindFailure::UnknownLength {
        var: Some(TypeVarId(0)),
        source: TypeId::INT,
    };

    assert_eq!(on_fixed.kind(), ErrorKind::Arity);
    assert_eq!(on_variadic.kind(), ErrorKind::UnknownLength);
    assert_eq!(
        on_fixed.to_pending().code,
        diagnostic_codes::UNKNOWN_LENGTH_FIXED_PARAMETERS
    );
    assert_eq!(
        on_variadic.to_pending().code,
        diagnostic_codes::UNKNOWN_LENGTH_VARIADIC_BINDING
    );
}

#[test]
fn test_arity_code_depends_on_slot() {
    let exact = BindFailure::Arity {
        expected: 2,
        actual: 3,
        at_least: false,
    };
    let minimum = BindFailure::Arity {
        expected: 2,
        actual: 1,
        at_least: true,
    };

    assert_eq!(exact.to_pending().code, diagnostic_codes::EXPECTED_ARGUMENTS);
    assert_eq!(
        minimum.to_pending().code,
        diagnostic_codes::EXPECTED_AT_LEAST_ARGUMENTS
    );
    assert_eq!(
        minimum.to_pending().args,
        vec![DiagnosticArg::Number(2), DiagnosticArg::Number(1)]
    );
}

#[test]
fn test_construction_failure_keeps_its_kind() {
    let err = ConstructionError::MultipleVariadic {
        first: TypeId::INT,
        second: TypeId::STR,
    };
    let failure: BindFailure = err.clone().into();

    assert_eq!(failure.kind(), ErrorKind::MultipleVariadic);
    assert_eq!(failure.to_pending(), err.to_pending());

    let outside = ConstructionError::UnpackOutsideList {
        unpacked: TypeId::INT,
    };
    assert_eq!(outside.kind(), ErrorKind::InvalidUnpack);
    assert_eq!(
        outside.to_pending().code,
        diagnostic_codes::UNPACK_OUTSIDE_LIST
    );
}

#[test]
fn test_inconsistent_binding_args() {
    let failure = BindFailure::InconsistentBinding {
        var: TypeVarId(3),
        existing: BoundValue::Sequence(TypeListId::EMPTY),
        attempted: BoundValue::Single(TypeId::INT),
    };
    let pending = failure.to_pending();

    assert_eq!(pending.code, diagnostic_codes::INCONSISTENT_BINDING);
    assert_eq!(
        pending.args,
        vec![
            DiagnosticArg::Var(TypeVarId(3)),
            DiagnosticArg::Bound(BoundValue::Sequence(TypeListId::EMPTY)),
            DiagnosticArg::Bound(BoundValue::Single(TypeId::INT)),
        ]
    );
}

#[test]
fn test_argument_failure_from_bind_failure() {
    let failure: ArgumentFailure = BindFailure::InstantiationDepth.into();

    assert_eq!(failure.arg_index, None);
    assert_eq!(failure.kind(), ErrorKind::InstantiationDepth);
}

#[test]
fn test_error_kind_display() {
    assert_eq!(ErrorKind::UnknownLength.to_string(), "unknown-length");
    assert_eq!(ErrorKind::NoMatchingOverload.to_string(), "no-matching-overload");
}
