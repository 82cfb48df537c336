//! Diagnostic message table.
//!
//! Codes are grouped by the engine component that reports them:
//! 1001-1099 binding failures, 1101-1199 declaration-time failures,
//! 1201-1299 checker entry points.

use super::{DiagnosticCategory, DiagnosticMessage};

pub mod diagnostic_codes {
    pub const EXPECTED_ARGUMENTS: u32 = 1001;
    pub const EXPECTED_AT_LEAST_ARGUMENTS: u32 = 1002;
    pub const UNKNOWN_LENGTH_VARIADIC_BINDING: u32 = 1003;
    pub const UNKNOWN_LENGTH_FIXED_PARAMETERS: u32 = 1004;
    pub const INCONSISTENT_BINDING: u32 = 1005;
    pub const ARGUMENT_TYPE_MISMATCH: u32 = 1006;
    pub const INSTANTIATION_EXCESSIVELY_DEEP: u32 = 1007;

    pub const MULTIPLE_VARIADIC: u32 = 1101;
    pub const BARE_VARIADIC: u32 = 1102;
    pub const VARIADIC_NOT_LAST_ALIAS_PARAMETER: u32 = 1103;
    pub const INVALID_UNPACK: u32 = 1104;
    pub const UNPACK_OUTSIDE_LIST: u32 = 1105;

    pub const NO_MATCHING_OVERLOAD: u32 = 1201;
    pub const OVERLOAD_CANDIDATE_FAILED: u32 = 1202;
    pub const NOT_GENERIC: u32 = 1203;
    pub const UNKNOWN_DEFINITION: u32 = 1204;
    pub const NOT_CALLABLE: u32 = 1205;
}

pub static DIAGNOSTIC_MESSAGES: &[DiagnosticMessage] = &[
    DiagnosticMessage {
        code: 1001,
        category: DiagnosticCategory::Error,
        message: "Expected {0} arguments, but got {1}.",
    },
    DiagnosticMessage {
        code: 1002,
        category: DiagnosticCategory::Error,
        message: "Expected at least {0} arguments, but got {1}.",
    },
    DiagnosticMessage {
        code: 1003,
        category: DiagnosticCategory::Error,
        message: "Variadic type variable '{0}' cannot be bound to '{1}', whose length is not statically known.",
    },
    DiagnosticMessage {
        code: 1004,
        category: DiagnosticCategory::Error,
        message: "An argument of type '{0}' has no statically known length and cannot fill fixed parameters.",
    },
    DiagnosticMessage {
        code: 1005,
        category: DiagnosticCategory::Error,
        message: "Type variable '{0}' is already bound to '{1}' and cannot also be bound to '{2}'.",
    },
    DiagnosticMessage {
        code: 1006,
        category: DiagnosticCategory::Error,
        message: "Argument of type '{0}' is not assignable to parameter of type '{1}'.",
    },
    DiagnosticMessage {
        code: 1007,
        category: DiagnosticCategory::Error,
        message: "Type instantiation is excessively deep and possibly infinite.",
    },
    DiagnosticMessage {
        code: 1101,
        category: DiagnosticCategory::Error,
        message: "Only one variadic element is allowed in a type list, but found '{0}' and '{1}'.",
    },
    DiagnosticMessage {
        code: 1102,
        category: DiagnosticCategory::Error,
        message: "Variadic type variable '{0}' must be unpacked.",
    },
    DiagnosticMessage {
        code: 1103,
        category: DiagnosticCategory::Error,
        message: "Variadic type variable '{0}' must be the last type parameter of alias '{1}'.",
    },
    DiagnosticMessage {
        code: 1104,
        category: DiagnosticCategory::Error,
        message: "Type '{0}' cannot be unpacked; only tuples and variadic type variables can.",
    },
    DiagnosticMessage {
        code: 1105,
        category: DiagnosticCategory::Error,
        message: "Unpacked type '{0}' is only allowed inside a type argument list.",
    },
    DiagnosticMessage {
        code: 1201,
        category: DiagnosticCategory::Error,
        message: "No overload of '{0}' matches this call.",
    },
    DiagnosticMessage {
        code: 1202,
        category: DiagnosticCategory::Message,
        message: "Overload {0} of {1}, '{2}', gave the following error: {3}",
    },
    DiagnosticMessage {
        code: 1203,
        category: DiagnosticCategory::Error,
        message: "'{0}' is not a generic type.",
    },
    DiagnosticMessage {
        code: 1204,
        category: DiagnosticCategory::Error,
        message: "Cannot find a declaration for '{0}'.",
    },
    DiagnosticMessage {
        code: 1205,
        category: DiagnosticCategory::Error,
        message: "'{0}' is not callable.",
    },
];
