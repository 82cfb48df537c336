//! Centralized limits and thresholds for the varity engine.
//!
//! Keeping these values in one place prevents inconsistent duplicates across
//! the solver and checker crates.

/// Maximum depth for substituting bindings into a type expression.
///
/// Type expressions are finite trees, so this only trips on pathological
/// nesting such as an alias body that nests `Tuple[...]` thousands of levels
/// deep. When exceeded, instantiation returns the error type.
pub const MAX_INSTANTIATION_DEPTH: u32 = 50;

/// Maximum depth for structural binding of a parameter type against an
/// argument type.
///
/// `Tuple[Tuple[Tuple[*Ts]]]` against `Tuple[Tuple[Tuple[int]]]` recurses
/// once per level. Exceeding the limit fails the bind with a type mismatch.
pub const MAX_BIND_DEPTH: u32 = 100;

/// Maximum depth for assignability checks in the gradual resolver.
pub const MAX_ASSIGNABILITY_DEPTH: u32 = 100;

/// Maximum number of overload candidates tried for a single call site.
///
/// Candidates past this index are ignored; the call reports
/// "no matching overload" if none of the first candidates bind.
pub const MAX_OVERLOAD_CANDIDATES: usize = 64;

/// Inline capacity for type lists before they spill to the heap.
///
/// Most generic argument lists (`Array[Height, Width]`, `Tuple[int, *Ts]`)
/// have well under eight elements.
pub const TYPE_LIST_INLINE: usize = 8;
