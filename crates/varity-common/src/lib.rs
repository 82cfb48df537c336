//! Common types and utilities for the varity type engine.
//!
//! This crate provides foundational types used across all varity crates:
//! - String interning (`Atom`, `ShardedInterner`)
//! - Source spans (`Span`)
//! - Engine limits and thresholds
//! - Diagnostic values and the diagnostic message table

// String interning for identifier deduplication
pub mod interner;
pub use interner::{Atom, ShardedInterner};

// Span - Source location tracking (byte offsets)
pub mod span;
pub use span::Span;

// Centralized limits and thresholds
pub mod limits;

// Diagnostics reported across the checker boundary
pub mod diagnostics;
pub use diagnostics::{
    DIAGNOSTIC_MESSAGES, Diagnostic, DiagnosticCategory, DiagnosticMessage,
    DiagnosticRelatedInformation, diagnostic_codes, format_message, get_diagnostic_message,
    get_message_template,
};
