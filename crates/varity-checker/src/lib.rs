//! Checker entry points for variadic generics.
//!
//! This crate sits on top of `varity-solver` and reports its failures as
//! `Diagnostic`s:
//! - `state` - `CheckerState`: call checking with overloads, explicit
//!   instantiation, alias expansion
//! - `error_reporter` - rendering solver failures with source locations
//! - `batch` - checking independent sites, in parallel with rayon
//! - `context` - `CheckerOptions`
//! - `tracing_config` - opt-in `tracing` subscriber setup

pub mod batch;
pub mod context;
pub mod error_reporter;
pub mod state;
pub mod tracing_config;

pub use batch::{CheckSite, SiteResult, batch_diagnostics, check_batch};
pub use context::CheckerOptions;
pub use error_reporter::error_kind;
pub use state::{CheckerState, TypeArgument};
pub use tracing_config::init_tracing;
