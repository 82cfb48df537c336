//! Checker options.
//!
//! Options are plain data, loadable from a JSON object whose keys use the
//! camelCase spelling (`maxInstantiationDepth`, `parallel`,
//! `reportOverloadCandidates`). Missing keys take their defaults.

use serde::Deserialize;
use varity_common::limits::MAX_INSTANTIATION_DEPTH;

/// Options for checking call, instantiation and alias sites.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CheckerOptions {
    /// Recursion bound for substitution; deeper instantiation yields the
    /// error type and a diagnostic.
    pub max_instantiation_depth: u32,
    /// Check batches of independent sites on the rayon pool.
    pub parallel: bool,
    /// Attach each rejected overload candidate's failure as related
    /// information of a no-matching-overload diagnostic.
    pub report_overload_candidates: bool,
}

impl Default for CheckerOptions {
    fn default() -> Self {
        CheckerOptions {
            max_instantiation_depth: MAX_INSTANTIATION_DEPTH,
            parallel: true,
            report_overload_candidates: true,
        }
    }
}

impl CheckerOptions {
    /// Parse options from JSON text.
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    #[must_use]
    pub const fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }
}

#[cfg(test)]
#[path = "../tests/context_tests.rs"]
mod tests;
