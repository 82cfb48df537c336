//! Depth limiting for recursive type computations.
//!
//! Binding, substitution and assignability all recurse structurally over
//! type expressions. [`DepthCounter`] bounds that recursion; the limits are
//! named by [`RecursionProfile`] so call sites don't carry magic numbers:
//!
//! ```ignore
//! let mut counter = DepthCounter::with_profile(RecursionProfile::Instantiation);
//!
//! if !counter.enter() {
//!     return TypeId::ERROR; // depth exceeded
//! }
//! let result = do_work();
//! counter.leave();
//! result
//! ```
//!
//! In debug builds, dropping a counter with unmatched `enter()` calls
//! panics.

use varity_common::limits::{MAX_ASSIGNABILITY_DEPTH, MAX_BIND_DEPTH, MAX_INSTANTIATION_DEPTH};

/// Named depth limits.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum RecursionProfile {
    /// Substitution into a type expression.
    Instantiation,
    /// Matching a parameter type against an argument type.
    Binding,
    /// Gradual assignability.
    Assignability,
    Custom { max_depth: u32 },
}

impl RecursionProfile {
    pub const fn max_depth(self) -> u32 {
        match self {
            Self::Instantiation => MAX_INSTANTIATION_DEPTH,
            Self::Binding => MAX_BIND_DEPTH,
            Self::Assignability => MAX_ASSIGNABILITY_DEPTH,
            Self::Custom { max_depth } => max_depth,
        }
    }
}

pub struct DepthCounter {
    depth: u32,
    max_depth: u32,
    exceeded: bool,
}

impl DepthCounter {
    pub const fn new(max_depth: u32) -> Self {
        Self {
            depth: 0,
            max_depth,
            exceeded: false,
        }
    }

    pub const fn with_profile(profile: RecursionProfile) -> Self {
        Self::new(profile.max_depth())
    }

    /// Try to enter a deeper level.
    ///
    /// Returns `false` (and sets the sticky exceeded flag) if the limit has
    /// been reached; the depth is not incremented then, so do **not** call
    /// `leave()`.
    #[inline]
    pub fn enter(&mut self) -> bool {
        if self.depth >= self.max_depth {
            self.exceeded = true;
            return false;
        }
        self.depth += 1;
        true
    }

    /// Must be called exactly once after every successful [`enter`](Self::enter).
    #[inline]
    pub fn leave(&mut self) {
        debug_assert!(
            self.depth > 0,
            "DepthCounter::leave() called at depth 0. \
             This indicates a leave without a matching enter()."
        );
        self.depth = self.depth.saturating_sub(1);
    }

    #[inline]
    pub const fn depth(&self) -> u32 {
        self.depth
    }

    #[inline]
    pub const fn max_depth(&self) -> u32 {
        self.max_depth
    }

    /// Sticky until [`reset`](Self::reset).
    #[inline]
    pub const fn is_exceeded(&self) -> bool {
        self.exceeded
    }

    pub fn reset(&mut self) {
        self.depth = 0;
        self.exceeded = false;
    }
}

#[cfg(debug_assertions)]
impl Drop for DepthCounter {
    fn drop(&mut self) {
        if !std::thread::panicking() && self.depth > 0 {
            panic!(
                "DepthCounter dropped with depth {}. \
                 This indicates leaked enter() calls without matching leave() calls.",
                self.depth,
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn profile_limits() {
        assert_eq!(RecursionProfile::Instantiation.max_depth(), 50);
        assert_eq!(RecursionProfile::Binding.max_depth(), 100);
        assert_eq!(RecursionProfile::Assignability.max_depth(), 100);
        assert_eq!(RecursionProfile::Custom { max_depth: 7 }.max_depth(), 7);
    }

    #[test]
    fn enter_until_exceeded() {
        let mut counter = DepthCounter::new(2);
        assert!(counter.enter());
        assert!(counter.enter());
        assert!(!counter.enter());
        assert!(counter.is_exceeded());
        assert_eq!(counter.depth(), 2);
        counter.leave();
        counter.leave();
        assert_eq!(counter.depth(), 0);
        assert!(counter.is_exceeded(), "exceeded flag is sticky");
    }

    #[test]
    fn reset_clears_exceeded() {
        let mut counter = DepthCounter::new(0);
        assert!(!counter.enter());
        counter.reset();
        assert!(!counter.is_exceeded());
    }
}
