//! Error handling foundation for careline.
//!
//! Only the `Result` alias lives here. Domain-specific error enums belong to
//! the crate that produces them; layers attach context with rootcause's
//! `.context()` as errors travel upward.

use rootcause::Report;

/// Result alias over rootcause's Report.
pub type Result<T, C = ()> = std::result::Result<T, Report<C>>;
