//! File predicates.
//!
//! The scan evaluates a [`FilePredicate`] against every file a document
//! describes. [`DualLicensePredicate`] is the predicate the tool ships:
//! exactly two required licenses plus a copyright substring.

mod dual_license;
mod traits;

pub use dual_license::{DualLicensePredicate, MatchOutcome, PredicateError};
pub use traits::FilePredicate;
