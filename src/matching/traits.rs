//! Trait definitions for file predicates.
//!
//! A predicate decides whether one described file is reported by a scan.
//! Predicates are pure: the same file always yields the same answer.

use crate::model::FileRecord;

/// A yes/no test applied to every file a document describes.
pub trait FilePredicate {
    /// Human-readable summary, lowercase and without trailing punctuation.
    fn describe(&self) -> String;

    /// Whether `file` satisfies the predicate.
    fn matches(&self, file: &FileRecord) -> bool;
}

impl<P: FilePredicate + ?Sized> FilePredicate for Box<P> {
    fn describe(&self) -> String {
        (**self).describe()
    }

    fn matches(&self, file: &FileRecord) -> bool {
        (**self).matches(file)
    }
}

impl<P: FilePredicate + ?Sized> FilePredicate for &P {
    fn describe(&self) -> String {
        (**self).describe()
    }

    fn matches(&self, file: &FileRecord) -> bool {
        (**self).matches(file)
    }
}
