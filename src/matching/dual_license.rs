//! Exact dual-license predicate.

use super::FilePredicate;
use crate::license::{parse_expression, LicenseCatalog, LicenseParseError};
use crate::model::{FileRecord, LicenseExpression};
use std::fmt;
use thiserror::Error;

/// Errors building a [`DualLicensePredicate`].
#[derive(Error, Debug)]
pub enum PredicateError {
    #[error("invalid license '{id}'")]
    License {
        id: String,
        #[source]
        source: LicenseParseError,
    },

    #[error("'{0}' is not a single license identifier")]
    NotSingleIdentifier(String),
}

/// Why a file did or did not match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchOutcome {
    Match,
    /// The file lists this many licenses instead of two
    LicenseCount(usize),
    /// No listed license is equivalent to this required one
    MissingLicense(String),
    /// The copyright text lacks the required substring
    CopyrightMismatch,
}

impl MatchOutcome {
    #[must_use]
    pub const fn is_match(&self) -> bool {
        matches!(self, Self::Match)
    }
}

impl fmt::Display for MatchOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Match => write!(f, "match"),
            Self::LicenseCount(n) => write!(f, "{n} license(s) listed, expected 2"),
            Self::MissingLicense(id) => write!(f, "{id} not listed"),
            Self::CopyrightMismatch => write!(f, "copyright text does not match"),
        }
    }
}

/// Matches files licensed under exactly two given licenses whose copyright
/// text contains a given substring.
///
/// The license set must have exactly two entries: a file that additionally
/// lists a third license is not reported. The substring test is
/// case-sensitive.
#[derive(Debug, Clone)]
pub struct DualLicensePredicate {
    required: [LicenseExpression; 2],
    copyright_substring: String,
}

impl DualLicensePredicate {
    pub fn new(required: [LicenseExpression; 2], copyright_substring: impl Into<String>) -> Self {
        Self {
            required,
            copyright_substring: copyright_substring.into(),
        }
    }

    /// Build a predicate from two license identifiers.
    ///
    /// Each identifier is parsed against `catalog` and must be a single
    /// license (no `AND`, `OR` or `WITH`).
    pub fn from_ids(
        catalog: &LicenseCatalog,
        ids: [&str; 2],
        copyright_substring: impl Into<String>,
    ) -> Result<Self, PredicateError> {
        let parse_one = |id: &str| -> Result<LicenseExpression, PredicateError> {
            let expr = parse_expression(id, catalog).map_err(|source| PredicateError::License {
                id: id.to_string(),
                source,
            })?;
            if expr.as_bare_identifier().is_none() {
                return Err(PredicateError::NotSingleIdentifier(id.to_string()));
            }
            Ok(expr)
        };

        Ok(Self::new(
            [parse_one(ids[0])?, parse_one(ids[1])?],
            copyright_substring,
        ))
    }

    #[must_use]
    pub const fn required(&self) -> &[LicenseExpression; 2] {
        &self.required
    }

    #[must_use]
    pub fn copyright_substring(&self) -> &str {
        &self.copyright_substring
    }

    /// Evaluate `file`, reporting the first failed condition.
    #[must_use]
    pub fn evaluate(&self, file: &FileRecord) -> MatchOutcome {
        let licenses = &file.license_info_in_files;
        if licenses.len() != 2 {
            return MatchOutcome::LicenseCount(licenses.len());
        }

        for required in &self.required {
            if !licenses.iter().any(|l| l.equivalent(required)) {
                return MatchOutcome::MissingLicense(required.to_string());
            }
        }

        if !file.copyright_text.contains(&self.copyright_substring) {
            return MatchOutcome::CopyrightMismatch;
        }

        MatchOutcome::Match
    }
}

impl FilePredicate for DualLicensePredicate {
    fn describe(&self) -> String {
        format!(
            "licensed '{} OR {}', with {} mentioned in the copyright text",
            self.required[0], self.required[1], self.copyright_substring
        )
    }

    fn matches(&self, file: &FileRecord) -> bool {
        self.evaluate(file).is_match()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn predicate() -> DualLicensePredicate {
        DualLicensePredicate::from_ids(&LicenseCatalog::builtin(), ["Apache-2.0", "MIT"], "Khronos")
            .expect("predicate")
    }

    fn file(licenses: &[&str], copyright: &str) -> FileRecord {
        let catalog = LicenseCatalog::builtin();
        FileRecord {
            name: "src/foo.c".to_string(),
            spdx_id: Some("SPDXRef-foo".to_string()),
            license_info_in_files: licenses
                .iter()
                .map(|l| parse_expression(l, &catalog).expect("license"))
                .collect(),
            copyright_text: copyright.to_string(),
            ..FileRecord::default()
        }
    }

    #[test]
    fn test_dual_licensed_khronos_file_matches() {
        let f = file(&["Apache-2.0", "MIT"], "Copyright (c) 2020 Khronos Group");
        assert!(predicate().matches(&f));
    }

    #[test]
    fn test_order_and_case_do_not_matter() {
        let f = file(&["mit", "APACHE-2.0"], "Copyright 2021 The Khronos Group Inc.");
        assert_eq!(predicate().evaluate(&f), MatchOutcome::Match);
    }

    #[test]
    fn test_other_copyright_holder() {
        let f = file(&["Apache-2.0", "MIT"], "Copyright (c) 2020 Acme Inc");
        assert_eq!(predicate().evaluate(&f), MatchOutcome::CopyrightMismatch);
    }

    #[test]
    fn test_copyright_match_is_case_sensitive() {
        let f = file(&["Apache-2.0", "MIT"], "Copyright (c) 2020 KHRONOS");
        assert!(!predicate().matches(&f));
    }

    #[test]
    fn test_single_license() {
        let f = file(&["Apache-2.0"], "Copyright (c) 2020 Khronos Group");
        assert_eq!(predicate().evaluate(&f), MatchOutcome::LicenseCount(1));
    }

    #[test]
    fn test_superset_does_not_match() {
        let f = file(
            &["Apache-2.0", "MIT", "BSD-3-Clause"],
            "Copyright (c) 2020 Khronos Group",
        );
        assert_eq!(predicate().evaluate(&f), MatchOutcome::LicenseCount(3));
    }

    #[test]
    fn test_wrong_pair() {
        let f = file(&["Apache-2.0", "BSD-3-Clause"], "Copyright (c) 2020 Khronos Group");
        assert_eq!(
            predicate().evaluate(&f),
            MatchOutcome::MissingLicense("MIT".to_string())
        );
    }

    #[test]
    fn test_compound_entry_does_not_count() {
        let f = file(&["Apache-2.0 OR MIT", "MIT"], "Copyright (c) 2020 Khronos Group");
        assert_eq!(
            predicate().evaluate(&f),
            MatchOutcome::MissingLicense("Apache-2.0".to_string())
        );
    }

    #[test]
    fn test_duplicate_entries_collapse() {
        let f = file(&["MIT", "mit"], "Copyright (c) 2020 Khronos Group");
        assert_eq!(predicate().evaluate(&f), MatchOutcome::LicenseCount(1));
    }

    #[test]
    fn test_license_ref_case_variants_collapse() {
        let f = file(
            &["LicenseRef-Khronos", "licenseref-khronos", "MIT"],
            "Copyright (c) 2020 Khronos Group",
        );
        assert_eq!(f.license_info_in_files.len(), 2);

        let predicate = DualLicensePredicate::from_ids(
            &LicenseCatalog::builtin(),
            ["LICENSEREF-KHRONOS", "MIT"],
            "Khronos",
        )
        .expect("predicate");
        assert_eq!(predicate.evaluate(&f), MatchOutcome::Match);
    }

    #[test]
    fn test_describe() {
        assert_eq!(
            predicate().describe(),
            "licensed 'Apache-2.0 OR MIT', with Khronos mentioned in the copyright text"
        );
    }

    #[test]
    fn test_from_ids_rejects_compound_and_unknown() {
        let catalog = LicenseCatalog::builtin();
        assert!(matches!(
            DualLicensePredicate::from_ids(&catalog, ["Apache-2.0 OR MIT", "MIT"], "x"),
            Err(PredicateError::NotSingleIdentifier(_))
        ));
        assert!(matches!(
            DualLicensePredicate::from_ids(&catalog, ["Apache-2.0", "Nope-1.0"], "x"),
            Err(PredicateError::License { .. })
        ));
    }

    #[test]
    fn test_boxed_predicate() {
        let boxed: Box<dyn FilePredicate> = Box::new(predicate());
        let f = file(&["Apache-2.0", "MIT"], "Khronos");
        assert!(boxed.matches(&f));
    }
}
