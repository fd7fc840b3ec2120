//! Construction of the shared scan inputs: license catalog and predicate.

use crate::config::{CatalogConfig, PredicateConfig};
use crate::error::{ErrorContext, FinderError, Result};
use crate::license::LicenseCatalog;
use crate::matching::DualLicensePredicate;

/// Build the license catalog described by `config`.
///
/// Without a license list the catalog compiled into the binary is used.
pub fn build_catalog(config: &CatalogConfig) -> Result<LicenseCatalog> {
    let Some(licenses) = config.license_list.as_deref() else {
        if config.exception_list.is_some() {
            return Err(FinderError::config(
                "catalog.exception_list requires catalog.license_list",
            ));
        }
        return Ok(LicenseCatalog::builtin());
    };

    LicenseCatalog::load(licenses, config.exception_list.as_deref())
        .with_context(|| licenses.display().to_string())
}

/// Build the dual-license predicate described by `config`.
pub fn build_predicate(
    config: &PredicateConfig,
    catalog: &LicenseCatalog,
) -> Result<DualLicensePredicate> {
    let [first, second] = &config.licenses;
    DualLicensePredicate::from_ids(
        catalog,
        [first.as_str(), second.as_str()],
        config.copyright_contains.as_str(),
    )
    .with_context(|| format!("predicate.licenses [{first}, {second}]"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matching::FilePredicate;
    use std::path::PathBuf;

    #[test]
    fn test_builtin_catalog_by_default() {
        let catalog = build_catalog(&CatalogConfig::default()).expect("catalog");
        assert!(catalog.contains("Apache-2.0"));
    }

    #[test]
    fn test_exception_list_alone_rejected() {
        let config = CatalogConfig {
            license_list: None,
            exception_list: Some(PathBuf::from("exceptions.json")),
        };
        assert!(matches!(build_catalog(&config), Err(FinderError::Config(_))));
    }

    #[test]
    fn test_missing_license_list_has_context() {
        let config = CatalogConfig {
            license_list: Some(PathBuf::from("/nonexistent/licenses.json")),
            exception_list: None,
        };
        match build_catalog(&config) {
            Err(FinderError::Catalog { context, .. }) => {
                assert_eq!(context, "/nonexistent/licenses.json");
            }
            other => panic!("Expected Catalog error, got {other:?}"),
        }
    }

    #[test]
    fn test_default_predicate() {
        let catalog = LicenseCatalog::builtin();
        let predicate = build_predicate(&PredicateConfig::default(), &catalog).expect("predicate");
        assert_eq!(
            predicate.describe(),
            "licensed 'Apache-2.0 OR MIT', with Khronos mentioned in the copyright text"
        );
    }

    #[test]
    fn test_unknown_license_rejected() {
        let catalog = LicenseCatalog::builtin();
        let config = PredicateConfig {
            licenses: ["Apache-2.0".to_string(), "Not-A-License".to_string()],
            copyright_contains: "Khronos".to_string(),
        };
        let err = build_predicate(&config, &catalog).unwrap_err();
        assert!(matches!(err, FinderError::Predicate { .. }));
        assert!(err.to_string().contains("Not-A-License"));
    }
}
