//! Reference table of SPDX license and exception identifiers.
//!
//! The catalog is built once, then only read. Lookups are ASCII
//! case-insensitive and deprecated identifiers with a known successor
//! resolve to that successor.

use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use thiserror::Error;

/// Deprecated SPDX identifiers and the identifier that replaced them.
const DEPRECATED_REPLACEMENTS: &[(&str, &str)] = &[
    ("AGPL-1.0", "AGPL-1.0-only"),
    ("AGPL-3.0", "AGPL-3.0-only"),
    ("GFDL-1.1", "GFDL-1.1-only"),
    ("GFDL-1.2", "GFDL-1.2-only"),
    ("GFDL-1.3", "GFDL-1.3-only"),
    ("GPL-1.0", "GPL-1.0-only"),
    ("GPL-1.0+", "GPL-1.0-or-later"),
    ("GPL-2.0", "GPL-2.0-only"),
    ("GPL-2.0+", "GPL-2.0-or-later"),
    ("GPL-3.0", "GPL-3.0-only"),
    ("GPL-3.0+", "GPL-3.0-or-later"),
    ("LGPL-2.0", "LGPL-2.0-only"),
    ("LGPL-2.0+", "LGPL-2.0-or-later"),
    ("LGPL-2.1", "LGPL-2.1-only"),
    ("LGPL-2.1+", "LGPL-2.1-or-later"),
    ("LGPL-3.0", "LGPL-3.0-only"),
    ("LGPL-3.0+", "LGPL-3.0-or-later"),
    ("StandardML-NJ", "SMLNJ"),
];

/// Errors raised while loading an external license list.
#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("failed to read license list {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid license list JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("license list contains no licenses")]
    Empty,
}

/// One license known to the catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogEntry {
    /// Identifier in its canonical spelling
    pub id: String,
    /// Full human-readable name
    pub name: String,
    /// Whether the SPDX list marks the identifier as deprecated
    pub deprecated: bool,
}

/// Read-only lookup table for license and exception identifiers.
#[derive(Debug, Clone, Default)]
pub struct LicenseCatalog {
    /// Lowercased identifier -> entry
    licenses: HashMap<String, CatalogEntry>,
    /// Lowercased deprecated identifier -> canonical replacement
    replacements: HashMap<String, String>,
    /// Lowercased exception identifier -> canonical spelling
    exceptions: HashMap<String, String>,
    /// Version of the SPDX license list the table was built from
    list_version: Option<String>,
}

impl LicenseCatalog {
    /// Create an empty catalog. Mostly useful for test fixtures.
    pub fn new() -> Self {
        Self::default()
    }

    /// Catalog built from the SPDX license list compiled into the `spdx` crate,
    /// plus the built-in deprecated replacement table.
    pub fn builtin() -> Self {
        let mut catalog = Self::new();

        for (name, ..) in spdx::identifiers::LICENSES {
            if let Some(id) = spdx::license_id(name) {
                catalog.add_license(id.name, id.full_name, id.is_deprecated());
            }
        }
        for (name, ..) in spdx::identifiers::EXCEPTIONS {
            catalog.add_exception(name);
        }
        catalog.add_builtin_replacements();

        tracing::debug!(
            licenses = catalog.licenses.len(),
            exceptions = catalog.exceptions.len(),
            "Built license catalog from bundled SPDX list"
        );
        catalog
    }

    /// Load a catalog from SPDX license-list-data JSON (`licenses.json`),
    /// optionally with the matching `exceptions.json`.
    pub fn from_license_list_json(
        licenses_json: &str,
        exceptions_json: Option<&str>,
    ) -> Result<Self, CatalogError> {
        let list: LicenseListFile = serde_json::from_str(licenses_json)?;
        if list.licenses.is_empty() {
            return Err(CatalogError::Empty);
        }

        let mut catalog = Self::new();
        catalog.list_version = list.license_list_version;
        for license in list.licenses {
            catalog.add_license(
                &license.license_id,
                &license.name,
                license.is_deprecated_license_id,
            );
        }

        match exceptions_json {
            Some(json) => {
                let exceptions: ExceptionListFile = serde_json::from_str(json)?;
                for exception in exceptions.exceptions {
                    catalog.add_exception(&exception.license_exception_id);
                }
            }
            None => {
                for (name, ..) in spdx::identifiers::EXCEPTIONS {
                    catalog.add_exception(name);
                }
            }
        }

        catalog.add_builtin_replacements();
        Ok(catalog)
    }

    /// Load a catalog from license-list-data files on disk.
    pub fn load(licenses: &Path, exceptions: Option<&Path>) -> Result<Self, CatalogError> {
        let read = |path: &Path| {
            std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
                path: path.display().to_string(),
                source,
            })
        };

        let licenses_json = read(licenses)?;
        let exceptions_json = exceptions.map(read).transpose()?;
        let catalog = Self::from_license_list_json(&licenses_json, exceptions_json.as_deref())?;

        tracing::info!(
            "Loaded {} licenses from {}",
            catalog.licenses.len(),
            licenses.display()
        );
        Ok(catalog)
    }

    /// Add (or replace) a license entry.
    pub fn add_license(&mut self, id: &str, name: &str, deprecated: bool) {
        self.licenses.insert(
            id.to_ascii_lowercase(),
            CatalogEntry {
                id: id.to_string(),
                name: name.to_string(),
                deprecated,
            },
        );
    }

    /// Map a deprecated identifier to its replacement.
    ///
    /// Ignored when the replacement is not itself in the catalog, so
    /// resolution never produces an identifier the catalog cannot look up.
    pub fn add_replacement(&mut self, deprecated: &str, replacement: &str) {
        if let Some(entry) = self.licenses.get(&replacement.to_ascii_lowercase()) {
            let canonical = entry.id.clone();
            self.replacements
                .insert(deprecated.to_ascii_lowercase(), canonical);
        }
    }

    /// Add an exception identifier.
    pub fn add_exception(&mut self, id: &str) {
        self.exceptions
            .insert(id.to_ascii_lowercase(), id.to_string());
    }

    fn add_builtin_replacements(&mut self) {
        for (deprecated, replacement) in DEPRECATED_REPLACEMENTS {
            self.add_replacement(deprecated, replacement);
        }
    }

    /// Look up an identifier as written in the catalog, without alias resolution.
    pub fn get(&self, id: &str) -> Option<&CatalogEntry> {
        self.licenses.get(&id.to_ascii_lowercase())
    }

    /// Canonical form of a license identifier.
    ///
    /// Case is normalized to the catalog spelling and deprecated identifiers
    /// with a known successor resolve to it. Idempotent for every identifier
    /// the catalog knows.
    pub fn canonicalize(&self, id: &str) -> Option<&str> {
        let key = id.to_ascii_lowercase();
        if let Some(replacement) = self.replacements.get(&key) {
            return Some(replacement.as_str());
        }
        self.licenses.get(&key).map(|entry| entry.id.as_str())
    }

    /// Canonical spelling of an exception identifier.
    pub fn canonical_exception(&self, id: &str) -> Option<&str> {
        self.exceptions
            .get(&id.to_ascii_lowercase())
            .map(String::as_str)
    }

    /// Whether an identifier (any case, aliases included) is known.
    pub fn contains(&self, id: &str) -> bool {
        self.canonicalize(id).is_some()
    }

    /// Iterate over all license entries (unordered).
    pub fn entries(&self) -> impl Iterator<Item = &CatalogEntry> {
        self.licenses.values()
    }

    /// Number of license identifiers.
    pub fn len(&self) -> usize {
        self.licenses.len()
    }

    /// Whether the catalog has no licenses.
    pub fn is_empty(&self) -> bool {
        self.licenses.is_empty()
    }

    /// SPDX license list version, when loaded from license-list-data.
    pub fn list_version(&self) -> Option<&str> {
        self.list_version.as_deref()
    }
}

// license-list-data JSON structures

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LicenseListFile {
    license_list_version: Option<String>,
    licenses: Vec<LicenseListEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LicenseListEntry {
    license_id: String,
    #[serde(default)]
    name: String,
    #[serde(default)]
    is_deprecated_license_id: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ExceptionListFile {
    exceptions: Vec<ExceptionListEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ExceptionListEntry {
    license_exception_id: String,
}
