#![no_main]
use dual_license_finder::parsers::{DocumentParser, SpdxTagValueParser};
use dual_license_finder::LicenseCatalog;
use libfuzzer_sys::fuzz_target;
use std::sync::LazyLock;

static CATALOG: LazyLock<LicenseCatalog> = LazyLock::new(LicenseCatalog::builtin);

/// Fuzz the SPDX tag-value parser and document verification.
///
/// Raw bytes go through BOM handling; short inputs are also wrapped in a
/// valid document header so the file and relationship paths are reached.
fuzz_target!(|data: &[u8]| {
    let parser = SpdxTagValueParser::new(&CATALOG);

    if let Ok(document) = parser.parse_bytes(data) {
        let _ = document.verify();
    }

    if let Ok(s) = std::str::from_utf8(data) {
        if s.len() < 10_000 {
            let wrapped = format!(
                "SPDXVersion: SPDX-2.2\nDataLicense: CC0-1.0\nSPDXID: SPDXRef-DOCUMENT\n\
                 DocumentName: fuzz\nDocumentNamespace: https://example.com/fuzz\n{s}",
            );
            if let Ok(document) = parser.parse_str(&wrapped) {
                let _ = document.verify();
            }
        }
    }
});
