#![no_main]
use dual_license_finder::{parse_expression, LicenseCatalog};
use libfuzzer_sys::fuzz_target;
use std::sync::LazyLock;

static CATALOG: LazyLock<LicenseCatalog> = LazyLock::new(LicenseCatalog::builtin);

// The display form of any parsed expression must parse again.
fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        if let Ok(expr) = parse_expression(s, &CATALOG) {
            let display = expr.to_string();
            assert!(
                parse_expression(&display, &CATALOG).is_ok(),
                "display {display:?} of {s:?} did not parse"
            );
        }
    }
});
