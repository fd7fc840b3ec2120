//! SPDX document parsers.
//!
//! Only the Tag/Value serialization is read. The lexer in [`tag_value`]
//! produces generic records; [`SpdxTagValueParser`] turns them into a typed
//! [`Document`], parsing license fields against a [`LicenseCatalog`].
//!
//! ## Usage
//!
//! ```no_run
//! use dual_license_finder::license::LicenseCatalog;
//! use dual_license_finder::parsers::parse_document;
//! use std::path::Path;
//!
//! let catalog = LicenseCatalog::builtin();
//! let doc = parse_document(Path::new("reuse.spdx"), &catalog).unwrap();
//! let doc = doc.verify().unwrap();
//! for file in doc.described_files() {
//!     println!("{}", file.normalized_name());
//! }
//! ```

mod spdx;
pub mod tag_value;
mod traits;

pub use spdx::SpdxTagValueParser;
pub use traits::{DocumentParser, FormatConfidence, FormatDetection, ParseError};

use crate::license::LicenseCatalog;
use crate::model::Document;
use std::io::Read;
use std::path::Path;

/// Maximum input size (512 MB)
const MAX_DOCUMENT_FILE_SIZE: u64 = 512 * 1024 * 1024;

/// Read and parse one Tag/Value document.
///
/// The file is fully read and closed before parsing starts. The result is
/// not yet verified; see [`Document::verify`].
pub fn parse_document(path: &Path, catalog: &LicenseCatalog) -> Result<Document, ParseError> {
    let bytes = {
        let mut file = std::fs::File::open(path)?;
        let size = file.metadata()?.len();
        if size > MAX_DOCUMENT_FILE_SIZE {
            return Err(ParseError::Io(format!(
                "document is {} MB, exceeding the {} MB limit",
                size / (1024 * 1024),
                MAX_DOCUMENT_FILE_SIZE / (1024 * 1024),
            )));
        }
        let mut bytes = Vec::with_capacity(usize::try_from(size).unwrap_or(0));
        file.read_to_end(&mut bytes)?;
        bytes
    };

    SpdxTagValueParser::new(catalog).parse_bytes(&bytes)
}

/// Parse Tag/Value content already in memory.
pub fn parse_document_str(content: &str, catalog: &LicenseCatalog) -> Result<Document, ParseError> {
    SpdxTagValueParser::new(catalog).parse_str(content)
}
