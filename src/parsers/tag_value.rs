//! Generic Tag/Value lexer.
//!
//! Turns SPDX Tag/Value text into an ordered list of records, each an
//! ordered mapping from tag name to every value given for it. No SPDX
//! semantics live here beyond knowing which tags open a new record.

use super::traits::ParseError;
use indexmap::IndexMap;
use regex::Regex;
use std::sync::LazyLock;

static TAG_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*([A-Za-z][A-Za-z0-9_-]*)\s*:\s?(.*)$").expect("static regex")
});

const TEXT_OPEN: &str = "<text>";
const TEXT_CLOSE: &str = "</text>";

const UTF8_BOM: &[u8] = &[0xEF, 0xBB, 0xBF];
const UTF16_BE_BOM: &[u8] = &[0xFE, 0xFF];
const UTF16_LE_BOM: &[u8] = &[0xFF, 0xFE];

/// Kind of record, determined by the tag that opened it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Document,
    Package,
    File,
    Snippet,
    ExtractedLicense,
}

impl Section {
    /// The section a tag opens, if it is a section-opening tag.
    #[must_use]
    pub fn opened_by(tag: &str) -> Option<Self> {
        match tag {
            "PackageName" => Some(Self::Package),
            "FileName" => Some(Self::File),
            "SnippetSPDXID" => Some(Self::Snippet),
            "LicenseID" => Some(Self::ExtractedLicense),
            _ => None,
        }
    }
}

/// A single value with the (1-based) line its tag appeared on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagValue {
    pub value: String,
    pub line: usize,
}

/// One record: the tags between two section-opening tags.
#[derive(Debug, Clone)]
pub struct TagValueRecord {
    pub section: Section,
    /// Line of the record's first tag
    pub line: usize,
    tags: IndexMap<String, Vec<TagValue>>,
}

impl TagValueRecord {
    fn new(section: Section, line: usize) -> Self {
        Self {
            section,
            line,
            tags: IndexMap::new(),
        }
    }

    fn push(&mut self, tag: String, value: TagValue) {
        self.tags.entry(tag).or_default().push(value);
    }

    /// First value given for `tag`.
    #[must_use]
    pub fn first(&self, tag: &str) -> Option<&TagValue> {
        self.tags.get(tag).and_then(|values| values.first())
    }

    /// Every value given for `tag`, in order.
    #[must_use]
    pub fn all(&self, tag: &str) -> &[TagValue] {
        self.tags.get(tag).map(Vec::as_slice).unwrap_or(&[])
    }

    /// All tags with their values, in order of first appearance.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[TagValue])> {
        self.tags.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }
}

/// Decode raw input as UTF-8, dropping a byte-order mark.
pub fn decode(bytes: &[u8]) -> Result<&str, ParseError> {
    if bytes.starts_with(UTF16_BE_BOM) || bytes.starts_with(UTF16_LE_BOM) {
        return Err(ParseError::Encoding(
            "UTF-16 input is not supported, expected UTF-8".to_string(),
        ));
    }
    let bytes = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);
    std::str::from_utf8(bytes).map_err(|e| {
        ParseError::Encoding(format!(
            "invalid UTF-8 after byte {}",
            e.valid_up_to()
        ))
    })
}

/// Split Tag/Value content into records.
///
/// The first record is always the document record, even when empty.
pub fn lex(content: &str) -> Result<Vec<TagValueRecord>, ParseError> {
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);
    let mut records = vec![TagValueRecord::new(Section::Document, 1)];
    let mut saw_tag = false;
    let mut lines = content.lines().enumerate().map(|(i, l)| (i + 1, l));

    while let Some((line_no, line)) = lines.next() {
        let trimmed = line.trim_start();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        let captures = TAG_LINE
            .captures(line)
            .ok_or(ParseError::OrphanValue { line: line_no })?;
        let tag = captures.get(1).map_or("", |m| m.as_str()).to_string();
        let raw = captures.get(2).map_or("", |m| m.as_str()).trim();

        let value = match raw.strip_prefix(TEXT_OPEN) {
            Some(rest) => read_text(&tag, rest, line_no, &mut lines)?,
            None => raw.to_string(),
        };

        if let Some(section) = Section::opened_by(&tag) {
            records.push(TagValueRecord::new(section, line_no));
        }
        saw_tag = true;

        if let Some(record) = records.last_mut() {
            record.push(
                tag,
                TagValue {
                    value,
                    line: line_no,
                },
            );
        }
    }

    if saw_tag {
        Ok(records)
    } else {
        Err(ParseError::EmptyDocument)
    }
}

/// Collect a `<text>` value whose opening marker has been consumed.
fn read_text<'a>(
    tag: &str,
    first: &'a str,
    line: usize,
    lines: &mut impl Iterator<Item = (usize, &'a str)>,
) -> Result<String, ParseError> {
    if let Some((inner, _)) = first.split_once(TEXT_CLOSE) {
        return Ok(inner.to_string());
    }

    let mut parts = Vec::new();
    if !first.is_empty() {
        parts.push(first);
    }
    for (_, next) in lines.by_ref() {
        if let Some((inner, _)) = next.split_once(TEXT_CLOSE) {
            parts.push(inner);
            return Ok(parts.join("\n"));
        }
        parts.push(next);
    }

    Err(ParseError::UnterminatedText {
        tag: tag.to_string(),
        line,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
SPDXVersion: SPDX-2.2
DataLicense: CC0-1.0
Creator: Tool: reuse-0.14

# files
FileName: ./src/foo.c
SPDXID: SPDXRef-foo
LicenseInfoInFile: Apache-2.0
LicenseInfoInFile: MIT
FileCopyrightText: <text>Copyright (c) 2020
The Khronos Group Inc.</text>
";

    #[test]
    fn test_records_split_on_section_tags() {
        let records = lex(SAMPLE).expect("lex");
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].section, Section::Document);
        assert_eq!(records[1].section, Section::File);
        assert_eq!(records[1].line, 6);
    }

    #[test]
    fn test_value_may_contain_colons() {
        let records = lex(SAMPLE).expect("lex");
        let creator = records[0].first("Creator").expect("creator");
        assert_eq!(creator.value, "Tool: reuse-0.14");
        assert_eq!(creator.line, 3);
    }

    #[test]
    fn test_repeated_tags_keep_order() {
        let records = lex(SAMPLE).expect("lex");
        let values: Vec<_> = records[1]
            .all("LicenseInfoInFile")
            .iter()
            .map(|v| v.value.as_str())
            .collect();
        assert_eq!(values, vec!["Apache-2.0", "MIT"]);
        assert!(records[1].all("FileType").is_empty());
    }

    #[test]
    fn test_multiline_text() {
        let records = lex(SAMPLE).expect("lex");
        let text = records[1].first("FileCopyrightText").expect("copyright");
        assert_eq!(text.value, "Copyright (c) 2020\nThe Khronos Group Inc.");
    }

    #[test]
    fn test_single_line_text() {
        let records = lex("DocumentComment: <text>one: line</text>\n").expect("lex");
        assert_eq!(
            records[0].first("DocumentComment").map(|v| v.value.as_str()),
            Some("one: line")
        );
    }

    #[test]
    fn test_text_keeps_lines_that_look_like_tags() {
        let input = "FileName: a\nFileComment: <text>\nNote: not a tag\n\n</text>\n";
        let records = lex(input).expect("lex");
        assert_eq!(
            records[1].first("FileComment").map(|v| v.value.as_str()),
            Some("Note: not a tag\n\n")
        );
    }

    #[test]
    fn test_text_marker_after_extra_spaces() {
        let input = "FileName: a\nFileCopyrightText:  <text>Copyright Khronos\nGroup Inc.</text>\n";
        let records = lex(input).expect("lex");
        assert_eq!(
            records[1].first("FileCopyrightText").map(|v| v.value.as_str()),
            Some("Copyright Khronos\nGroup Inc.")
        );
    }

    #[test]
    fn test_single_line_value_is_trimmed() {
        let records = lex("FileName:   src/a.c\nSPDXID:\tSPDXRef-1\n").expect("lex");
        assert_eq!(
            records[1].first("FileName").map(|v| v.value.as_str()),
            Some("src/a.c")
        );
        assert_eq!(
            records[1].first("SPDXID").map(|v| v.value.as_str()),
            Some("SPDXRef-1")
        );
    }

    #[test]
    fn test_unterminated_text() {
        let err = lex("SPDXVersion: SPDX-2.2\nFileComment: <text>never\nclosed\n").unwrap_err();
        assert!(matches!(
            err,
            ParseError::UnterminatedText { ref tag, line: 2 } if tag == "FileComment"
        ));
    }

    #[test]
    fn test_orphan_value() {
        let err = lex("SPDXVersion: SPDX-2.2\nthis line has no tag\n").unwrap_err();
        assert!(matches!(err, ParseError::OrphanValue { line: 2 }));
    }

    #[test]
    fn test_crlf_and_trailing_whitespace() {
        let records = lex("SPDXVersion: SPDX-2.2  \r\nSPDXID: SPDXRef-DOCUMENT\r\n").expect("lex");
        assert_eq!(
            records[0].first("SPDXVersion").map(|v| v.value.as_str()),
            Some("SPDX-2.2")
        );
    }

    #[test]
    fn test_empty_document() {
        assert!(matches!(lex(""), Err(ParseError::EmptyDocument)));
        assert!(matches!(
            lex("\n# only a comment\n   \n"),
            Err(ParseError::EmptyDocument)
        ));
    }

    #[test]
    fn test_decode_boms() {
        assert_eq!(decode(b"\xEF\xBB\xBFSPDXVersion: SPDX-2.2").expect("utf8"), "SPDXVersion: SPDX-2.2");
        assert!(matches!(
            decode(b"\xFF\xFES\x00"),
            Err(ParseError::Encoding(_))
        ));
        assert!(matches!(decode(b"abc\xC3"), Err(ParseError::Encoding(_))));
    }
}
