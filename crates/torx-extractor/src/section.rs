//! Locate the bid-submission evidence clause in flattened document text
//!
//! The clause starts at the heading `๓. หลักฐานการยื่นข้อเสนอ` and runs up
//! to the first line that opens clause 3.2 (Thai or Arabic numerals) or the
//! "part 2" heading. Documents that do not follow this layout are misses.

use crate::error::ExtractorError;
use regex::Regex;
use std::fmt::Display;
use std::path::Path;
use torx_domain::traits::TextSource;
use tracing::{debug, warn};

const SECTION_PATTERN: &str =
    r"(?s)๓\.\s*หลักฐานการยื่นข้อเสนอ(.*?)\n\s*(?:๓\.๒|3\.2|ส่วนที่\s*๒)";

/// Compiled clause matcher
#[derive(Debug, Clone)]
pub struct SectionExtractor {
    pattern: Regex,
}

impl SectionExtractor {
    /// Compile the clause pattern
    pub fn new() -> Result<Self, ExtractorError> {
        let pattern = Regex::new(SECTION_PATTERN)
            .map_err(|e| ExtractorError::Config(format!("Invalid section pattern: {}", e)))?;
        Ok(Self { pattern })
    }

    /// Return the clause body with whitespace collapsed, or `None` on a miss
    ///
    /// # Examples
    ///
    /// ```
    /// use torx_extractor::SectionExtractor;
    ///
    /// let extractor = SectionExtractor::new().unwrap();
    /// let text = "๓. หลักฐานการยื่นข้อเสนอ\n  (๑) สำเนาหนังสือรับรอง\n๓.๒ ส่วนที่ ๒";
    /// assert_eq!(extractor.extract(text).as_deref(), Some("(๑) สำเนาหนังสือรับรอง"));
    /// assert_eq!(extractor.extract("no heading here"), None);
    /// ```
    pub fn extract(&self, text: &str) -> Option<String> {
        let body = self.pattern.captures(text)?.get(1)?.as_str();
        let collapsed = collapse_whitespace(body);
        if collapsed.is_empty() {
            None
        } else {
            Some(collapsed)
        }
    }

    /// Flatten a document through `source` and extract the clause
    ///
    /// Text-layer failures are logged and reported as a miss.
    pub fn extract_from_document<T>(&self, source: &T, path: &Path) -> Option<String>
    where
        T: TextSource,
        T::Error: Display,
    {
        let text = match source.extract_text(path) {
            Ok(text) => text,
            Err(e) => {
                warn!("Failed to read text from {}: {}", path.display(), e);
                return None;
            }
        };

        let section = self.extract(&text);
        match &section {
            Some(s) => debug!("{}: section of {} chars", path.display(), s.chars().count()),
            None => debug!("{}: section heading not found", path.display()),
        }
        section
    }
}

/// Collapse every whitespace run into one space and trim the ends
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
