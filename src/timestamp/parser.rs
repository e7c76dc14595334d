//! Priority-ordered timestamp parser.

use super::normalize::normalize;
use super::patterns::PatternKind;
use super::{DateOrder, ParseError, TimestampRecord};

/// Parses OCR text by trying each pattern in priority order.
///
/// For every pattern only its first structural match is considered. A match
/// that fails validation does not abort the parse; the next pattern gets a
/// chance at the same text.
#[derive(Debug, Clone)]
pub struct TimeParser {
    order: DateOrder,
    patterns: Vec<PatternKind>,
}

impl Default for TimeParser {
    fn default() -> Self {
        Self::new(DateOrder::default())
    }
}

impl TimeParser {
    pub fn new(order: DateOrder) -> Self {
        Self {
            order,
            patterns: PatternKind::ALL.to_vec(),
        }
    }

    pub fn parse(&self, raw_text: &str) -> Result<TimestampRecord, ParseError> {
        self.parse_with_kind(raw_text).map(|(_, record)| record)
    }

    /// Same as [`parse`](Self::parse), also reporting which pattern won.
    pub fn parse_with_kind(
        &self,
        raw_text: &str,
    ) -> Result<(PatternKind, TimestampRecord), ParseError> {
        let text = normalize(raw_text);
        if text.is_empty() {
            log::warn!("[PARSE] OCR text is empty after normalization");
            return Err(ParseError::NoMatch);
        }
        log::debug!("[PARSE] Normalized text: {:?}", text);

        for kind in &self.patterns {
            let Some(caps) = kind.find(&text) else {
                continue;
            };
            match kind.extract(&caps, self.order) {
                Ok(record) => {
                    log::info!("[PARSE] Matched {} pattern: {:?}", kind.name(), record);
                    return Ok((*kind, record));
                }
                Err(e) => {
                    log::debug!(
                        "[PARSE] {} match {:?} rejected: {}",
                        kind.name(),
                        caps.get(0).map(|m| m.as_str()).unwrap_or_default(),
                        e
                    );
                }
            }
        }

        log::warn!("[PARSE] No timestamp pattern matched {:?}", text);
        Err(ParseError::NoMatch)
    }
}
