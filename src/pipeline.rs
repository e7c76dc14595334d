//! Core check pipeline.
//!
//! capture → OCR (raced against a timeout) → clock-shape check → parse →
//! reference time → difference → history entry.
//!
//! Every failure here is recoverable: the caller shows the error and offers
//! another capture.

use crate::capture::CaptureSession;
use crate::difference::difference;
use crate::history::{HistoryEntry, HistoryStore};
use crate::ocr::{self, heuristics, OcrError, TextRecognizer};
use crate::reference::ReferenceTimeResolver;
use crate::timestamp::{self, ParseError, TimeParser};
use chrono::{DateTime, Local};
use std::time::{Duration, Instant};

#[derive(Debug, thiserror::Error)]
pub enum CheckError {
    #[error("timestamp not recognized, retry capture")]
    Unrecognized(#[from] ParseError),
    #[error("text recognition took longer than {after_ms}ms, retry capture")]
    CaptureTimeout { after_ms: u64 },
    #[error("text recognition failed: {0}")]
    Recognition(String),
}

impl From<OcrError> for CheckError {
    fn from(e: OcrError) -> Self {
        match e {
            OcrError::Timeout(after) => CheckError::CaptureTimeout {
                after_ms: after.as_millis() as u64,
            },
            OcrError::Engine(msg) => CheckError::Recognition(msg),
        }
    }
}

/// Runs one comparison end to end. Holds no per-capture state; the session
/// and history store are passed in by the caller.
pub struct Checker {
    parser: TimeParser,
    resolver: ReferenceTimeResolver,
    ocr_timeout: Duration,
}

impl Checker {
    pub fn new(parser: TimeParser, resolver: ReferenceTimeResolver, ocr_timeout: Duration) -> Self {
        Self {
            parser,
            resolver,
            ocr_timeout,
        }
    }

    /// Recognize the captured image, then check the recognized text.
    pub async fn check_capture(
        &self,
        recognizer: &dyn TextRecognizer,
        session: CaptureSession,
        history: &mut HistoryStore,
    ) -> Result<HistoryEntry, CheckError> {
        log::info!(
            "[CHECK] Capture received: {} bytes at {}",
            session.image.len(),
            session.captured_at.format("%H:%M:%S")
        );
        let output = ocr::recognize_with_timeout(recognizer, &session.image, self.ocr_timeout).await?;
        self.check_text(&output.text, session.captured_at, history).await
    }

    /// Check already-recognized text against the reference time.
    ///
    /// The entry is stamped with `captured_at`, the moment the image was
    /// taken, not the moment the comparison finished.
    pub async fn check_text(
        &self,
        raw_text: &str,
        captured_at: DateTime<Local>,
        history: &mut HistoryStore,
    ) -> Result<HistoryEntry, CheckError> {
        let start = Instant::now();

        if !heuristics::detect_clock_structure(&timestamp::normalize(raw_text)) {
            log::warn!("[CHECK] No clock-shaped text in OCR output: {:?}", raw_text);
            return Err(CheckError::Unrecognized(ParseError::NoMatch));
        }

        let record = self.parser.parse(raw_text)?;

        let resolution = self.resolver.resolve_detailed().await;
        if resolution.is_degraded() {
            log::warn!(
                "[CHECK] Comparing against the local clock ({} providers failed)",
                resolution.failures.len()
            );
        }

        let reference = resolution.reference;
        let entry = HistoryEntry {
            timestamp: captured_at,
            difference: difference(&record, &reference),
            record,
            reference,
            ocr_text: heuristics::clean_recognized_text(raw_text),
        };

        if let Err(e) = history.append(entry.clone()) {
            log::warn!("[HISTORY] Entry kept in memory only: {}", e);
        }

        log::info!(
            "[CHECK] {} ({}) in {}ms",
            entry.difference.text,
            entry.reference.source,
            start.elapsed().as_millis()
        );
        Ok(entry)
    }
}
