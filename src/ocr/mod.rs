//! OCR domain — adapter seam for the text recognition engine.
//!
//! The engine itself lives outside this crate. The pipeline only needs
//! plain text back, and treats a slow engine as a recoverable timeout.
//! External code should only use the public items here.

pub mod heuristics;

use async_trait::async_trait;
use std::time::{Duration, Instant};

/// Characters a DVR clock overlay can contain. Engines that support a
/// character whitelist should be configured with this.
pub const OCR_CHAR_WHITELIST: &str = "0123456789:-/. ";

/// Result of OCR processing.
#[derive(Debug, Clone)]
pub struct OcrOutput {
    pub text: String,
    pub char_count: usize,
    pub latency_ms: f64,
    /// Engine-reported confidence, 0.0 to 1.0.
    pub confidence: f64,
}

impl OcrOutput {
    pub fn new(text: impl Into<String>, latency_ms: f64, confidence: f64) -> Self {
        let text = text.into();
        Self {
            char_count: text.chars().count(),
            text,
            latency_ms,
            confidence,
        }
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum OcrError {
    #[error("OCR timed out after {}ms", .0.as_millis())]
    Timeout(Duration),
    #[error("OCR engine failed: {0}")]
    Engine(String),
}

/// A text recognition engine.
#[async_trait]
pub trait TextRecognizer: Send + Sync {
    /// Recognize text in an encoded image (PNG/JPEG bytes of the cropped
    /// clock region).
    async fn recognize(&self, image: &[u8]) -> Result<OcrOutput, OcrError>;
}

/// For callers that already ran OCR elsewhere: the "image" is the
/// recognized UTF-8 text.
#[derive(Debug, Default, Clone, Copy)]
pub struct TextPassthrough;

#[async_trait]
impl TextRecognizer for TextPassthrough {
    async fn recognize(&self, image: &[u8]) -> Result<OcrOutput, OcrError> {
        let start = Instant::now();
        let text = std::str::from_utf8(image)
            .map_err(|e| OcrError::Engine(format!("input is not UTF-8 text: {}", e)))?;
        Ok(OcrOutput::new(
            text,
            start.elapsed().as_secs_f64() * 1000.0,
            1.0,
        ))
    }
}

/// Race recognition against a timer.
///
/// On timeout the recognition future is dropped.
pub async fn recognize_with_timeout(
    recognizer: &dyn TextRecognizer,
    image: &[u8],
    limit: Duration,
) -> Result<OcrOutput, OcrError> {
    let start = Instant::now();
    match tokio::time::timeout(limit, recognizer.recognize(image)).await {
        Ok(Ok(output)) => {
            log::info!(
                "[OCR] Extracted {} chars in {}ms, confidence={:.2}",
                output.char_count,
                start.elapsed().as_millis(),
                output.confidence
            );
            Ok(output)
        }
        Ok(Err(e)) => {
            log::error!("[OCR] Recognition failed: {}", e);
            Err(e)
        }
        Err(_) => {
            log::warn!("[OCR] Recognition exceeded {}ms", limit.as_millis());
            Err(OcrError::Timeout(limit))
        }
    }
}
