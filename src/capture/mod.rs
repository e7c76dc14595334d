//! Capture domain — the still image handed to the pipeline.
//!
//! Camera access and cropping happen in the UI layer. This module owns the
//! value that crosses into the core, plus a busy flag the UI can use to keep
//! one capture in flight at a time.

use chrono::{DateTime, Local};
use std::sync::atomic::{AtomicBool, Ordering};

/// One cropped still of the DVR clock region.
#[derive(Debug, Clone)]
pub struct CaptureSession {
    /// Encoded image bytes as produced by the capture layer.
    pub image: Vec<u8>,
    pub captured_at: DateTime<Local>,
}

impl CaptureSession {
    pub fn new(image: Vec<u8>) -> Self {
        Self {
            image,
            captured_at: Local::now(),
        }
    }
}

/// Single-flight flag for the capture trigger.
#[derive(Debug, Default)]
pub struct CaptureGate {
    busy: AtomicBool,
}

impl CaptureGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim the gate, or `None` while another capture is in progress.
    pub fn try_begin(&self) -> Option<CaptureGuard<'_>> {
        self.busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| CaptureGuard { gate: self })
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }
}

/// Releases the gate on drop, including on error paths.
#[derive(Debug)]
pub struct CaptureGuard<'a> {
    gate: &'a CaptureGate,
}

impl Drop for CaptureGuard<'_> {
    fn drop(&mut self) {
        self.gate.busy.store(false, Ordering::Release);
    }
}
