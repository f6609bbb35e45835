#![deny(warnings)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![deny(clippy::nursery)]
#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![deny(clippy::indexing_slicing)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! `pastevol-core` — Gerber RS-274X solder-paste layer parsing and per-pad
//! paste volume computation.
//!
//! A paste-layer file goes in as bytes; an immutable [`BoardDocument`] comes
//! out, carrying every pad's shape, dimensions, area, and volume together
//! with the exact polygon geometry that produced the numbers. All output is
//! in millimeters regardless of the units the file declared.

pub mod document;
pub mod error;
pub mod export;
pub mod gerber;
pub mod geometry;

use std::sync::{Arc, RwLock};

pub use document::{BoardDocument, Pad, ParseOptions, ShapeKind, DEFAULT_STENCIL_THICKNESS};
pub use error::{GerberError, ParseWarning};

/// Parses a solder-paste layer from raw file bytes.
///
/// The input must be non-empty UTF-8. Every dimension on the returned
/// document is in millimeters; inch files are converted during parsing.
///
/// # Errors
///
/// Returns a [`GerberError`] for empty or non-UTF-8 input, invalid options,
/// or any structural problem in the file. On error no document is produced,
/// so a previously loaded document is never clobbered by a failed load.
pub fn parse(data: &[u8], options: &ParseOptions) -> Result<BoardDocument, GerberError> {
    if data.is_empty() {
        return Err(GerberError::InvalidInput("empty input".to_string()));
    }
    let content = std::str::from_utf8(data)
        .map_err(|e| GerberError::InvalidInput(format!("input is not valid UTF-8: {e}")))?;
    gerber::parse_document(content, options)
}

/// Holder for the most recently loaded document.
///
/// Replacement is atomic: readers either see the previous document or the
/// new one, never a partially built state. A failed parse leaves the stored
/// document untouched.
#[derive(Debug, Default)]
pub struct DocumentStore {
    current: RwLock<Option<Arc<BoardDocument>>>,
}

impl DocumentStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses `data` and, on success, replaces the stored document.
    ///
    /// # Errors
    ///
    /// Propagates any [`GerberError`] from [`parse`]; the previously stored
    /// document remains current in that case.
    pub fn load(
        &self,
        data: &[u8],
        options: &ParseOptions,
    ) -> Result<Arc<BoardDocument>, GerberError> {
        let document = Arc::new(parse(data, options)?);
        let mut slot = self
            .current
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        *slot = Some(Arc::clone(&document));
        Ok(document)
    }

    /// The currently stored document, if any load has succeeded.
    #[must_use]
    pub fn current(&self) -> Option<Arc<BoardDocument>> {
        self.current
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clone()
    }

    /// Drops the stored document.
    pub fn clear(&self) {
        let mut slot = self
            .current
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        *slot = None;
    }
}
