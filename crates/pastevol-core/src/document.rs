//! The immutable board document and its builder.
//!
//! [`DocumentBuilder`] accumulates pads, geometry, and warnings during one
//! parse invocation; [`BoardDocument`] is the frozen result handed to
//! consumers. Once built, a document is never mutated — loading another file
//! produces an entirely new document.

use serde::Serialize;

use crate::error::ParseWarning;
use crate::gerber::types::Unit;
use crate::geometry::{PadGeometry, Point};

/// Default stencil thickness in millimeters (150 µm).
pub const DEFAULT_STENCIL_THICKNESS: f64 = 0.15;

/// Shape kind of a pad, inherited from the aperture that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ShapeKind {
    /// Circular aperture.
    Circle,
    /// Rectangular aperture.
    Rectangle,
    /// Obround (stadium) aperture.
    Obround,
    /// Regular polygon aperture.
    Polygon,
}

impl std::fmt::Display for ShapeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Circle => write!(f, "circle"),
            Self::Rectangle => write!(f, "rectangle"),
            Self::Obround => write!(f, "obround"),
            Self::Polygon => write!(f, "polygon"),
        }
    }
}

/// One solder-paste pad with its measurements, all lengths in millimeters,
/// area in mm² and volume in mm³.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Pad {
    /// Sequential id, assigned in emission order starting at 1.
    pub id: u32,
    /// Shape kind.
    pub shape: ShapeKind,
    /// Larger footprint dimension.
    pub length: f64,
    /// Smaller footprint dimension.
    pub width: f64,
    /// Paste area, hole subtracted.
    pub area: f64,
    /// Stencil thickness applied to this pad.
    pub thickness: f64,
    /// Paste volume, `area * thickness`, unrounded.
    pub volume: f64,
    /// Flash/stroke anchor position.
    pub position: Point,
}

/// Options for one load.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ParseOptions {
    /// Stencil thickness in millimeters, applied uniformly to every pad.
    pub stencil_thickness: f64,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            stencil_thickness: DEFAULT_STENCIL_THICKNESS,
        }
    }
}

impl ParseOptions {
    /// Validates the options before a parse.
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::GerberError::InvalidInput`] when the stencil
    /// thickness is not a positive finite number.
    pub fn validate(self) -> Result<(), crate::error::GerberError> {
        if !self.stencil_thickness.is_finite() || self.stencil_thickness <= 0.0 {
            return Err(crate::error::GerberError::InvalidInput(format!(
                "stencil thickness must be positive and finite, got {}",
                self.stencil_thickness
            )));
        }
        Ok(())
    }
}

/// Immutable result of one successful load.
///
/// All accessors are read-only; concurrent consumers may share the document
/// freely (typically behind an `Arc`).
#[derive(Debug, Clone, Serialize)]
pub struct BoardDocument {
    units: Unit,
    pads: Vec<Pad>,
    geometries: Vec<PadGeometry>,
    warnings: Vec<ParseWarning>,
    skipped_pad_count: u32,
    total_volume: f64,
    stencil_thickness: f64,
}

impl BoardDocument {
    /// Unit system the source file declared.
    #[must_use]
    pub const fn units(&self) -> Unit {
        self.units
    }

    /// Pads in emission order.
    #[must_use]
    pub fn pads(&self) -> &[Pad] {
        &self.pads
    }

    /// Per-pad absolute geometry, parallel to [`Self::pads`].
    #[must_use]
    pub fn geometries(&self) -> &[PadGeometry] {
        &self.geometries
    }

    /// Geometry for one pad id, if the pad exists.
    #[must_use]
    pub fn geometry_for(&self, pad_id: u32) -> Option<&PadGeometry> {
        self.geometries.iter().find(|g| g.pad_id == pad_id)
    }

    /// Number of pads emitted.
    #[must_use]
    pub fn total_pad_count(&self) -> u32 {
        saturate_u32(self.pads.len())
    }

    /// Number of pads omitted because their aperture was unsupported.
    #[must_use]
    pub const fn skipped_pad_count(&self) -> u32 {
        self.skipped_pad_count
    }

    /// Full-precision sum of the unrounded per-pad volumes, mm³.
    #[must_use]
    pub const fn total_volume(&self) -> f64 {
        self.total_volume
    }

    /// Stencil thickness applied to every pad, mm.
    #[must_use]
    pub const fn stencil_thickness(&self) -> f64 {
        self.stencil_thickness
    }

    /// Non-fatal warnings collected during the load.
    #[must_use]
    pub fn warnings(&self) -> &[ParseWarning] {
        &self.warnings
    }
}

/// Measurements for one pad about to be emitted.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PadMeasurements {
    /// Shape kind inherited from the aperture.
    pub shape: ShapeKind,
    /// Larger footprint dimension.
    pub length: f64,
    /// Smaller footprint dimension.
    pub width: f64,
    /// Paste area, hole subtracted.
    pub area: f64,
    /// Flash/stroke anchor position.
    pub position: Point,
}

/// Accumulator assembling a [`BoardDocument`] during one parse.
#[derive(Debug)]
pub struct DocumentBuilder {
    stencil_thickness: f64,
    pads: Vec<Pad>,
    geometries: Vec<PadGeometry>,
    warnings: Vec<ParseWarning>,
    skipped_pad_count: u32,
    next_id: u32,
}

impl DocumentBuilder {
    /// Creates an empty builder with the given stencil thickness.
    #[must_use]
    pub const fn new(stencil_thickness: f64) -> Self {
        Self {
            stencil_thickness,
            pads: Vec::new(),
            geometries: Vec::new(),
            warnings: Vec::new(),
            skipped_pad_count: 0,
            next_id: 1,
        }
    }

    /// Emits one pad and its geometry, returning the assigned id.
    pub fn emit_pad(
        &mut self,
        measurements: PadMeasurements,
        outline: Vec<Point>,
        hole: Option<Vec<Point>>,
    ) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        self.pads.push(Pad {
            id,
            shape: measurements.shape,
            length: measurements.length,
            width: measurements.width,
            area: measurements.area,
            thickness: self.stencil_thickness,
            volume: measurements.area * self.stencil_thickness,
            position: measurements.position,
        });
        self.geometries.push(PadGeometry {
            pad_id: id,
            outline,
            hole,
        });
        id
    }

    /// Records a warning.
    pub fn warn(&mut self, warning: ParseWarning) {
        log::warn!("{warning}");
        self.warnings.push(warning);
    }

    /// Tallies a pad skipped because of an unsupported aperture.
    pub fn skip_pad(&mut self, warning: ParseWarning) {
        self.skipped_pad_count += 1;
        self.warn(warning);
    }

    /// Freezes the accumulated state into an immutable document.
    ///
    /// The total volume is the full-precision sum of the unrounded per-pad
    /// volumes — display rounding happens only in the export layer and never
    /// feeds back here.
    #[must_use]
    pub fn finish(self, units: Unit) -> BoardDocument {
        // An empty f64 sum is -0.0; keep the zero unsigned.
        let total_volume = self.pads.iter().map(|pad| pad.volume).sum::<f64>() + 0.0;
        BoardDocument {
            units,
            pads: self.pads,
            geometries: self.geometries,
            warnings: self.warnings,
            skipped_pad_count: self.skipped_pad_count,
            total_volume,
            stencil_thickness: self.stencil_thickness,
        }
    }
}

/// Saturating conversion for counters exposed as `u32`.
#[must_use]
pub fn saturate_u32(value: usize) -> u32 {
    u32::try_from(value).unwrap_or(u32::MAX)
}
