//! Parser state types: units, coordinate format, polarity, interpolation.

use serde::Serialize;

use crate::geometry::Point;

/// Unit system declared by the `%MO` directive.
///
/// All geometry is normalized to millimeters as soon as values are decoded,
/// once per document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub enum Unit {
    /// Millimeters (`%MOMM*%`). The canonical unit.
    #[default]
    Millimeters,
    /// Inches (`%MOIN*%`), converted at 25.4 mm per inch.
    Inches,
}

impl Unit {
    /// Conversion factor from this unit to millimeters.
    #[must_use]
    pub const fn to_millimeters(self) -> f64 {
        match self {
            Self::Millimeters => 1.0,
            Self::Inches => 25.4,
        }
    }
}

impl std::fmt::Display for Unit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Millimeters => write!(f, "mm"),
            Self::Inches => write!(f, "inch"),
        }
    }
}

/// Fixed-point coordinate format declared by the `%FS` directive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CoordinateFormat {
    /// Integer digits on the X axis.
    pub x_integer: u8,
    /// Decimal digits on the X axis.
    pub x_decimal: u8,
    /// Integer digits on the Y axis.
    pub y_integer: u8,
    /// Decimal digits on the Y axis.
    pub y_decimal: u8,
}

impl CoordinateFormat {
    /// Decodes a raw X-axis integer token into millimeters.
    #[must_use]
    pub fn decode_x(self, raw: i64, unit: Unit) -> f64 {
        decode_fixed_point(raw, self.x_decimal, unit)
    }

    /// Decodes a raw Y-axis integer token into millimeters.
    #[must_use]
    pub fn decode_y(self, raw: i64, unit: Unit) -> f64 {
        decode_fixed_point(raw, self.y_decimal, unit)
    }
}

/// Scales a fixed-point integer by `10^-decimal_digits` in the declared unit,
/// then converts to millimeters.
#[allow(clippy::cast_precision_loss)]
fn decode_fixed_point(raw: i64, decimal_digits: u8, unit: Unit) -> f64 {
    let scaled = (raw as f64) * 10_f64.powi(-i32::from(decimal_digits));
    scaled * unit.to_millimeters()
}

/// Polarity state (`%LPD` / `%LPC`).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Polarity {
    /// Dark polarity, deposits paste.
    #[default]
    Dark,
    /// Clear polarity, removes material. Not composited; flashes under clear
    /// polarity are dropped with a warning.
    Clear,
}

/// Interpolation mode (`G01`/`G02`/`G03`).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum InterpolationMode {
    /// Linear interpolation.
    #[default]
    Linear,
    /// Clockwise circular interpolation.
    ClockwiseArc,
    /// Counter-clockwise circular interpolation.
    CounterClockwiseArc,
}

/// Mutable interpreter state threaded through one parse invocation.
///
/// Never global: a fresh value is created per parse and discarded afterwards.
#[derive(Debug, Default)]
pub struct ParserState {
    /// Unit system, once `%MO` has been seen.
    pub unit: Option<Unit>,
    /// Coordinate format, once `%FS` has been seen.
    pub format: Option<CoordinateFormat>,
    /// Current polarity.
    pub polarity: Polarity,
    /// Active interpolation mode.
    pub interpolation: InterpolationMode,
    /// Currently selected aperture D-code.
    pub current_aperture: Option<String>,
    /// Current absolute position, millimeters.
    pub position: Point,
    /// Whether a G36 region block is open. Region contents are not modeled;
    /// operations inside only move the position.
    pub in_region: bool,
}

impl ParserState {
    /// Creates the initial state for a new parse invocation.
    #[must_use]
    pub fn new() -> Self {
        Self {
            position: Point::ORIGIN,
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f64 = 1e-9;

    #[test]
    fn ut_fmt_001_decode_scales_by_decimal_digits() {
        let format = CoordinateFormat {
            x_integer: 2,
            x_decimal: 3,
            y_integer: 2,
            y_decimal: 3,
        };
        assert!((format.decode_x(1000, Unit::Millimeters) - 1.0).abs() < EPSILON);
        assert!((format.decode_y(-2500, Unit::Millimeters) + 2.5).abs() < EPSILON);
    }

    #[test]
    fn ut_fmt_002_inch_decode_converts_to_millimeters() {
        let format = CoordinateFormat {
            x_integer: 2,
            x_decimal: 4,
            y_integer: 2,
            y_decimal: 4,
        };
        // 1.0000 inch -> 25.4 mm
        assert!((format.decode_x(10000, Unit::Inches) - 25.4).abs() < EPSILON);
    }

    #[test]
    fn ut_fmt_003_axes_decode_independently() {
        let format = CoordinateFormat {
            x_integer: 2,
            x_decimal: 2,
            y_integer: 2,
            y_decimal: 4,
        };
        assert!((format.decode_x(150, Unit::Millimeters) - 1.5).abs() < EPSILON);
        assert!((format.decode_y(150, Unit::Millimeters) - 0.015).abs() < EPSILON);
    }

    #[test]
    fn ut_fmt_004_unit_display_matches_directive_semantics() {
        assert_eq!(Unit::Millimeters.to_string(), "mm");
        assert_eq!(Unit::Inches.to_string(), "inch");
    }
}
