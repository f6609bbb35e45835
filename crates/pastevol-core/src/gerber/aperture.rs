//! Aperture definition parsing and the aperture registry.
//!
//! `%AD` commands are resolved into shape templates exactly once, at
//! definition time: outline, analytic area, derived length/width, and the pen
//! width used for stroked draws. Flashing then reduces to translating the
//! template — no shape dispatch happens per operation.

use std::collections::HashMap;
use std::f64::consts::PI;

use crate::document::ShapeKind;
use crate::error::{GerberError, ParseWarning};
use crate::geometry::{outline, polygon_area, BoundingBox, Point};

use super::types::Unit;

/// Fully resolved shape template for one aperture, in millimeters, centered
/// at the origin.
#[derive(Debug, Clone, PartialEq)]
pub struct PadTemplate {
    /// Shape kind inherited by pads flashed with this aperture.
    pub kind: ShapeKind,
    /// Larger footprint dimension.
    pub length: f64,
    /// Smaller footprint dimension.
    pub width: f64,
    /// Analytic area of the shape minus its hole, never negative.
    pub area: f64,
    /// Pen width when the aperture strokes a draw operation.
    pub stroke_width: f64,
    outline: Vec<Point>,
    hole: Option<Vec<Point>>,
}

impl PadTemplate {
    /// Outer boundary translated to `center`.
    #[must_use]
    pub fn outline_at(&self, center: Point) -> Vec<Point> {
        self.outline
            .iter()
            .map(|point| point.translated(center.x, center.y))
            .collect()
    }

    /// Hole boundary translated to `center`, if the aperture has a hole.
    #[must_use]
    pub fn hole_at(&self, center: Point) -> Option<Vec<Point>> {
        self.hole.as_ref().map(|boundary| {
            boundary
                .iter()
                .map(|point| point.translated(center.x, center.y))
                .collect()
        })
    }
}

/// Registry entry for one defined aperture code.
#[derive(Debug, Clone, PartialEq)]
pub enum RegistryEntry {
    /// A usable shape template.
    Template(PadTemplate),
    /// A definition this parser cannot model. Selecting it is legal; every
    /// flash or draw with it is tallied as a skipped pad.
    Skipped {
        /// Why the definition is unusable.
        detail: String,
    },
}

/// Aperture definitions keyed by D-code.
#[derive(Debug, Default)]
pub struct ApertureRegistry {
    entries: HashMap<String, RegistryEntry>,
}

impl ApertureRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a definition. Redefining a code replaces the previous entry
    /// and reports it through the returned warning.
    pub fn define(&mut self, code: String, entry: RegistryEntry) -> Option<ParseWarning> {
        let replaced = self.entries.insert(code.clone(), entry);
        replaced.map(|_| ParseWarning::IgnoredCommand {
            detail: format!("duplicate aperture definition D{code}; previous definition replaced"),
        })
    }

    /// Looks up a defined aperture.
    #[must_use]
    pub fn lookup(&self, code: &str) -> Option<&RegistryEntry> {
        self.entries.get(code)
    }

    /// Whether the code has been defined at all, usable or not.
    #[must_use]
    pub fn is_defined(&self, code: &str) -> bool {
        self.entries.contains_key(code)
    }
}

/// Outcome of parsing one `%AD` command body.
#[derive(Debug)]
pub struct ParsedDefinition {
    /// Aperture D-code, digits only.
    pub code: String,
    /// Registry entry to install.
    pub entry: RegistryEntry,
    /// Warnings raised while resolving dimensions.
    pub warnings: Vec<ParseWarning>,
}

/// Parses the body of an `%AD` command (everything after `AD`), e.g.
/// `D10C,0.500X0.100`.
///
/// Supported designators are `C`, `R`, `O`, and `P`. Anything else — macro
/// references in particular — yields a [`RegistryEntry::Skipped`] entry, as
/// do unusable dimensions; both are isolated per-aperture problems, never
/// fatal.
///
/// # Errors
///
/// Returns [`GerberError::InvalidDirective`] when the command is structurally
/// broken: no `D` prefix or no numeric code.
pub fn parse_definition(body: &str, unit: Unit) -> Result<ParsedDefinition, GerberError> {
    let Some(rest) = body.strip_prefix('D') else {
        return Err(GerberError::InvalidDirective(format!(
            "aperture definition `{body}` is missing the D-code"
        )));
    };

    let code: String = rest.chars().take_while(char::is_ascii_digit).collect();
    if code.is_empty() {
        return Err(GerberError::InvalidDirective(format!(
            "aperture definition `{body}` has no numeric code"
        )));
    }

    let after_code = rest.get(code.len()..).unwrap_or("");
    let (designator, params) = after_code
        .split_once(',')
        .map_or((after_code, ""), |(d, p)| (d, p));

    let mut warnings = Vec::new();
    let scale = unit.to_millimeters();
    let tokens: Vec<&str> = if params.is_empty() {
        Vec::new()
    } else {
        params.split('X').collect()
    };

    let built = match designator {
        "C" => build_circle(&tokens, &code, scale, &mut warnings),
        "R" => build_rectangular(&tokens, &code, scale, &mut warnings, ShapeKind::Rectangle),
        "O" => build_rectangular(&tokens, &code, scale, &mut warnings, ShapeKind::Obround),
        "P" => build_polygon(&tokens, &code, scale, &mut warnings),
        other => Err(format!("unrecognized shape designator `{other}`")),
    };

    let entry = match built {
        Ok(template) => RegistryEntry::Template(template),
        Err(detail) => {
            warnings.push(ParseWarning::UnsupportedAperture {
                code: code.clone(),
                detail: detail.clone(),
            });
            RegistryEntry::Skipped { detail }
        }
    };

    Ok(ParsedDefinition {
        code,
        entry,
        warnings,
    })
}

fn build_circle(
    tokens: &[&str],
    code: &str,
    scale: f64,
    warnings: &mut Vec<ParseWarning>,
) -> Result<PadTemplate, String> {
    let diameter = checked_dimension(tokens.first(), "circle diameter", code, scale, warnings)?;
    let hole = checked_hole(tokens.get(1), code, scale, warnings)?;

    let radius = diameter / 2.0;
    let area = (PI * radius * radius - hole_area(hole)).max(0.0);
    Ok(PadTemplate {
        kind: ShapeKind::Circle,
        length: diameter,
        width: diameter,
        area,
        stroke_width: diameter,
        outline: outline::circle(Point::ORIGIN, radius),
        hole: hole.map(|h| outline::circle_hole(Point::ORIGIN, h / 2.0)),
    })
}

fn build_rectangular(
    tokens: &[&str],
    code: &str,
    scale: f64,
    warnings: &mut Vec<ParseWarning>,
    kind: ShapeKind,
) -> Result<PadTemplate, String> {
    let label = match kind {
        ShapeKind::Obround => "obround",
        _ => "rectangle",
    };
    let width = checked_dimension(
        tokens.first(),
        &format!("{label} width"),
        code,
        scale,
        warnings,
    )?;
    let height = checked_dimension(
        tokens.get(1),
        &format!("{label} height"),
        code,
        scale,
        warnings,
    )?;
    let hole = checked_hole(tokens.get(2), code, scale, warnings)?;

    let smaller = width.min(height);
    let outer_area = if kind == ShapeKind::Obround {
        // Stadium: rectangle body plus two semicircular caps.
        (PI / 4.0 - 1.0).mul_add(smaller * smaller, width * height)
    } else {
        width * height
    };
    let boundary = if kind == ShapeKind::Obround {
        outline::obround(Point::ORIGIN, width, height)
    } else {
        outline::rectangle(Point::ORIGIN, width, height)
    };

    Ok(PadTemplate {
        kind,
        length: width.max(height),
        width: smaller,
        area: (outer_area - hole_area(hole)).max(0.0),
        stroke_width: smaller,
        outline: boundary,
        hole: hole.map(|h| outline::circle_hole(Point::ORIGIN, h / 2.0)),
    })
}

fn build_polygon(
    tokens: &[&str],
    code: &str,
    scale: f64,
    warnings: &mut Vec<ParseWarning>,
) -> Result<PadTemplate, String> {
    let diameter = checked_dimension(tokens.first(), "polygon diameter", code, scale, warnings)?;

    let vertices_token = tokens.get(1).copied().unwrap_or("");
    let vertices: u16 = vertices_token
        .parse()
        .map_err(|_| format!("invalid polygon vertex count `{vertices_token}`"))?;
    if vertices < 3 {
        return Err(format!("polygon has {vertices} vertices; expected at least 3"));
    }

    let rotation = match tokens.get(2) {
        Some(token) => token
            .parse::<f64>()
            .ok()
            .filter(|r| r.is_finite())
            .ok_or_else(|| format!("invalid polygon rotation `{token}`"))?,
        None => 0.0,
    };
    let hole = checked_hole(tokens.get(3), code, scale, warnings)?;

    let boundary = outline::regular_polygon(Point::ORIGIN, diameter / 2.0, vertices, rotation);
    let mut bounds = BoundingBox::new();
    for point in &boundary {
        bounds.update(*point);
    }
    let area = (polygon_area(&boundary) - hole_area(hole)).max(0.0);

    Ok(PadTemplate {
        kind: ShapeKind::Polygon,
        length: bounds.width().max(bounds.height()),
        width: bounds.width().min(bounds.height()),
        area,
        stroke_width: diameter,
        outline: boundary,
        hole: hole.map(|h| outline::circle_hole(Point::ORIGIN, h / 2.0)),
    })
}

fn hole_area(hole: Option<f64>) -> f64 {
    hole.map_or(0.0, |h| PI * (h / 2.0) * (h / 2.0))
}

/// Parses and validates a required dimension token, scaled to millimeters.
///
/// Negative values are repaired to their absolute value with a warning; zero
/// or non-finite values reject the definition.
fn checked_dimension(
    token: Option<&&str>,
    label: &str,
    code: &str,
    scale: f64,
    warnings: &mut Vec<ParseWarning>,
) -> Result<f64, String> {
    let Some(token) = token else {
        return Err(format!("missing {label}"));
    };
    let value: f64 = token
        .parse()
        .map_err(|_| format!("invalid {label} `{token}`"))?;
    if !value.is_finite() {
        return Err(format!("{label} is not finite"));
    }

    let mut normalized = value;
    if normalized < 0.0 {
        warnings.push(ParseWarning::NormalizedDimension {
            code: code.to_string(),
            detail: format!("negative {label} {value}; absolute value used"),
        });
        normalized = normalized.abs();
    }
    if normalized <= f64::EPSILON {
        return Err(format!("{label} is zero"));
    }
    Ok(normalized * scale)
}

/// Parses an optional hole diameter token. A zero hole is treated as no hole.
fn checked_hole(
    token: Option<&&str>,
    code: &str,
    scale: f64,
    warnings: &mut Vec<ParseWarning>,
) -> Result<Option<f64>, String> {
    let Some(token) = token else {
        return Ok(None);
    };
    let value: f64 = token
        .parse()
        .map_err(|_| format!("invalid hole diameter `{token}`"))?;
    if !value.is_finite() {
        return Err("hole diameter is not finite".to_string());
    }

    let mut normalized = value;
    if normalized < 0.0 {
        warnings.push(ParseWarning::NormalizedDimension {
            code: code.to_string(),
            detail: format!("negative hole diameter {value}; absolute value used"),
        });
        normalized = normalized.abs();
    }
    if normalized <= f64::EPSILON {
        return Ok(None);
    }
    Ok(Some(normalized * scale))
}
