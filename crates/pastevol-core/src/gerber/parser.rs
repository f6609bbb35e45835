//! RS-274X command interpreter.
//!
//! Drives the tokenizer, threads the explicit [`ParserState`] through every
//! command, resolves apertures against the registry, and feeds flash/draw
//! geometry into the document builder. State lives for exactly one parse
//! invocation.

use std::f64::consts::PI;

use crate::document::{BoardDocument, DocumentBuilder, PadMeasurements, ParseOptions, ShapeKind};
use crate::error::{GerberError, ParseWarning};
use crate::geometry::{area, outline, BoundingBox, Point};

use super::aperture::{parse_definition, ApertureRegistry, RegistryEntry};
use super::tokenizer::Tokenizer;
use super::types::{CoordinateFormat, InterpolationMode, ParserState, Polarity, Unit};

/// Parses a complete paste-layer file into an immutable document.
///
/// Parsing is single-pass and synchronous; all state is local to this call.
///
/// # Errors
///
/// Returns a [`GerberError`] for any structural problem: malformed commands,
/// coordinate or aperture use before the unit/format directives, unparseable
/// directives, or references to undefined apertures. Per-aperture and
/// per-pad problems never error; they are collected as warnings on the
/// returned document.
pub fn parse_document(
    content: &str,
    options: &ParseOptions,
) -> Result<BoardDocument, GerberError> {
    options.validate()?;

    let mut state = ParserState::new();
    let mut registry = ApertureRegistry::new();
    let mut builder = DocumentBuilder::new(options.stencil_thickness);

    for command in Tokenizer::new(content) {
        let command = command?;
        let flow = if command.extended {
            handle_extended(&command.text, &mut state, &mut registry, &mut builder)?;
            Flow::Continue
        } else {
            handle_word(&command.text, &mut state, &registry, &mut builder)?
        };
        if flow == Flow::Stop {
            break;
        }
    }

    let units = state.unit.unwrap_or_default();
    let document = builder.finish(units);
    log::info!(
        "parsed paste layer: {} pads, {} skipped, total volume {} mm3",
        document.total_pad_count(),
        document.skipped_pad_count(),
        document.total_volume()
    );
    Ok(document)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Stop,
}

fn handle_extended(
    text: &str,
    state: &mut ParserState,
    registry: &mut ApertureRegistry,
    builder: &mut DocumentBuilder,
) -> Result<(), GerberError> {
    if let Some(rest) = text.strip_prefix("MO") {
        return apply_units(rest, state, builder);
    }
    if let Some(rest) = text.strip_prefix("FS") {
        return apply_format(rest, state, builder);
    }
    if let Some(rest) = text.strip_prefix("AD") {
        return apply_definition(rest, state, registry, builder);
    }
    if let Some(rest) = text.strip_prefix("LP") {
        return apply_polarity(rest, state);
    }

    // Attributes, macro bodies, image directives: no paste contribution.
    log::debug!("ignoring extended command `{text}`");
    Ok(())
}

fn apply_units(
    rest: &str,
    state: &mut ParserState,
    builder: &mut DocumentBuilder,
) -> Result<(), GerberError> {
    let unit = match rest {
        "MM" => Unit::Millimeters,
        "IN" => Unit::Inches,
        other => {
            return Err(GerberError::InvalidDirective(format!(
                "unknown unit directive `MO{other}`"
            )))
        }
    };

    match state.unit {
        None => {
            log::info!("units declared: {unit}");
            state.unit = Some(unit);
        }
        Some(existing) if existing != unit => builder.warn(ParseWarning::IgnoredCommand {
            detail: format!(
                "conflicting unit re-declaration MO{rest} ignored; document stays in {existing}"
            ),
        }),
        Some(_) => {}
    }
    Ok(())
}

fn apply_format(
    rest: &str,
    state: &mut ParserState,
    builder: &mut DocumentBuilder,
) -> Result<(), GerberError> {
    let mut chars = rest.chars().peekable();

    // Zero-suppression and coordinate-mode flags precede the axis spec.
    while let Some(&flag) = chars.peek() {
        match flag {
            'L' | 'T' | 'D' | 'A' => {
                chars.next();
            }
            'I' => {
                return Err(GerberError::InvalidDirective(
                    "incremental coordinate mode (FS..I..) is not supported".to_string(),
                ))
            }
            _ => break,
        }
    }

    let (x_integer, x_decimal) = expect_axis(&mut chars, 'X', rest)?;
    let (y_integer, y_decimal) = expect_axis(&mut chars, 'Y', rest)?;
    let format = CoordinateFormat {
        x_integer,
        x_decimal,
        y_integer,
        y_decimal,
    };

    match state.format {
        None => {
            log::info!(
                "coordinate format declared: X{x_integer}.{x_decimal} Y{y_integer}.{y_decimal}"
            );
            state.format = Some(format);
        }
        Some(existing) if existing != format => builder.warn(ParseWarning::IgnoredCommand {
            detail: format!("conflicting format re-declaration FS{rest} ignored"),
        }),
        Some(_) => {}
    }
    Ok(())
}

fn expect_axis(
    chars: &mut std::iter::Peekable<std::str::Chars<'_>>,
    axis: char,
    directive: &str,
) -> Result<(u8, u8), GerberError> {
    if chars.next() != Some(axis) {
        return Err(GerberError::InvalidDirective(format!(
            "format directive `FS{directive}` is missing the {axis} axis"
        )));
    }
    let integer = expect_digit(chars.next(), directive)?;
    let decimal = expect_digit(chars.next(), directive)?;
    Ok((integer, decimal))
}

fn expect_digit(ch: Option<char>, directive: &str) -> Result<u8, GerberError> {
    ch.and_then(|c| c.to_digit(10))
        .and_then(|d| u8::try_from(d).ok())
        .ok_or_else(|| {
            GerberError::InvalidDirective(format!(
                "format directive `FS{directive}` has a malformed digit count"
            ))
        })
}

fn apply_definition(
    rest: &str,
    state: &ParserState,
    registry: &mut ApertureRegistry,
    builder: &mut DocumentBuilder,
) -> Result<(), GerberError> {
    let Some(unit) = state.unit else {
        return Err(GerberError::UninitializedFormat(format!(
            "aperture definition `AD{rest}` before the unit directive"
        )));
    };

    let parsed = parse_definition(rest, unit)?;
    for warning in parsed.warnings {
        builder.warn(warning);
    }
    log::debug!("defined aperture D{}", parsed.code);
    if let Some(warning) = registry.define(parsed.code, parsed.entry) {
        builder.warn(warning);
    }
    Ok(())
}

fn apply_polarity(rest: &str, state: &mut ParserState) -> Result<(), GerberError> {
    match rest {
        "D" => state.polarity = Polarity::Dark,
        "C" => state.polarity = Polarity::Clear,
        other => {
            return Err(GerberError::InvalidDirective(format!(
                "unknown polarity directive `LP{other}`"
            )))
        }
    }
    Ok(())
}

fn handle_word(
    text: &str,
    state: &mut ParserState,
    registry: &ApertureRegistry,
    builder: &mut DocumentBuilder,
) -> Result<Flow, GerberError> {
    let mut rest = text;

    while let Some(after) = rest.strip_prefix('G') {
        let digits: String = after.chars().take_while(char::is_ascii_digit).collect();
        let code: u16 = digits.parse().map_err(|_| {
            GerberError::MalformedCommand(format!("malformed G code in `{text}`"))
        })?;
        rest = after.get(digits.len()..).unwrap_or("");

        match code {
            1 => state.interpolation = InterpolationMode::Linear,
            2 => state.interpolation = InterpolationMode::ClockwiseArc,
            3 => state.interpolation = InterpolationMode::CounterClockwiseArc,
            4 => return Ok(Flow::Continue),
            36 => {
                if !state.in_region {
                    builder.warn(ParseWarning::IgnoredCommand {
                        detail: "G36 region is not modeled; its contents contribute no paste"
                            .to_string(),
                    });
                }
                state.in_region = true;
            }
            37 => state.in_region = false,
            54 => {} // deprecated aperture-select prefix, the D code follows
            91 => {
                return Err(GerberError::InvalidDirective(
                    "incremental coordinates (G91) are not supported".to_string(),
                ))
            }
            other => log::debug!("ignoring G{other:02} in `{text}`"),
        }

        if rest.is_empty() {
            return Ok(Flow::Continue);
        }
    }

    if let Some(after) = rest.strip_prefix('M') {
        match after {
            "02" | "00" | "2" | "0" => return Ok(Flow::Stop),
            other => {
                log::debug!("ignoring M{other} command");
                return Ok(Flow::Continue);
            }
        }
    }

    let word = parse_operation_word(rest)?;
    apply_operation(&word, state, registry, builder)?;
    Ok(Flow::Continue)
}

#[derive(Debug, Default)]
struct OperationWord {
    x: Option<i64>,
    y: Option<i64>,
    dcode: Option<u32>,
}

fn parse_operation_word(text: &str) -> Result<OperationWord, GerberError> {
    let mut word = OperationWord::default();
    let mut chars = text.chars().peekable();

    while let Some(field) = chars.next() {
        let mut number = String::new();
        if matches!(chars.peek(), Some('+' | '-')) {
            if let Some(sign) = chars.next() {
                number.push(sign);
            }
        }
        while let Some(&digit) = chars.peek() {
            if digit.is_ascii_digit() {
                number.push(digit);
                chars.next();
            } else {
                break;
            }
        }
        if number.is_empty() {
            return Err(GerberError::MalformedCommand(format!(
                "`{field}` without a value in `{text}`"
            )));
        }

        match field {
            'X' => word.x = Some(parse_i64(&number, text)?),
            'Y' => word.y = Some(parse_i64(&number, text)?),
            // Arc center offsets; arcs are chord-approximated, so the
            // offsets themselves are unused.
            'I' | 'J' => {
                parse_i64(&number, text)?;
            }
            'D' => {
                word.dcode = Some(number.parse().map_err(|_| {
                    GerberError::MalformedCommand(format!("malformed D code in `{text}`"))
                })?);
            }
            other => {
                return Err(GerberError::MalformedCommand(format!(
                    "unrecognized token `{other}` in `{text}`"
                )))
            }
        }
    }

    Ok(word)
}

fn parse_i64(number: &str, context: &str) -> Result<i64, GerberError> {
    number.parse().map_err(|_| {
        GerberError::MalformedCommand(format!("invalid coordinate `{number}` in `{context}`"))
    })
}

fn apply_operation(
    word: &OperationWord,
    state: &mut ParserState,
    registry: &ApertureRegistry,
    builder: &mut DocumentBuilder,
) -> Result<(), GerberError> {
    if let Some(code) = word.dcode {
        if code >= 10 {
            // Coordinates on a selection word still move, per document order.
            state.position = decode_target(word, state)?;
            return select_aperture(code, state, registry);
        }
    }

    let target = decode_target(word, state)?;
    match word.dcode {
        Some(1) => draw_to(target, state, registry, builder),
        Some(2) => {
            state.position = target;
            Ok(())
        }
        Some(3) => {
            state.position = target;
            flash(state, registry, builder)
        }
        Some(other) => {
            log::debug!("ignoring operation code D{other:02}");
            state.position = target;
            Ok(())
        }
        None => {
            // Deprecated modal operation: bare coordinates only move.
            log::debug!("coordinate without operation code; position updated");
            state.position = target;
            Ok(())
        }
    }
}

fn select_aperture(
    code: u32,
    state: &mut ParserState,
    registry: &ApertureRegistry,
) -> Result<(), GerberError> {
    if state.unit.is_none() || state.format.is_none() {
        return Err(GerberError::UninitializedFormat(format!(
            "aperture selection D{code} before the unit/format directives"
        )));
    }

    let code = code.to_string();
    if !registry.is_defined(&code) {
        return Err(GerberError::UndefinedAperture(code));
    }
    log::debug!("selected aperture D{code}");
    state.current_aperture = Some(code);
    Ok(())
}

fn decode_target(word: &OperationWord, state: &ParserState) -> Result<Point, GerberError> {
    if word.x.is_none() && word.y.is_none() {
        return Ok(state.position);
    }

    let (Some(unit), Some(format)) = (state.unit, state.format) else {
        return Err(GerberError::UninitializedFormat(
            "coordinate data before the unit/format directives".to_string(),
        ));
    };

    // Modal coordinates: a missing axis keeps its current value.
    let x = word.x.map_or(state.position.x, |raw| format.decode_x(raw, unit));
    let y = word.y.map_or(state.position.y, |raw| format.decode_y(raw, unit));
    Ok(Point::new(x, y))
}

fn flash(
    state: &ParserState,
    registry: &ApertureRegistry,
    builder: &mut DocumentBuilder,
) -> Result<(), GerberError> {
    if state.in_region {
        return Ok(());
    }

    let Some(code) = state.current_aperture.as_deref() else {
        return Err(GerberError::NoApertureSelected(
            "a flash operation".to_string(),
        ));
    };
    let Some(entry) = registry.lookup(code) else {
        return Err(GerberError::UndefinedAperture(code.to_string()));
    };
    let template = match entry {
        RegistryEntry::Template(template) => template,
        RegistryEntry::Skipped { detail } => {
            builder.skip_pad(ParseWarning::UnsupportedAperture {
                code: code.to_string(),
                detail: detail.clone(),
            });
            return Ok(());
        }
    };

    if state.polarity == Polarity::Clear {
        builder.warn(ParseWarning::IgnoredCommand {
            detail: format!(
                "clear-polarity flash at ({:.3}, {:.3}) deposits no paste; ignored",
                state.position.x, state.position.y
            ),
        });
        return Ok(());
    }

    let mut boundary = template.outline_at(state.position);
    area::normalize_ccw(&mut boundary);
    if area::distinct_vertex_count(&boundary) < 3
        || area::polygon_area(&boundary) <= f64::EPSILON
    {
        builder.warn(ParseWarning::DegenerateGeometry {
            detail: format!(
                "flash of D{code} at ({:.3}, {:.3}) collapsed; pad dropped",
                state.position.x, state.position.y
            ),
        });
        return Ok(());
    }

    let hole = template.hole_at(state.position);
    builder.emit_pad(
        PadMeasurements {
            shape: template.kind,
            length: template.length,
            width: template.width,
            area: template.area,
            position: state.position,
        },
        boundary,
        hole,
    );
    Ok(())
}

fn draw_to(
    target: Point,
    state: &mut ParserState,
    registry: &ApertureRegistry,
    builder: &mut DocumentBuilder,
) -> Result<(), GerberError> {
    let from = state.position;
    state.position = target;
    if state.in_region {
        return Ok(());
    }

    let Some(code) = state.current_aperture.as_deref() else {
        return Err(GerberError::NoApertureSelected(
            "a draw operation".to_string(),
        ));
    };
    let Some(entry) = registry.lookup(code) else {
        return Err(GerberError::UndefinedAperture(code.to_string()));
    };
    let template = match entry {
        RegistryEntry::Template(template) => template,
        RegistryEntry::Skipped { detail } => {
            builder.skip_pad(ParseWarning::UnsupportedAperture {
                code: code.to_string(),
                detail: detail.clone(),
            });
            return Ok(());
        }
    };

    if state.polarity == Polarity::Clear {
        builder.warn(ParseWarning::IgnoredCommand {
            detail: "clear-polarity draw deposits no paste; ignored".to_string(),
        });
        return Ok(());
    }

    let width = template.stroke_width;
    match outline::capsule(from, target, width) {
        Some(mut boundary) => {
            area::normalize_ccw(&mut boundary);
            if area::distinct_vertex_count(&boundary) < 3
                || area::polygon_area(&boundary) <= f64::EPSILON
            {
                builder.warn(ParseWarning::DegenerateGeometry {
                    detail: format!("draw with D{code} collapsed; pad dropped"),
                });
                return Ok(());
            }

            let mut bounds = BoundingBox::new();
            for point in &boundary {
                bounds.update(*point);
            }
            let stroke_area = area::polygon_area(&boundary);
            let pad_id = builder.emit_pad(
                PadMeasurements {
                    shape: template.kind,
                    length: bounds.width().max(bounds.height()),
                    width: bounds.width().min(bounds.height()),
                    area: stroke_area,
                    position: target,
                },
                boundary,
                None,
            );
            let detail = if state.interpolation == InterpolationMode::Linear {
                "draw stroked as a capsule; not a full paste deposit model".to_string()
            } else {
                "arc draw chord-approximated and stroked as a capsule".to_string()
            };
            builder.warn(ParseWarning::ApproximatedGeometry { pad_id, detail });
        }
        None if template.kind == ShapeKind::Circle => {
            // Zero-length draw with a round pen degrades to a stamp.
            let radius = width / 2.0;
            let boundary = outline::circle(from, radius);
            let pad_id = builder.emit_pad(
                PadMeasurements {
                    shape: ShapeKind::Circle,
                    length: width,
                    width,
                    area: PI * radius * radius,
                    position: from,
                },
                boundary,
                None,
            );
            builder.warn(ParseWarning::ApproximatedGeometry {
                pad_id,
                detail: "zero-length draw stamped as a circle".to_string(),
            });
        }
        None => {
            builder.warn(ParseWarning::DegenerateGeometry {
                detail: format!("zero-length draw with non-circular aperture D{code} dropped"),
            });
        }
    }
    Ok(())
}
