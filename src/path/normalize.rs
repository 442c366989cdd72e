use tracing::{debug, trace};

use super::lexer::{split_arc_flags, tokenize};
use super::{Command, CommandKind, PathData};
use crate::error::{ParseError, Result};
use crate::math::arc_2d::{arc_to_cubics, MAX_ARC_ACCURACY};
use crate::math::Point2;

/// Options controlling how far a path is normalized.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseOptions {
    /// Convert relative commands to absolute ones.
    pub to_absolute: bool,
    /// Expand `H V S T` into `L C Q`.
    pub to_longhands: bool,
    /// Convert circular arcs to cubics. Elliptical arcs are always converted.
    pub arc_to_cubic: bool,
    /// Cubic pieces per started 90° of arc sweep, `1..=MAX_ARC_ACCURACY`.
    pub arc_accuracy: u32,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            to_absolute: true,
            to_longhands: true,
            arc_to_cubic: true,
            arc_accuracy: 1,
        }
    }
}

/// Control point a following `S`/`T` may reflect.
#[derive(Debug, Clone, Copy)]
enum PrevControl {
    None,
    Cubic(Point2),
    Quad(Point2),
}

/// Parses a path description string and normalizes it.
///
/// With default options the result holds only absolute `M L C Q Z`
/// commands. Parsing is best-effort: short parameter tuples are kept as
/// they are and surplus values after `Z` are dropped.
///
/// # Errors
///
/// - [`ParseError::Empty`] if `d` contains no command letter
/// - [`ParseError::MissingMoveTo`] if the first command is not a move-to
/// - [`ParseError::InvalidNumber`] for a token that is not a finite number
/// - [`ParseError::InvalidOption`] for `arc_accuracy` outside `1..=MAX_ARC_ACCURACY`
pub fn parse_and_normalize(d: &str, options: &ParseOptions) -> Result<PathData> {
    let commands = read_commands(d)?;
    normalize_commands(commands, options)
}

/// Converts command chunks into commands, splitting implicit repetitions.
fn read_commands(d: &str) -> Result<Vec<Command>> {
    let mut commands = Vec::new();
    for chunk in tokenize(d) {
        let Some(kind) = CommandKind::from_letter(chunk.letter) else {
            continue;
        };
        let relative = chunk.letter.is_ascii_lowercase();

        let tokens = if kind == CommandKind::ArcTo {
            split_arc_flags(&chunk.tokens)
        } else {
            chunk.tokens
        };
        let values = tokens
            .iter()
            .map(|token| parse_number(token, chunk.letter))
            .collect::<std::result::Result<Vec<f64>, ParseError>>()?;

        let arity = kind.arity();
        if arity == 0 || values.len() <= arity {
            if arity == 0 && !values.is_empty() {
                trace!(command = %chunk.letter, dropped = values.len(), "values after close-path ignored");
            }
            let values = if arity == 0 { Vec::new() } else { values };
            commands.push(Command {
                kind,
                relative,
                values,
            });
            continue;
        }

        // Surplus tuples repeat the command; after a move-to they are line-tos.
        let repeat_kind = if kind == CommandKind::MoveTo {
            CommandKind::LineTo
        } else {
            kind
        };
        for (i, tuple) in values.chunks(arity).enumerate() {
            commands.push(Command {
                kind: if i == 0 { kind } else { repeat_kind },
                relative,
                values: tuple.to_vec(),
            });
        }
    }
    Ok(commands)
}

fn parse_number(token: &str, command: char) -> std::result::Result<f64, ParseError> {
    match token.parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v),
        _ => Err(ParseError::InvalidNumber {
            token: token.to_owned(),
            command,
        }),
    }
}

/// Normalizes an already-tokenized command sequence.
pub(super) fn normalize_commands(mut commands: Vec<Command>, options: &ParseOptions) -> Result<PathData> {
    if !(1..=MAX_ARC_ACCURACY).contains(&options.arc_accuracy) {
        return Err(ParseError::InvalidOption(format!(
            "arc_accuracy must be in 1..={MAX_ARC_ACCURACY}, got {}",
            options.arc_accuracy
        ))
        .into());
    }
    let first = commands.first().ok_or(ParseError::Empty)?;
    if first.kind != CommandKind::MoveTo {
        return Err(ParseError::MissingMoveTo(first.letter()).into());
    }

    let has_relative = commands.iter().skip(1).any(|c| c.relative);
    let has_shorthands = commands.iter().any(|c| c.kind.is_shorthand());
    let has_arcs = commands.iter().any(|c| c.kind == CommandKind::ArcTo);

    let needs_conversion = (options.to_absolute && has_relative)
        || (options.to_longhands && has_shorthands)
        || has_arcs;
    if !needs_conversion {
        commands[0].relative = false;
        return Ok(PathData::new(commands));
    }

    let mut out = Vec::with_capacity(commands.len());
    let mut current = Point2::origin();
    let mut subpath_start = Point2::origin();
    let mut prev_control = PrevControl::None;

    for (i, command) in commands.into_iter().enumerate() {
        let kind = command.kind;
        let values = if command.relative && i > 0 {
            to_absolute(kind, &command.values, current)
        } else {
            command.values
        };
        let absolute = Command::new(kind, values);
        let end = absolute.end_point(current, subpath_start);
        let values = absolute.values;
        trace!(index = i, letter = %kind.letter(command.relative), "normalizing command");

        match kind {
            CommandKind::MoveTo => {
                out.push(Command::new(kind, values));
                subpath_start = end;
                prev_control = PrevControl::None;
            }
            CommandKind::LineTo | CommandKind::Close => {
                out.push(Command::new(kind, values));
                prev_control = PrevControl::None;
            }
            CommandKind::Horizontal | CommandKind::Vertical => {
                if options.to_longhands && !values.is_empty() {
                    out.push(Command::new(CommandKind::LineTo, vec![end.x, end.y]));
                } else {
                    out.push(Command::new(kind, values));
                }
                prev_control = PrevControl::None;
            }
            CommandKind::CubicTo => {
                prev_control = point_at(&values, 2).map_or(PrevControl::None, PrevControl::Cubic);
                out.push(Command::new(kind, values));
            }
            CommandKind::SmoothCubicTo => {
                let reflected = match prev_control {
                    PrevControl::Cubic(cp) => reflect(cp, current),
                    _ => current,
                };
                prev_control = point_at(&values, 0).map_or(PrevControl::None, PrevControl::Cubic);
                if options.to_longhands {
                    let mut expanded = vec![reflected.x, reflected.y];
                    expanded.extend_from_slice(&values);
                    out.push(Command::new(CommandKind::CubicTo, expanded));
                } else {
                    out.push(Command::new(kind, values));
                }
            }
            CommandKind::QuadTo => {
                prev_control = point_at(&values, 0).map_or(PrevControl::None, PrevControl::Quad);
                out.push(Command::new(kind, values));
            }
            CommandKind::SmoothQuadTo => {
                let reflected = match prev_control {
                    PrevControl::Quad(cp) => reflect(cp, current),
                    _ => current,
                };
                prev_control = PrevControl::Quad(reflected);
                if options.to_longhands {
                    let mut expanded = vec![reflected.x, reflected.y];
                    expanded.extend_from_slice(&values);
                    out.push(Command::new(CommandKind::QuadTo, expanded));
                } else {
                    out.push(Command::new(kind, values));
                }
            }
            CommandKind::ArcTo => {
                push_arc(&mut out, current, end, values, options);
                prev_control = PrevControl::None;
            }
        }
        current = end;
    }

    if let Some(first) = out.first_mut() {
        first.kind = CommandKind::MoveTo;
        first.relative = false;
    }
    debug!(commands = out.len(), "normalized path data");
    Ok(PathData::new(out))
}

/// Offsets a relative tuple by the current point.
fn to_absolute(kind: CommandKind, values: &[f64], current: Point2) -> Vec<f64> {
    match kind {
        CommandKind::Close => Vec::new(),
        CommandKind::Horizontal => values.iter().map(|v| v + current.x).collect(),
        CommandKind::Vertical => values.iter().map(|v| v + current.y).collect(),
        CommandKind::ArcTo => values
            .iter()
            .enumerate()
            .map(|(i, v)| match i {
                5 => v + current.x,
                6 => v + current.y,
                _ => *v,
            })
            .collect(),
        _ => values
            .iter()
            .enumerate()
            .map(|(i, v)| if i % 2 == 0 { v + current.x } else { v + current.y })
            .collect(),
    }
}

/// Emits an absolute arc as cubics, or as `A` when it stays circular.
fn push_arc(out: &mut Vec<Command>, current: Point2, end: Point2, values: Vec<f64>, options: &ParseOptions) {
    let &[rx, ry, rotation, large_arc, sweep, _, _] = values.as_slice() else {
        out.push(Command::new(CommandKind::ArcTo, values));
        return;
    };

    #[allow(clippy::float_cmp)]
    let elliptic = rx != ry;
    if !(elliptic || options.arc_to_cubic) {
        out.push(Command::new(CommandKind::ArcTo, values));
        return;
    }

    let pieces = arc_to_cubics(
        current,
        end,
        rx,
        ry,
        rotation,
        large_arc != 0.0,
        sweep != 0.0,
        options.arc_accuracy,
    );
    if pieces.is_empty() {
        trace!(rx, ry, "degenerate arc dropped");
    }
    for [c1, c2, p] in pieces {
        out.push(Command::new(
            CommandKind::CubicTo,
            vec![c1.x, c1.y, c2.x, c2.y, p.x, p.y],
        ));
    }
}

fn point_at(values: &[f64], index: usize) -> Option<Point2> {
    Some(Point2::new(*values.get(index)?, *values.get(index + 1)?))
}

/// Reflects `control` through `about`.
fn reflect(control: Point2, about: Point2) -> Point2 {
    Point2::new(2.0 * about.x - control.x, 2.0 * about.y - control.y)
}
