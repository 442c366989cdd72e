mod lexer;
mod normalize;

pub use normalize::{parse_and_normalize, ParseOptions};

use std::fmt;
use std::str::FromStr;

use crate::error::{PathError, Result};
use crate::math::Point2;

/// Kind of a path command, independent of absolute/relative form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandKind {
    MoveTo,
    LineTo,
    Horizontal,
    Vertical,
    CubicTo,
    SmoothCubicTo,
    QuadTo,
    SmoothQuadTo,
    ArcTo,
    Close,
}

impl CommandKind {
    /// Maps a command letter (either case) to its kind.
    #[must_use]
    pub fn from_letter(letter: char) -> Option<Self> {
        let kind = match letter.to_ascii_uppercase() {
            'M' => Self::MoveTo,
            'L' => Self::LineTo,
            'H' => Self::Horizontal,
            'V' => Self::Vertical,
            'C' => Self::CubicTo,
            'S' => Self::SmoothCubicTo,
            'Q' => Self::QuadTo,
            'T' => Self::SmoothQuadTo,
            'A' => Self::ArcTo,
            'Z' => Self::Close,
            _ => return None,
        };
        Some(kind)
    }

    /// Returns the command letter, lower case for relative commands.
    #[must_use]
    pub fn letter(self, relative: bool) -> char {
        let upper = match self {
            Self::MoveTo => 'M',
            Self::LineTo => 'L',
            Self::Horizontal => 'H',
            Self::Vertical => 'V',
            Self::CubicTo => 'C',
            Self::SmoothCubicTo => 'S',
            Self::QuadTo => 'Q',
            Self::SmoothQuadTo => 'T',
            Self::ArcTo => 'A',
            Self::Close => 'Z',
        };
        if relative {
            upper.to_ascii_lowercase()
        } else {
            upper
        }
    }

    /// Number of values in one parameter tuple.
    #[must_use]
    pub fn arity(self) -> usize {
        match self {
            Self::Close => 0,
            Self::Horizontal | Self::Vertical => 1,
            Self::MoveTo | Self::LineTo | Self::SmoothQuadTo => 2,
            Self::QuadTo | Self::SmoothCubicTo => 4,
            Self::CubicTo => 6,
            Self::ArcTo => 7,
        }
    }

    /// Returns `true` for the shorthand kinds `H V S T`.
    #[must_use]
    pub fn is_shorthand(self) -> bool {
        matches!(
            self,
            Self::Horizontal | Self::Vertical | Self::SmoothCubicTo | Self::SmoothQuadTo
        )
    }
}

/// One path command with its parameter tuple.
///
/// `values.len()` equals [`CommandKind::arity`] for well-formed input; the
/// best-effort parser keeps short tuples as they are.
#[derive(Debug, Clone, PartialEq)]
pub struct Command {
    pub kind: CommandKind,
    pub relative: bool,
    pub values: Vec<f64>,
}

impl Command {
    /// Creates an absolute command.
    #[must_use]
    pub fn new(kind: CommandKind, values: Vec<f64>) -> Self {
        Self {
            kind,
            relative: false,
            values,
        }
    }

    /// Creates a relative command.
    #[must_use]
    pub fn relative(kind: CommandKind, values: Vec<f64>) -> Self {
        Self {
            kind,
            relative: true,
            values,
        }
    }

    /// Returns the command letter.
    #[must_use]
    pub fn letter(&self) -> char {
        self.kind.letter(self.relative)
    }

    /// End point of an absolute command drawn from `current`.
    ///
    /// `subpath_start` is where a close-path returns to. Tuples too short to
    /// name an end point leave the pen at `current`.
    #[must_use]
    pub fn end_point(&self, current: Point2, subpath_start: Point2) -> Point2 {
        let v = &self.values;
        match self.kind {
            CommandKind::Close => subpath_start,
            CommandKind::Horizontal => v.first().map_or(current, |&x| Point2::new(x, current.y)),
            CommandKind::Vertical => v.first().map_or(current, |&y| Point2::new(current.x, y)),
            _ if v.len() >= 2 => Point2::new(v[v.len() - 2], v[v.len() - 1]),
            _ => current,
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.letter())?;
        for (i, v) in self.values.iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            write!(f, "{v}")?;
        }
        Ok(())
    }
}

/// A parsed path: an ordered command sequence starting with an absolute
/// move-to.
///
/// Produced once by [`parse_and_normalize`] and not mutated afterwards.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PathData {
    pub commands: Vec<Command>,
}

impl PathData {
    /// Wraps an already-built command sequence.
    #[must_use]
    pub fn new(commands: Vec<Command>) -> Self {
        Self { commands }
    }

    /// Number of commands.
    #[must_use]
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    /// Returns `true` if there are no commands.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Iterates over the commands.
    pub fn iter(&self) -> std::slice::Iter<'_, Command> {
        self.commands.iter()
    }

    /// Command letters in order, e.g. `"MLCZ"`.
    #[must_use]
    pub fn letters(&self) -> String {
        self.commands.iter().map(Command::letter).collect()
    }

    /// Runs the normalizer over this command sequence again.
    ///
    /// Normalizing already-normalized data returns an identical sequence.
    ///
    /// # Errors
    ///
    /// Returns an error if the sequence is empty or does not start with a
    /// move-to.
    pub fn normalize(&self, options: &ParseOptions) -> Result<Self> {
        normalize::normalize_commands(self.commands.clone(), options)
    }
}

impl<'a> IntoIterator for &'a PathData {
    type Item = &'a Command;
    type IntoIter = std::slice::Iter<'a, Command>;

    fn into_iter(self) -> Self::IntoIter {
        self.commands.iter()
    }
}

impl fmt::Display for PathData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, command) in self.commands.iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            write!(f, "{command}")?;
        }
        Ok(())
    }
}

impl FromStr for PathData {
    type Err = PathError;

    /// Parses with [`ParseOptions::default`].
    fn from_str(s: &str) -> Result<Self> {
        parse_and_normalize(s, &ParseOptions::default())
    }
}
