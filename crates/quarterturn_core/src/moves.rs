//! Face twists and their notation.

use std::f32::consts::{FRAC_PI_2, PI};
use std::fmt;
use std::str::FromStr;

use cgmath::Rad;
use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::{Face, MoveParseError};

/// Direction of a face twist, as seen from outside the face.
#[derive(Serialize, Deserialize, Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum TurnDirection {
    /// Quarter turn clockwise.
    Clockwise,
    /// Quarter turn counterclockwise.
    CounterClockwise,
    /// Half turn.
    Double,
}
impl TurnDirection {
    /// Returns the signed rotation angle around the face's outward normal.
    ///
    /// Positive angles are counterclockwise by the right-hand rule. Half turns
    /// go clockwise.
    pub fn angle(self) -> Rad<f32> {
        match self {
            TurnDirection::Clockwise => Rad(-FRAC_PI_2),
            TurnDirection::CounterClockwise => Rad(FRAC_PI_2),
            TurnDirection::Double => Rad(-PI),
        }
    }
    /// Returns the direction that undoes this one.
    #[must_use]
    pub fn rev(self) -> Self {
        match self {
            TurnDirection::Clockwise => TurnDirection::CounterClockwise,
            TurnDirection::CounterClockwise => TurnDirection::Clockwise,
            TurnDirection::Double => TurnDirection::Double,
        }
    }
    /// Returns the number of quarter turns.
    pub fn quarter_turns(self) -> u32 {
        match self {
            TurnDirection::Clockwise | TurnDirection::CounterClockwise => 1,
            TurnDirection::Double => 2,
        }
    }
    /// Returns the notation suffix.
    pub fn suffix(self) -> &'static str {
        match self {
            TurnDirection::Clockwise => "",
            TurnDirection::CounterClockwise => "'",
            TurnDirection::Double => "2",
        }
    }
}

/// Twist of a single face, such as `R'`.
#[derive(Serialize, Deserialize, Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct Move {
    /// Face to twist.
    pub face: Face,
    /// Direction to twist it.
    pub direction: TurnDirection,
}
impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.face.symbol(), self.direction.suffix())
    }
}
impl FromStr for Move {
    type Err = MoveParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.trim().chars();
        let c = chars.next().ok_or(MoveParseError::Empty)?;
        let face = Face::from_symbol(c).ok_or(MoveParseError::UnknownFace(c))?;
        let direction = match chars.as_str() {
            "" => TurnDirection::Clockwise,
            "'" => TurnDirection::CounterClockwise,
            "2" | "2'" => TurnDirection::Double,
            other => return Err(MoveParseError::BadSuffix(other.to_owned())),
        };
        Ok(Move { face, direction })
    }
}
impl Move {
    /// Constructs a move.
    pub const fn new(face: Face, direction: TurnDirection) -> Self {
        Self { face, direction }
    }
    /// Returns the move that undoes this one.
    #[must_use]
    pub fn rev(self) -> Self {
        Self {
            face: self.face,
            direction: self.direction.rev(),
        }
    }
}

/// Parses a whitespace-separated sequence of moves, such as `R U R' U'`.
pub fn parse_moves(s: &str) -> Result<Vec<Move>, MoveParseError> {
    s.split_whitespace().map(str::parse).collect()
}

/// Formats a sequence of moves separated by spaces.
pub fn format_moves<'a>(moves: impl IntoIterator<Item = &'a Move>) -> String {
    moves.into_iter().join(" ")
}
