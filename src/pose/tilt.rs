//! Joint angle and facing primitives

use serde::{Deserialize, Serialize};

/// A single joint's angular position.
///
/// Pose strings store one digit per joint, `'0'` being the lowest position
/// and `'3'` the highest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tilt {
    FarUp,
    Up,
    Straight,
    Down,
}

impl Tilt {
    pub const ALL: [Tilt; 4] = [Tilt::FarUp, Tilt::Up, Tilt::Straight, Tilt::Down];

    /// Parse a pose string digit. Returns `None` outside `'0'..='3'`.
    pub fn from_char(c: char) -> Option<Tilt> {
        match c {
            '0' => Some(Tilt::Down),
            '1' => Some(Tilt::Straight),
            '2' => Some(Tilt::Up),
            '3' => Some(Tilt::FarUp),
            _ => None,
        }
    }

    /// Tilt for a digit offset, as used by the random sampler (`from_digit(0)` is `'0'`).
    pub fn from_digit(digit: u32) -> Option<Tilt> {
        char::from_digit(digit, 10).and_then(Tilt::from_char)
    }

    pub fn to_char(self) -> char {
        match self {
            Tilt::Down => '0',
            Tilt::Straight => '1',
            Tilt::Up => '2',
            Tilt::FarUp => '3',
        }
    }
}

/// Coarse orientation of the head or body relative to the viewer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PoseFacing {
    Front,
    Back,
    ViewerLeft,
    ViewerRight,
}

impl PoseFacing {
    pub const ALL: [PoseFacing; 4] =
        [PoseFacing::Front, PoseFacing::Back, PoseFacing::ViewerLeft, PoseFacing::ViewerRight];

    /// Parse a direction digit. Returns `None` outside `'0'..='3'`.
    pub fn from_char(c: char) -> Option<PoseFacing> {
        match c {
            '0' => Some(PoseFacing::Back),
            '1' => Some(PoseFacing::Front),
            '2' => Some(PoseFacing::ViewerRight),
            '3' => Some(PoseFacing::ViewerLeft),
            _ => None,
        }
    }

    pub fn to_char(self) -> char {
        match self {
            PoseFacing::Back => '0',
            PoseFacing::Front => '1',
            PoseFacing::ViewerRight => '2',
            PoseFacing::ViewerLeft => '3',
        }
    }

    /// True for the two profile directions.
    pub fn is_side(self) -> bool {
        matches!(self, PoseFacing::ViewerLeft | PoseFacing::ViewerRight)
    }
}
