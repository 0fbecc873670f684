//! Creature poses
//!
//! A [`Pose`] is the fully determined posture handed to a renderer: which way
//! the body and head face, an angle for every articulated joint, the facial
//! expression and whether the eyes are closed.
//!
//! Poses come from three places:
//! - [`string`]: the game's 15 character pose strings
//! - [`random`]: the constrained random pose generator
//! - [`token`]: the command-line pose descriptors that dispatch to the other two

pub mod mood;
pub mod random;
pub mod string;
pub mod tilt;
pub mod token;

use serde::Serialize;
use std::fmt;
use thiserror::Error;

use crate::variant::GameVariant;

pub use mood::{Mood, MoodArg, UnknownMood};
pub use random::{placeholder_pose, random_mood, random_pose};
pub use string::parse_pose_string;
pub use tilt::{PoseFacing, Tilt};
pub use token::{
    resolve_pose, resolve_poses, FacingConstraint, PoseOverrides, PoseSpec, PoseToken,
};

/// Error raised while reading or generating a pose.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PoseError {
    /// Pose string is not exactly 15 characters long
    #[error("Invalid pose string '{input}': expected 15 characters, found {found}")]
    InvalidLength { input: String, found: usize },
    /// A character is outside the range allowed at its position
    #[error("Invalid pose string '{input}': '{found}' at position {position} ({part}) must be {expected}")]
    InvalidCharacter {
        input: String,
        /// 1-based position in the pose string
        position: usize,
        part: &'static str,
        found: char,
        expected: &'static str,
    },
    /// Token is neither a pose string nor a known keyword
    #[error("Unrecognized pose '{0}': expected a 15 character pose string, left, right, front, back, random or eemfoo")]
    Unrecognized(String),
    /// The random pose generator reached a state it should not be able to reach
    #[error("Internal pose generator error: {0}")]
    Internal(&'static str),
}

/// An articulated joint, in pose string order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Joint {
    Head,
    Body,
    LeftThigh,
    LeftShin,
    LeftFoot,
    RightThigh,
    RightShin,
    RightFoot,
    LeftUpperArm,
    LeftForearm,
    RightUpperArm,
    RightForearm,
    TailBase,
    TailTip,
}

impl Joint {
    pub const ALL: [Joint; 14] = [
        Joint::Head,
        Joint::Body,
        Joint::LeftThigh,
        Joint::LeftShin,
        Joint::LeftFoot,
        Joint::RightThigh,
        Joint::RightShin,
        Joint::RightFoot,
        Joint::LeftUpperArm,
        Joint::LeftForearm,
        Joint::RightUpperArm,
        Joint::RightForearm,
        Joint::TailBase,
        Joint::TailTip,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Joint::Head => "head",
            Joint::Body => "body",
            Joint::LeftThigh => "left thigh",
            Joint::LeftShin => "left shin",
            Joint::LeftFoot => "left foot",
            Joint::RightThigh => "right thigh",
            Joint::RightShin => "right shin",
            Joint::RightFoot => "right foot",
            Joint::LeftUpperArm => "left upper arm",
            Joint::LeftForearm => "left forearm",
            Joint::RightUpperArm => "right upper arm",
            Joint::RightForearm => "right forearm",
            Joint::TailBase => "tail base",
            Joint::TailTip => "tail tip",
        }
    }

    /// Sprite part letter drawn for this joint, as used by `--ghost` and `--hidden`.
    pub fn part(self) -> char {
        match self {
            Joint::Head => 'a',
            Joint::Body => 'b',
            Joint::LeftThigh => 'c',
            Joint::LeftShin => 'd',
            Joint::LeftFoot => 'e',
            Joint::RightThigh => 'f',
            Joint::RightShin => 'g',
            Joint::RightFoot => 'h',
            Joint::LeftUpperArm => 'i',
            Joint::LeftForearm => 'j',
            Joint::RightUpperArm => 'k',
            Joint::RightForearm => 'l',
            Joint::TailBase => 'm',
            Joint::TailTip => 'n',
        }
    }
}

/// A fully determined creature pose.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Pose {
    pub variant: GameVariant,
    pub body_facing: PoseFacing,
    pub head_facing: PoseFacing,
    pub head: Tilt,
    pub body: Tilt,
    pub left_thigh: Tilt,
    pub left_shin: Tilt,
    pub left_foot: Tilt,
    pub right_thigh: Tilt,
    pub right_shin: Tilt,
    pub right_foot: Tilt,
    pub left_upper_arm: Tilt,
    pub left_forearm: Tilt,
    pub right_upper_arm: Tilt,
    pub right_forearm: Tilt,
    pub tail_base: Tilt,
    pub tail_tip: Tilt,
    pub mood: Mood,
    pub eyes_closed: bool,
    /// Leading two characters of the pose string this pose was parsed from.
    #[serde(skip)]
    pub(crate) facing_codes: Option<[char; 2]>,
}

impl Pose {
    /// Every joint straight, facing the viewer.
    pub fn neutral(variant: GameVariant) -> Pose {
        Pose {
            variant,
            body_facing: PoseFacing::Front,
            head_facing: PoseFacing::Front,
            head: Tilt::Straight,
            body: Tilt::Straight,
            left_thigh: Tilt::Straight,
            left_shin: Tilt::Straight,
            left_foot: Tilt::Straight,
            right_thigh: Tilt::Straight,
            right_shin: Tilt::Straight,
            right_foot: Tilt::Straight,
            left_upper_arm: Tilt::Straight,
            left_forearm: Tilt::Straight,
            right_upper_arm: Tilt::Straight,
            right_forearm: Tilt::Straight,
            tail_base: Tilt::Straight,
            tail_tip: Tilt::Straight,
            mood: Mood::Normal,
            eyes_closed: false,
            facing_codes: None,
        }
    }

    /// The standing pose a game uses when only a direction is requested.
    pub fn default_for(variant: GameVariant) -> Pose {
        parse_pose_string(variant, variant.default_pose_string())
            .unwrap_or_else(|_| Pose::neutral(variant))
    }

    /// Copy with head and body both turned to `facing`.
    pub fn facing(&self, facing: PoseFacing) -> Pose {
        Pose { body_facing: facing, head_facing: facing, facing_codes: None, ..self.clone() }
    }

    /// Copy with the explicitly supplied overrides applied.
    pub fn with_overrides(mut self, overrides: PoseOverrides) -> Pose {
        if let Some(mood) = overrides.mood {
            self.mood = mood;
        }
        if let Some(closed) = overrides.eyes_closed {
            self.eyes_closed = closed;
        }
        self
    }

    pub fn tilt(&self, joint: Joint) -> Tilt {
        match joint {
            Joint::Head => self.head,
            Joint::Body => self.body,
            Joint::LeftThigh => self.left_thigh,
            Joint::LeftShin => self.left_shin,
            Joint::LeftFoot => self.left_foot,
            Joint::RightThigh => self.right_thigh,
            Joint::RightShin => self.right_shin,
            Joint::RightFoot => self.right_foot,
            Joint::LeftUpperArm => self.left_upper_arm,
            Joint::LeftForearm => self.left_forearm,
            Joint::RightUpperArm => self.right_upper_arm,
            Joint::RightForearm => self.right_forearm,
            Joint::TailBase => self.tail_base,
            Joint::TailTip => self.tail_tip,
        }
    }

    pub(crate) fn tilt_mut(&mut self, joint: Joint) -> &mut Tilt {
        match joint {
            Joint::Head => &mut self.head,
            Joint::Body => &mut self.body,
            Joint::LeftThigh => &mut self.left_thigh,
            Joint::LeftShin => &mut self.left_shin,
            Joint::LeftFoot => &mut self.left_foot,
            Joint::RightThigh => &mut self.right_thigh,
            Joint::RightShin => &mut self.right_shin,
            Joint::RightFoot => &mut self.right_foot,
            Joint::LeftUpperArm => &mut self.left_upper_arm,
            Joint::LeftForearm => &mut self.left_forearm,
            Joint::RightUpperArm => &mut self.right_upper_arm,
            Joint::RightForearm => &mut self.right_forearm,
            Joint::TailBase => &mut self.tail_base,
            Joint::TailTip => &mut self.tail_tip,
        }
    }

    /// Serialize to the 15 character pose string.
    pub fn to_pose_string(&self) -> String {
        string::to_pose_string(self)
    }
}

impl fmt::Display for Pose {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_pose_string())
    }
}
