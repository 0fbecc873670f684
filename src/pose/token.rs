//! Command-line pose descriptors
//!
//! Each `--pose` value is classified into a [`PoseToken`] and then resolved
//! into a [`PoseSpec`]. Recognized shapes, first match wins:
//!
//! 1. `eemfoo`: a canned pose picked once age and gender are known
//! 2. `rand`, `random`, `random(left)`, `rand-23`, ...: a random pose,
//!    optionally pinned to a direction
//! 3. `left`, `right`, `front`, `back` and short forms: the game's default
//!    pose turned to face that way
//! 4. A 15 character pose string, optionally followed by `:`, `,`, `-` or `=`
//!    and a file name for that pose's image

use rand::Rng;
use regex::Regex;
use std::sync::OnceLock;

use super::string::{is_facing_code, POSE_STRING_LENGTH};
use super::{parse_pose_string, placeholder_pose, random_pose, Mood, Pose, PoseError, PoseFacing};
use crate::breed::Gender;
use crate::variant::GameVariant;

/// Keyword that asks for a canned pose.
pub const PLACEHOLDER_KEYWORD: &str = "eemfoo";

/// Compile a pattern once and keep it for the life of the process.
fn cached(cell: &'static OnceLock<Regex>, pattern: &str) -> Result<&'static Regex, PoseError> {
    if let Some(regex) = cell.get() {
        return Ok(regex);
    }
    let regex = Regex::new(pattern).map_err(|_| PoseError::Internal("invalid pose token pattern"))?;
    Ok(cell.get_or_init(|| regex))
}

fn random_directive() -> Result<&'static Regex, PoseError> {
    static RANDOM: OnceLock<Regex> = OnceLock::new();
    // The qualifier opens with one of `(`..=`:` or `=` and needs a character after it,
    // so `rand-2` and `random(l)` qualify but `rand2` does not
    cached(&RANDOM, r"(?i)^rand(?:om)?([(-:=].+)?$")
}

fn pose_with_file_name() -> Result<&'static Regex, PoseError> {
    static NAMED: OnceLock<Regex> = OnceLock::new();
    cached(&NAMED, r"^([0-5Xx!?]{15})[:,\-=](.*)$")
}

/// Direction a random pose is pinned to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FacingConstraint {
    Exactly(PoseFacing),
    /// Coin flip between the two directions
    Either(PoseFacing, PoseFacing),
}

impl FacingConstraint {
    /// Look up a direction qualifier such as `(left)`, `-east` or `23`.
    ///
    /// Unknown qualifiers give `None`, leaving the pose unconstrained.
    pub fn from_qualifier(qualifier: &str) -> Option<FacingConstraint> {
        use PoseFacing::*;

        let key: String = qualifier
            .to_ascii_lowercase()
            .chars()
            .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit())
            .collect();
        let constraint = match key.as_str() {
            "left" | "l" | "west" | "3" => FacingConstraint::Exactly(ViewerLeft),
            "right" | "r" | "east" | "2" => FacingConstraint::Exactly(ViewerRight),
            "front" | "forward" | "f" | "south" | "1" => FacingConstraint::Exactly(Front),
            "back" | "away" | "north" | "0" => FacingConstraint::Exactly(Back),
            "leftright" | "rightleft" | "leftorright" | "rightorleft" | "rl" | "lr"
            | "eastwest" | "westeast" | "23" | "32" => FacingConstraint::Either(ViewerLeft, ViewerRight),
            "frontback" | "backfront" | "frontorback" | "backorfront" | "bf" | "fb"
            | "southnorth" | "northsouth" | "southornorth" | "northorsouth" | "01" | "10" => {
                FacingConstraint::Either(Front, Back)
            }
            _ => return None,
        };
        Some(constraint)
    }

    pub fn pick<R: Rng + ?Sized>(self, rng: &mut R) -> PoseFacing {
        match self {
            FacingConstraint::Exactly(facing) => facing,
            FacingConstraint::Either(first, second) => {
                if rng.gen_bool(0.5) {
                    first
                } else {
                    second
                }
            }
        }
    }
}

/// A classified `--pose` value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PoseToken {
    Placeholder,
    Random(Option<FacingConstraint>),
    Symbolic(PoseFacing),
    Literal { pose_string: String, file_name: Option<String> },
}

fn strip_surrounding_quotes(s: &str) -> &str {
    for quote in ['"', '\''] {
        if s.len() >= 2 && s.starts_with(quote) && s.ends_with(quote) {
            return &s[1..s.len() - 1];
        }
    }
    s
}

fn symbolic_facing(token: &str) -> Option<PoseFacing> {
    match token.to_ascii_lowercase().as_str() {
        "left" | "l" => Some(PoseFacing::ViewerLeft),
        "right" | "r" => Some(PoseFacing::ViewerRight),
        "front" | "f" | "forward" => Some(PoseFacing::Front),
        "back" | "b" | "backwards" | "away" | "a" => Some(PoseFacing::Back),
        _ => None,
    }
}

impl PoseToken {
    /// Classify a raw `--pose` value.
    ///
    /// Anything that is not a keyword is treated as a pose string if it is 15
    /// characters long or made only of pose string characters, so a typo in a
    /// pose string reports what is wrong with it. Other text is rejected as
    /// unrecognized.
    pub fn classify(raw: &str) -> Result<PoseToken, PoseError> {
        let token = strip_surrounding_quotes(raw.trim());

        if token.eq_ignore_ascii_case(PLACEHOLDER_KEYWORD) {
            return Ok(PoseToken::Placeholder);
        }

        if let Some(captures) = random_directive()?.captures(token) {
            let constraint =
                captures.get(1).and_then(|q| FacingConstraint::from_qualifier(q.as_str()));
            return Ok(PoseToken::Random(constraint));
        }

        if let Some(facing) = symbolic_facing(token) {
            return Ok(PoseToken::Symbolic(facing));
        }

        if let Some(captures) = pose_with_file_name()?.captures(token) {
            let file_name =
                captures.get(2).map(|m| m.as_str().to_string()).filter(|name| !name.is_empty());
            return Ok(PoseToken::Literal { pose_string: captures[1].to_string(), file_name });
        }

        if token.chars().count() == POSE_STRING_LENGTH || token.chars().all(is_facing_code) {
            return Ok(PoseToken::Literal { pose_string: token.to_string(), file_name: None });
        }

        Err(PoseError::Unrecognized(raw.to_string()))
    }

    pub fn is_random(&self) -> bool {
        matches!(self, PoseToken::Random(_))
    }
}

/// Mood and eyes-closed values supplied by the caller.
///
/// `None` keeps whatever the pose source produced.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PoseOverrides {
    pub mood: Option<Mood>,
    pub eyes_closed: Option<bool>,
}

/// A resolved pose request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PoseSpec {
    Concrete { pose: Pose, file_name: Option<String> },
    /// Stands in for a canned pose until age and gender are known
    Placeholder { pose: Pose, overrides: PoseOverrides },
}

impl PoseSpec {
    /// The pose as resolved so far.
    pub fn pose(&self) -> &Pose {
        match self {
            PoseSpec::Concrete { pose, .. } | PoseSpec::Placeholder { pose, .. } => pose,
        }
    }

    pub fn file_name(&self) -> Option<&str> {
        match self {
            PoseSpec::Concrete { file_name, .. } => file_name.as_deref(),
            PoseSpec::Placeholder { .. } => None,
        }
    }

    pub fn is_placeholder(&self) -> bool {
        matches!(self, PoseSpec::Placeholder { .. })
    }

    /// Replace a placeholder with its canned pose. Concrete specs pass through.
    pub fn finalize<R: Rng + ?Sized>(
        self,
        gender: Gender,
        age: u8,
        rng: &mut R,
    ) -> Result<(Pose, Option<String>), PoseError> {
        match self {
            PoseSpec::Concrete { pose, file_name } => Ok((pose, file_name)),
            PoseSpec::Placeholder { pose, overrides } => {
                let canned = placeholder_pose(pose.variant, gender, age, rng)?;
                Ok((canned.with_overrides(overrides), None))
            }
        }
    }
}

/// Resolve a classified token into a pose.
pub fn resolve_token<R: Rng + ?Sized>(
    variant: GameVariant,
    token: &PoseToken,
    overrides: PoseOverrides,
    rng: &mut R,
) -> Result<PoseSpec, PoseError> {
    let spec = match token {
        PoseToken::Placeholder => PoseSpec::Placeholder {
            pose: Pose::default_for(variant).with_overrides(overrides),
            overrides,
        },
        PoseToken::Random(constraint) => {
            let facing = constraint.map(|c| c.pick(rng));
            let pose = random_pose(variant, facing, rng)?;
            PoseSpec::Concrete { pose: pose.with_overrides(overrides), file_name: None }
        }
        PoseToken::Symbolic(facing) => PoseSpec::Concrete {
            pose: Pose::default_for(variant).facing(*facing).with_overrides(overrides),
            file_name: None,
        },
        PoseToken::Literal { pose_string, file_name } => PoseSpec::Concrete {
            pose: parse_pose_string(variant, pose_string)?.with_overrides(overrides),
            file_name: file_name.clone(),
        },
    };
    Ok(spec)
}

/// Classify and resolve a single raw `--pose` value.
///
/// # Examples
///
/// ```
/// use creature_render::pose::{resolve_pose, PoseFacing, PoseOverrides};
/// use creature_render::variant::GameVariant;
///
/// let mut rng = rand::thread_rng();
/// let spec = resolve_pose(GameVariant::C3, "left", PoseOverrides::default(), &mut rng).unwrap();
/// assert_eq!(spec.pose().body_facing, PoseFacing::ViewerLeft);
///
/// let spec = resolve_pose(GameVariant::C1, "140000000000000:front", PoseOverrides::default(), &mut rng).unwrap();
/// assert_eq!(spec.file_name(), Some("front"));
/// ```
pub fn resolve_pose<R: Rng + ?Sized>(
    variant: GameVariant,
    raw: &str,
    overrides: PoseOverrides,
    rng: &mut R,
) -> Result<PoseSpec, PoseError> {
    let token = PoseToken::classify(raw)?;
    resolve_token(variant, &token, overrides, rng)
}

/// Resolve every raw `--pose` value, keeping their order.
pub fn resolve_poses<R: Rng + ?Sized, S: AsRef<str>>(
    variant: GameVariant,
    raws: &[S],
    overrides: PoseOverrides,
    rng: &mut R,
) -> Result<Vec<PoseSpec>, PoseError> {
    raws.iter().map(|raw| resolve_pose(variant, raw.as_ref(), overrides, rng)).collect()
}
