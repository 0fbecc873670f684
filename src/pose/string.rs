//! Pose string parsing and serialization
//!
//! A pose string is exactly 15 characters:
//!
//! | Position | Meaning |
//! |----------|---------|
//! | 1 | Body direction: `0` back, `1` front, `2` viewer right, `3` viewer left |
//! | 2 | Head: `0`-`3` tilt (head follows the body), `4` turned to front, `5` turned away |
//! | 3 | Body tilt |
//! | 4-9 | Left thigh, shin, foot, then right thigh, shin, foot |
//! | 10-13 | Left upper arm, forearm, then right upper arm, forearm |
//! | 14-15 | Tail base, tail tip |
//!
//! Joint positions take `0` (down) through `3` (far up).
//!
//! The first two positions also accept the game's legacy codes: `?` (toward
//! the object of attention, same as `4`), `!` (away from it, same as `5`) and
//! `X`/`x` (keep the current direction). With nothing to attend to and no
//! previous pose, toward renders as front, away as back, and unchanged as the
//! front-facing default. The original characters are kept so the string
//! serializes back unchanged.

use super::{Joint, Mood, Pose, PoseError, PoseFacing, Tilt};
use crate::variant::GameVariant;

/// Length of every pose string.
pub const POSE_STRING_LENGTH: usize = 15;

const FACING_EXPECTED: &str = "0-5, X, x, ! or ?";
const TILT_EXPECTED: &str = "0-3";

/// Joints stored at positions 3 through 15.
const BODY_JOINTS: [Joint; 13] = [
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

/// True for characters allowed in the two facing positions.
pub fn is_facing_code(c: char) -> bool {
    matches!(c, '0'..='5' | 'X' | 'x' | '!' | '?')
}

fn body_direction(code: char) -> Option<PoseFacing> {
    match code {
        '4' | '?' | 'X' | 'x' => Some(PoseFacing::Front),
        '5' | '!' => Some(PoseFacing::Back),
        _ => PoseFacing::from_char(code),
    }
}

fn head_direction(code: char, body_facing: PoseFacing) -> Option<(PoseFacing, Tilt)> {
    match code {
        '4' | '?' => Some((PoseFacing::Front, Tilt::Straight)),
        '5' | '!' => Some((PoseFacing::Back, Tilt::Straight)),
        'X' | 'x' => Some((body_facing, Tilt::Straight)),
        _ => Tilt::from_char(code).map(|tilt| (body_facing, tilt)),
    }
}

/// Decode the two leading characters into body facing, head facing and head tilt.
fn decode_facing(codes: [char; 2]) -> Option<(PoseFacing, PoseFacing, Tilt)> {
    let body = body_direction(codes[0])?;
    let (head, tilt) = head_direction(codes[1], body)?;
    Some((body, head, tilt))
}

/// Closest pair of leading characters for a pose built in code.
fn encode_facing(pose: &Pose) -> [char; 2] {
    let head = if pose.head_facing == pose.body_facing {
        pose.head.to_char()
    } else {
        match pose.head_facing {
            PoseFacing::Front => '4',
            PoseFacing::Back => '5',
            // A sideways head on a body facing another way has no code
            _ => pose.head.to_char(),
        }
    };
    [pose.body_facing.to_char(), head]
}

/// Parse a 15 character pose string.
///
/// Mood is set to normal and the eyes are open; callers layer overrides on top.
///
/// # Examples
///
/// ```
/// use creature_render::pose::{parse_pose_string, PoseFacing, Tilt};
/// use creature_render::variant::GameVariant;
///
/// let pose = parse_pose_string(GameVariant::C3, "313122122111111").unwrap();
/// assert_eq!(pose.body_facing, PoseFacing::ViewerLeft);
/// assert_eq!(pose.body, Tilt::FarUp);
/// assert_eq!(pose.to_pose_string(), "313122122111111");
/// ```
pub fn parse_pose_string(variant: GameVariant, input: &str) -> Result<Pose, PoseError> {
    let chars: Vec<char> = input.chars().collect();
    if chars.len() != POSE_STRING_LENGTH {
        return Err(PoseError::InvalidLength { input: input.to_string(), found: chars.len() });
    }

    let invalid = |position: usize, part: &'static str, expected: &'static str| {
        PoseError::InvalidCharacter {
            input: input.to_string(),
            position: position + 1,
            part,
            found: chars[position],
            expected,
        }
    };

    let body_facing =
        body_direction(chars[0]).ok_or_else(|| invalid(0, "body direction", FACING_EXPECTED))?;
    let (head_facing, head) = head_direction(chars[1], body_facing)
        .ok_or_else(|| invalid(1, Joint::Head.name(), FACING_EXPECTED))?;

    let mut pose = Pose {
        variant,
        body_facing,
        head_facing,
        head,
        mood: Mood::Normal,
        eyes_closed: false,
        facing_codes: Some([chars[0], chars[1]]),
        ..Pose::neutral(variant)
    };

    for (offset, joint) in BODY_JOINTS.iter().enumerate() {
        let position = offset + 2;
        let tilt = Tilt::from_char(chars[position])
            .ok_or_else(|| invalid(position, joint.name(), TILT_EXPECTED))?;
        *pose.tilt_mut(*joint) = tilt;
    }

    Ok(pose)
}

/// Serialize a pose to its 15 character pose string.
///
/// Poses parsed from a string keep their original leading characters as
/// long as the facing they describe is unchanged.
pub(crate) fn to_pose_string(pose: &Pose) -> String {
    let codes = pose
        .facing_codes
        .filter(|codes| {
            decode_facing(*codes) == Some((pose.body_facing, pose.head_facing, pose.head))
        })
        .unwrap_or_else(|| encode_facing(pose));

    let mut out = String::with_capacity(POSE_STRING_LENGTH);
    out.push(codes[0]);
    out.push(codes[1]);
    for joint in BODY_JOINTS {
        out.push(pose.tilt(joint).to_char());
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(s: &str) -> Result<Pose, PoseError> {
        parse_pose_string(GameVariant::C3, s)
    }

    #[test]
    fn test_parse_default_front_pose() {
        let pose = parse("113122122111111").unwrap();
        assert_eq!(pose.body_facing, PoseFacing::Front);
        assert_eq!(pose.head_facing, PoseFacing::Front);
        assert_eq!(pose.head, Tilt::Straight);
        assert_eq!(pose.body, Tilt::FarUp);
        assert_eq!(pose.left_thigh, Tilt::Straight);
        assert_eq!(pose.left_shin, Tilt::Up);
        assert_eq!(pose.right_foot, Tilt::Up);
        assert_eq!(pose.tail_tip, Tilt::Straight);
    }

    #[test]
    fn test_parse_joint_order() {
        let pose = parse("100123012301230").unwrap();
        assert_eq!(pose.body, Tilt::Down);
        assert_eq!(pose.left_thigh, Tilt::Straight);
        assert_eq!(pose.left_shin, Tilt::Up);
        assert_eq!(pose.left_foot, Tilt::FarUp);
        assert_eq!(pose.right_thigh, Tilt::Down);
        assert_eq!(pose.right_shin, Tilt::Straight);
        assert_eq!(pose.right_foot, Tilt::Up);
        assert_eq!(pose.left_upper_arm, Tilt::FarUp);
        assert_eq!(pose.left_forearm, Tilt::Down);
        assert_eq!(pose.right_upper_arm, Tilt::Straight);
        assert_eq!(pose.right_forearm, Tilt::Up);
        assert_eq!(pose.tail_base, Tilt::FarUp);
        assert_eq!(pose.tail_tip, Tilt::Down);
    }

    #[test]
    fn test_head_turn_codes() {
        let toward = parse("243322100210311").unwrap();
        assert_eq!(toward.body_facing, PoseFacing::ViewerRight);
        assert_eq!(toward.head_facing, PoseFacing::Front);

        let away = parse("353322100210311").unwrap();
        assert_eq!(away.body_facing, PoseFacing::ViewerLeft);
        assert_eq!(away.head_facing, PoseFacing::Back);
    }

    #[test]
    fn test_legacy_codes() {
        let pose = parse("?!0000000000000").unwrap();
        assert_eq!(pose.body_facing, PoseFacing::Front);
        assert_eq!(pose.head_facing, PoseFacing::Back);

        let pose = parse("Xx0000000000000").unwrap();
        assert_eq!(pose.body_facing, PoseFacing::Front);
        assert_eq!(pose.head_facing, PoseFacing::Front);

        let pose = parse("!30000000000000").unwrap();
        assert_eq!(pose.body_facing, PoseFacing::Back);
        assert_eq!(pose.head, Tilt::FarUp);
    }

    #[test]
    fn test_round_trip_is_exact() {
        let samples = [
            "140000000000000",
            "113122122111111",
            "323322111013311",
            "243322100210311",
            "Xx0123012301230",
            "?!3333333333333",
            "!?0000000000000",
            "x43210321032103",
            "551111111111111",
            "4X2222222222222",
        ];
        for s in samples {
            assert_eq!(parse(s).unwrap().to_pose_string(), s);
        }
    }

    #[test]
    fn test_round_trip_every_facing_code_pair() {
        let codes = ['0', '1', '2', '3', '4', '5', 'X', 'x', '!', '?'];
        for a in codes {
            for b in codes {
                let s = format!("{}{}0123012301230", a, b);
                assert_eq!(parse(&s).unwrap().to_pose_string(), s);
            }
        }
    }

    #[test]
    fn test_rejects_short_string() {
        assert_eq!(
            parse("14000000000000"),
            Err(PoseError::InvalidLength { input: "14000000000000".to_string(), found: 14 })
        );
    }

    #[test]
    fn test_rejects_long_string() {
        assert!(matches!(
            parse("1400000000000000"),
            Err(PoseError::InvalidLength { found: 16, .. })
        ));
    }

    #[test]
    fn test_rejects_out_of_range_joint() {
        match parse("114000000000000") {
            Err(PoseError::InvalidCharacter { position, part, found, expected, .. }) => {
                assert_eq!(position, 3);
                assert_eq!(part, "body");
                assert_eq!(found, '4');
                assert_eq!(expected, "0-3");
            }
            other => panic!("expected invalid character, got {:?}", other),
        }
    }

    #[test]
    fn test_rejects_bad_facing_code() {
        match parse("7?0000000000000") {
            Err(PoseError::InvalidCharacter { position, found, .. }) => {
                assert_eq!(position, 1);
                assert_eq!(found, '7');
            }
            other => panic!("expected invalid character, got {:?}", other),
        }
        assert!(matches!(
            parse("1a0000000000000"),
            Err(PoseError::InvalidCharacter { position: 2, .. })
        ));
    }

    #[test]
    fn test_rejects_special_code_in_joint_position() {
        assert!(matches!(
            parse("11000000000000X"),
            Err(PoseError::InvalidCharacter { position: 15, part: "tail tip", .. })
        ));
    }

    #[test]
    fn test_error_message_names_position() {
        let err = parse("110000009000000").unwrap_err();
        let message = err.to_string();
        assert!(message.contains("position 9"), "{}", message);
        assert!(message.contains("right foot"), "{}", message);
    }

    #[test]
    fn test_edited_facing_drops_stale_codes() {
        let pose = parse("?40000000000000").unwrap();
        let turned = pose.facing(PoseFacing::ViewerRight);
        assert_eq!(turned.to_pose_string(), "210000000000000");
    }

    #[test]
    fn test_encode_head_turned_to_front() {
        let mut pose = Pose::neutral(GameVariant::C3);
        pose.body_facing = PoseFacing::ViewerLeft;
        pose.head_facing = PoseFacing::Front;
        let s = pose.to_pose_string();
        assert_eq!(&s[..2], "34");
        assert_eq!(parse(&s).unwrap().head_facing, PoseFacing::Front);
    }
}
