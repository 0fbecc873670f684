//! Random pose generation
//!
//! Joints are sampled one at a time down each limb so that a limb never
//! bends into a shape the sprites can't show: a raised thigh keeps the shin
//! off the floor, a hanging shin forces the foot down, and a forearm is never
//! lower than a raised upper arm.
//!
//! Every sampling function takes the random source explicitly, so a seeded
//! generator reproduces the same poses.

use rand::seq::SliceRandom;
use rand::Rng;

use super::{parse_pose_string, Mood, Pose, PoseError, PoseFacing, Tilt};
use crate::breed::Gender;
use crate::variant::GameVariant;

/// Adult front pose for C1 engine games.
const C1E_ADULT_FRONT: &str = "140000000000000";
/// Adult front pose for C2 engine games.
const C2E_ADULT_FRONT: &str = "113122122111111";

pub(crate) const FEMALE_PLACEHOLDER_POSES: [&str; 3] = ["323322111013311", "313322100111211", "342010222032211"];
pub(crate) const MALE_PLACEHOLDER_POSES: [&str; 3] = ["243322100210311", "212010222220011", "233020332330011"];

/// Generate a random, anatomically plausible pose.
///
/// When `facing` is given the body always faces that way; otherwise the body
/// faces front 2/9, back 1/9 and each side 3/9 of the time.
pub fn random_pose<R: Rng + ?Sized>(
    variant: GameVariant,
    facing: Option<PoseFacing>,
    rng: &mut R,
) -> Result<Pose, PoseError> {
    let body_facing = match facing {
        Some(facing) => facing,
        None => random_body_facing(rng)?,
    };
    let head_facing = random_head_facing(body_facing, rng);
    let body = random_body_tilt(rng)?;
    let head = random_tilt(rng)?;
    let (left_thigh, left_shin, left_foot) = random_leg(rng)?;
    let (right_thigh, right_shin, right_foot) = random_leg(rng)?;
    let (left_upper_arm, left_forearm) = random_arm(rng)?;
    let (right_upper_arm, right_forearm) = random_arm(rng)?;
    let tail_base = random_tilt(rng)?;
    let tail_tip = random_tilt(rng)?;
    let mood = random_mood(variant, rng)?;
    let eyes_closed = rng.gen_range(0..3) == 2;

    Ok(Pose {
        variant,
        body_facing,
        head_facing,
        head,
        body,
        left_thigh,
        left_shin,
        left_foot,
        right_thigh,
        right_shin,
        right_foot,
        left_upper_arm,
        left_forearm,
        right_upper_arm,
        right_forearm,
        tail_base,
        tail_tip,
        mood,
        eyes_closed,
        facing_codes: None,
    })
}

/// Pick one of the moods the game can draw.
pub fn random_mood<R: Rng + ?Sized>(variant: GameVariant, rng: &mut R) -> Result<Mood, PoseError> {
    variant.moods().choose(rng).copied().ok_or(PoseError::Internal("game has no moods"))
}

/// Canned pose for the `eemfoo` placeholder.
///
/// Grown creatures stand facing front; younger ones get one of three playful
/// poses chosen by gender.
pub fn placeholder_pose<R: Rng + ?Sized>(
    variant: GameVariant,
    gender: Gender,
    age: u8,
    rng: &mut R,
) -> Result<Pose, PoseError> {
    let adult = match variant {
        GameVariant::C1 if age >= 2 => Some(C1E_ADULT_FRONT),
        GameVariant::C2 if age >= 3 => Some(C1E_ADULT_FRONT),
        GameVariant::C1 | GameVariant::C2 => None,
        _ if age >= 4 => Some(C2E_ADULT_FRONT),
        _ => None,
    };
    if let Some(pose_string) = adult {
        return parse_pose_string(variant, pose_string);
    }

    let choices = match gender {
        Gender::Female => &FEMALE_PLACEHOLDER_POSES,
        Gender::Male => &MALE_PLACEHOLDER_POSES,
    };
    let pose_string =
        choices.choose(rng).ok_or(PoseError::Internal("no placeholder poses"))?;
    parse_pose_string(variant, pose_string)
}

fn random_body_facing<R: Rng + ?Sized>(rng: &mut R) -> Result<PoseFacing, PoseError> {
    match rng.gen_range(0..9) {
        0 | 1 => Ok(PoseFacing::Front),
        2 => Ok(PoseFacing::Back),
        3..=5 => Ok(PoseFacing::ViewerLeft),
        6..=8 => Ok(PoseFacing::ViewerRight),
        _ => Err(PoseError::Internal("invalid random facing direction")),
    }
}

fn random_head_facing<R: Rng + ?Sized>(body_facing: PoseFacing, rng: &mut R) -> PoseFacing {
    if rng.gen_bool(0.5) {
        return body_facing;
    }
    match body_facing {
        PoseFacing::Front => {
            if rng.gen_bool(0.5) {
                PoseFacing::ViewerLeft
            } else {
                PoseFacing::ViewerRight
            }
        }
        PoseFacing::Back => PoseFacing::Back,
        // Sideways bodies rarely show the back of the head
        PoseFacing::ViewerLeft | PoseFacing::ViewerRight => {
            if rng.gen_range(0..5) > 0 {
                PoseFacing::Front
            } else {
                PoseFacing::Back
            }
        }
    }
}

fn random_body_tilt<R: Rng + ?Sized>(rng: &mut R) -> Result<Tilt, PoseError> {
    match rng.gen_range(0..8) {
        0 => Ok(Tilt::Down),
        1 => Ok(Tilt::Straight),
        2..=4 => Ok(Tilt::Up),
        5..=7 => Ok(Tilt::FarUp),
        _ => Err(PoseError::Internal("invalid random body tilt")),
    }
}

/// Tilt whose digit is `low` plus a uniform offset below `count`.
fn random_tilt_from<R: Rng + ?Sized>(low: u32, count: u32, rng: &mut R) -> Result<Tilt, PoseError> {
    Tilt::from_digit(low + rng.gen_range(0..count))
        .ok_or(PoseError::Internal("random tilt digit out of range"))
}

fn random_tilt<R: Rng + ?Sized>(rng: &mut R) -> Result<Tilt, PoseError> {
    random_tilt_from(0, 4, rng)
}

fn random_leg<R: Rng + ?Sized>(rng: &mut R) -> Result<(Tilt, Tilt, Tilt), PoseError> {
    let thigh = random_tilt(rng)?;
    let shin = match thigh {
        Tilt::FarUp => random_tilt_from(1, 3, rng)?,
        Tilt::Up | Tilt::Straight => random_tilt(rng)?,
        Tilt::Down => random_tilt_from(0, 3, rng)?,
    };
    let foot = match shin {
        Tilt::FarUp | Tilt::Up => random_tilt(rng)?,
        Tilt::Straight => random_tilt_from(0, 3, rng)?,
        Tilt::Down => Tilt::Down,
    };
    Ok((thigh, shin, foot))
}

fn random_arm<R: Rng + ?Sized>(rng: &mut R) -> Result<(Tilt, Tilt), PoseError> {
    let upper_arm = random_tilt(rng)?;
    let forearm = match upper_arm {
        Tilt::FarUp => Tilt::FarUp,
        Tilt::Up => random_tilt_from(2, 2, rng)?,
        Tilt::Straight => random_tilt_from(1, 3, rng)?,
        Tilt::Down => random_tilt(rng)?,
    };
    Ok((upper_arm, forearm))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use std::collections::HashSet;

    const SAMPLES: usize = 10_000;

    fn poses(variant: GameVariant, facing: Option<PoseFacing>, n: usize) -> Vec<Pose> {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        (0..n).map(|_| random_pose(variant, facing, &mut rng).unwrap()).collect()
    }

    #[test]
    fn test_leg_chain_constraints() {
        for pose in poses(GameVariant::C3, None, SAMPLES) {
            for (thigh, shin, foot) in [
                (pose.left_thigh, pose.left_shin, pose.left_foot),
                (pose.right_thigh, pose.right_shin, pose.right_foot),
            ] {
                if thigh == Tilt::FarUp {
                    assert!(matches!(shin.to_char(), '1' | '2' | '3'), "{}", pose);
                }
                if thigh == Tilt::Down {
                    assert_ne!(shin, Tilt::FarUp, "{}", pose);
                }
                if shin == Tilt::Down {
                    assert_eq!(foot, Tilt::Down, "{}", pose);
                }
                if shin == Tilt::Straight {
                    assert_ne!(foot, Tilt::FarUp, "{}", pose);
                }
            }
        }
    }

    #[test]
    fn test_arm_chain_constraints() {
        for pose in poses(GameVariant::C3, None, SAMPLES) {
            for (upper, fore) in [
                (pose.left_upper_arm, pose.left_forearm),
                (pose.right_upper_arm, pose.right_forearm),
            ] {
                match upper {
                    Tilt::FarUp => assert_eq!(fore, Tilt::FarUp),
                    Tilt::Up => assert!(matches!(fore, Tilt::Up | Tilt::FarUp)),
                    Tilt::Straight => assert_ne!(fore, Tilt::Down),
                    Tilt::Down => {}
                }
            }
        }
    }

    #[test]
    fn test_c1e_moods_stay_in_subset() {
        let allowed = GameVariant::C1.moods();
        for pose in poses(GameVariant::C1, None, 1_000) {
            assert!(allowed.contains(&pose.mood), "{:?} not valid for C1", pose.mood);
        }
    }

    #[test]
    fn test_c2e_moods_cover_all() {
        let seen: HashSet<Mood> = poses(GameVariant::C3, None, 1_000).iter().map(|p| p.mood).collect();
        assert_eq!(seen.len(), 6);
    }

    #[test]
    fn test_pinned_facing() {
        for pose in poses(GameVariant::C3, Some(PoseFacing::ViewerLeft), 1_000) {
            assert_eq!(pose.body_facing, PoseFacing::ViewerLeft);
        }
    }

    #[test]
    fn test_head_facing_rules() {
        for pose in poses(GameVariant::C3, None, SAMPLES) {
            if pose.head_facing == pose.body_facing {
                continue;
            }
            match pose.body_facing {
                PoseFacing::Front => assert!(pose.head_facing.is_side()),
                PoseFacing::Back => panic!("back-facing body turned its head: {}", pose),
                _ => assert!(!pose.head_facing.is_side()),
            }
        }
    }

    #[test]
    fn test_body_facing_distribution() {
        let all = poses(GameVariant::C3, None, SAMPLES);
        let count = |f: PoseFacing| all.iter().filter(|p| p.body_facing == f).count();
        let back = count(PoseFacing::Back);
        let left = count(PoseFacing::ViewerLeft);
        // 1/9 back, 3/9 left
        assert!(back > 800 && back < 1_450, "back: {}", back);
        assert!(left > 2_900 && left < 3_750, "left: {}", left);
    }

    #[test]
    fn test_eyes_closed_about_a_third() {
        let closed = poses(GameVariant::C3, None, SAMPLES).iter().filter(|p| p.eyes_closed).count();
        assert!(closed > 2_900 && closed < 3_750, "closed: {}", closed);
    }

    #[test]
    fn test_same_seed_same_poses() {
        let a = poses(GameVariant::C2, None, 50);
        let b = poses(GameVariant::C2, None, 50);
        assert_eq!(a, b);
    }

    #[test]
    fn test_random_pose_serializes_to_valid_string() {
        for pose in poses(GameVariant::DS, None, 500) {
            let s = pose.to_pose_string();
            assert_eq!(s.len(), 15);
            assert!(parse_pose_string(GameVariant::DS, &s).is_ok(), "{}", s);
        }
    }

    #[test]
    fn test_placeholder_adults_face_front() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let c1 = placeholder_pose(GameVariant::C1, Gender::Male, 2, &mut rng).unwrap();
        assert_eq!(c1.to_pose_string(), C1E_ADULT_FRONT);
        let c2 = placeholder_pose(GameVariant::C2, Gender::Female, 3, &mut rng).unwrap();
        assert_eq!(c2.to_pose_string(), C1E_ADULT_FRONT);
        let c3 = placeholder_pose(GameVariant::C3, Gender::Male, 4, &mut rng).unwrap();
        assert_eq!(c3.to_pose_string(), C2E_ADULT_FRONT);
    }

    #[test]
    fn test_placeholder_young_by_gender() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        for _ in 0..20 {
            let female = placeholder_pose(GameVariant::C3, Gender::Female, 1, &mut rng).unwrap();
            assert!(FEMALE_PLACEHOLDER_POSES.contains(&female.to_pose_string().as_str()));
            let male = placeholder_pose(GameVariant::C2, Gender::Male, 2, &mut rng).unwrap();
            assert!(MALE_PLACEHOLDER_POSES.contains(&male.to_pose_string().as_str()));
        }
    }
}
