//! Pose command: resolve pose tokens without rendering

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::Serialize;
use std::process::ExitCode;

use crate::breed::{parse_gender, Gender};
use crate::pose::{MoodArg, Pose};
use crate::request::{resolve_request_poses, RequestError, MAX_AGE};
use crate::variant::GameVariant;

use super::{EXIT_ERROR, EXIT_INVALID_ARGS, EXIT_SUCCESS};

#[derive(Serialize)]
struct ResolvedPose<'a> {
    token: &'a str,
    pose_string: String,
    file_name: Option<String>,
    pose: Pose,
}

/// Execute the pose command
pub fn run_pose(
    tokens: &[String],
    game: GameVariant,
    mood: Option<&str>,
    closed: bool,
    age: Option<i64>,
    gender: Option<&str>,
    seed: Option<u64>,
    json: bool,
) -> ExitCode {
    let mut rng = match seed {
        Some(seed) => ChaCha8Rng::seed_from_u64(seed),
        None => ChaCha8Rng::from_entropy(),
    };

    let age = match age {
        None => MAX_AGE,
        Some(age) => match u8::try_from(age) {
            Ok(age) if age <= MAX_AGE => age,
            _ => {
                eprintln!("{}", RequestError::InvalidAge(age));
                return ExitCode::from(EXIT_INVALID_ARGS);
            }
        },
    };
    let gender = match gender.map(parse_gender).transpose() {
        Ok(gender) => gender.flatten().unwrap_or_else(|| Gender::random(&mut rng)),
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::from(EXIT_INVALID_ARGS);
        }
    };
    let mood = match mood.map(str::parse::<MoodArg>).transpose() {
        Ok(mood) => mood,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::from(EXIT_INVALID_ARGS);
        }
    };

    let specs = match resolve_request_poses(game, tokens, mood, closed, &mut rng) {
        Ok(specs) => specs,
        Err(e) => {
            eprintln!("{}", e);
            return ExitCode::from(EXIT_INVALID_ARGS);
        }
    };

    let mut resolved = Vec::with_capacity(specs.len());
    for (token, spec) in tokens.iter().zip(specs) {
        match spec.finalize(gender, age, &mut rng) {
            Ok((pose, file_name)) => resolved.push(ResolvedPose {
                token: token.as_str(),
                pose_string: pose.to_pose_string(),
                file_name,
                pose,
            }),
            Err(e) => {
                eprintln!("{}", RequestError::from(e));
                return ExitCode::from(EXIT_ERROR);
            }
        }
    }

    if json {
        match serde_json::to_string_pretty(&resolved) {
            Ok(text) => println!("{}", text),
            Err(e) => {
                eprintln!("Error: Failed to serialize poses: {}", e);
                return ExitCode::from(EXIT_ERROR);
            }
        }
    } else {
        for pose in &resolved {
            match &pose.file_name {
                Some(name) => println!("{}={}", pose.pose_string, name),
                None => println!("{}", pose.pose_string),
            }
        }
    }

    ExitCode::from(EXIT_SUCCESS)
}
