//! Reporting of random choices and equivalent genome edits
//!
//! After a render that used random values, the command line is printed again
//! with each random value replaced by what was actually drawn, so the result
//! can be reproduced.

use crate::color::{parse_component, parse_tint};
use crate::pose::{Pose, PoseToken};
use crate::request::RenderRequest;

/// Header printed above the rebuilt command.
pub const RANDOM_VALUES_HEADER: &str = "Command with random values:";
/// Header printed above the alter-genome command.
pub const ALTER_GENOME_HEADER: &str =
    "Alter genome command (append an output file name; breed-util must be on your path):";

const BOLD: &str = "\x1b[1m";
const RESET: &str = "\x1b[0m";

fn quote(value: &str) -> String {
    if value.is_empty() || value.chars().any(|c| c.is_whitespace() || c == '"') {
        format!("\"{}\"", value.replace('"', "\\\""))
    } else {
        value.to_string()
    }
}

fn is_random_word(value: &str) -> bool {
    let lower = value.trim().to_ascii_lowercase();
    matches!(lower.as_str(), "rand" | "random" | "?" | "*" | "-1" | "any" | "0" | "3")
}

/// Concrete value for a random option, or `None` to keep the original text.
fn concrete_value(
    option: &str,
    value: &str,
    request: &RenderRequest,
    pose: Option<&Pose>,
) -> Option<String> {
    match option {
        "--tint" if parse_tint(value).is_ok_and(|t| t.is_random()) => {
            Some(request.colors.tint_string())
        }
        "--swap" if parse_component("swap", value).is_ok_and(|c| c.is_random()) => {
            request.colors.swap.map(|v| v.to_string())
        }
        "--rotation" if parse_component("rotation", value).is_ok_and(|c| c.is_random()) => {
            request.colors.rotation.map(|v| v.to_string())
        }
        "--pose" | "-p" if PoseToken::classify(value).is_ok_and(|t| t.is_random()) => {
            pose.map(Pose::to_pose_string)
        }
        "--mood" | "-m" if matches!(value.trim().to_ascii_lowercase().as_str(), "rand" | "random") => {
            pose.map(|p| p.mood.to_string())
        }
        "--gender" | "-g" if is_random_word(value) => request.gender.map(|g| g.to_string()),
        _ => None,
    }
}

/// Rebuild `program args...` with random values replaced by concrete ones.
///
/// Returns `None` when no value was random. Options may be written as
/// `--tint value` or `--tint=value`; each `--pose` value lines up with the
/// pose rendered at the same position.
pub fn random_values_command(
    program: &str,
    args: &[String],
    request: &RenderRequest,
    poses: &[(Pose, Option<String>)],
    bold: bool,
) -> Option<String> {
    let mut out = vec![program.to_string()];
    let mut replaced = false;
    let mut pose_index = 0;
    let mut i = 0;

    while i < args.len() {
        let arg = &args[i];
        i += 1;

        let (option, inline) = match arg.split_once('=') {
            Some((option, value)) if option.starts_with("--") => (option, Some(value)),
            _ => (arg.as_str(), None),
        };
        let takes_value = matches!(
            option,
            "--tint" | "--swap" | "--rotation" | "--pose" | "-p" | "--mood" | "-m" | "--gender" | "-g"
        );
        if !takes_value {
            out.push(quote(arg));
            continue;
        }

        let value = match inline {
            Some(value) => value,
            None => match args.get(i) {
                Some(value) => {
                    i += 1;
                    value.as_str()
                }
                None => {
                    out.push(quote(arg));
                    break;
                }
            },
        };

        let pose = if matches!(option, "--pose" | "-p") {
            pose_index += 1;
            poses.get(pose_index - 1).map(|(pose, _)| pose)
        } else {
            poses.first().map(|(pose, _)| pose)
        };

        match concrete_value(option, value, request, pose) {
            Some(concrete) => {
                replaced = true;
                let text = format!("{} {}", option, quote(&concrete));
                if bold {
                    out.push(format!("{}{}{}", BOLD, text, RESET));
                } else {
                    out.push(text);
                }
            }
            None => {
                out.push(option.to_string());
                out.push(quote(value));
            }
        }
    }

    replaced.then(|| out.join(" "))
}

/// `breed-util alter-genome` command giving a genome the rendered breeds and colors.
pub fn alter_genome_command(request: &RenderRequest) -> String {
    let mut out = String::from("breed-util alter-genome");
    if let Some(genome) = request.genome.as_ref().or(request.export.as_ref()) {
        out.push_str(&format!(" \"{}\"", genome.display()));
    }

    let parts: Vec<_> = request.breeds.iter().filter(|(_, key)| key.is_complete()).collect();
    let mut distinct: Vec<_> = parts.iter().map(|(_, key)| (key.genus, key.breed)).collect();
    distinct.dedup();
    let mut push_breed = |option: &str, key: &crate::breed::BreedKey| {
        if let (Some(genus), Some(breed)) = (key.genus, key.breed) {
            out.push_str(&format!(" --{} {}:{}", option, genus.name(Some(request.variant)), breed));
        }
    };
    if distinct.len() == 1 {
        if let Some((_, key)) = parts.first() {
            push_breed("breed", key);
        }
    } else {
        for (part, key) in &parts {
            push_breed(*part, key);
        }
    }

    let colors = &request.colors;
    for (option, value) in [
        ("red", colors.red),
        ("green", colors.green),
        ("blue", colors.blue),
        ("swap", colors.swap),
        ("rotation", colors.rotation),
    ] {
        if let Some(value) = value {
            out.push_str(&format!(" --{} {}", option, value));
        }
    }
    out
}
