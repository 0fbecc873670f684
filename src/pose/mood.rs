//! Facial expressions

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Emotional expression drawn on the creature's face.
///
/// Ordered by expression index; older games only have the first four.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mood {
    Normal,
    Happy,
    Sad,
    Angry,
    Scared,
    Sleepy,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown mood '{0}', expected one of normal, happy, sad, angry, scared, surprised, sleepy")]
pub struct UnknownMood(pub String);

impl Mood {
    pub const ALL: [Mood; 6] =
        [Mood::Normal, Mood::Happy, Mood::Sad, Mood::Angry, Mood::Scared, Mood::Sleepy];

    pub fn from_index(index: usize) -> Option<Mood> {
        Mood::ALL.get(index).copied()
    }

    pub fn name(self) -> &'static str {
        match self {
            Mood::Normal => "normal",
            Mood::Happy => "happy",
            Mood::Sad => "sad",
            Mood::Angry => "angry",
            Mood::Scared => "scared",
            Mood::Sleepy => "sleepy",
        }
    }
}

impl fmt::Display for Mood {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Mood {
    type Err = UnknownMood;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        if lower == "surprised" {
            return Ok(Mood::Scared);
        }
        Mood::ALL
            .iter()
            .copied()
            .find(|mood| mood.name() == lower)
            .ok_or_else(|| UnknownMood(s.to_string()))
    }
}

/// A `--mood` value: a fixed mood or one picked at random for the game.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoodArg {
    Fixed(Mood),
    Random,
}

impl FromStr for MoodArg {
    type Err = UnknownMood;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "rand" | "random" => Ok(MoodArg::Random),
            _ => s.parse().map(MoodArg::Fixed),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_mood_names() {
        assert_eq!("happy".parse::<Mood>(), Ok(Mood::Happy));
        assert_eq!("ANGRY".parse::<Mood>(), Ok(Mood::Angry));
        assert_eq!("surprised".parse::<Mood>(), Ok(Mood::Scared));
        assert!("grumpy".parse::<Mood>().is_err());
    }

    #[test]
    fn test_parse_mood_arg() {
        assert_eq!("Random".parse::<MoodArg>(), Ok(MoodArg::Random));
        assert_eq!("rand".parse::<MoodArg>(), Ok(MoodArg::Random));
        assert_eq!("sleepy".parse::<MoodArg>(), Ok(MoodArg::Fixed(Mood::Sleepy)));
        assert!("randomly".parse::<MoodArg>().is_err());
    }

    #[test]
    fn test_from_index() {
        assert_eq!(Mood::from_index(0), Some(Mood::Normal));
        assert_eq!(Mood::from_index(5), Some(Mood::Sleepy));
        assert_eq!(Mood::from_index(6), None);
    }
}
