//! Breed keys, genders and body part selections
//!
//! A breed key picks the sprite set used for a body part:
//! `{genus}:{breed}` or `{genus}:{gender}:{breed}`, for example `n:a`,
//! `grendel:d` or `norn:f:3`.

use rand::Rng;
use serde::Serialize;
use std::fmt;
use thiserror::Error;

use crate::variant::GameVariant;

/// Error raised while reading breed, gender or part arguments.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum BreedError {
    #[error("Invalid genus in breed '{0}'. Expected [n]orn, [g]rendel, [e]ttin, [s]hee or geat")]
    InvalidGenus(String),
    #[error("Invalid part gender in breed '{0}'. Expected [m]ale or [f]emale")]
    InvalidPartGender(String),
    #[error("Invalid part breed in '{0}'. Expected a single character")]
    InvalidBreedChar(String),
    #[error("Invalid gender '{0}'. Expected [m]ale, [f]emale or random")]
    InvalidGender(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Gender {
        if rng.gen_bool(0.5) {
            Gender::Male
        } else {
            Gender::Female
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Gender::Male => "male",
            Gender::Female => "female",
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Parse a `--gender` value. `Ok(None)` means pick one at random.
///
/// `3` is the games' non-binary egg value and is also treated as random.
pub fn parse_gender(value: &str) -> Result<Option<Gender>, BreedError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "?" | "any" | "rand" | "random" | "*" | "-1" | "0" | "3" => Ok(None),
        "m" | "male" | "1" => Ok(Some(Gender::Male)),
        "f" | "female" | "2" => Ok(Some(Gender::Female)),
        _ => Err(BreedError::InvalidGender(value.to_string())),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Genus {
    Norn,
    Grendel,
    Ettin,
    Shee,
}

impl Genus {
    pub fn index(self) -> u8 {
        match self {
            Genus::Norn => 0,
            Genus::Grendel => 1,
            Genus::Ettin => 2,
            Genus::Shee => 3,
        }
    }

    /// Genus name as the game calls it; the fourth genus is Geat in Docking Station.
    pub fn name(self, variant: Option<GameVariant>) -> &'static str {
        match self {
            Genus::Norn => "norn",
            Genus::Grendel => "grendel",
            Genus::Ettin => "ettin",
            Genus::Shee if variant == Some(GameVariant::DS) => "geat",
            Genus::Shee => "shee",
        }
    }

    fn from_name(name: &str) -> Option<Genus> {
        match name {
            "n" | "norn" => Some(Genus::Norn),
            "g" | "grendel" => Some(Genus::Grendel),
            "e" | "ettin" => Some(Genus::Ettin),
            "s" | "shee" | "geat" => Some(Genus::Shee),
            _ => None,
        }
    }
}

/// Sprite selection for one body part.
///
/// Any field may be unset; [`BreedKey::empty`] is what a value without two or
/// three `:` separated parts parses to, and fails validation later.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
pub struct BreedKey {
    pub genus: Option<Genus>,
    pub gender: Option<Gender>,
    pub breed: Option<char>,
}

impl BreedKey {
    pub fn empty() -> BreedKey {
        BreedKey::default()
    }

    /// Parse `{genus}:{breed}` or `{genus}:{gender}:{breed}`.
    ///
    /// # Examples
    ///
    /// ```
    /// use creature_render::breed::{BreedKey, Gender, Genus};
    ///
    /// let key = BreedKey::parse("grendel:f:d").unwrap();
    /// assert_eq!(key.genus, Some(Genus::Grendel));
    /// assert_eq!(key.gender, Some(Gender::Female));
    /// assert_eq!(key.breed, Some('d'));
    /// ```
    pub fn parse(value: &str) -> Result<BreedKey, BreedError> {
        let lower = value.to_lowercase();
        let parts: Vec<&str> = lower.split(':').collect();
        if !(2..=3).contains(&parts.len()) {
            return Ok(BreedKey::empty());
        }

        let genus =
            Genus::from_name(parts[0]).ok_or_else(|| BreedError::InvalidGenus(value.to_string()))?;

        let gender = if parts.len() == 3 {
            match parts[1] {
                "m" | "male" | "mal" => Some(Gender::Male),
                "f" | "female" | "fem" => Some(Gender::Female),
                _ => return Err(BreedError::InvalidPartGender(value.to_string())),
            }
        } else {
            None
        };

        let breed_part = parts[parts.len() - 1];
        let mut chars = breed_part.chars();
        let breed = match (chars.next(), chars.next()) {
            (Some(c), None) => c,
            _ => return Err(BreedError::InvalidBreedChar(value.to_string())),
        };

        Ok(BreedKey { genus: Some(genus), gender, breed: Some(breed) })
    }

    /// True when the key has both a genus and a breed character.
    pub fn is_complete(&self) -> bool {
        self.genus.is_some() && self.breed.is_some()
    }
}

impl fmt::Display for BreedKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.genus {
            Some(genus) => write!(f, "{}", genus.name(None))?,
            None => f.write_str("?")?,
        }
        if let Some(gender) = self.gender {
            write!(f, ":{}", gender)?;
        }
        match self.breed {
            Some(breed) => write!(f, ":{}", breed),
            None => f.write_str(":?"),
        }
    }
}

/// Breed choices for every body part, before validation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PartBreeds {
    pub head: Option<BreedKey>,
    pub body: Option<BreedKey>,
    pub legs: Option<BreedKey>,
    pub arms: Option<BreedKey>,
    pub tail: Option<BreedKey>,
    pub hair: Option<BreedKey>,
}

impl PartBreeds {
    /// Fill every unset part from the `--breed` fallback.
    pub fn with_fallback(self, fallback: Option<BreedKey>) -> PartBreeds {
        PartBreeds {
            head: self.head.or(fallback),
            body: self.body.or(fallback),
            legs: self.legs.or(fallback),
            arms: self.arms.or(fallback),
            tail: self.tail.or(fallback),
            hair: self.hair.or(fallback),
        }
    }

    /// Names of required parts with no breed.
    ///
    /// Tail only counts once something else is missing, and never for C1
    /// which has no tails.
    pub fn missing(&self, variant: GameVariant) -> Vec<&'static str> {
        let mut missing = Vec::new();
        for (name, key) in
            [("head", &self.head), ("body", &self.body), ("legs", &self.legs), ("arms", &self.arms)]
        {
            if key.is_none() {
                missing.push(name);
            }
        }
        if !missing.is_empty() && self.tail.is_none() && variant != GameVariant::C1 {
            missing.push("tail");
        }
        missing
    }

    /// Every set part with its option name, in `--head`, `--body`, ... order.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, BreedKey)> + '_ {
        [
            ("head", self.head),
            ("body", self.body),
            ("legs", self.legs),
            ("arms", self.arms),
            ("tail", self.tail),
            ("hair", self.hair),
        ]
        .into_iter()
        .filter_map(|(name, key)| key.map(|k| (name, k)))
    }
}

/// Collect sprite part letters `a`-`q` from a `--ghost` or `--hidden` value.
///
/// Separators and other characters are ignored, so `a,b,c` and `abc` agree.
pub fn parse_parts(value: &str) -> Vec<char> {
    value.chars().filter(|c| ('a'..='q').contains(c)).collect()
}
