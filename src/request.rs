//! Render request assembly and validation
//!
//! [`RequestArgs`] holds the raw command-line values; [`RequestArgs::build`]
//! validates them and resolves every random choice into a [`RenderRequest`]
//! a renderer can draw without further decisions.

use rand::Rng;
use serde::Serialize;
use std::path::PathBuf;
use thiserror::Error;
use tracing::{debug, warn};

use crate::breed::{parse_gender, parse_parts, BreedError, BreedKey, Gender, PartBreeds};
use crate::color::{parse_component, parse_tint, ColorError, ColorTransform, Component};
use crate::pose::{
    random_mood, resolve_poses, MoodArg, Pose, PoseError, PoseOverrides, PoseSpec, UnknownMood,
};
use crate::variant::GameVariant;

/// Oldest life stage.
pub const MAX_AGE: u8 = 6;
/// Highest C2e genome variant.
pub const MAX_GENE_VARIANT: u8 = 8;
pub const DEFAULT_GHOST_ALPHA: f64 = 0.5;
pub const MAX_SCALE: u32 = 10;

/// Error raised while validating render options.
///
/// Errors with a legacy numeric code show it in their message, as
/// `Error 1009: ...`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum RequestError {
    #[error("Error 1000: Cannot render creature without setting {}", .0.join(" and "))]
    MissingAgeOrGender(Vec<&'static str>),
    #[error("Error 1001: Cannot render creature without part breeds for {}; Use --breed, -b to set a fallback breed for all parts\n Or define individual parts using:\n\t{}", .0.join(", "), .0.iter().map(|p| format!("--{} {{genus}}:{{breed}}", p)).collect::<Vec<_>>().join("\n\t"))]
    MissingBreeds(Vec<&'static str>),
    #[error("Error 1001: Part breed is required for --{0}")]
    IncompleteBreed(&'static str),
    #[error("Error {}: --{option}: {source}", breed_error_code(.source))]
    Breed {
        option: &'static str,
        #[source]
        source: BreedError,
    },
    #[error("Error 1005: Age must be an integer value 0..6 (inclusive); Found: {0}")]
    InvalidAge(i64),
    #[error("Error 1007: Invalid breed slot '{found}' for --{part}. Expected breed value {low}..{high}")]
    InvalidBreed { part: &'static str, found: char, low: char, high: char },
    #[error("Error 1008: Cannot render without pose string")]
    MissingPose,
    #[error("Error 1009: {0}")]
    InvalidPose(#[from] PoseError),
    #[error("Error 1010: {0}")]
    InvalidColor(#[from] ColorError),
    #[error("Invalid mood: {0}")]
    InvalidMood(#[from] UnknownMood),
    #[error("Scale must be 1..10 (inclusive); Found: {0}")]
    InvalidScale(u32),
    #[error("Ghost alpha must be 0.0..1.0 (inclusive); Found: {0}")]
    InvalidGhostAlpha(f64),
    #[error("Genome and Export options cannot be used together")]
    GenomeAndExport,
}

fn breed_error_code(error: &BreedError) -> u16 {
    match error {
        BreedError::InvalidGenus(_) => 1006,
        BreedError::InvalidBreedChar(_) => 1007,
        _ => 1004,
    }
}

impl RequestError {
    /// Legacy numeric code, when the error has one.
    pub fn code(&self) -> Option<u16> {
        match self {
            RequestError::MissingAgeOrGender(_) => Some(1000),
            RequestError::MissingBreeds(_) | RequestError::IncompleteBreed(_) => Some(1001),
            RequestError::Breed { source, .. } => Some(breed_error_code(source)),
            RequestError::InvalidAge(_) => Some(1005),
            RequestError::InvalidBreed { .. } => Some(1007),
            RequestError::MissingPose => Some(1008),
            RequestError::InvalidPose(_) => Some(1009),
            RequestError::InvalidColor(_) => Some(1010),
            _ => None,
        }
    }
}

/// Raw render options as given on the command line.
#[derive(Debug, Clone, Default)]
pub struct RequestArgs {
    pub sources: Vec<PathBuf>,
    pub genome: Option<PathBuf>,
    pub export: Option<PathBuf>,
    pub gene_variant: i64,
    pub age: Option<i64>,
    pub gender: Option<String>,
    pub breed: Option<String>,
    pub head: Option<String>,
    pub hair: Option<String>,
    pub body: Option<String>,
    pub arms: Option<String>,
    pub legs: Option<String>,
    pub tail: Option<String>,
    pub tint: Option<String>,
    pub swap: Option<String>,
    pub rotation: Option<String>,
    pub transform_variant: Option<GameVariant>,
    pub ghost: Vec<String>,
    pub hidden: Vec<String>,
    pub ghost_alpha: Option<f64>,
    pub ghost_parts_below: bool,
    pub exact_match: bool,
    pub no_intersect: bool,
    pub trim: bool,
    pub scale: u32,
    pub padding: Option<u32>,
}

/// A validated render request with every random choice made.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderRequest {
    pub variant: GameVariant,
    pub sources: Vec<PathBuf>,
    pub genome: Option<PathBuf>,
    pub export: Option<PathBuf>,
    pub gene_variant: u8,
    /// Unset when the genome or export supplies it
    pub age: Option<u8>,
    pub gender: Option<Gender>,
    pub breeds: PartBreeds,
    pub colors: ColorTransform,
    /// True when any color component was random
    pub random_colors: bool,
    pub ghost: Vec<char>,
    pub hidden: Vec<char>,
    pub ghost_alpha: f64,
    pub ghost_parts_below: bool,
    pub exact_match: bool,
    pub no_intersect: bool,
    pub trim: bool,
    pub scale: u8,
    pub padding: u32,
}

fn parse_breed_option(
    option: &'static str,
    value: Option<&str>,
) -> Result<Option<BreedKey>, RequestError> {
    value
        .map(|v| BreedKey::parse(v).map_err(|source| RequestError::Breed { option, source }))
        .transpose()
}

/// Check one part's breed key against the game.
fn validate_breed(variant: GameVariant, part: &'static str, key: &BreedKey) -> Result<(), RequestError> {
    if key.genus.is_none() {
        return Err(RequestError::Breed {
            option: part,
            source: BreedError::InvalidGenus(key.to_string()),
        });
    }
    let breed = key.breed.ok_or(RequestError::IncompleteBreed(part))?.to_ascii_lowercase();
    let (low, high) = variant.breed_range();
    if !(low..=high).contains(&breed) {
        return Err(RequestError::InvalidBreed { part, found: breed, low, high });
    }
    Ok(())
}

impl RequestArgs {
    fn has_genetics(&self) -> bool {
        self.genome.is_some() || self.export.is_some()
    }

    /// Validate the options for `variant`, drawing random values from `rng`.
    pub fn build<R: Rng + ?Sized>(
        &self,
        variant: GameVariant,
        rng: &mut R,
    ) -> Result<RenderRequest, RequestError> {
        if !(1..=MAX_SCALE).contains(&self.scale) {
            return Err(RequestError::InvalidScale(self.scale));
        }
        if self.genome.is_some() && self.export.is_some() {
            return Err(RequestError::GenomeAndExport);
        }

        let gene_variant = match u8::try_from(self.gene_variant) {
            Ok(v) if v <= MAX_GENE_VARIANT => v,
            _ => {
                warn!(
                    "Genome variant must be a value 0..8; Found: {}; Defaulting to '0'",
                    self.gene_variant
                );
                0
            }
        };

        let age = match self.age {
            Some(age) => Some(
                u8::try_from(age)
                    .ok()
                    .filter(|a| *a <= MAX_AGE)
                    .ok_or(RequestError::InvalidAge(age))?,
            ),
            None => None,
        };

        let gender = match self.gender.as_deref() {
            Some(value) => {
                let parsed = parse_gender(value)
                    .map_err(|source| RequestError::Breed { option: "gender", source })?;
                Some(parsed.unwrap_or_else(|| {
                    let picked = Gender::random(rng);
                    debug!(gender = %picked, "resolved random gender");
                    picked
                }))
            }
            None => None,
        };

        if !self.has_genetics() {
            let mut missing = Vec::new();
            if age.is_none() {
                missing.push("age");
            }
            if gender.is_none() {
                missing.push("gender");
            }
            if !missing.is_empty() {
                return Err(RequestError::MissingAgeOrGender(missing));
            }
        }

        let tint = self.tint.as_deref().map(parse_tint).transpose()?;
        let swap = self.swap.as_deref().map_or(Ok(Component::Unset), |v| parse_component("swap", v))?;
        let rotation = self
            .rotation
            .as_deref()
            .map_or(Ok(Component::Unset), |v| parse_component("rotation", v))?;
        let random_colors = tint.is_some_and(|t| t.is_random()) || swap.is_random() || rotation.is_random();
        let colors = ColorTransform::resolve(tint, swap, rotation, self.transform_variant, rng);

        let fallback = parse_breed_option("breed", self.breed.as_deref())?;
        let breeds = PartBreeds {
            head: parse_breed_option("head", self.head.as_deref())?,
            body: parse_breed_option("body", self.body.as_deref())?,
            legs: parse_breed_option("legs", self.legs.as_deref())?,
            arms: parse_breed_option("arms", self.arms.as_deref())?,
            tail: parse_breed_option("tail", self.tail.as_deref())?,
            hair: parse_breed_option("hair", self.hair.as_deref())?,
        }
        .with_fallback(fallback);

        let missing = breeds.missing(variant);
        if !missing.is_empty() && !self.has_genetics() {
            return Err(RequestError::MissingBreeds(missing));
        }
        for (part, key) in breeds.iter() {
            validate_breed(variant, part, &key)?;
        }

        let ghost_alpha = self.ghost_alpha.unwrap_or(DEFAULT_GHOST_ALPHA);
        if !(0.0..=1.0).contains(&ghost_alpha) {
            return Err(RequestError::InvalidGhostAlpha(ghost_alpha));
        }

        Ok(RenderRequest {
            variant,
            sources: self.sources.clone(),
            genome: self.genome.clone(),
            export: self.export.clone(),
            gene_variant,
            age,
            gender,
            breeds,
            colors,
            random_colors,
            ghost: self.ghost.iter().flat_map(|g| parse_parts(g)).collect(),
            hidden: self.hidden.iter().flat_map(|h| parse_parts(h)).collect(),
            ghost_alpha,
            ghost_parts_below: self.ghost_parts_below,
            exact_match: self.exact_match,
            no_intersect: self.no_intersect,
            trim: self.trim,
            // Bounded by MAX_SCALE above
            scale: self.scale as u8,
            padding: self.padding.unwrap_or(0),
        })
    }
}

/// Resolve every `--pose` value with the shared mood and eyes-closed options.
///
/// A random mood is picked once and applies to every pose.
pub fn resolve_request_poses<R: Rng + ?Sized, S: AsRef<str>>(
    variant: GameVariant,
    raw_poses: &[S],
    mood: Option<MoodArg>,
    eyes_closed: bool,
    rng: &mut R,
) -> Result<Vec<PoseSpec>, RequestError> {
    if raw_poses.is_empty() {
        return Err(RequestError::MissingPose);
    }
    let mood = match mood {
        Some(MoodArg::Fixed(mood)) => Some(mood),
        Some(MoodArg::Random) => Some(random_mood(variant, rng)?),
        None => None,
    };
    let overrides = PoseOverrides { mood, eyes_closed: eyes_closed.then_some(true) };
    Ok(resolve_poses(variant, raw_poses, overrides, rng)?)
}

/// Swap placeholder poses for their canned poses now that age and gender are known.
///
/// An unknown age counts as fully grown; an unknown gender is picked at random
/// once, so every placeholder of the creature shares it.
pub fn finalize_poses<R: Rng + ?Sized>(
    specs: Vec<PoseSpec>,
    request: &RenderRequest,
    rng: &mut R,
) -> Result<Vec<(Pose, Option<String>)>, RequestError> {
    let gender = request.gender.unwrap_or_else(|| Gender::random(rng));
    let age = request.age.unwrap_or(MAX_AGE);
    specs
        .into_iter()
        .map(|spec| spec.finalize(gender, age, rng).map_err(RequestError::from))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pose::{Mood, PoseFacing};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn rng() -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(11)
    }

    fn args() -> RequestArgs {
        RequestArgs {
            age: Some(3),
            gender: Some("f".to_string()),
            breed: Some("n:a".to_string()),
            scale: 1,
            ..Default::default()
        }
    }

    #[test]
    fn test_minimal_request() {
        let request = args().build(GameVariant::C3, &mut rng()).unwrap();
        assert_eq!(request.age, Some(3));
        assert_eq!(request.gender, Some(Gender::Female));
        assert_eq!(request.breeds.head, BreedKey::parse("n:a").ok());
        assert_eq!(request.breeds.tail, BreedKey::parse("n:a").ok());
        assert_eq!(request.ghost_alpha, DEFAULT_GHOST_ALPHA);
        assert!(!request.random_colors);
        assert!(request.colors.is_identity());
    }

    #[test]
    fn test_missing_age_and_gender() {
        let args = RequestArgs { age: None, gender: None, ..args() };
        let err = args.build(GameVariant::C3, &mut rng()).unwrap_err();
        assert_eq!(err.code(), Some(1000));
        assert!(err.to_string().contains("age and gender"), "{}", err);
    }

    #[test]
    fn test_genetics_relax_age_gender_and_breeds() {
        let args = RequestArgs {
            age: None,
            gender: None,
            breed: None,
            export: Some(PathBuf::from("/tmp/creature.creature")),
            ..args()
        };
        let request = args.build(GameVariant::DS, &mut rng()).unwrap();
        assert_eq!(request.age, None);
        assert_eq!(request.gender, None);
    }

    #[test]
    fn test_genome_and_export_conflict() {
        let args = RequestArgs {
            genome: Some(PathBuf::from("a.gen")),
            export: Some(PathBuf::from("b.creature")),
            ..args()
        };
        assert!(matches!(args.build(GameVariant::C3, &mut rng()), Err(RequestError::GenomeAndExport)));
    }

    #[test]
    fn test_invalid_age() {
        for age in [-1, 7, 300] {
            let args = RequestArgs { age: Some(age), ..args() };
            let err = args.build(GameVariant::C3, &mut rng()).unwrap_err();
            assert_eq!(err.code(), Some(1005));
        }
    }

    #[test]
    fn test_random_gender_resolves() {
        let args = RequestArgs { gender: Some("random".to_string()), ..args() };
        assert!(args.build(GameVariant::C3, &mut rng()).unwrap().gender.is_some());
    }

    #[test]
    fn test_invalid_gender_code() {
        let args = RequestArgs { gender: Some("x".to_string()), ..args() };
        assert_eq!(args.build(GameVariant::C3, &mut rng()).unwrap_err().code(), Some(1004));
    }

    #[test]
    fn test_missing_breeds_lists_parts() {
        let args = RequestArgs { breed: None, head: Some("n:a".to_string()), ..args() };
        match args.build(GameVariant::C2, &mut rng()) {
            Err(RequestError::MissingBreeds(parts)) => {
                assert_eq!(parts, vec!["body", "legs", "arms", "tail"])
            }
            other => panic!("expected missing breeds, got {:?}", other),
        }
    }

    #[test]
    fn test_breed_range_by_game() {
        let c1 = RequestArgs { breed: Some("n:a".to_string()), ..args() };
        let err = c1.build(GameVariant::C1, &mut rng()).unwrap_err();
        assert_eq!(err.code(), Some(1007));

        let c1 = RequestArgs { breed: Some("n:4".to_string()), ..args() };
        assert!(c1.build(GameVariant::C1, &mut rng()).is_ok());

        let c3 = RequestArgs { breed: Some("n:4".to_string()), ..args() };
        assert_eq!(c3.build(GameVariant::C3, &mut rng()).unwrap_err().code(), Some(1007));
    }

    #[test]
    fn test_empty_breed_key_fails_genus() {
        let args = RequestArgs { breed: Some("norn".to_string()), ..args() };
        assert_eq!(args.build(GameVariant::C3, &mut rng()).unwrap_err().code(), Some(1006));
    }

    #[test]
    fn test_bad_genus_code() {
        let args = RequestArgs { head: Some("q:a".to_string()), ..args() };
        assert_eq!(args.build(GameVariant::C3, &mut rng()).unwrap_err().code(), Some(1006));
    }

    #[test]
    fn test_colors() {
        let args = RequestArgs {
            tint: Some("rand".to_string()),
            swap: Some("200".to_string()),
            ..args()
        };
        let request = args.build(GameVariant::C3, &mut rng()).unwrap();
        assert!(request.random_colors);
        assert!(request.colors.red.is_some());
        assert_eq!(request.colors.swap, Some(200));
    }

    #[test]
    fn test_rotation_out_of_range() {
        let args = RequestArgs { rotation: Some("256".to_string()), ..args() };
        assert_eq!(args.build(GameVariant::C3, &mut rng()).unwrap_err().code(), Some(1010));
    }

    #[test]
    fn test_gene_variant_out_of_range_resets() {
        let too_high = RequestArgs { gene_variant: 12, ..args() };
        assert_eq!(too_high.build(GameVariant::C3, &mut rng()).unwrap().gene_variant, 0);
        let in_range = RequestArgs { gene_variant: 5, ..args() };
        assert_eq!(in_range.build(GameVariant::C3, &mut rng()).unwrap().gene_variant, 5);
    }

    #[test]
    fn test_scale_and_alpha_limits() {
        let scaled = RequestArgs { scale: 11, ..args() };
        assert!(matches!(scaled.build(GameVariant::C3, &mut rng()), Err(RequestError::InvalidScale(11))));
        let faded = RequestArgs { ghost_alpha: Some(1.5), ..args() };
        assert!(matches!(
            faded.build(GameVariant::C3, &mut rng()),
            Err(RequestError::InvalidGhostAlpha(_))
        ));
    }

    #[test]
    fn test_part_lists_collect_every_occurrence() {
        let args = RequestArgs {
            ghost: vec!["a,b".to_string(), "c".to_string()],
            hidden: vec!["mn".to_string()],
            ..args()
        };
        let request = args.build(GameVariant::C3, &mut rng()).unwrap();
        assert_eq!(request.ghost, vec!['a', 'b', 'c']);
        assert_eq!(request.hidden, vec!['m', 'n']);
    }

    #[test]
    fn test_resolve_request_poses() {
        let specs = resolve_request_poses(
            GameVariant::C3,
            &["left", "113122122111111=side"],
            Some(MoodArg::Fixed(Mood::Happy)),
            true,
            &mut rng(),
        )
        .unwrap();
        assert_eq!(specs.len(), 2);
        assert_eq!(specs[0].pose().body_facing, PoseFacing::ViewerLeft);
        assert!(specs.iter().all(|s| s.pose().mood == Mood::Happy && s.pose().eyes_closed));
        assert_eq!(specs[1].file_name(), Some("side"));
    }

    #[test]
    fn test_random_mood_is_shared() {
        let specs = resolve_request_poses(
            GameVariant::C1,
            &["left", "right", "front"],
            Some(MoodArg::Random),
            false,
            &mut rng(),
        )
        .unwrap();
        let mood = specs[0].pose().mood;
        assert!(GameVariant::C1.moods().contains(&mood));
        assert!(specs.iter().all(|s| s.pose().mood == mood));
    }

    #[test]
    fn test_no_poses_is_an_error() {
        let empty: [&str; 0] = [];
        let err = resolve_request_poses(GameVariant::C3, &empty, None, false, &mut rng()).unwrap_err();
        assert_eq!(err.code(), Some(1008));
    }

    #[test]
    fn test_bad_pose_code() {
        let err = resolve_request_poses(GameVariant::C3, &["1234"], None, false, &mut rng())
            .unwrap_err();
        assert_eq!(err.code(), Some(1009));
        assert!(err.to_string().starts_with("Error 1009: "));
    }

    #[test]
    fn test_finalize_placeholder_for_adult() {
        let mut rng = rng();
        let request = args().build(GameVariant::C3, &mut rng).unwrap();
        let specs =
            resolve_request_poses(GameVariant::C3, &["eemfoo", "left"], None, false, &mut rng).unwrap();
        let request = RenderRequest { age: Some(5), ..request };
        let poses = finalize_poses(specs, &request, &mut rng).unwrap();
        assert_eq!(poses[0].0.to_pose_string(), "113122122111111");
        assert_eq!(poses[1].0.body_facing, PoseFacing::ViewerLeft);
    }

    #[test]
    fn test_finalize_unknown_gender_is_shared() {
        use crate::pose::random::{FEMALE_PLACEHOLDER_POSES, MALE_PLACEHOLDER_POSES};

        for seed in 0..16 {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let args = RequestArgs {
                age: Some(1),
                gender: None,
                breed: None,
                export: Some(PathBuf::from("/tmp/creature.creature")),
                ..args()
            };
            let request = args.build(GameVariant::C3, &mut rng).unwrap();
            assert_eq!(request.gender, None);

            let tokens = ["eemfoo"; 8];
            let specs =
                resolve_request_poses(GameVariant::C3, &tokens, None, false, &mut rng).unwrap();
            let strings: Vec<String> = finalize_poses(specs, &request, &mut rng)
                .unwrap()
                .iter()
                .map(|(pose, _)| pose.to_pose_string())
                .collect();

            let all_in = |list: &[&str]| strings.iter().all(|s| list.contains(&s.as_str()));
            assert!(
                all_in(&FEMALE_PLACEHOLDER_POSES) || all_in(&MALE_PLACEHOLDER_POSES),
                "seed {}: mixed genders in {:?}",
                seed,
                strings
            );
        }
    }
}
