//! Tint, swap and rotation arguments
//!
//! Supports the following `--tint` formats:
//! - Components: `r:g:b`, each 0-255, random, or empty to leave unset
//! - Hex: `#RGB`, `#RRGGBB`, `RRGGBB`
//! - Random keywords: `rand`, `random`, `?`, `*`, `-1` (all three components random)
//!
//! `--swap` and `--rotation` take a single component value; 128 means no change.

use image::Rgba;
use rand::Rng;
use serde::Serialize;
use thiserror::Error;

use crate::variant::GameVariant;

/// Values meaning "pick at random".
pub const RANDOM_KEYWORDS: [&str; 5] = ["rand", "random", "?", "*", "-1"];

/// Component value that leaves a channel unchanged.
pub const NEUTRAL: u8 = 128;

/// Error type for color argument failures
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ColorError {
    /// More than three `:` separated tint components
    #[error("Too many color arguments for tint. Expected 3; Found: {0}")]
    TooManyComponents(usize),
    /// Component is not a number or random keyword
    #[error("Invalid {channel} color value. Expected int 0..255; Found: {value}")]
    NotANumber { channel: &'static str, value: String },
    /// Component is above 255
    #[error("Invalid {channel} color value <{value}>. Expected int 0..255")]
    OutOfRange { channel: &'static str, value: i64 },
}

/// A single color component as given on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Component {
    #[default]
    Unset,
    Random,
    Fixed(u8),
}

impl Component {
    pub fn is_random(self) -> bool {
        self == Component::Random
    }

    fn resolve<R: Rng + ?Sized>(self, rng: &mut R) -> Option<u8> {
        match self {
            Component::Unset => None,
            Component::Random => Some(rng.gen()),
            Component::Fixed(value) => Some(value),
        }
    }
}

/// Parse one component value for `channel` (used in error messages).
///
/// Negative numbers are treated as random.
pub fn parse_component(channel: &'static str, value: &str) -> Result<Component, ColorError> {
    let value = value.trim();
    if value.is_empty() {
        return Ok(Component::Unset);
    }
    if RANDOM_KEYWORDS.contains(&value.to_ascii_lowercase().as_str()) {
        return Ok(Component::Random);
    }
    let number: i64 = value
        .parse()
        .map_err(|_| ColorError::NotANumber { channel, value: value.to_string() })?;
    if number < 0 {
        return Ok(Component::Random);
    }
    u8::try_from(number)
        .map(Component::Fixed)
        .map_err(|_| ColorError::OutOfRange { channel, value: number })
}

/// Red, green and blue components of a `--tint` value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Tint {
    pub red: Component,
    pub green: Component,
    pub blue: Component,
}

impl Tint {
    pub fn is_random(&self) -> bool {
        self.red.is_random() || self.green.is_random() || self.blue.is_random()
    }
}

/// Expand `#RGB`, `#RRGGBB` or `RRGGBB` into `r:g:b`.
fn expand_hex(value: &str) -> Option<String> {
    let (hex, prefixed) = match value.strip_prefix('#') {
        Some(rest) => (rest, true),
        None => (value, false),
    };
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    let channels: Vec<u8> = match hex.len() {
        3 if prefixed => hex
            .chars()
            .map(|c| c.to_digit(16).map(|d| (d * 17) as u8))
            .collect::<Option<Vec<u8>>>()?,
        6 => (0..3)
            .map(|i| u8::from_str_radix(&hex[i * 2..i * 2 + 2], 16).ok())
            .collect::<Option<Vec<u8>>>()?,
        _ => return None,
    };
    Some(format!("{}:{}:{}", channels[0], channels[1], channels[2]))
}

/// Parse a `--tint` value.
///
/// # Examples
///
/// ```
/// use creature_render::color::{parse_tint, Component};
///
/// let tint = parse_tint("#ff8000").unwrap();
/// assert_eq!(tint.red, Component::Fixed(255));
/// assert_eq!(tint.green, Component::Fixed(128));
///
/// let tint = parse_tint("10::rand").unwrap();
/// assert_eq!(tint.green, Component::Unset);
/// assert_eq!(tint.blue, Component::Random);
/// ```
pub fn parse_tint(value: &str) -> Result<Tint, ColorError> {
    let trimmed = value.trim();
    let expanded = if RANDOM_KEYWORDS.contains(&trimmed.to_ascii_lowercase().as_str()) {
        "*:*:*".to_string()
    } else {
        expand_hex(trimmed).unwrap_or_else(|| trimmed.to_string())
    };

    let parts: Vec<&str> = expanded.split(':').collect();
    if parts.len() > 3 {
        return Err(ColorError::TooManyComponents(parts.len()));
    }
    let component = |index: usize, channel: &'static str| -> Result<Component, ColorError> {
        parts.get(index).map_or(Ok(Component::Unset), |part| parse_component(channel, part))
    };
    Ok(Tint { red: component(0, "red")?, green: component(1, "green")?, blue: component(2, "blue")? })
}

/// Concrete palette transform handed to the renderer.
///
/// Unset channels are left to the renderer (or to the genome, for backends
/// that read one).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct ColorTransform {
    pub red: Option<u8>,
    pub green: Option<u8>,
    pub blue: Option<u8>,
    pub swap: Option<u8>,
    pub rotation: Option<u8>,
    /// Game whose palette math applies; the render variant when unset
    pub variant: Option<GameVariant>,
}

impl ColorTransform {
    /// Replace random components with concrete values drawn from `rng`.
    pub fn resolve<R: Rng + ?Sized>(
        tint: Option<Tint>,
        swap: Component,
        rotation: Component,
        variant: Option<GameVariant>,
        rng: &mut R,
    ) -> ColorTransform {
        let tint = tint.unwrap_or_default();
        ColorTransform {
            red: tint.red.resolve(rng),
            green: tint.green.resolve(rng),
            blue: tint.blue.resolve(rng),
            swap: swap.resolve(rng),
            rotation: rotation.resolve(rng),
            variant,
        }
    }

    pub fn is_identity(&self) -> bool {
        [self.red, self.green, self.blue, self.swap, self.rotation]
            .iter()
            .all(|c| c.map_or(true, |v| v == NEUTRAL))
    }

    /// Tint as `r:g:b`, unset channels shown as neutral.
    pub fn tint_string(&self) -> String {
        format!(
            "{}:{}:{}",
            self.red.unwrap_or(NEUTRAL),
            self.green.unwrap_or(NEUTRAL),
            self.blue.unwrap_or(NEUTRAL)
        )
    }

    /// Approximate the transform on a single preview color.
    ///
    /// Tint scales each channel by `value / 128`; swap moves red toward blue
    /// (above 128) or blue toward red (below); rotation cycles r->g->b
    /// (above 128) or r<-g<-b (below).
    pub fn apply(&self, color: Rgba<u8>) -> Rgba<u8> {
        let scale = |c: u8, tint: Option<u8>| -> f32 {
            f32::from(c) * f32::from(tint.unwrap_or(NEUTRAL)) / f32::from(NEUTRAL)
        };
        let [r, g, b, a] = color.0;
        let (mut r, mut g, mut b) = (scale(r, self.red), scale(g, self.green), scale(b, self.blue));

        if let Some(swap) = self.swap {
            let weight = (f32::from(swap) - 128.0) / 128.0;
            if weight > 0.0 {
                let (r0, b0) = (r, b);
                r = r0 + (b0 - r0) * weight;
                b = b0 + (r0 - b0) * weight;
            } else if weight < 0.0 {
                let (r0, b0) = (r, b);
                b = b0 + (r0 - b0) * -weight;
                r = r0 + (b0 - r0) * -weight;
            }
        }

        if let Some(rotation) = self.rotation {
            let weight = (f32::from(rotation) - 128.0) / 128.0;
            let (r0, g0, b0) = (r, g, b);
            if weight > 0.0 {
                r = r0 + (b0 - r0) * weight;
                g = g0 + (r0 - g0) * weight;
                b = b0 + (g0 - b0) * weight;
            } else if weight < 0.0 {
                let w = -weight;
                r = r0 + (g0 - r0) * w;
                g = g0 + (b0 - g0) * w;
                b = b0 + (r0 - b0) * w;
            }
        }

        let clamp = |v: f32| v.round().clamp(0.0, 255.0) as u8;
        Rgba([clamp(r), clamp(g), clamp(b), a])
    }
}
