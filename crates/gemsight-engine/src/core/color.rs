use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// An 8-bit RGB color sampled from the screen.
///
/// Colors are plain values: every operation returns a new `Color`.
/// They serialize as `#rrggbb` hex strings.
///
/// # Example
///
/// ```
/// use gemsight_engine::{Color, Tolerance};
///
/// let ruby = Color::new(200, 20, 40);
/// let noisy_ruby = Color::new(208, 14, 40);
///
/// assert!(ruby.matches(noisy_ruby, Tolerance::new(15)));
/// assert!(!ruby.matches(noisy_ruby, Tolerance::new(8)));
/// assert_eq!(ruby.to_string(), "#c81428");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, derive_more::Display)]
#[display("#{r:02x}{g:02x}{b:02x}")]
pub struct Color {
    r: u8,
    g: u8,
    b: u8,
}

impl Color {
    pub const BLACK: Self = Self::new(0, 0, 0);

    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    #[must_use]
    pub const fn r(self) -> u8 {
        self.r
    }

    #[must_use]
    pub const fn g(self) -> u8 {
        self.g
    }

    #[must_use]
    pub const fn b(self) -> u8 {
        self.b
    }

    #[must_use]
    pub const fn channels(self) -> [u8; 3] {
        [self.r, self.g, self.b]
    }

    /// Classifies two colors as the same gem color under `tolerance`.
    ///
    /// Every channel must differ by strictly less than the tolerance. A channel
    /// difference equal to the tolerance does not match.
    ///
    /// The relation is symmetric, and monotonic in the tolerance: a pair that
    /// matches at `t` also matches at any larger tolerance.
    #[must_use]
    pub fn matches(self, other: Color, tolerance: Tolerance) -> bool {
        self.channels()
            .into_iter()
            .zip(other.channels())
            .all(|(a, b)| u16::from(a.abs_diff(b)) < tolerance.get())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("invalid color {input:?}: expected `#rrggbb`")]
pub struct ParseColorError {
    input: String,
}

impl FromStr for Color {
    type Err = ParseColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseColorError {
            input: s.to_owned(),
        };
        let hex = s.strip_prefix('#').ok_or_else(err)?;
        if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(err());
        }
        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| err());
        Ok(Self::new(channel(0)?, channel(2)?, channel(4)?))
    }
}

impl Serialize for Color {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Color {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Per-channel color difference threshold.
///
/// Stored as `u16` so that `256` is representable: at that tolerance every pair
/// of 8-bit colors matches.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Default,
    Serialize,
    Deserialize,
    derive_more::Display,
)]
#[serde(transparent)]
pub struct Tolerance(u16);

impl Tolerance {
    #[must_use]
    pub const fn new(value: u16) -> Self {
        Self(value)
    }

    #[must_use]
    pub const fn get(self) -> u16 {
        self.0
    }

    /// Adds `step`, never going past `ceiling`.
    #[must_use]
    pub fn raised_by(self, step: Tolerance, ceiling: Tolerance) -> Self {
        Self(self.0.saturating_add(step.0)).min(ceiling)
    }
}
