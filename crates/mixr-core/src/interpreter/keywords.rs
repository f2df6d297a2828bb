//! Keyword tables for instruction classification.
//!
//! The table is an immutable value: build it once with
//! [`KeywordTable::standard`] and share it by reference between parses.

use crate::operation::OperationKind;
use regex::Regex;

/// A keyword family. Each local family yields at most one operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Family {
    Tonal,
    Dynamics,
    Spatial,
    Level,
    Width,
    Mastering,
    Style,
}

impl Family {
    /// Evaluation order of the local families. Operations always come out in
    /// this order, whatever order the phrases had in the instruction.
    pub const EVALUATION_ORDER: [Family; 6] = [
        Family::Tonal,
        Family::Dynamics,
        Family::Spatial,
        Family::Level,
        Family::Width,
        Family::Mastering,
    ];

    pub fn kind(&self) -> OperationKind {
        match self {
            Self::Tonal => OperationKind::Equalize,
            Self::Dynamics => OperationKind::Compress,
            Self::Spatial => OperationKind::Reverb,
            Self::Level => OperationKind::Volume,
            Self::Width => OperationKind::StereoWidth,
            Self::Mastering => OperationKind::Master,
            Self::Style => OperationKind::StyleChange,
        }
    }
}

#[derive(Debug, Clone)]
pub struct KeywordFamily {
    pub family: Family,
    pub keywords: Vec<&'static str>,
}

impl KeywordFamily {
    fn new(family: Family, keywords: &[&'static str]) -> Self {
        Self {
            family,
            keywords: keywords.to_vec(),
        }
    }

    /// True when any keyword is a substring of the lower-cased text.
    pub fn matches(&self, lowered: &str) -> bool {
        self.keywords.iter().any(|kw| lowered.contains(kw))
    }
}

/// Read-only classification configuration shared by all interpreter calls.
#[derive(Debug, Clone)]
pub struct KeywordTable {
    families: Vec<KeywordFamily>,
    style: KeywordFamily,
    db_token: Regex,
}

impl KeywordTable {
    pub fn standard() -> Self {
        let families = vec![
            KeywordFamily::new(
                Family::Tonal,
                &[
                    "eq",
                    "equalizer",
                    "bass",
                    "treble",
                    "mid",
                    "mids",
                    "highs",
                    "lows",
                    "frequency",
                    "frequencies",
                    "bright",
                    "dark",
                    "warm",
                    "muddy",
                    "crisp",
                ],
            ),
            KeywordFamily::new(
                Family::Dynamics,
                &[
                    "compress",
                    "compression",
                    "compressor",
                    "dynamics",
                    "punch",
                    "punchy",
                    "squash",
                    "glue",
                    "thick",
                ],
            ),
            KeywordFamily::new(
                Family::Spatial,
                &[
                    "reverb",
                    "room",
                    "hall",
                    "space",
                    "ambient",
                    "wet",
                    "dry",
                    "atmosphere",
                    "depth",
                ],
            ),
            KeywordFamily::new(
                Family::Level,
                &[
                    "volume",
                    "level",
                    "loud",
                    "quiet",
                    "gain",
                    "boost",
                    "cut",
                    "turn up",
                    "turn down",
                    "turn it up",
                    "turn it down",
                    "louder",
                    "softer",
                ],
            ),
            KeywordFamily::new(
                Family::Width,
                &["stereo", "width", "wide", "narrow", "mono", "spread"],
            ),
            KeywordFamily::new(
                Family::Mastering,
                &[
                    "master",
                    "mastering",
                    "finalize",
                    "polish",
                    "streaming",
                    "spotify",
                    "release",
                    "final",
                ],
            ),
        ];

        let style = KeywordFamily::new(
            Family::Style,
            &[
                "style",
                "genre",
                "vibe",
                "feel",
                "mood",
                "sound like",
                "similar to",
                "remake",
                "reimagine",
                "version",
            ],
        );

        Self {
            families,
            style,
            db_token: Regex::new(r"([+-]?\d+(?:\.\d+)?)\s*db\b").expect("static dB pattern"),
        }
    }

    /// Local families in evaluation order.
    pub fn families(&self) -> &[KeywordFamily] {
        &self.families
    }

    pub fn style(&self) -> &KeywordFamily {
        &self.style
    }

    /// First `N db` token in the lower-cased text, with whether it was signed.
    pub fn db_token(&self, lowered: &str) -> Option<(f64, bool)> {
        let caps = self.db_token.captures(lowered)?;
        let raw = caps.get(1)?.as_str();
        let value = raw.parse::<f64>().ok()?;
        let signed = raw.starts_with('+') || raw.starts_with('-');
        Some((value, signed))
    }
}

impl Default for KeywordTable {
    fn default() -> Self {
        Self::standard()
    }
}
