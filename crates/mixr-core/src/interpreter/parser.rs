//! Free-text instruction to typed operations.

use super::keywords::{Family, KeywordTable};
use crate::error::{MixError, Result};
use crate::operation::{
    CompressParams, EqParams, Operation, ReverbParams, VolumeParams, WidthParams,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// The interpretation of one instruction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParseResult {
    /// The instruction exactly as given
    pub original_text: String,
    /// Operations in application order; a `StyleChange`, if any, is last
    pub operations: Vec<Operation>,
    /// At least one locally executable operation is present
    pub requires_audio_processing: bool,
    /// A style change was detected and needs external regeneration
    pub requires_style_regeneration: bool,
}

impl ParseResult {
    /// False when the text produced no actionable interpretation.
    pub fn is_actionable(&self) -> bool {
        self.requires_audio_processing || self.requires_style_regeneration
    }

    /// Returns `AmbiguousInstruction` for a non-actionable result.
    pub fn require_actionable(&self) -> Result<&Self> {
        if self.is_actionable() {
            Ok(self)
        } else {
            Err(MixError::ambiguous(&self.original_text))
        }
    }

    /// Operations the audio engine can execute, in order.
    pub fn local_operations(&self) -> impl Iterator<Item = &Operation> {
        self.operations.iter().filter(|op| op.is_local())
    }

    pub fn style_prompt(&self) -> Option<&str> {
        self.operations.iter().find_map(|op| match op {
            Operation::StyleChange { prompt } => Some(prompt.as_str()),
            _ => None,
        })
    }
}

/// Classifies mixing instructions into typed operations.
///
/// Families are evaluated in a fixed order and never short-circuit: one
/// instruction may yield an operation per matching family.
#[derive(Debug, Clone, Default)]
pub struct CommandInterpreter {
    table: Arc<KeywordTable>,
}

impl CommandInterpreter {
    pub fn new(table: Arc<KeywordTable>) -> Self {
        Self { table }
    }

    pub fn table(&self) -> &KeywordTable {
        &self.table
    }

    pub fn parse(&self, text: &str) -> ParseResult {
        let lowered = text.to_lowercase();
        let mut operations = Vec::new();

        for family in self.table.families() {
            if !family.matches(&lowered) {
                continue;
            }
            let operation = match family.family {
                Family::Tonal => Operation::Equalize(refine_eq(&lowered)),
                Family::Dynamics => Operation::Compress(refine_compression(&lowered)),
                Family::Spatial => Operation::Reverb(refine_reverb(&lowered)),
                Family::Level => Operation::Volume(self.refine_volume(&lowered)),
                Family::Width => Operation::StereoWidth(refine_width(&lowered)),
                Family::Mastering => Operation::Master,
                Family::Style => continue,
            };
            operations.push(operation);
        }

        let requires_audio_processing = !operations.is_empty();
        let requires_style_regeneration = self.table.style().matches(&lowered);
        if requires_style_regeneration {
            operations.push(Operation::StyleChange {
                prompt: text.to_string(),
            });
        }

        tracing::debug!(
            operations = operations.len(),
            style = requires_style_regeneration,
            "[Interpreter] Parsed instruction"
        );

        ParseResult {
            original_text: text.to_string(),
            operations,
            requires_audio_processing,
            requires_style_regeneration,
        }
    }

    fn refine_volume(&self, text: &str) -> VolumeParams {
        let direction = if contains_any(text, &["much louder"]) {
            VolumeParams::STRONG_STEP_DB
        } else if contains_any(text, &["much quieter"]) {
            -VolumeParams::STRONG_STEP_DB
        } else if contains_any(text, &["louder", "turn up", "turn it up", "boost"]) {
            VolumeParams::QUALITATIVE_STEP_DB
        } else if contains_any(text, &["quieter", "softer", "turn down", "reduce", "down"]) {
            -VolumeParams::QUALITATIVE_STEP_DB
        } else {
            0.0
        };

        let delta_db = match self.table.db_token(text) {
            Some((value, true)) => value,
            Some((value, false)) if direction < 0.0 => -value,
            Some((value, false)) => value,
            None => direction,
        };

        VolumeParams { delta_db }
    }
}

fn contains_any(text: &str, phrases: &[&str]) -> bool {
    phrases.iter().any(|phrase| text.contains(phrase))
}

fn refine_eq(text: &str) -> EqParams {
    let mut params = EqParams::default();

    // "warm" is the one cue that moves two bands at once
    if contains_any(text, &["more bass", "boost bass", "add bass"]) {
        params.bass_db = 4.0;
    } else if contains_any(text, &["less bass", "cut bass", "reduce bass"]) {
        params.bass_db = -4.0;
    } else if text.contains("warm") {
        params.bass_db = 2.0;
        params.treble_db = -1.0;
    }

    if contains_any(text, &["more treble", "brighter", "crisp", "bright"]) {
        params.treble_db = 3.0;
    } else if contains_any(text, &["less treble", "dark"]) {
        params.treble_db = -3.0;
    }

    if contains_any(text, &["more mids", "boost mids"]) {
        params.mid_db = 3.0;
    } else if contains_any(text, &["less mids", "scoop"]) {
        params.mid_db = -4.0;
    } else if contains_any(text, &["muddy", "clear"]) {
        params.mid_db = -2.0;
        params.treble_db = 2.0;
    }

    params
}

fn refine_compression(text: &str) -> CompressParams {
    let mut params = CompressParams::default();

    if contains_any(text, &["heavy", "squash"]) {
        params.ratio = 8.0;
        params.threshold_db = -25.0;
    } else if contains_any(text, &["light", "gentle"]) {
        params.ratio = 2.0;
        params.threshold_db = -15.0;
    } else if text.contains("punch") {
        params.attack_ms = 20.0;
    } else if text.contains("glue") {
        params.ratio = 2.0;
        params.threshold_db = -10.0;
    }

    params
}

fn refine_reverb(text: &str) -> ReverbParams {
    let mut params = ReverbParams::default();

    if contains_any(text, &["hall", "large", "big"]) {
        params.room_size = 0.9;
        params.wet = 0.4;
    } else if contains_any(text, &["room", "small"]) {
        params.room_size = 0.3;
        params.wet = 0.2;
    } else if text.contains("plate") {
        params.room_size = 0.6;
        params.damping = 0.3;
    }

    if contains_any(text, &["wet", "lots of", "more reverb"]) {
        params.wet = 0.5;
    } else if contains_any(text, &["dry", "subtle", "less reverb"]) {
        params.wet = 0.15;
    }

    params.clamped()
}

fn refine_width(text: &str) -> WidthParams {
    if text.contains("very wide") {
        WidthParams::new(2.0)
    } else if contains_any(text, &["wider", "wide", "spread"]) {
        WidthParams::new(1.5)
    } else if contains_any(text, &["narrow", "mono", "centered"]) {
        WidthParams::new(0.5)
    } else {
        WidthParams::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::operation::OperationKind;

    fn parse(text: &str) -> ParseResult {
        CommandInterpreter::default().parse(text)
    }

    fn kinds(result: &ParseResult) -> Vec<OperationKind> {
        result.operations.iter().map(Operation::kind).collect()
    }

    #[test]
    fn test_brighter_and_reverb() {
        let result = parse("make it brighter and add some reverb");
        assert_eq!(
            result.operations,
            vec![
                Operation::Equalize(EqParams {
                    bass_db: 0.0,
                    mid_db: 0.0,
                    treble_db: 3.0,
                }),
                Operation::Reverb(ReverbParams::default()),
            ]
        );
        assert!(result.requires_audio_processing);
        assert!(!result.requires_style_regeneration);
    }

    #[test]
    fn test_order_ignores_phrase_order() {
        let a = parse("make it brighter and add some reverb");
        let b = parse("add some reverb and make it brighter");
        assert_eq!(a.operations, b.operations);
    }

    #[test]
    fn test_ambiguous_text() {
        let result = parse("hello there");
        assert!(result.operations.is_empty());
        assert!(!result.requires_audio_processing);
        assert!(!result.requires_style_regeneration);
        assert!(!result.is_actionable());
        assert!(result.require_actionable().unwrap_err().is_ambiguous());
    }

    #[test]
    fn test_explicit_db_overrides_qualitative_volume() {
        let result = parse("turn it down 7db");
        assert_eq!(
            result.operations,
            vec![Operation::Volume(VolumeParams { delta_db: -7.0 })]
        );

        let result = parse("make it louder, +2 db");
        assert_eq!(
            result.operations,
            vec![Operation::Volume(VolumeParams { delta_db: 2.0 })]
        );

        let result = parse("volume -4db");
        assert_eq!(
            result.operations,
            vec![Operation::Volume(VolumeParams { delta_db: -4.0 })]
        );
    }

    #[test]
    fn test_qualitative_volume_defaults() {
        assert_eq!(
            parse("make it quieter").operations,
            vec![Operation::Volume(VolumeParams { delta_db: -3.0 })]
        );
        assert_eq!(
            parse("much louder please").operations,
            vec![Operation::Volume(VolumeParams { delta_db: 6.0 })]
        );
    }

    #[test]
    fn test_warm_nudges_bass_and_treble() {
        let result = parse("make it warmer");
        assert_eq!(
            result.operations,
            vec![Operation::Equalize(EqParams {
                bass_db: 2.0,
                mid_db: 0.0,
                treble_db: -1.0,
            })]
        );
    }

    #[test]
    fn test_heavy_compression() {
        let result = parse("heavy compression");
        match &result.operations[..] {
            [Operation::Compress(p)] => {
                assert_eq!(p.ratio, 8.0);
                assert_eq!(p.threshold_db, -25.0);
                assert_eq!(p.attack_ms, 5.0);
            }
            other => panic!("unexpected operations: {:?}", other),
        }
    }

    #[test]
    fn test_hall_reverb() {
        let result = parse("add hall reverb");
        assert_eq!(
            result.operations,
            vec![Operation::Reverb(ReverbParams {
                room_size: 0.9,
                damping: 0.5,
                wet: 0.4,
            })]
        );
    }

    #[test]
    fn test_multiple_families_follow_fixed_order() {
        let result = parse("master it, make it wider, more bass and heavy compression");
        assert_eq!(
            kinds(&result),
            vec![
                OperationKind::Equalize,
                OperationKind::Compress,
                OperationKind::StereoWidth,
                OperationKind::Master,
            ]
        );
    }

    #[test]
    fn test_style_coexists_with_local_operations() {
        let text = "Make it sound like 80s synthwave with more reverb";
        let result = parse(text);
        assert!(result.requires_style_regeneration);
        assert!(result.requires_audio_processing);
        assert_eq!(
            kinds(&result),
            vec![OperationKind::Reverb, OperationKind::StyleChange]
        );
        assert_eq!(result.style_prompt(), Some(text));
        assert_eq!(result.local_operations().count(), 1);
    }

    #[test]
    fn test_style_only() {
        let result = parse("change the genre to jazz");
        assert!(result.requires_style_regeneration);
        assert!(!result.requires_audio_processing);
        assert!(result.is_actionable());
        assert_eq!(result.local_operations().count(), 0);
    }

    #[test]
    fn test_width_cues() {
        assert_eq!(
            parse("make it very wide").operations,
            vec![Operation::StereoWidth(WidthParams::new(2.0))]
        );
        assert_eq!(
            parse("narrow the stereo image").operations,
            vec![Operation::StereoWidth(WidthParams::new(0.5))]
        );
    }

    #[test]
    fn test_case_insensitive() {
        assert_eq!(parse("ADD REVERB").operations, parse("add reverb").operations);
    }
}
