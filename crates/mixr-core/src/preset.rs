//! Built-in mixing presets.
//!
//! A preset is a named instruction that goes through the interpreter like
//! any typed instruction would.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MixPreset {
    pub id: String,
    pub name: String,
    pub prompt: String,
}

impl MixPreset {
    fn new(id: &str, name: &str, prompt: &str) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            prompt: prompt.to_string(),
        }
    }
}

/// Returns the system-defined presets.
pub fn get_default_presets() -> Vec<MixPreset> {
    vec![
        MixPreset::new(
            "vocal_presence",
            "Vocal Presence",
            "boost mids slightly, add clarity, light compression",
        ),
        MixPreset::new(
            "warm_vintage",
            "Warm Vintage",
            "make it warmer, add subtle saturation, roll off highs",
        ),
        MixPreset::new(
            "modern_pop",
            "Modern Pop",
            "bright and punchy, tight bass, wide stereo",
        ),
        MixPreset::new("lo_fi", "Lo-Fi", "cut highs, add warmth, subtle room reverb"),
        MixPreset::new(
            "radio_ready",
            "Radio Ready",
            "master for streaming, loud and clear",
        ),
        MixPreset::new(
            "cinematic",
            "Cinematic",
            "big hall reverb, wide stereo, dramatic compression",
        ),
    ]
}

/// Looks a preset up by id or case-insensitive name.
pub fn find_preset(key: &str) -> Option<MixPreset> {
    let key = key.trim().to_lowercase();
    get_default_presets()
        .into_iter()
        .find(|preset| preset.id == key || preset.name.to_lowercase() == key)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interpreter::CommandInterpreter;

    #[test]
    fn test_every_preset_is_actionable() {
        let interpreter = CommandInterpreter::default();
        for preset in get_default_presets() {
            assert!(
                interpreter.parse(&preset.prompt).is_actionable(),
                "{} produced nothing",
                preset.id
            );
        }
    }

    #[test]
    fn test_find_preset_by_id_or_name() {
        assert_eq!(find_preset("lo_fi").unwrap().name, "Lo-Fi");
        assert_eq!(find_preset("Radio Ready").unwrap().id, "radio_ready");
        assert!(find_preset("polka").is_none());
    }
}
