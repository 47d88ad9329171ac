//! Clef, key and time signatures
//!
//! These are carried by parts (as the "current" value inherited by new
//! staves) and by staves (possibly overridden per staff).

use serde::{Deserialize, Serialize};

// ============================================================================
// CLEF
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClefSign {
    G,
    F,
    C,
    Percussion,
    Tab,
    Jianpu,
    None,
}

impl ClefSign {
    pub fn from_musicxml(value: &str) -> Option<Self> {
        match value {
            "G" => Some(ClefSign::G),
            "F" => Some(ClefSign::F),
            "C" => Some(ClefSign::C),
            "percussion" => Some(ClefSign::Percussion),
            "TAB" => Some(ClefSign::Tab),
            "jianpu" => Some(ClefSign::Jianpu),
            "none" => Some(ClefSign::None),
            _ => None,
        }
    }

    /// Staff line the sign sits on when `<line>` is absent
    pub fn default_line(self) -> i32 {
        match self {
            ClefSign::G => 2,
            ClefSign::F => 4,
            ClefSign::C => 3,
            _ => 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Clef {
    pub sign: ClefSign,
    pub line: i32,
    pub octave_change: i32,
    pub input_line: usize,
}

impl Clef {
    pub fn new(sign: ClefSign, line: Option<i32>, octave_change: i32, input_line: usize) -> Self {
        Self {
            sign,
            line: line.unwrap_or_else(|| sign.default_line()),
            octave_change,
            input_line,
        }
    }
}

// ============================================================================
// KEY
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KeyMode {
    Major,
    Minor,
    Ionian,
    Dorian,
    Phrygian,
    Lydian,
    Mixolydian,
    Aeolian,
    Locrian,
    None,
}

impl KeyMode {
    pub fn from_musicxml(value: &str) -> Option<Self> {
        match value {
            "major" => Some(KeyMode::Major),
            "minor" => Some(KeyMode::Minor),
            "ionian" => Some(KeyMode::Ionian),
            "dorian" => Some(KeyMode::Dorian),
            "phrygian" => Some(KeyMode::Phrygian),
            "lydian" => Some(KeyMode::Lydian),
            "mixolydian" => Some(KeyMode::Mixolydian),
            "aeolian" => Some(KeyMode::Aeolian),
            "locrian" => Some(KeyMode::Locrian),
            "none" => Some(KeyMode::None),
            _ => None,
        }
    }
}

/// Traditional key signature: sharps (positive) or flats (negative)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Key {
    pub fifths: i32,
    pub mode: KeyMode,
    /// Fifths of the key being cancelled, if any
    pub cancel: Option<i32>,
    pub input_line: usize,
}

impl Key {
    pub fn new(fifths: i32, mode: KeyMode, cancel: Option<i32>, input_line: usize) -> Self {
        Self { fifths, mode, cancel, input_line }
    }
}

// ============================================================================
// TIME
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TimeSymbol {
    Common,
    Cut,
    SingleNumber,
    Note,
    DottedNote,
    Normal,
}

impl TimeSymbol {
    pub fn from_musicxml(value: &str) -> Option<Self> {
        match value {
            "common" => Some(TimeSymbol::Common),
            "cut" => Some(TimeSymbol::Cut),
            "single-number" => Some(TimeSymbol::SingleNumber),
            "note" => Some(TimeSymbol::Note),
            "dotted-note" => Some(TimeSymbol::DottedNote),
            "normal" => Some(TimeSymbol::Normal),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Time {
    /// Beats as written, e.g. "3" or "3+2"
    pub beats: String,
    pub beat_type: i32,
    pub senza_misura: bool,
    pub symbol: Option<TimeSymbol>,
    pub input_line: usize,
}

impl Time {
    pub fn new(
        beats: impl Into<String>,
        beat_type: i32,
        senza_misura: bool,
        symbol: Option<TimeSymbol>,
        input_line: usize,
    ) -> Self {
        Self {
            beats: beats.into(),
            beat_type,
            senza_misura,
            symbol,
            input_line,
        }
    }

    /// Total beat count, summing composite beats such as "3+2"
    ///
    /// Returns `None` when a component is not a number.
    pub fn beats_count(&self) -> Option<i32> {
        self.beats
            .split('+')
            .map(|part| part.trim().parse::<i32>().ok())
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clef_default_lines() {
        assert_eq!(Clef::new(ClefSign::G, None, 0, 1).line, 2);
        assert_eq!(Clef::new(ClefSign::F, None, 0, 1).line, 4);
        assert_eq!(Clef::new(ClefSign::C, Some(4), 0, 1).line, 4);
    }

    #[test]
    fn test_composite_beats() {
        let time = Time::new("3+2", 8, false, None, 1);
        assert_eq!(time.beats_count(), Some(5));

        let odd = Time::new("x", 4, false, None, 1);
        assert_eq!(odd.beats_count(), None);
    }

    #[test]
    fn test_unknown_vocabulary_is_rejected() {
        assert_eq!(ClefSign::from_musicxml("H"), None);
        assert_eq!(KeyMode::from_musicxml("blues"), None);
        assert_eq!(TimeSymbol::from_musicxml("cut"), Some(TimeSymbol::Cut));
    }
}
