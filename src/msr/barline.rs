//! Barlines, repeats and repeat endings
//!
//! MusicXML barlines do not nest: a repeat is only visible as a left
//! forward barline, optional ending brackets, and a right backward barline.
//! The translator classifies every barline into a [`BarlineCategory`] and
//! assembles [`Repeat`]s that own the voice-chunk segments they bracket.

use crate::msr::voice::{MeasureLocation, VoiceChunk};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BarlineLocation {
    Left,
    Middle,
    #[default]
    Right,
}

impl BarlineLocation {
    pub fn from_musicxml(value: &str) -> Option<Self> {
        match value {
            "left" => Some(BarlineLocation::Left),
            "middle" => Some(BarlineLocation::Middle),
            "right" => Some(BarlineLocation::Right),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BarStyle {
    Regular,
    Dotted,
    Dashed,
    Heavy,
    LightLight,
    LightHeavy,
    HeavyLight,
    HeavyHeavy,
    Tick,
    Short,
    None,
}

impl BarStyle {
    pub fn from_musicxml(value: &str) -> Option<Self> {
        match value {
            "regular" => Some(BarStyle::Regular),
            "dotted" => Some(BarStyle::Dotted),
            "dashed" => Some(BarStyle::Dashed),
            "heavy" => Some(BarStyle::Heavy),
            "light-light" => Some(BarStyle::LightLight),
            "light-heavy" => Some(BarStyle::LightHeavy),
            "heavy-light" => Some(BarStyle::HeavyLight),
            "heavy-heavy" => Some(BarStyle::HeavyHeavy),
            "tick" => Some(BarStyle::Tick),
            "short" => Some(BarStyle::Short),
            "none" => Some(BarStyle::None),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EndingType {
    Start,
    Stop,
    Discontinue,
}

impl EndingType {
    pub fn from_musicxml(value: &str) -> Option<Self> {
        match value {
            "start" => Some(EndingType::Start),
            "stop" => Some(EndingType::Stop),
            "discontinue" => Some(EndingType::Discontinue),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RepeatDirection {
    Forward,
    Backward,
}

impl RepeatDirection {
    pub fn from_musicxml(value: &str) -> Option<Self> {
        match value {
            "forward" => Some(RepeatDirection::Forward),
            "backward" => Some(RepeatDirection::Backward),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RepeatWinged {
    None,
    Straight,
    Curved,
    DoubleStraight,
    DoubleCurved,
}

impl RepeatWinged {
    pub fn from_musicxml(value: &str) -> Option<Self> {
        match value {
            "none" => Some(RepeatWinged::None),
            "straight" => Some(RepeatWinged::Straight),
            "curved" => Some(RepeatWinged::Curved),
            "double-straight" => Some(RepeatWinged::DoubleStraight),
            "double-curved" => Some(RepeatWinged::DoubleCurved),
            _ => None,
        }
    }
}

/// Role of a barline in repeat structure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BarlineCategory {
    #[default]
    Standalone,
    RepeatStart,
    RepeatEnd,
    HookedEndingEnd,
    HooklessEndingEnd,
    EndingStart,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Barline {
    pub input_line: usize,
    pub location: BarlineLocation,
    pub style: Option<BarStyle>,
    pub ending_type: Option<EndingType>,
    /// Ending numbers as written, e.g. "1, 2"
    pub ending_number: String,
    pub repeat_direction: Option<RepeatDirection>,
    pub repeat_winged: Option<RepeatWinged>,
    pub category: BarlineCategory,
    /// Synthesized by the translator, absent from the source
    pub implicit: bool,
    pub measure_location: MeasureLocation,
}

impl Barline {
    /// Repeat start assumed at the beginning of a piece whose opening
    /// forward repeat barline was omitted
    pub fn implicit_repeat_start(measure_location: MeasureLocation, input_line: usize) -> Self {
        Self {
            input_line,
            location: BarlineLocation::Left,
            style: Some(BarStyle::HeavyLight),
            repeat_direction: Some(RepeatDirection::Forward),
            category: BarlineCategory::RepeatStart,
            implicit: true,
            measure_location,
            ..Self::default()
        }
    }

    /// Classify by location, repeat direction and ending type
    pub fn classify(&self) -> BarlineCategory {
        use BarlineLocation::{Left, Right};

        match (self.location, self.repeat_direction, self.ending_type) {
            (Left, Some(RepeatDirection::Forward), _) => BarlineCategory::RepeatStart,
            (Right, Some(RepeatDirection::Backward), Some(EndingType::Stop)) => {
                BarlineCategory::HookedEndingEnd
            }
            (Right, Some(RepeatDirection::Backward), None) => BarlineCategory::RepeatEnd,
            (Left, None, Some(EndingType::Start)) => BarlineCategory::EndingStart,
            (Right, None, Some(EndingType::Discontinue)) => BarlineCategory::HooklessEndingEnd,
            _ => BarlineCategory::Standalone,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RepeatEndingKind {
    Hooked,
    Hookless,
}

/// One volta bracket and the music under it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RepeatEnding {
    pub input_line: usize,
    pub number: String,
    pub kind: RepeatEndingKind,
    pub chunk: VoiceChunk,
}

/// A repeated section: the common body plus its endings, in order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Repeat {
    pub input_line: usize,
    pub body: VoiceChunk,
    pub endings: Vec<RepeatEnding>,
    /// The start barline was synthesized rather than read
    pub implicit_start: bool,
}
