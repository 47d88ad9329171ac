//! Notes: the atomic musical event

use crate::msr::marks::{Articulation, Dynamics, Placement, Wedge};
use crate::msr::voice::MeasureLocation;
use crate::msr::Rational;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Step {
    A,
    B,
    C,
    D,
    E,
    F,
    G,
}

impl Step {
    pub fn from_musicxml(value: &str) -> Option<Self> {
        match value {
            "A" => Some(Step::A),
            "B" => Some(Step::B),
            "C" => Some(Step::C),
            "D" => Some(Step::D),
            "E" => Some(Step::E),
            "F" => Some(Step::F),
            "G" => Some(Step::G),
            _ => None,
        }
    }
}

/// Sounding pitch. `alter` is in semitones and may be fractional (microtones).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pitch {
    pub step: Step,
    pub alter: f32,
    pub octave: i32,
}

/// Staff position of a rest or an unpitched note
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayPosition {
    pub step: Step,
    pub octave: i32,
}

/// Disposition of a note inside its voice
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NoteKind {
    #[default]
    Standalone,
    Rest,
    /// Invisible rest produced by `<forward>`
    Skip,
    ChordMember,
    TupletMember,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TieKind {
    Start,
    Continue,
    Stop,
}

impl TieKind {
    pub fn from_musicxml(value: &str) -> Option<Self> {
        match value {
            "start" => Some(TieKind::Start),
            "continue" => Some(TieKind::Continue),
            "stop" => Some(TieKind::Stop),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SlurKind {
    Start,
    Continue,
    Stop,
}

impl SlurKind {
    pub fn from_musicxml(value: &str) -> Option<Self> {
        match value {
            "start" => Some(SlurKind::Start),
            "continue" => Some(SlurKind::Continue),
            "stop" => Some(SlurKind::Stop),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slur {
    pub kind: SlurKind,
    pub number: i32,
    pub placement: Option<Placement>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StemDirection {
    Up,
    Down,
    None,
    Double,
}

impl StemDirection {
    pub fn from_musicxml(value: &str) -> Option<Self> {
        match value {
            "up" => Some(StemDirection::Up),
            "down" => Some(StemDirection::Down),
            "none" => Some(StemDirection::None),
            "double" => Some(StemDirection::Double),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BeamKind {
    Begin,
    Continue,
    End,
    ForwardHook,
    BackwardHook,
}

impl BeamKind {
    pub fn from_musicxml(value: &str) -> Option<Self> {
        match value {
            "begin" => Some(BeamKind::Begin),
            "continue" => Some(BeamKind::Continue),
            "end" => Some(BeamKind::End),
            "forward hook" => Some(BeamKind::ForwardHook),
            "backward hook" => Some(BeamKind::BackwardHook),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Beam {
    /// Beam level, 1 for eighths, 2 for sixteenths, ...
    pub number: i32,
    pub kind: BeamKind,
}

/// One note or rest
///
/// Durations are whole-note fractions: `duration` is the sounding length,
/// `display_duration` the notated length (they differ inside tuplets).
/// `divisions` keeps the raw MusicXML `<duration>` value.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Note {
    pub input_line: usize,
    pub kind: NoteKind,
    /// `None` for rests and unpitched notes
    pub pitch: Option<Pitch>,
    pub display: Option<DisplayPosition>,
    pub rest: bool,
    pub unpitched: bool,
    pub grace: bool,
    pub divisions: i32,
    pub duration: Rational,
    pub display_duration: Rational,
    pub dots: u32,
    /// Graphic type as written ("quarter", "eighth", ...)
    pub note_type: Option<String>,
    pub tie: Option<TieKind>,
    /// One entry per slur number the note starts, continues or stops
    pub slurs: Vec<Slur>,
    pub stem: Option<StemDirection>,
    pub beams: Vec<Beam>,
    pub articulations: Vec<Articulation>,
    pub dynamics: Vec<Dynamics>,
    pub wedges: Vec<Wedge>,
    pub staff_number: i32,
    pub voice_number: i32,
    pub location: MeasureLocation,
}

impl Note {
    /// Invisible rest filling `duration` in a voice (from `<forward>`)
    pub fn skip(divisions: i32, duration: Rational, location: MeasureLocation, input_line: usize) -> Self {
        Self {
            input_line,
            kind: NoteKind::Skip,
            rest: true,
            divisions,
            duration,
            display_duration: duration,
            location,
            ..Self::default()
        }
    }

    pub fn is_rest(&self) -> bool {
        self.rest
    }

    /// Scale the notated duration by a tuplet's actual/normal ratio
    ///
    /// A triplet eighth sounds 1/12 but is notated 1/8: 1/12 * 3/2.
    pub fn apply_tuplet_ratio(&mut self, actual: i64, normal: i64) {
        if actual > 0 && normal > 0 {
            self.display_duration = self.duration * Rational::new(actual, normal);
        }
    }

    /// Move the note's attached marks out, leaving it bare
    pub fn take_marks(&mut self) -> (Vec<Articulation>, Vec<Dynamics>, Vec<Wedge>) {
        (
            std::mem::take(&mut self.articulations),
            std::mem::take(&mut self.dynamics),
            std::mem::take(&mut self.wedges),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tuplet_ratio_scales_display_duration() {
        let mut note = Note {
            duration: Rational::new(1, 12),
            display_duration: Rational::new(1, 12),
            ..Note::default()
        };
        note.apply_tuplet_ratio(3, 2);

        assert_eq!(note.display_duration, Rational::new(1, 8));
        assert_eq!(note.duration, Rational::new(1, 12));
    }

    #[test]
    fn test_skip_is_a_rest() {
        let skip = Note::skip(2, Rational::new(1, 2), MeasureLocation::default(), 7);
        assert!(skip.is_rest());
        assert_eq!(skip.kind, NoteKind::Skip);
        assert_eq!(skip.display_duration, Rational::new(1, 2));
    }

    #[test]
    fn test_beam_vocabulary() {
        assert_eq!(BeamKind::from_musicxml("forward hook"), Some(BeamKind::ForwardHook));
        assert_eq!(BeamKind::from_musicxml("sideways"), None);
    }
}
