//! Element interface consumed by the translator
//!
//! The translator never touches the XML tree directly: it sees elements
//! through `MusicXmlElement` (tag, input line, attributes, text value) and
//! dispatches on the closed `ElementKind` vocabulary. Unknown tags have no
//! kind and are skipped by the browser.

use crate::msr::{ArticulationKind, DynamicsKind};
use roxmltree::Node;

/// Read-only view of one XML element
pub trait MusicXmlElement {
    fn tag(&self) -> &str;

    /// 1-based line of the element's start tag
    fn input_line(&self) -> usize;

    fn attribute(&self, name: &str) -> Option<&str>;

    /// Trimmed text content, empty when the element has none
    fn value(&self) -> &str;

    fn int_value(&self) -> Option<i32> {
        self.value().parse().ok()
    }

    fn float_value(&self) -> Option<f64> {
        self.value().parse().ok()
    }

    fn int_attribute(&self, name: &str) -> Option<i32> {
        self.attribute(name).and_then(|value| value.trim().parse().ok())
    }

    fn float_attribute(&self, name: &str) -> Option<f64> {
        self.attribute(name).and_then(|value| value.trim().parse().ok())
    }

    /// MusicXML yes-no attribute
    fn yes_attribute(&self, name: &str) -> bool {
        self.attribute(name) == Some("yes")
    }
}

impl<'a, 'input> MusicXmlElement for Node<'a, 'input> {
    fn tag(&self) -> &str {
        self.tag_name().name()
    }

    fn input_line(&self) -> usize {
        self.document().text_pos_at(self.range().start).row as usize
    }

    fn attribute(&self, name: &str) -> Option<&str> {
        Node::attribute(self, name)
    }

    fn value(&self) -> &str {
        self.text().map(str::trim).unwrap_or("")
    }
}

/// Every MusicXML element the translator reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementKind {
    ScorePartwise,

    // identification
    WorkNumber,
    WorkTitle,
    MovementNumber,
    MovementTitle,
    Creator,
    Rights,
    Software,
    EncodingDate,

    // defaults
    Millimeters,
    Tenths,
    PageHeight,
    PageWidth,
    LeftMargin,
    RightMargin,
    TopMargin,
    BottomMargin,
    SystemDistance,
    TopSystemDistance,

    // part list
    PartList,
    PartGroup,
    GroupName,
    GroupAbbreviation,
    GroupSymbol,
    GroupBarline,
    ScorePart,
    PartName,
    PartAbbreviation,
    InstrumentName,

    // part structure
    Part,
    Measure,
    Print,

    // attributes
    Divisions,
    Staves,
    Clef,
    Sign,
    Line,
    ClefOctaveChange,
    Key,
    Cancel,
    Fifths,
    Mode,
    Time,
    Beats,
    BeatType,
    SenzaMisura,

    // context-dependent
    Staff,
    Voice,
    Duration,

    // directions
    Direction,
    Words,
    Metronome,
    BeatUnit,
    BeatUnitDot,
    PerMinute,
    Dynamics(DynamicsKind),
    Wedge,

    // cursor motion
    Backup,
    Forward,

    // barlines
    Barline,
    BarStyle,
    Ending,
    Repeat,

    // notes
    Note,
    Step,
    Alter,
    Octave,
    DisplayStep,
    DisplayOctave,
    Rest,
    Unpitched,
    Grace,
    Chord,
    Dot,
    Type,
    Stem,
    Beam,
    Tie,
    Tied,
    Slur,
    TimeModification,
    ActualNotes,
    NormalNotes,
    NormalType,
    Tuplet,
    Articulation(ArticulationKind),

    // lyrics
    Lyric,
    Syllabic,
    Text,
    Elision,
}

impl ElementKind {
    pub fn from_tag(tag: &str) -> Option<Self> {
        use ElementKind::*;

        let kind = match tag {
            "score-partwise" => ScorePartwise,

            "work-number" => WorkNumber,
            "work-title" => WorkTitle,
            "movement-number" => MovementNumber,
            "movement-title" => MovementTitle,
            "creator" => Creator,
            "rights" => Rights,
            "software" => Software,
            "encoding-date" => EncodingDate,

            "millimeters" => Millimeters,
            "tenths" => Tenths,
            "page-height" => PageHeight,
            "page-width" => PageWidth,
            "left-margin" => LeftMargin,
            "right-margin" => RightMargin,
            "top-margin" => TopMargin,
            "bottom-margin" => BottomMargin,
            "system-distance" => SystemDistance,
            "top-system-distance" => TopSystemDistance,

            "part-list" => PartList,
            "part-group" => PartGroup,
            "group-name" => GroupName,
            "group-abbreviation" => GroupAbbreviation,
            "group-symbol" => GroupSymbol,
            "group-barline" => GroupBarline,
            "score-part" => ScorePart,
            "part-name" => PartName,
            "part-abbreviation" => PartAbbreviation,
            "instrument-name" => InstrumentName,

            "part" => Part,
            "measure" => Measure,
            "print" => Print,

            "divisions" => Divisions,
            "staves" => Staves,
            "clef" => Clef,
            "sign" => Sign,
            "line" => Line,
            "clef-octave-change" => ClefOctaveChange,
            "key" => Key,
            "cancel" => Cancel,
            "fifths" => Fifths,
            "mode" => Mode,
            "time" => Time,
            "beats" => Beats,
            "beat-type" => BeatType,
            "senza-misura" => SenzaMisura,

            "staff" => Staff,
            "voice" => Voice,
            "duration" => Duration,

            "direction" => Direction,
            "words" => Words,
            "metronome" => Metronome,
            "beat-unit" => BeatUnit,
            "beat-unit-dot" => BeatUnitDot,
            "per-minute" => PerMinute,
            "wedge" => Wedge,

            "backup" => Backup,
            "forward" => Forward,

            "barline" => Barline,
            "bar-style" => BarStyle,
            "ending" => Ending,
            "repeat" => Repeat,

            "note" => Note,
            "step" => Step,
            "alter" => Alter,
            "octave" => Octave,
            "display-step" => DisplayStep,
            "display-octave" => DisplayOctave,
            "rest" => Rest,
            "unpitched" => Unpitched,
            "grace" => Grace,
            "chord" => Chord,
            "dot" => Dot,
            "type" => Type,
            "stem" => Stem,
            "beam" => Beam,
            "tie" => Tie,
            "tied" => Tied,
            "slur" => Slur,
            "time-modification" => TimeModification,
            "actual-notes" => ActualNotes,
            "normal-notes" => NormalNotes,
            "normal-type" => NormalType,
            "tuplet" => Tuplet,

            "lyric" => Lyric,
            "syllabic" => Syllabic,
            "text" => Text,
            "elision" => Elision,

            other => {
                return DynamicsKind::from_tag(other)
                    .map(Dynamics)
                    .or_else(|| ArticulationKind::from_tag(other).map(Articulation));
            }
        };

        Some(kind)
    }
}
