//! Mutable state of one translation
//!
//! Everything the translator remembers between element callbacks lives in
//! `TranslationSession`: the current part/staff/voice, the note being
//! accumulated, pending marks, the tuplet stack, the pending-barline stack
//! and the repeat under construction. One session serves one document.

use crate::msr::{
    Articulation, Barline, Beam, Dynamics, LyricChunkKind, MeasureLocation, Part, PartGroupSymbol,
    PartIndex, Placement, RepeatEnding, Score, Slur, StemDirection, Step, TieKind, Tuplet,
    TupletKind, Voice, VoiceChunk, Wedge,
};
use std::collections::BTreeSet;

/// Which overloaded element family we are inside
///
/// `staff`, `voice` and `duration` mean different things depending on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ParsingContext {
    #[default]
    None,
    InNote,
    InBackup,
    InForward,
    InDirection,
}

/// Identity of one voice in the score
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VoiceAddress {
    pub part: PartIndex,
    pub staff: i32,
    pub voice: i32,
}

/// Voice at `at`, created if needed and aligned on the current measure
pub fn voice_at<'s>(
    score: &'s mut Score,
    at: VoiceAddress,
    measure_number: &str,
    input_line: usize,
) -> Option<&'s mut Voice> {
    let part: &mut Part = score.part_mut(at.part)?;
    let voice = part.resolve_or_create_voice(at.staff, at.voice, input_line);
    if voice.location.measure_number.is_empty() && !measure_number.is_empty() {
        voice.start_measure(measure_number);
    }
    Some(voice)
}

// ============================================================================
// ACCUMULATORS
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TupletMarker {
    pub kind: TupletKind,
    pub number: i32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PendingLyric {
    pub number: i32,
    pub syllabic: Option<LyricChunkKind>,
    pub text: String,
    pub elision: bool,
}

/// Raw fields of the `<note>` being read
#[derive(Debug, Clone, Default)]
pub struct NoteAccumulator {
    pub input_line: usize,
    pub step: Option<Step>,
    pub alter: f32,
    pub octave: Option<i32>,
    pub display_step: Option<Step>,
    pub display_octave: Option<i32>,
    pub rest: bool,
    pub unpitched: bool,
    pub grace: bool,
    pub chord: bool,
    pub duration: Option<i32>,
    pub dots: u32,
    pub note_type: Option<String>,
    pub stem: Option<StemDirection>,
    pub beams: Vec<Beam>,
    pub tie: Option<TieKind>,
    pub slurs: Vec<Slur>,
    pub staff: i32,
    pub voice: i32,
    pub time_modification: bool,
    pub actual_notes: Option<i32>,
    pub normal_notes: Option<i32>,
    pub normal_type: Option<String>,
    pub tuplet: Option<TupletMarker>,
    pub articulations: Vec<Articulation>,
    pub lyrics: Vec<PendingLyric>,
}

impl NoteAccumulator {
    pub fn new(input_line: usize) -> Self {
        Self {
            input_line,
            staff: 1,
            voice: 1,
            ..Self::default()
        }
    }

    /// actual:normal ratio, when `<time-modification>` was complete
    pub fn tuplet_ratio(&self) -> Option<(i32, i32)> {
        match (self.time_modification, self.actual_notes, self.normal_notes) {
            (true, Some(actual), Some(normal)) if actual > 0 && normal > 0 => Some((actual, normal)),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct PartGroupAccumulator {
    pub input_line: usize,
    pub number: i32,
    pub kind: Option<String>,
    pub name: String,
    pub abbreviation: String,
    pub symbol: PartGroupSymbol,
    pub display_order_key: Option<i32>,
    pub barline: bool,
}

#[derive(Debug, Clone, Default)]
pub struct ScorePartAccumulator {
    pub input_line: usize,
    pub id: String,
    pub name: String,
    pub abbreviation: String,
    pub instrument_name: String,
}

#[derive(Debug, Clone, Default)]
pub struct ClefAccumulator {
    pub input_line: usize,
    pub staff_number: i32,
    pub sign: Option<String>,
    pub line: Option<i32>,
    pub octave_change: i32,
}

#[derive(Debug, Clone, Default)]
pub struct KeyAccumulator {
    pub input_line: usize,
    pub staff_number: i32,
    pub fifths: i32,
    pub mode: Option<String>,
    pub cancel: Option<i32>,
}

#[derive(Debug, Clone, Default)]
pub struct TimeAccumulator {
    pub input_line: usize,
    pub staff_number: i32,
    pub symbol: Option<String>,
    pub beats: String,
    pub beat_type: i32,
    pub senza_misura: bool,
}

#[derive(Debug, Clone, Default)]
pub struct DirectionAccumulator {
    pub input_line: usize,
    pub placement: Option<Placement>,
    pub staff: Option<i32>,
    pub voice: Option<i32>,
    pub words: Vec<String>,
    pub metronome: bool,
    pub parentheses: bool,
    pub beat_unit: Option<String>,
    pub beat_unit_dots: u32,
    pub per_minute: Option<String>,
}

/// Duration and target of a `<backup>` or `<forward>`
#[derive(Debug, Clone, Default)]
pub struct MotionAccumulator {
    pub input_line: usize,
    pub duration: Option<i32>,
    pub staff: Option<i32>,
    pub voice: Option<i32>,
}

// ============================================================================
// REPEATS
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepeatStartKind {
    Explicit,
    Implicit,
}

/// Repeat under construction in one voice
#[derive(Debug, Clone)]
pub struct RepeatBuilder {
    pub input_line: usize,
    pub voice: VoiceAddress,
    pub start: Option<RepeatStartKind>,
    pub body: Option<VoiceChunk>,
    /// Index in the voice chunk where the finished repeat is inserted
    pub anchor: usize,
    pub endings: Vec<RepeatEnding>,
}

impl RepeatBuilder {
    pub fn new(voice: VoiceAddress, start: Option<RepeatStartKind>, input_line: usize) -> Self {
        Self {
            input_line,
            voice,
            start,
            body: None,
            anchor: 0,
            endings: Vec::new(),
        }
    }
}

// ============================================================================
// SESSION
// ============================================================================

#[derive(Debug, Default)]
pub struct TranslationSession {
    pub context: ParsingContext,

    // current structural position
    pub part: Option<PartIndex>,
    pub staff_number: i32,
    pub voice_number: i32,
    pub measure_number: String,
    pub debug_measure: bool,

    // element accumulators
    pub note: NoteAccumulator,
    pub lyric: Option<PendingLyric>,
    pub part_group: Option<PartGroupAccumulator>,
    pub score_part: Option<ScorePartAccumulator>,
    pub clef: Option<ClefAccumulator>,
    pub key: Option<KeyAccumulator>,
    pub time: Option<TimeAccumulator>,
    pub direction: Option<DirectionAccumulator>,
    pub motion: MotionAccumulator,
    pub barline: Option<Barline>,

    // pending attachments
    pub pending_dynamics: Vec<Dynamics>,
    pub pending_wedges: Vec<Wedge>,

    // note assembly
    pub chord_in_progress: bool,
    /// Where the last note that is not a chord member was placed
    pub chord_location: Option<MeasureLocation>,
    pub tuplet_stack: Vec<Tuplet>,
    pub tuplet_voice: Option<VoiceAddress>,
    pub tuplet_kind: Option<TupletKind>,

    // slurs: numbers still open, plus lyric inference state
    pub open_slurs: BTreeSet<i32>,
    pub slur_has_lyrics: bool,
    pub first_chunk_in_slur: Option<LyricChunkKind>,

    // repeats
    pub pending_barlines: Vec<Barline>,
    pub repeat: Option<RepeatBuilder>,
}

impl TranslationSession {
    pub fn new() -> Self {
        Self {
            staff_number: 1,
            voice_number: 1,
            ..Self::default()
        }
    }

    pub fn current_voice(&self) -> Option<VoiceAddress> {
        self.part.map(|part| VoiceAddress {
            part,
            staff: self.staff_number,
            voice: self.voice_number,
        })
    }

    /// Forget per-part state when a new `<part>` starts
    pub fn enter_part(&mut self, part: PartIndex) {
        self.part = Some(part);
        self.staff_number = 1;
        self.voice_number = 1;
        self.measure_number.clear();
        self.chord_in_progress = false;
        self.chord_location = None;
        self.tuplet_stack.clear();
        self.tuplet_voice = None;
        self.tuplet_kind = None;
        self.open_slurs.clear();
        self.slur_has_lyrics = false;
        self.first_chunk_in_slur = None;
        self.pending_barlines.clear();
        self.repeat = None;
        self.pending_dynamics.clear();
        self.pending_wedges.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_note_accumulator_defaults_to_staff_and_voice_one() {
        let note = NoteAccumulator::new(12);
        assert_eq!((note.staff, note.voice), (1, 1));
        assert_eq!(note.input_line, 12);
        assert_eq!(note.tuplet_ratio(), None);
    }

    #[test]
    fn test_incomplete_time_modification_has_no_ratio() {
        let mut note = NoteAccumulator::new(1);
        note.time_modification = true;
        note.actual_notes = Some(3);
        assert_eq!(note.tuplet_ratio(), None);

        note.normal_notes = Some(2);
        assert_eq!(note.tuplet_ratio(), Some((3, 2)));
    }

    #[test]
    fn test_voice_at_aligns_new_voice_on_measure() {
        let mut score = Score::new();
        let part = score.add_part(Part::new("P1", "Part_POne", 1));
        let at = VoiceAddress { part, staff: 1, voice: 2 };

        let voice = voice_at(&mut score, at, "4", 30).expect("part exists");
        assert_eq!(voice.location.measure_number, "4");
    }
}
