//! Voices, voice chunks and measure positions
//!
//! A voice holds one flat event sequence (its chunk). Repeat handling
//! carves contiguous *segments* out of that sequence: the voice remembers
//! where the currently open segment starts, and closing the segment drains
//! everything appended since into a standalone [`VoiceChunk`] that a repeat
//! or repeat ending then owns.

use crate::msr::barline::{Barline, Repeat};
use crate::msr::chord::{Chord, ChordHost};
use crate::msr::lyrics::{LyricChunk, Lyrics};
use crate::msr::marks::Tempo;
use crate::msr::note::Note;
use crate::msr::tuplet::Tuplet;
use crate::msr::Rational;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Where an event sits: measure number as written, plus the offset from
/// the start of that measure in whole notes
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MeasureLocation {
    pub measure_number: String,
    pub position_in_measure: Rational,
}

impl MeasureLocation {
    pub fn new(measure_number: impl Into<String>, position_in_measure: Rational) -> Self {
        Self {
            measure_number: measure_number.into(),
            position_in_measure,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BarCheck {
    pub measure_number: String,
    pub input_line: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BarNumberCheck {
    pub measure_number: String,
    pub input_line: usize,
}

/// Line break requested by `<print new-system="yes">`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Break {
    pub measure_number: String,
    pub input_line: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum VoiceElement {
    Note(Note),
    Chord(Chord),
    Tuplet(Tuplet),
    Barline(Barline),
    Repeat(Repeat),
    Tempo(Tempo),
    BarCheck(BarCheck),
    BarNumberCheck(BarNumberCheck),
    Break(Break),
}

/// Contiguous run of voice events
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct VoiceChunk {
    pub input_line: usize,
    pub elements: Vec<VoiceElement>,
}

impl VoiceChunk {
    pub fn new(input_line: usize) -> Self {
        Self {
            input_line,
            elements: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn prepend(&mut self, element: VoiceElement) {
        self.elements.insert(0, element);
    }
}

impl ChordHost for VoiceChunk {
    fn retrofit_last_note_into_chord(&mut self) -> Option<&mut Chord> {
        if matches!(self.elements.last(), Some(VoiceElement::Tuplet(_))) {
            return match self.elements.last_mut() {
                Some(VoiceElement::Tuplet(tuplet)) => tuplet.retrofit_last_note_into_chord(),
                _ => None,
            };
        }

        match self.elements.pop() {
            Some(VoiceElement::Note(note)) => {
                self.elements.push(VoiceElement::Chord(Chord::from_first_note(note)));
            }
            Some(other) => {
                self.elements.push(other);
                return None;
            }
            None => return None,
        }

        match self.elements.last_mut() {
            Some(VoiceElement::Chord(chord)) => Some(chord),
            _ => None,
        }
    }

    fn last_chord_mut(&mut self) -> Option<&mut Chord> {
        match self.elements.last_mut() {
            Some(VoiceElement::Chord(chord)) => Some(chord),
            Some(VoiceElement::Tuplet(tuplet)) => tuplet.last_chord_mut(),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Voice {
    pub input_line: usize,
    pub number: i32,
    pub staff_number: i32,
    pub part_id: String,
    pub name: String,
    pub chunk: VoiceChunk,
    pub lyrics: BTreeMap<i32, Lyrics>,
    pub location: MeasureLocation,
    /// Index in `chunk` where the open repeat segment begins
    #[serde(skip)]
    segment_start: usize,
}

impl Voice {
    pub fn new(
        number: i32,
        staff_number: i32,
        part_id: impl Into<String>,
        name: impl Into<String>,
        input_line: usize,
    ) -> Self {
        Self {
            input_line,
            number,
            staff_number,
            part_id: part_id.into(),
            name: name.into(),
            chunk: VoiceChunk::new(input_line),
            lyrics: BTreeMap::new(),
            location: MeasureLocation::default(),
            segment_start: 0,
        }
    }

    pub fn append(&mut self, element: VoiceElement) {
        self.chunk.elements.push(element);
    }

    pub fn elements(&self) -> &[VoiceElement] {
        &self.chunk.elements
    }

    pub fn is_empty(&self) -> bool {
        self.chunk.is_empty()
    }

    // ------------------------------------------------------------------
    // Measure position
    // ------------------------------------------------------------------

    /// Enter a new measure: position back to zero
    pub fn start_measure(&mut self, measure_number: &str) {
        self.location.measure_number = measure_number.to_string();
        self.location.position_in_measure = Rational::from_integer(0);
    }

    pub fn position(&self) -> Rational {
        self.location.position_in_measure
    }

    pub fn advance(&mut self, duration: Rational) {
        self.location.position_in_measure += duration;
    }

    /// Move the position back; returns the new position, which is negative
    /// when the backup crosses the start of the measure
    pub fn backup(&mut self, duration: Rational) -> Rational {
        self.location.position_in_measure -= duration;
        self.location.position_in_measure
    }

    // ------------------------------------------------------------------
    // Repeat segments
    // ------------------------------------------------------------------

    pub fn segment_start(&self) -> usize {
        self.segment_start
    }

    /// Start a new segment at the current end of the voice
    pub fn open_segment(&mut self) {
        self.segment_start = self.chunk.len();
    }

    /// Drain the open segment into its own chunk
    ///
    /// A new segment opens right where the closed one began, so events
    /// appended afterwards belong to the next segment.
    pub fn close_segment(&mut self, input_line: usize) -> VoiceChunk {
        let start = self.segment_start.min(self.chunk.len());
        let elements = self.chunk.elements.drain(start..).collect();
        self.segment_start = start;

        VoiceChunk { input_line, elements }
    }

    /// Insert at the start of the open segment
    pub fn prepend_to_segment(&mut self, element: VoiceElement) {
        let start = self.segment_start.min(self.chunk.len());
        self.chunk.elements.insert(start, element);
    }

    /// Insert at an absolute index, keeping the open segment's start aligned
    pub fn insert_at(&mut self, index: usize, element: VoiceElement) {
        let index = index.min(self.chunk.len());
        self.chunk.elements.insert(index, element);
        if index <= self.segment_start {
            self.segment_start += 1;
        }
    }

    pub fn insert_repeat(&mut self, index: usize, repeat: Repeat) {
        self.insert_at(index, VoiceElement::Repeat(repeat));
    }

    // ------------------------------------------------------------------
    // Lyrics
    // ------------------------------------------------------------------

    pub fn add_lyric_chunk(&mut self, number: i32, chunk: LyricChunk) {
        self.lyrics
            .entry(number)
            .or_insert_with(|| Lyrics::new(number))
            .chunks
            .push(chunk);
    }

    pub fn lyrics_numbers(&self) -> Vec<i32> {
        self.lyrics.keys().copied().collect()
    }

    pub fn lyrics(&self, number: i32) -> Option<&Lyrics> {
        self.lyrics.get(&number)
    }
}
