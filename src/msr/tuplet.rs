//! Tuplets, possibly nested

use crate::msr::chord::{Chord, ChordHost};
use crate::msr::note::Note;
use crate::msr::voice::MeasureLocation;
use serde::{Deserialize, Serialize};

/// Position of a note inside a tuplet bracket, as tracked while reading
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TupletKind {
    Start,
    Continue,
    Stop,
}

impl TupletKind {
    pub fn from_musicxml(value: &str) -> Option<Self> {
        match value {
            "start" => Some(TupletKind::Start),
            "continue" => Some(TupletKind::Continue),
            "stop" => Some(TupletKind::Stop),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TupletElement {
    Note(Note),
    Chord(Chord),
    Tuplet(Tuplet),
}

/// `actual_notes` notes played in the time of `normal_notes`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tuplet {
    pub input_line: usize,
    pub number: i32,
    pub actual_notes: i32,
    pub normal_notes: i32,
    pub location: MeasureLocation,
    pub elements: Vec<TupletElement>,
}

impl Tuplet {
    pub fn new(
        number: i32,
        actual_notes: i32,
        normal_notes: i32,
        location: MeasureLocation,
        input_line: usize,
    ) -> Self {
        Self {
            input_line,
            number,
            actual_notes,
            normal_notes,
            location,
            elements: Vec::new(),
        }
    }

    pub fn add_note(&mut self, note: Note) {
        self.elements.push(TupletElement::Note(note));
    }

    pub fn add_tuplet(&mut self, tuplet: Tuplet) {
        self.elements.push(TupletElement::Tuplet(tuplet));
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Notes at any depth, chord members included, in order
    pub fn note_count(&self) -> usize {
        self.elements
            .iter()
            .map(|element| match element {
                TupletElement::Note(_) => 1,
                TupletElement::Chord(chord) => chord.len(),
                TupletElement::Tuplet(tuplet) => tuplet.note_count(),
            })
            .sum()
    }
}

impl ChordHost for Tuplet {
    fn retrofit_last_note_into_chord(&mut self) -> Option<&mut Chord> {
        if matches!(self.elements.last(), Some(TupletElement::Tuplet(_))) {
            return match self.elements.last_mut() {
                Some(TupletElement::Tuplet(inner)) => inner.retrofit_last_note_into_chord(),
                _ => None,
            };
        }

        match self.elements.pop() {
            Some(TupletElement::Note(note)) => {
                self.elements.push(TupletElement::Chord(Chord::from_first_note(note)));
            }
            Some(other) => {
                self.elements.push(other);
                return None;
            }
            None => return None,
        }

        match self.elements.last_mut() {
            Some(TupletElement::Chord(chord)) => Some(chord),
            _ => None,
        }
    }

    fn last_chord_mut(&mut self) -> Option<&mut Chord> {
        match self.elements.last_mut() {
            Some(TupletElement::Chord(chord)) => Some(chord),
            Some(TupletElement::Tuplet(inner)) => inner.last_chord_mut(),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tuplet() -> Tuplet {
        Tuplet::new(1, 3, 2, MeasureLocation::default(), 1)
    }

    #[test]
    fn test_retrofit_inside_tuplet() {
        let mut outer = tuplet();
        outer.add_note(Note::default());
        outer.add_note(Note { input_line: 2, ..Note::default() });

        let chord = outer.retrofit_last_note_into_chord().expect("last event is a note");
        chord.add_note(Note { input_line: 3, ..Note::default() });

        assert_eq!(outer.len(), 2);
        assert_eq!(outer.note_count(), 3);
        assert!(matches!(outer.elements[1], TupletElement::Chord(ref c) if c.input_line == 2));
    }

    #[test]
    fn test_retrofit_descends_into_nested_tuplet() {
        let mut inner = tuplet();
        inner.add_note(Note::default());
        let mut outer = tuplet();
        outer.add_tuplet(inner);

        assert!(outer.retrofit_last_note_into_chord().is_some());
        assert!(outer.last_chord_mut().is_some());
        assert_eq!(outer.len(), 1, "the chord stays inside the nested tuplet");
    }
}
