//! Chords and the retrofit of an already-appended note into a chord
//!
//! MusicXML marks the second and later notes of a chord with `<chord/>`, so
//! the first note has already been placed as if it stood alone when the
//! chord is recognized. `ChordHost` gives the translator O(1) access to the
//! last appended event of a container (descending into a trailing tuplet) so
//! that note can be popped and replaced by a Chord in place.

use crate::msr::marks::{Articulation, Dynamics, Wedge};
use crate::msr::note::{Note, NoteKind, TieKind};
use crate::msr::voice::MeasureLocation;
use crate::msr::Rational;
use serde::{Deserialize, Serialize};

/// Simultaneous notes sharing one duration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chord {
    pub input_line: usize,
    pub notes: Vec<Note>,
    pub divisions: i32,
    pub duration: Rational,
    pub display_duration: Rational,
    pub tie: Option<TieKind>,
    pub location: MeasureLocation,
    pub articulations: Vec<Articulation>,
    pub dynamics: Vec<Dynamics>,
    pub wedges: Vec<Wedge>,
}

impl Chord {
    /// Wrap a note as the first chord member
    ///
    /// The chord inherits the note's location, duration and tie, and takes
    /// over every mark already attached to it.
    pub fn from_first_note(mut note: Note) -> Self {
        let (articulations, dynamics, wedges) = note.take_marks();
        note.kind = NoteKind::ChordMember;

        Self {
            input_line: note.input_line,
            divisions: note.divisions,
            duration: note.duration,
            display_duration: note.display_duration,
            tie: note.tie,
            location: note.location.clone(),
            articulations,
            dynamics,
            wedges,
            notes: vec![note],
        }
    }

    pub fn add_note(&mut self, mut note: Note) {
        note.kind = NoteKind::ChordMember;
        note.location = self.location.clone();
        self.notes.push(note);
    }

    pub fn len(&self) -> usize {
        self.notes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }
}

/// A sequence of events that can host a chord retrofit
pub trait ChordHost {
    /// Replace the last appended note by a chord holding it as first member
    ///
    /// Returns `None` when the last event is not a note (or a tuplet
    /// ending with one).
    fn retrofit_last_note_into_chord(&mut self) -> Option<&mut Chord>;

    /// The chord currently being built, if it is the last event
    fn last_chord_mut(&mut self) -> Option<&mut Chord>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::msr::marks::DynamicsKind;

    #[test]
    fn test_first_note_marks_move_to_chord() {
        let note = Note {
            input_line: 10,
            duration: Rational::new(1, 4),
            tie: Some(TieKind::Start),
            dynamics: vec![Dynamics {
                kind: DynamicsKind::FF,
                placement: None,
                input_line: 8,
            }],
            ..Note::default()
        };

        let chord = Chord::from_first_note(note);

        assert_eq!(chord.dynamics.len(), 1, "dynamics should move onto the chord");
        assert!(chord.notes[0].dynamics.is_empty(), "first member keeps no dynamics");
        assert_eq!(chord.notes[0].kind, NoteKind::ChordMember);
        assert_eq!(chord.tie, Some(TieKind::Start));
        assert_eq!(chord.duration, Rational::new(1, 4));
    }

    #[test]
    fn test_added_note_shares_location() {
        let first = Note {
            location: MeasureLocation::new("3", Rational::new(1, 2)),
            ..Note::default()
        };
        let mut chord = Chord::from_first_note(first);
        chord.add_note(Note::default());

        assert_eq!(chord.len(), 2);
        assert_eq!(chord.notes[1].location.measure_number, "3");
        assert_eq!(chord.notes[1].location.position_in_measure, Rational::new(1, 2));
    }
}
