//! Note, chord and tuplet assembly
//!
//! MusicXML only says a note belongs to a chord on the chord's *second*
//! note, and only marks the first and last notes of a tuplet. So each note
//! is built at `</note>` and then placed by membership, tested in order:
//!
//! ```text
//! <chord/> seen ──────────► retrofit previous note into a Chord, add note
//! time-modification seen ─► start / continue / stop on the tuplet stack
//! otherwise ──────────────► flush open tuplets, append to the voice
//! ```
//!
//! Backup and forward are handled here too since they move the same
//! measure positions notes advance.

use crate::converters::musicxml::musicxml_to_msr::element::{ElementKind, MusicXmlElement};
use crate::converters::musicxml::musicxml_to_msr::errors::TranslationError;
use crate::converters::musicxml::musicxml_to_msr::lyrics::LyricNote;
use crate::converters::musicxml::musicxml_to_msr::session::{
    NoteAccumulator, ParsingContext, TupletMarker, VoiceAddress,
};
use crate::converters::musicxml::musicxml_to_msr::translator::MsrTranslator;
use crate::msr::{
    Articulation, ArticulationKind, Beam, BeamKind, ChordHost, DisplayPosition, Note, NoteKind,
    Pitch, Rational, Slur, SlurKind, StemDirection, Step, TieKind, Tuplet, TupletKind,
    VoiceElement,
};

/// Add `note` to the chord ending `host`, retrofitting the previous note
/// into a chord first when none is being built
///
/// Gives the note back when `host` does not end with a note or chord.
fn add_chord_member(host: &mut dyn ChordHost, note: Note, retrofit: bool) -> Result<usize, Note> {
    let chord = if retrofit {
        host.retrofit_last_note_into_chord()
    } else {
        host.last_chord_mut()
    };

    match chord {
        Some(chord) => {
            chord.add_note(note);
            Ok(chord.len())
        }
        None => Err(note),
    }
}

impl MsrTranslator {
    // ========================================================================
    // ACCUMULATION
    // ========================================================================

    pub(super) fn handle_note_start(&mut self, element: &dyn MusicXmlElement) {
        self.session.context = ParsingContext::InNote;
        self.session.note = NoteAccumulator::new(element.input_line());
    }

    pub(super) fn handle_note_child(&mut self, kind: ElementKind, element: &dyn MusicXmlElement) {
        let line = element.input_line();
        let value = element.value();

        match kind {
            ElementKind::Step | ElementKind::DisplayStep => {
                let step = Step::from_musicxml(value).unwrap_or_else(|| {
                    self.musicxml_error(line, format!("step \"{}\" is unknown, C assumed", value));
                    Step::C
                });
                if kind == ElementKind::Step {
                    self.session.note.step = Some(step);
                } else {
                    self.session.note.display_step = Some(step);
                }
            }
            ElementKind::Alter => match element.float_value() {
                Some(alter) => self.session.note.alter = alter as f32,
                None => self.musicxml_error(line, format!("alter \"{}\" is not a number", value)),
            },
            ElementKind::Octave | ElementKind::DisplayOctave => {
                let octave = element.int_value().unwrap_or_else(|| {
                    self.musicxml_error(line, format!("octave \"{}\" is not a number, 4 assumed", value));
                    4
                });
                if kind == ElementKind::Octave {
                    self.session.note.octave = Some(octave);
                } else {
                    self.session.note.display_octave = Some(octave);
                }
            }
            ElementKind::Rest => self.session.note.rest = true,
            ElementKind::Unpitched => self.session.note.unpitched = true,
            ElementKind::Grace => self.session.note.grace = true,
            ElementKind::Chord => self.session.note.chord = true,
            ElementKind::Dot => self.session.note.dots += 1,
            ElementKind::Type => self.session.note.note_type = Some(value.to_string()),
            ElementKind::Stem => match StemDirection::from_musicxml(value) {
                Some(stem) => self.session.note.stem = Some(stem),
                None => self.musicxml_error(line, format!("stem \"{}\" is unknown", value)),
            },
            ElementKind::Beam => match BeamKind::from_musicxml(value) {
                Some(beam) => self.session.note.beams.push(Beam {
                    number: element.int_attribute("number").unwrap_or(1),
                    kind: beam,
                }),
                None => self.warning(line, format!("beam value \"{}\" is not handled, ignored", value)),
            },
            ElementKind::Tie | ElementKind::Tied => self.handle_tie(element),
            ElementKind::Slur => self.handle_slur(element),
            ElementKind::TimeModification => self.session.note.time_modification = true,
            ElementKind::ActualNotes => self.session.note.actual_notes = element.int_value(),
            ElementKind::NormalNotes => self.session.note.normal_notes = element.int_value(),
            ElementKind::NormalType => self.session.note.normal_type = Some(value.to_string()),
            ElementKind::Tuplet => {
                let text = element.attribute("type").unwrap_or("");
                match TupletKind::from_musicxml(text) {
                    Some(kind) => {
                        self.session.note.tuplet = Some(TupletMarker {
                            kind,
                            number: element.int_attribute("number").unwrap_or(1),
                        });
                    }
                    None => self.musicxml_error(line, format!("tuplet type \"{}\" is unknown", text)),
                }
            }
            _ => {}
        }
    }

    /// `<tie>` and `<tied>`; a stop and a start on one note make a continue
    fn handle_tie(&mut self, element: &dyn MusicXmlElement) {
        let text = element.attribute("type").unwrap_or("");
        let Some(kind) = TieKind::from_musicxml(text) else {
            self.musicxml_error(element.input_line(), format!("tie type \"{}\" is unknown", text));
            return;
        };

        let note = &mut self.session.note;
        note.tie = match (note.tie, kind) {
            (Some(TieKind::Stop), TieKind::Start) | (Some(TieKind::Start), TieKind::Stop) => {
                Some(TieKind::Continue)
            }
            (Some(TieKind::Continue), _) => Some(TieKind::Continue),
            (_, kind) => Some(kind),
        };
    }

    /// `<slur>`; open slurs are tracked per number, so slurs may overlap
    fn handle_slur(&mut self, element: &dyn MusicXmlElement) {
        let line = element.input_line();
        let text = element.attribute("type").unwrap_or("");

        let Some(kind) = SlurKind::from_musicxml(text) else {
            self.musicxml_error(line, format!("slur type \"{}\" is unknown", text));
            return;
        };

        let number = element.int_attribute("number").unwrap_or(1);
        if kind != SlurKind::Start && !self.session.open_slurs.contains(&number) {
            self.musicxml_error(line, format!("slur {} number {} is not open, ignored", text, number));
            return;
        }

        match kind {
            SlurKind::Start | SlurKind::Continue => self.session.open_slurs.insert(number),
            SlurKind::Stop => self.session.open_slurs.remove(&number),
        };

        let placement = self.placement_attribute(element);
        let slurs = &mut self.session.note.slurs;

        // a stop and a start of the same number on one note make a continue
        if let Some(same) = slurs.iter_mut().find(|slur| slur.number == number) {
            same.kind = match (same.kind, kind) {
                (SlurKind::Stop, SlurKind::Start) | (SlurKind::Start, SlurKind::Stop) => {
                    SlurKind::Continue
                }
                (_, kind) => kind,
            };
            return;
        }

        slurs.push(Slur {
            kind,
            number,
            placement,
        });
    }

    pub(super) fn handle_articulation(&mut self, kind: ArticulationKind, element: &dyn MusicXmlElement) {
        let placement = self.placement_attribute(element);

        self.session.note.articulations.push(Articulation {
            kind,
            placement,
            input_line: element.input_line(),
        });
    }

    // ========================================================================
    // NOTE CONSTRUCTION
    // ========================================================================

    pub(super) fn handle_note_end(&mut self) -> Result<(), TranslationError> {
        self.session.context = ParsingContext::None;

        let mut accumulated = std::mem::take(&mut self.session.note);
        let line = accumulated.input_line;
        let part = self.current_part_index(line)?;

        self.session.staff_number = accumulated.staff;
        self.session.voice_number = accumulated.voice;
        let at = VoiceAddress {
            part,
            staff: accumulated.staff,
            voice: accumulated.voice,
        };

        let mut note = self.build_note(&mut accumulated);
        self.attach_pending_marks(&mut note);

        let ratio = accumulated.tuplet_ratio();
        if accumulated.tuplet.is_some() && ratio.is_none() {
            self.warning(line, "tuplet without a complete time-modification, ignored");
        }

        let chord_member = accumulated.chord && !note.rest;
        if accumulated.chord && note.rest {
            self.musicxml_error(line, "a rest cannot belong to a chord, treated as standalone");
        }

        // chord members sit at the start of the chord
        let chord_start = self.session.chord_location.clone();
        {
            let voice = self.voice_mut(at, line)?;
            note.location = match chord_start {
                Some(location) if chord_member => location,
                _ => voice.location.clone(),
            };
            if !chord_member && !note.grace {
                voice.advance(note.duration);
            }
        }
        if !chord_member {
            self.session.chord_location = Some(note.location.clone());
        }

        let lyric_note = LyricNote {
            duration: note.duration,
            input_line: line,
            location: note.location.clone(),
            rest: note.rest,
            tie: note.tie,
            slurs: note.slurs.clone(),
            chord_member,
        };

        if chord_member {
            self.place_chord_member(note, at, accumulated.tuplet)?;
        } else if let Some((actual, normal)) = ratio {
            self.place_tuplet_member(note, at, actual, normal, accumulated.tuplet)?;
        } else {
            self.place_standalone(note, at)?;
        }

        self.handle_note_lyrics(lyric_note, at, std::mem::take(&mut accumulated.lyrics))
    }

    fn build_note(&mut self, accumulated: &mut NoteAccumulator) -> Note {
        let line = accumulated.input_line;

        let pitch = if accumulated.rest || accumulated.unpitched {
            None
        } else {
            let step = accumulated.step.unwrap_or_else(|| {
                self.musicxml_error(line, "note has no step, C assumed");
                Step::C
            });
            Some(Pitch {
                step,
                alter: accumulated.alter,
                octave: accumulated.octave.unwrap_or(4),
            })
        };

        let display = match (accumulated.display_step, accumulated.display_octave) {
            (Some(step), Some(octave)) => Some(DisplayPosition { step, octave }),
            _ => None,
        };

        let divisions = if accumulated.grace {
            0
        } else {
            accumulated.duration.unwrap_or_else(|| {
                self.warning(line, "note has no duration, 0 assumed");
                0
            })
        };
        let duration = self.whole_notes(divisions);

        let mut note = Note {
            input_line: line,
            kind: if accumulated.rest { NoteKind::Rest } else { NoteKind::Standalone },
            pitch,
            display,
            rest: accumulated.rest,
            unpitched: accumulated.unpitched,
            grace: accumulated.grace,
            divisions,
            duration,
            display_duration: duration,
            dots: accumulated.dots,
            note_type: accumulated.note_type.take(),
            tie: accumulated.tie,
            slurs: std::mem::take(&mut accumulated.slurs),
            stem: accumulated.stem,
            beams: std::mem::take(&mut accumulated.beams),
            articulations: std::mem::take(&mut accumulated.articulations),
            staff_number: accumulated.staff,
            voice_number: accumulated.voice,
            ..Note::default()
        };

        if let Some((actual, normal)) = accumulated.tuplet_ratio() {
            note.apply_tuplet_ratio(actual as i64, normal as i64);
        }
        note
    }

    /// Pending dynamics and wedges go on the note; on a rest they either
    /// wait for the next note or are attached with a warning
    fn attach_pending_marks(&mut self, note: &mut Note) {
        if self.session.pending_dynamics.is_empty() && self.session.pending_wedges.is_empty() {
            return;
        }

        if note.rest {
            if self.settings.delay_rests_dynamics {
                trace_event!(self, "delaying dynamics found before rest at line {}", note.input_line);
                return;
            }
            self.warning(note.input_line, "dynamics or wedges attached to a rest");
        }

        note.dynamics.append(&mut self.session.pending_dynamics);
        note.wedges.append(&mut self.session.pending_wedges);
    }

    // ========================================================================
    // PLACEMENT
    // ========================================================================

    fn place_standalone(&mut self, note: Note, at: VoiceAddress) -> Result<(), TranslationError> {
        let line = note.input_line;
        self.finalize_pending_tuplets(line)?;
        self.session.chord_in_progress = false;

        self.voice_mut(at, line)?.append(VoiceElement::Note(note));
        Ok(())
    }

    fn place_chord_member(
        &mut self,
        note: Note,
        at: VoiceAddress,
        marker: Option<TupletMarker>,
    ) -> Result<(), TranslationError> {
        let line = note.input_line;
        let retrofit = !self.session.chord_in_progress;

        let placed = if let Some(tuplet) = self.session.tuplet_stack.last_mut() {
            add_chord_member(tuplet, note, retrofit)
        } else {
            let voice = self.voice_mut(at, line)?;
            add_chord_member(&mut voice.chunk, note, retrofit)
        };

        match placed {
            Ok(size) => {
                self.session.chord_in_progress = true;
                trace_event!(self, "chord at line {} now has {} notes", line, size);

                if marker.map(|marker| marker.kind) == Some(TupletKind::Stop) {
                    self.close_innermost_tuplet(line)?;
                }
                Ok(())
            }
            Err(mut note) => {
                self.musicxml_error(line, "chord note has no preceding note, treated as standalone");
                note.kind = NoteKind::Standalone;
                let duration = note.duration;
                self.place_standalone(note, at)?;
                self.voice_mut(at, line)?.advance(duration);
                Ok(())
            }
        }
    }

    fn place_tuplet_member(
        &mut self,
        mut note: Note,
        at: VoiceAddress,
        actual: i32,
        normal: i32,
        marker: Option<TupletMarker>,
    ) -> Result<(), TranslationError> {
        let line = note.input_line;
        self.session.chord_in_progress = false;
        note.kind = NoteKind::TupletMember;

        let number = marker.map(|marker| marker.number).unwrap_or(1);
        let kind = match (marker, self.session.tuplet_kind) {
            (Some(marker), _) => marker.kind,
            (None, Some(tracked)) => tracked,
            (None, None) => {
                trace_event!(self, "implicit tuplet start at line {}", line);
                TupletKind::Start
            }
        };

        match kind {
            TupletKind::Start => self.open_tuplet(note, at, number, actual, normal),
            TupletKind::Continue => match self.session.tuplet_stack.last_mut() {
                Some(tuplet) => {
                    tuplet.add_note(note);
                    Ok(())
                }
                None => {
                    trace_event!(self, "tuplet continue without start at line {}, starting one", line);
                    self.open_tuplet(note, at, number, actual, normal)
                }
            },
            TupletKind::Stop => match self.session.tuplet_stack.last_mut() {
                Some(tuplet) => {
                    tuplet.add_note(note);
                    self.close_innermost_tuplet(line)
                }
                None => {
                    self.musicxml_error(line, "tuplet stop without a tuplet start, note treated as standalone");
                    note.kind = NoteKind::Standalone;
                    self.place_standalone(note, at)
                }
            },
        }
    }

    fn open_tuplet(
        &mut self,
        note: Note,
        at: VoiceAddress,
        number: i32,
        actual: i32,
        normal: i32,
    ) -> Result<(), TranslationError> {
        if self.session.tuplet_stack.is_empty() {
            self.session.tuplet_voice = Some(at);
        }

        let mut tuplet = Tuplet::new(number, actual, normal, note.location.clone(), note.input_line);
        tuplet.add_note(note);

        trace_event!(
            self,
            "opening tuplet {} ({}:{}) at line {}, depth {}",
            number,
            actual,
            normal,
            tuplet.input_line,
            self.session.tuplet_stack.len() + 1
        );

        self.session.tuplet_stack.push(tuplet);
        self.session.tuplet_kind = Some(TupletKind::Continue);
        Ok(())
    }

    /// Pop the innermost tuplet into its enclosing tuplet, or into the voice
    fn close_innermost_tuplet(&mut self, line: usize) -> Result<(), TranslationError> {
        let Some(tuplet) = self.session.tuplet_stack.pop() else {
            return Ok(());
        };
        trace_event!(self, "closing tuplet {} with {} elements", tuplet.number, tuplet.len());

        if let Some(outer) = self.session.tuplet_stack.last_mut() {
            outer.add_tuplet(tuplet);
            self.session.tuplet_kind = Some(TupletKind::Continue);
            return Ok(());
        }

        self.session.tuplet_kind = None;
        let at = match self.session.tuplet_voice.take() {
            Some(at) => at,
            None => self.current_voice_address(line)?,
        };
        self.voice_mut(at, line)?.append(VoiceElement::Tuplet(tuplet));
        Ok(())
    }

    /// Close every open tuplet: a tuplet cannot span a backup, forward,
    /// barline, measure boundary or standalone note
    pub(super) fn finalize_pending_tuplets(&mut self, line: usize) -> Result<(), TranslationError> {
        if !self.session.tuplet_stack.is_empty() {
            trace_event!(
                self,
                "flushing {} open tuplet(s) at line {}",
                self.session.tuplet_stack.len(),
                line
            );
        }

        while !self.session.tuplet_stack.is_empty() {
            self.close_innermost_tuplet(line)?;
        }
        self.session.tuplet_kind = None;
        Ok(())
    }

    // ========================================================================
    // BACKUP AND FORWARD
    // ========================================================================

    pub(super) fn handle_backup_end(&mut self) -> Result<(), TranslationError> {
        self.session.context = ParsingContext::None;
        let motion = std::mem::take(&mut self.session.motion);
        let line = motion.input_line;

        let Some(divisions) = motion.duration else {
            self.warning(line, "backup has no duration, ignored");
            return Ok(());
        };

        self.finalize_pending_tuplets(line)?;
        self.session.chord_in_progress = false;

        let duration = self.whole_notes(divisions);
        let position = self.current_voice_mut(line)?.backup(duration);

        if position < Rational::from_integer(0) {
            let measure_number = self.session.measure_number.clone();
            self.warning(
                line,
                format!("backup crosses the left boundary of measure {}", measure_number),
            );
        }
        Ok(())
    }

    pub(super) fn handle_forward_end(&mut self) -> Result<(), TranslationError> {
        self.session.context = ParsingContext::None;
        let motion = std::mem::take(&mut self.session.motion);
        let line = motion.input_line;

        let Some(divisions) = motion.duration else {
            self.warning(line, "forward has no duration, ignored");
            return Ok(());
        };

        self.finalize_pending_tuplets(line)?;
        self.session.chord_in_progress = false;

        if let Some(staff) = motion.staff {
            self.session.staff_number = staff;
        }
        if let Some(voice) = motion.voice {
            self.session.voice_number = voice;
        }

        let duration = self.whole_notes(divisions);
        let voice = self.current_voice_mut(line)?;
        let skip = Note::skip(divisions, duration, voice.location.clone(), line);
        voice.append(VoiceElement::Note(skip));
        voice.advance(duration);
        Ok(())
    }
}
