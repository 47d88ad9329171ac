//! Lyric chunks and melisma inference
//!
//! A `<lyric>` with text becomes a chunk of its `<syllabic>` kind. A note
//! without lyric text still extends every lyric line of its voice when it
//! continues a tie, is a rest, or sits under a slur, so that syllables stay
//! aligned with the notes they are sung on.

use crate::converters::musicxml::musicxml_to_msr::element::{ElementKind, MusicXmlElement};
use crate::converters::musicxml::musicxml_to_msr::errors::TranslationError;
use crate::converters::musicxml::musicxml_to_msr::session::{
    ParsingContext, PendingLyric, VoiceAddress,
};
use crate::converters::musicxml::musicxml_to_msr::translator::MsrTranslator;
use crate::msr::{LyricChunk, LyricChunkKind, MeasureLocation, Rational, Slur, SlurKind, TieKind};

/// What lyric handling needs from the note just placed
#[derive(Debug, Clone)]
pub(super) struct LyricNote {
    pub duration: Rational,
    pub input_line: usize,
    pub location: MeasureLocation,
    pub rest: bool,
    pub tie: Option<TieKind>,
    pub slurs: Vec<Slur>,
    pub chord_member: bool,
}

/// Slur bookkeeping the inference reads
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(super) struct SlurState {
    pub slurred: bool,
    pub has_lyrics: bool,
    pub first_chunk: Option<LyricChunkKind>,
}

/// Chunk kind for a note that brings no lyric of its own
///
/// Precedence: tie, rest, slur that already carries lyrics, plain slur.
pub(super) fn infer_chunk_kind(note: &LyricNote, slur: SlurState) -> Option<LyricChunkKind> {
    if note.tie.is_some() {
        return Some(LyricChunkKind::Tied);
    }
    if note.rest {
        return Some(LyricChunkKind::Skip);
    }
    if slur.slurred && slur.has_lyrics {
        return Some(match slur.first_chunk {
            Some(LyricChunkKind::End) => LyricChunkKind::SlurBeyondEnd,
            _ => LyricChunkKind::Slur,
        });
    }
    if slur.slurred {
        return Some(LyricChunkKind::Slur);
    }
    None
}

impl MsrTranslator {
    pub(super) fn handle_lyric_start(&mut self, element: &dyn MusicXmlElement) {
        let number = match element.attribute("number") {
            None => 1,
            Some(text) => text.trim().parse().unwrap_or_else(|_| {
                self.warning(
                    element.input_line(),
                    format!("lyric number \"{}\" is not numeric, 1 assumed", text),
                );
                1
            }),
        };

        self.session.lyric = Some(PendingLyric {
            number,
            ..PendingLyric::default()
        });
    }

    pub(super) fn handle_lyric_child(&mut self, kind: ElementKind, element: &dyn MusicXmlElement) {
        let line = element.input_line();
        let value = element.value();

        let Some(lyric) = self.session.lyric.as_mut() else {
            return;
        };

        match kind {
            ElementKind::Syllabic => match LyricChunkKind::from_syllabic(value) {
                Some(syllabic) => lyric.syllabic = Some(syllabic),
                None => self.musicxml_error(line, format!("syllabic \"{}\" is unknown", value)),
            },
            ElementKind::Text => {
                let text: String = value.chars().filter(|c| *c != ' ').collect();
                if lyric.elision && !lyric.text.is_empty() {
                    lyric.text.push(' ');
                }
                lyric.text.push_str(&text);
            }
            ElementKind::Elision => lyric.elision = true,
            _ => {}
        }
    }

    pub(super) fn handle_lyric_end(&mut self) {
        let Some(lyric) = self.session.lyric.take() else {
            return;
        };
        if self.session.context == ParsingContext::InNote {
            self.session.note.lyrics.push(lyric);
        }
    }

    /// Add the note's lyric chunks to its voice and update slur bookkeeping
    pub(super) fn handle_note_lyrics(
        &mut self,
        note: LyricNote,
        at: VoiceAddress,
        lyrics: Vec<PendingLyric>,
    ) -> Result<(), TranslationError> {
        let line = note.input_line;
        let chunk = |kind: LyricChunkKind, text: String, elision: bool| LyricChunk {
            kind,
            text,
            elision,
            duration: note.duration,
            note_line: note.input_line,
            location: note.location.clone(),
        };

        let explicit: Vec<(i32, LyricChunk)> = lyrics
            .into_iter()
            .filter(|lyric| !lyric.text.is_empty() || lyric.syllabic.is_some())
            .map(|lyric| {
                let kind = lyric.syllabic.unwrap_or(LyricChunkKind::Single);
                (lyric.number, chunk(kind, lyric.text, lyric.elision))
            })
            .collect();
        let has_text = explicit.iter().any(|(_, chunk)| !chunk.text.is_empty());

        let slur = SlurState {
            slurred: !self.session.open_slurs.is_empty() || !note.slurs.is_empty(),
            has_lyrics: self.session.slur_has_lyrics,
            first_chunk: self.session.first_chunk_in_slur,
        };

        let first_explicit = explicit.first().map(|(_, first)| first.kind);

        let first_kind = if let Some(kind) = first_explicit {
            let voice = self.voice_mut(at, line)?;
            for (number, lyric_chunk) in explicit {
                voice.add_lyric_chunk(number, lyric_chunk);
            }
            Some(kind)
        } else if note.chord_member {
            None
        } else {
            let inferred = infer_chunk_kind(&note, slur);
            if let Some(kind) = inferred {
                let voice = self.voice_mut(at, line)?;
                for number in voice.lyrics_numbers() {
                    voice.add_lyric_chunk(number, chunk(kind, String::new(), false));
                }
            }
            inferred
        };

        if note.chord_member {
            return Ok(());
        }

        if has_text && slur.slurred {
            self.session.slur_has_lyrics = true;
        }

        let started: Vec<i32> = note
            .slurs
            .iter()
            .filter(|slur| slur.kind == SlurKind::Start)
            .map(|slur| slur.number)
            .collect();
        let stopped = note.slurs.iter().any(|slur| slur.kind == SlurKind::Stop);

        // a slur opening while no other slur is open starts a new melisma
        if !started.is_empty() && self.session.open_slurs.iter().all(|n| started.contains(n)) {
            self.session.slur_has_lyrics = has_text;
            self.session.first_chunk_in_slur = first_kind;
        } else if stopped && self.session.open_slurs.is_empty() {
            self.session.slur_has_lyrics = false;
            self.session.first_chunk_in_slur = None;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn note() -> LyricNote {
        LyricNote {
            duration: Rational::new(1, 4),
            input_line: 1,
            location: MeasureLocation::default(),
            rest: false,
            tie: None,
            slurs: Vec::new(),
            chord_member: false,
        }
    }

    #[test]
    fn test_tie_wins_over_rest_and_slur() {
        let tied = LyricNote {
            tie: Some(TieKind::Stop),
            rest: true,
            ..note()
        };
        let slur = SlurState {
            slurred: true,
            has_lyrics: true,
            first_chunk: None,
        };
        assert_eq!(infer_chunk_kind(&tied, slur), Some(LyricChunkKind::Tied));
    }

    #[test]
    fn test_tie_start_extends_the_syllable() {
        let starting = LyricNote {
            tie: Some(TieKind::Start),
            ..note()
        };
        assert_eq!(infer_chunk_kind(&starting, SlurState::default()), Some(LyricChunkKind::Tied));
    }

    #[test]
    fn test_rest_is_skip() {
        let rest = LyricNote {
            rest: true,
            ..note()
        };
        assert_eq!(infer_chunk_kind(&rest, SlurState::default()), Some(LyricChunkKind::Skip));
    }

    #[test]
    fn test_slur_after_end_syllable_goes_beyond_end() {
        let slur = SlurState {
            slurred: true,
            has_lyrics: true,
            first_chunk: Some(LyricChunkKind::End),
        };
        assert_eq!(infer_chunk_kind(&note(), slur), Some(LyricChunkKind::SlurBeyondEnd));

        let slur = SlurState {
            first_chunk: Some(LyricChunkKind::Begin),
            ..slur
        };
        assert_eq!(infer_chunk_kind(&note(), slur), Some(LyricChunkKind::Slur));
    }

    #[test]
    fn test_plain_slur_without_lyrics_yet() {
        let slur = SlurState {
            slurred: true,
            has_lyrics: false,
            first_chunk: Some(LyricChunkKind::End),
        };
        assert_eq!(infer_chunk_kind(&note(), slur), Some(LyricChunkKind::Slur));
    }

    #[test]
    fn test_unslurred_note_extends_nothing() {
        assert_eq!(infer_chunk_kind(&note(), SlurState::default()), None);
    }
}
