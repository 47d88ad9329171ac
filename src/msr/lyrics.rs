//! Lyric lines and their syllable chunks

use crate::msr::voice::MeasureLocation;
use crate::msr::Rational;
use serde::{Deserialize, Serialize};

/// What a chunk contributes to the lyric line
///
/// `Single`..`End` carry text from `<syllabic>`; the others are inferred
/// for notes without text so melismata keep the line aligned with the
/// voice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LyricChunkKind {
    Single,
    Begin,
    Middle,
    End,
    Tied,
    Skip,
    Slur,
    SlurBeyondEnd,
}

impl LyricChunkKind {
    pub fn from_syllabic(value: &str) -> Option<Self> {
        match value {
            "single" => Some(LyricChunkKind::Single),
            "begin" => Some(LyricChunkKind::Begin),
            "middle" => Some(LyricChunkKind::Middle),
            "end" => Some(LyricChunkKind::End),
            _ => None,
        }
    }

    pub fn carries_text(self) -> bool {
        matches!(
            self,
            LyricChunkKind::Single
                | LyricChunkKind::Begin
                | LyricChunkKind::Middle
                | LyricChunkKind::End
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LyricChunk {
    pub kind: LyricChunkKind,
    pub text: String,
    pub elision: bool,
    /// Duration of the underlying note
    pub duration: Rational,
    /// Input line of the underlying note
    pub note_line: usize,
    pub location: MeasureLocation,
}

/// One lyric line (verse) of a voice, keyed by `<lyric number>`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lyrics {
    pub number: i32,
    pub chunks: Vec<LyricChunk>,
}

impl Lyrics {
    pub fn new(number: i32) -> Self {
        Self {
            number,
            chunks: Vec::new(),
        }
    }

    pub fn kinds(&self) -> Vec<LyricChunkKind> {
        self.chunks.iter().map(|chunk| chunk.kind).collect()
    }

    /// Text of the line, syllables of a word joined, words separated by spaces
    pub fn text(&self) -> String {
        let mut out = String::new();
        for chunk in self.chunks.iter().filter(|c| c.kind.carries_text()) {
            out.push_str(&chunk.text);
            if matches!(chunk.kind, LyricChunkKind::Single | LyricChunkKind::End) {
                out.push(' ');
            }
        }
        out.trim_end().to_string()
    }
}
