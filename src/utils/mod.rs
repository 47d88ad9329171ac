//! Utility modules for the MusicXML translator
//!
//! Small text helpers shared by the score model and the translator.

pub mod words;

// Re-export commonly used helpers
pub use words::{int_to_english_words, spell_out_numbers};
