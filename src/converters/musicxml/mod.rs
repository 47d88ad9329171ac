//! MusicXML format converters
//!
//! This module contains the MusicXML → MSR translator.

pub mod musicxml_to_msr;

// Re-export for convenience
pub use musicxml_to_msr::{
    translate_musicxml_to_msr,
    MsrTranslator,
    ParseError,
    SettingsError,
    TranslationError,
    TranslationResult,
    TranslationSettings,
};
