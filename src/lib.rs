//! MusicXML → MSR translation WASM Module
//!
//! Translates partwise MusicXML documents into MSR (Music Score
//! Representation), the typed score model handed to the engraving stage.

pub mod api;
pub mod converters;
pub mod diagnostics;
pub mod msr;
pub mod utils;

// Re-export commonly used types
pub use converters::musicxml::{
    translate_musicxml_to_msr, ParseError, TranslationError, TranslationResult,
    TranslationSettings,
};
pub use diagnostics::{Diagnostic, DiagnosticSeverity, Diagnostics};
pub use msr::Score;

use wasm_bindgen::prelude::*;

// This is like the `main` function, but for WASM modules.
#[wasm_bindgen(start)]
pub fn main() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();

    #[cfg(feature = "console_log")]
    if let Err(err) = console_log::init_with_level(log::Level::Debug) {
        web_sys::console::warn_1(&format!("logger already initialized: {}", err).into());
    }

    log::info!("MusicXML to MSR WASM module initialized");
}
