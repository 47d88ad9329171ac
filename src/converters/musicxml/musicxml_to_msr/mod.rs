//! MusicXML to MSR translation
//!
//! Translates a partwise MusicXML document into the MSR score model.
//!
//! # Overview
//!
//! Translation is a single depth-first pass:
//! 1. **Parse**: build an element tree with roxmltree
//! 2. **Browse**: `TreeBrowser` walks it in document order
//! 3. **Translate**: `MsrTranslator` reacts to each known element's entry
//!    and exit, accumulating fields and mutating the `Score`
//!
//! Irregularities in the input are collected as diagnostics and never stop
//! translation. Only a structural impossibility (closing a part group that
//! was never opened, a staff number used twice) aborts with a
//! `TranslationError::Internal`.
//!
//! # Basic Usage
//!
//! ```ignore
//! use musicxml_msr::converters::musicxml::translate_musicxml_to_msr;
//!
//! let result = translate_musicxml_to_msr(musicxml, None)?;
//! for part in &result.score.parts {
//!     println!("{} ({} staves)", part.msr_name, part.staves.len());
//! }
//! for diagnostic in result.diagnostics.warnings() {
//!     eprintln!("{}", diagnostic);
//! }
//! ```

/// Log a structural event when `settings.trace` is on
macro_rules! trace_event {
    ($translator:expr, $($arg:tt)+) => {
        if $translator.settings.trace {
            log::info!($($arg)+);
        }
    };
}

pub mod browser;
pub mod element;
pub mod errors;
pub mod registries;
pub mod session;
pub mod translator;
pub mod types;

mod barlines;
mod lyrics;
mod notes;

#[cfg(test)]
#[path = "tests.rs"]
mod tests;

// Re-export main API
pub use browser::{ElementVisitor, TreeBrowser};
pub use element::{ElementKind, MusicXmlElement};
pub use errors::{ParseError, SettingsError, TranslationError};
pub use translator::MsrTranslator;
pub use types::{TranslationResult, TranslationSettings};

/// Translate a MusicXML document into an MSR score
///
/// # Arguments
///
/// * `musicxml` - partwise MusicXML document as string; a DOCTYPE is allowed
/// * `settings` - Optional translation settings (uses defaults if None)
///
/// # Returns
///
/// * `Ok(TranslationResult)` - The score plus the diagnostics collected on the way
/// * `Err(TranslationError)` - Unparseable XML, a timewise score, or an internal error
pub fn translate_musicxml_to_msr(
    musicxml: &str,
    settings: Option<TranslationSettings>,
) -> Result<TranslationResult, TranslationError> {
    let settings = settings.unwrap_or_default();

    let options = roxmltree::ParsingOptions {
        allow_dtd: true,
        ..roxmltree::ParsingOptions::default()
    };
    let doc = roxmltree::Document::parse_with_options(musicxml, options)
        .map_err(|e| ParseError::InvalidXml(format!("XML parse error: {}", e)))?;

    let root = doc.root_element();
    match root.tag_name().name() {
        "score-partwise" => {}
        other => {
            return Err(ParseError::UnsupportedFormat(format!(
                "root element is <{}>, only <score-partwise> is translated",
                other
            ))
            .into())
        }
    }

    log::debug!("translating {} ({} bytes)", settings.input_source_name, musicxml.len());

    let mut translator = MsrTranslator::new(settings);
    TreeBrowser::browse(root, &mut translator)?;

    Ok(translator.into_result())
}
