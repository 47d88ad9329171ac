//! MusicXML → MSR translation entry points for JavaScript

use crate::api::helpers::{js_error, serialize, to_json};
use crate::converters::musicxml::{translate_musicxml_to_msr, TranslationResult, TranslationSettings};
use crate::{wasm_info, wasm_log};
use wasm_bindgen::prelude::*;

/// Settings from an optional JSON object; absent or empty means defaults
pub fn parse_settings(settings_json: Option<&str>) -> Result<Option<TranslationSettings>, serde_json::Error> {
    match settings_json.map(str::trim) {
        None | Some("") => Ok(None),
        Some(json) => serde_json::from_str(json).map(Some),
    }
}

fn translate(musicxml: &str, settings_json: Option<String>) -> Result<TranslationResult, JsValue> {
    let settings = parse_settings(settings_json.as_deref())
        .map_err(|e| js_error("Settings parse error", e))?;

    let result = translate_musicxml_to_msr(musicxml, settings)
        .map_err(|e| js_error("Translation error", e))?;

    wasm_info!(
        "  MSR built: {} part(s), {} part group(s)",
        result.score.parts.len(),
        result.score.part_groups.len()
    );
    if !result.diagnostics.is_empty() {
        wasm_log!("  {} diagnostic(s) during translation", result.diagnostics.len());
    }
    Ok(result)
}

/// Translate a MusicXML document to MSR
///
/// # Arguments
/// * `musicxml` - partwise MusicXML document
/// * `settings_json` - optional `TranslationSettings` as JSON
///
/// # Returns
/// JSON string of `{ score, diagnostics }`
#[wasm_bindgen(js_name = translateMusicXMLToMsr)]
pub fn translate_musicxml_to_msr_json(musicxml: String, settings_json: Option<String>) -> Result<String, JsValue> {
    wasm_info!("translateMusicXMLToMsr called ({} bytes)", musicxml.len());

    let result = translate(&musicxml, settings_json)?;
    to_json(&result, "Result serialization error")
}

/// Same as `translateMusicXMLToMsr`, returned as a JavaScript object
#[wasm_bindgen(js_name = translateMusicXMLToMsrObject)]
pub fn translate_musicxml_to_msr_object(musicxml: String, settings_json: Option<String>) -> Result<JsValue, JsValue> {
    wasm_info!("translateMusicXMLToMsrObject called ({} bytes)", musicxml.len());

    let result = translate(&musicxml, settings_json)?;
    serialize(&result, "Result serialization error")
}
