//! Shared helpers for the translation integration tests

#![allow(dead_code)]

use musicxml_msr::msr::{Part, Voice};
use musicxml_msr::{translate_musicxml_to_msr, TranslationResult, TranslationSettings};

/// Wrap measures in a one-part partwise score (part `P1`)
pub fn partwise(measures: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<score-partwise version="3.1">
  <part-list>
    <score-part id="P1"><part-name>Soprano</part-name></score-part>
  </part-list>
  <part id="P1">
{}
  </part>
</score-partwise>"#,
        measures
    )
}

pub fn translate(xml: &str) -> TranslationResult {
    translate_musicxml_to_msr(xml, None).expect("translation should succeed")
}

pub fn translate_with(xml: &str, settings: TranslationSettings) -> TranslationResult {
    translate_musicxml_to_msr(xml, Some(settings)).expect("translation should succeed")
}

pub fn part<'a>(result: &'a TranslationResult, id: &str) -> &'a Part {
    result
        .score
        .part_by_id(id)
        .unwrap_or_else(|| panic!("part {} should exist", id))
}

pub fn voice<'a>(result: &'a TranslationResult, staff: i32, number: i32) -> &'a Voice {
    part(result, "P1")
        .voice(staff, number)
        .unwrap_or_else(|| panic!("voice {} of staff {} should exist", number, staff))
}

/// `<note>` with pitch `step`4 and `duration` divisions, plus extra children
pub fn note(step: &str, duration: u32, extra: &str) -> String {
    format!(
        "<note><pitch><step>{}</step><octave>4</octave></pitch><duration>{}</duration>{}</note>",
        step, duration, extra
    )
}

pub fn rest(duration: u32, extra: &str) -> String {
    format!("<note><rest/><duration>{}</duration>{}</note>", duration, extra)
}
