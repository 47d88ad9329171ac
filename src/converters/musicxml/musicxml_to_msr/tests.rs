//! Scenario tests for MusicXML → MSR translation

use super::*;
use crate::msr::{
    BarlineCategory, LyricChunkKind, NoteKind, Rational, RepeatEndingKind, TupletElement, Voice,
    VoiceElement,
};

fn partwise(measures: &str) -> String {
    format!(
        r#"<?xml version="1.0"?>
<score-partwise version="3.1">
  <part-list>
    <score-part id="P1"><part-name>Voice</part-name></score-part>
  </part-list>
  <part id="P1">
{}
  </part>
</score-partwise>"#,
        measures
    )
}

fn translate(xml: &str) -> TranslationResult {
    translate_musicxml_to_msr(xml, None).unwrap()
}

fn voice(result: &TranslationResult, staff: i32, number: i32) -> &Voice {
    result
        .score
        .part_by_id("P1")
        .and_then(|part| part.voice(staff, number))
        .unwrap()
}

fn note(step: &str, duration: u32) -> String {
    format!(
        "<note><pitch><step>{}</step><octave>4</octave></pitch><duration>{}</duration></note>",
        step, duration
    )
}

fn tuplet_note(step: &str, marker: &str) -> String {
    format!(
        "<note><pitch><step>{}</step><octave>4</octave></pitch><duration>1</duration>\
         <time-modification><actual-notes>3</actual-notes><normal-notes>2</normal-notes></time-modification>\
         <notations>{}</notations></note>",
        step, marker
    )
}

#[test]
fn test_chord_retrofits_previous_note() {
    let xml = partwise(
        r#"<measure number="1">
  <attributes><divisions>1</divisions></attributes>
  <note><pitch><step>C</step><octave>4</octave></pitch><duration>1</duration></note>
  <note><chord/><pitch><step>E</step><octave>4</octave></pitch><duration>1</duration></note>
  <note><chord/><pitch><step>G</step><octave>4</octave></pitch><duration>1</duration></note>
  <note><pitch><step>D</step><octave>4</octave></pitch><duration>1</duration></note>
</measure>"#,
    );
    let result = translate(&xml);
    let voice = voice(&result, 1, 1);

    assert_eq!(voice.elements().len(), 3, "bar check, chord, note");
    let VoiceElement::Chord(chord) = &voice.elements()[1] else {
        panic!("expected a chord, got {:?}", voice.elements()[1]);
    };
    assert_eq!(chord.len(), 3);
    assert!(chord.notes.iter().all(|n| n.kind == NoteKind::ChordMember));
    assert_eq!(chord.duration, Rational::new(1, 4));

    // chord members do not advance the position
    assert_eq!(voice.position(), Rational::new(1, 2));
}

#[test]
fn test_tuplet_with_implicit_continue() {
    let xml = partwise(&format!(
        r#"<measure number="1">
  <attributes><divisions>3</divisions></attributes>
  {}
  {}
  {}
</measure>"#,
        tuplet_note("C", r#"<tuplet type="start"/>"#),
        tuplet_note("D", ""),
        tuplet_note("E", r#"<tuplet type="stop"/>"#),
    ));
    let result = translate(&xml);
    let voice = voice(&result, 1, 1);

    let VoiceElement::Tuplet(tuplet) = &voice.elements()[1] else {
        panic!("expected a tuplet, got {:?}", voice.elements()[1]);
    };
    assert_eq!(tuplet.len(), 3);
    assert_eq!((tuplet.actual_notes, tuplet.normal_notes), (3, 2));

    let TupletElement::Note(first) = &tuplet.elements[0] else {
        panic!("expected a note");
    };
    assert_eq!(first.kind, NoteKind::TupletMember);
    assert_eq!(first.duration, Rational::new(1, 12));
    assert_eq!(first.display_duration, Rational::new(1, 8));
    assert_eq!(voice.position(), Rational::new(1, 4));
}

#[test]
fn test_nested_tuplet_is_not_flattened() {
    let xml = partwise(&format!(
        r#"<measure number="1">
  <attributes><divisions>6</divisions></attributes>
  {}
  {}
  {}
  {}
  {}
</measure>"#,
        tuplet_note("C", r#"<tuplet type="start" number="1"/>"#),
        tuplet_note("D", r#"<tuplet type="start" number="2"/>"#),
        tuplet_note("E", ""),
        tuplet_note("F", r#"<tuplet type="stop" number="2"/>"#),
        tuplet_note("G", r#"<tuplet type="stop" number="1"/>"#),
    ));
    let result = translate(&xml);
    let voice = voice(&result, 1, 1);

    assert_eq!(voice.elements().len(), 2);
    let VoiceElement::Tuplet(outer) = &voice.elements()[1] else {
        panic!("expected a tuplet");
    };
    assert_eq!(outer.len(), 3);
    assert_eq!(outer.note_count(), 5);
    let TupletElement::Tuplet(inner) = &outer.elements[1] else {
        panic!("expected the inner tuplet second");
    };
    assert_eq!(inner.number, 2);
    assert_eq!(inner.len(), 3);
}

#[test]
fn test_standalone_note_flushes_open_tuplet() {
    let xml = partwise(&format!(
        r#"<measure number="1">
  <attributes><divisions>3</divisions></attributes>
  {}
  {}
  {}
</measure>"#,
        tuplet_note("C", r#"<tuplet type="start"/>"#),
        tuplet_note("D", ""),
        note("E", 3),
    ));
    let result = translate(&xml);
    let voice = voice(&result, 1, 1);

    assert_eq!(voice.elements().len(), 3);
    assert!(matches!(&voice.elements()[1], VoiceElement::Tuplet(t) if t.len() == 2));
    assert!(matches!(&voice.elements()[2], VoiceElement::Note(n) if n.kind == NoteKind::Standalone));
}

#[test]
fn test_measure_end_closes_open_tuplet() {
    let xml = partwise(&format!(
        r#"<measure number="1">
  <attributes><divisions>3</divisions></attributes>
  {}
  {}
  {}
</measure>
<measure number="2">{}</measure>"#,
        tuplet_note("C", r#"<tuplet type="start"/>"#),
        tuplet_note("D", ""),
        tuplet_note("E", ""),
        note("F", 3),
    ));
    let result = translate(&xml);
    let elements = voice(&result, 1, 1).elements();

    assert_eq!(elements.len(), 4, "{:?}", elements);
    let VoiceElement::Tuplet(tuplet) = &elements[1] else {
        panic!("expected a tuplet, got {:?}", elements[1]);
    };
    assert_eq!(tuplet.len(), 3);
    assert_eq!(tuplet.location.measure_number, "1");
    assert!(matches!(&elements[2], VoiceElement::BarCheck(c) if c.measure_number == "2"));
}

#[test]
fn test_backup_closes_open_tuplet() {
    let xml = partwise(&format!(
        r#"<measure number="1">
  <attributes><divisions>3</divisions></attributes>
  {}
  {}
  <backup><duration>2</duration></backup>
  {}
  {}
  {}
</measure>"#,
        tuplet_note("C", r#"<tuplet type="start"/>"#),
        tuplet_note("D", ""),
        tuplet_note("E", ""),
        tuplet_note("F", ""),
        tuplet_note("G", ""),
    ));
    let result = translate(&xml);
    let elements = voice(&result, 1, 1).elements();

    assert_eq!(elements.len(), 3, "{:?}", elements);
    assert!(matches!(&elements[1], VoiceElement::Tuplet(t) if t.len() == 2));
    assert!(matches!(&elements[2], VoiceElement::Tuplet(t) if t.len() == 3));
}

#[test]
fn test_forward_closes_open_tuplet() {
    let xml = partwise(&format!(
        r#"<measure number="1">
  <attributes><divisions>3</divisions></attributes>
  {}
  {}
  <forward><duration>1</duration></forward>
</measure>"#,
        tuplet_note("C", r#"<tuplet type="start"/>"#),
        tuplet_note("D", ""),
    ));
    let result = translate(&xml);
    let voice = voice(&result, 1, 1);
    let elements = voice.elements();

    assert_eq!(elements.len(), 3, "{:?}", elements);
    assert!(matches!(&elements[1], VoiceElement::Tuplet(t) if t.len() == 2));
    assert!(matches!(&elements[2], VoiceElement::Note(n) if n.kind == NoteKind::Skip));
    assert_eq!(voice.position(), Rational::new(1, 4));
}

#[test]
fn test_chord_members_sit_at_chord_start() {
    let xml = partwise(
        r#"<measure number="1">
  <attributes><divisions>1</divisions></attributes>
  <note><pitch><step>D</step><octave>4</octave></pitch><duration>1</duration></note>
  <note><pitch><step>C</step><octave>4</octave></pitch><duration>1</duration></note>
  <note><chord/><pitch><step>E</step><octave>4</octave></pitch><duration>1</duration>
    <lyric number="1"><syllabic>single</syllabic><text>la</text></lyric></note>
</measure>"#,
    );
    let result = translate(&xml);
    let voice = voice(&result, 1, 1);

    let VoiceElement::Chord(chord) = &voice.elements()[2] else {
        panic!("expected a chord, got {:?}", voice.elements()[2]);
    };
    let quarter = Rational::new(1, 4);
    assert_eq!(chord.location.position_in_measure, quarter);
    assert!(chord.notes.iter().all(|n| n.location.position_in_measure == quarter));

    let lyrics = voice.lyrics(1).unwrap();
    assert_eq!(lyrics.chunks.len(), 1);
    assert_eq!(lyrics.chunks[0].location.position_in_measure, quarter);
}

#[test]
fn test_repeat_end_without_start_synthesizes_one() {
    let xml = partwise(&format!(
        r#"<measure number="1">
  <attributes><divisions>1</divisions></attributes>
  {}
</measure>
<measure number="2">
  {}
  <barline location="right"><bar-style>light-heavy</bar-style><repeat direction="backward"/></barline>
</measure>"#,
        note("C", 4),
        note("D", 4),
    ));
    let result = translate(&xml);
    let voice = voice(&result, 1, 1);

    assert_eq!(voice.elements().len(), 1);
    let VoiceElement::Repeat(repeat) = &voice.elements()[0] else {
        panic!("expected the whole voice inside a repeat");
    };
    assert!(repeat.implicit_start);
    assert!(repeat.endings.is_empty());

    let VoiceElement::Barline(start) = &repeat.body.elements[0] else {
        panic!("expected the synthesized start barline first");
    };
    assert!(start.implicit);
    assert_eq!(start.category, BarlineCategory::RepeatStart);
    assert_eq!(start.measure_location.measure_number, "1");

    let VoiceElement::Barline(end) = repeat.body.elements.last().unwrap() else {
        panic!("expected the end barline last");
    };
    assert_eq!(end.category, BarlineCategory::RepeatEnd);
    assert!(!result.diagnostics.mentions("never"));
}

#[test]
fn test_repeat_with_hooked_and_hookless_endings() {
    let xml = partwise(&format!(
        r#"<measure number="1">
  <attributes><divisions>1</divisions></attributes>
  {}
</measure>
<measure number="2">
  <barline location="left"><bar-style>heavy-light</bar-style><repeat direction="forward"/></barline>
  {}
</measure>
<measure number="3">
  <barline location="left"><ending number="1" type="start"/></barline>
  {}
  <barline location="right"><ending number="1" type="stop"/><repeat direction="backward"/></barline>
</measure>
<measure number="4">
  <barline location="left"><ending number="2" type="start"/></barline>
  {}
  <barline location="right"><ending number="2" type="discontinue"/></barline>
</measure>"#,
        note("C", 4),
        note("D", 4),
        note("E", 4),
        note("F", 4),
    ));
    let result = translate(&xml);
    let voice = voice(&result, 1, 1);

    let VoiceElement::Repeat(repeat) = voice.elements().last().unwrap() else {
        panic!("expected the repeat last");
    };
    assert!(!repeat.implicit_start);
    assert!(matches!(
        &repeat.body.elements[0],
        VoiceElement::Barline(b) if b.category == BarlineCategory::RepeatStart && !b.implicit
    ));

    let kinds: Vec<_> = repeat.endings.iter().map(|e| (e.number.as_str(), e.kind)).collect();
    assert_eq!(
        kinds,
        vec![("1", RepeatEndingKind::Hooked), ("2", RepeatEndingKind::Hookless)]
    );
    assert!(repeat
        .endings
        .iter()
        .all(|ending| ending.chunk.elements.iter().any(|e| matches!(e, VoiceElement::Note(_)))));
    assert!(result.diagnostics.is_empty(), "{:?}", result.diagnostics);
}

#[test]
fn test_hookless_ending_end_without_start_synthesizes_one() {
    let xml = partwise(&format!(
        r#"<measure number="1">
  <attributes><divisions>1</divisions></attributes>
  {}
</measure>
<measure number="2">
  <barline location="left"><ending number="1" type="start"/></barline>
  {}
  <barline location="right"><ending number="1" type="discontinue"/></barline>
</measure>"#,
        note("C", 4),
        note("D", 4),
    ));
    let result = translate(&xml);
    let voice = voice(&result, 1, 1);

    let VoiceElement::Repeat(repeat) = &voice.elements()[0] else {
        panic!("expected a repeat");
    };
    assert!(repeat.implicit_start);
    assert_eq!(repeat.endings.len(), 1);
    assert!(matches!(&repeat.body.elements[0], VoiceElement::Barline(b) if b.implicit));
}

#[test]
fn test_backup_then_forward_restores_position_exactly() {
    let xml = partwise(
        r#"<measure number="1">
  <attributes><divisions>3</divisions></attributes>
  <note><pitch><step>C</step><octave>4</octave></pitch><duration>2</duration></note>
  <backup><duration>2</duration></backup>
  <forward><duration>2</duration></forward>
</measure>"#,
    );
    let result = translate(&xml);
    let voice = voice(&result, 1, 1);

    assert_eq!(voice.position(), Rational::new(1, 6));
    assert!(matches!(
        voice.elements().last(),
        Some(VoiceElement::Note(n)) if n.kind == NoteKind::Skip
    ));
}

#[test]
fn test_backup_past_measure_start_warns() {
    let xml = partwise(
        r#"<measure number="1">
  <attributes><divisions>1</divisions></attributes>
  <note><pitch><step>C</step><octave>4</octave></pitch><duration>1</duration></note>
  <backup><duration>2</duration></backup>
</measure>"#,
    );
    let result = translate(&xml);

    assert!(result.diagnostics.mentions("left boundary of measure 1"));
}

#[test]
fn test_lyrics_with_melisma() {
    let xml = partwise(
        r#"<measure number="1">
  <attributes><divisions>1</divisions></attributes>
  <note><pitch><step>C</step><octave>4</octave></pitch><duration>1</duration>
    <notations><slur type="start"/></notations>
    <lyric number="1"><syllabic>begin</syllabic><text>Hal</text></lyric></note>
  <note><pitch><step>D</step><octave>4</octave></pitch><duration>1</duration>
    <notations><slur type="stop"/></notations></note>
  <note><pitch><step>E</step><octave>4</octave></pitch><duration>1</duration>
    <lyric number="1"><syllabic>end</syllabic><text>le</text></lyric></note>
  <note><rest/><duration>1</duration></note>
</measure>"#,
    );
    let result = translate(&xml);
    let lyrics = voice(&result, 1, 1).lyrics(1).unwrap();

    assert_eq!(
        lyrics.kinds(),
        vec![
            LyricChunkKind::Begin,
            LyricChunkKind::Slur,
            LyricChunkKind::End,
            LyricChunkKind::Skip
        ]
    );
    assert_eq!(lyrics.chunks[0].text, "Hal");
}

#[test]
fn test_timewise_score_is_rejected() {
    let err = translate_musicxml_to_msr("<score-timewise/>", None).unwrap_err();
    assert!(matches!(err, TranslationError::Parse(ParseError::UnsupportedFormat(_))));
}

#[test]
fn test_malformed_xml_is_rejected() {
    let err = translate_musicxml_to_msr("<score-partwise><part>", None).unwrap_err();
    assert!(matches!(err, TranslationError::Parse(ParseError::InvalidXml(_))));
}

#[test]
fn test_doctype_is_accepted() {
    let xml = partwise("<measure number=\"1\"/>").replacen(
        "<score-partwise",
        "<!DOCTYPE score-partwise PUBLIC \"-//Recordare//DTD MusicXML 3.1 Partwise//EN\" \"http://www.musicxml.org/dtds/partwise.dtd\">\n<score-partwise",
        1,
    );

    assert!(translate_musicxml_to_msr(&xml, None).is_ok());
}

#[test]
fn test_part_missing_from_part_list_aborts() {
    let xml = r#"<score-partwise>
  <part-list><score-part id="P1"/></part-list>
  <part id="P2"><measure number="1"/></part>
</score-partwise>"#;

    let err = translate_musicxml_to_msr(xml, None).unwrap_err();
    assert_eq!(err.line(), Some(3));
    assert!(err.to_string().contains("P2"));
}
