// Repeat and ending reconstruction from barlines

mod common;

use common::{note, partwise, translate, voice};
use musicxml_msr::msr::{BarStyle, BarlineCategory, RepeatEndingKind, VoiceElement};

const FORWARD: &str =
    r#"<barline location="left"><bar-style>heavy-light</bar-style><repeat direction="forward"/></barline>"#;
const BACKWARD: &str =
    r#"<barline location="right"><bar-style>light-heavy</bar-style><repeat direction="backward"/></barline>"#;

fn ending_start(number: &str) -> String {
    format!(r#"<barline location="left"><ending number="{}" type="start"/></barline>"#, number)
}

fn hooked_end(number: &str) -> String {
    format!(
        r#"<barline location="right"><ending number="{}" type="stop"/><repeat direction="backward"/></barline>"#,
        number
    )
}

fn hookless_end(number: &str) -> String {
    format!(r#"<barline location="right"><ending number="{}" type="discontinue"/></barline>"#, number)
}

fn measure(number: u32, body: &str) -> String {
    if number == 1 {
        format!(
            r#"<measure number="1"><attributes><divisions>1</divisions></attributes>{}</measure>"#,
            body
        )
    } else {
        format!(r#"<measure number="{}">{}</measure>"#, number, body)
    }
}

#[test]
fn test_hooked_ending_without_start_gets_implicit_start() {
    let xml = partwise(&[
        measure(1, &note("C", 4, "")),
        measure(2, &format!("{}{}{}", ending_start("1"), note("D", 4, ""), hooked_end("1"))),
        measure(3, &format!("{}{}{}", ending_start("2"), note("E", 4, ""), hookless_end("2"))),
    ]
    .join("\n"));

    let result = translate(&xml);
    let voice = voice(&result, 1, 1);

    assert_eq!(voice.elements().len(), 1, "the repeat takes the whole voice");
    let VoiceElement::Repeat(repeat) = &voice.elements()[0] else {
        panic!("expected a repeat, got {:?}", voice.elements()[0]);
    };

    assert!(repeat.implicit_start);
    let VoiceElement::Barline(start) = &repeat.body.elements[0] else {
        panic!("body should open with the synthesized barline");
    };
    assert!(start.implicit);
    assert_eq!(start.category, BarlineCategory::RepeatStart);
    assert_eq!(start.style, Some(BarStyle::HeavyLight));

    let endings: Vec<_> = repeat.endings.iter().map(|e| e.kind).collect();
    assert_eq!(endings, vec![RepeatEndingKind::Hooked, RepeatEndingKind::Hookless]);
    assert!(result.diagnostics.is_empty(), "{:?}", result.diagnostics);
}

#[test]
fn test_explicit_start_is_not_duplicated() {
    let xml = partwise(&[
        measure(1, &format!("{}{}{}", FORWARD, note("C", 4, ""), BACKWARD)),
    ]
    .join("\n"));

    let result = translate(&xml);
    let voice = voice(&result, 1, 1);

    let VoiceElement::Repeat(repeat) = voice.elements().last().unwrap() else {
        panic!("expected a repeat last");
    };
    assert!(!repeat.implicit_start);

    let starts = repeat
        .body
        .elements
        .iter()
        .filter(|e| matches!(e, VoiceElement::Barline(b) if b.category == BarlineCategory::RepeatStart))
        .count();
    assert_eq!(starts, 1);
    assert_eq!(repeat.body.elements.len(), 3, "start barline, note, end barline");
}

#[test]
fn test_consecutive_repeats_stay_separate() {
    let xml = partwise(&[
        measure(1, &format!("{}{}{}", FORWARD, note("C", 4, ""), BACKWARD)),
        measure(2, &format!("{}{}{}", FORWARD, note("D", 4, ""), BACKWARD)),
    ]
    .join("\n"));

    let result = translate(&xml);
    let voice = voice(&result, 1, 1);

    let repeats: Vec<_> = voice
        .elements()
        .iter()
        .filter_map(|e| match e {
            VoiceElement::Repeat(repeat) => Some(repeat),
            _ => None,
        })
        .collect();
    assert_eq!(repeats.len(), 2);
    assert!(repeats.iter().all(|r| !r.implicit_start && r.body.elements.len() == 3));
    assert!(matches!(voice.elements()[0], VoiceElement::BarCheck(_)));
}

#[test]
fn test_decorative_barline_stays_in_voice() {
    let xml = partwise(&measure(
        1,
        &format!(
            "{}{}",
            note("C", 4, ""),
            r#"<barline location="right"><bar-style>light-light</bar-style></barline>"#
        ),
    ));

    let result = translate(&xml);
    let voice = voice(&result, 1, 1);

    let Some(VoiceElement::Barline(barline)) = voice.elements().last() else {
        panic!("expected the barline last");
    };
    assert_eq!(barline.category, BarlineCategory::Standalone);
    assert_eq!(barline.style, Some(BarStyle::LightLight));
    assert_eq!(barline.measure_location.measure_number, "1");
}

#[test]
fn test_unknown_bar_style_is_a_recoverable_error() {
    let xml = partwise(&measure(
        1,
        &format!(
            "{}{}",
            note("C", 4, ""),
            r#"<barline location="right"><bar-style>fancy</bar-style></barline>"#
        ),
    ));

    let result = translate(&xml);

    assert!(result.diagnostics.has_errors());
    assert!(result.diagnostics.mentions("bar-style \"fancy\""));
    assert!(matches!(
        voice(&result, 1, 1).elements().last(),
        Some(VoiceElement::Barline(b)) if b.style.is_none()
    ));
}

#[test]
fn test_repeat_never_ended_is_closed_with_warning() {
    let xml = partwise(&measure(1, &format!("{}{}", FORWARD, note("C", 4, ""))));

    let result = translate(&xml);
    let voice = voice(&result, 1, 1);

    assert_eq!(result.diagnostics.warnings().count(), 1);
    assert!(result.diagnostics.mentions("never ended"));
    let VoiceElement::Repeat(repeat) = voice.elements().last().unwrap() else {
        panic!("expected a repeat last");
    };
    assert_eq!(repeat.body.elements.len(), 2);
}
