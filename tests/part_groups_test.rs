// Part groups: ordering by display key, nesting, implicit group, failures

mod common;

use common::{part, translate};
use musicxml_msr::msr::{PartGroupElement, PartGroupSymbol};
use musicxml_msr::{translate_musicxml_to_msr, TranslationError};

fn score(part_list: &str, part_ids: &[&str]) -> String {
    let parts: String = part_ids
        .iter()
        .map(|id| format!(r#"<part id="{}"><measure number="1"/></part>"#, id))
        .collect::<Vec<_>>()
        .join("\n  ");

    format!(
        "<score-partwise version=\"3.1\">\n  <part-list>\n{}\n  </part-list>\n  {}\n</score-partwise>",
        part_list, parts
    )
}

fn group_start(number: i32, default_x: i32) -> String {
    format!(
        r#"<part-group number="{}" type="start"><group-name>G{}</group-name><group-symbol default-x="{}">bracket</group-symbol></part-group>"#,
        number, number, default_x
    )
}

fn group_stop(number: i32) -> String {
    format!(r#"<part-group number="{}" type="stop"/>"#, number)
}

fn score_part(id: &str) -> String {
    format!(r#"<score-part id="{}"><part-name>{}</part-name></score-part>"#, id, id)
}

#[test]
fn test_parts_go_to_the_group_with_smallest_key() {
    let part_list = [
        group_start(3, -5),
        group_start(1, -20),
        group_start(2, -10),
        score_part("P1"),
        group_stop(3),
        group_stop(2),
        group_stop(1),
    ]
    .join("\n");

    let result = translate(&score(&part_list, &["P1"]));

    assert_eq!(result.score.part_groups.len(), 1);
    let outer = &result.score.part_groups[0];
    assert_eq!(outer.number, 1);
    assert_eq!(outer.display_order_key, -20);
    assert_eq!(outer.symbol, PartGroupSymbol::Bracket);

    let sub_groups: Vec<i32> = outer.sub_groups().map(|g| g.number).collect();
    assert_eq!(sub_groups, vec![2, 3]);
    assert!(matches!(outer.elements.last(), Some(PartGroupElement::Part(_))));

    assert_eq!(part(&result, "P1").part_group_number, Some(1));
    assert!(result.diagnostics.is_empty(), "{:?}", result.diagnostics);
}

#[test]
fn test_implicit_group_holds_ungrouped_parts() {
    let part_list = [score_part("P1"), score_part("P2")].join("\n");

    let result = translate(&score(&part_list, &["P1", "P2"]));

    assert_eq!(result.score.part_groups.len(), 1);
    let group = &result.score.part_groups[0];
    assert!(group.implicit);
    assert_eq!(group.name, "Implicit");
    assert_eq!(group.part_indices().len(), 2);
}

#[test]
fn test_explicit_start_closes_the_implicit_group() {
    let part_list = [
        score_part("P1"),
        group_start(1, -10),
        score_part("P2"),
        group_stop(1),
    ]
    .join("\n");

    let result = translate(&score(&part_list, &["P1", "P2"]));

    let groups = &result.score.part_groups;
    assert_eq!(groups.len(), 2);
    assert!(groups[0].implicit);
    assert_eq!(groups[1].name, "G1");

    let p2 = result.score.parts.iter().position(|p| p.id == "P2").unwrap();
    assert_eq!(groups[1].part_indices().len(), 1);
    assert_eq!(groups[1].part_indices()[0].0, p2);
}

#[test]
fn test_unclosed_group_is_force_closed_with_warning() {
    let part_list = [group_start(1, -10), score_part("P1")].join("\n");

    let result = translate(&score(&part_list, &["P1"]));

    assert_eq!(result.score.part_groups.len(), 1);
    assert!(result.diagnostics.mentions("part group 1 is never closed"));
}

#[test]
fn test_duplicate_start_is_ignored() {
    let part_list = [
        group_start(1, -10),
        group_start(1, -20),
        score_part("P1"),
        group_stop(1),
    ]
    .join("\n");

    let result = translate(&score(&part_list, &["P1"]));

    assert!(result.diagnostics.mentions("already open"));
    assert_eq!(result.score.part_groups.len(), 1);
    assert_eq!(result.score.part_groups[0].display_order_key, -10);
}

#[test]
fn test_stop_of_unknown_group_aborts() {
    let part_list = [score_part("P1"), group_stop(7)].join("\n");
    let xml = score(&part_list, &["P1"]);

    let err = translate_musicxml_to_msr(&xml, None).unwrap_err();

    assert!(matches!(err, TranslationError::Internal { .. }));
    assert_eq!(err.line(), Some(4), "line of the part-group stop");
    assert!(err.to_string().contains("part group 7 is not open"));
}

#[test]
fn test_group_without_symbol_sorts_first() {
    let part_list = [
        group_start(1, -10),
        r#"<part-group number="2" type="start"/>"#.to_string(),
        score_part("P1"),
        group_stop(2),
        group_stop(1),
    ]
    .join("\n");

    let result = translate(&score(&part_list, &["P1"]));

    // group 2 has the smallest key, so it is current while both are open
    assert_eq!(part(&result, "P1").part_group_number, Some(2));

    assert_eq!(result.score.part_groups.len(), 1);
    let outer = &result.score.part_groups[0];
    assert_eq!(outer.number, 1);
    let inner = outer.sub_groups().next().unwrap();
    assert_eq!(inner.number, 2);
    assert_eq!(inner.symbol, PartGroupSymbol::None);
    assert_eq!(inner.display_order_key, i32::MIN);
}
