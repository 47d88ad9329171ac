//! Part groups (braces, brackets) and their nesting

use crate::msr::part::PartIndex;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PartGroupSymbol {
    #[default]
    None,
    Brace,
    Bracket,
    Line,
    Square,
}

impl PartGroupSymbol {
    pub fn from_musicxml(value: &str) -> Option<Self> {
        match value {
            "none" => Some(PartGroupSymbol::None),
            "brace" => Some(PartGroupSymbol::Brace),
            "bracket" => Some(PartGroupSymbol::Bracket),
            "line" => Some(PartGroupSymbol::Line),
            "square" => Some(PartGroupSymbol::Square),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PartGroupElement {
    Part(PartIndex),
    PartGroup(PartGroup),
}

/// A group of parts joined by a symbol
///
/// `number` is only unique among currently open groups; `absolute_number`
/// identifies one group lifetime for the whole translation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PartGroup {
    pub input_line: usize,
    pub absolute_number: usize,
    pub number: i32,
    pub name: String,
    pub abbreviation: String,
    pub symbol: PartGroupSymbol,
    /// `default-x` of the group symbol; lower sorts further left
    pub display_order_key: i32,
    pub barline: bool,
    /// Synthesized for parts declared outside any group
    pub implicit: bool,
    pub elements: Vec<PartGroupElement>,
}

impl PartGroup {
    pub fn add_part(&mut self, part: PartIndex) {
        self.elements.push(PartGroupElement::Part(part));
    }

    pub fn prepend_sub_group(&mut self, group: PartGroup) {
        self.elements.insert(0, PartGroupElement::PartGroup(group));
    }

    pub fn contains_part(&self, part: PartIndex) -> bool {
        self.elements.iter().any(|element| match element {
            PartGroupElement::Part(index) => *index == part,
            PartGroupElement::PartGroup(group) => group.contains_part(part),
        })
    }

    /// Parts at any depth, in display order
    pub fn part_indices(&self) -> Vec<PartIndex> {
        let mut indices = Vec::new();
        for element in &self.elements {
            match element {
                PartGroupElement::Part(index) => indices.push(*index),
                PartGroupElement::PartGroup(group) => indices.extend(group.part_indices()),
            }
        }
        indices
    }

    pub fn sub_groups(&self) -> impl Iterator<Item = &PartGroup> {
        self.elements.iter().filter_map(|element| match element {
            PartGroupElement::PartGroup(group) => Some(group),
            PartGroupElement::Part(_) => None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn group(number: i32) -> PartGroup {
        PartGroup {
            input_line: 0,
            absolute_number: number as usize,
            number,
            name: String::new(),
            abbreviation: String::new(),
            symbol: PartGroupSymbol::Bracket,
            display_order_key: 0,
            barline: true,
            implicit: false,
            elements: Vec::new(),
        }
    }

    #[test]
    fn test_sub_groups_are_prepended() {
        let mut outer = group(1);
        outer.add_part(PartIndex(0));

        let mut inner = group(2);
        inner.add_part(PartIndex(1));
        outer.prepend_sub_group(inner);

        assert!(matches!(outer.elements[0], PartGroupElement::PartGroup(_)));
        assert!(outer.contains_part(PartIndex(1)));
        assert_eq!(outer.part_indices(), vec![PartIndex(1), PartIndex(0)]);
        assert_eq!(outer.sub_groups().count(), 1);
    }
}
