//! Structural registries: open part groups and registered parts
//!
//! MusicXML numbers part groups positionally and recycles the numbers, so
//! the registry only resolves a number among the groups *currently open*.
//! Open groups are kept sorted by their display-order key (`default-x` of
//! the group symbol), never by start order. The front of that list is the
//! current group: it receives the parts being declared and the groups
//! closed while it stays open.

use crate::msr::{PartGroup, PartGroupSymbol, PartIndex, Score};
use std::collections::HashMap;
use thiserror::Error;

/// Structural failure while closing a part group
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("part group {0} is not open")]
    GroupNotOpen(i32),

    #[error("part group {0} cannot become its own sub-group")]
    SelfNesting(i32),
}

/// Attributes of a part group being opened
#[derive(Debug, Clone)]
pub struct PartGroupStart {
    pub number: i32,
    pub name: String,
    pub abbreviation: String,
    pub symbol: PartGroupSymbol,
    pub display_order_key: i32,
    pub barline: bool,
    pub implicit: bool,
    pub input_line: usize,
}

impl PartGroupStart {
    /// The group synthesized for parts declared outside any group
    pub fn implicit(input_line: usize) -> Self {
        Self {
            number: 1,
            name: "Implicit".to_string(),
            abbreviation: "Impl.".to_string(),
            symbol: PartGroupSymbol::Bracket,
            display_order_key: 0,
            barline: true,
            implicit: true,
            input_line,
        }
    }
}

#[derive(Debug, Default)]
pub struct PartGroupRegistry {
    /// Open groups, ascending display-order key
    open: Vec<PartGroup>,
    /// Group number → absolute number of the open group
    by_number: HashMap<i32, usize>,
    next_absolute_number: usize,
}

impl PartGroupRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// The open group with this number, if any
    pub fn resolve(&self, number: i32) -> Option<&PartGroup> {
        let absolute = *self.by_number.get(&number)?;
        self.open.iter().find(|group| group.absolute_number == absolute)
    }

    /// Open a group, placed before the first open group whose key is
    /// strictly greater than its own
    pub fn open(&mut self, start: PartGroupStart) -> usize {
        self.next_absolute_number += 1;
        let absolute_number = self.next_absolute_number;

        let group = PartGroup {
            input_line: start.input_line,
            absolute_number,
            number: start.number,
            name: start.name,
            abbreviation: start.abbreviation,
            symbol: start.symbol,
            display_order_key: start.display_order_key,
            barline: start.barline,
            implicit: start.implicit,
            elements: Vec::new(),
        };

        let position = self
            .open
            .iter()
            .position(|open| open.display_order_key > group.display_order_key)
            .unwrap_or(self.open.len());

        self.by_number.insert(group.number, absolute_number);
        self.open.insert(position, group);
        absolute_number
    }

    /// Close a group
    ///
    /// With no other group left open it goes to the score's top level;
    /// otherwise it is prepended to the new front group.
    pub fn close(&mut self, number: i32, score: &mut Score) -> Result<(), RegistryError> {
        let absolute = self
            .by_number
            .remove(&number)
            .ok_or(RegistryError::GroupNotOpen(number))?;
        let position = self
            .open
            .iter()
            .position(|group| group.absolute_number == absolute)
            .ok_or(RegistryError::GroupNotOpen(number))?;

        let group = self.open.remove(position);

        match self.open.first_mut() {
            None => score.add_part_group(group),
            Some(front) if front.number == group.number => {
                return Err(RegistryError::SelfNesting(number));
            }
            Some(front) => front.prepend_sub_group(group),
        }
        Ok(())
    }

    /// Group parts are added to: the front of the open list
    pub fn current_mut(&mut self) -> Option<&mut PartGroup> {
        self.open.first_mut()
    }

    pub fn is_empty(&self) -> bool {
        self.open.is_empty()
    }

    pub fn implicit_number(&self) -> Option<i32> {
        self.open.iter().find(|group| group.implicit).map(|group| group.number)
    }

    /// Numbers of open groups, innermost (last in the list) first
    pub fn open_numbers_innermost_first(&self) -> Vec<i32> {
        self.open.iter().rev().map(|group| group.number).collect()
    }

    pub fn open_keys(&self) -> Vec<i32> {
        self.open.iter().map(|group| group.display_order_key).collect()
    }
}

/// Parts declared in the part list, by id
#[derive(Debug, Default)]
pub struct PartRegistry {
    by_id: HashMap<String, PartIndex>,
}

impl PartRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, id: impl Into<String>, index: PartIndex) {
        self.by_id.insert(id.into(), index);
    }

    pub fn lookup(&self, id: &str) -> Option<PartIndex> {
        self.by_id.get(id).copied()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.by_id.contains_key(id)
    }
}
