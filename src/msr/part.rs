//! Parts and their staves

use crate::msr::attributes::{Clef, Key, Time};
use crate::msr::staff::Staff;
use crate::msr::voice::Voice;
use serde::{Deserialize, Serialize};
use std::collections::btree_map::Entry;
use std::collections::BTreeMap;
use thiserror::Error;

/// Position of a part in the score's part arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PartIndex(pub usize);

/// A staff number was created twice in the same part
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("staff {staff} already exists in part \"{part}\"")]
pub struct StaffCollision {
    pub part: String,
    pub staff: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Part {
    pub input_line: usize,
    /// Id from `<score-part id>`, spaces replaced by underscores
    pub id: String,
    /// Display name, from the renaming table or coined from the id
    pub msr_name: String,
    pub name: String,
    pub abbreviation: String,
    pub instrument_name: String,
    /// Number of the part group the part was placed in
    pub part_group_number: Option<i32>,
    pub divisions_per_quarter: i32,
    /// Values new staves inherit
    pub clef: Option<Clef>,
    pub key: Option<Key>,
    pub time: Option<Time>,
    pub staves: BTreeMap<i32, Staff>,
}

impl Part {
    pub fn new(id: impl Into<String>, msr_name: impl Into<String>, input_line: usize) -> Self {
        Self {
            input_line,
            id: id.into(),
            msr_name: msr_name.into(),
            name: String::new(),
            abbreviation: String::new(),
            instrument_name: String::new(),
            part_group_number: None,
            divisions_per_quarter: 1,
            clef: None,
            key: None,
            time: None,
            staves: BTreeMap::new(),
        }
    }

    fn staff_inheriting(
        number: i32,
        id: &str,
        msr_name: &str,
        inherited: (&Option<Clef>, &Option<Key>, &Option<Time>),
        input_line: usize,
    ) -> Staff {
        let mut staff = Staff::new(number, id, msr_name, input_line);
        staff.clef = inherited.0.clone();
        staff.key = inherited.1.clone();
        staff.time = inherited.2.clone();
        staff
    }

    /// Create staff `number`; fails if it already exists
    pub fn add_staff(&mut self, number: i32, input_line: usize) -> Result<&mut Staff, StaffCollision> {
        let Part { id, msr_name, clef, key, time, staves, .. } = self;

        match staves.entry(number) {
            Entry::Occupied(_) => Err(StaffCollision {
                part: id.clone(),
                staff: number,
            }),
            Entry::Vacant(slot) => Ok(slot.insert(Self::staff_inheriting(
                number,
                id,
                msr_name,
                (&*clef, &*key, &*time),
                input_line,
            ))),
        }
    }

    /// Staff `number`, created on first reference
    pub fn resolve_or_create_staff(&mut self, number: i32, input_line: usize) -> &mut Staff {
        let Part { id, msr_name, clef, key, time, staves, .. } = self;

        staves.entry(number).or_insert_with(|| {
            log::debug!("creating staff {} in part {}", number, id);
            Self::staff_inheriting(number, id, msr_name, (&*clef, &*key, &*time), input_line)
        })
    }

    pub fn resolve_or_create_voice(
        &mut self,
        staff_number: i32,
        voice_number: i32,
        input_line: usize,
    ) -> &mut Voice {
        self.resolve_or_create_staff(staff_number, input_line)
            .resolve_or_create_voice(voice_number, input_line)
    }

    pub fn staff(&self, number: i32) -> Option<&Staff> {
        self.staves.get(&number)
    }

    pub fn voice(&self, staff_number: i32, voice_number: i32) -> Option<&Voice> {
        self.staff(staff_number)?.voice(voice_number)
    }

    pub fn voices_mut(&mut self) -> impl Iterator<Item = &mut Voice> {
        self.staves.values_mut().flat_map(|staff| staff.voices_mut())
    }

    // ------------------------------------------------------------------
    // Attributes. Number 0 addresses the part and every staff.
    // ------------------------------------------------------------------

    pub fn set_clef(&mut self, staff_number: i32, clef: Clef, input_line: usize) {
        if staff_number == 0 {
            for staff in self.staves.values_mut() {
                staff.clef = Some(clef.clone());
            }
            self.clef = Some(clef);
        } else {
            self.resolve_or_create_staff(staff_number, input_line).clef = Some(clef);
        }
    }

    pub fn set_key(&mut self, staff_number: i32, key: Key, input_line: usize) {
        if staff_number == 0 {
            for staff in self.staves.values_mut() {
                staff.key = Some(key.clone());
            }
            self.key = Some(key);
        } else {
            self.resolve_or_create_staff(staff_number, input_line).key = Some(key);
        }
    }

    pub fn set_time(&mut self, staff_number: i32, time: Time, input_line: usize) {
        if staff_number == 0 {
            for staff in self.staves.values_mut() {
                staff.time = Some(time.clone());
            }
            self.time = Some(time);
        } else {
            self.resolve_or_create_staff(staff_number, input_line).time = Some(time);
        }
    }
}
