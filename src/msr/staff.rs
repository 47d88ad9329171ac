//! Staves

use crate::msr::attributes::{Clef, Key, Time};
use crate::msr::voice::Voice;
use crate::utils::words::int_to_english_words;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Staff {
    pub input_line: usize,
    pub number: i32,
    pub part_id: String,
    /// Display name of the owning part, used to name voices
    pub part_name: String,
    pub clef: Option<Clef>,
    pub key: Option<Key>,
    pub time: Option<Time>,
    pub voices: BTreeMap<i32, Voice>,
}

impl Staff {
    pub fn new(
        number: i32,
        part_id: impl Into<String>,
        part_name: impl Into<String>,
        input_line: usize,
    ) -> Self {
        Self {
            input_line,
            number,
            part_id: part_id.into(),
            part_name: part_name.into(),
            clef: None,
            key: None,
            time: None,
            voices: BTreeMap::new(),
        }
    }

    /// Voice `number`, created empty on first reference
    pub fn resolve_or_create_voice(&mut self, number: i32, input_line: usize) -> &mut Voice {
        let Staff { number: staff_number, part_id, part_name, voices, .. } = self;

        voices.entry(number).or_insert_with(|| {
            let name = format!(
                "{}_Staff_{}_Voice_{}",
                part_name,
                int_to_english_words(i64::from(*staff_number)),
                int_to_english_words(i64::from(number)),
            );
            log::debug!("creating voice {} in staff {} of part {}", number, staff_number, part_id);
            Voice::new(number, *staff_number, part_id.clone(), name, input_line)
        })
    }

    pub fn voice(&self, number: i32) -> Option<&Voice> {
        self.voices.get(&number)
    }

    pub fn voice_mut(&mut self, number: i32) -> Option<&mut Voice> {
        self.voices.get_mut(&number)
    }

    pub fn voices_mut(&mut self) -> impl Iterator<Item = &mut Voice> {
        self.voices.values_mut()
    }
}
