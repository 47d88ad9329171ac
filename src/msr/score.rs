//! The score root: identification, page geometry, part groups and parts

use crate::msr::part::{Part, PartIndex};
use crate::msr::part_group::PartGroup;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Creator {
    /// `type` attribute: composer, arranger, lyricist, poet, ...
    pub kind: String,
    pub name: String,
}

/// Work and encoding metadata from `<work>`, `<movement-*>` and
/// `<identification>`
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Identification {
    pub work_number: Option<String>,
    pub work_title: Option<String>,
    pub movement_number: Option<String>,
    pub movement_title: Option<String>,
    pub creators: Vec<Creator>,
    pub rights: Option<String>,
    pub software: Vec<String>,
    pub encoding_date: Option<String>,
}

impl Identification {
    pub fn composers(&self) -> impl Iterator<Item = &str> {
        self.creators
            .iter()
            .filter(|c| c.kind == "composer")
            .map(|c| c.name.as_str())
    }
}

/// Page layout from `<defaults>`, lengths in centimetres
///
/// MusicXML lengths are in tenths of a staff space; `<scaling>` says how
/// many millimetres correspond to how many tenths.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageGeometry {
    pub millimeters: f64,
    pub tenths: f64,
    pub paper_height: Option<f64>,
    pub paper_width: Option<f64>,
    pub top_margin: Option<f64>,
    pub bottom_margin: Option<f64>,
    pub left_margin: Option<f64>,
    pub right_margin: Option<f64>,
    pub between_system_space: Option<f64>,
    pub page_top_space: Option<f64>,
}

impl Default for PageGeometry {
    fn default() -> Self {
        Self {
            millimeters: 7.0,
            tenths: 40.0,
            paper_height: None,
            paper_width: None,
            top_margin: None,
            bottom_margin: None,
            left_margin: None,
            right_margin: None,
            between_system_space: None,
            page_top_space: None,
        }
    }
}

impl PageGeometry {
    pub fn tenths_to_centimeters(&self, value: f64) -> f64 {
        value * self.millimeters / self.tenths / 10.0
    }

    /// Staff height (four staff spaces) in points
    pub fn global_staff_size(&self) -> f64 {
        let staff_height_mm = 40.0 * self.millimeters / self.tenths;
        staff_height_mm * 72.27 / 25.4
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Score {
    pub identification: Identification,
    pub page_geometry: PageGeometry,
    /// Top-level groups, in closing order
    pub part_groups: Vec<PartGroup>,
    pub parts: Vec<Part>,
}

impl Score {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_part_group(&mut self, group: PartGroup) {
        self.part_groups.push(group);
    }

    pub fn add_part(&mut self, part: Part) -> PartIndex {
        self.parts.push(part);
        PartIndex(self.parts.len() - 1)
    }

    pub fn part(&self, index: PartIndex) -> Option<&Part> {
        self.parts.get(index.0)
    }

    pub fn part_mut(&mut self, index: PartIndex) -> Option<&mut Part> {
        self.parts.get_mut(index.0)
    }

    pub fn part_by_id(&self, id: &str) -> Option<&Part> {
        self.parts.iter().find(|part| part.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tenths_conversion() {
        let geometry = PageGeometry {
            millimeters: 7.2319,
            tenths: 40.0,
            ..PageGeometry::default()
        };

        let cm = geometry.tenths_to_centimeters(1545.0);
        assert!((cm - 27.933).abs() < 0.001, "got {}", cm);
    }

    #[test]
    fn test_global_staff_size_default_scaling() {
        let geometry = PageGeometry::default();
        // 7 mm staff height
        assert!((geometry.global_staff_size() - 19.917).abs() < 0.01);
    }

    #[test]
    fn test_part_arena() {
        let mut score = Score::new();
        let first = score.add_part(Part::new("P1", "Part_POne", 3));
        let second = score.add_part(Part::new("P2", "Part_PTwo", 4));

        assert_eq!(first, PartIndex(0));
        assert_eq!(second, PartIndex(1));
        assert_eq!(score.part_by_id("P2").map(|p| p.input_line), Some(4));
    }
}
