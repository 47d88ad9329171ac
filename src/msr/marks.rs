//! Marks attached to notes and chords, plus tempo indications
//!
//! Articulations, dynamics and wedges are collected while a `<note>` or a
//! `<direction>` is being read and transferred onto the next Note (or onto
//! the Chord it turns out to belong to).

use crate::msr::voice::MeasureLocation;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Placement {
    Above,
    Below,
}

impl Placement {
    pub fn from_musicxml(value: &str) -> Option<Self> {
        match value {
            "above" => Some(Placement::Above),
            "below" => Some(Placement::Below),
            _ => None,
        }
    }
}

// ============================================================================
// ARTICULATIONS
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ArticulationKind {
    Staccato,
    Staccatissimo,
    Accent,
    StrongAccent,
    Tenuto,
    DetachedLegato,
    Spiccato,
    Fermata,
}

impl ArticulationKind {
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "staccato" => Some(ArticulationKind::Staccato),
            "staccatissimo" => Some(ArticulationKind::Staccatissimo),
            "accent" => Some(ArticulationKind::Accent),
            "strong-accent" => Some(ArticulationKind::StrongAccent),
            "tenuto" => Some(ArticulationKind::Tenuto),
            "detached-legato" => Some(ArticulationKind::DetachedLegato),
            "spiccato" => Some(ArticulationKind::Spiccato),
            "fermata" => Some(ArticulationKind::Fermata),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Articulation {
    pub kind: ArticulationKind,
    pub placement: Option<Placement>,
    pub input_line: usize,
}

// ============================================================================
// DYNAMICS
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DynamicsKind {
    P,
    PP,
    PPP,
    PPPP,
    PPPPP,
    PPPPPP,
    F,
    FF,
    FFF,
    FFFF,
    FFFFF,
    FFFFFF,
    MP,
    MF,
    FP,
    SF,
    SFZ,
    SFP,
    RF,
    RFZ,
    FZ,
}

impl DynamicsKind {
    /// Map a `<dynamics>` child tag to its kind
    pub fn from_tag(tag: &str) -> Option<Self> {
        let kind = match tag {
            "p" => DynamicsKind::P,
            "pp" => DynamicsKind::PP,
            "ppp" => DynamicsKind::PPP,
            "pppp" => DynamicsKind::PPPP,
            "ppppp" => DynamicsKind::PPPPP,
            "pppppp" => DynamicsKind::PPPPPP,
            "f" => DynamicsKind::F,
            "ff" => DynamicsKind::FF,
            "fff" => DynamicsKind::FFF,
            "ffff" => DynamicsKind::FFFF,
            "fffff" => DynamicsKind::FFFFF,
            "ffffff" => DynamicsKind::FFFFFF,
            "mp" => DynamicsKind::MP,
            "mf" => DynamicsKind::MF,
            "fp" => DynamicsKind::FP,
            "sf" => DynamicsKind::SF,
            "sfz" => DynamicsKind::SFZ,
            "sfp" => DynamicsKind::SFP,
            "rf" => DynamicsKind::RF,
            "rfz" => DynamicsKind::RFZ,
            "fz" => DynamicsKind::FZ,
            _ => return None,
        };
        Some(kind)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dynamics {
    pub kind: DynamicsKind,
    pub placement: Option<Placement>,
    pub input_line: usize,
}

// ============================================================================
// WEDGES
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WedgeKind {
    Crescendo,
    Diminuendo,
    Stop,
}

impl WedgeKind {
    pub fn from_musicxml(value: &str) -> Option<Self> {
        match value {
            "crescendo" => Some(WedgeKind::Crescendo),
            "diminuendo" => Some(WedgeKind::Diminuendo),
            "stop" => Some(WedgeKind::Stop),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Wedge {
    pub kind: WedgeKind,
    pub placement: Option<Placement>,
    pub input_line: usize,
}

// ============================================================================
// TEMPO
// ============================================================================

/// Tempo mark built from a `<direction>`'s `<words>` and `<metronome>`
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Tempo {
    /// Text indication ("Allegro"), empty when only a metronome mark is given
    pub indication: String,
    /// Metronome beat unit as written ("quarter", "half", ...)
    pub beat_unit: Option<String>,
    pub beat_unit_dots: u32,
    pub per_minute: Option<String>,
    pub parentheses: bool,
    pub location: MeasureLocation,
    pub input_line: usize,
}

impl Tempo {
    pub fn words(indication: impl Into<String>, input_line: usize) -> Self {
        Self {
            indication: indication.into(),
            input_line,
            ..Self::default()
        }
    }

    pub fn has_metronome(&self) -> bool {
        self.beat_unit.is_some() && self.per_minute.is_some()
    }
}
