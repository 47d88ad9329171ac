//! MSR: the Music Score Representation
//!
//! Strongly typed score model produced by the MusicXML translator and handed
//! whole to the downstream rendering stage. Pure data plus the structural
//! operations the translator needs (lookup-or-create, append, segment split);
//! no parsing logic lives here.
//!
//! # Containment
//!
//! ```text
//! Score
//! ├── Identification, PageGeometry
//! ├── part_groups: Vec<PartGroup>
//! │   └── elements: PartGroupElement::{Part(PartIndex), PartGroup}
//! └── parts: Vec<Part>                  (arena, addressed by PartIndex)
//!     └── staves: BTreeMap<i32, Staff>
//!         └── voices: BTreeMap<i32, Voice>
//!             ├── chunk: VoiceChunk
//!             │   └── VoiceElement::{Note, Chord, Tuplet, Barline,
//!             │                      Repeat, Tempo, BarCheck, ...}
//!             └── lyrics: BTreeMap<i32, Lyrics>
//!                 └── LyricChunk*
//! ```
//!
//! Parts live in an arena owned by the Score; part groups refer to them by
//! index so that a group can be moved (closed, nested) while its parts keep
//! being filled. Children refer back to their parents by identity only
//! (part id, staff number), never by pointer.

pub mod attributes;
pub mod barline;
pub mod chord;
pub mod lyrics;
pub mod marks;
pub mod note;
pub mod part;
pub mod part_group;
pub mod score;
pub mod staff;
pub mod tuplet;
pub mod voice;

use num_rational::Rational64;

/// Durations and measure positions, in fractions of a whole note
pub type Rational = Rational64;

pub use attributes::{Clef, ClefSign, Key, KeyMode, Time, TimeSymbol};
pub use barline::{
    BarStyle, Barline, BarlineCategory, BarlineLocation, EndingType, Repeat, RepeatDirection,
    RepeatEnding, RepeatEndingKind, RepeatWinged,
};
pub use chord::{Chord, ChordHost};
pub use lyrics::{LyricChunk, LyricChunkKind, Lyrics};
pub use marks::{
    Articulation, ArticulationKind, Dynamics, DynamicsKind, Placement, Tempo, Wedge, WedgeKind,
};
pub use note::{
    Beam, BeamKind, DisplayPosition, Note, NoteKind, Pitch, Slur, SlurKind, StemDirection, Step,
    TieKind,
};
pub use part::{Part, PartIndex, StaffCollision};
pub use part_group::{PartGroup, PartGroupElement, PartGroupSymbol};
pub use score::{Creator, Identification, PageGeometry, Score};
pub use staff::Staff;
pub use tuplet::{Tuplet, TupletElement, TupletKind};
pub use voice::{
    BarCheck, BarNumberCheck, Break, MeasureLocation, Voice, VoiceChunk, VoiceElement,
};
