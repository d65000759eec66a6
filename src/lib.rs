//! 法令本文中の条・項・号への参照を検出し、参照先を解決する。
//!
//! ```no_run
//! use hourei_reference::{DocumentPosition, ExternalLawRegistry, ReferenceDetector};
//!
//! # fn main() -> anyhow::Result<()> {
//! let detector = ReferenceDetector::new(ExternalLawRegistry::builtin())?;
//! let position = DocumentPosition::new("129AC0000000089", "94");
//! for reference in detector.detect("前条第一項の規定による意思表示", &position) {
//!     println!("{} -> {:?}", reference.text, reference.target());
//! }
//! # Ok(())
//! # }
//! ```

pub mod anchor;
pub mod catalog;
pub mod confidence;
pub mod config;
pub mod detector;
pub mod effect;
pub mod law_name;
pub mod model;
pub mod negative;
pub mod normalize;
pub mod numeral;
pub mod registry;
pub mod span;

pub use config::DetectorConfig;
pub use detector::{ReferenceDetector, TextUnit};
pub use model::{
    Citation, ClausePart, DocumentPosition, ProvisionTarget, Reference, ReferenceEffect,
    ReferenceRow, ReferenceType, RelativeDirection, RelativeUnit, Span, StructurePath,
    StructureType,
};
pub use numeral::{ProvisionNumber, arabic_to_kanji, kanji_to_arabic, parse_numeral};
pub use registry::{ExternalLawRegistry, ExternalLawResolver, LawEntry};
