/// Parts for PowerPoint presentation documents.
///
/// Read-only views over package parts that are scanned once at load time,
/// plus the custom XML payload format.
pub mod custom_xml;
pub mod presentation;
pub mod theme;

pub use presentation::{PresentationInfo, PresentationPart};
pub use theme::Theme;
