/// Open Packaging Conventions (OPC) layer.
///
/// A presentation file is a ZIP container of parts joined by relationships.
/// This module reads such a container into an [`OpcPackage`], lets callers
/// replace part content or add parts, and writes it back out.
///
/// - `memchr` for scanning part content for relationship references
/// - `atoi_simd` for relationship id parsing
/// - `quick-xml` for `[Content_Types].xml` and `.rels` items
/// - `zip` for the physical container

pub mod constants;
pub mod error;
pub mod package;
pub mod packuri;
pub mod part;
pub mod phys_pkg;
pub mod pkgreader;
pub mod pkgwriter;
pub mod rel;

pub use package::OpcPackage;
pub use packuri::PackURI;
pub use part::{BlobPart, Part, XmlPart};
pub use rel::{Relationship, Relationships};
