/// Shapes module for PowerPoint presentations.
///
/// This module provides types for working with shapes on slides, including:
/// - Auto shapes with text frames, paragraphs and portions
/// - Pictures, tables, charts and group shapes
/// - Placeholders and the fonts they inherit
pub mod base;
pub mod fill;
pub mod font;
pub mod paragraph;
pub mod picture;
pub mod placeholder;
pub mod table;
pub mod textframe;
pub mod tree;

pub use base::{Geometry, Shape, ShapeKind, Tier};
pub use fill::{ColorRef, Fill, GradientStop};
pub use font::{DEFAULT_FONT_NAME, DEFAULT_FONT_SIZE, FontData, LevelFonts};
pub use paragraph::{Bullet, BulletKind, Paragraph, Portion, PortionKind, TextAlignment};
pub use placeholder::{Placeholder, PlaceholderType, TextStyleKind};
pub use table::{Table, TableCell, TableRow};
pub use textframe::{AutoFitType, TextFrame};
pub use tree::{Descendants, ShapeTree};
