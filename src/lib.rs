//! Slidekit - a mutable object model for PowerPoint (.pptx) presentations
//!
//! Slides, layouts and masters are read into shape trees whose text, fills,
//! tables and pictures can be inspected and edited, then saved back into the
//! package.
//!
//! # Features
//!
//! - **Placeholder inheritance**: geometry and fonts resolve slide → layout → master
//! - **Text autofit**: replacing text in a shrink-to-fit frame lowers the font size until it fits
//! - **Lazy shape trees**: built on first access and rebuilt after a reset
//! - **Open limits**: oversized packages and decks with too many slides are rejected
//! - **Slide state**: hidden flag, background picture and custom data survive save and reopen
//!
//! # Example - Reading a presentation
//!
//! ```no_run
//! use slidekit::ooxml::pptx::Presentation;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let pres = Presentation::open("deck.pptx")?;
//! for slide in pres.slides() {
//!     for shape in slide.shapes().iter_recursive() {
//!         if let Some(frame) = shape.text_frame() {
//!             println!("{} / {}: {}", slide.number(), shape.name(), frame.text());
//!         }
//!     }
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Example - Editing and saving
//!
//! ```no_run
//! use slidekit::ooxml::pptx::{Limits, Presentation};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let limits = Limits::load("limits.yaml")?;
//! let mut pres = Presentation::open_with_limits("deck.pptx", &limits)?;
//!
//! let mut slide = pres.slide_mut(0).unwrap();
//! slide.hide();
//! slide.set_custom_data("{\"owner\":\"finance\"}")?;
//! slide.set_background_image(std::fs::read("background.png")?)?;
//!
//! pres.save_as("deck-edited.pptx")?;
//! pres.close();
//! # Ok(())
//! # }
//! ```

/// Format-neutral helpers shared by the OOXML layers
pub mod common;

/// OOXML (Office Open XML) packages and PresentationML
///
/// This module provides the OPC container layer and the .pptx object model.
pub mod ooxml;

// Re-export commonly used types for convenience
pub use ooxml::error::{CapabilityError, OoxmlError, Result, StateError, ValidationError};
pub use ooxml::pptx::{Limits, Presentation, ShapeMut, SlideMut, SlideRef};
