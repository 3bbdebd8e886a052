/// PowerPoint (.pptx) presentation support.
///
/// Reads a presentation into slides, layouts and masters, each with a shape
/// tree built on first access, and writes edits back into the package.
///
/// # Architecture
///
/// - `Presentation`: owns the package; opening runs the size and slide-count checks
/// - `SlideMaster` / `SlideLayout` / `Slide`: the three tiers of the placeholder chain
/// - `SlideRef` / `SlideMut`: a slide together with its tiers and package
/// - `ShapeMut`: shape edits that need inherited values (text autofit, images)
/// - `TierChain`: inherited geometry and fonts for a slide's shapes
/// - `Limits`: package size and slide count limits
///
/// # Example
///
/// ```rust,no_run
/// use slidekit::ooxml::pptx::{PlaceholderType, Presentation};
///
/// let mut pres = Presentation::open("deck.pptx")?;
/// for slide in pres.slides() {
///     if let Some(title) = slide.shapes().shape_by_placeholder_type(PlaceholderType::Title) {
///         let frame = title.text_frame().unwrap();
///         let paragraph = &frame.paragraphs()[0];
///         let font = slide.font(title, paragraph, paragraph.portions().first());
///         println!("{}: {} ({}pt {})", slide.number(), frame.text(), font.size, font.name);
///     }
/// }
///
/// let mut slide = pres.slide_mut(0).unwrap();
/// if let Some(mut shape) = slide.shape_mut(2) {
///     shape.set_text("Updated title")?;
/// }
/// pres.save_as("deck-updated.pptx")?;
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub mod autofit;
pub mod cache;
pub mod config;
pub mod media;
pub mod parts;
pub mod presentation;
pub mod resolve;
pub mod shapes;
pub mod slide;
pub mod validation;
pub mod view;

#[cfg(test)]
mod testing;

#[cfg(feature = "fonts")]
pub use autofit::TrueTypeMetrics;
pub use autofit::{ApproximateMetrics, TextMeasurer};
pub use cache::ResettableLazy;
pub use config::Limits;
pub use media::{Image, ImageFormat};
pub use presentation::Presentation;
pub use resolve::{ResolvedFont, TierChain};
pub use shapes::{
    AutoFitType, Fill, Geometry, Paragraph, PlaceholderType, Portion, Shape, ShapeKind, ShapeTree, Table, TableCell,
    TextAlignment, TextFrame,
};
pub use slide::{MasterTextStyles, Slide, SlideLayout, SlideMaster};
pub use view::{ShapeMut, SlideMut, SlideRef};
