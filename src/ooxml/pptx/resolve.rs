//! Property inheritance across the slide, layout and master tiers.
//!
//! A property missing on a slide shape is looked up on the layout shape with
//! the same placeholder index, then on the master shape of the matching
//! placeholder type. Values merge field by field: a tier may settle the width
//! of a shape while its position still comes from the master.
//!
//! Fonts go one step further. Every tier is searched by the paragraph's
//! indentation level, and the master's text styles (`p:txStyles`) close the
//! chain.

use crate::ooxml::pptx::shapes::{
    DEFAULT_FONT_NAME, DEFAULT_FONT_SIZE, FontData, Geometry, Paragraph, Placeholder,
    PlaceholderType, Portion, Shape, TextStyleKind, Tier,
};
use crate::ooxml::pptx::slide::{SlideLayout, SlideMaster};
use log::trace;

/// The layout and master a slide inherits from.
#[derive(Debug, Clone, Copy, Default)]
pub struct TierChain<'a> {
    pub layout: Option<&'a SlideLayout>,
    pub master: Option<&'a SlideMaster>,
}

/// A font with every field settled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedFont {
    /// Size in points
    pub size: i32,
    pub name: String,
    pub bold: bool,
    pub italic: bool,
}

impl<'a> TierChain<'a> {
    pub fn new(layout: Option<&'a SlideLayout>, master: Option<&'a SlideMaster>) -> Self {
        Self { layout, master }
    }

    /// Layout shape with the same placeholder index.
    pub fn layout_counterpart(&self, placeholder: &Placeholder) -> Option<&'a Shape> {
        self.layout?
            .shapes()
            .shape_by_placeholder_index(placeholder.index)
    }

    /// Master shape for a placeholder of type `kind`.
    pub fn master_counterpart(&self, kind: PlaceholderType) -> Option<&'a Shape> {
        self.master?
            .shapes()
            .shape_by_placeholder_type(kind.master_type())
    }

    /// Placeholder type that decides the master counterpart and text style.
    ///
    /// A slide placeholder that names no type (`obj`) takes the type of its
    /// layout counterpart.
    pub fn effective_type(&self, shape: &Shape) -> Option<PlaceholderType> {
        let placeholder = shape.placeholder()?;
        if shape.tier() == Tier::Slide
            && let Some(layout_ph) = self
                .layout_counterpart(placeholder)
                .and_then(Shape::placeholder)
        {
            return Some(layout_ph.kind);
        }
        Some(placeholder.kind)
    }

    /// Shapes `shape` inherits from, nearest first.
    pub fn ancestors(&self, shape: &Shape) -> impl Iterator<Item = &'a Shape> + use<'a> {
        let (layout, master) = match (shape.placeholder(), shape.tier()) {
            (None, _) | (_, Tier::Master) => (None, None),
            (Some(ph), Tier::Slide) => (
                self.layout_counterpart(ph),
                self.effective_type(shape)
                    .and_then(|kind| self.master_counterpart(kind)),
            ),
            (Some(ph), Tier::Layout) => (None, self.master_counterpart(ph.kind)),
        };
        [layout, master].into_iter().flatten()
    }

    /// First value `get` finds on the shape or one of its ancestors.
    pub fn resolve<T>(&self, shape: &Shape, get: impl Fn(&Shape) -> Option<T>) -> Option<T> {
        get(shape).or_else(|| self.ancestors(shape).find_map(|ancestor| get(ancestor)))
    }

    /// Position and size, each field taken from the nearest tier defining it.
    pub fn geometry(&self, shape: &Shape) -> Geometry {
        let mut geometry = *shape.own_geometry();
        for ancestor in self.ancestors(shape) {
            if geometry.is_complete() {
                break;
            }
            geometry.fill_from(ancestor.own_geometry());
        }
        if !geometry.is_complete() {
            trace!("Geometry of shape {} is incomplete after inheritance", shape.id());
        }
        geometry
    }

    /// Font fields found along the chain for a portion of `paragraph`.
    ///
    /// Without a portion only inherited values are considered, as for text
    /// about to be inserted.
    pub fn font_data(&self, shape: &Shape, paragraph: &Paragraph, portion: Option<&Portion>) -> FontData {
        let level = paragraph.level();
        let mut font = portion.map(Portion::font).unwrap_or_default();
        let frame_font = |s: &Shape| {
            s.text_frame()
                .and_then(|frame| frame.level_fonts().lookup(level))
                .cloned()
        };

        if let Some(own) = frame_font(shape) {
            font.fill_from(&own);
        }
        // Shapes that are not placeholders have nothing to inherit from.
        if shape.placeholder().is_none() {
            return font;
        }
        for ancestor in self.ancestors(shape) {
            if font.is_complete() {
                return font;
            }
            if let Some(inherited) = frame_font(ancestor) {
                font.fill_from(&inherited);
            }
        }
        if !font.is_complete()
            && let (Some(master), Some(kind)) = (self.master, self.effective_type(shape))
        {
            match master.text_styles().get(kind.text_style()).level(level) {
                Some(style) => font.fill_from(style),
                None => trace!("No {kind} text style at level {level}"),
            }
        }
        font
    }

    /// Font of a portion with defaults applied to fields no tier defines.
    ///
    /// Theme references such as `+mn-lt` are replaced by the master theme's
    /// typeface.
    pub fn font(&self, shape: &Shape, paragraph: &Paragraph, portion: Option<&Portion>) -> ResolvedFont {
        let data = self.font_data(shape, paragraph, portion);
        let style = self
            .effective_type(shape)
            .map_or(TextStyleKind::Other, |kind| kind.text_style());
        let theme = self.master.map(SlideMaster::theme);

        let name = match (data.latin_name.as_deref(), theme) {
            (Some(typeface), Some(theme)) => theme.resolve_typeface(typeface).map(str::to_string),
            (Some(typeface), None) if !typeface.starts_with('+') => Some(typeface.to_string()),
            (_, Some(theme)) if style == TextStyleKind::Title => theme.major_font.clone(),
            (_, Some(theme)) => theme.minor_font.clone(),
            _ => None,
        };

        ResolvedFont {
            size: data.size.unwrap_or(DEFAULT_FONT_SIZE),
            name: name.unwrap_or_else(|| DEFAULT_FONT_NAME.to_string()),
            bold: data.bold.unwrap_or(false),
            italic: data.italic.unwrap_or(false),
        }
    }
}
