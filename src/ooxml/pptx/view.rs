//! Slide views that pair a slide with the tiers and package behind it.
//!
//! [`SlideRef`] reads, [`SlideMut`] edits. Both carry the slide's
//! [`TierChain`], so inherited geometry and fonts are available next to the
//! shapes, and the package, so images and custom data can be reached through
//! the slide's relationships.

use crate::ooxml::error::{CapabilityError, Result};
use crate::ooxml::opc::OpcPackage;
use crate::ooxml::opc::constants::{content_type as CT, relationship_type as RT};
use crate::ooxml::opc::packuri::PackURI;
use crate::ooxml::opc::part::XmlPart;
use crate::ooxml::pptx::autofit::{self, FitBox, TextMeasurer};
use crate::ooxml::pptx::media::{self, Image};
use crate::ooxml::pptx::parts::custom_xml;
use crate::ooxml::pptx::resolve::{ResolvedFont, TierChain};
use crate::ooxml::pptx::shapes::{AutoFitType, Geometry, Paragraph, Portion, Shape, ShapeTree};
use crate::ooxml::pptx::slide::{Slide, SlideLayout, SlideMaster};
use log::{debug, trace};
use std::ops::{Deref, DerefMut};

/// Read access to a slide.
#[derive(Debug, Clone, Copy)]
pub struct SlideRef<'a> {
    slide: &'a Slide,
    chain: TierChain<'a>,
    package: &'a OpcPackage,
    index: usize,
}

impl<'a> SlideRef<'a> {
    pub(crate) fn new(slide: &'a Slide, chain: TierChain<'a>, package: &'a OpcPackage, index: usize) -> Self {
        Self {
            slide,
            chain,
            package,
            index,
        }
    }

    /// Zero-based position in the presentation.
    pub fn index(&self) -> usize {
        self.index
    }

    /// One-based slide number.
    pub fn number(&self) -> usize {
        self.index + 1
    }

    pub fn slide(&self) -> &'a Slide {
        self.slide
    }

    pub fn partname(&self) -> &'a PackURI {
        self.slide.partname()
    }

    pub fn name(&self) -> Option<&'a str> {
        self.slide.name()
    }

    /// Top-level shapes in document order.
    pub fn shapes(&self) -> &'a ShapeTree {
        self.slide.shapes()
    }

    pub fn layout(&self) -> Option<&'a SlideLayout> {
        self.chain.layout
    }

    pub fn master(&self) -> Option<&'a SlideMaster> {
        self.chain.master
    }

    pub fn chain(&self) -> TierChain<'a> {
        self.chain
    }

    pub fn hidden(&self) -> bool {
        self.slide.hidden()
    }

    /// Custom data stored with the slide, if any was ever set.
    pub fn custom_data(&self) -> Result<Option<String>> {
        custom_data(self.package, self.slide.partname())
    }

    /// The background picture, if the background is an image.
    pub fn background(&self) -> Result<Option<Image<'a>>> {
        match self.slide.background_rel_id() {
            Some(r_id) => media::image(self.package, self.slide.partname(), r_id).map(Some),
            None => Ok(None),
        }
    }

    /// The image of a picture shape on this slide.
    pub fn image(&self, shape: &Shape) -> Result<Image<'a>> {
        shape.ensure_live()?;
        let r_id = shape.image_rel_id().ok_or(CapabilityError::NotAPicture)?;
        media::image(self.package, self.slide.partname(), r_id)
    }

    /// Geometry of `shape` with missing fields inherited from the layout and master.
    pub fn geometry(&self, shape: &Shape) -> Geometry {
        self.chain.geometry(shape)
    }

    pub fn font(&self, shape: &Shape, paragraph: &Paragraph, portion: Option<&Portion>) -> ResolvedFont {
        self.chain.font(shape, paragraph, portion)
    }
}

fn custom_data(package: &OpcPackage, slide: &PackURI) -> Result<Option<String>> {
    let Some(rel) = package.get_part(slide)?.rels().first_with_reltype(RT::CUSTOM_XML) else {
        return Ok(None);
    };
    let part = package.get_part(&rel.target_partname()?)?;
    custom_xml::read_payload(part.blob()).map(Some)
}

/// Write access to a slide.
///
/// Edits mark the slide so that it is written back when the presentation is
/// saved.
pub struct SlideMut<'a> {
    slide: &'a mut Slide,
    chain: TierChain<'a>,
    package: &'a mut OpcPackage,
    measurer: &'a dyn TextMeasurer,
    index: usize,
}

impl<'a> SlideMut<'a> {
    pub(crate) fn new(
        slide: &'a mut Slide,
        chain: TierChain<'a>,
        package: &'a mut OpcPackage,
        measurer: &'a dyn TextMeasurer,
        index: usize,
    ) -> Self {
        Self {
            slide,
            chain,
            package,
            measurer,
            index,
        }
    }

    /// Read access to the same slide.
    pub fn view(&self) -> SlideRef<'_> {
        SlideRef::new(&*self.slide, self.chain, &*self.package, self.index)
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn hidden(&self) -> bool {
        self.slide.hidden()
    }

    /// Hide the slide in slide show.
    pub fn hide(&mut self) {
        self.set_hidden(true);
    }

    pub fn set_hidden(&mut self, hidden: bool) {
        debug!("Slide {} hidden: {hidden}", self.index + 1);
        self.slide.set_hidden(hidden);
    }

    pub fn custom_data(&self) -> Result<Option<String>> {
        custom_data(&*self.package, self.slide.partname())
    }

    /// Store `data` with the slide, replacing earlier custom data.
    ///
    /// The value is kept in a custom XML part related from the slide and reads
    /// back unchanged after save and reopen.
    pub fn set_custom_data(&mut self, data: &str) -> Result<()> {
        let source = self.slide.partname();
        let existing = self
            .package
            .get_part(source)?
            .rels()
            .first_with_reltype(RT::CUSTOM_XML)
            .map(|rel| rel.target_partname())
            .transpose()?;

        if let Some(target) = existing {
            self.package.get_part_mut(&target)?.set_blob(custom_xml::to_xml(data));
            return Ok(());
        }

        let target = self.package.next_partname(custom_xml::PARTNAME_TEMPLATE)?;
        debug!("Adding custom data part {} for {}", target, source);
        self.package.add_part(Box::new(XmlPart::new(
            target.clone(),
            CT::XML.to_string(),
            custom_xml::to_xml(data),
        )));
        self.package.get_part_mut(source)?.relate_to(&target, RT::CUSTOM_XML);
        Ok(())
    }

    pub fn background(&self) -> Result<Option<Image<'_>>> {
        self.view().background()
    }

    /// Use `bytes` as the background picture.
    ///
    /// An existing background image is overwritten; any other background is
    /// replaced by a stretched picture fill.
    pub fn set_background_image(&mut self, bytes: Vec<u8>) -> Result<()> {
        let source = self.slide.partname().clone();
        let r_id = match self.slide.background_rel_id() {
            Some(r_id) => {
                let r_id = r_id.to_string();
                match media::store_image(self.package, &source, &r_id, bytes)? {
                    Some(new_id) => new_id,
                    None => return Ok(()),
                }
            },
            None => media::add_image(self.package, &source, bytes)?,
        };
        self.slide.set_background_rel_id(&r_id);
        Ok(())
    }

    pub fn shapes(&self) -> &ShapeTree {
        self.slide.shapes()
    }

    /// Shapes for direct edits (paragraphs, tables, fills).
    pub fn shapes_mut(&mut self) -> &mut ShapeTree {
        self.slide.shapes_mut()
    }

    /// A shape by id, searched through groups.
    pub fn shape_mut(&mut self, id: u32) -> Option<ShapeMut<'_>> {
        let source = self.slide.partname().clone();
        let shape = self.slide.shapes_mut().find_by_id_mut(id)?;
        Some(ShapeMut {
            shape,
            chain: self.chain,
            package: &mut *self.package,
            source,
            measurer: self.measurer,
        })
    }

    /// Remove a shape by id. The returned shape is marked removed.
    pub fn remove_shape(&mut self, id: u32) -> Option<Shape> {
        let removed = self.slide.shapes_mut().remove(id);
        if removed.is_some() {
            debug!("Removed shape {id} from slide {}", self.index + 1);
        }
        removed
    }
}

/// A slide shape with the context needed for edits that reach outside the
/// shape: autofit needs inherited geometry and fonts, images live in the
/// package.
pub struct ShapeMut<'a> {
    shape: &'a mut Shape,
    chain: TierChain<'a>,
    package: &'a mut OpcPackage,
    source: PackURI,
    measurer: &'a dyn TextMeasurer,
}

impl ShapeMut<'_> {
    /// Replace the whole text of the shape.
    ///
    /// The frame collapses to its base paragraph, with line feeds in `text`
    /// becoming line breaks. Under shrink autofit every portion takes the
    /// paragraph's dominant size, lowered until the text fits the shape.
    /// Frames that cannot change are left untouched.
    ///
    /// # Examples
    ///
    /// ```rust,ignore
    /// let mut slide = pres.slide_mut(0).unwrap();
    /// if let Some(mut title) = slide.shape_mut(2) {
    ///     title.set_text("Quarterly results\nQ3")?;
    /// }
    /// ```
    pub fn set_text(&mut self, text: &str) -> Result<()> {
        self.shape.ensure_live()?;
        let frame = self.shape.text_frame().ok_or(CapabilityError::NoTextFrame)?;
        frame.check_editable()?;
        let font_size = match frame.autofit_type() {
            AutoFitType::Shrink => self.shrunk_font_size(text),
            _ => None,
        };
        self.shape
            .text_frame_mut()
            .ok_or(CapabilityError::NoTextFrame)?
            .replace_text(text, font_size)
    }

    /// Size for `text` under shrink autofit: the dominant size of the base
    /// paragraph, lowered until the text fits the shape.
    fn shrunk_font_size(&self, text: &str) -> Option<i32> {
        let shape = &*self.shape;
        let frame = shape.text_frame()?;
        let geometry = self.chain.geometry(shape);
        let (Some(cx), Some(cy)) = (geometry.width, geometry.height) else {
            debug!("Shape {} has no size; autofit skipped", shape.id());
            return None;
        };
        let paragraph = frame.paragraphs().get(frame.base_paragraph_index()?)?;

        let fonts: Vec<ResolvedFont> = paragraph
            .portions()
            .iter()
            .filter(|portion| portion.is_text())
            .map(|portion| self.chain.font(shape, paragraph, Some(portion)))
            .collect();
        let sizes: Vec<i32> = fonts.iter().map(|font| font.size).collect();
        let font = match autofit::dominant_font_size(&sizes) {
            Some(size) => fonts.into_iter().find(|font| font.size == size)?,
            None => self.chain.font(shape, paragraph, None),
        };

        let text = text.replace("\r\n", "\n");
        let size = autofit::shrink_font_size(
            &text,
            &font.name,
            font.size,
            FitBox::from_emu(cx, cy),
            self.measurer,
        );
        trace!("Shape {} dominant size {}pt, fitted {}pt", shape.id(), font.size, size);
        Some(size)
    }

    /// The picture's image.
    pub fn image(&self) -> Result<Image<'_>> {
        self.shape.ensure_live()?;
        let r_id = self.shape.image_rel_id().ok_or(CapabilityError::NotAPicture)?;
        media::image(&*self.package, &self.source, r_id)
    }

    /// Replace the picture's image with `bytes`.
    pub fn set_image(&mut self, bytes: Vec<u8>) -> Result<()> {
        self.shape.ensure_live()?;
        let r_id = self
            .shape
            .image_rel_id()
            .ok_or(CapabilityError::NotAPicture)?
            .to_string();
        if let Some(new_id) = media::store_image(self.package, &self.source, &r_id, bytes)? {
            self.shape.set_image_rel_id(&new_id)?;
        }
        Ok(())
    }

    /// Geometry with inherited fields filled in.
    pub fn geometry(&self) -> Geometry {
        self.chain.geometry(&*self.shape)
    }
}

impl Deref for ShapeMut<'_> {
    type Target = Shape;

    fn deref(&self) -> &Shape {
        &*self.shape
    }
}

impl DerefMut for ShapeMut<'_> {
    fn deref_mut(&mut self) -> &mut Shape {
        &mut *self.shape
    }
}
