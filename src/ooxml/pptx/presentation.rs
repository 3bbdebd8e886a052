/// Main presentation object - the high-level API for working with presentations.
use crate::ooxml::error::{OoxmlError, Result, StateError};
use crate::ooxml::opc::OpcPackage;
use crate::ooxml::opc::constants::{content_type as CT, relationship_type as RT};
use crate::ooxml::opc::part::Part;
use crate::ooxml::pptx::autofit::{ApproximateMetrics, TextMeasurer};
use crate::ooxml::pptx::config::Limits;
use crate::ooxml::pptx::parts::PresentationPart;
use crate::ooxml::pptx::resolve::TierChain;
use crate::ooxml::pptx::slide::{Slide, SlideLayout, SlideMaster};
use crate::ooxml::pptx::validation::{check_package_size, check_slide_count};
use crate::ooxml::pptx::view::{SlideMut, SlideRef};
use log::debug;
use std::collections::HashMap;
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::Path;

/// Main-part content types accepted as presentations.
const PRESENTATION_TYPES: [&str; 4] = [
    CT::PML_PRESENTATION_MAIN,
    CT::PML_PRES_MACRO_MAIN,
    CT::PML_TEMPLATE_MAIN,
    CT::PML_SLIDESHOW_MAIN,
];

/// A PowerPoint presentation.
///
/// Owns the package it was opened from. Slides, layouts and masters are read
/// when the presentation opens; their shape trees are built on first access.
///
/// # Examples
///
/// ```rust,no_run
/// use slidekit::ooxml::pptx::Presentation;
///
/// let mut pres = Presentation::open("deck.pptx")?;
/// for slide in pres.slides() {
///     println!("Slide {}: {} shapes", slide.number(), slide.shapes().len());
/// }
///
/// if let Some(mut slide) = pres.slide_mut(0) {
///     slide.hide();
///     slide.set_custom_data("reviewed")?;
/// }
/// pres.save_as("deck-reviewed.pptx")?;
/// pres.close();
/// # Ok::<(), slidekit::ooxml::error::OoxmlError>(())
/// ```
pub struct Presentation {
    package: Option<OpcPackage>,
    slides: Vec<Slide>,
    layouts: Vec<SlideLayout>,
    masters: Vec<SlideMaster>,
    slide_size: Option<(i64, i64)>,
    measurer: Box<dyn TextMeasurer>,
}

impl Presentation {
    /// Open a presentation file with the process-wide [`Limits`].
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::open_with_limits(path, &Limits::global())
    }

    /// Open a presentation file.
    ///
    /// The file size is checked before the package is read.
    pub fn open_with_limits<P: AsRef<Path>>(path: P, limits: &Limits) -> Result<Self> {
        let path = path.as_ref();
        let size = std::fs::metadata(path)?.len();
        debug!("Opening presentation {} ({} bytes)", path.display(), size);
        check_package_size(size, limits)?;
        Self::load(OpcPackage::open(path)?, limits)
    }

    /// Open a presentation from its bytes with the process-wide [`Limits`].
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        Self::from_bytes_with_limits(data, &Limits::global())
    }

    pub fn from_bytes_with_limits(data: &[u8], limits: &Limits) -> Result<Self> {
        check_package_size(data.len() as u64, limits)?;
        Self::load(OpcPackage::from_bytes(data)?, limits)
    }

    /// Open a presentation from a seekable stream with the process-wide [`Limits`].
    pub fn from_reader<R: Read + Seek>(reader: R) -> Result<Self> {
        Self::from_reader_with_limits(reader, &Limits::global())
    }

    pub fn from_reader_with_limits<R: Read + Seek>(mut reader: R, limits: &Limits) -> Result<Self> {
        let start = reader.stream_position()?;
        let size = reader.seek(SeekFrom::End(0))? - start;
        reader.seek(SeekFrom::Start(start))?;
        check_package_size(size, limits)?;
        Self::load(OpcPackage::from_reader(reader)?, limits)
    }

    fn load(package: OpcPackage, limits: &Limits) -> Result<Self> {
        let main = package.main_document_part()?;
        let content_type = main.content_type();
        if !PRESENTATION_TYPES.contains(&content_type) {
            return Err(OoxmlError::InvalidContentType {
                expected: CT::PML_PRESENTATION_MAIN.to_string(),
                got: content_type.to_string(),
            });
        }

        let info = PresentationPart::from_part(main).info()?;
        if let Err(err) = check_slide_count(info.slide_rids.len(), limits) {
            package.close();
            return Err(err.into());
        }
        debug!(
            "Presentation has {} slides and {} masters",
            info.slide_rids.len(),
            info.master_rids.len()
        );

        let mut masters = Vec::with_capacity(info.master_rids.len());
        let mut layouts = Vec::new();
        let mut layout_index: HashMap<String, usize> = HashMap::new();
        for r_id in &info.master_rids {
            let master_part = package.get_part(&main.related_partname(r_id)?)?;
            let master = SlideMaster::load(master_part, &package)?;
            for layout_rid in master.layout_rids() {
                let partname = master_part.related_partname(&layout_rid)?;
                if layout_index.contains_key(partname.as_str()) {
                    continue;
                }
                layouts.push(SlideLayout::load(package.get_part(&partname)?, masters.len())?);
                layout_index.insert(partname.to_string(), layouts.len() - 1);
            }
            masters.push(master);
        }

        let mut slides = Vec::with_capacity(info.slide_rids.len());
        for r_id in &info.slide_rids {
            let slide_part = package.get_part(&main.related_partname(r_id)?)?;
            let layout_name = slide_part
                .rels()
                .part_with_reltype(RT::SLIDE_LAYOUT)?
                .target_partname()?;
            let layout = match layout_index.get(layout_name.as_str()) {
                Some(&index) => index,
                None => {
                    // layout not listed by its master
                    let layout_part = package.get_part(&layout_name)?;
                    let master = layout_part
                        .rels()
                        .first_with_reltype(RT::SLIDE_MASTER)
                        .and_then(|rel| rel.target_partname().ok())
                        .and_then(|name| masters.iter().position(|m: &SlideMaster| m.partname() == &name))
                        .unwrap_or(0);
                    debug!("Loading unlisted layout {}", layout_name);
                    layouts.push(SlideLayout::load(layout_part, master)?);
                    layout_index.insert(layout_name.to_string(), layouts.len() - 1);
                    layouts.len() - 1
                },
            };
            let placeholders = layouts[layout].placeholders();
            slides.push(Slide::load(slide_part, layout)?.with_layout_placeholders(placeholders));
        }

        let slide_size = info.slide_width.zip(info.slide_height);
        Ok(Self {
            package: Some(package),
            slides,
            layouts,
            masters,
            slide_size,
            measurer: Box::new(ApproximateMetrics),
        })
    }

    /// Number of slides.
    pub fn slide_count(&self) -> usize {
        self.slides.len()
    }

    /// All slides in presentation order.
    pub fn slides(&self) -> impl Iterator<Item = SlideRef<'_>> {
        let package = self.package.as_ref();
        self.slides
            .iter()
            .enumerate()
            .filter_map(move |(index, slide)| {
                Some(SlideRef::new(slide, self.chain(slide), package?, index))
            })
    }

    /// The slide at zero-based `index`.
    pub fn slide(&self, index: usize) -> Option<SlideRef<'_>> {
        let slide = self.slides.get(index)?;
        Some(SlideRef::new(slide, self.chain(slide), self.package.as_ref()?, index))
    }

    /// Edit the slide at zero-based `index`.
    pub fn slide_mut(&mut self, index: usize) -> Option<SlideMut<'_>> {
        let Self {
            package,
            slides,
            layouts,
            masters,
            measurer,
            ..
        } = self;
        let package = package.as_mut()?;
        let slide = slides.get_mut(index)?;
        let chain = tier_chain(layouts, masters, slide.layout_index());
        Some(SlideMut::new(slide, chain, package, &**measurer, index))
    }

    fn chain(&self, slide: &Slide) -> TierChain<'_> {
        tier_chain(&self.layouts, &self.masters, slide.layout_index())
    }

    pub fn layouts(&self) -> &[SlideLayout] {
        &self.layouts
    }

    pub fn masters(&self) -> &[SlideMaster] {
        &self.masters
    }

    /// Slide width and height in EMU (`p:sldSz`).
    pub fn slide_size(&self) -> Option<(i64, i64)> {
        self.slide_size
    }

    /// Measure text for shrink autofit with `measurer`.
    pub fn set_text_measurer(&mut self, measurer: Box<dyn TextMeasurer>) {
        self.measurer = measurer;
    }

    /// The underlying package, until the presentation is closed.
    pub fn package(&self) -> Option<&OpcPackage> {
        self.package.as_ref()
    }

    /// Save to a file.
    pub fn save_as<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        let path = path.as_ref();
        debug!("Saving presentation to {}", path.display());
        self.flush()?.save(path)?;
        Ok(())
    }

    /// Save to any byte sink.
    pub fn write_to<W: Write>(&mut self, writer: W) -> Result<()> {
        self.flush()?.write_to(writer)?;
        Ok(())
    }

    pub fn to_bytes(&mut self) -> Result<Vec<u8>> {
        Ok(self.flush()?.to_bytes()?)
    }

    /// Write edited slides back into their parts.
    fn flush(&mut self) -> Result<&OpcPackage> {
        let package = self.package.as_mut().ok_or(StateError::Closed)?;
        for slide in self.slides.iter_mut().filter(|s| s.is_dirty()) {
            let part = package.get_part_mut(slide.partname())?;
            part.set_blob(slide.to_xml().into_bytes());
            prune_image_rels(part);
            slide.mark_clean();
        }
        Ok(package)
    }

    pub fn is_closed(&self) -> bool {
        self.package.is_none()
    }

    /// Release the package. Later calls do nothing.
    pub fn close(&mut self) {
        if let Some(package) = self.package.take() {
            debug!("Closing presentation with {} slides", self.slides.len());
            self.slides.clear();
            self.layouts.clear();
            self.masters.clear();
            package.close();
        }
    }
}

impl std::fmt::Debug for Presentation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Presentation")
            .field("slides", &self.slides.len())
            .field("layouts", &self.layouts.len())
            .field("masters", &self.masters.len())
            .field("slide_size", &self.slide_size)
            .field("closed", &self.is_closed())
            .finish()
    }
}

fn tier_chain<'a>(layouts: &'a [SlideLayout], masters: &'a [SlideMaster], layout: usize) -> TierChain<'a> {
    let layout = layouts.get(layout);
    let master = layout.and_then(|l| masters.get(l.master_index()));
    TierChain::new(layout, master)
}

/// Drop image relationships the part content no longer mentions.
fn prune_image_rels(part: &mut dyn Part) {
    let unused: Vec<String> = part
        .rels()
        .iter()
        .filter(|rel| rel.reltype() == RT::IMAGE && part.rel_ref_count(rel.r_id()) == 0)
        .map(|rel| rel.r_id().to_string())
        .collect();
    for r_id in unused {
        debug!("Dropping unused image relationship {} of {}", r_id, part.partname());
        part.rels_mut().remove(&r_id);
    }
}
