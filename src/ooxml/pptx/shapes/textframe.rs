/// Text frame of a shape or table cell (`p:txBody`, `a:txBody`).
use super::font::LevelFonts;
use super::paragraph::{Paragraph, PortionKind};
use super::placeholder::PlaceholderType;
use crate::common::xml::Element;
use crate::ooxml::error::{CapabilityError, Result, StateError};
use crate::ooxml::pptx::cache::ResettableLazy;

/// How the frame adapts to text that does not fit (`a:bodyPr` child).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AutoFitType {
    #[default]
    None,
    /// Text shrinks on overflow (`a:normAutofit`)
    Shrink,
    /// Shape grows to fit the text (`a:spAutoFit`)
    Resize,
}

/// A text frame and its paragraphs.
///
/// The paragraphs are held outside the body element. The frame text and the
/// level font map are cached until a frame-level edit discards them.
///
/// # Examples
///
/// ```rust,ignore
/// let frame = shape.text_frame().unwrap();
/// println!("{}", frame.text());
///
/// for para in frame.paragraphs() {
///     println!("level {}: {}", para.level(), para.text());
/// }
/// ```
#[derive(Debug, Clone)]
pub struct TextFrame {
    body: Element,
    slot: usize,
    paragraphs: Vec<Paragraph>,
    autofit: AutoFitType,
    can_change: bool,
    placeholder: Option<PlaceholderType>,
    text: ResettableLazy<String>,
    level_fonts: ResettableLazy<LevelFonts>,
    removed: bool,
}

impl TextFrame {
    pub(crate) fn from_body(
        mut body: Element,
        can_change: bool,
        placeholder: Option<PlaceholderType>,
    ) -> Self {
        let autofit = body
            .child("bodyPr")
            .and_then(|pr| {
                pr.elements().find_map(|e| match e.local_name() {
                    "normAutofit" => Some(AutoFitType::Shrink),
                    "spAutoFit" => Some(AutoFitType::Resize),
                    _ => None,
                })
            })
            .unwrap_or_default();
        let (slot, taken) = body.detach(|e| e.is("p"));
        Self {
            body,
            slot,
            paragraphs: taken
                .into_iter()
                .map(|p| Paragraph::from_element(p, placeholder))
                .collect(),
            autofit,
            can_change,
            placeholder,
            text: ResettableLazy::new(),
            level_fonts: ResettableLazy::new(),
            removed: false,
        }
    }

    /// An empty `a:txBody` for table cells that have none.
    pub(crate) fn empty_cell_body() -> Element {
        Element::new("a:txBody")
            .with_child(Element::new("a:bodyPr"))
            .with_child(Element::new("a:lstStyle"))
            .with_child(Element::new("a:p"))
    }

    /// Paragraph texts joined with `"\n"`.
    pub fn text(&self) -> &str {
        self.text.get(|| {
            self.paragraphs
                .iter()
                .map(Paragraph::text)
                .collect::<Vec<_>>()
                .join("\n")
        })
    }

    pub fn paragraphs(&self) -> &[Paragraph] {
        &self.paragraphs
    }

    /// Mutable access to a paragraph. The frame's cached text is dropped.
    pub fn paragraph_mut(&mut self, index: usize) -> Option<&mut Paragraph> {
        self.text.reset();
        self.paragraphs.get_mut(index)
    }

    /// Append an empty paragraph with the properties of the last one.
    pub fn add_paragraph(&mut self) -> Result<&mut Paragraph> {
        self.ensure_live()?;
        let paragraph = Paragraph::empty(
            self.paragraphs.last().and_then(Paragraph::properties),
            self.placeholder,
        );
        self.paragraphs.push(paragraph);
        self.text.reset();
        let last = self.paragraphs.len() - 1;
        Ok(&mut self.paragraphs[last])
    }

    /// Remove and return the paragraph at `index`, marked as removed.
    pub fn remove_paragraph(&mut self, index: usize) -> Result<Option<Paragraph>> {
        self.ensure_live()?;
        if index >= self.paragraphs.len() {
            return Ok(None);
        }
        let mut paragraph = self.paragraphs.remove(index);
        paragraph.mark_removed();
        self.text.reset();
        self.level_fonts.reset();
        Ok(Some(paragraph))
    }

    pub fn autofit_type(&self) -> AutoFitType {
        self.autofit
    }

    /// Whether [`ShapeMut::set_text`](crate::ooxml::pptx::ShapeMut::set_text) may replace the text.
    pub fn can_change(&self) -> bool {
        self.can_change
    }

    /// Placeholder type that decides paragraph defaults. For a slide
    /// placeholder this is the type of its layout counterpart when there is one.
    pub fn placeholder_type(&self) -> Option<PlaceholderType> {
        self.placeholder
    }

    pub(crate) fn set_placeholder_type(&mut self, kind: Option<PlaceholderType>) {
        self.placeholder = kind;
        for paragraph in &mut self.paragraphs {
            paragraph.set_placeholder_type(kind);
        }
    }

    /// Font defaults of this frame: its list style, with the first
    /// paragraph's end properties as the fallback.
    pub fn level_fonts(&self) -> &LevelFonts {
        self.level_fonts.get(|| {
            let end = self.paragraphs.first().and_then(Paragraph::end_properties);
            self.body
                .child("lstStyle")
                .map(LevelFonts::from_list_style)
                .unwrap_or_default()
                .with_end_paragraph(end)
        })
    }

    pub fn is_removed(&self) -> bool {
        self.removed
    }

    /// Index of the paragraph whose formatting survives a text replacement:
    /// the first with a run or field, else the first paragraph.
    pub(crate) fn base_paragraph_index(&self) -> Option<usize> {
        if self.paragraphs.is_empty() {
            return None;
        }
        let with_text = self.paragraphs.iter().position(|p| {
            p.portions()
                .iter()
                .any(|portion| portion.kind() != PortionKind::LineBreak)
        });
        Some(with_text.unwrap_or(0))
    }

    pub(crate) fn check_editable(&self) -> Result<()> {
        self.ensure_live()?;
        if !self.can_change {
            return Err(CapabilityError::TextFrameNotEditable.into());
        }
        Ok(())
    }

    /// Collapse the frame to its base paragraph holding `text`, optionally
    /// at a new size in points.
    pub(crate) fn replace_text(&mut self, text: &str, font_size: Option<i32>) -> Result<()> {
        self.check_editable()?;
        if self.paragraphs.is_empty() {
            self.paragraphs.push(Paragraph::empty(None, self.placeholder));
        }
        let base = self.base_paragraph_index().unwrap_or(0);
        let mut kept = self.paragraphs.swap_remove(base);
        self.paragraphs.clear();

        kept.set_text(text)?;
        if let Some(size) = font_size {
            kept.set_font_size(size)?;
        }
        self.paragraphs.push(kept);
        self.text.reset();
        self.level_fonts.reset();
        Ok(())
    }

    pub(crate) fn mark_removed(&mut self) {
        self.removed = true;
        for paragraph in &mut self.paragraphs {
            paragraph.mark_removed();
        }
    }

    pub(crate) fn to_element(&self) -> Element {
        let mut body = self.body.clone();
        if self.paragraphs.is_empty() {
            body.attach(self.slot, [Element::new("a:p")]);
        } else {
            body.attach(self.slot, self.paragraphs.iter().map(Paragraph::to_element));
        }
        body
    }

    fn ensure_live(&self) -> Result<()> {
        if self.removed {
            return Err(StateError::ElementRemoved("text frame").into());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ooxml::error::OoxmlError;

    const BODY: &str = r#"<p:txBody xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main" xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main">
        <a:bodyPr><a:normAutofit fontScale="90000"/></a:bodyPr>
        <a:lstStyle><a:lvl1pPr><a:defRPr sz="2000"/></a:lvl1pPr></a:lstStyle>
        <a:p><a:endParaRPr sz="1000"/></a:p>
        <a:p><a:r><a:rPr sz="1600"/><a:t>Alpha</a:t></a:r></a:p>
        <a:p><a:pPr lvl="1"/><a:r><a:t>Beta</a:t></a:r></a:p>
    </p:txBody>"#;

    fn frame(can_change: bool) -> TextFrame {
        TextFrame::from_body(Element::parse(BODY.as_bytes()).unwrap(), can_change, None)
    }

    #[test]
    fn test_read() {
        let frame = frame(true);
        assert_eq!(frame.autofit_type(), AutoFitType::Shrink);
        assert_eq!(frame.text(), "\nAlpha\nBeta");
        assert_eq!(frame.paragraphs()[2].level(), 2);
        assert_eq!(frame.level_fonts().lookup(1).unwrap().size, Some(20));
        assert_eq!(frame.level_fonts().lookup(2).unwrap().size, Some(10));
    }

    #[test]
    fn test_autofit_kinds() {
        let body = |pr: &str| {
            let xml = BODY.replace(r#"<a:bodyPr><a:normAutofit fontScale="90000"/></a:bodyPr>"#, pr);
            TextFrame::from_body(Element::parse(xml.as_bytes()).unwrap(), true, None)
        };
        assert_eq!(body("<a:bodyPr><a:spAutoFit/></a:bodyPr>").autofit_type(), AutoFitType::Resize);
        assert_eq!(body("<a:bodyPr><a:noAutofit/></a:bodyPr>").autofit_type(), AutoFitType::None);
        assert_eq!(body("<a:bodyPr/>").autofit_type(), AutoFitType::None);
    }

    #[test]
    fn test_replace_text_uses_base_paragraph() {
        let mut frame = frame(true);
        assert_eq!(frame.base_paragraph_index(), Some(1));
        frame.replace_text("Gamma\nDelta", None).unwrap();
        assert_eq!(frame.paragraphs().len(), 1);
        assert_eq!(frame.text(), "Gamma\nDelta");
        assert_eq!(frame.paragraphs()[0].portions()[0].font().size, Some(16));

        let body = frame.to_element();
        assert_eq!(body.elements().filter(|e| e.is("p")).count(), 1);
        assert!(body.elements().next().unwrap().is("bodyPr"));
    }

    #[test]
    fn test_replace_text_with_size() {
        let mut frame = frame(true);
        frame.replace_text("x", Some(11)).unwrap();
        assert!(
            frame.paragraphs()[0]
                .portions()
                .iter()
                .all(|p| p.font().size == Some(11))
        );
    }

    #[test]
    fn test_not_editable() {
        let mut frame = frame(false);
        let err = frame.replace_text("x", None).unwrap_err();
        assert!(matches!(
            err,
            OoxmlError::Capability(CapabilityError::TextFrameNotEditable)
        ));
        assert_eq!(frame.text(), "\nAlpha\nBeta");
    }

    #[test]
    fn test_removed_before_capability() {
        let mut frame = frame(false);
        frame.mark_removed();
        assert!(frame.replace_text("x", None).unwrap_err().is_removed());
    }

    #[test]
    fn test_empty_frame() {
        let mut frame = TextFrame::from_body(TextFrame::empty_cell_body(), true, None);
        assert_eq!(frame.text(), "");
        assert_eq!(frame.base_paragraph_index(), Some(0));
        frame.replace_text("cell", None).unwrap();
        assert_eq!(frame.text(), "cell");

        let mut para = frame.remove_paragraph(0).unwrap().unwrap();
        assert!(para.set_text("gone").unwrap_err().is_removed());
        assert!(frame.to_element().child("p").is_some());
    }

    #[test]
    fn test_add_paragraph() {
        let mut frame = frame(true);
        frame.add_paragraph().unwrap().set_text("Last").unwrap();
        assert_eq!(frame.paragraphs().len(), 4);
        assert_eq!(frame.paragraphs()[3].level(), 2);
        assert!(frame.text().ends_with("\nLast"));
    }
}
