/// Paragraphs and portions of a text frame (`a:p`, `a:r`, `a:fld`, `a:br`).
use super::font::FontData;
use super::placeholder::PlaceholderType;
use crate::common::unit::pt_to_centipoints;
use crate::common::xml::Element;
use crate::ooxml::error::{OoxmlError, Result, StateError};
use crate::ooxml::pptx::cache::ResettableLazy;

/// Kind of a text portion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PortionKind {
    /// Regular run (`a:r`)
    Run,
    /// Field such as a slide number or date (`a:fld`)
    Field,
    /// Soft line break (`a:br`)
    LineBreak,
}

/// A run of text sharing one set of character properties.
#[derive(Debug, Clone)]
pub struct Portion {
    element: Element,
    kind: PortionKind,
    removed: bool,
}

impl Portion {
    pub(crate) fn from_element(element: Element) -> Option<Portion> {
        let kind = match element.local_name() {
            "r" => PortionKind::Run,
            "fld" => PortionKind::Field,
            "br" => PortionKind::LineBreak,
            _ => return None,
        };
        Some(Portion {
            element,
            kind,
            removed: false,
        })
    }

    fn run(properties: Option<&Element>, text: &str) -> Portion {
        let mut element = Element::new("a:r");
        if let Some(props) = properties {
            element.push(props.clone());
        }
        element.push(Element::new("a:t").with_text(text));
        Portion {
            element,
            kind: PortionKind::Run,
            removed: false,
        }
    }

    fn line_break(properties: Option<&Element>) -> Portion {
        let mut element = Element::new("a:br");
        if let Some(props) = properties {
            element.push(props.clone());
        }
        Portion {
            element,
            kind: PortionKind::LineBreak,
            removed: false,
        }
    }

    pub fn kind(&self) -> PortionKind {
        self.kind
    }

    /// Whether this portion carries text (a run or a field).
    pub fn is_text(&self) -> bool {
        self.kind != PortionKind::LineBreak
    }

    /// Text of the portion; a line break reads as `"\n"`.
    pub fn text(&self) -> String {
        match self.kind {
            PortionKind::LineBreak => "\n".to_string(),
            _ => self.element.child("t").map(Element::text).unwrap_or_default(),
        }
    }

    pub fn set_text(&mut self, text: &str) -> Result<()> {
        self.ensure_live()?;
        if self.kind == PortionKind::LineBreak {
            return Err(OoxmlError::InvalidFormat("a line break has no text".to_string()));
        }
        let len = self.element.children().len();
        self.element
            .get_or_insert_child("t", len, || Element::new("a:t"))
            .set_text(text);
        Ok(())
    }

    /// Explicit character properties of this portion only.
    pub fn font(&self) -> FontData {
        self.properties().map(FontData::from_properties).unwrap_or_default()
    }

    /// Set the size in points on the portion's run properties.
    pub fn set_font_size(&mut self, points: i32) -> Result<()> {
        self.ensure_live()?;
        let mut buf = itoa::Buffer::new();
        let sz = buf.format(pt_to_centipoints(points));
        self.element
            .get_or_insert_child("rPr", 0, || Element::new("a:rPr"))
            .set_attr("sz", sz);
        Ok(())
    }

    pub fn is_removed(&self) -> bool {
        self.removed
    }

    pub(crate) fn properties(&self) -> Option<&Element> {
        self.element.child("rPr")
    }

    pub(crate) fn element(&self) -> &Element {
        &self.element
    }

    pub(crate) fn mark_removed(&mut self) {
        self.removed = true;
    }

    fn ensure_live(&self) -> Result<()> {
        if self.removed {
            return Err(StateError::ElementRemoved("portion").into());
        }
        Ok(())
    }
}

/// Horizontal alignment of a paragraph (`a:pPr@algn`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextAlignment {
    Left,
    Center,
    Right,
    Justify,
}

impl TextAlignment {
    pub fn from_xml(value: &str) -> Option<Self> {
        match value {
            "l" => Some(Self::Left),
            "ctr" => Some(Self::Center),
            "r" => Some(Self::Right),
            "just" | "justLow" | "dist" | "thaiDist" => Some(Self::Justify),
            _ => None,
        }
    }

    pub fn as_xml(&self) -> &'static str {
        match self {
            Self::Left => "l",
            Self::Center => "ctr",
            Self::Right => "r",
            Self::Justify => "just",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BulletKind {
    /// No bullet, or none defined on the paragraph itself
    #[default]
    None,
    Character,
    Numbered,
    Picture,
}

/// Bullet formatting defined on a paragraph.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Bullet {
    pub kind: BulletKind,
    /// Bullet glyph for [`BulletKind::Character`]
    pub character: Option<String>,
    /// Auto-numbering scheme such as `arabicPeriod`
    pub numbering: Option<String>,
    pub font_name: Option<String>,
    /// Size relative to the text, in percent
    pub size_percent: Option<u32>,
    /// RGB hex colour
    pub color: Option<String>,
}

impl Bullet {
    fn from_paragraph_properties(props: Option<&Element>) -> Bullet {
        let Some(props) = props else {
            return Bullet::default();
        };
        let mut bullet = Bullet::default();
        for child in props.elements() {
            match child.local_name() {
                "buNone" => bullet.kind = BulletKind::None,
                "buChar" => {
                    bullet.kind = BulletKind::Character;
                    bullet.character = child.attr("char").map(str::to_string);
                },
                "buAutoNum" => {
                    bullet.kind = BulletKind::Numbered;
                    bullet.numbering = child.attr("type").map(str::to_string);
                },
                "buBlip" => bullet.kind = BulletKind::Picture,
                "buFont" => bullet.font_name = child.attr("typeface").map(str::to_string),
                // thousandths of a percent
                "buSzPct" => {
                    bullet.size_percent = child
                        .attr_i64("val")
                        .and_then(|v| u32::try_from(v / 1000).ok());
                },
                "buClr" => {
                    bullet.color = child
                        .child("srgbClr")
                        .and_then(|c| c.attr("val"))
                        .map(str::to_string);
                },
                _ => {},
            }
        }
        bullet
    }
}

/// A paragraph of a text frame.
///
/// The portions are held outside the paragraph element and put back at their
/// original position when the frame is written.
#[derive(Debug, Clone)]
pub struct Paragraph {
    element: Element,
    slot: usize,
    portions: Vec<Portion>,
    placeholder: Option<PlaceholderType>,
    text: ResettableLazy<String>,
    alignment: ResettableLazy<TextAlignment>,
    bullet: ResettableLazy<Bullet>,
    removed: bool,
}

impl Paragraph {
    pub(crate) fn from_element(mut element: Element, placeholder: Option<PlaceholderType>) -> Self {
        let (mut slot, taken) = element.detach(|e| matches!(e.local_name(), "r" | "fld" | "br"));
        if taken.is_empty() {
            slot = element.position("endParaRPr").unwrap_or(slot);
        }
        Self {
            element,
            slot,
            portions: taken.into_iter().filter_map(Portion::from_element).collect(),
            placeholder,
            text: ResettableLazy::new(),
            alignment: ResettableLazy::new(),
            bullet: ResettableLazy::new(),
            removed: false,
        }
    }

    /// An empty paragraph carrying a copy of `properties` (`a:pPr`).
    pub(crate) fn empty(properties: Option<&Element>, placeholder: Option<PlaceholderType>) -> Self {
        let mut element = Element::new("a:p");
        if let Some(props) = properties {
            element.push(props.clone());
        }
        Self::from_element(element, placeholder)
    }

    /// Concatenated text of all portions.
    pub fn text(&self) -> &str {
        self.text
            .get(|| self.portions.iter().map(Portion::text).collect())
    }

    pub fn portions(&self) -> &[Portion] {
        &self.portions
    }

    /// Mutable access to a portion. The paragraph's cached text is dropped.
    pub fn portion_mut(&mut self, index: usize) -> Option<&mut Portion> {
        self.text.reset();
        self.portions.get_mut(index)
    }

    /// 1-based indentation level.
    pub fn level(&self) -> u8 {
        self.properties()
            .and_then(|p| p.attr_i64("lvl"))
            .and_then(|lvl| u8::try_from(lvl.clamp(0, 8)).ok())
            .map_or(1, |lvl| lvl + 1)
    }

    pub fn alignment(&self) -> TextAlignment {
        *self.alignment.get(|| {
            self.properties()
                .and_then(|p| p.attr("algn"))
                .and_then(TextAlignment::from_xml)
                .unwrap_or(match self.placeholder {
                    Some(PlaceholderType::CenteredTitle) => TextAlignment::Center,
                    _ => TextAlignment::Left,
                })
        })
    }

    /// Placeholder type the default alignment is taken from.
    pub(crate) fn set_placeholder_type(&mut self, kind: Option<PlaceholderType>) {
        self.placeholder = kind;
        self.alignment.reset();
    }

    pub fn set_alignment(&mut self, alignment: TextAlignment) -> Result<()> {
        self.ensure_live()?;
        self.element
            .get_or_insert_child("pPr", 0, || Element::new("a:pPr"))
            .set_attr("algn", alignment.as_xml());
        self.alignment.reset();
        Ok(())
    }

    pub fn bullet(&self) -> &Bullet {
        self.bullet
            .get(|| Bullet::from_paragraph_properties(self.properties()))
    }

    /// Append `text` after the existing portions.
    ///
    /// New runs copy the properties of the last text run. Each `\n` (or `\r\n`)
    /// becomes a line break portion. If the paragraph ends in an empty run, the
    /// first line is written into it.
    pub fn add_portion(&mut self, text: &str) -> Result<()> {
        self.ensure_live()?;
        let text = text.replace("\r\n", "\n");
        if text.is_empty() {
            return Ok(());
        }
        let template = self
            .portions
            .iter()
            .rev()
            .find(|p| p.is_text())
            .and_then(Portion::properties)
            .cloned();

        for (i, line) in text.split('\n').enumerate() {
            if i > 0 {
                self.portions.push(Portion::line_break(template.as_ref()));
            } else if let Some(last) = self.portions.last_mut()
                && last.is_text()
                && last.text().is_empty()
            {
                last.set_text(line)?;
                continue;
            }
            if !line.is_empty() {
                self.portions.push(Portion::run(template.as_ref(), line));
            }
        }
        self.text.reset();
        Ok(())
    }

    /// Replace the paragraph text, keeping the formatting of its first run.
    pub fn set_text(&mut self, text: &str) -> Result<()> {
        self.ensure_live()?;
        let first = self
            .portions
            .iter()
            .position(Portion::is_text)
            .map(|i| self.portions.swap_remove(i));
        self.portions.clear();
        if let Some(mut first) = first {
            first.set_text("")?;
            self.portions.push(first);
        }
        self.text.reset();
        self.add_portion(text)
    }

    /// Remove and return the portion at `index`, marked as removed.
    pub fn remove_portion(&mut self, index: usize) -> Result<Option<Portion>> {
        self.ensure_live()?;
        if index >= self.portions.len() {
            return Ok(None);
        }
        let mut portion = self.portions.remove(index);
        portion.mark_removed();
        self.text.reset();
        Ok(Some(portion))
    }

    /// Set the size of every portion, in points.
    pub fn set_font_size(&mut self, points: i32) -> Result<()> {
        self.ensure_live()?;
        for portion in &mut self.portions {
            if portion.is_text() || portion.properties().is_some() {
                portion.set_font_size(points)?;
            }
        }
        Ok(())
    }

    pub fn is_removed(&self) -> bool {
        self.removed
    }

    pub(crate) fn properties(&self) -> Option<&Element> {
        self.element.child("pPr")
    }

    pub(crate) fn end_properties(&self) -> Option<&Element> {
        self.element.child("endParaRPr")
    }

    pub(crate) fn mark_removed(&mut self) {
        self.removed = true;
        for portion in &mut self.portions {
            portion.mark_removed();
        }
    }

    pub(crate) fn to_element(&self) -> Element {
        let mut element = self.element.clone();
        element.attach(self.slot, self.portions.iter().map(|p| p.element().clone()));
        element
    }

    fn ensure_live(&self) -> Result<()> {
        if self.removed {
            return Err(StateError::ElementRemoved("paragraph").into());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paragraph(xml: &str) -> Paragraph {
        Paragraph::from_element(Element::parse(xml.as_bytes()).unwrap(), None)
    }

    const NS: &str = r#"xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main""#;

    #[test]
    fn test_text_and_portions() {
        let p = paragraph(&format!(
            r#"<a:p {NS}><a:r><a:rPr sz="1200"/><a:t>Hello</a:t></a:r><a:br/><a:fld type="slidenum"><a:t>3</a:t></a:fld><a:endParaRPr/></a:p>"#
        ));
        assert_eq!(p.text(), "Hello\n3");
        assert_eq!(p.portions().len(), 3);
        assert_eq!(p.portions()[2].kind(), PortionKind::Field);
        assert_eq!(p.portions()[0].font().size, Some(12));
    }

    #[test]
    fn test_set_text_keeps_first_run_properties() {
        let mut p = paragraph(&format!(
            r#"<a:p {NS}><a:r><a:rPr b="1"/><a:t>one</a:t></a:r><a:r><a:t>two</a:t></a:r><a:endParaRPr/></a:p>"#
        ));
        p.set_text("first\r\nsecond").unwrap();
        assert_eq!(p.text(), "first\nsecond");
        let kinds: Vec<_> = p.portions().iter().map(Portion::kind).collect();
        assert_eq!(kinds, [PortionKind::Run, PortionKind::LineBreak, PortionKind::Run]);
        assert!(p.portions().iter().all(|portion| portion.font().bold == Some(true)));

        // runs are written back before endParaRPr
        let element = p.to_element();
        assert_eq!(element.elements().last().unwrap().local_name(), "endParaRPr");
    }

    #[test]
    fn test_add_portion_to_empty_paragraph() {
        let mut p = paragraph(&format!(r#"<a:p {NS}><a:endParaRPr lang="en-US"/></a:p>"#));
        p.add_portion("").unwrap();
        assert!(p.portions().is_empty());
        p.add_portion("abc").unwrap();
        assert_eq!(p.text(), "abc");
        assert_eq!(p.to_element().elements().next().unwrap().local_name(), "r");
    }

    #[test]
    fn test_alignment_cache_reset() {
        let mut p = paragraph(&format!(r#"<a:p {NS}><a:r><a:t>x</a:t></a:r></a:p>"#));
        assert_eq!(p.alignment(), TextAlignment::Left);
        p.set_alignment(TextAlignment::Right).unwrap();
        assert_eq!(p.alignment(), TextAlignment::Right);
        assert_eq!(p.properties().unwrap().attr("algn"), Some("r"));

        let title = Paragraph::from_element(
            Element::new("a:p"),
            Some(PlaceholderType::CenteredTitle),
        );
        assert_eq!(title.alignment(), TextAlignment::Center);
    }

    #[test]
    fn test_level_and_bullet() {
        let p = paragraph(&format!(
            r#"<a:p {NS}><a:pPr lvl="2"><a:buFont typeface="Arial"/><a:buSzPct val="75000"/><a:buChar char="•"/></a:pPr></a:p>"#
        ));
        assert_eq!(p.level(), 3);
        let bullet = p.bullet();
        assert_eq!(bullet.kind, BulletKind::Character);
        assert_eq!(bullet.character.as_deref(), Some("•"));
        assert_eq!(bullet.size_percent, Some(75));
        assert_eq!(bullet.font_name.as_deref(), Some("Arial"));
    }

    #[test]
    fn test_removed_portion_rejects_edits() {
        let mut p = paragraph(&format!(r#"<a:p {NS}><a:r><a:t>a</a:t></a:r><a:r><a:t>b</a:t></a:r></a:p>"#));
        let mut removed = p.remove_portion(0).unwrap().unwrap();
        assert_eq!(p.text(), "b");
        let err = removed.set_text("again").unwrap_err();
        assert!(err.is_removed());
        assert!(p.remove_portion(5).unwrap().is_none());
    }

    #[test]
    fn test_set_font_size() {
        let mut p = paragraph(&format!(r#"<a:p {NS}><a:r><a:t>a</a:t></a:r><a:br/></a:p>"#));
        p.set_font_size(14).unwrap();
        assert_eq!(p.portions()[0].font().size, Some(14));
        assert!(p.portions()[1].properties().is_none());
    }
}
