/// Base shape types for PowerPoint presentations.
use super::fill::{self, Fill};
use super::picture;
use super::placeholder::{Placeholder, PlaceholderType};
use super::table::Table;
use super::textframe::TextFrame;
use super::tree::ShapeTree;
use crate::common::xml::Element;
use crate::ooxml::error::{CapabilityError, Result, StateError};
use crate::ooxml::opc::constants::namespace;
use crate::ooxml::pptx::cache::ResettableLazy;

/// Shape kind enumeration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShapeKind {
    /// A shape with geometry and optional text (p:sp)
    AutoShape,
    /// A picture (p:pic)
    Picture,
    /// A graphic frame holding a table
    Table,
    /// A graphic frame holding a chart
    Chart,
    /// A graphic frame with other content (diagram, OLE object)
    GraphicFrame,
    /// A group shape (p:grpSp)
    Group,
    /// A connector (p:cxnSp)
    Connector,
}

/// Part type a shape was read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tier {
    Slide,
    Layout,
    Master,
}

/// Position and size in EMU. Each field may be inherited separately.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Geometry {
    pub x: Option<i64>,
    pub y: Option<i64>,
    pub width: Option<i64>,
    pub height: Option<i64>,
}

impl Geometry {
    /// Read an `a:xfrm` / `p:xfrm` element.
    pub(crate) fn from_xfrm(xfrm: Option<&Element>) -> Self {
        let Some(xfrm) = xfrm else {
            return Self::default();
        };
        let off = xfrm.child("off");
        let ext = xfrm.child("ext");
        Self {
            x: off.and_then(|o| o.attr_i64("x")),
            y: off.and_then(|o| o.attr_i64("y")),
            width: ext.and_then(|e| e.attr_i64("cx")),
            height: ext.and_then(|e| e.attr_i64("cy")),
        }
    }

    /// Take every unset field from `other`.
    pub fn fill_from(&mut self, other: &Geometry) {
        self.x = self.x.or(other.x);
        self.y = self.y.or(other.y);
        self.width = self.width.or(other.width);
        self.height = self.height.or(other.height);
    }

    pub fn is_complete(&self) -> bool {
        self.x.is_some() && self.y.is_some() && self.width.is_some() && self.height.is_some()
    }
}

/// Whether an element is one of the shape kinds a shape tree holds.
pub(crate) fn is_shape_element(element: &Element) -> bool {
    matches!(
        element.local_name(),
        "sp" | "pic" | "graphicFrame" | "grpSp" | "cxnSp"
    )
}

/// A shape of a slide, layout or master.
///
/// Text bodies, tables and group children are held outside the shape element
/// and put back when the shape is written.
///
/// # Examples
///
/// ```rust,ignore
/// for shape in slide.shapes().iter() {
///     println!("{} ({:?}) #{}", shape.name(), shape.kind(), shape.id());
///     if let Some(frame) = shape.text_frame() {
///         println!("  {}", frame.text());
///     }
/// }
/// ```
#[derive(Debug, Clone)]
pub struct Shape {
    element: Element,
    kind: ShapeKind,
    tier: Tier,
    id: u32,
    name: String,
    placeholder: Option<Placeholder>,
    geometry: Geometry,
    text_frame: Option<TextFrame>,
    text_slot: usize,
    table: Option<Table>,
    table_slot: usize,
    group: Option<ShapeTree>,
    group_slot: usize,
    fill: ResettableLazy<Option<Fill>>,
    removed: bool,
}

impl Shape {
    /// Build a shape from its element; `None` for elements that are not shapes.
    pub(crate) fn from_element(mut element: Element, tier: Tier) -> Option<Self> {
        let kind = match element.local_name() {
            "sp" => ShapeKind::AutoShape,
            "pic" => ShapeKind::Picture,
            "grpSp" => ShapeKind::Group,
            "cxnSp" => ShapeKind::Connector,
            "graphicFrame" => match element.find("graphic/graphicData").and_then(|d| d.attr("uri")) {
                Some(namespace::DML_TABLE) => ShapeKind::Table,
                Some(namespace::DML_CHART) => ShapeKind::Chart,
                _ => ShapeKind::GraphicFrame,
            },
            _ => return None,
        };

        let non_visual = element.elements().find(|e| e.local_name().starts_with("nv"));
        let c_nv_pr = non_visual.and_then(|nv| nv.child("cNvPr"));
        let id = c_nv_pr
            .and_then(|c| c.attr_i64("id"))
            .and_then(|id| u32::try_from(id).ok())
            .unwrap_or(0);
        let name = c_nv_pr
            .and_then(|c| c.attr("name"))
            .unwrap_or_default()
            .to_string();
        let placeholder = non_visual.and_then(Placeholder::from_non_visual);
        let xfrm = match kind {
            ShapeKind::Table | ShapeKind::Chart | ShapeKind::GraphicFrame => element.child("xfrm"),
            ShapeKind::Group => element.find("grpSpPr/xfrm"),
            _ => element.find("spPr/xfrm"),
        };
        let geometry = Geometry::from_xfrm(xfrm);

        let mut shape = Self {
            element: Element::default(),
            kind,
            tier,
            id,
            name,
            placeholder,
            geometry,
            text_frame: None,
            text_slot: 0,
            table: None,
            table_slot: 0,
            group: None,
            group_slot: 0,
            fill: ResettableLazy::new(),
            removed: false,
        };

        match kind {
            ShapeKind::AutoShape => {
                let (slot, mut bodies) = element.detach(|e| e.is("txBody"));
                if !bodies.is_empty() {
                    let can_change = tier == Tier::Slide
                        && placeholder.is_none_or(|ph| ph.kind == PlaceholderType::Title);
                    shape.text_slot = slot;
                    shape.text_frame = Some(TextFrame::from_body(
                        bodies.swap_remove(0),
                        can_change,
                        placeholder.map(|ph| ph.kind),
                    ));
                }
            },
            ShapeKind::Table => {
                if let Some(data) = element.find_mut("graphic/graphicData") {
                    let (slot, mut tables) = data.detach(|e| e.is("tbl"));
                    if !tables.is_empty() {
                        shape.table_slot = slot;
                        shape.table = Some(Table::from_element(tables.swap_remove(0)));
                    }
                }
            },
            ShapeKind::Group => {
                let (slot, children) = element.detach(is_shape_element);
                shape.group_slot = slot;
                shape.group = Some(ShapeTree::from_elements(children, tier));
            },
            _ => {},
        }
        shape.element = element;
        Some(shape)
    }

    #[inline]
    pub fn kind(&self) -> ShapeKind {
        self.kind
    }

    #[inline]
    pub fn tier(&self) -> Tier {
        self.tier
    }

    /// Shape id (`cNvPr@id`), unique within a part.
    #[inline]
    pub fn id(&self) -> u32 {
        self.id
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn placeholder(&self) -> Option<&Placeholder> {
        self.placeholder.as_ref()
    }

    /// Geometry defined on the shape itself. Placeholders may inherit
    /// missing fields; see `SlideRef::geometry`.
    #[inline]
    pub fn own_geometry(&self) -> &Geometry {
        &self.geometry
    }

    pub fn text_frame(&self) -> Option<&TextFrame> {
        self.text_frame.as_ref()
    }

    /// Mutable text frame for paragraph-level edits.
    pub fn text_frame_mut(&mut self) -> Option<&mut TextFrame> {
        self.text_frame.as_mut()
    }

    /// Take paragraph defaults from an inherited placeholder type.
    pub(crate) fn inherit_placeholder_type(&mut self, kind: PlaceholderType) {
        if let Some(frame) = self.text_frame.as_mut() {
            frame.set_placeholder_type(Some(kind));
        }
    }

    pub fn table(&self) -> Option<&Table> {
        self.table.as_ref()
    }

    pub fn table_mut(&mut self) -> Option<&mut Table> {
        self.table.as_mut()
    }

    /// Children of a group shape.
    pub fn group_shapes(&self) -> Option<&ShapeTree> {
        self.group.as_ref()
    }

    pub fn group_shapes_mut(&mut self) -> Option<&mut ShapeTree> {
        self.group.as_mut()
    }

    /// Fill set directly on the shape, computed on first access.
    pub fn fill(&self) -> Option<&Fill> {
        self.fill
            .get(|| self.element.child("spPr").and_then(Fill::from_shape_properties))
            .as_ref()
    }

    /// Replace the fill with a solid RGB colour such as `"FF0000"`.
    pub fn set_solid_fill(&mut self, hex: &str) -> Result<()> {
        self.ensure_live()?;
        let Some(sp_pr) = self.element.child_mut("spPr") else {
            return Err(CapabilityError::NotFillable.into());
        };
        fill::set_solid_fill(sp_pr, hex)?;
        self.fill.reset();
        Ok(())
    }

    pub fn set_name(&mut self, name: &str) -> Result<()> {
        self.ensure_live()?;
        if let Some(c_nv_pr) = self
            .element
            .elements_mut()
            .find(|e| e.local_name().starts_with("nv"))
            .and_then(|nv| nv.child_mut("cNvPr"))
        {
            c_nv_pr.set_attr("name", name);
        }
        self.name = name.to_string();
        Ok(())
    }

    /// Relationship id of a picture's image.
    pub fn image_rel_id(&self) -> Option<&str> {
        match self.kind {
            ShapeKind::Picture => picture::image_rel_id(&self.element),
            _ => None,
        }
    }

    /// Alternative text of a picture.
    pub fn description(&self) -> Option<&str> {
        match self.kind {
            ShapeKind::Picture => picture::description(&self.element),
            _ => None,
        }
    }

    /// Relationship id of a chart's part (`c:chart@r:id`).
    pub fn chart_rel_id(&self) -> Option<&str> {
        match self.kind {
            ShapeKind::Chart => self
                .element
                .find("graphic/graphicData/chart")
                .and_then(|c| c.attr("r:id")),
            _ => None,
        }
    }

    pub(crate) fn set_image_rel_id(&mut self, r_id: &str) -> Result<()> {
        self.ensure_live()?;
        if self.kind != ShapeKind::Picture || !picture::set_image_rel_id(&mut self.element, r_id) {
            return Err(CapabilityError::NotAPicture.into());
        }
        Ok(())
    }

    pub fn is_removed(&self) -> bool {
        self.removed
    }

    pub(crate) fn ensure_live(&self) -> Result<()> {
        if self.removed {
            return Err(StateError::ElementRemoved("shape").into());
        }
        Ok(())
    }

    pub(crate) fn mark_removed(&mut self) {
        self.removed = true;
        if let Some(frame) = &mut self.text_frame {
            frame.mark_removed();
        }
        if let Some(table) = &mut self.table {
            table.mark_removed();
        }
        if let Some(group) = &mut self.group {
            group.mark_removed();
        }
    }

    /// The shape element with its text, table and children put back.
    pub(crate) fn to_element(&self) -> Element {
        let mut element = self.element.clone();
        if let Some(frame) = &self.text_frame {
            element.attach(self.text_slot, [frame.to_element()]);
        }
        if let Some(table) = &self.table
            && let Some(data) = element.find_mut("graphic/graphicData")
        {
            data.attach(self.table_slot, [table.to_element()]);
        }
        if let Some(group) = &self.group {
            element.attach(self.group_slot, group.to_elements());
        }
        element
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ooxml::error::OoxmlError;

    const NS: &str = r#"xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main" xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships""#;

    fn shape(xml: &str, tier: Tier) -> Shape {
        let xml = xml.replacen("NS", NS, 1);
        Shape::from_element(Element::parse(xml.as_bytes()).unwrap(), tier).unwrap()
    }

    const TITLE: &str = r#"<p:sp NS><p:nvSpPr><p:cNvPr id="2" name="Title 1"/><p:cNvSpPr/><p:nvPr><p:ph type="title"/></p:nvPr></p:nvSpPr><p:spPr/><p:txBody><a:bodyPr/><a:p><a:r><a:t>Hi</a:t></a:r></a:p></p:txBody></p:sp>"#;

    const BODY: &str = r#"<p:sp NS><p:nvSpPr><p:cNvPr id="3" name="Content"/><p:cNvSpPr/><p:nvPr><p:ph idx="1"/></p:nvPr></p:nvSpPr><p:spPr><a:xfrm><a:off x="10" y="20"/></a:xfrm><a:prstGeom prst="rect"/></p:spPr><p:txBody><a:bodyPr/><a:p/></p:txBody></p:sp>"#;

    #[test]
    fn test_autoshape() {
        let title = shape(TITLE, Tier::Slide);
        assert_eq!(title.kind(), ShapeKind::AutoShape);
        assert_eq!(title.id(), 2);
        assert_eq!(title.name(), "Title 1");
        assert_eq!(title.placeholder().unwrap().kind, PlaceholderType::Title);
        assert!(title.text_frame().unwrap().can_change());
        assert_eq!(title.own_geometry(), &Geometry::default());
        assert!(title.fill().is_none());

        let body = shape(BODY, Tier::Slide);
        assert!(!body.text_frame().unwrap().can_change());
        assert_eq!(body.own_geometry().x, Some(10));
        assert_eq!(body.own_geometry().width, None);

        let layout_title = shape(TITLE, Tier::Layout);
        assert!(!layout_title.text_frame().unwrap().can_change());
    }

    #[test]
    fn test_centered_title_not_editable() {
        let ctr = shape(&TITLE.replace(r#"type="title""#, r#"type="ctrTitle""#), Tier::Slide);
        assert_eq!(ctr.placeholder().unwrap().kind, PlaceholderType::CenteredTitle);
        assert!(!ctr.text_frame().unwrap().can_change());
    }

    #[test]
    fn test_round_trip_element() {
        let title = shape(TITLE, Tier::Slide);
        let element = title.to_element();
        let names: Vec<_> = element.elements().map(Element::local_name).collect();
        assert_eq!(names, ["nvSpPr", "spPr", "txBody"]);
        assert_eq!(element.text(), "Hi");
    }

    #[test]
    fn test_set_solid_fill_resets_cache() {
        let mut body = shape(BODY, Tier::Slide);
        assert!(body.fill().is_none());
        body.set_solid_fill("336699").unwrap();
        assert!(matches!(body.fill(), Some(Fill::Solid(_))));
    }

    #[test]
    fn test_graphic_frames() {
        let table = shape(
            r#"<p:graphicFrame NS><p:nvGraphicFramePr><p:cNvPr id="5" name="Table 4"/><p:cNvGraphicFramePr/><p:nvPr/></p:nvGraphicFramePr><p:xfrm><a:off x="1" y="2"/><a:ext cx="3" cy="4"/></p:xfrm><a:graphic><a:graphicData uri="http://schemas.openxmlformats.org/drawingml/2006/table"><a:tbl><a:tblGrid><a:gridCol w="3"/></a:tblGrid><a:tr h="4"><a:tc><a:txBody><a:bodyPr/><a:p><a:r><a:t>c</a:t></a:r></a:p></a:txBody></a:tc></a:tr></a:tbl></a:graphicData></a:graphic></p:graphicFrame>"#,
            Tier::Slide,
        );
        assert_eq!(table.kind(), ShapeKind::Table);
        assert!(table.own_geometry().is_complete());
        assert_eq!(table.table().unwrap().cell(0, 0).unwrap().text(), "c");
        assert_eq!(table.to_element().find("graphic/graphicData/tbl").unwrap().text(), "c");

        let chart = shape(
            r#"<p:graphicFrame NS><p:nvGraphicFramePr><p:cNvPr id="6" name="Chart 5"/><p:cNvGraphicFramePr/><p:nvPr/></p:nvGraphicFramePr><p:xfrm/><a:graphic><a:graphicData uri="http://schemas.openxmlformats.org/drawingml/2006/chart"><c:chart xmlns:c="http://schemas.openxmlformats.org/drawingml/2006/chart" r:id="rId3"/></a:graphicData></a:graphic></p:graphicFrame>"#,
            Tier::Slide,
        );
        assert_eq!(chart.kind(), ShapeKind::Chart);
        assert_eq!(chart.chart_rel_id(), Some("rId3"));
    }

    #[test]
    fn test_not_a_shape() {
        let element = Element::new("p:nvGrpSpPr");
        assert!(Shape::from_element(element, Tier::Slide).is_none());
    }

    #[test]
    fn test_removed_shape() {
        let mut title = shape(TITLE, Tier::Slide);
        title.mark_removed();
        assert!(title.set_solid_fill("000000").unwrap_err().is_removed());
        assert!(title.text_frame().unwrap().is_removed());
        let err = title.set_image_rel_id("rId1").unwrap_err();
        assert!(matches!(err, OoxmlError::State(StateError::ElementRemoved("shape"))));
    }

    #[test]
    fn test_not_a_picture() {
        let mut body = shape(BODY, Tier::Slide);
        assert!(matches!(
            body.set_image_rel_id("rId1").unwrap_err(),
            OoxmlError::Capability(CapabilityError::NotAPicture)
        ));
    }
}
