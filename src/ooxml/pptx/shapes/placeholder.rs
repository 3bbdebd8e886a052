/// Placeholder descriptors (`p:nvPr/p:ph`).
///
/// A placeholder links a slide shape to the layout shape with the same index
/// and, through its type, to the master shape and master text style it
/// inherits from.
use crate::common::xml::Element;

/// `ST_PlaceholderType` values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlaceholderType {
    Title,
    CenteredTitle,
    SubTitle,
    Body,
    /// Generic content placeholder; the default when `type` is absent
    Object,
    Chart,
    Table,
    ClipArt,
    Diagram,
    Media,
    Picture,
    SlideImage,
    DateTime,
    Footer,
    Header,
    SlideNumber,
}

/// Master text style record a placeholder type draws its defaults from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextStyleKind {
    /// `p:titleStyle`
    Title,
    /// `p:bodyStyle`
    Body,
    /// `p:otherStyle`
    Other,
}

impl PlaceholderType {
    pub fn from_xml(value: &str) -> Self {
        match value {
            "title" => Self::Title,
            "ctrTitle" => Self::CenteredTitle,
            "subTitle" => Self::SubTitle,
            "body" => Self::Body,
            "chart" => Self::Chart,
            "tbl" => Self::Table,
            "clipArt" => Self::ClipArt,
            "dgm" => Self::Diagram,
            "media" => Self::Media,
            "pic" => Self::Picture,
            "sldImg" => Self::SlideImage,
            "dt" => Self::DateTime,
            "ftr" => Self::Footer,
            "hdr" => Self::Header,
            "sldNum" => Self::SlideNumber,
            _ => Self::Object,
        }
    }

    pub fn as_xml(&self) -> &'static str {
        match self {
            Self::Title => "title",
            Self::CenteredTitle => "ctrTitle",
            Self::SubTitle => "subTitle",
            Self::Body => "body",
            Self::Object => "obj",
            Self::Chart => "chart",
            Self::Table => "tbl",
            Self::ClipArt => "clipArt",
            Self::Diagram => "dgm",
            Self::Media => "media",
            Self::Picture => "pic",
            Self::SlideImage => "sldImg",
            Self::DateTime => "dt",
            Self::Footer => "ftr",
            Self::Header => "hdr",
            Self::SlideNumber => "sldNum",
        }
    }

    /// Type of the master shape this placeholder inherits from.
    ///
    /// Masters carry one title and one body placeholder; the specialised
    /// title and content types fold onto those.
    pub fn master_type(&self) -> PlaceholderType {
        match self {
            Self::CenteredTitle => Self::Title,
            Self::SubTitle
            | Self::Object
            | Self::Chart
            | Self::Table
            | Self::ClipArt
            | Self::Diagram
            | Self::Media
            | Self::Picture => Self::Body,
            other => *other,
        }
    }

    pub fn text_style(&self) -> TextStyleKind {
        match self {
            Self::Title | Self::CenteredTitle => TextStyleKind::Title,
            Self::DateTime | Self::Footer | Self::Header | Self::SlideNumber | Self::SlideImage => {
                TextStyleKind::Other
            },
            _ => TextStyleKind::Body,
        }
    }

    #[inline]
    pub fn is_title(&self) -> bool {
        matches!(self, Self::Title | Self::CenteredTitle)
    }
}

impl std::fmt::Display for PlaceholderType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_xml())
    }
}

/// Index and type of a placeholder shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Placeholder {
    pub index: u32,
    pub kind: PlaceholderType,
}

impl Placeholder {
    /// Read `p:ph` from a shape's non-visual properties (`p:nvSpPr`, `p:nvPicPr`, ...).
    ///
    /// Absent attributes take the schema defaults: index 0, type `obj`.
    pub fn from_non_visual(nv_props: &Element) -> Option<Placeholder> {
        let ph = nv_props.find("nvPr/ph")?;
        let index: u32 = ph
            .attr("idx")
            .and_then(|v| atoi_simd::parse::<u32, false, false>(v.as_bytes()).ok())
            .unwrap_or(0);
        let kind = ph
            .attr("type")
            .map_or(PlaceholderType::Object, PlaceholderType::from_xml);
        Some(Placeholder { index, kind })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn nv(ph: Element) -> Element {
        Element::new("p:nvSpPr").with_child(Element::new("p:nvPr").with_child(ph))
    }

    #[test]
    fn test_defaults() {
        let ph = Placeholder::from_non_visual(&nv(Element::new("p:ph"))).unwrap();
        assert_eq!(ph.index, 0);
        assert_eq!(ph.kind, PlaceholderType::Object);
    }

    #[test]
    fn test_explicit_values() {
        let ph = Placeholder::from_non_visual(&nv(
            Element::new("p:ph").with_attr("type", "ctrTitle").with_attr("idx", "12"),
        ))
        .unwrap();
        assert_eq!(ph.index, 12);
        assert_eq!(ph.kind, PlaceholderType::CenteredTitle);
        assert_eq!(ph.kind.master_type(), PlaceholderType::Title);
        assert_eq!(ph.kind.text_style(), TextStyleKind::Title);
    }

    #[test]
    fn test_not_a_placeholder() {
        let plain = Element::new("p:nvSpPr").with_child(Element::new("p:nvPr"));
        assert!(Placeholder::from_non_visual(&plain).is_none());
    }

    #[test]
    fn test_master_mapping() {
        assert_eq!(PlaceholderType::SubTitle.master_type(), PlaceholderType::Body);
        assert_eq!(PlaceholderType::Footer.master_type(), PlaceholderType::Footer);
        assert_eq!(PlaceholderType::SlideNumber.text_style(), TextStyleKind::Other);
        assert_eq!(PlaceholderType::from_xml("sldNum").as_xml(), "sldNum");
    }
}
