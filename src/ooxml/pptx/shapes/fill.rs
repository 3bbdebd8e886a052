/// Shape fill (`p:spPr` fill choice).
use crate::common::xml::{Element, Node};
use crate::ooxml::error::{OoxmlError, Result};

/// A DrawingML colour reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColorRef {
    /// `a:srgbClr`, six hex digits
    Rgb(String),
    /// `a:schemeClr`, e.g. `accent1`
    Scheme(String),
    /// `a:sysClr`; the last computed colour when present
    System(String),
}

impl ColorRef {
    fn from_parent(parent: &Element) -> Option<ColorRef> {
        parent.elements().find_map(|c| match c.local_name() {
            "srgbClr" => c.attr("val").map(|v| ColorRef::Rgb(v.to_string())),
            "schemeClr" => c.attr("val").map(|v| ColorRef::Scheme(v.to_string())),
            "sysClr" => c
                .attr("lastClr")
                .or_else(|| c.attr("val"))
                .map(|v| ColorRef::System(v.to_string())),
            _ => None,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GradientStop {
    /// Position in thousandths of a percent (0..=100000)
    pub position: u32,
    pub color: Option<ColorRef>,
}

/// Fill defined directly on a shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fill {
    NoFill,
    Solid(Option<ColorRef>),
    Gradient(Vec<GradientStop>),
    Picture { image_rel_id: Option<String> },
    Pattern { preset: Option<String> },
    /// Inherited from the containing group
    Group,
}

const FILL_ELEMENTS: [&str; 6] = ["noFill", "solidFill", "gradFill", "blipFill", "pattFill", "grpFill"];

impl Fill {
    /// Read the fill choice of a shape-properties element; `None` when unset.
    pub fn from_shape_properties(sp_pr: &Element) -> Option<Fill> {
        let fill = sp_pr
            .elements()
            .find(|e| FILL_ELEMENTS.contains(&e.local_name()))?;
        Some(match fill.local_name() {
            "noFill" => Fill::NoFill,
            "solidFill" => Fill::Solid(ColorRef::from_parent(fill)),
            "gradFill" => Fill::Gradient(
                fill.child("gsLst")
                    .map(|list| {
                        list.elements()
                            .filter(|gs| gs.is("gs"))
                            .map(|gs| GradientStop {
                                position: gs
                                    .attr_i64("pos")
                                    .and_then(|p| u32::try_from(p).ok())
                                    .unwrap_or(0),
                                color: ColorRef::from_parent(gs),
                            })
                            .collect()
                    })
                    .unwrap_or_default(),
            ),
            "blipFill" => Fill::Picture {
                image_rel_id: fill
                    .child("blip")
                    .and_then(|b| b.attr("r:embed"))
                    .map(str::to_string),
            },
            "pattFill" => Fill::Pattern {
                preset: fill.attr("prst").map(str::to_string),
            },
            _ => Fill::Group,
        })
    }
}

/// Replace the fill of `sp_pr` with a solid RGB fill.
///
/// `hex` is six hex digits, with or without a leading `#`.
pub(crate) fn set_solid_fill(sp_pr: &mut Element, hex: &str) -> Result<()> {
    let hex = hex.trim_start_matches('#');
    if hex.len() != 6 || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(OoxmlError::InvalidFormat(format!("invalid RGB colour: {hex}")));
    }
    for name in FILL_ELEMENTS {
        sp_pr.remove_children(name);
    }
    // fill follows xfrm and the geometry
    let index = sp_pr
        .children()
        .iter()
        .rposition(|node| match node {
            Node::Element(e) => {
                matches!(e.local_name(), "xfrm" | "prstGeom" | "custGeom")
            },
            _ => false,
        })
        .map_or(0, |i| i + 1);
    sp_pr.insert(
        index,
        Element::new("a:solidFill")
            .with_child(Element::new("a:srgbClr").with_attr("val", hex.to_ascii_uppercase())),
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sp_pr(xml: &str) -> Element {
        Element::parse(
            format!(
                r#"<p:spPr xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main" xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships">{xml}</p:spPr>"#
            )
            .as_bytes(),
        )
        .unwrap()
    }

    #[test]
    fn test_read_fills() {
        assert_eq!(Fill::from_shape_properties(&sp_pr("<a:prstGeom prst=\"rect\"/>")), None);
        assert_eq!(
            Fill::from_shape_properties(&sp_pr("<a:noFill/>")),
            Some(Fill::NoFill)
        );
        assert_eq!(
            Fill::from_shape_properties(&sp_pr(
                "<a:solidFill><a:schemeClr val=\"accent1\"/></a:solidFill>"
            )),
            Some(Fill::Solid(Some(ColorRef::Scheme("accent1".into()))))
        );
        let gradient = Fill::from_shape_properties(&sp_pr(
            "<a:gradFill><a:gsLst><a:gs pos=\"0\"><a:srgbClr val=\"FF0000\"/></a:gs><a:gs pos=\"100000\"><a:srgbClr val=\"0000FF\"/></a:gs></a:gsLst></a:gradFill>",
        ));
        let Some(Fill::Gradient(stops)) = gradient else {
            panic!("expected gradient");
        };
        assert_eq!(stops.len(), 2);
        assert_eq!(stops[1].position, 100_000);
        assert_eq!(
            Fill::from_shape_properties(&sp_pr("<a:blipFill><a:blip r:embed=\"rId4\"/></a:blipFill>")),
            Some(Fill::Picture {
                image_rel_id: Some("rId4".into())
            })
        );
    }

    #[test]
    fn test_set_solid_fill() {
        let mut props = sp_pr("<a:xfrm/><a:prstGeom prst=\"rect\"/><a:noFill/><a:ln/>");
        set_solid_fill(&mut props, "#00ff7f").unwrap();
        let names: Vec<_> = props.elements().map(|e| e.local_name().to_string()).collect();
        assert_eq!(names, ["xfrm", "prstGeom", "solidFill", "ln"]);
        assert_eq!(
            Fill::from_shape_properties(&props),
            Some(Fill::Solid(Some(ColorRef::Rgb("00FF7F".into()))))
        );
        assert!(set_solid_fill(&mut props, "red").is_err());
    }
}
