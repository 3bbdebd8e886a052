/// Picture shape (`p:pic`) image reference.
///
/// A picture names its image through `p:blipFill/a:blip@r:embed`, a
/// relationship of the part the picture lives in.
use crate::common::xml::Element;

const BLIP: &str = "blipFill/blip";

/// Relationship id of the embedded image.
pub(crate) fn image_rel_id(pic: &Element) -> Option<&str> {
    pic.find(BLIP)?.attr("r:embed")
}

/// Point the picture at another image relationship.
///
/// Returns `false` if the picture has no `a:blip` to update.
pub(crate) fn set_image_rel_id(pic: &mut Element, r_id: &str) -> bool {
    match pic.find_mut(BLIP) {
        Some(blip) => {
            blip.set_attr("r:embed", r_id);
            true
        },
        None => false,
    }
}

/// Alternative text (`cNvPr@descr`).
pub(crate) fn description(pic: &Element) -> Option<&str> {
    pic.find("nvPicPr/cNvPr")?.attr("descr")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_image_rel_id() {
        let mut pic = Element::new("p:pic")
            .with_child(
                Element::new("p:nvPicPr").with_child(
                    Element::new("p:cNvPr")
                        .with_attr("id", "4")
                        .with_attr("descr", "Logo"),
                ),
            )
            .with_child(
                Element::new("p:blipFill")
                    .with_child(Element::new("a:blip").with_attr("r:embed", "rId2")),
            );
        assert_eq!(image_rel_id(&pic), Some("rId2"));
        assert_eq!(description(&pic), Some("Logo"));
        assert!(set_image_rel_id(&mut pic, "rId9"));
        assert_eq!(image_rel_id(&pic), Some("rId9"));

        let mut bare = Element::new("p:pic");
        assert!(!set_image_rel_id(&mut bare, "rId1"));
    }
}
