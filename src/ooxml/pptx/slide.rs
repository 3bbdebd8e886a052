/// Slides, slide layouts and slide masters.
///
/// Each tier holds its parsed part XML and builds its shape tree on first
/// access. The tree then persists for the lifetime of the presentation and is
/// written back into `p:cSld/p:spTree` when an edited slide is saved.
use crate::common::xml::Element;
use crate::ooxml::error::Result;
use crate::ooxml::opc::constants::relationship_type as RT;
use crate::ooxml::opc::packuri::PackURI;
use crate::ooxml::opc::part::Part;
use crate::ooxml::opc::OpcPackage;
use crate::ooxml::pptx::cache::ResettableLazy;
use crate::ooxml::pptx::parts::Theme;
use crate::ooxml::pptx::shapes::base::is_shape_element;
use crate::ooxml::pptx::shapes::{LevelFonts, Placeholder, ShapeTree, TextStyleKind, Tier};
use log::debug;

/// Part XML plus its lazily built shape tree.
#[derive(Debug)]
struct PartTree {
    partname: PackURI,
    root: Element,
    tier: Tier,
    inherited: Vec<Placeholder>,
    shapes: ResettableLazy<ShapeTree>,
}

impl PartTree {
    fn load(part: &dyn Part, tier: Tier) -> Result<Self> {
        Ok(Self {
            partname: part.partname().clone(),
            root: Element::parse(part.blob())?,
            tier,
            inherited: Vec::new(),
            shapes: ResettableLazy::new(),
        })
    }

    fn shapes(&self) -> &ShapeTree {
        self.shapes.get(|| build_tree(&self.root, self.tier, &self.inherited))
    }

    fn shapes_mut(&mut self) -> &mut ShapeTree {
        let (root, tier, inherited) = (&self.root, self.tier, &self.inherited);
        self.shapes.get_mut(|| build_tree(root, tier, inherited))
    }

    /// Placeholders of the top-level shapes, read from the part XML without
    /// building the shape tree.
    fn placeholders(&self) -> Vec<Placeholder> {
        let Some(sp_tree) = self.root.find("cSld/spTree") else {
            return Vec::new();
        };
        sp_tree
            .elements()
            .filter(|e| is_shape_element(e))
            .filter_map(|e| e.elements().find(|nv| nv.local_name().starts_with("nv")))
            .filter_map(Placeholder::from_non_visual)
            .collect()
    }

    /// `p:cSld@name`
    fn name(&self) -> Option<&str> {
        self.root.child("cSld")?.attr("name")
    }

    /// The part XML with the current shape tree in place.
    fn to_xml(&self) -> String {
        let mut root = self.root.clone();
        if let Some(tree) = self.shapes.peek()
            && let Some(sp_tree) = root.find_mut("cSld/spTree")
        {
            let (slot, _) = sp_tree.detach(is_shape_element);
            sp_tree.attach(slot, tree.to_elements());
        }
        root.to_xml()
    }
}

fn build_tree(root: &Element, tier: Tier, inherited: &[Placeholder]) -> ShapeTree {
    let Some(sp_tree) = root.find("cSld/spTree") else {
        return ShapeTree::default();
    };
    let shapes = sp_tree
        .elements()
        .filter(|e| is_shape_element(e))
        .cloned()
        .collect();
    let mut tree = ShapeTree::from_elements(shapes, tier);
    if !inherited.is_empty() {
        tree.inherit_placeholder_types(inherited);
    }
    tree
}

/// Text styles of a master (`p:txStyles`).
#[derive(Debug, Clone, Default)]
pub struct MasterTextStyles {
    pub title: LevelFonts,
    pub body: LevelFonts,
    pub other: LevelFonts,
}

impl MasterTextStyles {
    fn from_root(root: &Element) -> Self {
        let Some(styles) = root.child("txStyles") else {
            return Self::default();
        };
        let read = |name: &str| styles.child(name).map(LevelFonts::from_list_style).unwrap_or_default();
        Self {
            title: read("titleStyle"),
            body: read("bodyStyle"),
            other: read("otherStyle"),
        }
    }

    pub fn get(&self, kind: TextStyleKind) -> &LevelFonts {
        match kind {
            TextStyleKind::Title => &self.title,
            TextStyleKind::Body => &self.body,
            TextStyleKind::Other => &self.other,
        }
    }
}

/// A slide master (`p:sldMaster`).
#[derive(Debug)]
pub struct SlideMaster {
    tree: PartTree,
    text_styles: MasterTextStyles,
    theme: Theme,
}

impl SlideMaster {
    pub(crate) fn load(part: &dyn Part, package: &OpcPackage) -> Result<Self> {
        let tree = PartTree::load(part, Tier::Master)?;
        let text_styles = MasterTextStyles::from_root(&tree.root);
        let theme = match part.rels().first_with_reltype(RT::THEME) {
            Some(rel) => Theme::from_part(package.get_part(&rel.target_partname()?)?)?,
            None => {
                debug!("Master {} has no theme", part.partname());
                Theme::default()
            },
        };
        Ok(Self {
            tree,
            text_styles,
            theme,
        })
    }

    pub fn partname(&self) -> &PackURI {
        &self.tree.partname
    }

    pub fn name(&self) -> Option<&str> {
        self.tree.name()
    }

    pub fn shapes(&self) -> &ShapeTree {
        self.tree.shapes()
    }

    pub fn text_styles(&self) -> &MasterTextStyles {
        &self.text_styles
    }

    pub fn theme(&self) -> &Theme {
        &self.theme
    }

    /// Relationship ids of `p:sldLayoutIdLst`, in list order.
    pub(crate) fn layout_rids(&self) -> Vec<String> {
        self.tree
            .root
            .child("sldLayoutIdLst")
            .map(|list| {
                list.elements()
                    .filter_map(|id| id.attr("r:id"))
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default()
    }
}

/// A slide layout (`p:sldLayout`).
#[derive(Debug)]
pub struct SlideLayout {
    tree: PartTree,
    master: usize,
}

impl SlideLayout {
    pub(crate) fn load(part: &dyn Part, master: usize) -> Result<Self> {
        Ok(Self {
            tree: PartTree::load(part, Tier::Layout)?,
            master,
        })
    }

    pub fn partname(&self) -> &PackURI {
        &self.tree.partname
    }

    pub fn name(&self) -> Option<&str> {
        self.tree.name()
    }

    pub fn shapes(&self) -> &ShapeTree {
        self.tree.shapes()
    }

    /// Index and type of each top-level placeholder on the layout.
    pub fn placeholders(&self) -> Vec<Placeholder> {
        self.tree.placeholders()
    }

    /// Index of the layout's master in [`Presentation::masters`](super::Presentation::masters).
    pub fn master_index(&self) -> usize {
        self.master
    }
}

/// A slide (`p:sld`).
///
/// Reading goes through [`SlideRef`](super::SlideRef), editing through
/// [`SlideMut`](super::SlideMut); both add the layout and master the slide
/// inherits from.
#[derive(Debug)]
pub struct Slide {
    tree: PartTree,
    layout: usize,
    dirty: bool,
}

impl Slide {
    pub(crate) fn load(part: &dyn Part, layout: usize) -> Result<Self> {
        Ok(Self {
            tree: PartTree::load(part, Tier::Slide)?,
            layout,
            dirty: false,
        })
    }

    /// Slide placeholders take paragraph defaults from the layout
    /// placeholders with the same index.
    pub(crate) fn with_layout_placeholders(mut self, placeholders: Vec<Placeholder>) -> Self {
        self.tree.inherited = placeholders;
        self.tree.shapes.reset();
        self
    }

    pub fn partname(&self) -> &PackURI {
        &self.tree.partname
    }

    pub fn name(&self) -> Option<&str> {
        self.tree.name()
    }

    pub fn shapes(&self) -> &ShapeTree {
        self.tree.shapes()
    }

    /// Index of the slide's layout in [`Presentation::layouts`](super::Presentation::layouts).
    pub fn layout_index(&self) -> usize {
        self.layout
    }

    /// Whether the slide is hidden in slide show (`p:sld@show="0"`).
    pub fn hidden(&self) -> bool {
        self.tree.root.attr_bool("show") == Some(false)
    }

    pub(crate) fn set_hidden(&mut self, hidden: bool) {
        if hidden {
            self.tree.root.set_attr("show", "0");
        } else {
            self.tree.root.remove_attr("show");
        }
        self.dirty = true;
    }

    pub(crate) fn shapes_mut(&mut self) -> &mut ShapeTree {
        self.dirty = true;
        self.tree.shapes_mut()
    }

    /// Relationship id of the background picture (`p:bg/p:bgPr/a:blipFill/a:blip`).
    pub fn background_rel_id(&self) -> Option<&str> {
        self.tree
            .root
            .find("cSld/bg/bgPr/blipFill/blip")?
            .attr("r:embed")
    }

    /// Point the background at image relationship `r_id`, replacing any
    /// other kind of background.
    pub(crate) fn set_background_rel_id(&mut self, r_id: &str) {
        self.dirty = true;
        if let Some(blip) = self.tree.root.find_mut("cSld/bg/bgPr/blipFill/blip") {
            blip.set_attr("r:embed", r_id);
            return;
        }
        let Some(c_sld) = self.tree.root.child_mut("cSld") else {
            return;
        };
        c_sld.remove_children("bg");
        c_sld.insert(
            0,
            Element::new("p:bg").with_child(
                Element::new("p:bgPr")
                    .with_child(
                        Element::new("a:blipFill")
                            .with_attr("dpi", "0")
                            .with_attr("rotWithShape", "1")
                            .with_child(Element::new("a:blip").with_attr("r:embed", r_id))
                            .with_child(
                                Element::new("a:stretch").with_child(Element::new("a:fillRect")),
                            ),
                    )
                    .with_child(Element::new("a:effectLst")),
            ),
        );
    }

    /// Whether the slide was edited since it was loaded or last saved.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub(crate) fn mark_clean(&mut self) {
        self.dirty = false;
    }

    pub(crate) fn to_xml(&self) -> String {
        self.tree.to_xml()
    }
}
