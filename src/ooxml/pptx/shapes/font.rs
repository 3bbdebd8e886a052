/// Font properties and per-level font maps.
///
/// Run properties (`a:rPr`), list-style level defaults (`a:lvlNpPr/a:defRPr`)
/// and end-of-paragraph properties (`a:endParaRPr`) all carry the same
/// attributes. Every field is optional so that tiers can be merged field by
/// field.
use crate::common::unit::centipoints_to_pt;
use crate::common::xml::Element;
use std::collections::BTreeMap;

/// Font size used when no tier defines one.
pub const DEFAULT_FONT_SIZE: i32 = 18;

/// Typeface used when neither the chain nor the theme names one.
pub const DEFAULT_FONT_NAME: &str = "Calibri";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FontData {
    /// Size in whole points
    pub size: Option<i32>,
    /// Latin typeface, possibly a theme reference such as `+mn-lt`
    pub latin_name: Option<String>,
    pub bold: Option<bool>,
    pub italic: Option<bool>,
}

impl FontData {
    /// Read the font attributes of a run-properties element.
    pub fn from_properties(props: &Element) -> FontData {
        FontData {
            size: props.attr_i64("sz").map(centipoints_to_pt),
            latin_name: props
                .child("latin")
                .and_then(|latin| latin.attr("typeface"))
                .map(str::to_string),
            bold: props.attr_bool("b"),
            italic: props.attr_bool("i"),
        }
    }

    /// Take every field that is still unset from `other`.
    pub fn fill_from(&mut self, other: &FontData) {
        if self.size.is_none() {
            self.size = other.size;
        }
        if self.latin_name.is_none() {
            self.latin_name.clone_from(&other.latin_name);
        }
        if self.bold.is_none() {
            self.bold = other.bold;
        }
        if self.italic.is_none() {
            self.italic = other.italic;
        }
    }

    pub fn is_complete(&self) -> bool {
        self.size.is_some() && self.latin_name.is_some() && self.bold.is_some() && self.italic.is_some()
    }

    pub fn is_empty(&self) -> bool {
        *self == FontData::default()
    }
}

/// Font defaults of one tier, keyed by 1-based indentation level.
///
/// `end_paragraph` holds the tier's end-of-paragraph run properties, consulted
/// for levels the list style does not define.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LevelFonts {
    levels: BTreeMap<u8, FontData>,
    end_paragraph: Option<FontData>,
}

impl LevelFonts {
    /// Parse a list style (`a:lstStyle`, `p:titleStyle`, `p:bodyStyle`, `p:otherStyle`).
    pub fn from_list_style(list_style: &Element) -> LevelFonts {
        let levels = list_style
            .elements()
            .filter_map(|lvl| {
                let level = level_of(lvl.local_name())?;
                let font = FontData::from_properties(lvl.child("defRPr")?);
                (!font.is_empty()).then_some((level, font))
            })
            .collect();
        LevelFonts {
            levels,
            end_paragraph: None,
        }
    }

    pub fn with_end_paragraph(mut self, end_props: Option<&Element>) -> LevelFonts {
        self.end_paragraph = end_props
            .map(FontData::from_properties)
            .filter(|font| !font.is_empty());
        self
    }

    /// Font data explicitly defined for `level`.
    pub fn level(&self, level: u8) -> Option<&FontData> {
        self.levels.get(&level)
    }

    /// Font data for `level`, falling back to the end-of-paragraph properties.
    pub fn lookup(&self, level: u8) -> Option<&FontData> {
        self.levels.get(&level).or(self.end_paragraph.as_ref())
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty() && self.end_paragraph.is_none()
    }
}

/// `lvl3pPr` -> 3
fn level_of(local_name: &str) -> Option<u8> {
    local_name
        .strip_prefix("lvl")?
        .strip_suffix("pPr")?
        .parse()
        .ok()
        .filter(|level| (1..=9).contains(level))
}
