//! Shrink-on-overflow font sizing.
//!
//! When a frame with `a:normAutofit` receives new text, the font size is
//! lowered one point at a time until the wrapped text fits the shape's box.
//! Text is measured through a [`TextMeasurer`]: [`ApproximateMetrics`] works
//! from per-character width classes, and with the `fonts` feature
//! `TrueTypeMetrics` reads advances from registered font files.

use crate::common::unit::emu_to_pt_f64;
use log::trace;

/// Inset between the shape edge and its text, in points, on every side.
pub const FRAME_MARGIN_PT: f64 = 7.2;

/// Font sizes never shrink below this many points.
pub const MIN_FONT_SIZE: i32 = 1;

/// Measures rendered text.
pub trait TextMeasurer {
    /// Advance width of `text` in points.
    fn text_width(&self, text: &str, font: &str, size: f64) -> f64;

    /// Distance between consecutive baselines, in points.
    fn line_height(&self, font: &str, size: f64) -> f64;
}

/// Width estimates by character class, as a fraction of the font size.
#[derive(Debug, Clone, Copy, Default)]
pub struct ApproximateMetrics;

impl ApproximateMetrics {
    fn char_width(c: char) -> f64 {
        match c {
            'i' | 'j' | 'l' | 'I' | '!' | '.' | ',' | ':' | ';' | '\'' | '|' | ' ' => 0.28,
            'M' | 'W' | 'm' | 'w' => 0.9,
            '0'..='9' => 0.55,
            c if c.is_ascii_lowercase() => 0.5,
            c if c.is_ascii_uppercase() => 0.72,
            c if is_wide(c) => 1.0,
            _ => 0.55,
        }
    }
}

/// East Asian wide characters: CJK ideographs, kana, hangul and fullwidth forms.
fn is_wide(c: char) -> bool {
    matches!(c as u32,
        0x1100..=0x115F
        | 0x2E80..=0x303E
        | 0x3041..=0x33FF
        | 0x3400..=0x4DBF
        | 0x4E00..=0x9FFF
        | 0xAC00..=0xD7A3
        | 0xF900..=0xFAFF
        | 0xFF00..=0xFF60
        | 0xFFE0..=0xFFE6)
}

impl TextMeasurer for ApproximateMetrics {
    fn text_width(&self, text: &str, _font: &str, size: f64) -> f64 {
        text.chars().map(Self::char_width).sum::<f64>() * size
    }

    fn line_height(&self, _font: &str, size: f64) -> f64 {
        size * 1.2
    }
}

/// Area available to text, in points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FitBox {
    pub width: f64,
    pub height: f64,
}

impl FitBox {
    /// Text area of a shape of `cx` x `cy` EMU, after the frame margins.
    pub fn from_emu(cx: i64, cy: i64) -> Self {
        Self {
            width: emu_to_pt_f64(cx) - 2.0 * FRAME_MARGIN_PT,
            height: emu_to_pt_f64(cy) - 2.0 * FRAME_MARGIN_PT,
        }
    }
}

/// Number of lines `text` occupies when wrapped greedily at `max_width`.
///
/// Each `\n` starts a new line. A word wider than the line is broken across
/// as many lines as its width needs.
pub fn wrapped_line_count(
    text: &str,
    font: &str,
    size: f64,
    max_width: f64,
    measurer: &dyn TextMeasurer,
) -> usize {
    if max_width <= 0.0 {
        return usize::MAX;
    }
    let space = measurer.text_width(" ", font, size);
    let mut lines = 0;

    for hard_line in text.split('\n') {
        lines += 1;
        let mut current = 0.0;
        for word in hard_line.split(' ').filter(|w| !w.is_empty()) {
            let width = measurer.text_width(word, font, size);
            if current > 0.0 && current + space + width <= max_width {
                current += space + width;
                continue;
            }
            if current > 0.0 {
                lines += 1;
            }
            if width > max_width {
                let extra = (width / max_width).ceil() as usize - 1;
                lines += extra;
                current = width - extra as f64 * max_width;
            } else {
                current = width;
            }
        }
    }
    lines
}

/// Whether `text` at `size` fits inside `bounds`.
pub fn fits(text: &str, font: &str, size: f64, bounds: FitBox, measurer: &dyn TextMeasurer) -> bool {
    let lines = wrapped_line_count(text, font, size, bounds.width, measurer);
    if lines == usize::MAX {
        return false;
    }
    lines as f64 * measurer.line_height(font, size) <= bounds.height
}

/// Largest size not above `start` at which `text` fits, down to [`MIN_FONT_SIZE`].
pub fn shrink_font_size(
    text: &str,
    font: &str,
    start: i32,
    bounds: FitBox,
    measurer: &dyn TextMeasurer,
) -> i32 {
    let mut size = start;
    while size > MIN_FONT_SIZE && !fits(text, font, f64::from(size), bounds, measurer) {
        size -= 1;
    }
    trace!("Autofit {font} {start}pt -> {size}pt in {:.1}x{:.1}pt", bounds.width, bounds.height);
    size
}

/// Most frequent size; ties go to the size seen first.
pub fn dominant_font_size(sizes: &[i32]) -> Option<i32> {
    let mut counts: Vec<(i32, usize)> = Vec::new();
    for &size in sizes {
        match counts.iter_mut().find(|(s, _)| *s == size) {
            Some((_, n)) => *n += 1,
            None => counts.push((size, 1)),
        }
    }
    counts
        .iter()
        .fold(None, |best: Option<(i32, usize)>, &(size, n)| match best {
            Some((_, best_n)) if best_n >= n => best,
            _ => Some((size, n)),
        })
        .map(|(size, _)| size)
}

#[cfg(feature = "fonts")]
pub use self::truetype::TrueTypeMetrics;

#[cfg(feature = "fonts")]
mod truetype {
    use super::{ApproximateMetrics, TextMeasurer};
    use crate::ooxml::error::{OoxmlError, Result};
    use log::debug;
    use std::collections::HashMap;

    /// Metrics read from registered TrueType/OpenType files.
    ///
    /// Families that were not registered are measured with
    /// [`ApproximateMetrics`].
    #[derive(Debug, Default)]
    pub struct TrueTypeMetrics {
        faces: HashMap<String, Vec<u8>>,
    }

    impl TrueTypeMetrics {
        pub fn new() -> Self {
            Self::default()
        }

        /// Register a font file and return its family name.
        pub fn add_font(&mut self, data: Vec<u8>) -> Result<String> {
            let face = ttf_parser::Face::parse(&data, 0)
                .map_err(|e| OoxmlError::InvalidFormat(format!("font: {e}")))?;
            let family = face
                .names()
                .into_iter()
                .find(|n| n.name_id == ttf_parser::name_id::FAMILY)
                .and_then(|n| n.to_string())
                .ok_or_else(|| OoxmlError::InvalidFormat("font has no family name".to_string()))?;
            debug!("Registered font family {family}");
            self.faces.insert(family.to_lowercase(), data);
            Ok(family)
        }

        fn face(&self, font: &str) -> Option<ttf_parser::Face<'_>> {
            let data = self.faces.get(&font.to_lowercase())?;
            ttf_parser::Face::parse(data, 0).ok()
        }
    }

    impl TextMeasurer for TrueTypeMetrics {
        fn text_width(&self, text: &str, font: &str, size: f64) -> f64 {
            let Some(face) = self.face(font) else {
                return ApproximateMetrics.text_width(text, font, size);
            };
            let scale = size / f64::from(face.units_per_em());
            text.chars()
                .map(|c| {
                    face.glyph_index(c)
                        .and_then(|g| face.glyph_hor_advance(g))
                        .map_or(0.0, f64::from)
                })
                .sum::<f64>()
                * scale
        }

        fn line_height(&self, font: &str, size: f64) -> f64 {
            let Some(face) = self.face(font) else {
                return ApproximateMetrics.line_height(font, size);
            };
            let units = f64::from(face.ascender()) - f64::from(face.descender())
                + f64::from(face.line_gap());
            units / f64::from(face.units_per_em()) * size
        }
    }
}
