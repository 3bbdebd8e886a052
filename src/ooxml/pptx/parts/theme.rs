/// Theme parts for PowerPoint presentations.
///
/// Only the font scheme is read: text properties name theme fonts through
/// `+mj-lt` (major, headings) and `+mn-lt` (minor, body).
use crate::ooxml::error::{OoxmlError, Result};
use crate::ooxml::opc::part::Part;
use quick_xml::Reader;
use quick_xml::events::Event;

/// Theme fonts extracted from a theme part.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Theme {
    /// Theme name
    pub name: String,
    /// Major (heading) latin typeface
    pub major_font: Option<String>,
    /// Minor (body) latin typeface
    pub minor_font: Option<String>,
}

impl Theme {
    /// Parse the theme XML of `part`.
    ///
    /// # Examples
    ///
    /// ```rust,ignore
    /// let theme = Theme::from_part(part)?;
    /// println!("Body font: {:?}", theme.minor_font);
    /// ```
    pub fn from_part(part: &dyn Part) -> Result<Self> {
        Self::parse(part.blob())
    }

    pub(crate) fn parse(xml: &[u8]) -> Result<Self> {
        let mut reader = Reader::from_reader(xml);
        reader.config_mut().trim_text(true);

        let mut theme = Theme::default();
        let mut in_major_font = false;
        let mut in_minor_font = false;

        loop {
            match reader.read_event() {
                Ok(Event::Start(ref e)) | Ok(Event::Empty(ref e)) => match e.local_name().as_ref() {
                    b"theme" => {
                        for attr in e.attributes().flatten() {
                            if attr.key.as_ref() == b"name" {
                                theme.name = attr.unescape_value()?.into_owned();
                            }
                        }
                    },
                    b"majorFont" => in_major_font = true,
                    b"minorFont" => in_minor_font = true,
                    b"latin" if in_major_font || in_minor_font => {
                        for attr in e.attributes().flatten() {
                            if attr.key.as_ref() == b"typeface" {
                                let typeface = Some(attr.unescape_value()?.into_owned());
                                if in_major_font {
                                    theme.major_font = typeface;
                                } else {
                                    theme.minor_font = typeface;
                                }
                            }
                        }
                    },
                    _ => {},
                },
                Ok(Event::End(e)) => match e.local_name().as_ref() {
                    b"majorFont" => in_major_font = false,
                    b"minorFont" => in_minor_font = false,
                    _ => {},
                },
                Ok(Event::Eof) => break,
                Err(e) => return Err(OoxmlError::Xml(e.to_string())),
                _ => {},
            }
        }

        Ok(theme)
    }

    /// Resolve a theme font reference; other names are returned unchanged.
    pub fn resolve_typeface<'a>(&'a self, typeface: &'a str) -> Option<&'a str> {
        if typeface.starts_with("+mj") {
            self.major_font.as_deref()
        } else if typeface.starts_with("+mn") {
            self.minor_font.as_deref()
        } else {
            Some(typeface)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const THEME: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<a:theme xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" name="Office Theme">
  <a:themeElements>
    <a:fontScheme name="Office">
      <a:majorFont><a:latin typeface="Calibri Light"/><a:ea typeface=""/></a:majorFont>
      <a:minorFont><a:latin typeface="Calibri"/><a:ea typeface=""/></a:minorFont>
    </a:fontScheme>
  </a:themeElements>
</a:theme>"#;

    #[test]
    fn test_parse_fonts() {
        let theme = Theme::parse(THEME.as_bytes()).unwrap();
        assert_eq!(theme.name, "Office Theme");
        assert_eq!(theme.major_font.as_deref(), Some("Calibri Light"));
        assert_eq!(theme.minor_font.as_deref(), Some("Calibri"));
    }

    #[test]
    fn test_resolve_typeface() {
        let theme = Theme::parse(THEME.as_bytes()).unwrap();
        assert_eq!(theme.resolve_typeface("+mj-lt"), Some("Calibri Light"));
        assert_eq!(theme.resolve_typeface("+mn-ea"), Some("Calibri"));
        assert_eq!(theme.resolve_typeface("Arial"), Some("Arial"));
        assert_eq!(Theme::default().resolve_typeface("+mn-lt"), None);
    }
}
