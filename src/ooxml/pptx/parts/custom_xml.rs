/// Custom XML parts holding per-slide custom data.
///
/// The payload is stored as the escaped text of a single `<ctd>` root so that
/// any string, including markup and surrounding whitespace, reads back
/// unchanged.
use crate::common::xml::{escape_xml, resolve_entity};
use crate::ooxml::error::{OoxmlError, Result};
use quick_xml::Reader;
use quick_xml::events::Event;

/// Template for new custom XML partnames.
pub const PARTNAME_TEMPLATE: &str = "/customXml/item%d.xml";

/// Part bytes for `payload`.
pub fn to_xml(payload: &str) -> Vec<u8> {
    let escaped = escape_xml(payload);
    let mut xml = String::with_capacity(escaped.len() + 64);
    xml.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\n<ctd>");
    xml.push_str(&escaped);
    xml.push_str("</ctd>");
    xml.into_bytes()
}

/// Text content of the root element, with whitespace kept as stored.
pub fn read_payload(xml: &[u8]) -> Result<String> {
    let mut reader = Reader::from_reader(xml);
    reader.config_mut().trim_text(false);

    let mut payload = String::new();
    let mut depth = 0usize;
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(_)) => depth += 1,
            Ok(Event::End(_)) => depth = depth.saturating_sub(1),
            Ok(Event::Text(t)) if depth > 0 => {
                payload.push_str(std::str::from_utf8(&t).map_err(|e| OoxmlError::Xml(e.to_string()))?);
            },
            Ok(Event::CData(t)) if depth > 0 => {
                payload.push_str(std::str::from_utf8(&t).map_err(|e| OoxmlError::Xml(e.to_string()))?);
            },
            Ok(Event::GeneralRef(r)) if depth > 0 => {
                let name = std::str::from_utf8(&r).map_err(|e| OoxmlError::Xml(e.to_string()))?;
                payload.push(resolve_entity(name)?);
            },
            Ok(Event::Eof) => break,
            Err(e) => return Err(OoxmlError::Xml(e.to_string())),
            _ => {},
        }
        buf.clear();
    }

    Ok(payload)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payload_survives_markup() {
        for payload in ["Test custom data", "", "  padded \n", "<a href=\"x\">Q&A</a> it's"] {
            assert_eq!(read_payload(&to_xml(payload)).unwrap(), payload);
        }
    }

    #[test]
    fn test_read_foreign_part() {
        let xml = br#"<?xml version="1.0"?><ctd>caf&#xE9; &amp; more<![CDATA[<raw>]]></ctd>"#;
        assert_eq!(read_payload(xml).unwrap(), "caf\u{e9} & more<raw>");
    }
}
