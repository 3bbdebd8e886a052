/// Presentation part - the main part in a .pptx package.
///
/// Corresponds to `/ppt/presentation.xml` in the package.
use crate::ooxml::error::{OoxmlError, Result};
use crate::ooxml::opc::part::Part;
use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

/// Slide and master references plus the slide size, in document order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PresentationInfo {
    /// Relationship ids of `p:sldIdLst/p:sldId`
    pub slide_rids: Vec<String>,
    /// Relationship ids of `p:sldMasterIdLst/p:sldMasterId`
    pub master_rids: Vec<String>,
    /// `p:sldSz@cx` in EMU
    pub slide_width: Option<i64>,
    /// `p:sldSz@cy` in EMU
    pub slide_height: Option<i64>,
}

/// The main presentation part.
///
/// # Example
///
/// ```rust,ignore
/// let pres_part = PresentationPart::from_part(opc_part);
/// let info = pres_part.info()?;
/// println!("{} slides", info.slide_rids.len());
/// ```
pub struct PresentationPart<'a> {
    /// The underlying OPC part
    part: &'a dyn Part,
}

impl<'a> PresentationPart<'a> {
    pub fn from_part(part: &'a dyn Part) -> Self {
        Self { part }
    }

    /// Number of `<p:sldId>` entries, counted without building anything else.
    pub fn slide_count(&self) -> Result<usize> {
        let mut reader = Reader::from_reader(self.part.blob());
        reader.config_mut().trim_text(true);

        let mut count = 0;
        let mut buf = Vec::new();

        loop {
            match reader.read_event_into(&mut buf) {
                Ok(Event::Start(e)) | Ok(Event::Empty(e)) => {
                    if e.local_name().as_ref() == b"sldId" {
                        count += 1;
                    }
                },
                Ok(Event::Eof) => break,
                Err(e) => return Err(OoxmlError::Xml(e.to_string())),
                _ => {},
            }
            buf.clear();
        }

        Ok(count)
    }

    /// Read slide and master references and the slide size in one pass.
    pub fn info(&self) -> Result<PresentationInfo> {
        let mut reader = Reader::from_reader(self.part.blob());
        reader.config_mut().trim_text(true);

        let mut info = PresentationInfo::default();
        let mut buf = Vec::new();

        loop {
            match reader.read_event_into(&mut buf) {
                Ok(Event::Start(e)) | Ok(Event::Empty(e)) => match e.local_name().as_ref() {
                    b"sldId" => info.slide_rids.extend(rel_id(&e)?),
                    b"sldMasterId" => info.master_rids.extend(rel_id(&e)?),
                    b"sldSz" => {
                        for attr in e.attributes().flatten() {
                            let value = atoi_simd::parse::<i64, false, false>(&attr.value).ok();
                            match attr.key.as_ref() {
                                b"cx" => info.slide_width = value,
                                b"cy" => info.slide_height = value,
                                _ => {},
                            }
                        }
                    },
                    _ => {},
                },
                Ok(Event::Eof) => break,
                Err(e) => return Err(OoxmlError::Xml(e.to_string())),
                _ => {},
            }
            buf.clear();
        }

        Ok(info)
    }
}

/// The `r:id` of a list entry; the plain `id` attribute is a numeric id.
fn rel_id(e: &BytesStart) -> Result<Option<String>> {
    for attr in e.attributes().flatten() {
        let key = attr.key.as_ref();
        if key != b"id" && attr.key.local_name().as_ref() == b"id" {
            let rid = std::str::from_utf8(&attr.value).map_err(|e| OoxmlError::Xml(e.to_string()))?;
            return Ok(Some(rid.to_string()));
        }
    }
    Ok(None)
}
