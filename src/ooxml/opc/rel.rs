//! Relationships between parts of an OPC package.
//!
//! Every part (and the package itself) owns a set of relationships keyed by
//! `rId`. Slides reach their layout, images, notes and custom XML through these.

use crate::common::xml::escape_xml;
use crate::ooxml::opc::error::{OpcError, Result};
use crate::ooxml::opc::packuri::PackURI;
use std::collections::HashMap;

/// A single relationship from a source part to a target.
#[derive(Debug, Clone)]
pub struct Relationship {
    /// Relationship ID (e.g., "rId1", "rId2")
    r_id: String,

    /// Relationship type URI
    reltype: String,

    /// Target reference - either a part URI relative to `base_uri` or an external URL
    target_ref: String,

    /// Directory of the source part
    base_uri: String,

    is_external: bool,
}

impl Relationship {
    pub fn new(
        r_id: String,
        reltype: String,
        target_ref: String,
        base_uri: String,
        is_external: bool,
    ) -> Self {
        Self {
            r_id,
            reltype,
            target_ref,
            base_uri,
            is_external,
        }
    }

    #[inline]
    pub fn r_id(&self) -> &str {
        &self.r_id
    }

    #[inline]
    pub fn reltype(&self) -> &str {
        &self.reltype
    }

    #[inline]
    pub fn target_ref(&self) -> &str {
        &self.target_ref
    }

    #[inline]
    pub fn is_external(&self) -> bool {
        self.is_external
    }

    /// Absolute part name of the target; fails for external relationships.
    pub fn target_partname(&self) -> Result<PackURI> {
        if self.is_external {
            return Err(OpcError::InvalidRelationship(format!(
                "{} targets an external resource",
                self.r_id
            )));
        }
        PackURI::from_rel_ref(&self.base_uri, &self.target_ref).map_err(OpcError::InvalidPackUri)
    }
}

/// Collection of relationships from a single source.
#[derive(Debug, Clone)]
pub struct Relationships {
    base_uri: String,
    rels: HashMap<String, Relationship>,
}

impl Relationships {
    /// Create an empty collection whose targets resolve against `base_uri`.
    pub fn new(base_uri: String) -> Self {
        Self {
            base_uri,
            rels: HashMap::new(),
        }
    }

    /// Add (or replace) the relationship with id `r_id`.
    pub fn add_relationship(
        &mut self,
        reltype: String,
        target_ref: String,
        r_id: String,
        is_external: bool,
    ) -> &Relationship {
        let rel = Relationship::new(
            r_id.clone(),
            reltype,
            target_ref,
            self.base_uri.clone(),
            is_external,
        );
        match self.rels.entry(r_id) {
            std::collections::hash_map::Entry::Occupied(mut slot) => {
                slot.insert(rel);
                slot.into_mut()
            },
            std::collections::hash_map::Entry::Vacant(slot) => slot.insert(rel),
        }
    }

    #[inline]
    pub fn get(&self, r_id: &str) -> Option<&Relationship> {
        self.rels.get(r_id)
    }

    /// Id of the internal relationship of `reltype` to `target_ref`, adding one
    /// with the next free rId when none exists.
    pub fn get_or_add(&mut self, reltype: &str, target_ref: &str) -> String {
        let existing = self.rels.values().find(|rel| {
            rel.reltype() == reltype && rel.target_ref() == target_ref && !rel.is_external()
        });
        if let Some(rel) = existing {
            return rel.r_id().to_string();
        }

        let r_id = self.next_r_id();
        self.add_relationship(reltype.to_string(), target_ref.to_string(), r_id.clone(), false);
        r_id
    }

    /// Next free relationship id, filling gaps first ("rId1", "rId2", ...).
    fn next_r_id(&self) -> String {
        let mut used: Vec<u32> = self
            .rels
            .keys()
            .filter_map(|r_id| {
                r_id.strip_prefix("rId")
                    .and_then(|n| atoi_simd::parse::<u32, false, false>(n.as_bytes()).ok())
            })
            .collect();
        used.sort_unstable();

        let mut next = 1u32;
        for &n in &used {
            match n.cmp(&next) {
                std::cmp::Ordering::Equal => next += 1,
                std::cmp::Ordering::Greater => break,
                std::cmp::Ordering::Less => {},
            }
        }

        let mut buf = itoa::Buffer::new();
        format!("rId{}", buf.format(next))
    }

    /// The single relationship of `reltype`.
    ///
    /// Fails when none or more than one exists.
    pub fn part_with_reltype(&self, reltype: &str) -> Result<&Relationship> {
        let mut matching = self.rels.values().filter(|rel| rel.reltype() == reltype);
        match (matching.next(), matching.next()) {
            (Some(rel), None) => Ok(rel),
            (None, _) => Err(OpcError::RelationshipNotFound(format!(
                "No relationship of type '{}'",
                reltype
            ))),
            (Some(_), Some(_)) => Err(OpcError::InvalidRelationship(format!(
                "Multiple relationships of type '{}'",
                reltype
            ))),
        }
    }

    /// First relationship of `reltype` in rId order, if any.
    pub fn first_with_reltype(&self, reltype: &str) -> Option<&Relationship> {
        self.rels
            .values()
            .filter(|rel| rel.reltype() == reltype)
            .min_by(|a, b| a.r_id().cmp(b.r_id()))
    }

    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = &Relationship> {
        self.rels.values()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.rels.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.rels.is_empty()
    }

    pub fn remove(&mut self, r_id: &str) -> Option<Relationship> {
        self.rels.remove(r_id)
    }

    /// Serialize as a `.rels` document, sorted by rId for stable output.
    pub fn to_xml(&self) -> String {
        let mut xml = String::with_capacity(256 + self.rels.len() * 160);
        xml.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
        xml.push('\n');
        xml.push_str(
            r#"<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">"#,
        );

        let mut rels: Vec<&Relationship> = self.rels.values().collect();
        rels.sort_by(|a, b| a.r_id().cmp(b.r_id()));

        for rel in rels {
            let target_mode = if rel.is_external() {
                r#" TargetMode="External""#
            } else {
                ""
            };
            xml.push_str(&format!(
                r#"<Relationship Id="{}" Type="{}" Target="{}"{}/>"#,
                escape_xml(rel.r_id()),
                escape_xml(rel.reltype()),
                escape_xml(rel.target_ref()),
                target_mode
            ));
        }

        xml.push_str("</Relationships>");
        xml
    }
}

impl Default for Relationships {
    fn default() -> Self {
        Self::new("/".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ooxml::opc::constants::relationship_type as RT;

    #[test]
    fn test_next_r_id_fills_gaps() {
        let mut rels = Relationships::new("/ppt/slides".to_string());
        assert_eq!(rels.next_r_id(), "rId1");

        rels.add_relationship("t".into(), "a.xml".into(), "rId1".into(), false);
        rels.add_relationship("t".into(), "c.xml".into(), "rId3".into(), false);
        assert_eq!(rels.next_r_id(), "rId2");
    }

    #[test]
    fn test_get_or_add_reuses_existing() {
        let mut rels = Relationships::new("/ppt/slides".to_string());
        let first = rels.get_or_add(RT::SLIDE_LAYOUT, "../slideLayouts/slideLayout1.xml");
        let again = rels.get_or_add(RT::SLIDE_LAYOUT, "../slideLayouts/slideLayout1.xml");
        let other = rels.get_or_add(RT::IMAGE, "../media/image1.png");
        assert_eq!(first, "rId1");
        assert_eq!(again, "rId1");
        assert_eq!(other, "rId2");
    }

    #[test]
    fn test_target_partname_resolves_relative() {
        let mut rels = Relationships::new("/ppt/slides".to_string());
        let r_id = rels.get_or_add(RT::CUSTOM_XML, "../../customXml/item1.xml");
        let rel = rels.get(&r_id).unwrap();
        assert_eq!(rel.target_partname().unwrap().as_str(), "/customXml/item1.xml");
    }

    #[test]
    fn test_part_with_reltype_requires_single_match() {
        let mut rels = Relationships::default();
        assert!(rels.part_with_reltype(RT::OFFICE_DOCUMENT).is_err());
        rels.get_or_add(RT::IMAGE, "a.png");
        rels.get_or_add(RT::IMAGE, "b.png");
        assert!(rels.part_with_reltype(RT::IMAGE).is_err());
        assert_eq!(rels.first_with_reltype(RT::IMAGE).unwrap().target_ref(), "a.png");
    }

    #[test]
    fn test_to_xml_external_and_escaping() {
        let mut rels = Relationships::default();
        rels.add_relationship(
            RT::HYPERLINK.into(),
            "https://example.com/?a=1&b=2".into(),
            "rId1".into(),
            true,
        );
        let xml = rels.to_xml();
        assert!(xml.contains(r#"TargetMode="External""#));
        assert!(xml.contains("a=1&amp;b=2"));
    }
}
