/// In-memory OPC package: parts, their relationships, and the package rels.
///
/// Opening walks the relationship graph from `/_rels/.rels` and loads every
/// reachable part; saving serializes the current state of all parts.
use crate::ooxml::opc::constants::relationship_type;
use crate::ooxml::opc::error::{OpcError, Result};
use crate::ooxml::opc::packuri::{PACKAGE_URI, PackURI};
use crate::ooxml::opc::part::{Part, PartFactory};
use crate::ooxml::opc::phys_pkg::PhysPkgReader;
use crate::ooxml::opc::pkgreader::PackageReader;
use crate::ooxml::opc::pkgwriter::PackageWriter;
use crate::ooxml::opc::rel::Relationships;
use std::collections::HashMap;
use std::io::{Read, Seek, Write};
use std::path::Path;

pub struct OpcPackage {
    /// Package-level relationships
    rels: Relationships,

    /// All parts in the package, indexed by partname
    parts: HashMap<String, Box<dyn Part>>,
}

impl OpcPackage {
    /// Create a new empty package.
    pub fn new() -> Self {
        Self {
            rels: Relationships::new(PACKAGE_URI.to_string()),
            parts: HashMap::new(),
        }
    }

    /// Open a package file.
    ///
    /// # Example
    /// ```no_run
    /// use slidekit::ooxml::opc::OpcPackage;
    ///
    /// let pkg = OpcPackage::open("deck.pptx")?;
    /// println!("{} parts", pkg.part_count());
    /// # Ok::<(), slidekit::ooxml::opc::error::OpcError>(())
    /// ```
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::from_phys_reader(PhysPkgReader::open(path)?)
    }

    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        Self::from_phys_reader(PhysPkgReader::from_bytes(data)?)
    }

    pub fn from_reader<R: Read + Seek>(reader: R) -> Result<Self> {
        Self::from_phys_reader(PhysPkgReader::new(reader)?)
    }

    fn from_phys_reader(phys_reader: PhysPkgReader) -> Result<Self> {
        let pkg_reader = PackageReader::from_phys_reader(phys_reader)?;
        Self::unmarshal(pkg_reader)
    }

    /// Turn serialized parts and relationships into the part graph.
    fn unmarshal(mut pkg_reader: PackageReader) -> Result<Self> {
        let mut package = Self::new();

        for srel in pkg_reader.pkg_srels() {
            package.rels.add_relationship(
                srel.reltype.clone(),
                srel.target_ref.clone(),
                srel.r_id.clone(),
                srel.is_external(),
            );
        }

        for spart in pkg_reader.take_sparts() {
            let mut part = PartFactory::load(spart.partname, spart.content_type, spart.blob)?;
            for srel in spart.srels {
                let external = srel.is_external();
                part.rels_mut().add_relationship(srel.reltype, srel.target_ref, srel.r_id, external);
            }
            package.add_part(part);
        }

        log::debug!("unmarshalled package with {} parts", package.parts.len());
        Ok(package)
    }

    /// The part the package's officeDocument relationship points at
    /// (`/ppt/presentation.xml` for presentations).
    pub fn main_document_part(&self) -> Result<&dyn Part> {
        self.part_by_reltype(relationship_type::OFFICE_DOCUMENT)
    }

    pub fn get_part(&self, partname: &PackURI) -> Result<&dyn Part> {
        self.parts
            .get(partname.as_str())
            .map(|b| &**b as &dyn Part)
            .ok_or_else(|| OpcError::PartNotFound(partname.to_string()))
    }

    pub fn get_part_mut(&mut self, partname: &PackURI) -> Result<&mut dyn Part> {
        self.parts
            .get_mut(partname.as_str())
            .map(|b| &mut **b as &mut dyn Part)
            .ok_or_else(|| OpcError::PartNotFound(partname.to_string()))
    }

    /// The part targeted by the package-level relationship of `reltype`.
    pub fn part_by_reltype(&self, reltype: &str) -> Result<&dyn Part> {
        let partname = self.rels.part_with_reltype(reltype)?.target_partname()?;
        self.get_part(&partname)
    }

    /// Add a part, replacing any part with the same partname.
    pub fn add_part(&mut self, part: Box<dyn Part>) {
        self.parts.insert(part.partname().to_string(), part);
    }

    pub fn iter_parts(&self) -> impl Iterator<Item = &dyn Part> {
        self.parts.values().map(|b| &**b as &dyn Part)
    }

    pub fn part_count(&self) -> usize {
        self.parts.len()
    }

    #[inline]
    pub fn contains_part(&self, partname: &PackURI) -> bool {
        self.parts.contains_key(partname.as_str())
    }

    pub fn rels(&self) -> &Relationships {
        &self.rels
    }

    pub fn rels_mut(&mut self) -> &mut Relationships {
        &mut self.rels
    }

    /// First unused partname for a template with a `%d` placeholder.
    ///
    /// # Example
    /// ```
    /// use slidekit::ooxml::opc::OpcPackage;
    ///
    /// let pkg = OpcPackage::new();
    /// let name = pkg.next_partname("/customXml/item%d.xml").unwrap();
    /// assert_eq!(name.as_str(), "/customXml/item1.xml");
    /// ```
    pub fn next_partname(&self, template: &str) -> Result<PackURI> {
        let mut buf = itoa::Buffer::new();
        for n in 1..=10_000u32 {
            let candidate = template.replace("%d", buf.format(n));
            if !self.parts.contains_key(&candidate) {
                return PackURI::new(candidate).map_err(OpcError::InvalidPackUri);
            }
        }
        Err(OpcError::InvalidPackUri(format!(
            "no free partname for template '{}'",
            template
        )))
    }

    /// Save to a file.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        PackageWriter::write(path, self)
    }

    /// Save to any byte sink.
    pub fn write_to<W: Write>(&self, writer: W) -> Result<()> {
        PackageWriter::write_to_stream(writer, self)
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        PackageWriter::to_bytes(self)
    }

    /// Release all part data.
    pub fn close(self) {
        log::debug!("closing package with {} parts", self.parts.len());
    }
}

impl Default for OpcPackage {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for OpcPackage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut partnames: Vec<&str> = self.parts.keys().map(String::as_str).collect();
        partnames.sort_unstable();
        f.debug_struct("OpcPackage")
            .field("rels", &self.rels.len())
            .field("parts", &partnames)
            .finish()
    }
}
