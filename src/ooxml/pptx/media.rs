//! Image parts referenced by pictures and slide backgrounds.
//!
//! Pictures and backgrounds name their image through a relationship of the
//! slide part. Reading resolves that relationship to the image part; replacing
//! an image rewrites the bytes of the part in place, so every shape sharing
//! the part sees the new image.

use crate::ooxml::error::Result;
use crate::ooxml::opc::constants::{content_type as CT, relationship_type as RT};
use crate::ooxml::opc::packuri::PackURI;
use crate::ooxml::opc::part::{BlobPart, Part};
use crate::ooxml::opc::OpcPackage;
use log::debug;

/// Image format enumeration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    Png,
    Jpeg,
    Gif,
    Bmp,
    Tiff,
    Emf,
    Wmf,
    Svg,
    /// Unknown format
    Unknown,
}

impl ImageFormat {
    /// Detect format from file extension.
    pub fn from_extension(ext: &str) -> Self {
        match ext.to_lowercase().as_str() {
            "png" => ImageFormat::Png,
            "jpg" | "jpeg" | "jpe" => ImageFormat::Jpeg,
            "gif" => ImageFormat::Gif,
            "bmp" => ImageFormat::Bmp,
            "tif" | "tiff" => ImageFormat::Tiff,
            "emf" => ImageFormat::Emf,
            "wmf" => ImageFormat::Wmf,
            "svg" => ImageFormat::Svg,
            _ => ImageFormat::Unknown,
        }
    }

    /// Detect format from file bytes (magic number detection).
    pub fn detect_from_bytes(data: &[u8]) -> Self {
        if data.starts_with(b"\x89PNG\r\n\x1a\n") {
            return ImageFormat::Png;
        }
        if data.starts_with(&[0xFF, 0xD8, 0xFF]) {
            return ImageFormat::Jpeg;
        }
        if data.starts_with(b"GIF87a") || data.starts_with(b"GIF89a") {
            return ImageFormat::Gif;
        }
        if data.starts_with(b"BM") {
            return ImageFormat::Bmp;
        }
        if data.starts_with(b"II*\0") || data.starts_with(b"MM\0*") {
            return ImageFormat::Tiff;
        }
        // EMR_HEADER record type, then " EMF" signature at offset 40
        if data.len() >= 44 && data[0..4] == [1, 0, 0, 0] && &data[40..44] == b" EMF" {
            return ImageFormat::Emf;
        }
        // placeable WMF key
        if data.starts_with(&[0xD7, 0xCD, 0xC6, 0x9A]) {
            return ImageFormat::Wmf;
        }
        let head = &data[..data.len().min(256)];
        if memchr::memmem::find(head, b"<svg").is_some() {
            return ImageFormat::Svg;
        }
        ImageFormat::Unknown
    }

    /// Get the MIME type for this format.
    pub fn mime_type(&self) -> &'static str {
        match self {
            ImageFormat::Png => CT::PNG,
            ImageFormat::Jpeg => CT::JPEG,
            ImageFormat::Gif => CT::GIF,
            ImageFormat::Bmp => CT::BMP,
            ImageFormat::Tiff => CT::TIFF,
            ImageFormat::Emf => CT::X_EMF,
            ImageFormat::Wmf => CT::X_WMF,
            ImageFormat::Svg => CT::SVG,
            ImageFormat::Unknown => "application/octet-stream",
        }
    }

    /// Get the file extension for this format.
    pub fn extension(&self) -> &'static str {
        match self {
            ImageFormat::Png => "png",
            ImageFormat::Jpeg => "jpeg",
            ImageFormat::Gif => "gif",
            ImageFormat::Bmp => "bmp",
            ImageFormat::Tiff => "tiff",
            ImageFormat::Emf => "emf",
            ImageFormat::Wmf => "wmf",
            ImageFormat::Svg => "svg",
            ImageFormat::Unknown => "bin",
        }
    }
}

/// An image part as seen from a picture or background.
#[derive(Clone, Copy)]
pub struct Image<'a> {
    part: &'a dyn Part,
}

impl<'a> Image<'a> {
    pub fn partname(&self) -> &'a PackURI {
        self.part.partname()
    }

    pub fn content_type(&self) -> &'a str {
        self.part.content_type()
    }

    pub fn bytes(&self) -> &'a [u8] {
        self.part.blob()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.part.blob().len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.part.blob().is_empty()
    }

    pub fn format(&self) -> ImageFormat {
        ImageFormat::from_extension(self.part.partname().ext())
    }
}

impl std::fmt::Debug for Image<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Image")
            .field("partname", self.partname())
            .field("content_type", &self.content_type())
            .field("len", &self.len())
            .finish()
    }
}

/// The image behind relationship `r_id` of `source`.
pub(crate) fn image<'a>(package: &'a OpcPackage, source: &PackURI, r_id: &str) -> Result<Image<'a>> {
    let target = package.get_part(source)?.related_partname(r_id)?;
    Ok(Image {
        part: package.get_part(&target)?,
    })
}

/// Overwrite the bytes of the image behind relationship `r_id` of `source`.
fn replace_image(
    package: &mut OpcPackage,
    source: &PackURI,
    r_id: &str,
    bytes: Vec<u8>,
) -> Result<()> {
    let target = package.get_part(source)?.related_partname(r_id)?;
    debug!("Replacing image {} ({} bytes)", target, bytes.len());
    package.get_part_mut(&target)?.set_blob(bytes);
    Ok(())
}

/// Store `bytes` as the image behind relationship `r_id` of `source`.
///
/// The part is rewritten in place when the format is unchanged, so every
/// reference to it sees the new image. A different format goes into a new
/// part whose relationship id is returned for the caller to point at.
pub(crate) fn store_image(
    package: &mut OpcPackage,
    source: &PackURI,
    r_id: &str,
    bytes: Vec<u8>,
) -> Result<Option<String>> {
    let target = package.get_part(source)?.related_partname(r_id)?;
    let format = ImageFormat::detect_from_bytes(&bytes);
    if format == ImageFormat::Unknown || format == ImageFormat::from_extension(target.ext()) {
        replace_image(package, source, r_id, bytes)?;
        return Ok(None);
    }
    add_image(package, source, bytes).map(Some)
}

/// Store `bytes` as a new media part and relate it from `source`.
///
/// Returns the new relationship id.
pub(crate) fn add_image(package: &mut OpcPackage, source: &PackURI, bytes: Vec<u8>) -> Result<String> {
    let format = ImageFormat::detect_from_bytes(&bytes);
    let template = format!("/ppt/media/image%d.{}", format.extension());
    let partname = package.next_partname(&template)?;
    debug!("Adding image part {}", partname);
    package.add_part(Box::new(BlobPart::new(
        partname.clone(),
        format.mime_type().to_string(),
        bytes,
    )));
    Ok(package.get_part_mut(source)?.relate_to(&partname, RT::IMAGE))
}
