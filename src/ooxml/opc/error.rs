/// Errors raised while reading or writing the package container, its
/// content types and its relationship items.
use thiserror::Error;

#[derive(Error, Debug)]
pub enum OpcError {
    #[error("package not found: {0}")]
    PackageNotFound(String),

    #[error("invalid partname {0:?}")]
    InvalidPackUri(String),

    #[error("no part named {0}")]
    PartNotFound(String),

    #[error("no relationship {0}")]
    RelationshipNotFound(String),

    #[error("no content type registered for {0}")]
    ContentTypeNotFound(String),

    #[error("malformed relationship: {0}")]
    InvalidRelationship(String),

    #[error("malformed package XML: {0}")]
    Xml(String),

    #[error(transparent)]
    Zip(#[from] zip::result::ZipError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    QuickXml(#[from] quick_xml::Error),

    #[error("part content is not UTF-8: {0}")]
    Utf8(#[from] std::str::Utf8Error),
}

impl From<quick_xml::events::attributes::AttrError> for OpcError {
    fn from(err: quick_xml::events::attributes::AttrError) -> Self {
        OpcError::Xml(format!("bad attribute: {err}"))
    }
}

pub type Result<T> = std::result::Result<T, OpcError>;
