/// Error types for presentation operations.
///
/// Load-time limit violations, operations on removed elements, and edits that
/// a shape does not support are distinct variants so callers can match on them
/// without string inspection.
use thiserror::Error;

/// Result type for presentation operations.
pub type Result<T> = std::result::Result<T, OoxmlError>;

#[derive(Error, Debug)]
pub enum OoxmlError {
    /// OPC package error
    #[error("OPC error: {0}")]
    Opc(#[from] crate::ooxml::opc::error::OpcError),

    /// XML parsing error
    #[error("XML error: {0}")]
    Xml(String),

    /// Part not found
    #[error("Part not found: {0}")]
    PartNotFound(String),

    /// Invalid content type
    #[error("Invalid content type: expected {expected}, got {got}")]
    InvalidContentType { expected: String, got: String },

    /// Invalid format
    #[error("Invalid format: {0}")]
    InvalidFormat(String),

    /// Configuration could not be loaded
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The package was rejected when opened
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The target was removed, or the presentation was closed
    #[error(transparent)]
    State(#[from] StateError),

    /// The target does not support the requested operation
    #[error(transparent)]
    Capability(#[from] CapabilityError),
}

/// Load-time rejection of a package.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Presentation is {size} bytes, the maximum is {max}")]
    PresentationTooLarge { size: u64, max: u64 },

    #[error("Presentation has {count} slides, the maximum is {max}")]
    TooManySlides { count: usize, max: usize },
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StateError {
    /// The shape, paragraph or portion has been removed from its container.
    #[error("{0} has been removed")]
    ElementRemoved(&'static str),

    /// The presentation has been closed.
    #[error("Presentation is closed")]
    Closed,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CapabilityError {
    /// Text of layout and master placeholders, and of non-title slide
    /// placeholders, is not editable.
    #[error("Text frame is not editable")]
    TextFrameNotEditable,

    #[error("Shape has no text frame")]
    NoTextFrame,

    #[error("Shape is not a picture")]
    NotAPicture,

    /// Graphic frames and groups have no `p:spPr` to hold a fill.
    #[error("Shape does not support a fill")]
    NotFillable,
}

impl From<quick_xml::Error> for OoxmlError {
    fn from(err: quick_xml::Error) -> Self {
        OoxmlError::Xml(err.to_string())
    }
}

impl From<crate::common::xml::XmlError> for OoxmlError {
    fn from(err: crate::common::xml::XmlError) -> Self {
        OoxmlError::Xml(err.to_string())
    }
}

impl From<quick_xml::events::attributes::AttrError> for OoxmlError {
    fn from(err: quick_xml::events::attributes::AttrError) -> Self {
        OoxmlError::Xml(err.to_string())
    }
}

impl OoxmlError {
    /// True for [`StateError::ElementRemoved`].
    pub fn is_removed(&self) -> bool {
        matches!(self, OoxmlError::State(StateError::ElementRemoved(_)))
    }
}
