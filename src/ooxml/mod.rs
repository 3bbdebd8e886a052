//! Office Open XML presentation support.
//!
//! 1. **OPC layer** (`opc`): ZIP container, parts, relationships
//! 2. **Errors** (`error`): the crate-wide error type
//! 3. **PresentationML** (`pptx`): slides, layouts, masters, shapes and text
pub mod error;
pub mod opc;
pub mod pptx;

pub use error::{CapabilityError, OoxmlError, Result, StateError, ValidationError};
