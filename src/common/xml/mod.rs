//! XML helpers shared by the package and presentation layers.

mod element;
mod escape;

pub use element::{Element, Node, XmlError, local_name};
pub(crate) use element::resolve_entity;
pub use escape::escape_xml;
