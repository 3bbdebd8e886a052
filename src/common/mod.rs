//! Format-neutral helpers: XML handling and unit conversion.

pub mod unit;
pub mod xml;
