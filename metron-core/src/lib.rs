//! Metron Core - Fundamental types
//!
//! This crate provides the core types used throughout Metron:
//! - `Dimension`: Tag identifying the kind of physical quantity
//! - `ConversionFn`: Numeric mapping used to convert to and from base units
//! - `UnitsError`: Errors raised by unit construction and measure arithmetic

mod dimension;
mod conversion;
mod error;

pub use dimension::Dimension;
pub use conversion::ConversionFn;
pub use error::{UnitsError, Result, codes};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::{Dimension, ConversionFn, UnitsError};
    pub use crate::error::codes;
}
