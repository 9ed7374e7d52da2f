//! Hand-written on-disk layouts used by the adapters.
//!
//! - [`header`]: `"<dtype> <rows> <cols>\n"` line of the raw-binary family
//! - [`records`]: length-framed sequential binary records
//! - [`mat5`]: MAT-file level 5 container

pub mod header;
pub mod mat5;
pub mod records;

#[cfg(test)]
mod tests;

pub use header::Header;
pub use mat5::MatError;
