//! Concrete storage methods, one per format.
//!
//! | Type                   | Format                              |
//! |------------------------|-------------------------------------|
//! | [`Csv`]                | delimited text (plain / gzip)       |
//! | [`Json`]               | JSON document (plain / gzip)        |
//! | [`RawBinary`]          | header + raw bytes (plain / gzip)   |
//! | [`Base64`]             | header + base64 payload             |
//! | [`Pickle`]             | `bincode` object dump (plain / gzip)|
//! | [`Npy`], [`Npz`]       | NumPy array files                   |
//! | [`Png`]                | grayscale PNG raster                |
//! | [`FortranUnformatted`] | sequential `float64` records        |
//! | [`MatFile`]            | MAT-file level 5                    |
//!
//! Every adapter except [`Npz`] writes through
//! [`write_durably`](crate::durable::write_durably).

mod binary;
mod fortran;
mod json;
mod mat;
mod npy;
mod pickle;
mod png;
mod text;


pub use binary::{Base64, RawBinary};
pub use fortran::FortranUnformatted;
pub use json::Json;
pub use mat::{MatFile, MAT_VARIABLE};
pub use npy::{Npy, Npz, NPZ_ENTRY};
pub use pickle::Pickle;
pub use png::{Png, LAYOUT_LEN};
pub use text::Csv;
