//! # `arrbench` Core
//!
//! Round-trip persistence benchmarks for 2-D numeric arrays.
//!
//! Each storage format is an adapter implementing [`StorageMethod`]
//! (`save` + `load`). [`TimedMethod`] wraps any adapter with the shared
//! measurement and verification policy: it times `save` and `load`, records
//! the file size, checks the loaded array against the original, and deletes
//! the file.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use arrbench_core::{Array, Catalog};
//!
//! let array = Array::new(2, 3, vec![1.0f64, 2.0, 3.0, 4.0, 5.0, 6.0])?;
//!
//! for mut timed in Catalog::all().timed_methods() {
//!     let path = dir.join(format!("{}.{}", timed.name(), timed.method().extension()));
//!     let measurement = timed.round_trip(&array, &path)?;
//!     println!("{measurement:?}");
//! }
//! ```
//!
//! ## Durability
//!
//! Every `save` returns only after the file has been `fsync`ed, so save
//! timings include the device write. Every `time_load` sums the loaded values
//! inside the timed region, so no codec can return early with a lazy view.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::unnecessary_cast)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::doc_markdown)]

pub mod adapters;
pub mod array;
pub mod catalog;
pub mod config;
#[cfg(test)]
mod config_tests;
pub mod durable;
pub mod error;
pub mod format;
pub mod method;

pub use array::{Array, DType, Element, Elements};
pub use catalog::{Catalog, MethodKind};
pub use config::{BenchConfig, ConfigError};
pub use durable::Compression;
pub use error::{Error, Result};
pub use method::{Measurement, StorageMethod, TimedMethod};
