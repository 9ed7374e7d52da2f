//! Declarative catalog of storage methods.
//!
//! The caller states which methods to run, either directly as a list of
//! [`MethodKind`]s or through [`BenchConfig`]. There is no global
//! enabled/disabled state.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::debug;

use crate::adapters::{
    Base64, Csv, FortranUnformatted, Json, MatFile, Npy, Npz, Pickle, Png, RawBinary,
};
use crate::config::BenchConfig;
use crate::durable::Compression;
use crate::error::{Error, Result};
use crate::method::{StorageMethod, TimedMethod};

/// Every storage method the crate provides.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MethodKind {
    /// Comma-delimited text.
    Csv,
    /// gzip-compressed comma-delimited text.
    CsvGzip,
    /// JSON document.
    Json,
    /// gzip-compressed JSON document.
    JsonGzip,
    /// Header line plus base64 payload.
    Base64,
    /// `bincode` object dump.
    Pickle,
    /// gzip-compressed `bincode` object dump.
    PickleGzip,
    /// Header line plus raw bytes.
    Binary,
    /// gzip-compressed header line plus raw bytes.
    BinaryGzip,
    /// NumPy `.npy`.
    Npy,
    /// NumPy compressed `.npz`.
    Npz,
    /// Grayscale PNG raster.
    Png,
    /// Sequential `float64` records.
    Fortran,
    /// MAT-file level 5.
    Mat,
}

impl MethodKind {
    /// The full catalog, in run order.
    pub const ALL: [MethodKind; 14] = [
        MethodKind::Csv,
        MethodKind::CsvGzip,
        MethodKind::Json,
        MethodKind::JsonGzip,
        MethodKind::Base64,
        MethodKind::Pickle,
        MethodKind::PickleGzip,
        MethodKind::Binary,
        MethodKind::BinaryGzip,
        MethodKind::Npy,
        MethodKind::Npz,
        MethodKind::Png,
        MethodKind::Fortran,
        MethodKind::Mat,
    ];

    /// Catalog key, as used in configuration files.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::CsvGzip => "csv_gzip",
            Self::Json => "json",
            Self::JsonGzip => "json_gzip",
            Self::Base64 => "base64",
            Self::Pickle => "pickle",
            Self::PickleGzip => "pickle_gzip",
            Self::Binary => "binary",
            Self::BinaryGzip => "binary_gzip",
            Self::Npy => "npy",
            Self::Npz => "npz",
            Self::Png => "png",
            Self::Fortran => "fortran",
            Self::Mat => "mat",
        }
    }

    /// Builds the storage method, using `gzip_level` for compressed variants.
    #[must_use]
    pub fn build(self, gzip_level: u32) -> Box<dyn StorageMethod> {
        match self {
            Self::Csv => Box::new(Csv::plain()),
            Self::CsvGzip => Box::new(Csv::gzip(gzip_level)),
            Self::Json => Box::new(Json::plain()),
            Self::JsonGzip => Box::new(Json::gzip(gzip_level)),
            Self::Base64 => Box::new(Base64),
            Self::Pickle => Box::new(Pickle::plain()),
            Self::PickleGzip => Box::new(Pickle::gzip(gzip_level)),
            Self::Binary => Box::new(RawBinary::plain()),
            Self::BinaryGzip => Box::new(RawBinary::gzip(gzip_level)),
            Self::Npy => Box::new(Npy),
            Self::Npz => Box::new(Npz),
            Self::Png => Box::new(Png),
            Self::Fortran => Box::new(FortranUnformatted),
            Self::Mat => Box::new(MatFile),
        }
    }
}

impl fmt::Display for MethodKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MethodKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| Error::UnknownMethod(s.to_string()))
    }
}

/// Ordered list of storage methods to run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalog {
    kinds: Vec<MethodKind>,
    gzip_level: u32,
}

impl Catalog {
    /// Catalog of the given methods at the default gzip level.
    #[must_use]
    pub fn new(kinds: Vec<MethodKind>) -> Self {
        Self {
            kinds,
            gzip_level: Compression::DEFAULT_GZIP_LEVEL,
        }
    }

    /// Every method, in run order.
    #[must_use]
    pub fn all() -> Self {
        Self::new(MethodKind::ALL.to_vec())
    }

    /// Overrides the gzip level used by compressed variants.
    #[must_use]
    pub fn with_gzip_level(mut self, level: u32) -> Self {
        self.gzip_level = level;
        self
    }

    /// Catalog described by a validated configuration.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the configuration does not validate.
    pub fn from_config(config: &BenchConfig) -> Result<Self> {
        config.validate()?;
        let catalog = Self::new(config.methods.enabled.clone())
            .with_gzip_level(config.compression.level);
        debug!(
            methods = ?catalog.kinds,
            gzip_level = catalog.gzip_level,
            "built storage method catalog"
        );
        Ok(catalog)
    }

    /// Selected methods, in run order.
    #[must_use]
    pub fn kinds(&self) -> &[MethodKind] {
        &self.kinds
    }

    /// gzip level passed to compressed variants.
    #[must_use]
    pub fn gzip_level(&self) -> u32 {
        self.gzip_level
    }

    /// Fresh storage methods, one per selected kind.
    #[must_use]
    pub fn methods(&self) -> Vec<Box<dyn StorageMethod>> {
        self.kinds
            .iter()
            .map(|kind| kind.build(self.gzip_level))
            .collect()
    }

    /// Fresh timing wrappers, one per selected kind, with empty state.
    #[must_use]
    pub fn timed_methods(&self) -> Vec<TimedMethod> {
        self.methods().into_iter().map(TimedMethod::new).collect()
    }
}
