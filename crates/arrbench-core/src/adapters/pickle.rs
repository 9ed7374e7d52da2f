//! Portable object serialization with `bincode`, optionally gzip-compressed.
//!
//! The whole [`Array`] value (shape and tagged element vector) is written as
//! one object graph; no separate header.

use std::path::Path;

use crate::array::Array;
use crate::durable::{open_reader, write_durably, Compression};
use crate::error::{Error, Result};
use crate::method::StorageMethod;

/// `bincode` object dump.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pickle {
    compression: Compression,
}

impl Pickle {
    /// Uncompressed object dump.
    #[must_use]
    pub const fn plain() -> Self {
        Self {
            compression: Compression::None,
        }
    }

    /// gzip-compressed object dump at `level`.
    #[must_use]
    pub const fn gzip(level: u32) -> Self {
        Self {
            compression: Compression::Gzip(level),
        }
    }
}

impl StorageMethod for Pickle {
    fn name(&self) -> &'static str {
        match self.compression {
            Compression::None => "Pickle",
            Compression::Gzip(_) => "PickleGzip",
        }
    }

    fn save(&self, array: &Array, path: &Path) -> Result<()> {
        write_durably(path, self.compression, |out| {
            bincode::serialize_into(out, array).map_err(|e| Error::codec(self.name(), e))
        })
    }

    fn load(&self, path: &Path) -> Result<Array> {
        let input = open_reader(path, self.compression)?;
        bincode::deserialize_from(input).map_err(|e| Error::codec(self.name(), e))
    }
}
