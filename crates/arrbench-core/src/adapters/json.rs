//! JSON document, optionally gzip-compressed.
//!
//! ```json
//! {"shape":[2,2],"data":{"int32":[1,2,3,4]}}
//! ```
//!
//! The element type travels as the key of `data`. JSON has no spelling for
//! NaN or infinities; they are written as `null` and fail to load.

use std::path::Path;

use crate::array::Array;
use crate::durable::{open_reader, write_durably, Compression};
use crate::error::{Error, Result};
use crate::method::StorageMethod;

/// Self-describing JSON document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Json {
    compression: Compression,
}

impl Json {
    /// Plain JSON.
    #[must_use]
    pub const fn plain() -> Self {
        Self {
            compression: Compression::None,
        }
    }

    /// gzip-compressed JSON at `level`.
    #[must_use]
    pub const fn gzip(level: u32) -> Self {
        Self {
            compression: Compression::Gzip(level),
        }
    }
}

impl StorageMethod for Json {
    fn name(&self) -> &'static str {
        match self.compression {
            Compression::None => "Json",
            Compression::Gzip(_) => "JsonGzip",
        }
    }

    fn save(&self, array: &Array, path: &Path) -> Result<()> {
        write_durably(path, self.compression, |out| {
            serde_json::to_writer(out, array).map_err(|e| Error::codec(self.name(), e))
        })
    }

    fn load(&self, path: &Path) -> Result<Array> {
        let input = open_reader(path, self.compression)?;
        serde_json::from_reader(input).map_err(|e| Error::codec(self.name(), e))
    }
}
