//! Raw binary dump behind a text header, plus its base64 variant.
//!
//! ```text
//! float64 4 3\n
//! <rows * cols * 8 little-endian bytes>
//! ```
//!
//! Loads parse the header line exactly as saves write it and reshape the
//! remaining bytes. The base64 variant keeps the header in plain text and
//! encodes only the payload, using the URL-safe alphabet.

use base64::engine::general_purpose::URL_SAFE;
use base64::Engine;
use std::io::{Read, Write};
use std::path::Path;

use crate::array::Array;
use crate::durable::{open_reader, write_durably, Compression};
use crate::error::{Error, Result};
use crate::format::Header;
use crate::method::StorageMethod;

fn check_payload(method: &'static str, header: &Header, payload: &[u8]) -> Result<()> {
    let expected = header.payload_len()?;
    if payload.len() == expected {
        Ok(())
    } else {
        Err(Error::codec(
            method,
            format!(
                "header '{}' announces {expected} payload bytes, found {}",
                header.line(),
                payload.len()
            ),
        ))
    }
}

/// Header line followed by raw element bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawBinary {
    compression: Compression,
}

impl RawBinary {
    /// Uncompressed dump.
    #[must_use]
    pub const fn plain() -> Self {
        Self {
            compression: Compression::None,
        }
    }

    /// Header and payload inside one gzip stream at `level`.
    #[must_use]
    pub const fn gzip(level: u32) -> Self {
        Self {
            compression: Compression::Gzip(level),
        }
    }
}

impl StorageMethod for RawBinary {
    fn name(&self) -> &'static str {
        match self.compression {
            Compression::None => "Binary",
            Compression::Gzip(_) => "BinaryGzip",
        }
    }

    fn save(&self, array: &Array, path: &Path) -> Result<()> {
        write_durably(path, self.compression, |out| {
            Header::of(array).write_to(out)?;
            out.write_all(&array.to_le_bytes())?;
            Ok(())
        })
    }

    fn load(&self, path: &Path) -> Result<Array> {
        let mut input = open_reader(path, self.compression)?;
        let header = Header::read_from(input.as_mut())?;

        let mut payload = Vec::new();
        input.read_to_end(&mut payload)?;
        check_payload(self.name(), &header, &payload)?;

        Array::from_le_bytes(header.dtype, header.rows, header.cols, &payload)
    }
}

/// Header line followed by the URL-safe base64 encoding of the raw bytes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Base64;

impl StorageMethod for Base64 {
    fn name(&self) -> &'static str {
        "Base64"
    }

    fn save(&self, array: &Array, path: &Path) -> Result<()> {
        write_durably(path, Compression::None, |out| {
            Header::of(array).write_to(out)?;
            let mut encoder = base64::write::EncoderWriter::new(out, &URL_SAFE);
            encoder.write_all(&array.to_le_bytes())?;
            encoder.finish()?;
            Ok(())
        })
    }

    fn load(&self, path: &Path) -> Result<Array> {
        let mut input = open_reader(path, Compression::None)?;
        let header = Header::read_from(input.as_mut())?;

        let mut encoded = Vec::new();
        input.read_to_end(&mut encoded)?;
        let payload = URL_SAFE
            .decode(&encoded)
            .map_err(|e| Error::codec(self.name(), e))?;
        check_payload(self.name(), &header, &payload)?;

        Array::from_le_bytes(header.dtype, header.rows, header.cols, &payload)
    }
}
